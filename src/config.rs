use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::logging;
use crate::topic::{DEFAULT_HIGH_WATER_MARK, Topic};

/// One `--zmq-pub-<topic>` directive per topic; topics without an address
/// are disabled. High water marks can be overridden per topic and default
/// to 100000.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(
    version = "0.1.0",
    about = "chainpub",
    long_about = r#"ZMQ notification publisher for a Bitcoin full node"#
)]
pub struct Config {
    #[clap(
        long,
        env = "LOG_FORMAT",
        help = "Log format (plain, json)",
        default_value = "plain"
    )]
    pub log_format: logging::Format,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINCONNECTED",
        help = "Bind address for the chainconnected topic (e.g., tcp://127.0.0.1:28332)"
    )]
    pub zmq_pub_chainconnected: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINCONNECTED_HWM",
        help = "Outbound message high water mark for the chainconnected topic"
    )]
    pub zmq_pub_chainconnected_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINHEADERADDED",
        help = "Bind address for the chainheaderadded topic"
    )]
    pub zmq_pub_chainheaderadded: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINHEADERADDED_HWM",
        help = "Outbound message high water mark for the chainheaderadded topic"
    )]
    pub zmq_pub_chainheaderadded_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINTIPCHANGED",
        help = "Bind address for the chaintipchanged topic"
    )]
    pub zmq_pub_chaintipchanged: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_CHAINTIPCHANGED_HWM",
        help = "Outbound message high water mark for the chaintipchanged topic"
    )]
    pub zmq_pub_chaintipchanged_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLADDED",
        help = "Bind address for the mempooladded topic"
    )]
    pub zmq_pub_mempooladded: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLADDED_HWM",
        help = "Outbound message high water mark for the mempooladded topic"
    )]
    pub zmq_pub_mempooladded_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLREMOVED",
        help = "Bind address for the mempoolremoved topic"
    )]
    pub zmq_pub_mempoolremoved: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLREMOVED_HWM",
        help = "Outbound message high water mark for the mempoolremoved topic"
    )]
    pub zmq_pub_mempoolremoved_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLREPLACED",
        help = "Bind address for the mempoolreplaced topic"
    )]
    pub zmq_pub_mempoolreplaced: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLREPLACED_HWM",
        help = "Outbound message high water mark for the mempoolreplaced topic"
    )]
    pub zmq_pub_mempoolreplaced_hwm: Option<i32>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLCONFIRMED",
        help = "Bind address for the mempoolconfirmed topic"
    )]
    pub zmq_pub_mempoolconfirmed: Option<String>,

    #[clap(
        long,
        env = "ZMQ_PUB_MEMPOOLCONFIRMED_HWM",
        help = "Outbound message high water mark for the mempoolconfirmed topic"
    )]
    pub zmq_pub_mempoolconfirmed_hwm: Option<i32>,
}

impl Config {
    /// A configuration with every topic disabled, for embedding and tests.
    pub fn new_disabled() -> Self {
        Self {
            log_format: logging::Format::Plain,
            zmq_pub_chainconnected: None,
            zmq_pub_chainconnected_hwm: None,
            zmq_pub_chainheaderadded: None,
            zmq_pub_chainheaderadded_hwm: None,
            zmq_pub_chaintipchanged: None,
            zmq_pub_chaintipchanged_hwm: None,
            zmq_pub_mempooladded: None,
            zmq_pub_mempooladded_hwm: None,
            zmq_pub_mempoolremoved: None,
            zmq_pub_mempoolremoved_hwm: None,
            zmq_pub_mempoolreplaced: None,
            zmq_pub_mempoolreplaced_hwm: None,
            zmq_pub_mempoolconfirmed: None,
            zmq_pub_mempoolconfirmed_hwm: None,
        }
    }

    pub fn topic_address(&self, topic: Topic) -> Option<&String> {
        match topic {
            Topic::ChainConnected => self.zmq_pub_chainconnected.as_ref(),
            Topic::ChainHeaderAdded => self.zmq_pub_chainheaderadded.as_ref(),
            Topic::ChainTipChanged => self.zmq_pub_chaintipchanged.as_ref(),
            Topic::MempoolAdded => self.zmq_pub_mempooladded.as_ref(),
            Topic::MempoolRemoved => self.zmq_pub_mempoolremoved.as_ref(),
            Topic::MempoolReplaced => self.zmq_pub_mempoolreplaced.as_ref(),
            Topic::MempoolConfirmed => self.zmq_pub_mempoolconfirmed.as_ref(),
        }
    }

    pub fn topic_high_water_mark(&self, topic: Topic) -> i32 {
        let hwm = match topic {
            Topic::ChainConnected => self.zmq_pub_chainconnected_hwm,
            Topic::ChainHeaderAdded => self.zmq_pub_chainheaderadded_hwm,
            Topic::ChainTipChanged => self.zmq_pub_chaintipchanged_hwm,
            Topic::MempoolAdded => self.zmq_pub_mempooladded_hwm,
            Topic::MempoolRemoved => self.zmq_pub_mempoolremoved_hwm,
            Topic::MempoolReplaced => self.zmq_pub_mempoolreplaced_hwm,
            Topic::MempoolConfirmed => self.zmq_pub_mempoolconfirmed_hwm,
        };
        hwm.unwrap_or(DEFAULT_HIGH_WATER_MARK)
    }
}
