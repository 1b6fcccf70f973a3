use std::fmt;

use bitcoin::{BlockHash, Txid};

use crate::topic::Topic;

/// Why a transaction left the mempool.
///
/// A transaction replaced through RBF is reported with a single
/// `MempoolReplaced` event instead of `MempoolRemoved(Replaced)`; the
/// variant exists so the reason set matches the mempool's removal sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Expired,
    SizeLimit,
    Reorg,
    Conflict,
    Replaced,
    Block,
}

impl RemovalReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalReason::Expired => "EXPIRED",
            RemovalReason::SizeLimit => "SIZELIMIT",
            RemovalReason::Reorg => "REORG",
            RemovalReason::Conflict => "CONFLICT",
            RemovalReason::Replaced => "REPLACED",
            RemovalReason::Block => "BLOCK",
        }
    }
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A state transition reported by the validation engine or the mempool.
///
/// Raw byte fields carry the consensus serialization and must be filled in
/// by the producer before the event is handed over.
#[derive(Debug, Clone)]
pub enum Event {
    BlockConnected {
        hash: BlockHash,
        height: u32,
        prev_hash: BlockHash,
        raw_block: Vec<u8>,
    },
    HeaderAdded {
        hash: BlockHash,
        height: u32,
        raw_header: Vec<u8>,
    },
    TipChanged {
        hash: BlockHash,
        height: u32,
        raw_header: Vec<u8>,
    },
    MempoolAdded {
        txid: Txid,
        raw_tx: Vec<u8>,
        fee: i64,
    },
    MempoolRemoved {
        txid: Txid,
        reason: RemovalReason,
    },
    MempoolReplaced {
        replaced_txid: Txid,
        replaced_raw_tx: Vec<u8>,
        replaced_fee: i64,
        replacement_txid: Txid,
        replacement_raw_tx: Vec<u8>,
        replacement_fee: i64,
    },
    MempoolConfirmed {
        txid: Txid,
        raw_tx: Vec<u8>,
        height: u32,
        block_hash: BlockHash,
        raw_header: Vec<u8>,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::BlockConnected { .. } => Topic::ChainConnected,
            Event::HeaderAdded { .. } => Topic::ChainHeaderAdded,
            Event::TipChanged { .. } => Topic::ChainTipChanged,
            Event::MempoolAdded { .. } => Topic::MempoolAdded,
            Event::MempoolRemoved { .. } => Topic::MempoolRemoved,
            Event::MempoolReplaced { .. } => Topic::MempoolReplaced,
            Event::MempoolConfirmed { .. } => Topic::MempoolConfirmed,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::BlockConnected { hash, height, .. } => {
                write!(f, "block connected: {} at height {}", hash, height)
            }
            Event::HeaderAdded { hash, height, .. } => {
                write!(f, "header added: {} at height {}", hash, height)
            }
            Event::TipChanged { hash, height, .. } => {
                write!(f, "tip changed: {} at height {}", hash, height)
            }
            Event::MempoolAdded { txid, fee, .. } => {
                write!(f, "mempool added: {} with fee {}", txid, fee)
            }
            Event::MempoolRemoved { txid, reason } => {
                write!(f, "mempool removed: {} ({})", txid, reason)
            }
            Event::MempoolReplaced {
                replaced_txid,
                replacement_txid,
                ..
            } => {
                write!(
                    f,
                    "mempool replaced: {} by {}",
                    replaced_txid, replacement_txid
                )
            }
            Event::MempoolConfirmed { txid, .. } => {
                write!(f, "mempool confirmed: {}", txid)
            }
        }
    }
}
