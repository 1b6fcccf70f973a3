use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::config::Config;

/// Default outbound message high water mark (aka SNDHWM) per topic.
pub const DEFAULT_HIGH_WATER_MARK: i32 = 100_000;

/// A notification topic, one per event kind. The enum value doubles as the
/// first frame of every message published on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ChainConnected,
    ChainHeaderAdded,
    ChainTipChanged,
    MempoolAdded,
    MempoolRemoved,
    MempoolReplaced,
    MempoolConfirmed,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::ChainConnected,
        Topic::ChainHeaderAdded,
        Topic::ChainTipChanged,
        Topic::MempoolAdded,
        Topic::MempoolRemoved,
        Topic::MempoolReplaced,
        Topic::MempoolConfirmed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ChainConnected => "chainconnected",
            Topic::ChainHeaderAdded => "chainheaderadded",
            Topic::ChainTipChanged => "chaintipchanged",
            Topic::MempoolAdded => "mempooladded",
            Topic::MempoolRemoved => "mempoolremoved",
            Topic::MempoolReplaced => "mempoolreplaced",
            Topic::MempoolConfirmed => "mempoolconfirmed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TopicSettings {
    pub address: String,
    pub high_water_mark: i32,
}

/// One entry of the management introspection surface, mirroring the
/// `getzmqnotifications` RPC result of the embedding node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub hwm: i32,
}

/// Static topic configuration, built once at startup and immutable after.
/// Topics without an entry are disabled and their notification calls are
/// no-ops.
#[derive(Debug, Default)]
pub struct Registry {
    topics: HashMap<Topic, TopicSettings>,
}

impl Registry {
    pub fn from_config(config: &Config) -> Self {
        let mut topics = HashMap::new();
        for topic in Topic::ALL {
            if let Some(address) = config.topic_address(topic) {
                topics.insert(
                    topic,
                    TopicSettings {
                        address: address.clone(),
                        high_water_mark: config.topic_high_water_mark(topic),
                    },
                );
            }
        }
        Self { topics }
    }

    pub fn is_enabled(&self, topic: Topic) -> bool {
        self.topics.contains_key(&topic)
    }

    pub fn address_for(&self, topic: Topic) -> Option<&str> {
        self.topics.get(&topic).map(|s| s.address.as_str())
    }

    pub fn high_water_mark_for(&self, topic: Topic) -> Option<i32> {
        self.topics.get(&topic).map(|s| s.high_water_mark)
    }

    /// Enabled topics in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = (Topic, &TopicSettings)> {
        Topic::ALL
            .into_iter()
            .filter_map(|topic| self.topics.get(&topic).map(|s| (topic, s)))
    }

    pub fn notifications(&self) -> Vec<NotificationInfo> {
        self.enabled()
            .map(|(topic, settings)| NotificationInfo {
                kind: format!("pub{}", topic),
                address: settings.address.clone(),
                hwm: settings.high_water_mark,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_from_config() {
        let mut config = Config::new_disabled();
        config.zmq_pub_chainconnected = Some("tcp://127.0.0.1:28332".to_string());
        config.zmq_pub_mempooladded = Some("tcp://127.0.0.1:28333".to_string());
        config.zmq_pub_mempooladded_hwm = Some(1000);

        let registry = Registry::from_config(&config);
        assert!(registry.is_enabled(Topic::ChainConnected));
        assert!(registry.is_enabled(Topic::MempoolAdded));
        assert!(!registry.is_enabled(Topic::ChainTipChanged));
        assert!(!registry.is_enabled(Topic::MempoolRemoved));

        assert_eq!(
            registry.address_for(Topic::ChainConnected),
            Some("tcp://127.0.0.1:28332")
        );
        assert_eq!(
            registry.high_water_mark_for(Topic::ChainConnected),
            Some(DEFAULT_HIGH_WATER_MARK)
        );
        assert_eq!(registry.high_water_mark_for(Topic::MempoolAdded), Some(1000));
        assert_eq!(registry.address_for(Topic::MempoolRemoved), None);
    }

    #[test]
    fn test_notifications_introspection() {
        let mut config = Config::new_disabled();
        config.zmq_pub_mempoolremoved = Some("tcp://127.0.0.1:28335".to_string());

        let registry = Registry::from_config(&config);
        let notifications = registry.notifications();
        assert_eq!(
            notifications,
            vec![NotificationInfo {
                kind: "pubmempoolremoved".to_string(),
                address: "tcp://127.0.0.1:28335".to_string(),
                hwm: DEFAULT_HIGH_WATER_MARK,
            }]
        );

        let json = serde_json::to_value(&notifications).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "type": "pubmempoolremoved",
                "address": "tcp://127.0.0.1:28335",
                "hwm": 100000,
            }])
        );
    }

    #[test]
    fn test_enabled_order_is_stable() {
        let mut config = Config::new_disabled();
        config.zmq_pub_mempoolreplaced = Some("tcp://127.0.0.1:28336".to_string());
        config.zmq_pub_chainheaderadded = Some("tcp://127.0.0.1:28337".to_string());

        let registry = Registry::from_config(&config);
        let order: Vec<Topic> = registry.enabled().map(|(topic, _)| topic).collect();
        assert_eq!(order, vec![Topic::ChainHeaderAdded, Topic::MempoolReplaced]);
    }
}
