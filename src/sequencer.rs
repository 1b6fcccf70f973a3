use std::collections::HashMap;

use crate::topic::Topic;

/// Per-topic message counters. Owned exclusively by the publisher task, so
/// no synchronization is needed; keep it that way.
///
/// Counters start at 0, advance by one per published message and wrap
/// silently. They are never reset within a process lifetime.
#[derive(Debug, Default)]
pub struct Sequencer {
    counters: HashMap<Topic, u32>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence number to stamp on the next message for `topic`
    /// and advances the counter.
    pub fn next(&mut self, topic: Topic) -> u32 {
        let counter = self.counters.entry(topic).or_insert(0);
        let current = *counter;
        *counter = counter.wrapping_add(1);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero_and_increments() {
        let mut sequencer = Sequencer::new();
        assert_eq!(sequencer.next(Topic::ChainConnected), 0);
        assert_eq!(sequencer.next(Topic::ChainConnected), 1);
        assert_eq!(sequencer.next(Topic::ChainConnected), 2);
    }

    #[test]
    fn test_counters_are_independent_per_topic() {
        let mut sequencer = Sequencer::new();
        assert_eq!(sequencer.next(Topic::MempoolAdded), 0);
        assert_eq!(sequencer.next(Topic::MempoolAdded), 1);
        assert_eq!(sequencer.next(Topic::MempoolRemoved), 0);
        assert_eq!(sequencer.next(Topic::MempoolAdded), 2);
        assert_eq!(sequencer.next(Topic::MempoolRemoved), 1);
    }

    #[test]
    fn test_wraps_silently_on_overflow() {
        let mut sequencer = Sequencer::new();
        sequencer.counters.insert(Topic::ChainTipChanged, u32::MAX);
        assert_eq!(sequencer.next(Topic::ChainTipChanged), u32::MAX);
        assert_eq!(sequencer.next(Topic::ChainTipChanged), 0);
    }
}
