use std::sync::Arc;

use bitcoin::{BlockHash, Txid};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

use crate::{
    event::{Event, RemovalReason},
    topic::{Registry, Topic},
};

pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Producer-side handle invoked by the validation engine and the mempool at
/// the moment a transition occurs, while they still hold the lock that made
/// the transition consistent.
///
/// Every method is a no-op when its topic is disabled and never touches
/// transport I/O; it may wait briefly on queue backpressure. A closed queue
/// (publisher already shut down) is also a no-op: a notification failure
/// must never abort a validation or mempool state transition.
///
/// The caller decides which methods to invoke; this component does not
/// re-derive chain selection. During a reorg the validation engine calls
/// `header_added` for every header it accepts and `block_connected` /
/// `tip_changed` only for blocks that join the active chain.
#[derive(Clone)]
pub struct Notifier {
    tx: Sender<Event>,
    registry: Arc<Registry>,
}

impl Notifier {
    pub fn channel(registry: Arc<Registry>) -> (Self, Receiver<Event>) {
        Self::channel_with_capacity(registry, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn channel_with_capacity(
        registry: Arc<Registry>,
        capacity: usize,
    ) -> (Self, Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, registry }, rx)
    }

    /// Lets producers skip serializing raw bytes when nobody listens.
    pub fn is_enabled(&self, topic: Topic) -> bool {
        self.registry.is_enabled(topic)
    }

    pub async fn block_connected(
        &self,
        hash: BlockHash,
        height: u32,
        prev_hash: BlockHash,
        raw_block: Vec<u8>,
    ) {
        if !self.registry.is_enabled(Topic::ChainConnected) {
            return;
        }
        self.enqueue(Event::BlockConnected {
            hash,
            height,
            prev_hash,
            raw_block,
        })
        .await;
    }

    pub async fn header_added(&self, hash: BlockHash, height: u32, raw_header: Vec<u8>) {
        if !self.registry.is_enabled(Topic::ChainHeaderAdded) {
            return;
        }
        self.enqueue(Event::HeaderAdded {
            hash,
            height,
            raw_header,
        })
        .await;
    }

    pub async fn tip_changed(&self, hash: BlockHash, height: u32, raw_header: Vec<u8>) {
        if !self.registry.is_enabled(Topic::ChainTipChanged) {
            return;
        }
        self.enqueue(Event::TipChanged {
            hash,
            height,
            raw_header,
        })
        .await;
    }

    pub async fn mempool_added(&self, txid: Txid, raw_tx: Vec<u8>, fee: i64) {
        if !self.registry.is_enabled(Topic::MempoolAdded) {
            return;
        }
        self.enqueue(Event::MempoolAdded { txid, raw_tx, fee }).await;
    }

    pub async fn mempool_removed(&self, txid: Txid, reason: RemovalReason) {
        if !self.registry.is_enabled(Topic::MempoolRemoved) {
            return;
        }
        self.enqueue(Event::MempoolRemoved { txid, reason }).await;
    }

    /// One atomic message for both sides of an RBF bump; the mempool must
    /// not also call `mempool_removed` for the replaced transaction.
    pub async fn mempool_replaced(
        &self,
        replaced_txid: Txid,
        replaced_raw_tx: Vec<u8>,
        replaced_fee: i64,
        replacement_txid: Txid,
        replacement_raw_tx: Vec<u8>,
        replacement_fee: i64,
    ) {
        if !self.registry.is_enabled(Topic::MempoolReplaced) {
            return;
        }
        self.enqueue(Event::MempoolReplaced {
            replaced_txid,
            replaced_raw_tx,
            replaced_fee,
            replacement_txid,
            replacement_raw_tx,
            replacement_fee,
        })
        .await;
    }

    pub async fn mempool_confirmed(
        &self,
        txid: Txid,
        raw_tx: Vec<u8>,
        height: u32,
        block_hash: BlockHash,
        raw_header: Vec<u8>,
    ) {
        if !self.registry.is_enabled(Topic::MempoolConfirmed) {
            return;
        }
        self.enqueue(Event::MempoolConfirmed {
            txid,
            raw_tx,
            height,
            block_hash,
            raw_header,
        })
        .await;
    }

    async fn enqueue(&self, event: Event) {
        if self.tx.send(event).await.is_err() {
            debug!("Dispatch queue is closed, dropping notification");
        }
    }
}
