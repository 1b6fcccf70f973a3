use std::time::{SystemTime, UNIX_EPOCH};

use bitcoin::{
    BlockHash, Txid,
    hashes::{Hash, sha256d},
};
use chainpub::topic::Topic;

/// PUB/SUB handshakes race against the first publish; give the subscriber a
/// moment before producing, like the node's functional tests do.
pub const SLOW_JOINER_DELAY_MS: u64 = 200;

pub struct Subscriber {
    socket: zmq::Socket,
    topic: Topic,
    next_sequence: u32,
}

impl Subscriber {
    pub fn connect(ctx: &zmq::Context, topic: Topic, address: &str) -> Self {
        let socket = ctx.socket(zmq::SUB).unwrap();
        socket.set_subscribe(topic.as_str().as_bytes()).unwrap();
        socket.set_rcvtimeo(5_000).unwrap();
        socket.connect(address).unwrap();
        Self {
            socket,
            topic,
            next_sequence: 0,
        }
    }

    /// Receives one message, checks the topic frame, the timestamp bound and
    /// the sequence number, and returns the payload frames in between.
    pub fn recv_payload(&mut self) -> Vec<Vec<u8>> {
        let frames = self.socket.recv_multipart(0).unwrap();
        assert!(frames.len() >= 3, "message has too few frames");
        assert_eq!(frames[0], self.topic.as_str().as_bytes());

        let timestamp_ms = i64::from_le_bytes(
            frames[frames.len() - 2]
                .as_slice()
                .try_into()
                .expect("timestamp frame must be 8 bytes"),
        );
        assert!((now_ms() - timestamp_ms).abs() < 5_000);

        let sequence = u32::from_le_bytes(
            frames[frames.len() - 1]
                .as_slice()
                .try_into()
                .expect("sequence frame must be 4 bytes"),
        );
        assert_eq!(sequence, self.next_sequence);
        self.next_sequence += 1;

        frames[1..frames.len() - 2].to_vec()
    }

    pub fn expect_silence(&self) {
        self.socket.set_rcvtimeo(300).unwrap();
        let result = self.socket.recv_multipart(0);
        self.socket.set_rcvtimeo(5_000).unwrap();
        assert!(
            matches!(result, Err(zmq::Error::EAGAIN)),
            "expected no message, got {:?}",
            result
        );
    }
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// A synthetic 80-byte block header committing to `prev_hash`.
pub fn raw_header(prev_hash: &BlockHash, nonce: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(80);
    header.extend_from_slice(&4i32.to_le_bytes());
    header.extend_from_slice(&prev_hash.to_byte_array());
    header.extend_from_slice(&[0u8; 32]);
    header.extend_from_slice(&1_700_000_000u32.to_le_bytes());
    header.extend_from_slice(&0x1d00_ffffu32.to_le_bytes());
    header.extend_from_slice(&nonce.to_le_bytes());
    header
}

pub fn header_hash(raw_header: &[u8]) -> BlockHash {
    BlockHash::from_raw_hash(sha256d::Hash::hash(raw_header))
}

pub fn reversed_block_hash(hash: &BlockHash) -> Vec<u8> {
    let mut bytes = hash.to_byte_array();
    bytes.reverse();
    bytes.to_vec()
}

pub fn reversed_txid(txid: &Txid) -> Vec<u8> {
    let mut bytes = txid.to_byte_array();
    bytes.reverse();
    bytes.to_vec()
}

/// A fake transaction payload with a txid derived from its bytes; good
/// enough for a publisher that treats raw bytes as opaque.
pub fn raw_tx(seed: u8) -> (Txid, Vec<u8>) {
    let bytes = vec![seed; 64];
    let txid = Txid::from_raw_hash(sha256d::Hash::hash(&bytes));
    (txid, bytes)
}
