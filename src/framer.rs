use bitcoin::hashes::Hash;

use crate::event::Event;

/// Builds the multipart wire message for an event:
/// `[topic, payload frames.., timestamp (8B i64 LE), sequence (4B u32 LE)]`.
///
/// Hashes travel byte-reversed (RPC display order). Pure; must not fail for
/// well-formed events. Empty raw byte fields mean the producer violated the
/// notification contract, which is a bug, not a runtime condition.
pub fn frame(event: &Event, sequence: u32, timestamp_ms: i64) -> Vec<Vec<u8>> {
    let mut frames = vec![event.topic().as_str().as_bytes().to_vec()];

    match event {
        Event::BlockConnected {
            hash,
            height,
            prev_hash,
            raw_block,
        } => {
            debug_assert!(!raw_block.is_empty(), "raw block bytes missing");
            frames.push(hash_frame(hash.to_byte_array()));
            frames.push(height.to_le_bytes().to_vec());
            frames.push(hash_frame(prev_hash.to_byte_array()));
            frames.push(raw_block.clone());
        }
        Event::HeaderAdded {
            hash,
            height,
            raw_header,
        }
        | Event::TipChanged {
            hash,
            height,
            raw_header,
        } => {
            debug_assert!(raw_header.len() == 80, "raw header must be 80 bytes");
            frames.push(hash_frame(hash.to_byte_array()));
            frames.push(height.to_le_bytes().to_vec());
            frames.push(raw_header.clone());
        }
        Event::MempoolAdded { txid, raw_tx, fee } => {
            debug_assert!(!raw_tx.is_empty(), "raw transaction bytes missing");
            frames.push(hash_frame(txid.to_byte_array()));
            frames.push(raw_tx.clone());
            frames.push(fee.to_le_bytes().to_vec());
        }
        Event::MempoolRemoved { txid, reason } => {
            frames.push(hash_frame(txid.to_byte_array()));
            frames.push(reason.as_str().as_bytes().to_vec());
        }
        Event::MempoolReplaced {
            replaced_txid,
            replaced_raw_tx,
            replaced_fee,
            replacement_txid,
            replacement_raw_tx,
            replacement_fee,
        } => {
            debug_assert!(
                !replaced_raw_tx.is_empty() && !replacement_raw_tx.is_empty(),
                "raw transaction bytes missing"
            );
            frames.push(hash_frame(replaced_txid.to_byte_array()));
            frames.push(replaced_raw_tx.clone());
            frames.push(replaced_fee.to_le_bytes().to_vec());
            frames.push(hash_frame(replacement_txid.to_byte_array()));
            frames.push(replacement_raw_tx.clone());
            frames.push(replacement_fee.to_le_bytes().to_vec());
        }
        Event::MempoolConfirmed {
            txid,
            raw_tx,
            height,
            block_hash,
            raw_header,
        } => {
            debug_assert!(!raw_tx.is_empty(), "raw transaction bytes missing");
            debug_assert!(raw_header.len() == 80, "raw header must be 80 bytes");
            frames.push(hash_frame(txid.to_byte_array()));
            frames.push(raw_tx.clone());
            frames.push(height.to_le_bytes().to_vec());
            frames.push(hash_frame(block_hash.to_byte_array()));
            frames.push(raw_header.clone());
        }
    }

    frames.push(timestamp_ms.to_le_bytes().to_vec());
    frames.push(sequence.to_le_bytes().to_vec());
    frames
}

fn hash_frame(mut bytes: [u8; 32]) -> Vec<u8> {
    bytes.reverse();
    bytes.to_vec()
}
