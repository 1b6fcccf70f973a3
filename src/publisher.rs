use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};
use scopeguard::defer;
use thiserror::Error as ThisError;
use tokio::{
    select,
    sync::mpsc::Receiver,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zmq::Socket;

use crate::{
    event::Event,
    framer,
    sequencer::Sequencer,
    topic::{Registry, Topic},
};

/// Startup errors. All of them are fatal: the embedding node must refuse to
/// start with the offending topic enabled.
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("ZMQ socket error: {0}")]
    Socket(#[from] zmq::Error),
    #[error("Failed to bind {address} for topic {topic}: {source}")]
    Bind {
        topic: Topic,
        address: String,
        source: zmq::Error,
    },
}

/// PUB sockets for the enabled topics. Topics configured with the same bind
/// address share one socket, as subscribers expect a single endpoint there.
struct Transport {
    sockets: Vec<Socket>,
    by_topic: HashMap<Topic, usize>,
}

impl Transport {
    fn bind(registry: &Registry) -> Result<Self, Error> {
        let ctx = zmq::Context::new();
        let mut sockets: Vec<Socket> = vec![];
        let mut by_address: HashMap<String, usize> = HashMap::new();
        let mut by_topic = HashMap::new();

        for (topic, settings) in registry.enabled() {
            let index = match by_address.get(&settings.address) {
                Some(&index) => {
                    debug!("Reusing socket at {} for {}", settings.address, topic);
                    index
                }
                None => {
                    let socket = ctx.socket(zmq::PUB)?;
                    socket.set_sndhwm(settings.high_water_mark)?;
                    socket.set_tcp_keepalive(1)?;
                    socket
                        .bind(&settings.address)
                        .map_err(|source| Error::Bind {
                            topic,
                            address: settings.address.clone(),
                            source,
                        })?;
                    info!(
                        "Publishing {} at {} (hwm {})",
                        topic, settings.address, settings.high_water_mark
                    );
                    sockets.push(socket);
                    by_address.insert(settings.address.clone(), sockets.len() - 1);
                    sockets.len() - 1
                }
            };
            by_topic.insert(topic, index);
        }

        Ok(Self { sockets, by_topic })
    }

    fn send(&self, topic: Topic, frames: Vec<Vec<u8>>) -> Result<(), zmq::Error> {
        // Only called for enabled topics, which always have a socket.
        let index = self.by_topic[&topic];
        self.sockets[index].send_multipart(frames, zmq::DONTWAIT)
    }

    fn close(&self) {
        for socket in &self.sockets {
            let _ = socket.set_linger(0);
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Binds the configured PUB sockets and spawns the single consumer task
/// draining the dispatch queue.
///
/// Only this task assigns sequence numbers or touches the sockets. Send
/// failures drop the message with the sequence number already consumed;
/// subscribers observe the gap, which is the documented lossy contract
/// under overload. On cancellation, events still queued are dropped rather
/// than delivered late.
pub fn run(
    registry: Arc<Registry>,
    cancel_token: CancellationToken,
    mut rx: Receiver<Event>,
) -> Result<JoinHandle<Result<()>>> {
    let transport =
        Transport::bind(&registry).context("Failed to initialize ZMQ publisher sockets")?;

    Ok(task::spawn(async move {
        defer! {
            info!("Exited");
        }

        let mut sequencer = Sequencer::new();
        loop {
            select! {
                biased;
                _ = cancel_token.cancelled() => {
                    info!("Cancelled");
                    rx.close();
                    transport.close();
                    return Ok(());
                },
                option_event = rx.recv() => {
                    match option_event {
                        Some(event) => {
                            let topic = event.topic();
                            if !registry.is_enabled(topic) {
                                warn!("Dropping {} for disabled topic {}", event, topic);
                                continue;
                            }
                            let sequence = sequencer.next(topic);
                            let frames = framer::frame(&event, sequence, now_ms());
                            debug!("Publishing {} (sequence {})", event, sequence);
                            if let Err(e) = transport.send(topic, frames) {
                                // Expected under load once the high water
                                // mark is hit; the sequence number stays
                                // consumed.
                                debug!("Dropped {} message {}: {}", topic, sequence, e);
                            }
                        },
                        None => {
                            warn!("Received None event, exiting");
                            transport.close();
                            return Ok(());
                        },
                    }
                },
            }
        }
    }))
}
