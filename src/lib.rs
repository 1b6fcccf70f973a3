pub mod config;
pub mod event;
pub mod framer;
pub mod logging;
pub mod notify;
pub mod publisher;
pub mod sequencer;
pub mod topic;

pub use config::Config;
pub use event::{Event, RemovalReason};
pub use notify::Notifier;
pub use topic::{Registry, Topic};
