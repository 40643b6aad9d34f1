#![forbid(unsafe_code)]

//! Git-backed persistence and WebSocket feed listener for the now-playing bridge.

pub mod config;
pub mod git;
pub mod listener;

pub use config::BridgeConfig;
pub use git::GitSink;
pub use listener::{handle_frame, FeedListener};
