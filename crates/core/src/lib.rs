#![forbid(unsafe_code)]

//! Change detection and status rendering for the now-playing git bridge.
//!
//! Everything here is pure except the [`Pipeline`], which drives an injected
//! [`PersistenceSink`].

pub mod decision;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod sink;
pub mod store;

pub use decision::{decide, is_looped, Decision};
pub use model::{PlayState, Snapshot};
pub use pipeline::{Outcome, PersistError, Pipeline};
pub use render::{render, render_in, OFFLINE_TEXT};
pub use sink::PersistenceSink;
pub use store::SnapshotStore;
