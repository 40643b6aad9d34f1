use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use nowplaying_core::{Outcome, PersistenceSink, Pipeline, Snapshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};

use crate::config::BridgeConfig;

/// Long-lived feed connection. Frames are handled one at a time, each to
/// completion, so git work for consecutive snapshots never overlaps.
#[derive(Clone, Debug)]
pub struct FeedListener {
    endpoint: String,
    reconnect_delay: Duration,
}

impl FeedListener {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            reconnect_delay: config.reconnect_delay,
        }
    }

    /// Listen forever, reconnecting after a fixed delay whenever a session ends.
    pub async fn run<S: PersistenceSink>(&self, pipeline: &mut Pipeline<S>) {
        loop {
            match self.run_session(pipeline).await {
                Ok(()) => info!(endpoint = %self.endpoint, "feed session ended"),
                Err(e) => warn!(
                    endpoint = %self.endpoint,
                    error = %format!("{e:#}"),
                    "feed session failed"
                ),
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// One connection, until the server closes it or the transport fails.
    pub async fn run_session<S: PersistenceSink>(&self, pipeline: &mut Pipeline<S>) -> Result<()> {
        let (mut ws, _) = connect_async(self.endpoint.as_str())
            .await
            .with_context(|| format!("connecting to {}", self.endpoint))?;
        info!(endpoint = %self.endpoint, "connected to feed");

        while let Some(frame) = ws.next().await {
            match frame.context("reading feed frame")? {
                Message::Text(text) => {
                    handle_frame(pipeline, text.as_str()).await;
                }
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => {
                        handle_frame(pipeline, text).await;
                    }
                    Err(_) => warn!(len = bytes.len(), "skipping non-utf8 binary frame"),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Decode one feed message and run it through the pipeline. Malformed
/// messages and persistence failures are logged, never returned.
pub async fn handle_frame<S: PersistenceSink>(
    pipeline: &mut Pipeline<S>,
    text: &str,
) -> Option<Outcome> {
    let snapshot = match Snapshot::from_wire(text) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "skipping malformed feed message");
            return None;
        }
    };

    match pipeline.handle(snapshot).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!(error = %e, "persisting snapshot failed");
            None
        }
    }
}
