use anyhow::Result;
use async_trait::async_trait;

/// Durable record of status text, invoked in declaration order for every
/// snapshot the update policy accepts.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Make sure a working tree exists. Must be a no-op when one already does.
    async fn ensure_repository_initialized(&self) -> Result<()>;

    /// Write `text` to the status file and commit it if the file changed.
    /// Returns whether a commit was made.
    async fn commit_snapshot_text(&self, text: &str) -> Result<bool>;

    /// Push when a remote is configured. Failures are the sink's to log; they
    /// never reach the caller.
    async fn push_if_remote_configured(&self);
}
