use tracing::{debug, info};

use crate::decision::Decision;
use crate::model::Snapshot;
use crate::render::render;
use crate::sink::PersistenceSink;
use crate::store::SnapshotStore;

/// Result of handling one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Play state filtered out; store untouched.
    Ignored,
    /// Stored, nothing persisted.
    Unchanged,
    /// Stored and handed to the sink. `committed` is false when the status
    /// file already held the same text.
    Persisted { committed: bool },
}

/// Failure of a persistence step. The push step cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("repository initialization failed: {0:#}")]
    Init(anyhow::Error),
    #[error("committing status text failed: {0:#}")]
    Commit(anyhow::Error),
}

/// Snapshot store plus sink. Handles one snapshot at a time through `&mut self`,
/// so sink calls for consecutive snapshots never interleave.
pub struct Pipeline<S> {
    store: SnapshotStore,
    sink: S,
}

impl<S: PersistenceSink> Pipeline<S> {
    pub fn new(sink: S) -> Self {
        Self::with_store(SnapshotStore::new(), sink)
    }

    pub fn with_store(store: SnapshotStore, sink: S) -> Self {
        Self { store, sink }
    }

    pub fn current(&self) -> &Snapshot {
        self.store.current()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn handle(&mut self, mut incoming: Snapshot) -> Result<Outcome, PersistError> {
        incoming.strip_album_art();

        let play_state = incoming.play_state;
        match self.store.apply(incoming) {
            Decision::Ignore => {
                debug!(play_state = play_state.code(), "ignoring snapshot");
                Ok(Outcome::Ignored)
            }
            Decision::Keep => Ok(Outcome::Unchanged),
            Decision::Persist => {
                let snapshot = self.store.current();
                let text = render(snapshot);
                info!(title = %snapshot.title, artist = %snapshot.artist, "song changed");

                self.sink
                    .ensure_repository_initialized()
                    .await
                    .map_err(PersistError::Init)?;
                let committed = self
                    .sink
                    .commit_snapshot_text(&text)
                    .await
                    .map_err(PersistError::Commit)?;
                self.sink.push_if_remote_configured().await;

                Ok(Outcome::Persisted { committed })
            }
        }
    }
}
