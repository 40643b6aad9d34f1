use crate::decision::{decide, Decision};
use crate::model::Snapshot;

/// Single slot holding the last applied snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    current: Snapshot,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known snapshot instead of the all-zero default.
    pub fn with_current(current: Snapshot) -> Self {
        Self { current }
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Decide against the stored snapshot and replace it unless the incoming
    /// one is filtered out.
    pub fn apply(&mut self, incoming: Snapshot) -> Decision {
        let decision = decide(&self.current, &incoming);
        if decision != Decision::Ignore {
            self.current = incoming;
        }
        decision
    }
}
