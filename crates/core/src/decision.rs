use crate::model::{PlayState, Snapshot};

/// Slack allowed between the time that was left in the previous track and the
/// time that actually passed, and the position ceiling for "back at the start".
pub const LOOP_TOLERANCE_MS: i64 = 100;

/// What the pipeline should do with an incoming snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Play state is filtered out: leave the store alone, persist nothing.
    Ignore,
    /// Same song still progressing: store it, persist nothing.
    Keep,
    /// New song, or the same song restarted: store it and persist.
    Persist,
}

impl Decision {
    pub fn accept_for_persistence(self) -> bool {
        matches!(self, Self::Persist)
    }
}

/// Pure update policy.
///
/// A title change always persists. Otherwise a snapshot persists only when the
/// track looped: less time passed than was left in the previous snapshot, the
/// cursor is back near zero, and both snapshots are playing.
pub fn decide(previous: &Snapshot, incoming: &Snapshot) -> Decision {
    if !incoming.play_state.is_tracked() {
        return Decision::Ignore;
    }

    if incoming.title != previous.title || is_looped(previous, incoming) {
        Decision::Persist
    } else {
        Decision::Keep
    }
}

/// Loop heuristic. No guard for an unset previous duration: whatever the
/// arithmetic yields is the answer.
pub fn is_looped(previous: &Snapshot, incoming: &Snapshot) -> bool {
    let time_passed = incoming.timestamp.saturating_sub(previous.timestamp);
    let time_remaining = previous.remaining_ms();

    time_passed < time_remaining.saturating_add(LOOP_TOLERANCE_MS)
        && incoming.position_ms < LOOP_TOLERANCE_MS
        && previous.play_state == PlayState::Playing
        && incoming.play_state == PlayState::Playing
}
