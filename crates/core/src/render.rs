use std::fmt::Display;

use chrono::{Local, TimeZone};

use crate::model::{PlayState, Snapshot};

pub const OFFLINE_TEXT: &str = "Currently offline";

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Status text for a snapshot, timestamp in the local time zone.
pub fn render(snapshot: &Snapshot) -> String {
    render_in(snapshot, &Local)
}

/// Status text for a snapshot, timestamp in `tz`.
pub fn render_in<Tz>(snapshot: &Snapshot, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if snapshot.play_state == PlayState::Stopped {
        return OFFLINE_TEXT.to_string();
    }

    let mut text = format!("Now playing: {}", snapshot.title);
    if !snapshot.album.is_empty() {
        text.push_str(&format!(" ({})", snapshot.album));
    }
    if !snapshot.artist.is_empty() {
        text.push_str(&format!(" - {}", snapshot.artist));
    }

    let at = match tz.timestamp_millis_opt(snapshot.timestamp).single() {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => snapshot.timestamp.to_string(),
    };
    // Plain struct of strings and integers: encoding cannot fail.
    let encoded = serde_json::to_string(snapshot).unwrap_or_default();

    text.push_str(&format!("\n\nAt: {at}\n{encoded}"));
    text
}
