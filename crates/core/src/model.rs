use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Playback status reported by the feed.
///
/// Only `Playing` and `Stopped` carry meaning for the bridge; every other code
/// is kept verbatim so it round-trips through the status file unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PlayState {
    /// Code `0`.
    #[default]
    Playing,
    /// Code `3`: stopped, or the sender is offline.
    Stopped,
    /// Any other code (paused, buffering, ...).
    Other(i64),
}

impl PlayState {
    /// Wire code for this state.
    pub fn code(self) -> i64 {
        match self {
            Self::Playing => 0,
            Self::Stopped => 3,
            Self::Other(code) => code,
        }
    }

    /// True for the states the update policy reacts to.
    pub fn is_tracked(self) -> bool {
        matches!(self, Self::Playing | Self::Stopped)
    }
}

impl From<i64> for PlayState {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Playing,
            3 => Self::Stopped,
            other => Self::Other(other),
        }
    }
}

impl From<PlayState> for i64 {
    fn from(state: PlayState) -> Self {
        state.code()
    }
}

/// One reported state of the currently displayed track.
///
/// Field order matches the feed's JSON so the encoded snapshot in the status
/// file reads the same as the message that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(deserialize_with = "text_or_null")]
    pub artist: String,
    #[serde(deserialize_with = "text_or_null")]
    pub title: String,
    #[serde(deserialize_with = "text_or_null")]
    pub album: String,
    /// Always emptied on receipt; whatever the feed sends is skipped.
    #[serde(deserialize_with = "discard")]
    pub album_art: String,
    #[serde(deserialize_with = "number_or_null")]
    pub duration_ms: i64,
    #[serde(deserialize_with = "number_or_null")]
    pub position_ms: i64,
    #[serde(deserialize_with = "play_state_or_null")]
    pub play_state: PlayState,
    /// Sender clock, unix epoch milliseconds.
    #[serde(deserialize_with = "number_or_null")]
    pub timestamp: i64,
}

/// Any JSON number. Fractions are truncated toward zero, out-of-range values
/// saturate.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Int(i64),
    Float(f64),
}

impl From<WireNumber> for i64 {
    fn from(n: WireNumber) -> Self {
        match n {
            WireNumber::Int(i) => i,
            WireNumber::Float(f) => f as i64,
        }
    }
}

fn text_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn discard<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    IgnoredAny::deserialize(d)?;
    Ok(String::new())
}

fn number_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<WireNumber>::deserialize(d)?.map_or(0, i64::from))
}

fn play_state_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<PlayState, D::Error> {
    number_or_null(d).map(PlayState::from)
}

impl Snapshot {
    /// Decode a feed message and drop its album art.
    pub fn from_wire(text: &str) -> Result<Self, serde_json::Error> {
        let mut snapshot: Snapshot = serde_json::from_str(text)?;
        snapshot.strip_album_art();
        Ok(snapshot)
    }

    pub fn strip_album_art(&mut self) {
        self.album_art.clear();
    }

    /// Milliseconds left in the track at the time of the snapshot. May be negative.
    pub fn remaining_ms(&self) -> i64 {
        self.duration_ms.saturating_sub(self.position_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_state_codes() {
        assert_eq!(PlayState::from(0), PlayState::Playing);
        assert_eq!(PlayState::from(3), PlayState::Stopped);
        assert_eq!(PlayState::from(2), PlayState::Other(2));
        assert_eq!(i64::from(PlayState::Other(7)), 7);
        assert!(PlayState::Playing.is_tracked());
        assert!(PlayState::Stopped.is_tracked());
        assert!(!PlayState::Other(1).is_tracked());
    }

    #[test]
    fn from_wire_strips_album_art() {
        let text = r#"{
            "artist": "Boards of Canada",
            "title": "Roygbiv",
            "album": "Music Has the Right to Children",
            "albumArt": "data:image/png;base64,iVBORw0KGgo=",
            "durationMs": 151000,
            "positionMs": 1200,
            "playState": 0,
            "timestamp": 1700000000000
        }"#;
        let snapshot = Snapshot::from_wire(text).unwrap();
        assert_eq!(snapshot.title, "Roygbiv");
        assert_eq!(snapshot.album_art, "");
        assert_eq!(snapshot.play_state, PlayState::Playing);
        assert_eq!(snapshot.remaining_ms(), 149_800);
    }

    #[test]
    fn from_wire_defaults_missing_fields() {
        let snapshot =
            Snapshot::from_wire(r#"{"title":"Only a title","playState":2}"#).unwrap();
        assert_eq!(snapshot.artist, "");
        assert_eq!(snapshot.duration_ms, 0);
        assert_eq!(snapshot.play_state, PlayState::Other(2));
    }

    #[test]
    fn from_wire_accepts_nulls() {
        let text = r#"{"artist":null,"title":"T","album":null,"albumArt":null,
            "durationMs":null,"positionMs":0,"playState":0,"timestamp":1}"#;
        let snapshot = Snapshot::from_wire(text).unwrap();
        assert_eq!(snapshot.title, "T");
        assert_eq!(snapshot.artist, "");
        assert_eq!(snapshot.album, "");
        assert_eq!(snapshot.album_art, "");
        assert_eq!(snapshot.duration_ms, 0);
        assert_eq!(snapshot.play_state, PlayState::Playing);
    }

    #[test]
    fn from_wire_ignores_album_art_shape() {
        let text = r#"{"title":"T","albumArt":{"mime":"image/png","data":[1,2,3]}}"#;
        assert_eq!(Snapshot::from_wire(text).unwrap().album_art, "");
    }

    #[test]
    fn from_wire_truncates_fractional_numbers() {
        let text = r#"{"title":"T","durationMs":200000.9,"positionMs":12.5,
            "playState":3.0,"timestamp":1700000000000.0}"#;
        let snapshot = Snapshot::from_wire(text).unwrap();
        assert_eq!(snapshot.duration_ms, 200_000);
        assert_eq!(snapshot.position_ms, 12);
        assert_eq!(snapshot.play_state, PlayState::Stopped);
        assert_eq!(snapshot.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn from_wire_rejects_garbage() {
        assert!(Snapshot::from_wire("not json").is_err());
        assert!(Snapshot::from_wire(r#"{"title": 5}"#).is_err());
        assert!(Snapshot::from_wire(r#"{"positionMs": "12"}"#).is_err());
    }

    #[test]
    fn encodes_in_wire_order() {
        let snapshot = Snapshot {
            artist: "a".into(),
            title: "t".into(),
            album: "b".into(),
            album_art: String::new(),
            duration_ms: 10,
            position_ms: 2,
            play_state: PlayState::Stopped,
            timestamp: 99,
        };
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"artist":"a","title":"t","album":"b","albumArt":"","durationMs":10,"positionMs":2,"playState":3,"timestamp":99}"#
        );
    }
}
