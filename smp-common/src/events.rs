//! Event types emitted by the playback controller
//!
//! Subscribers (UI, notification layer, remote hosts) receive these over
//! a broadcast channel. The serde tagging lets hosts forward events over
//! any transport without re-encoding.

use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A new track became the current one and started playing
    TrackChanged { track: Track },

    /// Playback started or stopped (pause, resume, load failure)
    PlaybackStateChanged { playing: bool },

    /// Periodic position report, emitted only while playing
    ProgressUpdated { position_ms: u64, duration_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track {
            id: 42,
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            duration_ms: 30_000,
            location: "/music/song.mp3".to_string(),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = PlayerEvent::ProgressUpdated {
            position_ms: 1500,
            duration_ms: 30_000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ProgressUpdated");
        assert_eq!(json["position_ms"], 1500);
        assert_eq!(json["duration_ms"], 30_000);
    }

    #[test]
    fn round_trips_track_changed() {
        let event = PlayerEvent::TrackChanged {
            track: sample_track(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn state_changed_carries_boolean() {
        let json = serde_json::to_value(PlayerEvent::PlaybackStateChanged { playing: false }).unwrap();
        assert_eq!(json["playing"], false);
    }
}
