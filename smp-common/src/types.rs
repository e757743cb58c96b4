//! Track, catalog, and playback status types

use crate::human_time::format_track_time;
use serde::{Deserialize, Serialize};

/// One playable audio item with display metadata and a location the
/// player backend can open.
///
/// Immutable after construction; the controller only ever clones it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier from the source system
    pub id: i64,

    /// Track title for display
    pub title: String,

    /// Artist name for display (may be "Unknown")
    pub artist: String,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// Opaque locator the player backend can open
    pub location: String,
}

impl Track {
    /// Render the track duration as `MM:SS` for display
    pub fn formatted_duration(&self) -> String {
        format_track_time(self.duration_ms)
    }
}

/// Ordered sequence of tracks forming the addressable queue.
///
/// Position is the addressing scheme used by the controller; ids need
/// not be unique across catalogs.
pub type Catalog = Vec<Track>;

/// Playback status of the controller session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No track selected, no active player resource
    Idle,
    /// A player resource is preparing asynchronously
    Loading,
    /// Active resource is playing
    Playing,
    /// Active resource is paused mid-track
    Paused,
    /// Unrecoverable load or playback failure
    Error,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Loading => write!(f, "loading"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Error => write!(f, "error"),
        }
    }
}
