//! Playback session state machine
//!
//! Pure state owned by the controller task: catalog, current index,
//! status, the single active player resource slot, and the load
//! generation counter. Index arithmetic lives here so it can be tested
//! without any async machinery.

use crate::backend::PlayerHandle;
use smp_common::{Catalog, PlaybackStatus, Track};

/// Mutable state of one playback session.
///
/// Invariants:
/// - at most one active handle at any instant
/// - `current_index` is a valid catalog offset whenever status is not Idle
/// - `generation` increases on every load and every cancel point, so a
///   signal tagged with an older generation is stale
pub struct PlaybackSession {
    pub catalog: Catalog,
    pub current_index: Option<usize>,
    pub status: PlaybackStatus,
    pub active: Option<Box<dyn PlayerHandle>>,
    pub generation: u64,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            current_index: None,
            status: PlaybackStatus::Idle,
            active: None,
            generation: 0,
        }
    }

    /// Replace the catalog and reset to a safe idle state.
    ///
    /// The caller must release the active handle first; index-based
    /// addressing cannot be validated against a different catalog.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        debug_assert!(self.active.is_none(), "release the handle before replacing the catalog");
        self.catalog = catalog;
        self.current_index = None;
        self.status = PlaybackStatus::Idle;
        self.generation += 1;
    }

    /// Release and drop the active handle, if any
    pub fn release_active(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.release();
        }
    }

    /// Track at the given index, if in range
    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.catalog.get(index)
    }

    /// Currently selected track, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.catalog.get(i))
    }

    /// Index of the next track, wrapping past the end to 0.
    ///
    /// With no selection yet, the first track is next. Returns None on
    /// an empty catalog.
    pub fn next_index(&self) -> Option<usize> {
        if self.catalog.is_empty() {
            return None;
        }
        Some(match self.current_index {
            Some(i) => (i + 1) % self.catalog.len(),
            None => 0,
        })
    }

    /// Index of the previous track, wrapping from 0 to the last track.
    ///
    /// With no selection yet, the last track is previous. Returns None
    /// on an empty catalog.
    pub fn previous_index(&self) -> Option<usize> {
        if self.catalog.is_empty() {
            return None;
        }
        Some(match self.current_index {
            Some(0) | None => self.catalog.len() - 1,
            Some(i) => i - 1,
        })
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}
