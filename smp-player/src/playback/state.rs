//! Shared playback state snapshot
//!
//! Read-side view of the controller session for hosts and tests. The
//! controller task is the only writer; observers read a consistent
//! snapshot without touching the session itself. Also owns the event
//! broadcast channel.

use smp_common::{PlaybackStatus, PlayerEvent, Track};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

#[derive(Debug)]
struct StateInner {
    status: PlaybackStatus,
    current_index: Option<usize>,
    current_track: Option<Track>,
    position_ms: u64,
    duration_ms: u64,
}

/// Thread-safe snapshot of playback state plus event fan-out
#[derive(Debug, Clone)]
pub struct SharedPlayerState {
    inner: Arc<RwLock<StateInner>>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl SharedPlayerState {
    pub fn new(event_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_capacity);
        Self {
            inner: Arc::new(RwLock::new(StateInner {
                status: PlaybackStatus::Idle,
                current_index: None,
                current_track: None,
                position_ms: 0,
                duration_ms: 0,
            })),
            event_tx,
        }
    }

    pub async fn status(&self) -> PlaybackStatus {
        self.inner.read().await.status
    }

    pub async fn set_status(&self, status: PlaybackStatus) {
        self.inner.write().await.status = status;
    }

    pub async fn current_index(&self) -> Option<usize> {
        self.inner.read().await.current_index
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.inner.read().await.current_track.clone()
    }

    pub async fn set_current(&self, index: Option<usize>, track: Option<Track>) {
        let mut inner = self.inner.write().await;
        inner.current_index = index;
        inner.current_track = track;
    }

    pub async fn position(&self) -> (u64, u64) {
        let inner = self.inner.read().await;
        (inner.position_ms, inner.duration_ms)
    }

    pub async fn set_position(&self, position_ms: u64, duration_ms: u64) {
        let mut inner = self.inner.write().await;
        inner.position_ms = position_ms;
        inner.duration_ms = duration_ms;
    }

    /// Broadcast an event to all subscribers.
    ///
    /// No receivers is not an error.
    pub fn broadcast_event(&self, event: PlayerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }
}
