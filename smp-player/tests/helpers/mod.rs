//! Shared test infrastructure for controller integration tests
//!
//! Provides a scripted mock backend whose handles do nothing until the
//! test fires their ready/completed/failed signals, so every
//! asynchronous interleaving can be driven deterministically.

use smp_common::{Error, PlaybackStatus, PlayerEvent, Result, Track};
use smp_player::{PlaybackController, PlayerBackend, PlayerHandle, ResourceNotifier};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

/// Observable state of one mock handle
#[derive(Default)]
pub struct MockHandleState {
    pub track_id: i64,
    pub fallback: bool,
    pub notifier: Option<ResourceNotifier>,
    pub playing: bool,
    pub released: bool,
    /// Whether start() was ever called
    pub started: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub seeks: Vec<u64>,
}

pub type HandleRef = Arc<Mutex<MockHandleState>>;

/// Scripted backend behavior plus a record of every opened handle
#[derive(Default)]
pub struct MockControl {
    pub fail_primary: bool,
    pub fail_fallback: bool,
    pub handles: Vec<HandleRef>,
}

pub type ControlRef = Arc<Mutex<MockControl>>;

pub struct MockBackend {
    control: ControlRef,
}

impl MockBackend {
    pub fn new() -> (Self, ControlRef) {
        let control = Arc::new(Mutex::new(MockControl::default()));
        (
            Self {
                control: Arc::clone(&control),
            },
            control,
        )
    }

    fn open_handle(&self, track: &Track, fallback: bool) -> Box<dyn PlayerHandle> {
        let state = Arc::new(Mutex::new(MockHandleState {
            track_id: track.id,
            fallback,
            duration_ms: track.duration_ms,
            ..MockHandleState::default()
        }));
        self.control.lock().unwrap().handles.push(Arc::clone(&state));
        Box::new(MockHandle { state })
    }
}

impl PlayerBackend for MockBackend {
    fn open(&self, track: &Track) -> Result<Box<dyn PlayerHandle>> {
        if self.control.lock().unwrap().fail_primary {
            return Err(Error::ResourceCreation("scripted primary failure".into()));
        }
        Ok(self.open_handle(track, false))
    }

    fn open_fallback(&self, track: &Track) -> Result<Box<dyn PlayerHandle>> {
        if self.control.lock().unwrap().fail_fallback {
            return Err(Error::ResourceCreation("scripted fallback failure".into()));
        }
        Ok(self.open_handle(track, true))
    }
}

struct MockHandle {
    state: HandleRef,
}

impl PlayerHandle for MockHandle {
    fn prepare(&mut self, notifier: ResourceNotifier) -> Result<()> {
        self.state.lock().unwrap().notifier = Some(notifier);
        Ok(())
    }

    fn start(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing = true;
        state.started = true;
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn seek(&mut self, position_ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.position_ms = position_ms;
        state.seeks.push(position_ms);
    }

    fn release(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.released = true;
        state.playing = false;
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().unwrap().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }
}

/// Build a catalog of `durations.len()` tracks with the given durations
pub fn make_catalog(durations: &[u64]) -> Vec<Track> {
    durations
        .iter()
        .enumerate()
        .map(|(i, &duration_ms)| Track {
            id: i as i64,
            title: format!("Track {}", i),
            artist: format!("Artist {}", i),
            duration_ms,
            location: format!("/mock/{}.mp3", i),
        })
        .collect()
}

/// Fire the ready signal of a prepared mock handle
pub fn fire_ready(handle: &HandleRef) {
    let notifier = handle
        .lock()
        .unwrap()
        .notifier
        .clone()
        .expect("handle was never prepared");
    notifier.ready();
}

/// Fire the completion signal of a prepared mock handle
pub fn fire_completed(handle: &HandleRef) {
    let notifier = handle
        .lock()
        .unwrap()
        .notifier
        .clone()
        .expect("handle was never prepared");
    notifier.completed();
}

/// Fire the failure signal of a prepared mock handle
pub fn fire_failed(handle: &HandleRef, message: &str) {
    let notifier = handle
        .lock()
        .unwrap()
        .notifier
        .clone()
        .expect("handle was never prepared");
    notifier.failed(message);
}

/// Wait until the backend has opened (and prepared) `count` handles,
/// returning the most recent one
pub async fn wait_for_handles(control: &ControlRef, count: usize) -> HandleRef {
    let deadline = Duration::from_secs(2);
    let poll = Duration::from_millis(5);
    let waited = timeout(deadline, async {
        loop {
            {
                let guard = control.lock().unwrap();
                if guard.handles.len() >= count
                    && guard.handles[count - 1].lock().unwrap().notifier.is_some()
                {
                    return Arc::clone(&guard.handles[count - 1]);
                }
            }
            tokio::time::sleep(poll).await;
        }
    })
    .await;
    waited.unwrap_or_else(|_| panic!("backend never opened {} handles", count))
}

/// Wait until the controller reports the wanted status
pub async fn wait_for_status(controller: &PlaybackController, want: PlaybackStatus) {
    let deadline = Duration::from_secs(2);
    let poll = Duration::from_millis(5);
    let waited = timeout(deadline, async {
        loop {
            if controller.status().await == want {
                return;
            }
            tokio::time::sleep(poll).await;
        }
    })
    .await;
    waited.unwrap_or_else(|_| panic!("controller never reached status {}", want));
}

/// Receive the next event, panicking after two seconds
pub async fn next_event(rx: &mut broadcast::Receiver<PlayerEvent>) -> PlayerEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed or lagged")
}

/// Receive the next event matching the predicate, skipping others
pub async fn next_event_where<F>(rx: &mut broadcast::Receiver<PlayerEvent>, pred: F) -> PlayerEvent
where
    F: Fn(&PlayerEvent) -> bool,
{
    loop {
        let event = next_event(rx).await;
        if pred(&event) {
            return event;
        }
    }
}

/// Discard every event already queued on the receiver
pub fn drain_events(rx: &mut broadcast::Receiver<PlayerEvent>) {
    while rx.try_recv().is_ok() {}
}

/// Assert that no event at all arrives within the window
pub async fn assert_no_event(rx: &mut broadcast::Receiver<PlayerEvent>, window: Duration) {
    if let Ok(event) = timeout(window, rx.recv()).await {
        panic!("expected silence, got {:?}", event);
    }
}

/// Assert that no progress event arrives within the window (other event
/// kinds are allowed through)
pub async fn assert_no_progress(rx: &mut broadcast::Receiver<PlayerEvent>, window: Duration) {
    let result = timeout(window, async {
        loop {
            match rx.recv().await {
                Ok(PlayerEvent::ProgressUpdated { .. }) => return,
                Ok(_) => continue,
                Err(_) => std::future::pending::<()>().await,
            }
        }
    })
    .await;
    assert!(result.is_err(), "progress event arrived during quiet window");
}
