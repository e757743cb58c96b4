//! Simulated player backend
//!
//! Timer-driven stand-in for a real decoder: a handle becomes ready
//! after a short prepare delay, advances its position in wall-clock time
//! while started, and signals completion when the track duration
//! elapses. No audio is decoded or rendered. Used by the demo binary.

use crate::backend::{PlayerBackend, PlayerHandle, ResourceNotifier};
use smp_common::{Error, Result, Track};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// How often the completion watcher samples the simulated position
const WATCH_INTERVAL: Duration = Duration::from_millis(100);

/// Backend producing [`SimHandle`]s
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    prepare_delay: Duration,
}

impl SimulatedBackend {
    pub fn new(prepare_delay: Duration) -> Self {
        Self { prepare_delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

impl PlayerBackend for SimulatedBackend {
    fn open(&self, track: &Track) -> Result<Box<dyn PlayerHandle>> {
        // Probe the location the way a real decoder would before
        // committing a resource to it.
        if !Path::new(&track.location).exists() {
            return Err(Error::ResourceCreation(format!(
                "no such location: {}",
                track.location
            )));
        }
        Ok(Box::new(SimHandle::new(track.duration_ms, self.prepare_delay)))
    }

    fn open_fallback(&self, track: &Track) -> Result<Box<dyn PlayerHandle>> {
        // Alternate strategy: take the raw path on faith.
        debug!(location = %track.location, "opening via raw path fallback");
        Ok(Box::new(SimHandle::new(track.duration_ms, self.prepare_delay)))
    }
}

#[derive(Debug)]
struct SimState {
    playing: bool,
    released: bool,
    /// Position accumulated before the current start
    base_ms: u64,
    started_at: Option<Instant>,
    duration_ms: u64,
}

impl SimState {
    fn position_ms(&self) -> u64 {
        let running = self
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        (self.base_ms + running).min(self.duration_ms)
    }
}

/// One simulated player resource
pub struct SimHandle {
    state: Arc<Mutex<SimState>>,
    prepare_delay: Duration,
}

impl SimHandle {
    fn new(duration_ms: u64, prepare_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                playing: false,
                released: false,
                base_ms: 0,
                started_at: None,
                duration_ms,
            })),
            prepare_delay,
        }
    }
}

impl PlayerHandle for SimHandle {
    fn prepare(&mut self, notifier: ResourceNotifier) -> Result<()> {
        let state = Arc::clone(&self.state);
        let delay = self.prepare_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if state.lock().expect("sim state poisoned").released {
                return;
            }
            notifier.ready();

            // Watch for natural completion until the handle is released.
            loop {
                tokio::time::sleep(WATCH_INTERVAL).await;
                let mut guard = state.lock().expect("sim state poisoned");
                if guard.released {
                    return;
                }
                if guard.playing && guard.position_ms() >= guard.duration_ms {
                    guard.playing = false;
                    guard.base_ms = guard.duration_ms;
                    guard.started_at = None;
                    drop(guard);
                    notifier.completed();
                    return;
                }
            }
        });

        Ok(())
    }

    fn start(&mut self) {
        let mut state = self.state.lock().expect("sim state poisoned");
        if !state.playing && !state.released {
            state.playing = true;
            state.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let mut state = self.state.lock().expect("sim state poisoned");
        if state.playing {
            state.base_ms = state.position_ms();
            state.playing = false;
            state.started_at = None;
        }
    }

    fn seek(&mut self, position_ms: u64) {
        let mut state = self.state.lock().expect("sim state poisoned");
        state.base_ms = position_ms.min(state.duration_ms);
        if state.playing {
            state.started_at = Some(Instant::now());
        }
    }

    fn release(&mut self) {
        let mut state = self.state.lock().expect("sim state poisoned");
        state.released = true;
        state.playing = false;
        state.started_at = None;
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().expect("sim state poisoned").position_ms()
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().expect("sim state poisoned").duration_ms
    }

    fn is_playing(&self) -> bool {
        self.state.lock().expect("sim state poisoned").playing
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        // Ends the watcher task even if the owner forgot to release.
        self.release();
    }
}
