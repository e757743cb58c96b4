//! Playback controller
//!
//! Public transport handle plus the task that owns the session. All
//! state mutation happens on one spawned task: transport commands from
//! hosts, asynchronous resource signals from the backend, and progress
//! ticks are serialized through a single `select!` loop, so a late
//! callback can never race a transport call.
//!
//! Every load attempt is tagged with a generation number. Signals whose
//! generation no longer matches the session are stale (their resource
//! has been superseded or released) and are discarded.

use crate::backend::{PlayerBackend, PlayerHandle, ResourceNotifier, ResourceSignal};
use crate::playback::session::PlaybackSession;
use crate::playback::state::SharedPlayerState;
use smp_common::config::PlayerConfig;
use smp_common::{PlaybackStatus, PlayerEvent, Result, Track};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Transport commands from hosts to the controller task
#[derive(Debug)]
enum Command {
    SetCatalog(Vec<Track>),
    PlayAt(usize),
    TogglePlayPause,
    PlayNext,
    PlayPrevious,
    SeekTo(u64),
    Shutdown,
}

/// Handle to a running playback controller.
///
/// Transport operations return immediately; completion is observed
/// through events and the state snapshot. Failures never propagate to
/// callers (they are logged and surfaced as state transitions).
pub struct PlaybackController {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state: SharedPlayerState,
    task: tokio::task::JoinHandle<()>,
}

impl PlaybackController {
    /// Spawn the controller task over the given backend
    pub fn spawn(backend: Box<dyn PlayerBackend>, config: PlayerConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let state = SharedPlayerState::new(config.event_channel_capacity);

        let task_state = state.clone();
        let tick_every = Duration::from_millis(config.tick_interval_ms.max(1));
        let task = tokio::spawn(async move {
            ControllerTask {
                backend,
                session: PlaybackSession::new(),
                state: task_state,
                cmd_rx,
                signal_rx,
                signal_tx,
                tick_every,
                ticker: None,
            }
            .run()
            .await;
        });

        Self { cmd_tx, state, task }
    }

    /// Replace the catalog; stops playback and resets to idle
    pub fn set_catalog(&self, tracks: Vec<Track>) {
        self.send(Command::SetCatalog(tracks));
    }

    /// Load and play the track at `index`
    pub fn play_at(&self, index: usize) {
        self.send(Command::PlayAt(index));
    }

    /// Pause if playing, resume if paused; no-op otherwise
    pub fn toggle_play_pause(&self) {
        self.send(Command::TogglePlayPause);
    }

    /// Advance to the next track, wrapping past the end
    pub fn play_next(&self) {
        self.send(Command::PlayNext);
    }

    /// Go back to the previous track, wrapping from the start
    pub fn play_previous(&self) {
        self.send(Command::PlayPrevious);
    }

    /// Seek the active resource to an absolute position
    pub fn seek_to(&self, position_ms: u64) {
        self.send(Command::SeekTo(position_ms));
    }

    /// Subscribe to controller events
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.state.subscribe_events()
    }

    /// Current playback status
    pub async fn status(&self) -> PlaybackStatus {
        self.state.status().await
    }

    /// Currently selected catalog index
    pub async fn current_index(&self) -> Option<usize> {
        self.state.current_index().await
    }

    /// Currently selected track
    pub async fn current_track(&self) -> Option<Track> {
        self.state.current_track().await
    }

    /// Last reported (position, duration) in milliseconds
    pub async fn position(&self) -> (u64, u64) {
        self.state.position().await
    }

    /// Stop the controller, releasing the active resource
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            warn!("controller task did not shut down cleanly: {}", e);
        }
    }

    fn send(&self, command: Command) {
        if self.cmd_tx.send(command).is_err() {
            warn!("controller task is gone, dropping command");
        }
    }
}

/// What the select loop resolved to on one iteration
enum Step {
    Command(Option<Command>),
    Signal(ResourceSignal),
    Tick,
}

struct ControllerTask {
    backend: Box<dyn PlayerBackend>,
    session: PlaybackSession,
    state: SharedPlayerState,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    signal_rx: mpsc::UnboundedReceiver<ResourceSignal>,
    signal_tx: mpsc::UnboundedSender<ResourceSignal>,
    tick_every: Duration,
    /// Present only while status is Playing
    ticker: Option<Interval>,
}

impl ControllerTask {
    async fn run(mut self) {
        debug!("playback controller task started");
        loop {
            let step = tokio::select! {
                cmd = self.cmd_rx.recv() => Step::Command(cmd),
                Some(sig) = self.signal_rx.recv() => Step::Signal(sig),
                _ = Self::next_tick(&mut self.ticker) => Step::Tick,
            };

            match step {
                Step::Command(None) | Step::Command(Some(Command::Shutdown)) => break,
                Step::Command(Some(cmd)) => self.handle_command(cmd).await,
                Step::Signal(sig) => self.handle_signal(sig).await,
                Step::Tick => self.on_tick().await,
            }
        }

        self.ticker = None;
        self.session.release_active();
        self.state.set_status(PlaybackStatus::Idle).await;
        info!("playback controller task stopped");
    }

    /// Resolves on the next progress tick; pends forever while not ticking
    async fn next_tick(ticker: &mut Option<Interval>) {
        match ticker {
            Some(active) => {
                active.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetCatalog(tracks) => self.set_catalog(tracks).await,
            Command::PlayAt(index) => self.play_at(index).await,
            Command::TogglePlayPause => self.toggle_play_pause().await,
            Command::PlayNext => self.play_adjacent(true).await,
            Command::PlayPrevious => self.play_adjacent(false).await,
            Command::SeekTo(position_ms) => self.seek_to(position_ms),
            Command::Shutdown => unreachable!("handled in run loop"),
        }
    }

    async fn set_catalog(&mut self, tracks: Vec<Track>) {
        info!("replacing catalog: {} tracks", tracks.len());
        self.ticker = None;
        self.session.release_active();
        self.session.replace_catalog(tracks);
        self.state.set_status(PlaybackStatus::Idle).await;
        self.state.set_current(None, None).await;
        self.state.set_position(0, 0).await;
    }

    async fn play_at(&mut self, index: usize) {
        let len = self.session.catalog.len();
        if index >= len {
            error!(index, len, "rejecting play request: index out of range");
            return;
        }

        // Cancel ticking and any pending ready continuation, then make
        // sure the old resource is fully released before a new one exists.
        self.ticker = None;
        self.session.release_active();
        self.session.generation += 1;

        let track = self.session.catalog[index].clone();
        info!(index, title = %track.title, "loading track");

        self.session.current_index = Some(index);
        self.session.status = PlaybackStatus::Loading;
        self.state.set_status(PlaybackStatus::Loading).await;
        self.state.set_current(Some(index), Some(track.clone())).await;
        self.state.set_position(0, track.duration_ms).await;

        let notifier = ResourceNotifier::new(self.session.generation, self.signal_tx.clone());

        match self.try_load(&track, notifier.clone(), false) {
            Ok(handle) => self.session.active = Some(handle),
            Err(primary_err) => {
                warn!(title = %track.title, "primary load failed ({}), trying raw path", primary_err);
                match self.try_load(&track, notifier, true) {
                    Ok(handle) => self.session.active = Some(handle),
                    Err(fallback_err) => {
                        error!(title = %track.title, "fallback load also failed: {}", fallback_err);
                        self.enter_error_state().await;
                    }
                }
            }
        }
    }

    fn try_load(
        &mut self,
        track: &Track,
        notifier: ResourceNotifier,
        fallback: bool,
    ) -> Result<Box<dyn PlayerHandle>> {
        let mut handle = if fallback {
            self.backend.open_fallback(track)?
        } else {
            self.backend.open(track)?
        };
        handle.prepare(notifier)?;
        Ok(handle)
    }

    async fn toggle_play_pause(&mut self) {
        let Some(handle) = self.session.active.as_mut() else {
            debug!("toggle ignored: no active resource");
            return;
        };

        match self.session.status {
            PlaybackStatus::Playing => {
                handle.pause();
                self.session.status = PlaybackStatus::Paused;
                self.ticker = None;
                self.state.set_status(PlaybackStatus::Paused).await;
                self.state
                    .broadcast_event(PlayerEvent::PlaybackStateChanged { playing: false });
                info!("paused");
            }
            PlaybackStatus::Paused => {
                handle.start();
                self.session.status = PlaybackStatus::Playing;
                self.start_ticker();
                self.state.set_status(PlaybackStatus::Playing).await;
                self.state
                    .broadcast_event(PlayerEvent::PlaybackStateChanged { playing: true });
                info!("resumed");
            }
            status => debug!(%status, "toggle ignored in this status"),
        }
    }

    async fn play_adjacent(&mut self, forward: bool) {
        let target = if forward {
            self.session.next_index()
        } else {
            self.session.previous_index()
        };
        match target {
            Some(index) => self.play_at(index).await,
            None => debug!("catalog empty, skip ignored"),
        }
    }

    fn seek_to(&mut self, position_ms: u64) {
        match self.session.active.as_mut() {
            Some(handle) => {
                debug!(position_ms, "seeking");
                handle.seek(position_ms);
            }
            None => debug!("seek ignored: no active resource"),
        }
    }

    async fn handle_signal(&mut self, signal: ResourceSignal) {
        if signal.generation() != self.session.generation {
            debug!(
                signal_generation = signal.generation(),
                current_generation = self.session.generation,
                "discarding stale resource signal"
            );
            return;
        }

        match signal {
            ResourceSignal::Ready { .. } => self.on_ready().await,
            ResourceSignal::Completed { .. } => {
                info!("track completed, advancing");
                self.play_adjacent(true).await;
            }
            ResourceSignal::Failed { message, .. } => {
                error!("resource reported failure: {}", message);
                self.enter_error_state().await;
            }
        }
    }

    async fn on_ready(&mut self) {
        if self.session.status != PlaybackStatus::Loading {
            warn!(status = %self.session.status, "unexpected ready signal, ignoring");
            return;
        }
        let Some(handle) = self.session.active.as_mut() else {
            warn!("ready signal without an active resource, ignoring");
            return;
        };

        handle.start();
        self.session.status = PlaybackStatus::Playing;
        self.start_ticker();
        self.state.set_status(PlaybackStatus::Playing).await;

        if let Some(track) = self.session.current_track().cloned() {
            info!(title = %track.title, "playing");
            self.state
                .broadcast_event(PlayerEvent::TrackChanged { track });
        }
        self.state
            .broadcast_event(PlayerEvent::PlaybackStateChanged { playing: true });
    }

    async fn on_tick(&mut self) {
        if self.session.status != PlaybackStatus::Playing {
            self.ticker = None;
            return;
        }
        let Some(handle) = self.session.active.as_ref() else {
            self.ticker = None;
            return;
        };

        if handle.is_playing() {
            let position_ms = handle.position_ms();
            let duration_ms = handle.duration_ms();
            self.state.set_position(position_ms, duration_ms).await;
            self.state.broadcast_event(PlayerEvent::ProgressUpdated {
                position_ms,
                duration_ms,
            });
        }
    }

    /// Unrecoverable failure: release the resource, stop ticking, and
    /// let subscribers render a stopped state.
    async fn enter_error_state(&mut self) {
        self.ticker = None;
        self.session.release_active();
        self.session.status = PlaybackStatus::Error;
        self.state.set_status(PlaybackStatus::Error).await;
        self.state
            .broadcast_event(PlayerEvent::PlaybackStateChanged { playing: false });
    }

    fn start_ticker(&mut self) {
        let mut ticker = interval(self.tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }
}
