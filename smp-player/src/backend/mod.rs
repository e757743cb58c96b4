//! Player backend capability traits
//!
//! The controller never decodes or renders audio itself; it drives an
//! opaque player resource through these traits. A backend opens handles,
//! a handle controls one loaded track and reports readiness, completion,
//! and errors asynchronously through a [`ResourceNotifier`].

mod notifier;
mod sim;

pub use notifier::{ResourceNotifier, ResourceSignal};
pub use sim::SimulatedBackend;

use smp_common::{Result, Track};

/// Factory for player resources.
///
/// `open` is the primary load strategy. When it fails, the controller
/// retries exactly once with `open_fallback`, the alternate strategy
/// that reads the raw location path directly.
pub trait PlayerBackend: Send + 'static {
    /// Open a player handle for the track's location
    fn open(&self, track: &Track) -> Result<Box<dyn PlayerHandle>>;

    /// Alternate load strategy using the raw location path
    fn open_fallback(&self, track: &Track) -> Result<Box<dyn PlayerHandle>>;
}

/// One loaded player resource.
///
/// At most one live handle exists at any instant; the controller fully
/// releases the previous handle before opening a new one. All control
/// calls are cheap and non-blocking; readiness arrives later via the
/// notifier passed to [`PlayerHandle::prepare`].
pub trait PlayerHandle: Send {
    /// Begin asynchronous preparation.
    ///
    /// The backend must deliver exactly one `Ready` or `Failed` signal
    /// through the notifier, and a `Completed` signal when playback of
    /// the loaded track reaches its natural end.
    fn prepare(&mut self, notifier: ResourceNotifier) -> Result<()>;

    /// Start or resume playback
    fn start(&mut self);

    /// Pause playback, retaining position
    fn pause(&mut self);

    /// Seek to an absolute position in milliseconds
    fn seek(&mut self, position_ms: u64);

    /// Release the underlying resource; the handle is dead afterwards
    fn release(&mut self);

    /// Current playback position in milliseconds
    fn position_ms(&self) -> u64;

    /// Total duration of the loaded track in milliseconds
    fn duration_ms(&self) -> u64;

    /// Whether the resource is currently producing audio
    fn is_playing(&self) -> bool;
}
