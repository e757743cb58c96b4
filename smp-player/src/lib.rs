//! SMP playback service
//!
//! Owns the playback controller (queue index, active player resource,
//! play/pause status, progress ticking) behind a small async transport
//! API, plus the backend capability traits the controller drives and a
//! folder scanner that builds catalogs for the demo host.

pub mod backend;
pub mod catalog;
pub mod playback;

pub use backend::{PlayerBackend, PlayerHandle, ResourceNotifier, SimulatedBackend};
pub use playback::controller::PlaybackController;
