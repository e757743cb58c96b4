//! Playback control
//!
//! The controller task owns all mutable playback state (catalog, queue
//! index, active player resource, status) and serializes transport
//! commands, backend signals, and progress ticks onto one task context.

pub mod controller;
pub mod session;
pub mod state;

pub use controller::PlaybackController;
pub use state::SharedPlayerState;
