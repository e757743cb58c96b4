//! Shared types for SMP (Simple Media Player)
//!
//! This crate holds the vocabulary shared between the playback controller
//! and its hosts: track and catalog types, playback status, the event
//! types emitted to subscribers, error types, and configuration loading.
//!
//! It deliberately contains no async machinery and no platform code so
//! that hosts on any runtime can consume the types directly.

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod types;

pub use error::{Error, Result};
pub use events::PlayerEvent;
pub use types::{Catalog, PlaybackStatus, Track};
