//! Scheduling and transport: the control half of the crate.
//!
//! The engine never touches samples. It resolves what to play into gain
//! events on an abstract [`ToneBank`], stamped with playback-clock times a
//! short lookahead ahead of now. The audio half consumes those events on
//! its own clock.

/// Backend traits the engine schedules against.
pub mod backend;
/// Background thread that drives the tick.
pub mod conductor;
/// Tracks, transport, and the authoring API.
pub mod player;
/// The lookahead scheduling pass.
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{PlaybackContext, ToneBank};
pub use conductor::Conductor;
pub use player::{EngineConfig, PlayState, Player};
pub use scheduler::ScheduleError;
