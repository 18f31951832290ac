//! The seam between scheduling and sound production.
//!
//! Everything the player needs from an audio backend fits in two traits: a
//! per-track bank of tone generators whose gains can be scheduled, and the
//! playback context that owns the shared clock and the master gain. The
//! real-time implementation forwards calls over wait-free rings into the
//! device callback; the offline implementation applies them directly.

/// Scheduled gain control over one track's pool of tone generators.
///
/// Calls are fire-and-forget writes into the real-time domain; nothing is
/// ever read back. Within a slot, event times are non-decreasing between
/// cancels, which the scheduler guarantees by walking each track forward.
pub trait ToneBank: Send {
    /// Number of generator slots in the pool.
    fn slots(&self) -> usize;

    /// Jump the slot's gain to `gain` at clock time `at`.
    fn set_gain_at(&mut self, slot: usize, gain: f32, at: f64);

    /// Ramp the slot's gain linearly, arriving at `gain` at clock time `at`.
    fn ramp_gain_to(&mut self, slot: usize, gain: f32, at: f64);

    /// Drop every pending gain event on every slot and silence the pool.
    fn cancel_scheduled(&mut self);
}

/// The clock and output mix shared by every track of one player.
pub trait PlaybackContext: Send {
    /// Present time of the playback clock, in seconds.
    fn now(&self) -> f64;

    /// Freeze the clock. Pending gain events hold their times and resume
    /// exactly where they left off.
    fn suspend(&mut self);

    /// Let the clock run again from where it stopped.
    fn resume(&mut self);

    /// Gain applied after mixing all banks, in [0, 1]. Takes effect
    /// immediately, not at a scheduled time.
    fn set_master_gain(&mut self, gain: f32);

    /// Build a new bank of generator slots rendered under this clock.
    fn create_bank(&mut self) -> Box<dyn ToneBank>;
}
