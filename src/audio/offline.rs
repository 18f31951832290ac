//! Offline rendering: the realtime backend's semantics without a device.
//!
//! The caller pulls blocks out by hand and the playback clock advances
//! exactly as far as they pull. Useful for tests and for bouncing a song
//! to a buffer faster than realtime.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::audio::synth::SynthBank;
use crate::engine::backend::{PlaybackContext, ToneBank};
use crate::music::tone::POOL_SLOTS;

// A poisoned lock here only means a panic elsewhere already sank the test
// or bounce; the state itself is still coherent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

struct OfflineState {
    sample_rate: f32,
    samples: u64,
    running: bool,
    master: f32,
    banks: Vec<Arc<Mutex<SynthBank>>>,
}

/// A deviceless audio backend under a simulated clock.
pub struct OfflineAudio {
    inner: Arc<Mutex<OfflineState>>,
}

impl OfflineAudio {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OfflineState {
                sample_rate,
                samples: 0,
                running: false,
                master: 1.0,
                banks: Vec::new(),
            })),
        }
    }

    /// A playback context over this backend, for handing to a player.
    pub fn context(&self) -> Box<dyn PlaybackContext> {
        Box::new(OfflineContextHandle {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Render the next block into `out` and advance the clock by its
    /// length. While suspended the block is silence and the clock holds.
    pub fn render(&self, out: &mut [f32]) {
        out.fill(0.0);
        let (banks, start, master) = {
            let mut state = lock(&self.inner);
            if !state.running {
                return;
            }
            let start = state.samples as f64 / f64::from(state.sample_rate);
            state.samples += out.len() as u64;
            (state.banks.clone(), start, state.master)
        };

        for bank in &banks {
            lock(bank).render(out, start);
        }
        for sample in out.iter_mut() {
            *sample = (*sample * master).clamp(-1.0, 1.0);
        }
    }

    /// The simulated playback clock in seconds.
    pub fn now(&self) -> f64 {
        let state = lock(&self.inner);
        state.samples as f64 / f64::from(state.sample_rate)
    }
}

struct OfflineContextHandle {
    inner: Arc<Mutex<OfflineState>>,
}

impl PlaybackContext for OfflineContextHandle {
    fn now(&self) -> f64 {
        let state = lock(&self.inner);
        state.samples as f64 / f64::from(state.sample_rate)
    }

    fn suspend(&mut self) {
        lock(&self.inner).running = false;
    }

    fn resume(&mut self) {
        lock(&self.inner).running = true;
    }

    fn set_master_gain(&mut self, gain: f32) {
        lock(&self.inner).master = gain;
    }

    fn create_bank(&mut self) -> Box<dyn ToneBank> {
        let mut state = lock(&self.inner);
        let bank = Arc::new(Mutex::new(SynthBank::new(state.sample_rate)));
        state.banks.push(Arc::clone(&bank));
        Box::new(OfflineBank { bank })
    }
}

struct OfflineBank {
    bank: Arc<Mutex<SynthBank>>,
}

impl ToneBank for OfflineBank {
    fn slots(&self) -> usize {
        POOL_SLOTS
    }

    fn set_gain_at(&mut self, slot: usize, gain: f32, at: f64) {
        if let Some(line) = lock(&self.bank).gain_line_mut(slot) {
            line.set_at(gain, at);
        }
    }

    fn ramp_gain_to(&mut self, slot: usize, gain: f32, at: f64) {
        if let Some(line) = lock(&self.bank).gain_line_mut(slot) {
            line.ramp_to(gain, at);
        }
    }

    fn cancel_scheduled(&mut self) {
        lock(&self.bank).cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A_SLOT: usize = 24;

    fn rms(block: &[f32]) -> f32 {
        let sum: f32 = block.iter().map(|s| s * s).sum();
        (sum / block.len() as f32).sqrt()
    }

    #[test]
    fn test_clock_advances_only_while_running() {
        let audio = OfflineAudio::new(1000.0);
        let mut ctx = audio.context();
        let mut block = vec![0.0; 500];

        audio.render(&mut block);
        assert_eq!(audio.now(), 0.0);

        ctx.resume();
        audio.render(&mut block);
        assert!((audio.now() - 0.5).abs() < 1e-9);

        ctx.suspend();
        audio.render(&mut block);
        assert!((audio.now() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_scheduled_note_is_audible_and_master_scales_it() {
        let audio = OfflineAudio::new(1000.0);
        let mut ctx = audio.context();
        let mut bank = ctx.create_bank();
        bank.set_gain_at(A_SLOT, 1.0, 0.0);
        ctx.resume();

        let mut block = vec![0.0; 200];
        audio.render(&mut block);
        let loud = rms(&block);
        assert!(loud > 0.5);

        ctx.set_master_gain(0.25);
        audio.render(&mut block);
        assert!((rms(&block) - loud * 0.25).abs() < 0.05);
    }

    #[test]
    fn test_cancel_scheduled_silences_pending_notes() {
        let audio = OfflineAudio::new(1000.0);
        let mut ctx = audio.context();
        let mut bank = ctx.create_bank();
        bank.set_gain_at(A_SLOT, 1.0, 0.0);
        bank.cancel_scheduled();
        ctx.resume();

        let mut block = vec![0.0; 100];
        audio.render(&mut block);
        assert!(block.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_banks_mix_additively() {
        let audio = OfflineAudio::new(1000.0);
        let mut ctx = audio.context();
        let mut first = ctx.create_bank();
        let mut second = ctx.create_bank();
        first.set_gain_at(A_SLOT, 1.0, 0.0);
        second.set_gain_at(A_SLOT, 1.0, 0.0);
        ctx.resume();

        // Identical phase-locked tones double the amplitude, up to the
        // output clamp.
        let mut block = vec![0.0; 50];
        audio.render(&mut block);
        assert!(block.iter().any(|s| s.abs() > 1.0 - 1e-6));
    }
}
