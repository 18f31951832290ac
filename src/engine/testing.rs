//! Shared fakes for engine unit tests: a bank that records its calls and a
//! context whose clock the test advances by hand.

use std::sync::{Arc, Mutex};

use crate::engine::backend::{PlaybackContext, ToneBank};
use crate::music::tone::POOL_SLOTS;

/// Everything a bank was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GainCall {
    Set { slot: usize, gain: f32, at: f64 },
    Ramp { slot: usize, gain: f32, at: f64 },
    Cancel,
}

pub(crate) type BankLog = Arc<Mutex<Vec<GainCall>>>;

pub(crate) struct RecordingBank {
    log: BankLog,
}

impl RecordingBank {
    pub(crate) fn new() -> (Box<dyn ToneBank>, BankLog) {
        let log: BankLog = Arc::new(Mutex::new(Vec::new()));
        (Box::new(RecordingBank { log: Arc::clone(&log) }), log)
    }
}

impl ToneBank for RecordingBank {
    fn slots(&self) -> usize {
        POOL_SLOTS
    }

    fn set_gain_at(&mut self, slot: usize, gain: f32, at: f64) {
        self.log.lock().unwrap().push(GainCall::Set { slot, gain, at });
    }

    fn ramp_gain_to(&mut self, slot: usize, gain: f32, at: f64) {
        self.log.lock().unwrap().push(GainCall::Ramp { slot, gain, at });
    }

    fn cancel_scheduled(&mut self) {
        self.log.lock().unwrap().push(GainCall::Cancel);
    }
}

/// Observable state of the fake context, shared with the test.
#[derive(Debug, Default)]
pub(crate) struct ContextState {
    pub now: f64,
    pub running: bool,
    /// Every master gain value ever set, in order.
    pub master: Vec<f32>,
    /// The call log of each bank created through the context.
    pub banks: Vec<BankLog>,
}

pub(crate) struct ManualContext {
    state: Arc<Mutex<ContextState>>,
}

impl ManualContext {
    pub(crate) fn new() -> (Box<dyn PlaybackContext>, Arc<Mutex<ContextState>>) {
        let state = Arc::new(Mutex::new(ContextState::default()));
        (
            Box::new(ManualContext { state: Arc::clone(&state) }),
            state,
        )
    }
}

impl PlaybackContext for ManualContext {
    fn now(&self) -> f64 {
        self.state.lock().unwrap().now
    }

    fn suspend(&mut self) {
        self.state.lock().unwrap().running = false;
    }

    fn resume(&mut self) {
        self.state.lock().unwrap().running = true;
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.state.lock().unwrap().master.push(gain);
    }

    fn create_bank(&mut self) -> Box<dyn ToneBank> {
        let (bank, log) = RecordingBank::new();
        self.state.lock().unwrap().banks.push(log);
        bank
    }
}
