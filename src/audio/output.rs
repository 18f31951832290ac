//! Realtime output: a cpal stream fed through lock-free rings.
//!
//! The audio callback owns every [`SynthBank`] outright. The control side
//! talks to it only through single-producer single-consumer rings: one
//! system ring that installs new banks, one command ring per bank for gain
//! events, and a scope ring carrying rendered samples back out for display.
//! Nothing in the callback blocks or allocates once a bank is installed.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::audio::synth::SynthBank;
use crate::engine::backend::{PlaybackContext, ToneBank};
use crate::music::tone::POOL_SLOTS;
use crate::MAX_BLOCK_SIZE;

const SYSTEM_QUEUE_SIZE: usize = 16;

/// Gain events travelling from one track's scheduler to its bank.
enum BankCommand {
    Set { slot: usize, gain: f32, at: f64 },
    Ramp { slot: usize, gain: f32, at: f64 },
    CancelAll,
}

/// Rewiring requests for the callback itself.
enum SystemCommand {
    InstallBank {
        bank: SynthBank,
        commands: Consumer<BankCommand>,
    },
}

/// Ring sizes for the output stream.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputConfig {
    /// Capacity of each per-bank command ring. One scheduled note is four
    /// commands, so this bounds how many notes one tick can commit.
    pub command_capacity: usize,
    /// Capacity of the scope ring. Overruns drop samples, which only
    /// coarsens the display.
    pub scope_capacity: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            command_capacity: 256,
            scope_capacity: 4096,
        }
    }
}

#[derive(Debug)]
pub enum OutputError {
    NoDevice,
    DeviceConfig(cpal::DefaultStreamConfigError),
    BuildStream(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::NoDevice => write!(f, "no default output device"),
            OutputError::DeviceConfig(err) => write!(f, "querying device config: {err}"),
            OutputError::BuildStream(err) => write!(f, "building output stream: {err}"),
            OutputError::Play(err) => write!(f, "starting output stream: {err}"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::NoDevice => None,
            OutputError::DeviceConfig(err) => Some(err),
            OutputError::BuildStream(err) => Some(err),
            OutputError::Play(err) => Some(err),
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for OutputError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        OutputError::DeviceConfig(err)
    }
}

impl From<cpal::BuildStreamError> for OutputError {
    fn from(err: cpal::BuildStreamError) -> Self {
        OutputError::BuildStream(err)
    }
}

impl From<cpal::PlayStreamError> for OutputError {
    fn from(err: cpal::PlayStreamError) -> Self {
        OutputError::Play(err)
    }
}

/// State both sides read without locks. The master gain rides in an
/// AtomicU32 as raw f32 bits.
struct SharedClock {
    samples: AtomicU64,
    running: AtomicBool,
    master: AtomicU32,
}

/// Keeps the cpal stream alive. Dropping it stops audio.
///
/// Held separately from [`OutputHandle`] because the stream must stay on
/// the thread that built it while the handle moves freely.
pub struct OutputStream {
    _stream: cpal::Stream,
}

/// The control side of a running output stream.
pub struct OutputHandle {
    shared: Arc<SharedClock>,
    system_tx: Producer<SystemCommand>,
    sample_rate: f32,
    command_capacity: usize,
}

impl OutputHandle {
    /// The device sample rate the stream opened with.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Sends gain events for one installed bank.
struct BankHandle {
    tx: Producer<BankCommand>,
}

/// Reads rendered samples back out of the callback for display.
pub struct ScopeTap {
    rx: Consumer<f32>,
}

impl ScopeTap {
    /// Move every sample the callback has published since the last drain.
    pub fn drain_into(&mut self, out: &mut Vec<f32>) {
        while let Ok(sample) = self.rx.pop() {
            out.push(sample);
        }
    }
}

/// Open the default output device and start rendering.
///
/// The stream starts suspended in the sense that matters: the sample clock
/// holds at zero and the output is silence until a player resumes it.
pub fn open_output(
    config: &OutputConfig,
) -> Result<(OutputStream, OutputHandle, ScopeTap), OutputError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
    let stream_config = device.default_output_config()?;
    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;

    let shared = Arc::new(SharedClock {
        samples: AtomicU64::new(0),
        running: AtomicBool::new(false),
        master: AtomicU32::new(1.0f32.to_bits()),
    });

    let (system_tx, system_rx) = RingBuffer::new(SYSTEM_QUEUE_SIZE);
    let (scope_tx, scope_rx) = RingBuffer::new(config.scope_capacity);

    let callback_shared = Arc::clone(&shared);
    let stream = device.build_output_stream(
        &stream_config.into(),
        render_callback(callback_shared, system_rx, scope_tx, sample_rate, channels),
        |err| log::error!("output stream error: {err}"),
        None,
    )?;
    stream.play()?;

    let handle = OutputHandle {
        shared,
        system_tx,
        sample_rate,
        command_capacity: config.command_capacity,
    };
    Ok((
        OutputStream { _stream: stream },
        handle,
        ScopeTap { rx: scope_rx },
    ))
}

fn render_callback(
    shared: Arc<SharedClock>,
    mut system_rx: Consumer<SystemCommand>,
    mut scope_tx: Producer<f32>,
    sample_rate: f32,
    channels: usize,
) -> impl FnMut(&mut [f32], &cpal::OutputCallbackInfo) {
    let mut banks: Vec<(SynthBank, Consumer<BankCommand>)> = Vec::new();
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
        while let Ok(command) = system_rx.pop() {
            match command {
                SystemCommand::InstallBank { bank, commands } => banks.push((bank, commands)),
            }
        }
        for (bank, commands) in &mut banks {
            while let Ok(command) = commands.pop() {
                apply(bank, command);
            }
        }

        let running = shared.running.load(Ordering::Relaxed);
        let master = f32::from_bits(shared.master.load(Ordering::Relaxed));

        for frames in data.chunks_mut(channels * MAX_BLOCK_SIZE) {
            let frame_count = frames.len() / channels;
            let block = &mut mono[..frame_count];
            block.fill(0.0);

            if running {
                let start =
                    shared.samples.load(Ordering::Relaxed) as f64 / f64::from(sample_rate);
                for (bank, _) in &mut banks {
                    bank.render(block, start);
                }
                shared
                    .samples
                    .fetch_add(frame_count as u64, Ordering::Relaxed);
            }

            for (frame, sample) in frames.chunks_mut(channels).zip(block.iter()) {
                let value = (sample * master).clamp(-1.0, 1.0);
                for out in frame.iter_mut() {
                    *out = value;
                }
                let _ = scope_tx.push(value);
            }
        }
    }
}

fn apply(bank: &mut SynthBank, command: BankCommand) {
    match command {
        BankCommand::Set { slot, gain, at } => {
            if let Some(line) = bank.gain_line_mut(slot) {
                line.set_at(gain, at);
            }
        }
        BankCommand::Ramp { slot, gain, at } => {
            if let Some(line) = bank.gain_line_mut(slot) {
                line.ramp_to(gain, at);
            }
        }
        BankCommand::CancelAll => bank.cancel_all(),
    }
}

impl PlaybackContext for OutputHandle {
    fn now(&self) -> f64 {
        self.shared.samples.load(Ordering::Relaxed) as f64 / f64::from(self.sample_rate)
    }

    fn suspend(&mut self) {
        self.shared.running.store(false, Ordering::Relaxed);
    }

    fn resume(&mut self) {
        self.shared.running.store(true, Ordering::Relaxed);
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.shared.master.store(gain.to_bits(), Ordering::Relaxed);
    }

    fn create_bank(&mut self) -> Box<dyn ToneBank> {
        let (tx, rx) = RingBuffer::new(self.command_capacity);
        let bank = SynthBank::new(self.sample_rate);
        let install = SystemCommand::InstallBank {
            bank,
            commands: rx,
        };
        if self.system_tx.push(install).is_err() {
            log::warn!("system command ring full; new track will stay silent");
        }
        Box::new(BankHandle { tx })
    }
}

impl BankHandle {
    fn send(&mut self, command: BankCommand) {
        if self.tx.push(command).is_err() {
            log::warn!("bank command ring full; dropping gain event");
        }
    }
}

impl ToneBank for BankHandle {
    fn slots(&self) -> usize {
        POOL_SLOTS
    }

    fn set_gain_at(&mut self, slot: usize, gain: f32, at: f64) {
        self.send(BankCommand::Set { slot, gain, at });
    }

    fn ramp_gain_to(&mut self, slot: usize, gain: f32, at: f64) {
        self.send(BankCommand::Ramp { slot, gain, at });
    }

    fn cancel_scheduled(&mut self) {
        self.send(BankCommand::CancelAll);
    }
}
