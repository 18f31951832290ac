use crate::audio::automation::GainLine;
use crate::audio::oscillator::Sine;
use crate::music::tone::{PitchKey, POOL_SLOTS};

struct Slot {
    osc: Sine,
    gain: GainLine,
}

/// Sixty always-running sine generators, one per pool pitch.
///
/// Nothing ever starts or stops a generator. Notes are purely gain shapes:
/// the scheduler writes events onto a slot's [`GainLine`] and the render
/// loop multiplies them in. Slots whose line has settled at silence skip
/// the sine evaluation but keep their phase moving, so the same pitch
/// re-entering later stays click-free.
pub struct SynthBank {
    sample_rate: f32,
    slots: Vec<Slot>,
}

impl SynthBank {
    pub fn new(sample_rate: f32) -> Self {
        let slots = (0..POOL_SLOTS)
            .map(|slot| Slot {
                osc: Sine::new(PitchKey::from_slot(slot).frequency()),
                gain: GainLine::new(),
            })
            .collect();
        Self { sample_rate, slots }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The gain line for `slot`, if it names a pool slot.
    pub fn gain_line_mut(&mut self, slot: usize) -> Option<&mut GainLine> {
        self.slots.get_mut(slot).map(|slot| &mut slot.gain)
    }

    /// Drop every pending event and silence every slot now.
    pub fn cancel_all(&mut self) {
        for slot in &mut self.slots {
            slot.gain.cancel();
        }
    }

    /// Mix this bank into `block`, whose first sample falls at playback
    /// time `start`. Adds on top of whatever the block already holds.
    pub fn render(&mut self, block: &mut [f32], start: f64) {
        let step = f64::from(self.sample_rate).recip();
        for slot in &mut self.slots {
            if slot.gain.is_silent() {
                slot.osc.skip(block.len(), self.sample_rate);
                continue;
            }
            let mut t = start;
            for sample in block.iter_mut() {
                *sample += slot.gain.level_at(t) * slot.osc.next_sample(self.sample_rate);
                t += step;
            }
        }
    }
}
