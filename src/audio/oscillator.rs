use std::f32::consts::TAU;

/// Sine generator with normalized phase in [0, 1).
///
/// The generators in a bank never start or stop; phase accumulates for the
/// life of the bank and the gain line decides whether anything is heard.
#[derive(Debug, Clone)]
pub struct Sine {
    frequency: f32,
    phase: f32,
}

impl Sine {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce the sample at the current phase, then advance by one step.
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += self.frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Advance phase as if `samples` samples had been produced.
    ///
    /// Keeps silent generators phase-continuous without paying for the
    /// sine evaluations.
    pub fn skip(&mut self, samples: usize, sample_rate: f32) {
        self.phase = (self.phase + self.frequency * samples as f32 / sample_rate).fract();
    }
}
