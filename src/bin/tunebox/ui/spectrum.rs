//! Spectrum widget
//!
//! FFT magnitudes sampled at log-spaced frequencies, plotted evenly so the
//! low octaves get as much room as the high ones.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Displayed frequency bins.
const BINS: usize = 56;

/// Lowest displayed frequency in Hz.
const LOW_HZ: f64 = 30.0;

const FLOOR_DB: f64 = -90.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    bin_indices: Vec<usize>,
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Periodic Hann window.
        let window = (0..fft_size)
            .map(|i| {
                let phase = std::f32::consts::TAU * i as f32 / fft_size as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        // One FFT bin per displayed point, log-spaced up to Nyquist.
        let nyquist = (f64::from(sample_rate) / 2.0).max(1.0);
        let low = LOW_HZ.min(nyquist);
        let half = (fft_size / 2).max(1);
        let bin_indices = (0..BINS)
            .map(|i| {
                let t = i as f64 / (BINS - 1) as f64;
                let freq = low * (nyquist / low).powf(t);
                let index = (freq * fft_size as f64 / f64::from(sample_rate)).round() as usize;
                index.min(half - 1)
            })
            .collect();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            bin_indices,
            points: (0..BINS).map(|i| (i as f64, FLOOR_DB)).collect(),
        }
    }

    /// Recompute magnitudes from the latest visualization buffer.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for (slot, (&sample, &window)) in self
            .scratch
            .iter_mut()
            .zip(buffer.iter().zip(self.window.iter()))
        {
            slot.re = sample * window;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        for (point, &index) in self.points.iter_mut().zip(self.bin_indices.iter()) {
            let bin = self.scratch[index];
            let power = f64::from(bin.re * bin.re + bin.im * bin.im).max(1e-12);
            point.1 = (10.0 * power.log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, (BINS - 1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 10.0])
                .labels(vec!["-90", "-50", "-10"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
