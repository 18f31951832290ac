//! TUI for tunebox
//!
//! Shows the transport, an oscilloscope over the output, and a spectrum,
//! and drives the player from the keyboard.

mod spectrum;
mod transport;
mod waveform;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use tunebox::audio::output::ScopeTap;
use tunebox::engine::Player;

use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats, TransportSnapshot};
use waveform::render_waveform;

/// Samples kept for visualization; also the FFT size.
const VIS_BUFFER_SIZE: usize = 1024;

const VOLUME_STEP: f32 = 0.1;

/// UI application state
pub struct UiApp {
    player: Arc<Mutex<Player>>,
    scope: ScopeTap,
    audio_buffer: Vec<f32>,
    analyzer: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(player: Arc<Mutex<Player>>, scope: ScopeTap, sample_rate: f32) -> Self {
        Self {
            player,
            scope,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            analyzer: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            should_quit: false,
        }
    }

    /// Run the UI event loop until quit.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.analyzer.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking input at roughly 60 fps.
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Pull fresh samples off the scope ring, keeping the newest
    /// VIS_BUFFER_SIZE of them.
    fn poll_audio(&mut self) {
        self.scope.drain_into(&mut self.audio_buffer);
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.with_player(|player| player.toggle_play()),
            KeyCode::Char('r') | KeyCode::Char('R') => self.with_player(|player| player.reset()),
            KeyCode::Char('m') | KeyCode::Char('M') => self.with_player(|player| {
                if player.is_muted() {
                    player.unmute();
                } else {
                    player.mute();
                }
            }),
            KeyCode::Char('-') => self.with_player(|player| {
                let volume = player.volume();
                player.set_volume(volume - VOLUME_STEP);
            }),
            KeyCode::Char('=') | KeyCode::Char('+') => self.with_player(|player| {
                let volume = player.volume();
                player.set_volume(volume + VOLUME_STEP);
            }),
            _ => {}
        }
    }

    fn with_player(&self, action: impl FnOnce(&mut Player)) {
        if let Ok(mut player) = self.player.lock() {
            action(&mut player);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(10), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let snapshot = TransportSnapshot::read(&self.player);
        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &snapshot, &stats);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.analyzer.data());

        let help = Paragraph::new(
            " [Q] Quit  [Space] Play/Pause  [R] Reset  [M] Mute  [-/=] Volume",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
