//! Transport bar widget - play state, position, volume, and level meters

use std::sync::{Arc, Mutex};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tunebox::engine::{PlayState, Player};

/// Everything the bar renders, read out of the player in one lock.
pub struct TransportSnapshot {
    pub state: PlayState,
    pub position: f64,
    pub volume: f32,
    pub muted: bool,
    /// Per track: seconds into the current loop pass, loop length.
    pub progress: Vec<(f64, f64)>,
    pub bpm: f64,
}

impl TransportSnapshot {
    pub fn read(player: &Arc<Mutex<Player>>) -> Self {
        let player = player.lock().unwrap();
        let position = player.position();
        let progress = player
            .track_ids()
            .map(|id| {
                let length = player.track_duration(id);
                let into = if length > 0.0 { position % length } else { 0.0 };
                (into, length)
            })
            .collect();
        Self {
            state: player.state(),
            position,
            volume: player.volume(),
            muted: player.is_muted(),
            progress,
            bpm: player.config().tempo.0,
        }
    }
}

/// Peak and RMS over the visualization buffer.
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let power: f32 = buffer.iter().map(|&x| x * x).sum();
        Self {
            peak,
            rms: (power / buffer.len() as f32).sqrt(),
        }
    }
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    snapshot: &TransportSnapshot,
    stats: &AudioStats,
) {
    let block = Block::default().title(" tunebox ").borders(Borders::ALL);

    let (symbol, label, color) = match snapshot.state {
        PlayState::Playing => ("▶", "Playing", Color::Green),
        PlayState::Paused => ("⏸", "Paused", Color::Yellow),
        PlayState::Stopped => ("■", "Stopped", Color::DarkGray),
    };

    let volume = if snapshot.muted {
        "Muted".to_string()
    } else {
        format!("Vol {:3.0}%", snapshot.volume * 100.0)
    };

    let mut spans = vec![
        Span::styled(
            format!(" BPM: {:.0}  ", snapshot.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("{:7.2}s  ", snapshot.position),
            Style::default().fg(Color::White),
        ),
        Span::styled(volume + "  ", Style::default().fg(Color::White)),
    ];
    for (i, (into, length)) in snapshot.progress.iter().enumerate() {
        spans.push(Span::styled(
            format!("T{i} {into:.1}/{length:.1}s  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
