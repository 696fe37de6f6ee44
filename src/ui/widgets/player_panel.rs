// src/ui/widgets/player_panel.rs
//! Player information panel widget.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::PlaybackState;
use crate::audio::{TrackInfo, TrackMetadata};

/// What the panel shows for the current tick.
pub struct PanelInfo<'a> {
    pub track: Option<&'a TrackInfo>,
    pub metadata: Option<&'a TrackMetadata>,
    pub state: PlaybackState,
    pub position: f64,
    pub length: f64,
    pub volume: f32,
}

/// `mm:ss` for a number of seconds.
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Render the player information panel and return the timeline area,
/// which maps clicks to seek positions.
pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, info: &PanelInfo<'_>) -> Rect {
    f.render_widget(Block::default().borders(Borders::ALL).title("2: Player"), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    match info.track {
        Some(track) => {
            lines.push(Line::from(Span::styled(
                track.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if let Some(artist) = &track.artist {
                lines.push(Line::from(artist.clone()));
            }
            if let Some(meta) = info.metadata {
                lines.push(Line::from(""));
                for (k, v) in &meta.properties {
                    lines.push(Line::from(format!("{}: {}", k, v)));
                }
            }
        }
        None if info.state == PlaybackState::StoppedAtEnd => {
            lines.push(Line::from("End of list"));
        }
        None => {
            lines.push(Line::from("No track playing - drop or paste an audio file"));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner[0]);

    // Playback control buttons
    let play_pause_icon = match info.state {
        PlaybackState::Playing => Span::styled(" ⏸ ", Style::default().fg(Color::Green)),
        PlaybackState::Paused => Span::styled(" ⏵ ", Style::default().fg(Color::Yellow)),
        _ => Span::styled(" ⏵ ", Style::default().fg(Color::Gray)),
    };

    let controls = Line::from(vec![
        Span::styled(" ⏮ ", Style::default().fg(Color::Cyan)), // Previous (p/←)
        Span::raw(" "),
        Span::styled(" ⏹ ", Style::default().fg(Color::Red)), // Stop (s)
        Span::raw(" "),
        play_pause_icon, // Play/Pause (space)
        Span::raw(" "),
        Span::styled(" ⏭ ", Style::default().fg(Color::Cyan)), // Next (n/→)
        Span::raw(format!("   vol {:>3.0}%", info.volume * 100.0)),
    ]);

    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        inner[1],
    );

    // Progress bar with time display
    let ratio = if info.length > 0.0 {
        (info.position / info.length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_label = format!("{} / {}", format_time(info.position), format_time(info.length));

    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(ratio)
            .label(time_label),
        inner[2],
    );
    inner[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(61.9), "01:01");
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }
}
