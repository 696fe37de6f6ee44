// src/ui/widgets/track_list.rs
//! Track list widget for the current directory.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::fs::TrackList;

/// Render the tracks of the playing directory, highlighting the current one.
pub fn render_track_list(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    tracks: &TrackList,
    state: &mut ListState,
) {
    let items: Vec<ListItem> = tracks
        .tracks()
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            ListItem::new(format!("\u{f001} {}", name))
        })
        .collect();

    state.select(if tracks.is_empty() { None } else { Some(tracks.index()) });

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, state);
}
