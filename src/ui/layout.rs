// src/ui/layout.rs
//! Screen split: an upper row of panels and the spectrum pane below.

use ratatui::layout::{Constraint, Layout, Rect};

/// Panels that share the upper row, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Tracks,
    Player,
    Artwork,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Tracks, Section::Player, Section::Artwork];

    /// Relative column width.
    fn weight(self) -> u16 {
        match self {
            Section::Tracks => 30,
            Section::Player => 45,
            Section::Artwork => 25,
        }
    }
}

/// Which panels are shown. Panels are numbered 1-3 left to right, the
/// spectrum is 4; the numbers match the panel titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVisibility {
    panels: [bool; 3],
    visualizer: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            panels: [true; 3],
            visualizer: true,
        }
    }
}

impl SectionVisibility {
    /// Flip panel `number`; unknown numbers are ignored.
    pub fn toggle(&mut self, number: usize) {
        match number {
            1..=3 => self.panels[number - 1] ^= true,
            4 => self.visualizer ^= true,
            _ => {}
        }
    }

    pub fn shows(&self, section: Section) -> bool {
        self.panels[section as usize]
    }

    pub fn shows_visualizer(&self) -> bool {
        self.visualizer
    }
}

/// Where each visible part goes this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedLayout {
    /// Visible upper panels with their columns, left to right
    pub panels: Vec<(Section, Rect)>,
    pub visualizer_area: Option<Rect>,
}

/// Split `area` for the visible parts. The spectrum gets the lower 55%, or
/// all of it when no upper panel is shown.
pub fn compute_layout(area: Rect, visibility: &SectionVisibility) -> ComputedLayout {
    let sections: Vec<Section> = Section::ALL
        .into_iter()
        .filter(|s| visibility.shows(*s))
        .collect();

    if sections.is_empty() {
        return ComputedLayout {
            panels: Vec::new(),
            visualizer_area: visibility.shows_visualizer().then_some(area),
        };
    }

    let (upper, visualizer_area) = if visibility.shows_visualizer() {
        let [upper, lower] =
            Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);
        (upper, Some(lower))
    } else {
        (area, None)
    };

    let columns =
        Layout::horizontal(sections.iter().map(|s| Constraint::Fill(s.weight()))).split(upper);
    let panels = sections.into_iter().zip(columns.iter().copied()).collect();

    ComputedLayout {
        panels,
        visualizer_area,
    }
}
