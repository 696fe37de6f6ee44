// src/audio/visualizer/renderer.rs
//! Spectrum bar rendering for the visualizer.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renderer for spectrum visualization bars.
pub struct SpectrumRenderer {
    /// Gap between bars
    bar_gap: usize,
    /// Partial block characters, lowest first
    chars: [char; 8],
}

impl SpectrumRenderer {
    pub fn new() -> Self {
        Self {
            bar_gap: 1,
            chars: ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'],
        }
    }

    /// Render `heights` (each in [0, 1]) as bars tinted with `tint`.
    pub fn render(&self, f: &mut Frame<'_>, area: Rect, heights: &[f32], tint: Option<[u8; 3]>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("4: Spectrum");
        let inner = block.inner(area);

        let color = tint.map(|[r, g, b]| Color::Rgb(r, g, b)).unwrap_or(Color::White);
        let content = self.build(inner.width as usize, inner.height as usize, heights);
        f.render_widget(Paragraph::new(content).style(Style::default().fg(color)), inner);
        f.render_widget(block, area);
    }

    /// Lay the bars out as text, one line per row, top to bottom.
    fn build(&self, width: usize, height: usize, heights: &[f32]) -> String {
        if width == 0 || height == 0 || heights.is_empty() {
            return String::new();
        }

        // Show as many bars as fit with at least one column each
        let mut gap = self.bar_gap;
        let mut bar_width = (width + gap) / heights.len();
        if bar_width <= gap {
            gap = 0;
            bar_width = (width / heights.len()).max(1);
        } else {
            bar_width -= gap;
        }
        let visible = heights.len().min((width + gap) / (bar_width + gap));

        let mut full_content = String::with_capacity((width + 1) * height * 3);
        for row in 0..height {
            let mut line = String::with_capacity(width * 3);
            for &h in &heights[..visible] {
                let ch = self.get_char_for_row(h, row, height);
                line.extend(std::iter::repeat_n(ch, bar_width));
                line.extend(std::iter::repeat_n(' ', gap));
            }
            let used = line.chars().count();
            if used < width {
                line.extend(std::iter::repeat_n(' ', width - used));
            } else if used > width {
                line = line.chars().take(width).collect();
            }
            full_content.push_str(&line);
            if row + 1 < height {
                full_content.push('\n');
            }
        }
        full_content
    }

    /// Determine what character to show at a specific row for a given height.
    fn get_char_for_row(&self, magnitude: f32, row: usize, height: usize) -> char {
        let filled = magnitude.clamp(0.0, 1.0) * height as f32;
        let full_rows = filled as usize;
        // Current row from bottom (0 = bottom, height-1 = top)
        let row_from_bottom = height - row - 1;

        if row_from_bottom < full_rows {
            '█'
        } else if row_from_bottom == full_rows {
            let fraction = filled - full_rows as f32;
            let idx = (fraction * self.chars.len() as f32) as usize;
            match idx {
                // Always show a minimum bar at the bottom row
                0 if row_from_bottom == 0 => self.chars[0],
                0 => ' ',
                i => self.chars[(i - 1).min(self.chars.len() - 1)],
            }
        } else {
            ' '
        }
    }
}

impl Default for SpectrumRenderer {
    fn default() -> Self {
        Self::new()
    }
}
