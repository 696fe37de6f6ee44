// src/ui/widgets/spectrum.rs
//! Spectrum visualizer widget wrapper.

use ratatui::{layout::Rect, Frame};

use crate::audio::SpectrumRenderer;

/// Render the spectrum bars, tinted with the artwork colour when known.
pub fn render_spectrum(
    f: &mut Frame<'_>,
    area: Rect,
    renderer: &SpectrumRenderer,
    bars: &[f32],
    tint: Option<[u8; 3]>,
) {
    renderer.render(f, area, bars, tint);
}
