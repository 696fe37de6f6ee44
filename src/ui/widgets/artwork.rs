// src/ui/widgets/artwork.rs
//! Album artwork display widget.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
    Frame,
};
use ratatui_image::{protocol::Protocol, Image};

/// Render the artwork panel; `image` must be sized for [`artwork_area`].
pub fn render_artwork(f: &mut Frame<'_>, area: Rect, image: Option<&Protocol>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("3: Artwork"), area);

    if let Some(proto) = image {
        f.render_widget(Image::new(proto), artwork_area(area));
    }
}

/// Largest centred square (in cells, assuming 1:2 cells) inside `area`.
pub fn artwork_area(area: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let width = inner.width.min(inner.height.saturating_mul(2));
    let height = (width / 2).min(inner.height);
    Rect::new(
        inner.x + (inner.width - width) / 2,
        inner.y + (inner.height - height) / 2,
        width,
        height,
    )
}
