// src/ui/widgets/mod.rs
//! Custom widgets for the player UI.

pub mod artwork;
pub mod player_panel;
pub mod spectrum;
pub mod track_list;

// Re-export widget rendering functions
pub use artwork::{artwork_area, render_artwork};
pub use player_panel::{format_time, render_player_panel, PanelInfo};
pub use spectrum::render_spectrum;
pub use track_list::render_track_list;
