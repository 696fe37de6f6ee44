// src/app/mod.rs
//! Application module - playback control, the tick driver, and UI state.

pub mod controller;
pub mod driver;
pub mod state;

// Re-export the main types
pub use controller::{PlaybackController, PlaybackState};
pub use driver::{FramePacer, InputEvent, SpectrumFrame, TickDriver, TickOutput};
pub use state::App;
