// src/audio/mod.rs
//! Audio module - stream engine, metadata, and spectrum visualization.

pub mod engine;
pub mod metadata;
pub mod player;
pub mod sample_capture;
pub mod visualizer;

// Re-export commonly used types
pub use engine::{StreamEngine, StreamHandle};
pub use metadata::{TrackInfo, TrackMetadata};
pub use player::RodioEngine;
pub use sample_capture::SampleCapture;
pub use visualizer::{SpectrumRenderer, SpectrumSmoother};
