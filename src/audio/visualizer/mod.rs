// src/audio/visualizer/mod.rs
//! Spectrum pipeline: FFT snapshot, bar smoothing, and bar drawing.

mod fft;
mod renderer;
mod smoother;

pub use fft::FftProcessor;
pub use renderer::SpectrumRenderer;
pub use smoother::{BarValueTable, SpectrumSmoother};
