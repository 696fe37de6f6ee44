//! Spectrabar - a terminal music player with a live spectrum visualizer.
//!
//! This library provides playback control, the spectrum pipeline and the
//! terminal interface used by the `spectrabar` binary.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod fs;
pub mod ui;
