// src/fs/mod.rs
//! Filesystem module - directory scanning and extension checks.

pub mod tracklist;

// Re-export commonly used items
pub use tracklist::{has_supported_extension, normalize_path, scan_directory, TrackList};
