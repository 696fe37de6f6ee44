// src/fs/tracklist.rs
//! Ordered list of playable files in one directory.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

/// Returns true if `path` ends in one of `extensions` (case-insensitive, no dot).
pub fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|s| s.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Absolute, symlink-resolved form of `path` when available.
pub fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// List the playable files of `dir` in the order the filesystem yields them.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let list = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_supported_extension(p, extensions))
        .collect();
    Ok(list)
}

/// Tracks of the directory the current song lives in, plus a cursor.
#[derive(Debug, Default, Clone)]
pub struct TrackList {
    dir: Option<PathBuf>,
    tracks: Vec<PathBuf>,
    index: usize,
}

impl TrackList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from already-known paths (no filesystem access).
    pub fn from_paths(dir: impl Into<PathBuf>, tracks: Vec<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            tracks,
            index: 0,
        }
    }

    /// Directory the list was built from.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.tracks.get(self.index).map(PathBuf::as_path)
    }

    /// True if `dir` is not the directory this list was built from.
    pub fn needs_rescan(&self, dir: &Path) -> bool {
        self.dir.as_deref() != Some(dir)
    }

    /// Replace the list with the playable files of `dir` and point the cursor
    /// at `playing`, or at 0 if it is not among them.
    pub fn rescan(&mut self, dir: &Path, extensions: &[String], playing: &Path) -> io::Result<()> {
        let tracks = scan_directory(dir, extensions)?;
        log::debug!("rescanned {}: {} tracks", dir.display(), tracks.len());
        self.dir = Some(dir.to_path_buf());
        self.tracks = tracks;
        if !self.select(playing) {
            self.index = 0;
        }
        Ok(())
    }

    /// Move the cursor to `path`; returns false (cursor unchanged) if absent.
    pub fn select(&mut self, path: &Path) -> bool {
        match self.tracks.iter().position(|p| p == path) {
            Some(i) => {
                self.index = i;
                true
            }
            None => false,
        }
    }

    /// Advance with wraparound. `None` on an empty list.
    pub fn advance(&mut self) -> Option<&Path> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.current()
    }

    /// Step back with wraparound. `None` on an empty list.
    pub fn retreat(&mut self) -> Option<&Path> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = if self.index == 0 {
            self.tracks.len() - 1
        } else {
            self.index - 1
        };
        self.current()
    }
}
