// src/audio/engine.rs
//! The stream engine contract the playback controller drives.

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Opaque reference to one open stream.
///
/// Only the most recently opened handle is live; older ones are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(u64);

impl StreamHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// Decoding, playback and spectrum capture for a single audio file at a time.
///
/// Calls on a stale handle are no-ops and queries return neutral values.
/// Any cross-thread work is internal; no method blocks on I/O beyond `open`.
pub trait StreamEngine {
    /// Release the current stream and start playing `path` from 0 at the
    /// default volume.
    fn open(&mut self, path: &Path) -> Result<StreamHandle>;

    /// Stop and release `handle`. Idempotent.
    fn close(&mut self, handle: StreamHandle);

    /// Frequency magnitudes of the most recent audio. Empty for a stale handle.
    fn frequency_snapshot(&mut self, handle: StreamHandle) -> &[f32];

    /// Elapsed playback time in seconds.
    fn position(&self, handle: StreamHandle) -> f64;

    /// Total length in seconds (0 when unknown).
    fn length(&self, handle: StreamHandle) -> f64;

    /// Jump to `seconds`, clamped into `[0, length]`.
    fn seek(&mut self, handle: StreamHandle, seconds: f64);

    /// True once the stream reached its end and stopped.
    fn is_finished(&self, handle: StreamHandle) -> bool;

    fn pause(&mut self, handle: StreamHandle);

    fn resume(&mut self, handle: StreamHandle);

    fn is_paused(&self, handle: StreamHandle) -> bool;

    /// Set the volume of `handle`, clamped to [0, 1].
    fn set_volume(&mut self, handle: StreamHandle, volume: f32);

    /// Volume used for the current stream (or the next one opened).
    fn volume(&self) -> f32;
}

/// Clamp a seek target into a stream of `length` seconds.
pub fn clamp_seek(seconds: f64, length: f64) -> f64 {
    if !seconds.is_finite() {
        return 0.0;
    }
    seconds.clamp(0.0, length.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_targets_clamp_into_stream() {
        assert_eq!(clamp_seek(-5.0, 180.0), 0.0);
        assert_eq!(clamp_seek(280.0, 180.0), 180.0);
        assert_eq!(clamp_seek(42.5, 180.0), 42.5);
        assert_eq!(clamp_seek(10.0, 0.0), 0.0);
        assert_eq!(clamp_seek(f64::NAN, 180.0), 0.0);
    }

    #[test]
    fn handles_compare_by_id() {
        assert_eq!(StreamHandle::new(3), StreamHandle::new(3));
        assert_ne!(StreamHandle::new(3), StreamHandle::new(4));
        assert_eq!(StreamHandle::new(7).to_string(), "stream#7");
    }
}
