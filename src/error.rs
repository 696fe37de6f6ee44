// src/error.rs
//! Error taxonomy for the playback core.

use std::path::PathBuf;

/// Result alias that carries [`PlayerError`].
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Errors raised by the stream engine and playback controller.
///
/// None of these are fatal: callers degrade to "nothing playing".
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The file extension is not in the configured list.
    #[error("unsupported format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// The backend could not open or decode the file.
    #[error("cannot open stream for {}: {reason}", path.display())]
    StreamOpen { path: PathBuf, reason: String },
    /// No audio output device could be opened.
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlayerError {
    pub(crate) fn stream_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StreamOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
