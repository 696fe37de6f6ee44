// src/app/controller.rs
//! Active track, directory track list, and transitions between tracks.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::{
    audio::{metadata::load_metadata, StreamEngine, StreamHandle, TrackInfo, TrackMetadata},
    config::Config,
    error::{PlayerError, Result},
    fs::{has_supported_extension, normalize_path, TrackList},
};

/// Where playback currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded.
    Idle,
    Playing,
    Paused,
    /// The last track ran out and nothing replaced it.
    StoppedAtEnd,
}

/// Mediates every track change between user requests and the stream engine.
pub struct PlaybackController<E: StreamEngine> {
    engine: E,
    extensions: Vec<String>,
    tracks: TrackList,
    handle: Option<StreamHandle>,
    /// Length of the active stream, cached at open
    length: f64,
    track: Option<TrackInfo>,
    state: PlaybackState,
    metadata: Option<TrackMetadata>,
    /// Colour of the last artwork seen; tracks without art keep it
    ambient: Option<[u8; 3]>,
    /// Metadata channel (background loader -> controller)
    meta_tx: Sender<TrackMetadata>,
    meta_rx: Receiver<TrackMetadata>,
    load_tags: bool,
}

impl<E: StreamEngine> PlaybackController<E> {
    pub fn new(engine: E, config: &Config) -> Self {
        let (meta_tx, meta_rx) = mpsc::channel::<TrackMetadata>();
        Self {
            engine,
            extensions: config.player.extensions.clone(),
            tracks: TrackList::new(),
            handle: None,
            length: 0.0,
            track: None,
            state: PlaybackState::Idle,
            metadata: None,
            ambient: None,
            meta_tx,
            meta_rx,
            load_tags: true,
        }
    }

    /// Enable or disable background tag loading after each track change.
    pub fn with_tag_loading(mut self, enabled: bool) -> Self {
        self.load_tags = enabled;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn handle(&self) -> Option<StreamHandle> {
        self.handle
    }

    pub fn track(&self) -> Option<&TrackInfo> {
        self.track.as_ref()
    }

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    pub fn metadata(&self) -> Option<&TrackMetadata> {
        self.metadata.as_ref()
    }

    /// Average colour of the most recent artwork, kept across track changes.
    pub fn ambient(&self) -> Option<[u8; 3]> {
        self.ambient
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn position(&self) -> f64 {
        self.handle.map(|h| self.engine.position(h)).unwrap_or(0.0)
    }

    /// Elapsed / length in [0, 1]; 0 when nothing plays or length is unknown.
    pub fn progress(&self) -> f32 {
        if self.length <= 0.0 {
            return 0.0;
        }
        (self.position() / self.length).clamp(0.0, 1.0) as f32
    }

    pub fn volume(&self) -> f32 {
        self.engine.volume()
    }

    /// Start playing `path`, replacing whatever played before.
    ///
    /// An unsupported extension leaves everything untouched. A failed open
    /// leaves nothing playing.
    pub fn play_track(&mut self, path: &Path) -> Result<()> {
        if !has_supported_extension(path, &self.extensions) {
            return Err(PlayerError::UnsupportedFormat(path.to_path_buf()));
        }
        let path = normalize_path(path);

        let handle = match self.engine.open(&path) {
            Ok(h) => h,
            Err(e @ PlayerError::UnsupportedFormat(_)) => return Err(e),
            Err(e) => {
                self.handle = None;
                self.length = 0.0;
                self.track = None;
                self.metadata = None;
                self.state = PlaybackState::Idle;
                return Err(e);
            }
        };

        self.handle = Some(handle);
        self.length = self.engine.length(handle);
        self.track = Some(TrackInfo::from_path(&path));
        self.metadata = None;
        self.state = PlaybackState::Playing;

        if let Some(dir) = path.parent() {
            if self.tracks.needs_rescan(dir) {
                if let Err(e) = self.tracks.rescan(dir, &self.extensions, &path) {
                    log::warn!("cannot list {}: {e}", dir.display());
                    self.tracks = TrackList::from_paths(dir, Vec::new());
                }
            } else {
                self.tracks.select(&path);
            }
        }

        if self.load_tags {
            self.spawn_metadata_loader(path);
        }
        Ok(())
    }

    /// Play the following track, wrapping to the first. No-op on an empty list.
    pub fn next(&mut self) -> Result<()> {
        match self.tracks.advance().map(Path::to_path_buf) {
            Some(path) => self.play_track(&path),
            None => Ok(()),
        }
    }

    /// Play the preceding track, wrapping to the last. No-op on an empty list.
    pub fn prev(&mut self) -> Result<()> {
        match self.tracks.retreat().map(Path::to_path_buf) {
            Some(path) => self.play_track(&path),
            None => Ok(()),
        }
    }

    /// Advance once if the active stream has run out. Returns true if it did.
    pub fn poll_finished(&mut self) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        if !self.engine.is_finished(handle) {
            return false;
        }

        log::info!("{handle} finished");
        self.engine.close(handle);
        self.handle = None;
        self.state = PlaybackState::StoppedAtEnd;
        if let Err(e) = self.next() {
            log::warn!("auto-advance failed: {e}");
        }
        true
    }

    pub fn toggle_pause(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        match self.state {
            PlaybackState::Playing => {
                self.engine.pause(handle);
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                self.engine.resume(handle);
                self.state = PlaybackState::Playing;
            }
            _ => {}
        }
    }

    /// Seek to `fraction` (clamped to [0, 1]) of the track length.
    pub fn seek_fraction(&mut self, fraction: f32) {
        if let Some(handle) = self.handle {
            let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
            self.engine.seek(handle, f64::from(fraction) * self.length);
        }
    }

    /// Nudge the volume by `delta`.
    pub fn change_volume(&mut self, delta: f32) {
        if let Some(handle) = self.handle {
            let volume = self.engine.volume() + delta;
            self.engine.set_volume(handle, volume);
        }
    }

    /// Stop playback; the track list is kept.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.close(handle);
        }
        self.length = 0.0;
        self.track = None;
        self.metadata = None;
        self.state = PlaybackState::Idle;
    }

    /// Frequency snapshot of the active stream, if any.
    pub fn frequency_snapshot(&mut self) -> Option<&[f32]> {
        let handle = self.handle?;
        Some(self.engine.frequency_snapshot(handle))
    }

    /// Take any metadata the background loader finished. Results for a
    /// track that is no longer current are dropped.
    pub fn poll_metadata(&mut self) {
        while let Ok(meta) = self.meta_rx.try_recv() {
            let current = self.track.as_ref().map(|t| t.path.as_path());
            if current != Some(meta.path.as_path()) {
                continue;
            }
            if self.length <= 0.0 && meta.duration_secs > 0.0 {
                self.length = meta.duration_secs;
            }
            if meta.ambient.is_some() {
                self.ambient = meta.ambient;
            }
            self.metadata = Some(meta);
        }
    }

    fn spawn_metadata_loader(&self, path: PathBuf) {
        let tx = self.meta_tx.clone();
        thread::spawn(move || match load_metadata(path.clone()) {
            Ok(meta) => {
                let _ = tx.send(meta);
            }
            Err(e) => log::debug!("no tags for {}: {e}", path.display()),
        });
    }
}

impl<E: StreamEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.close(handle);
        }
    }
}
