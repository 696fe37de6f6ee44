// src/audio/metadata.rs
//! Track naming from file names, and embedded tag extraction using Lofty.

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::DynamicImage;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;

/// Separator between artist and title in `ARTIST - TITLE.ext`.
const NAME_SEPARATOR: char = '-';

/// Display name derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub path: PathBuf,
    pub artist: Option<String>,
    pub title: String,
}

impl TrackInfo {
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (artist, title) = split_track_name(&stem);
        Self {
            path: path.to_path_buf(),
            artist,
            title,
        }
    }
}

/// Split `ARTIST - TITLE` into its parts.
///
/// With a separator the first segment is the artist and the last is the
/// title, both trimmed. Without one the whole name is the title.
pub fn split_track_name(name: &str) -> (Option<String>, String) {
    let segments: Vec<&str> = name.split(NAME_SEPARATOR).collect();
    match segments.as_slice() {
        [first, .., last] => (Some(first.trim().to_string()), last.trim().to_string()),
        _ => (None, name.to_string()),
    }
}

/// Collected metadata for the current track.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    /// File the metadata belongs to.
    pub path: PathBuf,
    /// Audio properties (bitrate, sample rate, channels, etc.)
    pub properties: Vec<(String, String)>,
    /// Track length in seconds as reported by the container.
    pub duration_secs: f64,
    /// Decoded cover art, if the tag carries a readable picture.
    pub artwork: Option<DynamicImage>,
    /// Average RGB colour of the artwork.
    pub ambient: Option<[u8; 3]>,
}

/// Load metadata for a file path without touching player state.
/// This is safe to call from a background thread.
pub fn load_metadata(path: PathBuf) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(&path)?.read()?;

    // Decode the first embedded picture
    let artwork = tagged_file
        .primary_tag()
        .and_then(|tag| tag.pictures().first())
        .and_then(|pic| match image::load_from_memory(pic.data()) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("undecodable artwork in {}: {e}", path.display());
                None
            }
        });
    let ambient = artwork.as_ref().map(average_color);

    // Collect core audio properties
    let props = tagged_file.properties();
    let mut properties = Vec::new();
    if let Some(b) = props.audio_bitrate() {
        properties.push(("Bitrate (kbps)".into(), b.to_string()));
    }
    if let Some(sr) = props.sample_rate() {
        properties.push(("Sample Rate (Hz)".into(), sr.to_string()));
    }
    if let Some(ch) = props.channels() {
        properties.push(("Channels".into(), ch.to_string()));
    }
    let duration_secs = props.duration().as_secs_f64();

    Ok(TrackMetadata {
        path,
        properties,
        duration_secs,
        artwork,
        ambient,
    })
}

/// Mean colour over every pixel of `img`.
pub fn average_color(img: &DynamicImage) -> [u8; 3] {
    let rgb = img.to_rgb8();
    let total = u64::from(rgb.width()) * u64::from(rgb.height());
    if total == 0 {
        return [0, 0, 0];
    }

    let mut sum = [0u64; 3];
    for px in rgb.pixels() {
        for (acc, &c) in sum.iter_mut().zip(px.0.iter()) {
            *acc += u64::from(c);
        }
    }
    sum.map(|s| (s / total) as u8)
}
