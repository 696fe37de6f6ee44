// src/config/mod.rs
//! User settings loaded from TOML.
//!
//! Every field has a default so a partial file (or none at all) works.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    /// Where log output goes; the terminal belongs to the UI.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Playback and tick-rate settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    /// Volume applied to every newly opened stream (0.0 - 1.0).
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Playable file extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Upper bound on ticks per second.
    #[serde(default = "default_max_fps")]
    pub max_fps: u32,
}

/// Spectrum smoothing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VisualizerConfig {
    /// Number of bars drawn.
    #[serde(default = "default_bars")]
    pub bars: usize,
    /// Raw samples kept per bar for the temporal average.
    #[serde(default = "default_history")]
    pub history: usize,
    /// Resolution of the sqrt lookup table.
    #[serde(default = "default_table_size")]
    pub table_size: usize,
    /// FFT length; the snapshot carries half as many bins.
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            extensions: default_extensions(),
            max_fps: default_max_fps(),
        }
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            bars: default_bars(),
            history: default_history(),
            table_size: default_table_size(),
            fft_size: default_fft_size(),
        }
    }
}

fn default_volume() -> f32 {
    0.2
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".into()]
}

fn default_max_fps() -> u32 {
    144
}

fn default_bars() -> usize {
    62
}

fn default_history() -> usize {
    12
}

fn default_table_size() -> usize {
    1000
}

fn default_fft_size() -> usize {
    4096
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(content).context("invalid config")?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Explicit path first, then `./spectrabar.toml`, then the platform config dir.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }
        let local = PathBuf::from("spectrabar.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("spectrabar").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Pull out-of-range values back to something usable.
    fn sanitize(&mut self) {
        self.player.volume = self.player.volume.clamp(0.0, 1.0);
        self.player.max_fps = self.player.max_fps.max(1);
        self.player.extensions = self
            .player
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if self.player.extensions.is_empty() {
            self.player.extensions = default_extensions();
        }

        let v = &mut self.visualizer;
        v.bars = v.bars.max(1);
        v.history = v.history.max(1);
        v.table_size = v.table_size.max(1);
        v.fft_size = v.fft_size.max(2).next_power_of_two();
        // The smoother indexes bars straight into the snapshot bins.
        if v.fft_size / 2 < v.bars {
            v.fft_size = (v.bars * 2).next_power_of_two();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.player.volume, 0.2);
        assert_eq!(cfg.player.extensions, vec!["mp3".to_string()]);
        assert_eq!(cfg.player.max_fps, 144);
        assert_eq!(cfg.visualizer.bars, 62);
        assert_eq!(cfg.visualizer.history, 12);
        assert_eq!(cfg.visualizer.table_size, 1000);
        assert_eq!(cfg.visualizer.fft_size, 4096);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_toml("[visualizer]\nbars = 32\n").unwrap();
        assert_eq!(cfg.visualizer.bars, 32);
        assert_eq!(cfg.visualizer.history, 12);
        assert_eq!(cfg.player.max_fps, 144);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn sanitizes_out_of_range_values() {
        let cfg = Config::from_toml(
            "[player]\nvolume = 3.0\nextensions = [\".MP3\", \"\"]\nmax_fps = 0\n\
             [visualizer]\nbars = 100\nfft_size = 100\n",
        )
        .unwrap();
        assert_eq!(cfg.player.volume, 1.0);
        assert_eq!(cfg.player.extensions, vec!["mp3".to_string()]);
        assert_eq!(cfg.player.max_fps, 1);
        assert_eq!(cfg.visualizer.fft_size, 256);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::from_toml("[player\nvolume = ").is_err());
    }
}
