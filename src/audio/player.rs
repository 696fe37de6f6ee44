// src/audio/player.rs
//! Stream engine using rodio with sample capture for visualization.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ringbuf::{traits::*, HeapRb};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::engine::{clamp_seek, StreamEngine, StreamHandle};
use super::sample_capture::{SampleBuffer, SampleCapture};
use super::visualizer::FftProcessor;
use crate::config::Config;
use crate::error::{PlayerError, Result};
use crate::fs::has_supported_extension;

/// The stream currently owned by the engine.
struct ActiveStream {
    handle: StreamHandle,
    sink: Sink,
    length: f64,
}

/// rodio-backed [`StreamEngine`].
///
/// The output device lives on its own thread for as long as the engine does;
/// the sink of the active stream is driven from the caller's thread.
pub struct RodioEngine {
    /// Handle to the mixer of the output thread, if a device opened
    output: Option<OutputStreamHandle>,
    /// Dropping this ends the output thread
    _shutdown: Option<Sender<()>>,
    extensions: Vec<String>,
    /// Volume every newly opened stream starts at
    default_volume: f32,
    volume: f32,
    active: Option<ActiveStream>,
    next_id: u64,
    /// Recent mono samples of the active stream
    sample_buffer: SampleBuffer,
    fft: FftProcessor,
}

impl RodioEngine {
    /// Open the default output device and prepare an idle engine.
    ///
    /// Without a usable device the engine still works but every `open` fails.
    pub fn new(config: &Config) -> Self {
        let (output, shutdown) = match spawn_output_thread() {
            Ok((handle, tx)) => (Some(handle), Some(tx)),
            Err(e) => {
                log::error!("{e}");
                (None, None)
            }
        };

        let fft = FftProcessor::new(config.visualizer.fft_size);
        Self {
            output,
            _shutdown: shutdown,
            extensions: config.player.extensions.clone(),
            default_volume: config.player.volume.clamp(0.0, 1.0),
            volume: config.player.volume.clamp(0.0, 1.0),
            active: None,
            next_id: 0,
            sample_buffer: Arc::new(Mutex::new(HeapRb::new(fft.fft_size() * 2))),
            fft,
        }
    }

    /// True if an output device was opened.
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    fn live(&self, handle: StreamHandle) -> Option<&ActiveStream> {
        self.active.as_ref().filter(|a| a.handle == handle)
    }

    fn live_mut(&mut self, handle: StreamHandle) -> Option<&mut ActiveStream> {
        self.active.as_mut().filter(|a| a.handle == handle)
    }

    fn release(&mut self) {
        if let Some(old) = self.active.take() {
            old.sink.stop();
            log::debug!("released {}", old.handle);
        }
        if let Ok(mut buf) = self.sample_buffer.lock() {
            buf.clear();
        }
    }
}

/// Start the thread that owns the `OutputStream` and hand back its mixer.
fn spawn_output_thread() -> Result<(OutputStreamHandle, Sender<()>)> {
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    thread::Builder::new()
        .name("audio-output".into())
        .spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            if ready_tx.send(Ok(handle)).is_err() {
                return;
            }
            // Keep the stream alive until the engine goes away
            while shutdown_rx.recv().is_ok() {}
            drop(stream);
        })?;

    match ready_rx.recv() {
        Ok(Ok(handle)) => Ok((handle, shutdown_tx)),
        Ok(Err(reason)) => Err(PlayerError::OutputUnavailable(reason)),
        Err(_) => Err(PlayerError::OutputUnavailable("output thread exited".into())),
    }
}

impl StreamEngine for RodioEngine {
    fn open(&mut self, path: &Path) -> Result<StreamHandle> {
        if !has_supported_extension(path, &self.extensions) {
            return Err(PlayerError::UnsupportedFormat(path.to_path_buf()));
        }

        // Stop previous sink
        self.release();

        let output = self
            .output
            .as_ref()
            .ok_or_else(|| PlayerError::OutputUnavailable("no output device".into()))?;
        let sink = Sink::try_new(output).map_err(|e| PlayerError::stream_open(path, e))?;

        let file = File::open(path)?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::stream_open(path, e))?;

        // Unknown for some decoders (e.g. VBR mp3); the tag loader fills it in later
        let length = source.total_duration().map_or(0.0, |d| d.as_secs_f64());
        let sample_rate = source.sample_rate();

        let capturing =
            SampleCapture::new(source.convert_samples::<f32>(), self.sample_buffer.clone());
        self.volume = self.default_volume;
        sink.set_volume(self.volume);
        sink.append(capturing);
        sink.play();

        self.next_id += 1;
        let handle = StreamHandle::new(self.next_id);
        log::info!(
            "opened {} as {handle} ({length:.1}s @ {sample_rate} Hz)",
            path.display()
        );
        self.active = Some(ActiveStream { handle, sink, length });
        Ok(handle)
    }

    fn close(&mut self, handle: StreamHandle) {
        if self.live(handle).is_some() {
            self.release();
        }
    }

    fn frequency_snapshot(&mut self, handle: StreamHandle) -> &[f32] {
        if self.live(handle).is_none() {
            return &[];
        }

        // Copy under the lock, transform outside it
        let samples: Vec<f32> = match self.sample_buffer.lock() {
            Ok(buf) => {
                let available = buf.occupied_len();
                let start = available.saturating_sub(self.fft.fft_size());
                buf.iter().skip(start).copied().collect()
            }
            Err(_) => return self.fft.clear(),
        };
        if samples.is_empty() {
            return self.fft.clear();
        }
        self.fft.compute(&samples)
    }

    fn position(&self, handle: StreamHandle) -> f64 {
        self.live(handle)
            .map(|a| {
                let pos = a.sink.get_pos().as_secs_f64();
                if a.length > 0.0 { pos.min(a.length) } else { pos }
            })
            .unwrap_or(0.0)
    }

    fn length(&self, handle: StreamHandle) -> f64 {
        self.live(handle).map(|a| a.length).unwrap_or(0.0)
    }

    fn seek(&mut self, handle: StreamHandle, seconds: f64) {
        let Some(active) = self.live_mut(handle) else {
            return;
        };
        let target = clamp_seek(seconds, active.length);
        if let Err(e) = active.sink.try_seek(Duration::from_secs_f64(target)) {
            log::warn!("seek to {target:.1}s failed on {handle}: {e}");
        }
    }

    fn is_finished(&self, handle: StreamHandle) -> bool {
        self.live(handle).map(|a| a.sink.empty()).unwrap_or(false)
    }

    fn pause(&mut self, handle: StreamHandle) {
        if let Some(a) = self.live(handle) {
            a.sink.pause();
        }
    }

    fn resume(&mut self, handle: StreamHandle) {
        if let Some(a) = self.live(handle) {
            a.sink.play();
        }
    }

    fn is_paused(&self, handle: StreamHandle) -> bool {
        self.live(handle).map(|a| a.sink.is_paused()).unwrap_or(false)
    }

    fn set_volume(&mut self, handle: StreamHandle, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        let applied = match self.live(handle) {
            Some(a) => {
                a.sink.set_volume(volume);
                true
            }
            None => false,
        };
        if applied {
            self.volume = volume;
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.release();
    }
}
