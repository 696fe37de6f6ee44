// src/audio/sample_capture.rs
//! A wrapper source that copies a mono mix of the audio into a circular
//! buffer for visualization.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ringbuf::{traits::*, HeapRb};
use rodio::source::SeekError;
use rodio::Source;

/// Shared buffer of recent mono samples, newest last.
pub type SampleBuffer = Arc<Mutex<HeapRb<f32>>>;

/// Passes samples through unchanged while recording their per-frame average.
pub struct SampleCapture<S> {
    source: S,
    buffer: SampleBuffer,
    channels: u16,
    /// Running sum of the current interleaved frame
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> SampleCapture<S>
where
    S: Source<Item = f32>,
{
    /// Create a new sample capture wrapper around an existing source.
    pub fn new(source: S, buffer: SampleBuffer) -> Self {
        let channels = source.channels().max(1);
        Self {
            source,
            buffer,
            channels,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }

    fn record(&mut self, sample: f32) {
        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos < self.channels {
            return;
        }

        let mono = self.frame_sum / self.channels as f32;
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        if let Ok(mut buf) = self.buffer.lock() {
            // Overwrites oldest if full
            buf.push_overwrite(mono);
        }
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        self.record(sample);
        Some(sample)
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.source.try_seek(pos)?;
        // Drop audio from before the jump
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;

    fn shared(capacity: usize) -> SampleBuffer {
        Arc::new(Mutex::new(HeapRb::new(capacity)))
    }

    #[test]
    fn passes_samples_through_and_mixes_to_mono() {
        let buffer = shared(16);
        let source = SamplesBuffer::new(2, 44_100, vec![1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0]);
        let out: Vec<f32> = SampleCapture::new(source, buffer.clone()).collect();

        assert_eq!(out, vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0]);
        let captured: Vec<f32> = buffer.lock().unwrap().iter().copied().collect();
        assert_eq!(captured, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn keeps_only_newest_samples_when_full() {
        let buffer = shared(3);
        let source = SamplesBuffer::new(1, 8_000, vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
        let _: Vec<f32> = SampleCapture::new(source, buffer.clone()).collect();

        let captured: Vec<f32> = buffer.lock().unwrap().iter().copied().collect();
        assert_eq!(captured, vec![3.0, 4.0, 5.0]);
    }
}
