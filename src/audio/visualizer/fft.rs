// src/audio/visualizer/fft.rs
//! FFT computation producing linear per-bin magnitudes.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Fixed-size FFT turning the latest mono samples into a magnitude snapshot.
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    /// Hann window, precomputed for `fft_size`
    window: Vec<f32>,
    /// Scale so a full-scale sine reads about 1.0 in its bin
    scale: f32,
    buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl FftProcessor {
    /// `fft_size` is rounded up to a power of two.
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2).next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        // Apply Hann window to reduce spectral leakage
        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos())
            })
            .collect();
        let window_sum: f32 = window.iter().sum();

        Self {
            fft,
            window,
            scale: 2.0 / window_sum.max(f32::EPSILON),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            magnitudes: vec![0.0; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Number of bins in each snapshot (`fft_size / 2`).
    pub fn bins(&self) -> usize {
        self.magnitudes.len()
    }

    /// Transform the most recent `fft_size` samples of `samples`.
    ///
    /// Shorter input is zero-padded at the end.
    pub fn compute(&mut self, samples: &[f32]) -> &[f32] {
        let n = self.fft_size();
        let recent = &samples[samples.len().saturating_sub(n)..];

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = recent.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        // Only first half due to symmetry
        for (mag, c) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = c.norm() * self.scale;
        }
        &self.magnitudes
    }

    /// Zero the snapshot, e.g. while nothing is playing.
    pub fn clear(&mut self) -> &[f32] {
        self.magnitudes.fill(0.0);
        &self.magnitudes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_gives_zero_bins() {
        let mut fft = FftProcessor::new(1024);
        let out = fft.compute(&vec![0.0; 1024]);
        assert_eq!(out.len(), 512);
        assert!(out.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn sine_peaks_in_its_bin() {
        let size = 1024;
        let bin = 32;
        let samples: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / size as f32).sin())
            .collect();

        let mut fft = FftProcessor::new(size);
        let out = fft.compute(&samples);

        let peak = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, bin);
        assert!((out[bin] - 1.0).abs() < 0.05, "peak {}", out[bin]);
    }

    #[test]
    fn short_input_is_padded() {
        let mut fft = FftProcessor::new(256);
        assert_eq!(fft.compute(&[0.5; 10]).len(), 128);
        assert_eq!(fft.compute(&[]).len(), 128);
    }

    #[test]
    fn size_rounds_to_power_of_two() {
        let fft = FftProcessor::new(3000);
        assert_eq!(fft.fft_size(), 4096);
        assert_eq!(fft.bins(), 2048);
    }
}
