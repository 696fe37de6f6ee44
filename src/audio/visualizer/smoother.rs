// src/audio/visualizer/smoother.rs
//! Two-stage bar smoothing: a per-bar moving average over recent ticks,
//! then a 3-tap average across neighbouring bars.

use ringbuf::{traits::*, HeapRb};

/// Precomputed `sqrt(i / M)` for `i` in `0..=M`.
#[derive(Debug, Clone)]
pub struct BarValueTable {
    values: Box<[f32]>,
}

impl BarValueTable {
    pub fn new(resolution: usize) -> Self {
        let m = resolution.max(1);
        let values = (0..=m).map(|i| (i as f32 / m as f32).sqrt()).collect();
        Self { values }
    }

    /// Number of steps `M`; the table holds `M + 1` entries.
    pub fn resolution(&self) -> usize {
        self.values.len() - 1
    }

    pub fn get(&self, index: usize) -> f32 {
        self.values[index.min(self.resolution())]
    }

    /// Look up a linear level in [0, 1] (clamped, NaN reads as 0), quantized down.
    pub fn lookup(&self, level: f32) -> f32 {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.get((level * self.resolution() as f32).floor() as usize)
    }
}

/// Turns raw frequency snapshots into stable bar heights.
pub struct SpectrumSmoother {
    /// Last `depth` raw samples per bar, oldest first
    history: Vec<HeapRb<f32>>,
    depth: usize,
    table: BarValueTable,
    /// Per-bar level after the temporal pass
    levels: Vec<f32>,
    /// Final heights after the spatial pass
    heights: Vec<f32>,
}

impl SpectrumSmoother {
    pub fn new(bars: usize, depth: usize, resolution: usize) -> Self {
        let bars = bars.max(1);
        let depth = depth.max(1);
        Self {
            history: (0..bars).map(|_| HeapRb::new(depth)).collect(),
            depth,
            table: BarValueTable::new(resolution),
            levels: vec![0.0; bars],
            heights: vec![0.0; bars],
        }
    }

    pub fn bars(&self) -> usize {
        self.history.len()
    }

    pub fn table(&self) -> &BarValueTable {
        &self.table
    }

    /// Feed one snapshot and return the new bar heights, each in [0, 1].
    ///
    /// Bar `i` reads `raw[i]`; missing or non-finite bins count as silence.
    pub fn update(&mut self, raw: &[f32]) -> &[f32] {
        for (i, ring) in self.history.iter_mut().enumerate() {
            let sample = raw.get(i).copied().filter(|v| v.is_finite()).unwrap_or(0.0);
            ring.push_overwrite(sample);

            // Slots not yet filled contribute zero.
            let avg = ring.iter().sum::<f32>() / self.depth as f32;
            self.levels[i] = self.table.lookup(avg);
        }

        let last = self.levels.len() - 1;
        for i in 0..=last {
            let left = self.levels[i.saturating_sub(1)];
            let right = self.levels[(i + 1).min(last)];
            self.heights[i] = ((left + self.levels[i] + right) / 3.0).clamp(0.0, 1.0);
        }
        &self.heights
    }

    /// Heights from the most recent update.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Raw samples held for `bar`, oldest first.
    pub fn history(&self, bar: usize) -> Vec<f32> {
        self.history
            .get(bar)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Forget everything, e.g. when the stream changes.
    pub fn reset(&mut self) {
        for ring in &mut self.history {
            ring.clear();
        }
        self.levels.fill(0.0);
        self.heights.fill(0.0);
    }
}
