// src/app/driver.rs
//! Fixed-cadence tick: apply queued input, compute one spectrum frame,
//! then check for the end of the track.

use std::{
    collections::VecDeque,
    path::PathBuf,
    time::{Duration, Instant},
};

use super::controller::PlaybackController;
use crate::{
    audio::{visualizer::SpectrumSmoother, StreamEngine, StreamHandle},
    config::Config,
    error::{PlayerError, Result},
};

/// Requests from the outside world, applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Jump to a fraction of the track (timeline click).
    Seek(f32),
    Next,
    Prev,
    /// Files dropped onto the player; only the last one is played.
    Dropped(Vec<PathBuf>),
    Play(PathBuf),
    TogglePause,
    /// Change the volume by this amount.
    Volume(f32),
    Stop,
    Quit,
}

/// Everything the presentation layer needs from one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    /// Bar heights, each in [0, 1]
    pub bars: Vec<f32>,
    /// Seconds elapsed
    pub position: f64,
    /// Seconds total
    pub length: f64,
    /// position / length in [0, 1]
    pub progress: f32,
}

/// Result of [`TickDriver::tick`].
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Present while a stream is active.
    pub frame: Option<SpectrumFrame>,
    /// The track ran out and the next one was requested.
    pub advanced: bool,
    pub quit: bool,
}

/// Owns the controller and smoother and runs them once per tick.
pub struct TickDriver<E: StreamEngine> {
    controller: PlaybackController<E>,
    smoother: SpectrumSmoother,
    events: VecDeque<InputEvent>,
    /// Stream the smoother history belongs to
    smoothed_stream: Option<StreamHandle>,
}

impl<E: StreamEngine> TickDriver<E> {
    pub fn new(engine: E, config: &Config) -> Self {
        Self::with_controller(PlaybackController::new(engine, config), config)
    }

    pub fn with_controller(controller: PlaybackController<E>, config: &Config) -> Self {
        let v = &config.visualizer;
        Self {
            controller,
            smoother: SpectrumSmoother::new(v.bars, v.history, v.table_size),
            events: VecDeque::new(),
            smoothed_stream: None,
        }
    }

    pub fn controller(&self) -> &PlaybackController<E> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<E> {
        &mut self.controller
    }

    pub fn smoother(&self) -> &SpectrumSmoother {
        &self.smoother
    }

    /// Queue an event for the next tick.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Run one tick.
    pub fn tick(&mut self) -> TickOutput {
        let mut out = TickOutput::default();

        while let Some(event) = self.events.pop_front() {
            if event == InputEvent::Quit {
                self.events.clear();
                out.quit = true;
                return out;
            }
            if let Err(e) = self.apply(event) {
                match e {
                    PlayerError::UnsupportedFormat(_) => log::debug!("ignored: {e}"),
                    _ => log::warn!("{e}"),
                }
            }
        }
        self.controller.poll_metadata();

        self.sync_smoother();
        out.frame = self.compute_frame();
        out.advanced = self.controller.poll_finished();
        if out.advanced {
            self.sync_smoother();
        }
        out
    }

    fn apply(&mut self, event: InputEvent) -> Result<()> {
        log::debug!("event {event:?}");
        match event {
            InputEvent::Seek(fraction) => self.controller.seek_fraction(fraction),
            InputEvent::Next => self.controller.next()?,
            InputEvent::Prev => self.controller.prev()?,
            InputEvent::Dropped(paths) => {
                if let Some(path) = paths.last() {
                    self.controller.play_track(path)?;
                }
            }
            InputEvent::Play(path) => self.controller.play_track(&path)?,
            InputEvent::TogglePause => self.controller.toggle_pause(),
            InputEvent::Volume(delta) => self.controller.change_volume(delta),
            InputEvent::Stop => self.controller.stop(),
            InputEvent::Quit => {}
        }
        Ok(())
    }

    /// Start from an empty history whenever the stream changes.
    fn sync_smoother(&mut self) {
        let current = self.controller.handle();
        if current != self.smoothed_stream {
            self.smoother.reset();
            self.smoothed_stream = current;
        }
    }

    fn compute_frame(&mut self) -> Option<SpectrumFrame> {
        let raw = self.controller.frequency_snapshot()?;
        let bars = self.smoother.update(raw).to_vec();
        Some(SpectrumFrame {
            bars,
            position: self.controller.position(),
            length: self.controller.length(),
            progress: self.controller.progress(),
        })
    }
}

/// Caps the tick rate and tells the loop how long it may wait for input.
#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    last_tick: Instant,
}

impl FramePacer {
    pub fn new(max_fps: u32) -> Self {
        let period = Duration::from_secs(1) / max_fps.max(1);
        Self {
            period,
            // First tick is due immediately
            last_tick: Instant::now().checked_sub(period).unwrap_or_else(Instant::now),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next tick is due.
    pub fn timeout(&self) -> Duration {
        self.period
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or_default()
    }

    pub fn is_due(&self) -> bool {
        self.last_tick.elapsed() >= self.period
    }

    pub fn mark(&mut self) {
        self.last_tick = Instant::now();
    }
}
