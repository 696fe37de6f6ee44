//! Track transitions and per-tick behaviour driven through a scripted engine.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use spectrabar::{
    app::{InputEvent, PlaybackController, PlaybackState, TickDriver},
    audio::{engine::clamp_seek, StreamEngine, StreamHandle},
    config::Config,
    error::{PlayerError, Result},
    fs::scan_directory,
};

/// Engine that plays nothing and records what it was asked to do.
struct FakeEngine {
    next_id: u64,
    live: Option<StreamHandle>,
    opened: Vec<String>,
    fail: HashSet<String>,
    finished: bool,
    paused: bool,
    position: f64,
    length: f64,
    seeks: Vec<f64>,
    volume: f32,
    snapshot: Vec<f32>,
}

impl FakeEngine {
    fn new() -> Self {
        Self {
            next_id: 0,
            live: None,
            opened: Vec::new(),
            fail: HashSet::new(),
            finished: false,
            paused: false,
            position: 0.0,
            length: 100.0,
            seeks: Vec::new(),
            volume: 0.2,
            snapshot: vec![1.0; 8],
        }
    }

    fn is_live(&self, handle: StreamHandle) -> bool {
        self.live == Some(handle)
    }
}

impl StreamEngine for FakeEngine {
    fn open(&mut self, path: &Path) -> Result<StreamHandle> {
        self.live = None;
        let name = file_name(path);
        if self.fail.contains(&name) {
            return Err(PlayerError::StreamOpen {
                path: path.to_path_buf(),
                reason: "scripted failure".into(),
            });
        }
        self.opened.push(name);
        self.next_id += 1;
        let handle = StreamHandle::new(self.next_id);
        self.live = Some(handle);
        self.finished = false;
        self.paused = false;
        self.position = 0.0;
        Ok(handle)
    }

    fn close(&mut self, handle: StreamHandle) {
        if self.is_live(handle) {
            self.live = None;
        }
    }

    fn frequency_snapshot(&mut self, handle: StreamHandle) -> &[f32] {
        if self.is_live(handle) { &self.snapshot[..] } else { &[] }
    }

    fn position(&self, handle: StreamHandle) -> f64 {
        if self.is_live(handle) { self.position } else { 0.0 }
    }

    fn length(&self, handle: StreamHandle) -> f64 {
        if self.is_live(handle) { self.length } else { 0.0 }
    }

    fn seek(&mut self, handle: StreamHandle, seconds: f64) {
        if self.is_live(handle) {
            self.position = clamp_seek(seconds, self.length);
            self.seeks.push(self.position);
        }
    }

    fn is_finished(&self, handle: StreamHandle) -> bool {
        self.is_live(handle) && self.finished
    }

    fn pause(&mut self, handle: StreamHandle) {
        if self.is_live(handle) {
            self.paused = true;
        }
    }

    fn resume(&mut self, handle: StreamHandle) {
        if self.is_live(handle) {
            self.paused = false;
        }
    }

    fn is_paused(&self, handle: StreamHandle) -> bool {
        self.is_live(handle) && self.paused
    }

    fn set_volume(&mut self, handle: StreamHandle, volume: f32) {
        if self.is_live(handle) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory of empty files, removed again when dropped.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(test: &str, names: &[&str]) -> Self {
        let dir = std::env::temp_dir()
            .join(format!("spectrabar-flow-{}-{test}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
        Self(dir)
    }

    fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    /// Playable file names in the order the track list will hold them.
    fn listing(&self) -> Vec<String> {
        scan_directory(&self.0, &["mp3".to_string()])
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.visualizer.bars = 4;
    config.visualizer.history = 4;
    config
}

fn driver_with(engine: FakeEngine) -> TickDriver<FakeEngine> {
    let config = config();
    let controller = PlaybackController::new(engine, &config).with_tag_loading(false);
    TickDriver::with_controller(controller, &config)
}

fn current_name(driver: &TickDriver<FakeEngine>) -> Option<String> {
    driver.controller().track().map(|t| file_name(&t.path))
}

#[test]
fn finished_track_advances_exactly_once() {
    let dir = ScratchDir::new("advance", &["a.mp3", "b.mp3", "c.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    let order = dir.listing();

    driver.push(InputEvent::Play(dir.join(&order[0])));
    assert!(!driver.tick().advanced);

    driver.controller_mut().engine_mut().finished = true;
    let out = driver.tick();
    assert!(out.advanced);
    assert_eq!(current_name(&driver), Some(order[1].clone()));
    assert_eq!(driver.controller().state(), PlaybackState::Playing);

    assert!(!driver.tick().advanced);
    assert_eq!(driver.controller().engine().opened, order[..2]);
}

#[test]
fn finished_last_track_wraps_to_first() {
    let dir = ScratchDir::new("wrap-end", &["a.mp3", "b.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    let order = dir.listing();

    driver.push(InputEvent::Play(dir.join(&order[1])));
    driver.tick();
    driver.controller_mut().engine_mut().finished = true;
    assert!(driver.tick().advanced);
    assert_eq!(current_name(&driver), Some(order[0].clone()));
}

#[test]
fn next_then_prev_returns_to_same_track() {
    let dir = ScratchDir::new("next-prev", &["a.mp3", "b.mp3", "c.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    let order = dir.listing();

    driver.push(InputEvent::Play(dir.join(&order[1])));
    driver.push(InputEvent::Next);
    driver.tick();
    assert_eq!(current_name(&driver), Some(order[2].clone()));

    driver.push(InputEvent::Prev);
    driver.tick();
    assert_eq!(current_name(&driver), Some(order[1].clone()));

    driver.push(InputEvent::Next);
    driver.push(InputEvent::Next);
    driver.tick();
    assert_eq!(current_name(&driver), Some(order[0].clone()));
}

#[test]
fn scan_order_drives_next() {
    let dir = ScratchDir::new("scan-order", &["zeta.mp3", "Beta.mp3", "alpha.mp3", "mid.mp3"]);
    let mut driver = driver_with(FakeEngine::new());
    let order = dir.listing();

    driver.push(InputEvent::Play(dir.join(&order[0])));
    driver.tick();
    let listed: Vec<String> =
        driver.controller().tracks().tracks().iter().map(|p| file_name(p)).collect();
    assert_eq!(listed, order);

    for _ in 1..order.len() {
        driver.push(InputEvent::Next);
    }
    driver.tick();
    assert_eq!(driver.controller().engine().opened, order);
}

#[test]
fn next_with_nothing_loaded_is_a_no_op() {
    let mut driver = driver_with(FakeEngine::new());
    driver.push(InputEvent::Next);
    driver.push(InputEvent::Prev);
    let out = driver.tick();
    assert!(out.frame.is_none());
    assert_eq!(driver.controller().state(), PlaybackState::Idle);
    assert!(driver.controller().engine().opened.is_empty());
}

#[test]
fn unsupported_drop_keeps_current_track() {
    let dir = ScratchDir::new("unsupported", &["a.mp3", "cover.png", "b.wav"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    driver.tick();
    let handle = driver.controller().handle();

    driver.push(InputEvent::Dropped(vec![dir.join("b.wav")]));
    driver.push(InputEvent::Play(dir.join("cover.png")));
    let out = driver.tick();

    assert!(out.frame.is_some());
    assert_eq!(driver.controller().handle(), handle);
    assert_eq!(driver.controller().state(), PlaybackState::Playing);
    assert_eq!(driver.controller().engine().opened, ["a.mp3"]);
    // Only supported files are listed
    assert_eq!(driver.controller().tracks().len(), 1);
}

#[test]
fn drop_of_several_files_plays_the_last() {
    let dir = ScratchDir::new("drop-many", &["a.mp3", "b.mp3", "c.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Dropped(vec![dir.join("a.mp3"), dir.join("c.mp3")]));
    driver.tick();

    assert_eq!(driver.controller().engine().opened, ["c.mp3"]);
    let expected = dir.listing().iter().position(|n| n == "c.mp3");
    assert_eq!(Some(driver.controller().tracks().index()), expected);
}

#[test]
fn failed_open_leaves_nothing_playing() {
    let dir = ScratchDir::new("open-fail", &["a.mp3", "b.mp3"]);
    let mut engine = FakeEngine::new();
    engine.fail.insert("b.mp3".into());
    let mut driver = driver_with(engine);

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    assert!(driver.tick().frame.is_some());

    driver.push(InputEvent::Play(dir.join("b.mp3")));
    let out = driver.tick();
    assert!(out.frame.is_none());
    assert!(driver.controller().handle().is_none());
    assert!(driver.controller().track().is_none());
    assert_eq!(driver.controller().state(), PlaybackState::Idle);
}

#[test]
fn timeline_seek_is_clamped_to_the_track() {
    let dir = ScratchDir::new("seek", &["a.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    driver.push(InputEvent::Seek(0.25));
    driver.push(InputEvent::Seek(1.5));
    driver.push(InputEvent::Seek(-0.5));
    let out = driver.tick();

    assert_eq!(driver.controller().engine().seeks, [25.0, 100.0, 0.0]);
    let frame = out.frame.unwrap();
    assert_eq!(frame.length, 100.0);
    assert_eq!(frame.progress, 0.0);
}

#[test]
fn frame_reports_position_and_progress() {
    let dir = ScratchDir::new("progress", &["a.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    driver.tick();
    driver.controller_mut().engine_mut().position = 40.0;
    let frame = driver.tick().frame.unwrap();

    assert_eq!(frame.position, 40.0);
    assert!((frame.progress - 0.4).abs() < 1e-6);
    assert_eq!(frame.bars.len(), 4);
}

#[test]
fn smoothing_history_restarts_on_track_change() {
    let dir = ScratchDir::new("smoother", &["a.mp3", "b.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    let first = driver.tick().frame.unwrap().bars;
    for _ in 0..3 {
        driver.tick();
    }
    let settled = driver.smoother().heights().to_vec();
    assert!(settled[0] > first[0]);
    assert_eq!(driver.smoother().history(0).len(), 4);

    driver.push(InputEvent::Next);
    let after = driver.tick().frame.unwrap().bars;
    assert_eq!(after, first);
    assert_eq!(driver.smoother().history(0).len(), 1);
}

#[test]
fn pause_volume_and_stop() {
    let dir = ScratchDir::new("transport", &["a.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    driver.push(InputEvent::TogglePause);
    driver.push(InputEvent::Volume(0.1));
    driver.tick();
    assert_eq!(driver.controller().state(), PlaybackState::Paused);
    assert!(driver.controller().engine().paused);
    assert!((driver.controller().volume() - 0.3).abs() < 1e-6);

    driver.push(InputEvent::TogglePause);
    driver.tick();
    assert_eq!(driver.controller().state(), PlaybackState::Playing);

    driver.push(InputEvent::Stop);
    let out = driver.tick();
    assert!(out.frame.is_none());
    assert_eq!(driver.controller().state(), PlaybackState::Idle);
    // The list survives a stop
    assert_eq!(driver.controller().tracks().len(), 1);
}

#[test]
fn quit_discards_the_rest_of_the_queue() {
    let dir = ScratchDir::new("quit", &["a.mp3", "b.mp3"]);
    let mut driver = driver_with(FakeEngine::new());

    driver.push(InputEvent::Play(dir.join("a.mp3")));
    driver.tick();

    driver.push(InputEvent::Quit);
    driver.push(InputEvent::Next);
    let out = driver.tick();

    assert!(out.quit);
    assert!(out.frame.is_none());
    assert_eq!(driver.pending(), 0);
    assert_eq!(driver.controller().engine().opened, ["a.mp3"]);
}
