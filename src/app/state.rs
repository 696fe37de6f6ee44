// src/app/state.rs
//! Application state: the tick driver plus what the terminal UI remembers
//! between frames.

use std::path::PathBuf;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, widgets::ListState, Frame};
use ratatui_image::{picker::Picker, protocol::Protocol, Resize};

use super::driver::{InputEvent, SpectrumFrame, TickDriver};
use crate::{
    audio::{RodioEngine, SpectrumRenderer},
    config::Config,
    ui::{
        keybindings::{key_to_action, NavigationAction},
        layout::{compute_layout, Section, SectionVisibility},
        paste::parse_dropped_paths,
        widgets::{
            artwork_area, render_artwork, render_player_panel, render_spectrum,
            render_track_list, PanelInfo,
        },
    },
};

/// Artwork encoded for the terminal at a given size.
struct ArtworkCache {
    source: PathBuf,
    area: Rect,
    proto: Protocol,
}

/// Main application state.
pub struct App {
    driver: TickDriver<RodioEngine>,
    /// Section visibility state
    pub visibility: SectionVisibility,
    /// Output of the last tick
    frame: Option<SpectrumFrame>,
    renderer: SpectrumRenderer,
    list_state: ListState,
    /// Image picker for artwork rendering
    picker: Picker,
    artwork: Option<ArtworkCache>,
    /// Where the timeline was drawn last frame
    timeline: Option<Rect>,
    /// Latest click/drag position on the timeline, applied on the next tick
    pending_seek: Option<f32>,
}

impl App {
    /// Create the application. Call after the terminal is in raw mode.
    pub fn new(config: &Config) -> Self {
        let engine = RodioEngine::new(config);
        if !engine.has_output() {
            log::warn!("running without audio output");
        }

        // Create picker with fallback if stdio query fails
        let picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 16)));

        Self {
            driver: TickDriver::new(engine, config),
            visibility: SectionVisibility::default(),
            frame: None,
            renderer: SpectrumRenderer::new(),
            list_state: ListState::default(),
            picker,
            artwork: None,
            timeline: None,
            pending_seek: None,
        }
    }

    /// Queue an event for the next tick.
    pub fn push(&mut self, event: InputEvent) {
        self.driver.push(event);
    }

    /// Handle a key event.
    pub fn on_key(&mut self, key: KeyEvent) {
        let event = match key_to_action(&key) {
            NavigationAction::NextTrack => InputEvent::Next,
            NavigationAction::PreviousTrack => InputEvent::Prev,
            NavigationAction::TogglePause => InputEvent::TogglePause,
            NavigationAction::Stop => InputEvent::Stop,
            NavigationAction::Volume(delta) => InputEvent::Volume(delta),
            NavigationAction::Quit => InputEvent::Quit,
            NavigationAction::ToggleSection(d) => {
                self.visibility.toggle(d);
                return;
            }
            NavigationAction::None => return,
        };
        self.push(event);
    }

    /// Clicks and drags on the timeline seek.
    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return;
        }
        let Some(bar) = self.timeline else {
            return;
        };
        let inside_x = mouse.column >= bar.x && mouse.column < bar.x + bar.width;
        let inside_y = mouse.row >= bar.y && mouse.row < bar.y + bar.height;
        if inside_x && inside_y {
            let span = bar.width.saturating_sub(1).max(1) as f32;
            self.pending_seek = Some(f32::from(mouse.column - bar.x) / span);
        }
    }

    /// Terminals paste the paths of files dropped onto them.
    pub fn on_paste(&mut self, text: &str) {
        let paths = parse_dropped_paths(text);
        if !paths.is_empty() {
            self.push(InputEvent::Dropped(paths));
        }
    }

    /// Run one tick; returns true when the app should quit.
    pub fn tick(&mut self) -> bool {
        if let Some(fraction) = self.pending_seek.take() {
            self.driver.push(InputEvent::Seek(fraction));
        }
        let out = self.driver.tick();
        self.frame = out.frame;
        out.quit
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area(), &self.visibility);
        self.timeline = None;

        for &(section, col) in &layout.panels {
            match section {
                Section::Tracks => {
                    let tracks = self.driver.controller().tracks();
                    let dir = tracks
                        .dir()
                        .and_then(|d| d.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let title = format!("1: Tracks {}", dir);
                    render_track_list(f, col, &title, tracks, &mut self.list_state);
                }
                Section::Player => {
                    let ctl = self.driver.controller();
                    let (position, length) = match &self.frame {
                        Some(frame) => (frame.position, frame.length),
                        None => (0.0, ctl.length()),
                    };
                    let info = PanelInfo {
                        track: ctl.track(),
                        metadata: ctl.metadata(),
                        state: ctl.state(),
                        position,
                        length,
                        volume: ctl.volume(),
                    };
                    self.timeline = Some(render_player_panel(f, col, &info));
                }
                Section::Artwork => {
                    self.refresh_artwork(col);
                    render_artwork(f, col, self.artwork.as_ref().map(|a| &a.proto));
                }
            }
        }

        // Bottom pane: audio spectrum visualizer
        if let Some(visualizer_area) = layout.visualizer_area {
            render_spectrum(
                f,
                visualizer_area,
                &self.renderer,
                self.driver.smoother().heights(),
                self.driver.controller().ambient(),
            );
        }
    }

    /// Re-encode the artwork when the track or the panel size changed.
    fn refresh_artwork(&mut self, panel: Rect) {
        let area = artwork_area(panel);
        let Some(meta) = self.driver.controller().metadata() else {
            self.artwork = None;
            return;
        };
        let Some(img) = meta.artwork.as_ref() else {
            self.artwork = None;
            return;
        };
        if let Some(cache) = &self.artwork {
            if cache.source == meta.path && cache.area == area {
                return;
            }
        }

        let size = Rect::new(0, 0, area.width, area.height);
        self.artwork = match self.picker.new_protocol(img.clone(), size, Resize::Fit(None)) {
            Ok(proto) => Some(ArtworkCache {
                source: meta.path.clone(),
                area,
                proto,
            }),
            Err(e) => {
                log::warn!("cannot encode artwork: {e:?}");
                None
            }
        };
    }
}
