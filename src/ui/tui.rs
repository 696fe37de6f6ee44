// src/ui/tui.rs
//! Terminal setup and the event loop.

use std::{io, path::PathBuf, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event as CEvent, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::{
    app::{App, FramePacer, InputEvent},
    config::Config,
};

/// Run the player until the user quits, optionally starting with `initial`.
pub fn run(config: &Config, initial: Option<PathBuf>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config);
    if let Some(path) = initial {
        app.push(InputEvent::Play(path));
    }
    let result = event_loop(&mut terminal, &mut app, config.player.max_fps);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, max_fps: u32) -> Result<()> {
    let mut pacer = FramePacer::new(max_fps);
    loop {
        if event::poll(pacer.timeout())? {
            // Drain whatever is already queued before ticking
            loop {
                match event::read()? {
                    CEvent::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                    CEvent::Mouse(mouse) => app.on_mouse(mouse),
                    CEvent::Paste(text) => app.on_paste(&text),
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if pacer.is_due() {
            pacer.mark();
            if app.tick() {
                log::info!("quit requested");
                return Ok(());
            }
            terminal.draw(|f| app.draw(f))?;
        }
    }
}
