// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Volume step for one key press.
pub const VOLUME_STEP: f32 = 0.05;

/// Map digit/shifted-digit keys to section number (1..4).
pub fn map_key_to_digit(k: &KeyEvent) -> Option<usize> {
    if let KeyCode::Char(c) = k.code {
        match c {
            '1' | '!' => Some(1),
            '2' | '@' => Some(2),
            '3' | '#' => Some(3),
            '4' | '$' => Some(4),
            _ => None,
        }
    } else {
        None
    }
}

/// Check if the key event is a shifted symbol (!, @, #, $).
pub fn is_shifted_symbol(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('!') | KeyCode::Char('@') | KeyCode::Char('#') | KeyCode::Char('$')
    )
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationAction {
    NextTrack,
    PreviousTrack,
    TogglePause,
    Stop,
    Volume(f32),
    ToggleSection(usize),
    Quit,
    None,
}

/// Convert a key event to a navigation action.
pub fn key_to_action(key: &KeyEvent) -> NavigationAction {
    // Check for section toggle first
    if let Some(d) = map_key_to_digit(key) {
        if key.modifiers.contains(KeyModifiers::SHIFT) || is_shifted_symbol(key) {
            return NavigationAction::ToggleSection(d);
        }
    }

    match key.code {
        KeyCode::Right | KeyCode::Char('n') => NavigationAction::NextTrack,
        KeyCode::Left | KeyCode::Char('p') => NavigationAction::PreviousTrack,
        KeyCode::Char(' ') => NavigationAction::TogglePause,
        KeyCode::Char('s') => NavigationAction::Stop,
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
            NavigationAction::Volume(VOLUME_STEP)
        }
        KeyCode::Char('-') | KeyCode::Down => NavigationAction::Volume(-VOLUME_STEP),
        KeyCode::Char('q') | KeyCode::Esc => NavigationAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            NavigationAction::Quit
        }
        _ => NavigationAction::None,
    }
}
