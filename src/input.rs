//! Input handling for held-key movement
//!
//! Terminals do not deliver reliable key-release events, so a key counts
//! as held from its first press until no repeat has been seen for a short
//! timeout. The session samples the held state once per frame.

use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// Held state of the four game keys, sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub rotate_ccw: bool,
    pub rotate_cw: bool,
}

/// Tracks when each game key was last seen pressed
pub struct InputHandler {
    left_seen: Option<Instant>,
    right_seen: Option<Instant>,
    rotate_ccw_seen: Option<Instant>,
    rotate_cw_seen: Option<Instant>,
    bindings: KeyBindings,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> KeyCode {
        match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s if s.len() == 1 => KeyCode::Char(s.chars().next().unwrap()),
            _ => KeyCode::Char(' '), // fallback
        }
    }

    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            rotate_ccw: Self::parse_keys(&settings.keys.rotate_ccw),
            rotate_cw: Self::parse_keys(&settings.keys.rotate_cw),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::Left],
            move_right: vec![KeyCode::Right],
            rotate_ccw: vec![KeyCode::Up],
            rotate_cw: vec![KeyCode::Down],
            quit: vec![KeyCode::Char('q'), KeyCode::Esc],
        }
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            left_seen: None,
            right_seen: None,
            rotate_ccw_seen: None,
            rotate_cw_seen: None,
            bindings: KeyBindings::default(),
        }
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            ..Self::new()
        }
    }

    /// Handle a key press or repeat; returns true when a quit key fired
    pub fn key_down(&mut self, key: KeyEvent) -> bool {
        let now = Instant::now();

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        let code = normalize_key(key.code);
        if self.bindings.quit.contains(&code) {
            return true;
        }

        if self.bindings.move_left.contains(&code) {
            self.left_seen = Some(now);
            // Cancel opposite direction
            self.right_seen = None;
        } else if self.bindings.move_right.contains(&code) {
            self.right_seen = Some(now);
            self.left_seen = None;
        } else if self.bindings.rotate_ccw.contains(&code) {
            self.rotate_ccw_seen = Some(now);
        } else if self.bindings.rotate_cw.contains(&code) {
            self.rotate_cw_seen = Some(now);
        }

        false
    }

    /// Handle a key release event (may not be delivered on Linux)
    pub fn key_up(&mut self, key: KeyEvent) {
        let code = normalize_key(key.code);

        if self.bindings.move_left.contains(&code) {
            self.left_seen = None;
        } else if self.bindings.move_right.contains(&code) {
            self.right_seen = None;
        } else if self.bindings.rotate_ccw.contains(&code) {
            self.rotate_ccw_seen = None;
        } else if self.bindings.rotate_cw.contains(&code) {
            self.rotate_cw_seen = None;
        }
    }

    /// Sample which keys are currently held, expiring stale ones first
    pub fn snapshot(&mut self) -> InputSnapshot {
        let now = Instant::now();
        expire(&mut self.left_seen, now);
        expire(&mut self.right_seen, now);
        expire(&mut self.rotate_ccw_seen, now);
        expire(&mut self.rotate_cw_seen, now);

        InputSnapshot {
            left: self.left_seen.is_some(),
            right: self.right_seen.is_some(),
            rotate_ccw: self.rotate_ccw_seen.is_some(),
            rotate_cw: self.rotate_cw_seen.is_some(),
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn expire(seen: &mut Option<Instant>, now: Instant) {
    if seen.is_some_and(|t| now.duration_since(t) > KEY_TIMEOUT) {
        *seen = None;
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(KeyBindings::parse_key("Left"), KeyCode::Left);
        assert_eq!(KeyBindings::parse_key("ESC"), KeyCode::Esc);
        assert_eq!(KeyBindings::parse_key("Space"), KeyCode::Char(' '));
        assert_eq!(KeyBindings::parse_key("z"), KeyCode::Char('z'));
    }

    #[test]
    fn test_pressed_key_shows_up_in_snapshot() {
        let mut input = InputHandler::new();
        assert!(!input.key_down(press(KeyCode::Left)));
        let snapshot = input.snapshot();
        assert!(snapshot.left);
        assert!(!snapshot.right);
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let mut input = InputHandler::new();
        input.key_down(press(KeyCode::Left));
        input.key_down(press(KeyCode::Right));
        let snapshot = input.snapshot();
        assert!(!snapshot.left);
        assert!(snapshot.right);
    }

    #[test]
    fn test_release_clears_held_state() {
        let mut input = InputHandler::new();
        input.key_down(press(KeyCode::Up));
        input.key_up(press(KeyCode::Up));
        assert!(!input.snapshot().rotate_ccw);
    }

    #[test]
    fn test_quit_keys() {
        let mut input = InputHandler::new();
        assert!(input.key_down(press(KeyCode::Char('q'))));
        assert!(input.key_down(press(KeyCode::Esc)));
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert!(input.key_down(ctrl_c));
    }
}
