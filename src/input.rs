//! Keyboard and UI command dispatch
//!
//! Turns raw key transitions into per-tick commands. Discrete commands
//! fire on the press edge only; driving keys are level-held.
//!
//! Reset and switch are also on-screen buttons. A button keeps UI focus
//! after it is activated, so the next Space would both throw the ball and
//! press the button again. Whenever one of those commands fires, the UI
//! selection is cleared here, before gameplay sees the command.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::sim::{HeldKeys, TickInput};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Tab,
    R,
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
}

impl Key {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "space" => Some(Key::Space),
            "tab" => Some(Key::Tab),
            "r" => Some(Key::R),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            _ => None,
        }
    }
}

/// Discrete commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Throw,
    SwitchMovable,
    Reset,
}

impl Command {
    /// Commands that also exist as on-screen buttons
    pub fn is_ui_button(&self) -> bool {
        matches!(self, Command::SwitchMovable | Command::Reset)
    }
}

fn command_for(key: Key) -> Option<Command> {
    match key {
        Key::Space => Some(Command::Throw),
        Key::Tab => Some(Command::SwitchMovable),
        Key::R => Some(Command::Reset),
        _ => None,
    }
}

/// One scripted key transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEvent {
    /// Seconds since start
    pub at: f32,
    pub key: Key,
    pub pressed: bool,
}

/// Parse `<seconds>:<key>:<down|up>` entries, sorted by time
///
/// Blank entries are skipped.
pub fn parse_script<S: AsRef<str>>(entries: &[S]) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = entries
        .iter()
        .map(|entry| entry.as_ref().trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            let [at, key, state] = parts.as_slice() else {
                return Err(ScriptError::Malformed(entry.to_string()));
            };
            let at = at
                .parse::<f32>()
                .ok()
                .filter(|at| at.is_finite() && *at >= 0.0)
                .ok_or_else(|| ScriptError::BadTime(entry.to_string()))?;
            let key = Key::from_str(key).ok_or_else(|| ScriptError::UnknownKey(entry.to_string()))?;
            let pressed = match *state {
                "down" => true,
                "up" => false,
                _ => return Err(ScriptError::BadState(entry.to_string())),
            };
            Ok(ScriptEvent { at, key, pressed })
        })
        .collect::<Result<Vec<_>, _>>()?;
    events.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(events)
}

/// UI layer hook for dropping the current selection
pub trait UiFocus {
    fn clear_selection(&mut self);
}

/// Collects input between simulation ticks
#[derive(Debug, Default)]
pub struct InputDispatcher {
    down: HashSet<Key>,
    pending: TickInput,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key transition
    pub fn key_event(&mut self, key: Key, pressed: bool, ui: &mut dyn UiFocus) {
        if !pressed {
            self.down.remove(&key);
            return;
        }
        // Auto-repeat presses are not new edges
        if !self.down.insert(key) {
            return;
        }
        if let Some(command) = command_for(key) {
            self.fire(command, ui);
        }
    }

    /// An on-screen button was activated
    pub fn ui_button(&mut self, command: Command, ui: &mut dyn UiFocus) {
        self.fire(command, ui);
    }

    fn fire(&mut self, command: Command, ui: &mut dyn UiFocus) {
        match command {
            Command::Throw => self.pending.throw = true,
            Command::SwitchMovable => self.pending.switch_movable = true,
            Command::Reset => self.pending.reset = true,
        }
        if command.is_ui_button() {
            ui.clear_selection();
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Driving keys currently held (arrows or WASD)
    pub fn held(&self) -> HeldKeys {
        HeldKeys {
            forward: self.is_down(Key::Up) || self.is_down(Key::W),
            backward: self.is_down(Key::Down) || self.is_down(Key::S),
            left: self.is_down(Key::Left) || self.is_down(Key::A),
            right: self.is_down(Key::Right) || self.is_down(Key::D),
        }
    }

    /// Commands gathered since the last call, plus held keys
    pub fn take_input(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.held = self.held();
        input
    }
}
