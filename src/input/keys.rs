//! Keyboard bindings
//!
//! The key set is configuration: a table from `KeyboardEvent.key` names to
//! actions. Keys missing from the table are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Button, Intent};
use crate::sim::Direction;

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Up,
    Down,
    Left,
    Right,
    Activate,
    Start,
    Pause,
    Reset,
    Select,
}

impl KeyAction {
    pub fn to_intent(self) -> Intent {
        let steer = |direction| Intent::Steer {
            direction,
            resume: false,
        };
        match self {
            KeyAction::Up => steer(Direction::Up),
            KeyAction::Down => steer(Direction::Down),
            KeyAction::Left => steer(Direction::Left),
            KeyAction::Right => steer(Direction::Right),
            KeyAction::Activate => Intent::Activate,
            KeyAction::Start => Intent::Button(Button::Start),
            KeyAction::Pause => Intent::Button(Button::PauseToggle),
            KeyAction::Reset => Intent::Button(Button::Reset),
            KeyAction::Select => Intent::Button(Button::Select),
        }
    }
}

/// Key name → action table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, KeyAction>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind several key names to one action
    pub fn bind(mut self, keys: &[&str], action: KeyAction) -> Self {
        for key in keys {
            self.map.insert((*key).to_string(), action);
        }
        self
    }

    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.map.get(key).copied()
    }

    /// Arrows/WASD, space toggles pause, Enter starts, r resets
    pub fn grid_default() -> Self {
        Self::new()
            .with_movement()
            .bind(&[" "], KeyAction::Pause)
            .bind(&["Enter"], KeyAction::Start)
            .bind(&["r", "R"], KeyAction::Reset)
    }

    /// Space flaps, Escape pauses
    pub fn flappy_default() -> Self {
        Self::new()
            .bind(&[" ", "ArrowUp", "w", "W"], KeyAction::Activate)
            .bind(&["Enter"], KeyAction::Start)
            .bind(&["Escape", "p", "P"], KeyAction::Pause)
            .bind(&["r", "R"], KeyAction::Reset)
    }

    fn with_movement(self) -> Self {
        self.bind(&["ArrowUp", "w", "W"], KeyAction::Up)
            .bind(&["ArrowDown", "s", "S"], KeyAction::Down)
            .bind(&["ArrowLeft", "a", "A"], KeyAction::Left)
            .bind(&["ArrowRight", "d", "D"], KeyAction::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_defaults() {
        let keys = KeyBindings::grid_default();
        assert_eq!(keys.lookup("W"), Some(KeyAction::Up));
        assert_eq!(keys.lookup("ArrowLeft"), Some(KeyAction::Left));
        assert_eq!(keys.lookup(" "), Some(KeyAction::Pause));
        assert_eq!(keys.lookup("q"), None);
    }

    #[test]
    fn test_json_table() {
        let keys: KeyBindings = serde_json::from_str(r#"{"k": "up", "j": "down"}"#).unwrap();
        assert_eq!(keys.lookup("k"), Some(KeyAction::Up));
        assert_eq!(
            keys.lookup("j").map(KeyAction::to_intent),
            Some(Intent::Steer {
                direction: Direction::Down,
                resume: false
            })
        );
    }
}
