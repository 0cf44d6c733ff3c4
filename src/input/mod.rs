//! Input normalization
//!
//! Converts raw browser events into canonical intents. This module never
//! touches simulation state; sessions apply the intents between ticks.

pub mod dpad;
pub mod keys;

pub use dpad::DPad;
pub use keys::{KeyAction, KeyBindings};

use crate::settings::InputTuning;
use crate::sim::Direction;

/// A raw event as delivered by the platform layer
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// `KeyboardEvent.key` of a key press
    KeyDown(String),
    /// `KeyboardEvent.key` of a key release
    KeyUp(String),
    /// Touch on the pad, coordinates relative to the pad's bounding box
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    /// Last contact lifted (or cancelled)
    TouchEnd,
    /// Click/tap on the play field
    PointerDown,
}

/// Discriminant used to key the handler table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    Touch,
    TouchEnd,
    PointerDown,
}

impl RawEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RawEvent::KeyDown(_) => EventKind::KeyDown,
            RawEvent::KeyUp(_) => EventKind::KeyUp,
            RawEvent::TouchStart { .. } | RawEvent::TouchMove { .. } => EventKind::Touch,
            RawEvent::TouchEnd => EventKind::TouchEnd,
            RawEvent::PointerDown => EventKind::PointerDown,
        }
    }
}

/// Named buttons shared by all games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    PauseToggle,
    Reset,
    Select,
}

/// Canonical player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Point the actor somewhere. `resume` is set for touch steering, which
    /// also unpauses the game.
    Steer { direction: Direction, resume: bool },
    /// Touch lifted: no direction held
    SteerRelease,
    /// Momentary impulse (flap)
    Activate,
    Button(Button),
}

type Handler = fn(&InputNormalizer, &RawEvent) -> Option<Intent>;

/// Dispatch table: one handler per event kind
const HANDLERS: [(EventKind, Handler); 5] = [
    (EventKind::KeyDown, InputNormalizer::on_key_down),
    (EventKind::KeyUp, InputNormalizer::on_key_up),
    (EventKind::Touch, InputNormalizer::on_touch),
    (EventKind::TouchEnd, InputNormalizer::on_touch_end),
    (EventKind::PointerDown, InputNormalizer::on_pointer_down),
];

/// Per-game input mapping
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    pub bindings: KeyBindings,
    pub dpad: DPad,
}

impl InputNormalizer {
    pub fn new(bindings: KeyBindings, tuning: &InputTuning) -> Self {
        Self {
            bindings,
            dpad: DPad::new(tuning.dpad_size, tuning.dead_zone),
        }
    }

    /// Map one raw event; `None` means "ignore"
    pub fn normalize(&self, event: &RawEvent) -> Option<Intent> {
        let kind = event.kind();
        HANDLERS
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, handler)| handler(self, event))
    }

    fn on_key_down(&self, event: &RawEvent) -> Option<Intent> {
        match event {
            RawEvent::KeyDown(key) => self.bindings.lookup(key).map(KeyAction::to_intent),
            _ => None,
        }
    }

    /// Games act on presses only
    fn on_key_up(&self, _event: &RawEvent) -> Option<Intent> {
        None
    }

    fn on_touch(&self, event: &RawEvent) -> Option<Intent> {
        match *event {
            RawEvent::TouchStart { x, y } | RawEvent::TouchMove { x, y } => {
                self.dpad.classify(x, y).map(|direction| Intent::Steer {
                    direction,
                    resume: true,
                })
            }
            _ => None,
        }
    }

    fn on_touch_end(&self, _event: &RawEvent) -> Option<Intent> {
        Some(Intent::SteerRelease)
    }

    fn on_pointer_down(&self, _event: &RawEvent) -> Option<Intent> {
        Some(Intent::Activate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_input() -> InputNormalizer {
        InputNormalizer::new(KeyBindings::grid_default(), &InputTuning::default())
    }

    #[test]
    fn test_arrow_keys() {
        let input = grid_input();
        assert_eq!(
            input.normalize(&RawEvent::KeyDown("ArrowUp".into())),
            Some(Intent::Steer {
                direction: Direction::Up,
                resume: false
            })
        );
        assert_eq!(
            input.normalize(&RawEvent::KeyDown("Enter".into())),
            Some(Intent::Button(Button::Start))
        );
    }

    #[test]
    fn test_unknown_key_ignored() {
        let input = grid_input();
        assert_eq!(input.normalize(&RawEvent::KeyDown("F13".into())), None);
        assert_eq!(input.normalize(&RawEvent::KeyUp("ArrowUp".into())), None);
    }

    #[test]
    fn test_touch_steers_and_resumes() {
        let input = grid_input();
        assert_eq!(
            input.normalize(&RawEvent::TouchMove { x: 180.0, y: 96.0 }),
            Some(Intent::Steer {
                direction: Direction::Right,
                resume: true
            })
        );
        assert_eq!(input.normalize(&RawEvent::TouchStart { x: 96.0, y: 100.0 }), None);
        assert_eq!(input.normalize(&RawEvent::TouchEnd), Some(Intent::SteerRelease));
    }

    #[test]
    fn test_pointer_activates() {
        let input = InputNormalizer::new(KeyBindings::flappy_default(), &InputTuning::default());
        assert_eq!(input.normalize(&RawEvent::PointerDown), Some(Intent::Activate));
        assert_eq!(input.normalize(&RawEvent::KeyDown(" ".into())), Some(Intent::Activate));
    }
}
