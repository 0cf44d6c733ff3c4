//! Control surface for an external NES emulator core
//!
//! The core itself lives outside the crate (the page's JavaScript runtime in
//! the browser). This module owns its lifecycle and the button state fed to
//! it: keyboard, the circular touch pad and turbo buttons.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ArcadeError;
use crate::input::DPad;
use crate::settings::{InputTuning, TurboTuning};
use crate::sim::Direction;

/// Controller buttons, named as the core expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NesButton {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

impl NesButton {
    pub fn name(self) -> &'static str {
        match self {
            NesButton::Up => "up",
            NesButton::Down => "down",
            NesButton::Left => "left",
            NesButton::Right => "right",
            NesButton::A => "a",
            NesButton::B => "b",
            NesButton::Start => "start",
            NesButton::Select => "select",
        }
    }

    /// Keyboard map: arrows, `z`/`a` → A, `x`/`s` → B, Enter, Shift
    pub fn from_key(key: &str) -> Option<NesButton> {
        Some(match key {
            "ArrowUp" => NesButton::Up,
            "ArrowDown" => NesButton::Down,
            "ArrowLeft" => NesButton::Left,
            "ArrowRight" => NesButton::Right,
            "z" | "a" => NesButton::A,
            "x" | "s" => NesButton::B,
            "Enter" => NesButton::Start,
            "Shift" => NesButton::Select,
            _ => return None,
        })
    }
}

impl From<Direction> for NesButton {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => NesButton::Up,
            Direction::Down => NesButton::Down,
            Direction::Left => NesButton::Left,
            Direction::Right => NesButton::Right,
        }
    }
}

/// A bundled ROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomEntry {
    pub id: &'static str,
    pub title: &'static str,
    /// Served path
    pub path: &'static str,
}

pub static ROM_LIBRARY: [RomEntry; 4] = [
    RomEntry {
        id: "contra",
        title: "Contra",
        path: "/roms/Contra.nes",
    },
    RomEntry {
        id: "topgun",
        title: "Top Gun",
        path: "/roms/Top-Gun.nes",
    },
    RomEntry {
        id: "twinbee",
        title: "Twin Bee",
        path: "/roms/TwinBee.nes",
    },
    RomEntry {
        id: "threeeyedone",
        title: "Three Eyed One",
        path: "/roms/Three-Eyed-One.nes",
    },
];

/// The emulator runtime the controller drives
pub trait EmulatorCore {
    /// Start emulating `rom`
    fn launch(&mut self, rom: &[u8]) -> Result<(), ArcadeError>;
    fn press_down(&mut self, button: NesButton);
    fn press_up(&mut self, button: NesButton);
    /// Stop and release the core
    fn exit(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatorState {
    Stopped,
    Running { title: String },
}

/// A turbo button's schedule
#[derive(Debug, Clone, Copy)]
struct Turbo {
    button: NesButton,
    next_press: f64,
    /// Set while the synthetic press is down
    release_at: Option<f64>,
}

/// Owns the core and every button currently held on it
pub struct EmulatorController<C: EmulatorCore> {
    core: C,
    state: EmulatorState,
    held: BTreeSet<NesButton>,
    /// Directions currently held by the touch pad
    pad: BTreeSet<NesButton>,
    turbo: Vec<Turbo>,
    turbo_tuning: TurboTuning,
    dpad: DPad,
}

impl<C: EmulatorCore> EmulatorController<C> {
    pub fn new(core: C, input: &InputTuning, turbo: TurboTuning) -> Self {
        Self {
            core,
            state: EmulatorState::Stopped,
            held: BTreeSet::new(),
            pad: BTreeSet::new(),
            turbo: Vec::new(),
            turbo_tuning: turbo,
            dpad: DPad::new(input.dpad_size, input.dead_zone),
        }
    }

    pub fn state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, EmulatorState::Running { .. })
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn held(&self) -> impl Iterator<Item = NesButton> + '_ {
        self.held.iter().copied()
    }

    /// Track the rendered size of the touch pad
    pub fn set_pad_size(&mut self, size: f32) {
        self.dpad.resize(size);
    }

    /// Launch `rom`, exiting whatever was running first.
    ///
    /// An empty ROM is rejected before anything is touched.
    pub fn load(&mut self, title: &str, rom: &[u8]) -> Result<(), ArcadeError> {
        if rom.is_empty() {
            return Err(ArcadeError::EmptyRom(title.to_string()));
        }
        self.stop();
        self.core.launch(rom)?;
        log::info!("Emulator running {} ({} bytes)", title, rom.len());
        self.state = EmulatorState::Running {
            title: title.to_string(),
        };
        Ok(())
    }

    /// Release everything and exit the core. No-op when stopped.
    pub fn stop(&mut self) {
        if let EmulatorState::Running { title } = &self.state {
            log::info!("Emulator stopping {}", title);
            self.release_all();
            self.core.exit();
            self.state = EmulatorState::Stopped;
        }
    }

    pub fn press(&mut self, button: NesButton) {
        if self.is_running() && self.held.insert(button) {
            self.core.press_down(button);
        }
    }

    pub fn release(&mut self, button: NesButton) {
        if self.held.remove(&button) {
            self.core.press_up(button);
        }
    }

    /// Keyboard event. Returns whether the key is mapped.
    pub fn key(&mut self, key: &str, down: bool) -> bool {
        let Some(button) = NesButton::from_key(key) else {
            return false;
        };
        if down {
            self.press(button);
        } else {
            self.release(button);
        }
        true
    }

    /// Touch on the pad at `(x, y)` relative to its bounding box. Presses
    /// newly covered directions and releases the ones no longer covered.
    pub fn dpad(&mut self, x: f32, y: f32) {
        let wanted: BTreeSet<NesButton> = self
            .dpad
            .classify_held(x, y)
            .into_iter()
            .map(NesButton::from)
            .collect();
        let released: Vec<NesButton> = self.pad.difference(&wanted).copied().collect();
        let pressed: Vec<NesButton> = wanted.difference(&self.pad).copied().collect();
        for button in released {
            self.release(button);
        }
        for button in pressed {
            self.press(button);
        }
        self.pad = wanted;
    }

    /// Pad touch lifted
    pub fn dpad_release(&mut self) {
        for button in std::mem::take(&mut self.pad) {
            self.release(button);
        }
    }

    /// Release every held button and stop all turbo. Used on pad release,
    /// window blur and when the page is hidden.
    pub fn release_all(&mut self) {
        self.turbo.clear();
        self.pad.clear();
        for button in std::mem::take(&mut self.held) {
            self.core.press_up(button);
        }
    }

    /// Start or stop auto-fire for `button`
    pub fn set_turbo(&mut self, button: NesButton, active: bool, now: f64) {
        let existing = self.turbo.iter().position(|t| t.button == button);
        match (active, existing) {
            (true, None) => self.turbo.push(Turbo {
                button,
                next_press: now,
                release_at: None,
            }),
            (false, Some(index)) => {
                self.turbo.swap_remove(index);
                self.release(button);
            }
            _ => {}
        }
    }

    pub fn turbo_active(&self, button: NesButton) -> bool {
        self.turbo.iter().any(|t| t.button == button)
    }

    /// Drive turbo timing: press every period, release `hold_ms` later
    pub fn advance(&mut self, now: f64) {
        if !self.is_running() || self.turbo.is_empty() {
            return;
        }
        let (period_ms, hold_ms) = (self.turbo_tuning.period_ms, self.turbo_tuning.hold_ms);
        let mut turbo = std::mem::take(&mut self.turbo);
        for t in &mut turbo {
            if let Some(release_at) = t.release_at {
                if now >= release_at {
                    self.release(t.button);
                    t.release_at = None;
                }
            }
            if now >= t.next_press {
                self.press(t.button);
                t.release_at = Some(now + hold_ms);
                t.next_press += period_ms;
                if t.next_press <= now {
                    // Fell behind (background tab); don't burst
                    t.next_press = now + period_ms;
                }
            }
        }
        self.turbo = turbo;
    }
}
