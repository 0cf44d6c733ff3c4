//! Game tuning and key bindings
//!
//! Read-only configuration: the page may embed a JSON override in a
//! `<script id="arcade-settings" type="application/json">` element.
//! Nothing is written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArcadeError;
use crate::input::KeyBindings;

/// Snake grid and speed curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub cols: i32,
    pub rows: i32,
    /// Pixels per cell when rendering
    pub cell_size: f32,
    /// Starting ms per move
    pub tick_ms: u32,
    /// Floor for ms per move
    pub min_tick_ms: u32,
    /// Multiplier applied to the interval on every food
    pub speedup: f32,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            cell_size: CELL_SIZE,
            tick_ms: GRID_TICK_MS,
            min_tick_ms: GRID_MIN_TICK_MS,
            speedup: GRID_SPEEDUP,
        }
    }
}

impl GridTuning {
    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.cols as f32 * self.cell_size, self.rows as f32 * self.cell_size)
    }

    /// Next interval after eating: shrink, round to whole ms, clamp to floor
    pub fn next_interval(&self, current_ms: u32) -> u32 {
        let scaled = (current_ms as f32 * self.speedup).round() as u32;
        scaled.max(self.min_tick_ms)
    }
}

/// How the side-scroller decides a pipe has been passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// Trailing edge moved from right of the actor to at-or-left of it this tick
    #[default]
    Crossing,
    /// Trailing edge lands exactly on the actor's x (only works when the
    /// pipe speed divides the distance evenly)
    ExactEdge,
}

/// Side-scroller physics and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub width: f32,
    pub height: f32,
    pub actor_x: f32,
    pub actor_start_y: f32,
    pub actor_size: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Minimum solid height above and below the gap
    pub pipe_margin: f32,
    /// Pixels per tick
    pub pipe_speed: f32,
    /// Ticks between spawns
    pub pipe_interval: u32,
    /// Added to velocity each tick
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub flap_velocity: f32,
    pub scoring: ScoringRule,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self::flappy_box()
    }
}

impl FlappyTuning {
    /// Heavier gravity, short hops
    pub fn flappy_box() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            actor_x: ACTOR_X,
            actor_start_y: ACTOR_START_Y,
            actor_size: ACTOR_SIZE,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_margin: PIPE_MARGIN,
            pipe_speed: PIPE_SPEED,
            pipe_interval: PIPE_INTERVAL,
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            scoring: ScoringRule::Crossing,
        }
    }

    /// Floaty variant: almost no gravity, big flaps
    pub fn flappy_bird() -> Self {
        Self {
            gravity: 0.01,
            flap_velocity: -8.0,
            ..Self::flappy_box()
        }
    }

    /// Range of valid gap tops: `[low, high)`
    pub fn gap_top_range(&self) -> (f32, f32) {
        let low = self.pipe_margin;
        let high = self.height - self.pipe_gap - self.pipe_margin;
        (low, high)
    }
}

/// Touch control geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Diameter of the circular pad in CSS pixels
    pub dpad_size: f32,
    /// Offset an axis must exceed before a direction is emitted
    pub dead_zone: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            dpad_size: DPAD_SIZE,
            dead_zone: DPAD_DEAD_ZONE,
        }
    }
}

/// Emulator auto-fire cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurboTuning {
    /// Time between presses
    pub period_ms: f64,
    /// How long each press is held
    pub hold_ms: f64,
}

impl Default for TurboTuning {
    fn default() -> Self {
        Self {
            period_ms: 50.0,
            hold_ms: 25.0,
        }
    }
}

/// All tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridTuning,
    pub flappy: FlappyTuning,
    pub input: InputTuning,
    pub turbo: TurboTuning,
    pub grid_keys: KeyBindings,
    pub flappy_keys: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridTuning::default(),
            flappy: FlappyTuning::default(),
            input: InputTuning::default(),
            turbo: TurboTuning::default(),
            grid_keys: KeyBindings::grid_default(),
            flappy_keys: KeyBindings::flappy_default(),
        }
    }
}

impl Settings {
    /// Parse and validate a JSON override. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tunings that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ArcadeError> {
        let grid = &self.grid;
        // Initial snake sits at (8,10)..(6,10)
        if grid.cols <= 8 || grid.rows <= 10 {
            return Err(ArcadeError::Config(format!(
                "grid {}x{} too small for the starting snake",
                grid.cols, grid.rows
            )));
        }
        if grid.min_tick_ms == 0 || grid.tick_ms < grid.min_tick_ms {
            return Err(ArcadeError::Config(format!(
                "tick interval {}ms must be >= floor {}ms > 0",
                grid.tick_ms, grid.min_tick_ms
            )));
        }
        if !(grid.speedup > 0.0 && grid.speedup <= 1.0) {
            return Err(ArcadeError::Config(format!(
                "speedup {} must be in (0, 1]",
                grid.speedup
            )));
        }

        let flappy = &self.flappy;
        let (low, high) = flappy.gap_top_range();
        if high <= low {
            return Err(ArcadeError::Config(format!(
                "pipe gap {} does not fit a {}px field with {}px margins",
                flappy.pipe_gap, flappy.height, flappy.pipe_margin
            )));
        }
        if flappy.pipe_interval == 0 || flappy.pipe_speed <= 0.0 {
            return Err(ArcadeError::Config(
                "pipes need a positive speed and spawn interval".to_string(),
            ));
        }

        if self.input.dead_zone <= 0.0 || self.input.dpad_size <= 0.0 {
            return Err(ArcadeError::Config(
                "touch pad size and dead zone must be positive".to_string(),
            ));
        }
        if self.turbo.hold_ms <= 0.0 || self.turbo.hold_ms >= self.turbo.period_ms {
            return Err(ArcadeError::Config(format!(
                "turbo hold {}ms must be shorter than its period {}ms",
                self.turbo.hold_ms, self.turbo.period_ms
            )));
        }
        Ok(())
    }

    /// DOM id of the embedded settings element
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "arcade-settings";

    /// Load overrides from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring page settings: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
