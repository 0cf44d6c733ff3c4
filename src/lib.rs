//! Pocket Arcade - browser arcade mini games
//!
//! Core modules:
//! - `input`: Raw keyboard/touch/pointer events to canonical intents
//! - `sim`: Deterministic simulation (grid Snake, Flappy side-scroller)
//! - `scheduler`: Logical tick timers (fixed delay / frame budget)
//! - `session`: One mounted game instance wired to its scheduler
//! - `renderer`: Draw lists and the WebGPU pipeline
//! - `emulator`: Control surface for the external NES core
//! - `settings`: Data-driven tuning and key bindings

pub mod emulator;
pub mod error;
pub mod input;
pub mod renderer;
pub mod route;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ArcadeError;
pub use route::Route;
pub use session::{ArcadeGame, Session};
pub use sim::Phase;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (cells)
    pub const GRID_COLS: i32 = 20;
    pub const GRID_ROWS: i32 = 20;
    /// Pixel size of one grid cell
    pub const CELL_SIZE: f32 = 20.0;

    /// Snake speed: ms per move at start, floor, and speed-up per food
    pub const GRID_TICK_MS: u32 = 120;
    pub const GRID_MIN_TICK_MS: u32 = 40;
    pub const GRID_SPEEDUP: f32 = 0.95;

    /// Flappy play field (pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Flappy actor
    pub const ACTOR_X: f32 = 80.0;
    pub const ACTOR_START_Y: f32 = 200.0;
    pub const ACTOR_SIZE: f32 = 24.0;

    /// Flappy pipes
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 140.0;
    pub const PIPE_MARGIN: f32 = 50.0;
    pub const PIPE_SPEED: f32 = 2.0;
    /// Ticks between pipe spawns
    pub const PIPE_INTERVAL: u32 = 180;

    /// "Flappy Box" physics (per tick, no dt scaling)
    pub const GRAVITY: f32 = 0.2;
    pub const FLAP_VELOCITY: f32 = -6.0;

    /// Frame budget for per-frame games (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum catch-up ticks per poll to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Circular touch pad
    pub const DPAD_SIZE: f32 = 192.0;
    pub const DPAD_DEAD_ZONE: f32 = 20.0;
}

/// Wrap a coordinate into `[0, modulo)`
#[inline]
pub fn wrap(value: i32, modulo: i32) -> i32 {
    value.rem_euclid(modulo)
}

/// Axis-aligned overlap of two 1-D spans (strict, touching edges don't overlap)
#[inline]
pub fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && a_max > b_min
}
