//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick constants only (no delta time)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod direction;
pub mod flappy;
pub mod grid;

use serde::Serialize;

pub use collision::{Aabb, PipeHit, actor_out_of_bounds, actor_pipe_collision, cell_occupied};
pub use direction::Direction;
pub use flappy::{FlappyActor, FlappyState, FlightOutcome, Pipe};
pub use grid::{Cell, GridState, TickOutcome};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndCause {
    /// Snake ran into itself
    SelfCollision,
    /// Snake ran into an obstacle
    Obstacle,
    /// No free cell left for food or a new obstacle
    BoardFull,
    /// Flappy actor touched a pipe
    Pipe,
    /// Flappy actor left the field vertically
    OutOfBounds,
}

/// Lifecycle phase shared by both games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Fresh state, waiting for a start intent
    Ready,
    /// Ticking
    Running,
    /// Suspended by the player
    Paused,
    /// Terminal; state is kept for display until reset
    GameOver(EndCause),
}

impl Phase {
    pub fn is_running(self) -> bool {
        self == Phase::Running
    }

    pub fn is_over(self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}
