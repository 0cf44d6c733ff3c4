//! Flappy-style side-scroller
//!
//! Explicit Euler integration with fixed per-tick constants. Pipes spawn at
//! the right edge every `pipe_interval` ticks and scroll left.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Aabb, actor_out_of_bounds, actor_pipe_collision};
use super::{EndCause, Phase};
use crate::settings::{FlappyTuning, ScoringRule};

/// The flapping box
#[derive(Debug, Clone, Serialize)]
pub struct FlappyActor {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    /// Vertical velocity, pixels per tick (+ is down)
    pub velocity: f32,
    pub size: f32,
}

impl FlappyActor {
    pub fn new(tuning: &FlappyTuning) -> Self {
        Self {
            pos: Vec2::new(tuning.actor_x, tuning.actor_start_y),
            velocity: 0.0,
            size: tuning.actor_size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, Vec2::splat(self.size))
    }
}

/// A pipe pair with a gap
#[derive(Debug, Clone, Serialize)]
pub struct Pipe {
    /// Leading (left) edge
    pub x: f32,
    /// Height of the upper solid; the gap starts here
    pub top: f32,
    /// Already counted toward the score
    pub scored: bool,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    /// Not running; nothing changed
    Idle,
    /// Advanced; the count of pipes passed this tick
    Flew { passed: u32 },
    /// Collision or out of bounds
    Ended(EndCause),
}

/// Complete side-scroller state
#[derive(Debug, Clone, Serialize)]
pub struct FlappyState {
    pub seed: u64,
    pub tuning: FlappyTuning,
    pub actor: FlappyActor,
    /// Ordered by x (oldest first)
    pub pipes: Vec<Pipe>,
    pub score: u32,
    /// Ticks since the run started; drives spawning
    pub time_ticks: u64,
    pub phase: Phase,
    #[serde(skip)]
    rng: Pcg32,
}

impl FlappyState {
    pub fn new(seed: u64, tuning: FlappyTuning) -> Self {
        Self {
            seed,
            actor: FlappyActor::new(&tuning),
            tuning,
            pipes: Vec::new(),
            score: 0,
            time_ticks: 0,
            phase: Phase::Ready,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Upward impulse, applied immediately. Starts a fresh or paused run;
    /// ignored after game over.
    pub fn flap(&mut self) -> bool {
        match self.phase {
            Phase::GameOver(_) => false,
            Phase::Ready | Phase::Paused => {
                self.phase = Phase::Running;
                self.actor.velocity = self.tuning.flap_velocity;
                true
            }
            Phase::Running => {
                self.actor.velocity = self.tuning.flap_velocity;
                true
            }
        }
    }

    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Ready | Phase::Paused) {
            self.phase = Phase::Running;
            log::info!("Flappy running");
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Ready | Phase::Paused => Phase::Running,
            over @ Phase::GameOver(_) => over,
        };
    }

    fn spawn_pipe(&mut self) {
        let (low, high) = self.tuning.gap_top_range();
        let top = self.rng.random_range(low..high);
        self.pipes.push(Pipe {
            x: self.tuning.width,
            top,
            scored: false,
        });
    }

    fn end(&mut self, cause: EndCause) -> FlightOutcome {
        self.phase = Phase::GameOver(cause);
        log::info!("Flappy over: {:?}, score {}", cause, self.score);
        FlightOutcome::Ended(cause)
    }
}

/// Has the pipe's trailing edge passed the actor on this tick?
fn passed(rule: ScoringRule, trailing: f32, speed: f32, actor_x: f32) -> bool {
    match rule {
        ScoringRule::Crossing => trailing + speed > actor_x && trailing <= actor_x,
        ScoringRule::ExactEdge => trailing == actor_x,
    }
}

/// Advance the side-scroller by one tick
pub fn tick(state: &mut FlappyState) -> FlightOutcome {
    if !state.phase.is_running() {
        return FlightOutcome::Idle;
    }
    let tuning = &state.tuning;
    let (pipe_width, gap, height, speed) = (
        tuning.pipe_width,
        tuning.pipe_gap,
        tuning.height,
        tuning.pipe_speed,
    );

    // Integrate
    state.actor.velocity += tuning.gravity;
    state.actor.pos.y += state.actor.velocity;

    // Spawn
    state.time_ticks += 1;
    if state.time_ticks % state.tuning.pipe_interval as u64 == 0 {
        state.spawn_pipe();
    }

    // Scroll and drop pipes fully past the left edge
    for pipe in &mut state.pipes {
        pipe.x -= speed;
    }
    state.pipes.retain(|p| p.x + pipe_width > 0.0);

    // Collide
    let bounds = state.actor.bounds();
    let hit = state
        .pipes
        .iter()
        .any(|p| actor_pipe_collision(&bounds, p.x, pipe_width, p.top, gap, height).is_some());
    if hit {
        return state.end(EndCause::Pipe);
    }
    if actor_out_of_bounds(&bounds, height) {
        return state.end(EndCause::OutOfBounds);
    }

    // Score
    let rule = state.tuning.scoring;
    let actor_x = state.actor.pos.x;
    let mut count = 0;
    for pipe in state.pipes.iter_mut().filter(|p| !p.scored) {
        if passed(rule, pipe.x + pipe_width, speed, actor_x) {
            pipe.scored = true;
            count += 1;
        }
    }
    if count > 0 {
        state.score += count;
        log::debug!("Flappy score {}", state.score);
    }
    FlightOutcome::Flew { passed: count }
}
