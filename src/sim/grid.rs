//! Wrap-around Snake with growing obstacles
//!
//! One call to [`tick`] moves the snake one cell. Eating food grows the
//! snake, drops a new obstacle and speeds the game up.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::cell_occupied;
use super::{Direction, EndCause, Phase};
use crate::settings::GridTuning;
use crate::wrap;

/// Integer grid coordinate
pub type Cell = IVec2;

/// Starting body, head first
pub const INITIAL_SNAKE: [(i32, i32); 3] = [(8, 10), (7, 10), (6, 10)];

/// Random picks before falling back to scanning for free cells
const RESAMPLE_ATTEMPTS: u32 = 64;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// Moved one cell
    Moved,
    /// Moved onto food and grew
    Ate,
    /// Hit something; state frozen at the last valid values
    Ended(EndCause),
}

/// Complete Snake state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GridState {
    /// Seed this run was created with
    pub seed: u64,
    pub tuning: GridTuning,
    /// Body cells, head first
    pub snake: VecDeque<Cell>,
    /// Direction of the last executed move
    pub heading: Direction,
    /// Latest accepted steering request, applied on the next tick
    pub pending: Direction,
    pub food: Cell,
    /// In placement order
    pub obstacles: Vec<Cell>,
    pub score: u32,
    /// Current ms per move
    pub tick_ms: u32,
    /// Moves executed this run
    pub time_ticks: u64,
    pub phase: Phase,
    #[serde(skip)]
    rng: Pcg32,
}

impl GridState {
    /// Fresh run: initial snake heading right, random food, no obstacles
    pub fn new(seed: u64, tuning: GridTuning) -> Self {
        let snake: VecDeque<Cell> = INITIAL_SNAKE
            .iter()
            .map(|&(x, y)| IVec2::new(x, y))
            .collect();
        let mut rng = Pcg32::seed_from_u64(seed);
        let food = random_free_cell(&mut rng, tuning.cols, tuning.rows, |c| {
            snake.contains(&c)
        })
        .unwrap_or(IVec2::ZERO);

        Self {
            seed,
            tick_ms: tuning.tick_ms,
            tuning,
            snake,
            heading: Direction::Right,
            pending: Direction::Right,
            food,
            obstacles: Vec::new(),
            score: 0,
            time_ticks: 0,
            phase: Phase::Ready,
            rng,
        }
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// Request a new direction. Reversals are ignored; returns whether the
    /// request was accepted.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction.is_reverse_of(self.heading) {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Ready/Paused → Running. No effect once the run is over.
    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Ready | Phase::Paused) {
            self.phase = Phase::Running;
            log::info!("Snake running (interval {}ms)", self.tick_ms);
        }
    }

    /// Running ↔ Paused; Ready starts the run
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Ready | Phase::Paused => Phase::Running,
            over @ Phase::GameOver(_) => over,
        };
    }

    /// Cell one step from the head in `direction`, wrapped to the grid
    pub fn next_head(&self, direction: Direction) -> Cell {
        let target = self.head() + direction.delta();
        IVec2::new(
            wrap(target.x, self.tuning.cols),
            wrap(target.y, self.tuning.rows),
        )
    }

    fn end(&mut self, cause: EndCause) -> TickOutcome {
        self.phase = Phase::GameOver(cause);
        log::info!("Snake over: {:?}, score {}", cause, self.score);
        TickOutcome::Ended(cause)
    }
}

/// Pick a uniformly random cell not rejected by `occupied`.
///
/// Resamples first; on a crowded board falls back to choosing among the
/// remaining free cells. `None` when the board is full.
pub fn random_free_cell(
    rng: &mut Pcg32,
    cols: i32,
    rows: i32,
    occupied: impl Fn(Cell) -> bool,
) -> Option<Cell> {
    for _ in 0..RESAMPLE_ATTEMPTS {
        let cell = IVec2::new(rng.random_range(0..cols), rng.random_range(0..rows));
        if !occupied(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = (0..rows)
        .flat_map(|y| (0..cols).map(move |x| IVec2::new(x, y)))
        .filter(|c| !occupied(*c))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}

/// Advance the snake by one cell
pub fn tick(state: &mut GridState) -> TickOutcome {
    if !state.phase.is_running() {
        return TickOutcome::Idle;
    }

    let direction = state.pending;
    let new_head = state.next_head(direction);

    // The tail still counts: it hasn't moved out of the way yet
    if cell_occupied(state.snake.iter(), new_head) {
        return state.end(EndCause::SelfCollision);
    }
    if cell_occupied(state.obstacles.iter(), new_head) {
        return state.end(EndCause::Obstacle);
    }

    if new_head == state.food {
        // Place food and obstacle before committing anything
        let (cols, rows) = (state.tuning.cols, state.tuning.rows);
        let snake = &state.snake;
        let obstacles = &state.obstacles;
        let taken = |c: Cell| c == new_head || snake.contains(&c) || obstacles.contains(&c);

        let Some(food) = random_free_cell(&mut state.rng, cols, rows, taken) else {
            return state.end(EndCause::BoardFull);
        };
        let Some(obstacle) =
            random_free_cell(&mut state.rng, cols, rows, |c| c == food || taken(c))
        else {
            return state.end(EndCause::BoardFull);
        };

        state.snake.push_front(new_head);
        state.heading = direction;
        state.score += 1;
        state.food = food;
        state.obstacles.push(obstacle);
        state.tick_ms = state.tuning.next_interval(state.tick_ms);
        state.time_ticks += 1;
        log::debug!(
            "Snake ate at {:?}: score {}, interval {}ms",
            new_head,
            state.score,
            state.tick_ms
        );
        TickOutcome::Ate
    } else {
        state.snake.push_front(new_head);
        state.snake.pop_back();
        state.heading = direction;
        state.time_ticks += 1;
        TickOutcome::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running(seed: u64) -> GridState {
        let mut state = GridState::new(seed, GridTuning::default());
        state.start();
        state
    }

    fn cells(list: &[(i32, i32)]) -> VecDeque<Cell> {
        list.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    fn assert_disjoint(state: &GridState) {
        let mut all: Vec<Cell> = state.snake.iter().copied().collect();
        all.push(state.food);
        all.extend(state.obstacles.iter().copied());
        let mut dedup = all.clone();
        dedup.sort_by_key(|c| (c.x, c.y));
        dedup.dedup();
        assert_eq!(dedup.len(), all.len(), "overlapping cells in {:?}", all);
    }

    #[test]
    fn test_initial_state() {
        let state = GridState::new(7, GridTuning::default());
        assert_eq!(state.snake, cells(&INITIAL_SNAKE));
        assert_eq!(state.heading, Direction::Right);
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.tick_ms, 120);
        assert!(!state.snake.contains(&state.food));
    }

    #[test]
    fn test_idle_when_not_running() {
        let mut state = GridState::new(7, GridTuning::default());
        let before = state.snake.clone();
        assert_eq!(tick(&mut state), TickOutcome::Idle);
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_move_keeps_length() {
        let mut state = running(1);
        state.food = IVec2::new(0, 0);
        assert_eq!(tick(&mut state), TickOutcome::Moved);
        assert_eq!(state.snake, cells(&[(9, 10), (8, 10), (7, 10)]));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_eat_grows_and_spawns() {
        let mut state = running(42);
        state.food = IVec2::new(9, 10);
        assert_eq!(tick(&mut state), TickOutcome::Ate);
        assert_eq!(state.snake, cells(&[(9, 10), (8, 10), (7, 10), (6, 10)]));
        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert!(!state.snake.contains(&state.food));
        assert!(!state.snake.contains(&state.obstacles[0]));
        assert_ne!(state.food, state.obstacles[0]);
        assert_eq!(state.tick_ms, 114);
    }

    #[test]
    fn test_wraps_right_edge() {
        let mut state = running(3);
        state.snake = cells(&[(19, 5), (18, 5), (17, 5)]);
        state.food = IVec2::new(10, 10);
        assert_eq!(tick(&mut state), TickOutcome::Moved);
        assert_eq!(state.head(), IVec2::new(0, 5));
        assert!(state.phase.is_running());
    }

    #[test]
    fn test_wraps_top_edge() {
        let mut state = running(3);
        state.snake = cells(&[(4, 0), (5, 0)]);
        state.heading = Direction::Left;
        state.pending = Direction::Left;
        assert!(state.steer(Direction::Up));
        state.food = IVec2::new(10, 10);
        tick(&mut state);
        assert_eq!(state.head(), IVec2::new(4, 19));
    }

    #[test]
    fn test_reverse_ignored() {
        let mut state = running(5);
        state.food = IVec2::new(0, 0);
        assert!(!state.steer(Direction::Left));
        assert_eq!(state.pending, Direction::Right);
        tick(&mut state);
        assert_eq!(state.head(), IVec2::new(9, 10));
    }

    #[test]
    fn test_same_direction_is_noop() {
        let mut state = running(5);
        state.food = IVec2::new(0, 0);
        let before = state.clone();
        assert!(state.steer(Direction::Right));
        assert_eq!(state.pending, before.pending);
        tick(&mut state);
        assert_eq!(state.head(), before.next_head(Direction::Right));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        // Up then Left before a tick: Left is checked against the executed
        // heading (Right), so it's refused and Up stays pending.
        let mut state = running(5);
        state.food = IVec2::new(0, 0);
        assert!(state.steer(Direction::Up));
        assert!(!state.steer(Direction::Left));
        tick(&mut state);
        assert_eq!(state.head(), IVec2::new(8, 9));
    }

    #[test]
    fn test_self_collision_freezes() {
        let mut state = running(9);
        // Head at (5,5) moving down into its own body at (5,6)
        state.snake = cells(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]);
        state.heading = Direction::Left;
        state.pending = Direction::Left;
        assert!(state.steer(Direction::Down));
        state.food = IVec2::new(0, 0);
        let before = state.snake.clone();
        assert_eq!(tick(&mut state), TickOutcome::Ended(EndCause::SelfCollision));
        assert_eq!(state.phase, Phase::GameOver(EndCause::SelfCollision));
        assert_eq!(state.snake, before);
        assert_eq!(tick(&mut state), TickOutcome::Idle);
    }

    #[test]
    fn test_tail_cell_counts_as_body() {
        let mut state = running(9);
        // 2x2 loop: the next head is the current tail
        state.snake = cells(&[(5, 5), (5, 6), (6, 6), (6, 5)]);
        state.heading = Direction::Up;
        state.pending = Direction::Up;
        assert!(state.steer(Direction::Right));
        state.food = IVec2::new(0, 0);
        assert_eq!(tick(&mut state), TickOutcome::Ended(EndCause::SelfCollision));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut state = running(9);
        state.food = IVec2::new(0, 0);
        state.obstacles.push(IVec2::new(9, 10));
        assert_eq!(tick(&mut state), TickOutcome::Ended(EndCause::Obstacle));
        assert_eq!(state.head(), IVec2::new(8, 10));
    }

    #[test]
    fn test_interval_floor() {
        let mut tuning = GridTuning::default();
        tuning.tick_ms = 45;
        let mut state = GridState::new(11, tuning);
        state.start();
        for _ in 0..5 {
            state.obstacles.clear();
            state.food = state.next_head(state.pending);
            assert_eq!(tick(&mut state), TickOutcome::Ate);
            assert!(state.tick_ms >= 40);
        }
        assert_eq!(state.tick_ms, 40);
    }

    #[test]
    fn test_board_full_leaves_state_untouched() {
        let mut tuning = GridTuning::default();
        tuning.cols = 3;
        tuning.rows = 1;
        let mut state = GridState::new(1, tuning);
        state.snake = cells(&[(1, 0)]);
        state.food = IVec2::new(2, 0);
        state.obstacles = vec![IVec2::new(0, 0)];
        state.start();
        let before = state.snake.clone();
        assert_eq!(tick(&mut state), TickOutcome::Ended(EndCause::BoardFull));
        assert_eq!(state.snake, before);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_random_free_cell_scan_fallback() {
        let mut rng = Pcg32::seed_from_u64(0);
        let only = IVec2::new(2, 1);
        let cell = random_free_cell(&mut rng, 4, 4, |c| c != only);
        assert_eq!(cell, Some(only));
        assert_eq!(random_free_cell(&mut rng, 4, 4, |_| true), None);
    }

    #[test]
    fn test_same_seed_same_state() {
        let a = GridState::new(1234, GridTuning::default());
        let b = GridState::new(1234, GridTuning::default());
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    /// Steer toward the food unless that would reverse
    fn greedy(state: &GridState, noise: u8) -> Direction {
        let d = state.food - state.head();
        if noise % 5 == 0 {
            Direction::ALL[(noise as usize / 5) % 4]
        } else if d.x > 0 {
            Direction::Right
        } else if d.x < 0 {
            Direction::Left
        } else if d.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_every_tick(seed in any::<u64>(), noise in prop::collection::vec(any::<u8>(), 1..400)) {
            let mut state = running(seed);
            let mut last_ms = state.tick_ms;
            for n in noise {
                let direction = greedy(&state, n);
                state.steer(direction);
                let len_before = state.len();
                let score_before = state.score;
                match tick(&mut state) {
                    TickOutcome::Moved => {
                        prop_assert_eq!(state.len(), len_before);
                        prop_assert_eq!(state.score, score_before);
                    }
                    TickOutcome::Ate => {
                        prop_assert_eq!(state.len(), len_before + 1);
                        prop_assert_eq!(state.score, score_before + 1);
                    }
                    TickOutcome::Ended(_) => {
                        prop_assert_eq!(state.len(), len_before);
                        break;
                    }
                    TickOutcome::Idle => unreachable!("running state never idles"),
                }
                assert_disjoint(&state);
                prop_assert!(state.tick_ms <= last_ms);
                prop_assert!(state.tick_ms >= state.tuning.min_tick_ms);
                prop_assert_eq!(state.obstacles.len() as u32, state.score);
                last_ms = state.tick_ms;
            }
        }
    }
}
