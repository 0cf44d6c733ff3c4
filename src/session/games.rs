//! `ArcadeGame` for the built-in games

use super::ArcadeGame;
use crate::consts::FRAME_MS;
use crate::input::{Button, Intent};
use crate::renderer::{DrawList, scene};
use crate::scheduler::Cadence;
use crate::sim::{self, FlappyState, GridState, Phase};

impl ArcadeGame for GridState {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn cadence(&self) -> Cadence {
        Cadence::FixedDelay {
            interval_ms: self.tick_ms,
        }
    }

    fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Steer { direction, resume } => {
                let accepted = self.steer(direction);
                // The touch pad doubles as a resume control
                if resume && matches!(self.phase, Phase::Ready | Phase::Paused) {
                    self.start();
                }
                accepted
            }
            Intent::Button(Button::Start) => {
                self.start();
                true
            }
            Intent::Button(Button::PauseToggle) => {
                self.toggle_pause();
                true
            }
            Intent::SteerRelease | Intent::Activate | Intent::Button(_) => false,
        }
    }

    fn tick(&mut self) {
        sim::grid::tick(self);
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn tick_interval_ms(&self) -> Option<u32> {
        Some(self.tick_ms)
    }

    fn reset(&mut self, seed: u64) {
        *self = GridState::new(seed, self.tuning.clone());
    }

    fn draw(&self, list: &mut DrawList) {
        scene::draw_grid(self, list);
    }
}

impl ArcadeGame for FlappyState {
    fn title(&self) -> &'static str {
        "Flappy"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame { frame_ms: FRAME_MS }
    }

    fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Activate => self.flap(),
            Intent::Button(Button::Start) => {
                self.start();
                true
            }
            Intent::Button(Button::PauseToggle) => {
                self.toggle_pause();
                true
            }
            Intent::Steer { .. } | Intent::SteerRelease | Intent::Button(_) => false,
        }
    }

    fn tick(&mut self) {
        sim::flappy::tick(self);
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn tick_interval_ms(&self) -> Option<u32> {
        None
    }

    fn reset(&mut self, seed: u64) {
        *self = FlappyState::new(seed, self.tuning.clone());
    }

    fn draw(&self, list: &mut DrawList) {
        scene::draw_flappy(self, list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FlappyTuning, GridTuning};
    use crate::sim::Direction;

    #[test]
    fn test_grid_ignores_activate() {
        let mut state = GridState::new(1, GridTuning::default());
        assert!(!state.apply(Intent::Activate));
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn test_keyboard_steer_does_not_start() {
        let mut state = GridState::new(1, GridTuning::default());
        assert!(state.apply(Intent::Steer {
            direction: Direction::Up,
            resume: false
        }));
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.pending, Direction::Up);
    }

    #[test]
    fn test_grid_reset_keeps_tuning() {
        let mut tuning = GridTuning::default();
        tuning.tick_ms = 200;
        let mut state = GridState::new(1, tuning);
        state.score = 9;
        state.reset(2);
        assert_eq!(state.score, 0);
        assert_eq!(state.tick_ms, 200);
        assert_eq!(state.seed, 2);
    }

    #[test]
    fn test_flappy_ignores_steering() {
        let mut state = FlappyState::new(1, FlappyTuning::flappy_bird());
        assert!(!state.apply(Intent::Steer {
            direction: Direction::Up,
            resume: true
        }));
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.apply(Intent::Activate));
        assert_eq!(state.actor.velocity, -8.0);
    }
}
