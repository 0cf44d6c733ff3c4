//! A mounted game: one game instance, its tick timer and its input mapping
//!
//! The platform layer feeds raw events and timestamps in; the session turns
//! them into intents and ticks. Input is applied between ticks, never during
//! one, because both go through `&mut self`.

mod games;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::{Button, InputNormalizer, Intent, KeyBindings, RawEvent};
use crate::renderer::DrawList;
use crate::scheduler::{Cadence, TickScheduler};
use crate::settings::InputTuning;
use crate::sim::Phase;

/// What a session needs from a game
pub trait ArcadeGame {
    /// Display name for logs and the HUD
    fn title(&self) -> &'static str;

    fn cadence(&self) -> Cadence;

    /// Apply an intent between ticks. Returns whether the game reacted.
    fn apply(&mut self, intent: Intent) -> bool;

    fn tick(&mut self);

    fn phase(&self) -> Phase;

    fn score(&self) -> u32;

    /// Current fixed-delay interval; `None` for frame-paced games
    fn tick_interval_ms(&self) -> Option<u32>;

    /// Back to a fresh Ready state. Same seed, same state.
    fn reset(&mut self, seed: u64);

    fn draw(&self, list: &mut DrawList);
}

/// One game instance and everything that drives it
pub struct Session<G: ArcadeGame> {
    game: G,
    scheduler: TickScheduler,
    input: InputNormalizer,
    /// Source of seeds for resets
    seeds: Pcg32,
    ticks: u64,
}

impl<G: ArcadeGame> Session<G> {
    /// Wrap a game built by `build(seed)`; the first seed comes from
    /// `session_seed`'s sequence.
    pub fn new(
        session_seed: u64,
        build: impl FnOnce(u64) -> G,
        bindings: KeyBindings,
        tuning: &InputTuning,
    ) -> Self {
        let mut seeds = Pcg32::seed_from_u64(session_seed);
        let game = build(seeds.random());
        log::info!("Mounted {}", game.title());
        Self {
            scheduler: TickScheduler::new(game.cadence()),
            game,
            input: InputNormalizer::new(bindings, tuning),
            seeds,
            ticks: 0,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn input(&self) -> &InputNormalizer {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    /// Track the rendered size of the touch pad
    pub fn set_pad_size(&mut self, size: f32) {
        self.input.dpad.resize(size);
    }

    /// Ticks run since mount
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Normalize and apply one raw event. Returns the intent it produced.
    pub fn handle_event(&mut self, event: &RawEvent, now: f64) -> Option<Intent> {
        let intent = self.input.normalize(event)?;
        self.apply(intent, now);
        Some(intent)
    }

    /// Apply an already-normalized intent
    pub fn apply(&mut self, intent: Intent, now: f64) {
        match intent {
            Intent::Button(Button::Reset) => self.restart(false),
            Intent::Button(Button::Start | Button::PauseToggle) if self.game.phase().is_over() => {
                self.restart(true)
            }
            _ => {
                self.game.apply(intent);
            }
        }
        self.sync(now);
    }

    /// Fresh run with the next seed; the old timer is released
    fn restart(&mut self, then_start: bool) {
        let seed = self.seeds.random();
        self.scheduler.cancel();
        self.game.reset(seed);
        log::info!("{} reset (seed {})", self.game.title(), seed);
        if then_start {
            self.game.apply(Intent::Button(Button::Start));
        }
    }

    /// Timer follows the phase: running games tick, everything else waits
    fn sync(&mut self, now: f64) {
        if self.game.phase().is_running() {
            if let Some(ms) = self.game.tick_interval_ms() {
                self.scheduler.set_interval(ms);
            }
            self.scheduler.start(now);
            self.scheduler.resume(now);
        } else {
            self.scheduler.suspend();
        }
    }

    /// Run every tick that is due at `now`. Returns how many ran.
    pub fn pump(&mut self, now: f64) -> u32 {
        let mut ran = 0;
        while let Some(ticket) = self.scheduler.poll(now) {
            self.game.tick();
            ran += 1;
            self.ticks += 1;
            if let Some(ms) = self.game.tick_interval_ms() {
                self.scheduler.set_interval(ms);
            }
            self.scheduler.finish(ticket, now);
            if !self.game.phase().is_running() {
                self.scheduler.suspend();
                break;
            }
        }
        ran
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.game.draw(list);
    }

    /// Release the timer; the session must not be pumped afterwards
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        log::info!(
            "Unmounted {} after {} ticks (score {})",
            self.game.title(),
            self.ticks,
            self.game.score()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimerState;
    use crate::settings::{FlappyTuning, GridTuning, Settings};
    use crate::sim::{EndCause, FlappyState, GridState};

    fn grid_session() -> Session<GridState> {
        let settings = Settings::default();
        Session::new(
            1,
            |seed| GridState::new(seed, GridTuning::default()),
            settings.grid_keys,
            &settings.input,
        )
    }

    fn flappy_session() -> Session<FlappyState> {
        let settings = Settings::default();
        Session::new(
            1,
            |seed| FlappyState::new(seed, FlappyTuning::flappy_box()),
            settings.flappy_keys,
            &settings.input,
        )
    }

    fn key(name: &str) -> RawEvent {
        RawEvent::KeyDown(name.to_string())
    }

    #[test]
    fn test_ready_until_started() {
        let mut session = grid_session();
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.pump(10_000.0), 0);

        session.handle_event(&key("Enter"), 0.0);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.pump(119.0), 0);
        assert_eq!(session.pump(120.0), 1);
        assert_eq!(session.game().head(), glam::IVec2::new(9, 10));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut session = grid_session();
        assert_eq!(session.handle_event(&key("F13"), 0.0), None);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_pause_suspends_timer() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        session.handle_event(&key(" "), 50.0);
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.scheduler().state(), TimerState::Suspended);
        assert_eq!(session.pump(5_000.0), 0);

        session.handle_event(&key(" "), 5_000.0);
        assert_eq!(session.pump(5_119.0), 0);
        assert_eq!(session.pump(5_120.0), 1);
    }

    #[test]
    fn test_touch_steer_resumes() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        session.handle_event(&key(" "), 10.0);
        // Pad center is (96, 96); well above it
        let intent = session.handle_event(&RawEvent::TouchStart { x: 96.0, y: 10.0 }, 20.0);
        assert!(matches!(intent, Some(Intent::Steer { resume: true, .. })));
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.scheduler().is_running());
    }

    #[test]
    fn test_touch_uses_rendered_pad_size() {
        let mut session = grid_session();
        session.set_pad_size(100.0);
        // Center is now (50, 50): this is well right of it
        let intent = session.handle_event(&RawEvent::TouchStart { x: 95.0, y: 55.0 }, 0.0);
        assert!(matches!(
            intent,
            Some(Intent::Steer {
                direction: crate::sim::Direction::Right,
                ..
            })
        ));
        // Inside the dead-zone of the smaller pad
        assert_eq!(
            session.handle_event(&RawEvent::TouchMove { x: 60.0, y: 50.0 }, 1.0),
            None
        );
    }

    #[test]
    fn test_interval_fed_back_after_eating() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        let target = session.game().next_head(session.game().pending);
        session.game_mut().food = target;
        assert_eq!(session.pump(120.0), 1);
        assert_eq!(session.game().tick_ms, 114);
        assert_eq!(
            session.scheduler().cadence(),
            Cadence::FixedDelay { interval_ms: 114 }
        );
        assert_eq!(session.pump(233.0), 0);
        assert_eq!(session.pump(234.0), 1);
    }

    #[test]
    fn test_game_over_suspends_then_enter_restarts() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        let blocked = session.game().next_head(session.game().pending);
        session.game_mut().obstacles.push(blocked);
        session.pump(120.0);
        assert_eq!(session.phase(), Phase::GameOver(EndCause::Obstacle));
        assert_eq!(session.scheduler().state(), TimerState::Suspended);
        assert_eq!(session.pump(10_000.0), 0);

        let old_seed = session.game().seed;
        let generation = session.scheduler().generation();
        session.handle_event(&key("Enter"), 10_000.0);
        assert_eq!(session.phase(), Phase::Running);
        assert_ne!(session.game().seed, old_seed);
        assert!(session.game().obstacles.is_empty());
        assert!(!session.scheduler().is_current(generation));
        assert_eq!(session.pump(10_120.0), 1);
    }

    #[test]
    fn test_reset_returns_to_ready() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        session.pump(120.0);
        session.handle_event(&key("r"), 130.0);
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.game().score, 0);
        assert_eq!(session.scheduler().state(), TimerState::Idle);
        assert_eq!(session.pump(10_000.0), 0);
    }

    #[test]
    fn test_reset_same_seed_is_repeatable() {
        let mut session = grid_session();
        session.handle_event(&key("Enter"), 0.0);
        session.pump(120.0);
        session.game_mut().reset(77);
        let first = serde_json::to_value(session.game()).unwrap();
        session.game_mut().reset(77);
        assert_eq!(serde_json::to_value(session.game()).unwrap(), first);
    }

    #[test]
    fn test_flappy_pointer_flaps_and_frames_tick() {
        let mut session = flappy_session();
        session.handle_event(&RawEvent::PointerDown, 0.0);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.game().actor.velocity, -6.0);
        // Two frame budgets elapsed
        assert_eq!(session.pump(34.0), 2);
        assert_eq!(session.ticks(), 2);
    }

    #[test]
    fn test_flappy_space_flaps_escape_pauses() {
        let mut session = flappy_session();
        session.handle_event(&key(" "), 0.0);
        assert_eq!(session.phase(), Phase::Running);
        session.handle_event(&key("Escape"), 5.0);
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.pump(1_000.0), 0);
    }

    #[test]
    fn test_teardown_cancels() {
        let mut session = flappy_session();
        session.handle_event(&RawEvent::PointerDown, 0.0);
        let generation = session.scheduler().generation();
        session.teardown();
        assert!(!session.scheduler().is_current(generation));
        assert_eq!(session.pump(1_000.0), 0);
    }
}
