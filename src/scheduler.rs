//! Logical tick timers
//!
//! The scheduler never calls into a game. The platform loop polls it with
//! the current time and runs one tick per ticket it hands out:
//!
//! ```text
//! while let Some(ticket) = scheduler.poll(now) {
//!     tick(&mut state);
//!     scheduler.finish(ticket, now);
//! }
//! ```
//!
//! Only one ticket is outstanding at a time, so ticks never overlap.
//! Cancelling bumps the generation; tickets from an older generation are
//! ignored when they come back.

use crate::consts::MAX_SUBSTEPS;

/// How often a game ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// One tick every `interval_ms`, counted from the previous due time
    FixedDelay { interval_ms: u32 },
    /// One tick per elapsed frame budget, with bounded catch-up
    Frame { frame_ms: f64 },
}

/// Timer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never started, or cancelled
    Idle,
    Running,
    /// Paused or terminal; can be resumed
    Suspended,
}

/// Permission to run exactly one tick
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket must be handed back with finish()"]
pub struct TickTicket {
    generation: u64,
}

impl TickTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One game instance's timer
#[derive(Debug, Clone)]
pub struct TickScheduler {
    cadence: Cadence,
    state: TimerState,
    generation: u64,
    in_flight: bool,
    /// FixedDelay: time the next tick becomes due
    next_due: f64,
    /// Frame: unspent time
    accumulator: f64,
    last_poll: Option<f64>,
}

impl TickScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            state: TimerState::Idle,
            generation: 0,
            in_flight: false,
            next_due: 0.0,
            accumulator: 0.0,
            last_poll: None,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Does a callback/ticket tagged with `generation` still belong to us?
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    fn arm(&mut self, now: f64) {
        self.state = TimerState::Running;
        self.accumulator = 0.0;
        self.last_poll = Some(now);
        if let Cadence::FixedDelay { interval_ms } = self.cadence {
            self.next_due = now + interval_ms as f64;
        }
    }

    /// Idle → Running. First tick comes one interval/frame after `now`.
    pub fn start(&mut self, now: f64) {
        if self.state == TimerState::Idle {
            self.arm(now);
            log::debug!("Scheduler started (generation {})", self.generation);
        }
    }

    /// Suspended → Running
    pub fn resume(&mut self, now: f64) {
        if self.state == TimerState::Suspended {
            self.arm(now);
        }
    }

    /// Running → Suspended. Pending time is discarded.
    pub fn suspend(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Suspended;
            self.accumulator = 0.0;
        }
    }

    /// Release the timer. Outstanding tickets become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
        self.in_flight = false;
        self.accumulator = 0.0;
        self.last_poll = None;
        log::debug!("Scheduler cancelled (now generation {})", self.generation);
    }

    /// New delay for fixed-delay timers. The tick already scheduled keeps
    /// its due time; the change applies from the next `finish`.
    pub fn set_interval(&mut self, interval_ms: u32) {
        if let Cadence::FixedDelay { interval_ms: current } = &mut self.cadence {
            *current = interval_ms;
        }
    }

    /// Hand out a ticket if a tick is due and none is outstanding
    pub fn poll(&mut self, now: f64) -> Option<TickTicket> {
        if self.state != TimerState::Running || self.in_flight {
            return None;
        }
        let due = match self.cadence {
            Cadence::FixedDelay { .. } => now >= self.next_due,
            Cadence::Frame { frame_ms } => {
                if let Some(last) = self.last_poll {
                    if now > last {
                        // Bound catch-up after a stall (background tab etc.)
                        self.accumulator += (now - last).min(frame_ms * MAX_SUBSTEPS as f64);
                    }
                }
                self.last_poll = Some(now);
                if self.accumulator >= frame_ms {
                    self.accumulator -= frame_ms;
                    true
                } else {
                    false
                }
            }
        };
        if due {
            self.in_flight = true;
            Some(TickTicket {
                generation: self.generation,
            })
        } else {
            None
        }
    }

    /// Return a ticket after its tick ran. Returns false for stale tickets,
    /// which change nothing.
    pub fn finish(&mut self, ticket: TickTicket, now: f64) -> bool {
        if !self.is_current(ticket.generation) {
            log::debug!("Ignoring stale tick from generation {}", ticket.generation);
            return false;
        }
        self.in_flight = false;
        if let Cadence::FixedDelay { interval_ms } = self.cadence {
            let interval = interval_ms as f64;
            // Anchor to the due time so frame-aligned polling doesn't round
            // every interval up; after a stall, restart from `now` instead
            // of bursting.
            let anchored = self.next_due + interval;
            self.next_due = if anchored > now {
                anchored
            } else {
                now + interval
            };
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(ms: u32) -> TickScheduler {
        TickScheduler::new(Cadence::FixedDelay { interval_ms: ms })
    }

    #[test]
    fn test_idle_until_started() {
        let mut sched = fixed(100);
        assert!(sched.poll(1_000.0).is_none());
        sched.start(0.0);
        assert!(sched.poll(99.0).is_none());
        assert!(sched.poll(100.0).is_some());
    }

    #[test]
    fn test_no_overlapping_ticks() {
        let mut sched = fixed(100);
        sched.start(0.0);
        let ticket = sched.poll(150.0).unwrap();
        assert!(sched.in_flight());
        assert!(sched.poll(500.0).is_none());
        assert!(sched.finish(ticket, 150.0));
        // Next tick is due one interval after the previous due time
        assert!(sched.poll(199.0).is_none());
        assert!(sched.poll(200.0).is_some());
    }

    /// Ticks over ten seconds of 60 Hz polling
    fn ticks_on_frame_polls(interval_ms: u32) -> u32 {
        let mut sched = fixed(interval_ms);
        sched.start(0.0);
        let mut ticks = 0;
        for frame in 1..=601 {
            let now = frame as f64 * crate::consts::FRAME_MS;
            while let Some(ticket) = sched.poll(now) {
                ticks += 1;
                sched.finish(ticket, now);
            }
        }
        ticks
    }

    #[test]
    fn test_fixed_delay_rate_survives_frame_polling() {
        assert_eq!(ticks_on_frame_polls(40), 250);
        assert_eq!(ticks_on_frame_polls(45), 222);
        assert_eq!(ticks_on_frame_polls(50), 200);
        assert_eq!(ticks_on_frame_polls(120), 83);
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut sched = fixed(40);
        sched.start(0.0);
        let ticket = sched.poll(5_000.0).unwrap();
        sched.finish(ticket, 5_000.0);
        assert!(sched.poll(5_000.0).is_none());
        assert!(sched.poll(5_039.0).is_none());
        assert!(sched.poll(5_040.0).is_some());
    }

    #[test]
    fn test_interval_change_is_not_retroactive() {
        let mut sched = fixed(100);
        sched.start(0.0);
        // Scheduled for t=100; shrinking the interval now doesn't move it
        sched.set_interval(40);
        assert!(sched.poll(50.0).is_none());
        let ticket = sched.poll(100.0).unwrap();
        sched.finish(ticket, 100.0);
        // Next one uses the new interval
        assert!(sched.poll(139.0).is_none());
        assert!(sched.poll(140.0).is_some());
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut sched = fixed(100);
        sched.start(0.0);
        sched.suspend();
        assert_eq!(sched.state(), TimerState::Suspended);
        assert!(sched.poll(1_000.0).is_none());
        // start() doesn't resume a suspended timer
        sched.start(1_000.0);
        assert_eq!(sched.state(), TimerState::Suspended);
        sched.resume(1_000.0);
        assert!(sched.poll(1_050.0).is_none());
        assert!(sched.poll(1_100.0).is_some());
    }

    #[test]
    fn test_cancel_invalidates_outstanding_ticket() {
        let mut sched = fixed(100);
        sched.start(0.0);
        let stale = sched.poll(100.0).unwrap();
        let old_generation = stale.generation();
        sched.cancel();
        assert!(!sched.is_current(old_generation));
        assert_eq!(sched.state(), TimerState::Idle);

        sched.start(200.0);
        let fresh = sched.poll(300.0).unwrap();
        // The stale ticket must not release the fresh one
        assert!(!sched.finish(stale, 300.0));
        assert!(sched.in_flight());
        assert!(sched.finish(fresh, 300.0));
    }

    #[test]
    fn test_frame_cadence_counts_frames() {
        let mut sched = TickScheduler::new(Cadence::Frame { frame_ms: 10.0 });
        sched.start(0.0);
        let mut ticks = 0;
        while let Some(ticket) = sched.poll(35.0) {
            ticks += 1;
            sched.finish(ticket, 35.0);
        }
        assert_eq!(ticks, 3);
        // Leftover 5ms carries over
        assert!(sched.poll(40.0).is_some());
    }

    #[test]
    fn test_frame_catch_up_is_bounded() {
        let mut sched = TickScheduler::new(Cadence::Frame { frame_ms: 10.0 });
        sched.start(0.0);
        let mut ticks = 0;
        while let Some(ticket) = sched.poll(10_000.0) {
            ticks += 1;
            sched.finish(ticket, 10_000.0);
        }
        assert_eq!(ticks, MAX_SUBSTEPS);
    }
}
