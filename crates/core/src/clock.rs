//! Countdown clock driving the timed game-over.
//!
//! The clock is advanced by frame deltas in seconds. Whole seconds are
//! subtracted from the remaining time as they accumulate; dropping below zero
//! expires the clock exactly once.

use tracing::{debug, info};

/// Lifecycle of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Created, never started.
    Idle,
    Running,
    /// Paused by `stop()`; `start()` resumes.
    Stopped,
    /// Time ran out. Only `reset()` leaves this phase.
    Expired,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    /// Not running; nothing happened.
    Idle,
    /// Running, but no whole second elapsed.
    Pending,
    /// One or more seconds elapsed; carries the new remaining time.
    Changed(i32),
    /// The countdown went below zero during this tick.
    Expired,
}

#[derive(Debug, Clone)]
pub struct GameClock {
    duration: u32,
    remaining: i32,
    accumulator: f32,
    phase: ClockPhase,
}

/// Longest countdown; keeps `remaining` (duration plus one) inside `i32`.
pub const MAX_DURATION_SECS: u32 = i32::MAX as u32 - 1;

impl GameClock {
    pub fn new(duration_secs: u32) -> Self {
        let duration_secs = duration_secs.min(MAX_DURATION_SECS);
        Self {
            duration: duration_secs,
            remaining: duration_secs as i32,
            accumulator: 0.0,
            phase: ClockPhase::Idle,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == ClockPhase::Expired
    }

    /// Seconds a timer display should show.
    ///
    /// Right after `reset()` the remaining time is one above the duration; the
    /// display still starts at the full duration.
    pub fn display_seconds(&self) -> u32 {
        self.remaining.clamp(0, self.duration as i32) as u32
    }

    /// Arm the countdown for a new session and start it.
    ///
    /// The extra second absorbs the first tick so the display begins at the
    /// full duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration as i32 + 1;
        self.accumulator = 0.0;
        self.phase = ClockPhase::Running;
        debug!(duration = self.duration, "clock reset");
    }

    pub fn start(&mut self) {
        match self.phase {
            ClockPhase::Idle | ClockPhase::Stopped => self.phase = ClockPhase::Running,
            ClockPhase::Running | ClockPhase::Expired => {}
        }
    }

    pub fn stop(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Stopped;
        }
    }

    /// Advance by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32) -> ClockSignal {
        if self.phase != ClockPhase::Running {
            return ClockSignal::Idle;
        }

        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.accumulator += delta_secs;
        }

        let mut signal = ClockSignal::Pending;
        while self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            self.remaining -= 1;

            if self.remaining < 0 {
                self.phase = ClockPhase::Expired;
                self.accumulator = 0.0;
                info!("clock expired");
                return ClockSignal::Expired;
            }
            signal = ClockSignal::Changed(self.remaining);
        }

        signal
    }
}
