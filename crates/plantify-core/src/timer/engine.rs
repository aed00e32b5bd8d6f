//! Session timer implementation.
//!
//! The timer is a countdown state machine over whole seconds. It does not own
//! a thread: time reaches it through an injected [`Ticker`], and the caller
//! drives it with `tick()` (one second) or `advance()` (whatever the ticker
//! says has elapsed).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> (completion) -> Idle
//!   ^________________reset___________________|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::<WallTicker>::new(DEFAULT_DURATION_SECS);
//! timer.start();
//! // In a loop:
//! if let Some(Event::SessionCompleted { .. }) = timer.advance() { /* grow */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::duration::{minutes_to_secs, parse_minutes, DEFAULT_MINUTES};
use super::ticker::{Ticker, WallTicker};
use crate::events::Event;

pub const DEFAULT_DURATION_SECS: u64 = DEFAULT_MINUTES * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Full duration loaded, not counting.
    Idle,
    Running,
    /// Stopped mid-session; remaining time preserved.
    Paused,
}

/// Countdown timer for a single focus session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer<T = WallTicker> {
    duration_secs: u64,
    remaining_secs: u64,
    state: TimerState,
    ticker: T,
}

impl<T: Ticker + Default> SessionTimer<T> {
    /// Create an idle timer. A zero duration is bumped to one second.
    pub fn new(duration_secs: u64) -> Self {
        Self::with_ticker(duration_secs, T::default())
    }

    pub fn with_minutes(minutes: u64) -> Self {
        Self::new(minutes_to_secs(minutes))
    }
}

impl<T: Ticker + Default> Default for SessionTimer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl<T: Ticker> SessionTimer<T> {
    pub fn with_ticker(duration_secs: u64, mut ticker: T) -> Self {
        let duration_secs = duration_secs.max(1);
        ticker.disarm();
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
            ticker,
        }
    }

    /// Repair a timer loaded from storage so its invariants hold again.
    pub fn normalized(mut self) -> Self {
        self.duration_secs = self.duration_secs.max(1);
        if self.remaining_secs == 0 || self.remaining_secs > self.duration_secs {
            self.remaining_secs = self.duration_secs;
        }
        match self.state {
            TimerState::Running => self.ticker.arm(),
            TimerState::Idle | TimerState::Paused => self.ticker.disarm(),
        }
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// 0.0 .. 1.0 progress through the current session.
    pub fn progress(&self) -> f64 {
        crate::view::session_progress(self.remaining_secs, self.duration_secs)
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                self.ticker.arm();
                tracing::debug!(remaining_secs = self.remaining_secs, "timer started");
                Some(Event::TimerStarted {
                    duration_secs: self.duration_secs,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                // Flush elapsed time first. Completion belongs to advance(),
                // so a pause never takes the last second.
                let elapsed = self.ticker.poll();
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed).max(1);
                self.state = TimerState::Paused;
                self.ticker.disarm();
                tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Idle | TimerState::Paused => None,
        }
    }

    /// The Start/Pause button.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.ticker.disarm();
        self.remaining_secs = self.duration_secs;
        tracing::debug!(duration_secs = self.duration_secs, "timer reset");
        Event::TimerReset {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Apply the duration input field. Never fails; see [`parse_minutes`].
    pub fn set_duration_input(&mut self, input: &str) -> Event {
        self.set_duration_minutes(parse_minutes(input))
    }

    pub fn set_duration_minutes(&mut self, minutes: u64) -> Event {
        self.set_duration_secs(minutes_to_secs(minutes))
    }

    /// Change the session length.
    ///
    /// When stopped, remaining time resyncs to the new duration. While
    /// running, the session keeps counting but remaining is capped at the
    /// new duration.
    pub fn set_duration_secs(&mut self, duration_secs: u64) -> Event {
        self.duration_secs = duration_secs.max(1);
        if self.is_running() {
            self.remaining_secs = self.remaining_secs.min(self.duration_secs);
        } else {
            self.state = TimerState::Idle;
            self.remaining_secs = self.duration_secs;
        }
        tracing::debug!(duration_secs = self.duration_secs, "duration changed");
        Event::DurationChanged {
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// One elapsed second. Returns `Some(Event::SessionCompleted)` when the
    /// countdown hits zero; the timer is then idle again with a full duration.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = TimerState::Idle;
        self.ticker.disarm();
        self.remaining_secs = self.duration_secs;
        tracing::info!(duration_secs = self.duration_secs, "session completed");
        Some(Event::SessionCompleted {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        })
    }

    /// Apply every second the ticker reports. Seconds beyond a completion are
    /// dropped, so one `advance` yields at most one completion.
    pub fn advance(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let elapsed = self.ticker.poll();
        let steps = elapsed.min(self.remaining_secs);
        for _ in 0..steps {
            if let Some(event) = self.tick() {
                return Some(event);
            }
        }
        None
    }
}
