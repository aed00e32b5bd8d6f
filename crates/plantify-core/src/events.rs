use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;
use crate::view::Stage;

/// Why the growth level moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthCause {
    /// The countdown reached zero.
    SessionCompleted,
    /// "Complete Session" pressed by hand.
    ManualSession,
    /// "Bonus +2" pressed.
    Bonus,
    /// Add / Remove growth buttons.
    Adjusted,
    /// Confirmed growth reset.
    Reset,
}

/// Every state change in the system produces an Event.
/// The CLI prints them; the interactive view re-renders on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Fired exactly once per finished countdown.
    SessionCompleted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    GrowthChanged {
        from: u8,
        to: u8,
        cause: GrowthCause,
        at: DateTime<Utc>,
    },
    /// The user declined the reset confirmation.
    GrowthResetDeclined {
        level: u8,
        at: DateTime<Utc>,
    },
    GustStarted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    GustEnded {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        duration_secs: u64,
        remaining_secs: u64,
        progress: f64,
        growth: u8,
        max_growth: u8,
        stage: Stage,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_session_completed(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }
}
