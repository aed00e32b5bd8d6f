//! Ambient wind gusts.
//!
//! Purely cosmetic: gusts make the plant sway and never touch timer or growth
//! state. The scheduler keeps one pending gust deadline and at most one
//! active gust. Like the timer it owns no thread; the caller polls it with
//! the current time and sleeps until [`GustScheduler::next_deadline`].

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Randomization bounds for gusts, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GustTiming {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub min_gust_ms: u64,
    pub max_gust_ms: u64,
}

impl Default for GustTiming {
    fn default() -> Self {
        Self {
            min_delay_ms: 4_000,
            max_delay_ms: 10_000,
            min_gust_ms: 800,
            max_gust_ms: 1_600,
        }
    }
}

impl GustTiming {
    pub fn sample_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        sample(rng, self.min_delay_ms, self.max_delay_ms)
    }

    pub fn sample_gust<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        sample(rng, self.min_gust_ms, self.max_gust_ms)
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

#[derive(Debug, Clone)]
pub struct GustScheduler {
    timing: GustTiming,
    next_gust_at_ms: Option<u64>,
    active_until_ms: Option<u64>,
}

impl GustScheduler {
    pub fn new(timing: GustTiming) -> Self {
        Self {
            timing,
            next_gust_at_ms: None,
            active_until_ms: None,
        }
    }

    /// Schedule the first gust. Replaces any pending one.
    pub fn start<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        self.next_gust_at_ms = Some(now_ms + self.timing.sample_delay(rng));
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_gust_at_ms.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active_until_ms.is_some()
    }

    /// The next instant `poll` has something to do.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.active_until_ms, self.next_gust_at_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Process everything due at `now_ms`.
    ///
    /// An active gust ends before a new one may begin. A gust that comes due
    /// while another is still blowing is skipped, but the next one is still
    /// scheduled.
    pub fn poll<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(until) = self.active_until_ms {
            if now_ms >= until {
                self.active_until_ms = None;
                events.push(Event::GustEnded { at: Utc::now() });
            }
        }

        if let Some(due) = self.next_gust_at_ms {
            if now_ms >= due {
                if self.active_until_ms.is_none() {
                    let duration_ms = self.timing.sample_gust(rng);
                    self.active_until_ms = Some(now_ms + duration_ms);
                    tracing::trace!(duration_ms, "gust");
                    events.push(Event::GustStarted {
                        duration_ms,
                        at: Utc::now(),
                    });
                }
                self.next_gust_at_ms = Some(now_ms + self.timing.sample_delay(rng));
            }
        }

        events
    }
}
