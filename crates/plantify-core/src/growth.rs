//! Plant growth tracking.
//!
//! The growth level is a small integer clamped to `[0, MAX_GROWTH]`. It is
//! written through to the injected [`KvStore`] on every change, as the decimal
//! string under [`GROWTH_KEY`]. Storage problems are logged and otherwise
//! ignored: the in-memory level stays authoritative.

use chrono::Utc;

use crate::events::{Event, GrowthCause};
use crate::storage::KvStore;

pub const MAX_GROWTH: u8 = 8;
pub const GROWTH_KEY: &str = "plantify-growth";
pub const RESET_PROMPT: &str = "Reset plant growth to 0?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Decode a persisted growth value. Missing or malformed data is 0;
/// out-of-range integers are clamped.
pub fn decode_level(raw: Option<&str>) -> u8 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.clamp(0, MAX_GROWTH as i64) as u8)
        .unwrap_or(0)
}

pub struct GrowthTracker<S> {
    level: u8,
    store: S,
}

impl<S: KvStore> GrowthTracker<S> {
    /// Restore the level from `store`.
    pub fn load(store: S) -> Self {
        let raw = match store.kv_get(GROWTH_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "could not read growth level, starting from 0");
                None
            }
        };
        let level = decode_level(raw.as_deref());
        tracing::debug!(level, "growth loaded");
        Self { level, store }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Add `n` levels, stopping at [`MAX_GROWTH`].
    /// Returns `None` when the level did not move.
    pub fn increment(&mut self, n: u8, cause: GrowthCause) -> Option<Event> {
        let target = self.level.saturating_add(n).min(MAX_GROWTH);
        self.set(target, cause)
    }

    /// Remove `n` levels, stopping at 0.
    pub fn decrement(&mut self, n: u8) -> Option<Event> {
        let target = self.level.saturating_sub(n);
        self.set(target, GrowthCause::Adjusted)
    }

    /// Reset to 0, but only if `confirm` agrees.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) -> Event {
        if !confirm.confirm(RESET_PROMPT) {
            tracing::debug!(level = self.level, "growth reset declined");
            return Event::GrowthResetDeclined {
                level: self.level,
                at: Utc::now(),
            };
        }
        let from = self.level;
        self.level = 0;
        self.persist();
        tracing::info!(from, "growth reset");
        Event::GrowthChanged {
            from,
            to: 0,
            cause: GrowthCause::Reset,
            at: Utc::now(),
        }
    }

    fn set(&mut self, target: u8, cause: GrowthCause) -> Option<Event> {
        if target == self.level {
            return None;
        }
        let from = self.level;
        self.level = target;
        self.persist();
        tracing::info!(from, to = target, ?cause, "growth changed");
        Some(Event::GrowthChanged {
            from,
            to: target,
            cause,
            at: Utc::now(),
        })
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.kv_set(GROWTH_KEY, &self.level.to_string()) {
            tracing::warn!(error = %e, level = self.level, "could not persist growth level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Result};
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn tracker(initial: Option<&str>) -> GrowthTracker<MemoryStore> {
        let store = match initial {
            Some(raw) => MemoryStore::with_entry(GROWTH_KEY, raw),
            None => MemoryStore::new(),
        };
        GrowthTracker::load(store)
    }

    #[test]
    fn loads_persisted_value() {
        assert_eq!(tracker(Some("5")).level(), 5);
        assert_eq!(tracker(Some(" 3 ")).level(), 3);
    }

    #[test]
    fn malformed_or_missing_loads_zero() {
        assert_eq!(tracker(Some("abc")).level(), 0);
        assert_eq!(tracker(Some("")).level(), 0);
        assert_eq!(tracker(None).level(), 0);
    }

    #[test]
    fn out_of_range_loads_clamped() {
        assert_eq!(tracker(Some("42")).level(), MAX_GROWTH);
        assert_eq!(tracker(Some("-4")).level(), 0);
    }

    #[test]
    fn increment_clamps_at_max() {
        let mut t = tracker(Some("8"));
        assert!(t.increment(1, GrowthCause::Adjusted).is_none());
        assert_eq!(t.level(), 8);

        let mut t = tracker(Some("7"));
        t.increment(2, GrowthCause::Bonus);
        assert_eq!(t.level(), MAX_GROWTH);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut t = tracker(None);
        assert!(t.decrement(1).is_none());
        assert_eq!(t.level(), 0);
    }

    #[test]
    fn every_change_is_persisted() {
        let mut t = tracker(None);
        t.increment(1, GrowthCause::Adjusted);
        assert_eq!(t.store().get(GROWTH_KEY), Some("1"));
        t.increment(2, GrowthCause::Bonus);
        assert_eq!(t.store().get(GROWTH_KEY), Some("3"));
        t.decrement(1);
        assert_eq!(t.store().get(GROWTH_KEY), Some("2"));
        assert_eq!(t.store().writes(), 3);
    }

    #[test]
    fn unchanged_level_is_not_rewritten() {
        let mut t = tracker(Some("8"));
        t.increment(1, GrowthCause::Adjusted);
        assert_eq!(t.store().writes(), 0);
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut t = tracker(Some("6"));
        let mut asked = None;
        let event = t.reset(&mut |prompt: &str| {
            asked = Some(prompt.to_string());
            false
        });
        assert!(matches!(event, Event::GrowthResetDeclined { level: 6, .. }));
        assert_eq!(t.level(), 6);
        assert_eq!(t.store().writes(), 0);
        assert_eq!(asked.as_deref(), Some(RESET_PROMPT));

        let event = t.reset(&mut |_: &str| true);
        assert!(matches!(
            event,
            Event::GrowthChanged { from: 6, to: 0, cause: GrowthCause::Reset, .. }
        ));
        assert_eq!(t.level(), 0);
        assert_eq!(t.store().get(GROWTH_KEY), Some("0"));
    }

    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn kv_get(&self, _key: &str) -> Result<Option<String>> {
            Err(CoreError::DataDir("gone".into()))
        }

        fn kv_set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(CoreError::DataDir("gone".into()))
        }
    }

    #[test]
    fn storage_failures_never_surface() {
        let mut t = GrowthTracker::load(BrokenStore);
        assert_eq!(t.level(), 0);
        assert!(t.increment(1, GrowthCause::Adjusted).is_some());
        assert_eq!(t.level(), 1);
    }

    proptest! {
        #[test]
        fn level_stays_in_domain(ops in prop::collection::vec((any::<bool>(), 0u8..=10), 0..100)) {
            let mut t = tracker(None);
            for (up, n) in ops {
                if up {
                    t.increment(n, GrowthCause::Adjusted);
                } else {
                    t.decrement(n);
                }
                prop_assert!(t.level() <= MAX_GROWTH);
                prop_assert_eq!(decode_level(t.store().get(GROWTH_KEY)), t.level());
            }
        }
    }
}
