//! The garden ties the session timer to the growth tracker.
//!
//! Front-ends translate button presses into [`Action`]s and forward elapsed
//! time through `tick()`/`advance()`. Each call returns the events it caused,
//! in order.

use chrono::Utc;

use crate::events::{Event, GrowthCause};
use crate::growth::{Confirm, GrowthTracker, MAX_GROWTH};
use crate::storage::KvStore;
use crate::timer::{SessionTimer, Ticker, WallTicker};
use crate::view::{PlantView, Stage};

/// Growth granted by the bonus button.
pub const BONUS_GROWTH: u8 = 2;

/// The user-facing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddGrowth,
    RemoveGrowth,
    /// Confirmation gated.
    ResetGrowth,
    /// The Start/Pause button.
    ToggleTimer,
    StartTimer,
    PauseTimer,
    ResetTimer,
    /// Credit a session by hand (+1).
    CompleteSession,
    /// +2.
    Bonus,
    /// Raw text from the duration field, in minutes.
    SetDuration(String),
}

pub struct Garden<S, T = WallTicker> {
    timer: SessionTimer<T>,
    growth: GrowthTracker<S>,
}

impl<S: KvStore, T: Ticker> Garden<S, T> {
    /// Plant a garden, restoring growth from `store`.
    pub fn new(timer: SessionTimer<T>, store: S) -> Self {
        Self {
            timer,
            growth: GrowthTracker::load(store),
        }
    }

    pub fn timer(&self) -> &SessionTimer<T> {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut SessionTimer<T> {
        &mut self.timer
    }

    pub fn growth(&self) -> &GrowthTracker<S> {
        &self.growth
    }

    pub fn growth_mut(&mut self) -> &mut GrowthTracker<S> {
        &mut self.growth
    }

    pub fn level(&self) -> u8 {
        self.growth.level()
    }

    /// Handle one user action.
    ///
    /// Elapsed time is applied first so a session that already ran out is
    /// credited before the action takes effect.
    pub fn dispatch(&mut self, action: Action, confirm: &mut dyn Confirm) -> Vec<Event> {
        let mut events = self.advance();
        tracing::debug!(?action, "dispatch");

        match action {
            Action::AddGrowth => events.extend(self.growth.increment(1, GrowthCause::Adjusted)),
            Action::RemoveGrowth => events.extend(self.growth.decrement(1)),
            Action::ResetGrowth => events.push(self.growth.reset(confirm)),
            Action::ToggleTimer => events.extend(self.timer.toggle()),
            Action::StartTimer => events.extend(self.timer.start()),
            Action::PauseTimer => events.extend(self.timer.pause()),
            Action::ResetTimer => events.push(self.timer.reset()),
            Action::CompleteSession => {
                events.extend(self.growth.increment(1, GrowthCause::ManualSession))
            }
            Action::Bonus => events.extend(self.growth.increment(BONUS_GROWTH, GrowthCause::Bonus)),
            Action::SetDuration(input) => events.push(self.timer.set_duration_input(&input)),
        }
        events
    }

    /// One elapsed second, for front-ends that own their own interval.
    pub fn tick(&mut self) -> Vec<Event> {
        let completed = self.timer.tick();
        self.credit(completed)
    }

    /// Apply whatever time the ticker reports.
    pub fn advance(&mut self) -> Vec<Event> {
        let completed = self.timer.advance();
        self.credit(completed)
    }

    fn credit(&mut self, completed: Option<Event>) -> Vec<Event> {
        let Some(event) = completed else {
            return Vec::new();
        };
        let mut events = vec![event];
        events.extend(self.growth.increment(1, GrowthCause::SessionCompleted));
        events
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer.state(),
            duration_secs: self.timer.duration_secs(),
            remaining_secs: self.timer.remaining_secs(),
            progress: self.timer.progress(),
            growth: self.growth.level(),
            max_growth: MAX_GROWTH,
            stage: Stage::from_level(self.growth.level()),
            at: Utc::now(),
        }
    }

    pub fn view(&self, previous_level: u8, swaying: bool) -> PlantView {
        PlantView::new(self.growth.level(), previous_level, swaying)
    }
}
