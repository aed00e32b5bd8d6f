//! # Plantify Core Library
//!
//! A focus-session timer paired with a plant that grows one stage each time a
//! session finishes. All state transitions live here; the CLI is a thin
//! front-end over the same types.
//!
//! ## Architecture
//!
//! - **Session Timer**: a countdown state machine fed by an injected
//!   [`Ticker`], so tests can advance virtual time
//! - **Growth Tracker**: a clamped growth level written through to an
//!   injected [`KvStore`] on every change
//! - **Garden**: maps user actions onto the two and credits completions
//! - **Wind**: cosmetic gust scheduling
//! - **Storage**: SQLite key-value store and session log, TOML configuration
//!
//! ## Key Components
//!
//! - [`Garden`]: controller for timer + growth
//! - [`SessionTimer`]: countdown state machine
//! - [`GrowthTracker`]: persisted growth level
//! - [`Database`]: key-value and session persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod garden;
pub mod growth;
pub mod storage;
pub mod timer;
pub mod view;
pub mod wind;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{Event, GrowthCause};
pub use garden::{Action, Garden, BONUS_GROWTH};
pub use growth::{Confirm, GrowthTracker, GROWTH_KEY, MAX_GROWTH};
pub use storage::{Config, Database, KvStore, MemoryStore, SessionSource, Stats};
pub use timer::{ManualTicker, SessionTimer, Ticker, TimerState, WallTicker};
pub use view::{PlantView, Stage};
pub use wind::{GustScheduler, GustTiming};
