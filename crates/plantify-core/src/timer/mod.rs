mod duration;
mod engine;
mod ticker;

pub use duration::{
    clamp_minutes, minutes_to_secs, parse_minutes, DEFAULT_MINUTES, MAX_MINUTES, MIN_MINUTES,
};
pub use engine::{SessionTimer, TimerState, DEFAULT_DURATION_SECS};
pub use ticker::{ManualTicker, Ticker, WallTicker};
