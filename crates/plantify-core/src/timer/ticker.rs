//! Time sources for the session timer.
//!
//! A [`Ticker`] reports how many whole seconds passed while it was armed.
//! The timer arms it on start and disarms it on pause, reset and completion,
//! so there is never more than one live tick source per timer.

use serde::{Deserialize, Serialize};

pub trait Ticker {
    /// Begin counting elapsed seconds. Arming an armed ticker is a no-op.
    fn arm(&mut self);

    /// Stop counting and drop any partial second.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;

    /// Whole seconds elapsed since the last poll (or since arming).
    /// Always 0 while disarmed.
    fn poll(&mut self) -> u64;
}

/// Wall-clock ticker.
///
/// Keeps the last anchor as epoch milliseconds so a serialized timer can be
/// reloaded by a later process and catch up on the seconds it missed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTicker {
    #[serde(default)]
    anchor_epoch_ms: Option<u64>,
}

impl WallTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_at(&mut self, now_ms: u64) {
        if self.anchor_epoch_ms.is_none() {
            self.anchor_epoch_ms = Some(now_ms);
        }
    }

    /// Poll against an explicit clock reading.
    ///
    /// The anchor only moves forward by whole seconds, so the sub-second
    /// remainder carries over to the next poll. A clock that went backwards
    /// yields 0.
    pub fn poll_at(&mut self, now_ms: u64) -> u64 {
        let Some(anchor) = self.anchor_epoch_ms else {
            return 0;
        };
        let elapsed_ms = now_ms.saturating_sub(anchor);
        let secs = elapsed_ms / 1000;
        self.anchor_epoch_ms = Some(anchor + secs * 1000);
        secs
    }
}

impl Ticker for WallTicker {
    fn arm(&mut self) {
        self.arm_at(now_ms());
    }

    fn disarm(&mut self) {
        self.anchor_epoch_ms = None;
    }

    fn is_armed(&self) -> bool {
        self.anchor_epoch_ms.is_some()
    }

    fn poll(&mut self) -> u64 {
        self.poll_at(now_ms())
    }
}

/// Virtual-time ticker driven by hand.
///
/// Seconds advanced while disarmed are discarded, mirroring a real interval
/// that was cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualTicker {
    armed: bool,
    pending: u64,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, secs: u64) {
        if self.armed {
            self.pending = self.pending.saturating_add(secs);
        }
    }
}

impl Ticker for ManualTicker {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.pending = 0;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn poll(&mut self) -> u64 {
        std::mem::take(&mut self.pending)
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
