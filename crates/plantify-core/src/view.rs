//! Presentation model.
//!
//! Everything here is derived from the growth level and the timer; nothing
//! is stored. Front-ends decide how to draw it.

use serde::{Deserialize, Serialize};

use crate::growth::MAX_GROWTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Seed,
    Sprout,
    Young,
    Mature,
}

impl Stage {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Stage::Seed,
            1..=2 => Stage::Sprout,
            3..=5 => Stage::Young,
            _ => Stage::Mature,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Seed => "seed",
            Stage::Sprout => "sprout",
            Stage::Young => "young plant",
            Stage::Mature => "tall plant",
        }
    }
}

/// Leaf placement along the stem: height offset and tilt in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPosition {
    pub y: i32,
    pub rotation: i32,
}

/// One slot per growth unit, bottom to top.
pub const LEAF_POSITIONS: [LeafPosition; MAX_GROWTH as usize] = [
    LeafPosition { y: -10, rotation: -10 },
    LeafPosition { y: -20, rotation: 10 },
    LeafPosition { y: -34, rotation: -18 },
    LeafPosition { y: -48, rotation: 18 },
    LeafPosition { y: -64, rotation: -10 },
    LeafPosition { y: -82, rotation: 12 },
    LeafPosition { y: -100, rotation: -6 },
    LeafPosition { y: -118, rotation: 8 },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub index: usize,
    pub position: LeafPosition,
    /// Unlocked since the previous render; plays the entrance animation.
    pub is_new: bool,
    /// Stagger for the entrance animation.
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantView {
    pub level: u8,
    pub stage: Stage,
    pub leaves: Vec<Leaf>,
    pub growth_ratio: f64,
    pub pot_scale: f64,
    pub swaying: bool,
}

impl PlantView {
    /// Build the view for `level`, marking leaves above `previous_level` new.
    pub fn new(level: u8, previous_level: u8, swaying: bool) -> Self {
        let level = level.min(MAX_GROWTH);
        let leaves = LEAF_POSITIONS
            .iter()
            .take(level as usize)
            .enumerate()
            .map(|(index, position)| Leaf {
                index,
                position: *position,
                is_new: index >= previous_level as usize,
                delay_ms: index as u64 * 60,
            })
            .collect();
        Self {
            level,
            stage: Stage::from_level(level),
            leaves,
            growth_ratio: level as f64 / MAX_GROWTH as f64,
            pot_scale: 0.95 + level as f64 / 40.0,
            swaying,
        }
    }

    pub fn new_leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.leaves.iter().filter(|leaf| leaf.is_new)
    }
}

/// `1 - remaining/duration`, with a zero duration treated as one second.
pub fn session_progress(remaining_secs: u64, duration_secs: u64) -> f64 {
    let total = duration_secs.max(1) as f64;
    (1.0 - remaining_secs as f64 / total).clamp(0.0, 1.0)
}

/// `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
