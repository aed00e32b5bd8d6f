//! Text rendering for the interactive mode.

use std::fmt::Write;

use plantify_core::view::{format_time, PlantView};
use plantify_core::{Garden, KvStore, Ticker, TimerState, MAX_GROWTH};

const BAR_WIDTH: usize = 24;

pub fn bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Draw the plant bottom-up: seed or leaves, stem, pot.
pub fn plant(view: &PlantView) -> String {
    let sway = if view.swaying { " " } else { "" };
    let mut out = String::new();

    for leaf in view.leaves.iter().rev() {
        let glyph = if leaf.position.rotation < 0 {
            "  \\_|"
        } else {
            "     |_/"
        };
        let marker = if leaf.is_new { " *" } else { "" };
        let _ = writeln!(out, "      {sway}{glyph}{marker}");
    }
    if view.leaves.is_empty() {
        let _ = writeln!(out, "         o");
    } else {
        let _ = writeln!(out, "         |");
    }
    let _ = writeln!(out, "     \\_______/");
    let _ = writeln!(out, "      \\_____/");
    out
}

pub fn frame<S: KvStore, T: Ticker>(
    garden: &Garden<S, T>,
    previous_level: u8,
    swaying: bool,
    message: Option<&str>,
) -> String {
    let view = garden.view(previous_level, swaying);
    let timer = garden.timer();
    let mut out = String::new();

    let _ = writeln!(out, "Plantify");
    out.push_str(&plant(&view));
    let _ = writeln!(
        out,
        "Growth {}/{} {} ({})",
        view.level,
        MAX_GROWTH,
        bar(view.growth_ratio),
        view.stage.label()
    );
    let status = match timer.state() {
        TimerState::Running => "running",
        TimerState::Paused => "paused",
        TimerState::Idle => "ready",
    };
    let _ = writeln!(
        out,
        "{}  {} {}",
        format_time(timer.remaining_secs()),
        bar(timer.progress()),
        status
    );
    if let Some(message) = message {
        let _ = writeln!(out, "{message}");
    }
    let _ = writeln!(
        out,
        "[s] start/pause [r] reset timer [d N] minutes [+/-] growth [c] complete [b] bonus [x] reset growth [q] quit"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantify_core::{ManualTicker, MemoryStore, SessionTimer, GROWTH_KEY};

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(0.5).matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(bar(7.0), bar(1.0));
    }

    #[test]
    fn seed_has_no_leaves() {
        let drawn = plant(&PlantView::new(0, 0, false));
        assert!(drawn.contains('o'));
        assert!(!drawn.contains("|_/"));
    }

    #[test]
    fn leaves_and_new_markers() {
        let drawn = plant(&PlantView::new(3, 2, false));
        assert_eq!(drawn.matches("\\_|").count(), 2);
        assert_eq!(drawn.matches("|_/").count(), 1);
        assert_eq!(drawn.matches('*').count(), 1);
    }

    #[test]
    fn frame_shows_time_and_growth() {
        let garden = Garden::new(
            SessionTimer::<ManualTicker>::new(1500),
            MemoryStore::with_entry(GROWTH_KEY, "4"),
        );
        let text = frame(&garden, 4, false, Some("hello"));
        assert!(text.contains("25:00"));
        assert!(text.contains("Growth 4/8"));
        assert!(text.contains("young plant"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn new_leaf_is_marked_on_one_frame_only() {
        let garden = Garden::new(
            SessionTimer::<ManualTicker>::new(1500),
            MemoryStore::with_entry(GROWTH_KEY, "4"),
        );
        assert_eq!(frame(&garden, 3, false, None).matches('*').count(), 1);
        assert_eq!(frame(&garden, 4, false, None).matches('*').count(), 0);
    }
}
