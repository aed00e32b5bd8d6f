//! Interactive mode.
//!
//! One current-thread runtime multiplexes three sources with `select!`: a
//! 1-second interval that advances the timer, a single pending gust sleep,
//! and stdin commands. Dropping out of the loop drops all of them.

use std::future::pending;
use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use plantify_core::growth::RESET_PROMPT;
use plantify_core::{Action, Event, GustScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, MissedTickBehavior};

use crate::prompt::is_yes;
use crate::render;
use crate::state::{AppState, CliResult};

#[derive(Args)]
pub struct RunArgs {
    /// Disable the wind animation
    #[arg(long)]
    pub no_wind: bool,
    /// Do not clear the screen between frames
    #[arg(long)]
    pub plain: bool,
}

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    /// Begin the confirmation step for a growth reset.
    AskReset,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head {
        "s" | "start" | "pause" => Input::Action(Action::ToggleTimer),
        "r" | "reset" => Input::Action(Action::ResetTimer),
        "d" | "duration" => Input::Action(Action::SetDuration(rest.to_string())),
        "+" | "add" => Input::Action(Action::AddGrowth),
        "-" | "remove" => Input::Action(Action::RemoveGrowth),
        "c" | "complete" => Input::Action(Action::CompleteSession),
        "b" | "bonus" => Input::Action(Action::Bonus),
        "x" => Input::AskReset,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

pub fn run(args: RunArgs) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(args))
}

async fn run_loop(args: RunArgs) -> CliResult {
    let mut state = AppState::open()?;
    let mut rng = rand::thread_rng();
    let mut wind = GustScheduler::new(state.config.gust_timing());
    if state.config.wind.enabled && !args.no_wind {
        wind.start(now_ms(), &mut rng);
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut awaiting_reset = false;
    let mut message: Option<String> = None;
    tracing::info!(growth = state.garden.level(), "interactive mode");

    loop {
        let level_before = state.garden.level();
        let gust_due = wind.next_deadline();

        let events: Vec<Event> = tokio::select! {
            _ = interval.tick() => state.garden.advance(),
            _ = async {
                match gust_due {
                    Some(due) => sleep(Duration::from_millis(due.saturating_sub(now_ms()))).await,
                    None => pending::<()>().await,
                }
            } => wind.poll(now_ms(), &mut rng),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if awaiting_reset {
                    awaiting_reset = false;
                    let answer = is_yes(&line);
                    state.garden.dispatch(Action::ResetGrowth, &mut |_: &str| answer)
                } else {
                    match parse_input(&line) {
                        Input::Action(action) => {
                            state.garden.dispatch(action, &mut |_: &str| false)
                        }
                        Input::AskReset => {
                            awaiting_reset = true;
                            message = Some(format!("{RESET_PROMPT} [y/N]"));
                            Vec::new()
                        }
                        Input::Quit => break,
                        Input::Unknown(cmd) => {
                            message = Some(format!("unknown command: {cmd}"));
                            Vec::new()
                        }
                    }
                }
            }
        };

        if !events.is_empty() {
            state.record(&events)?;
            state.save()?;
            if let Some(text) = describe(&events) {
                message = Some(text);
            }
        }
        if !args.plain {
            print!("\x1b[2J\x1b[H");
        }
        // Leaves unlocked by this step are marked new on this frame only.
        print!(
            "{}",
            render::frame(&state.garden, level_before, wind.is_active(), message.as_deref())
        );
        let _ = std::io::stdout().flush();
    }

    state.save()?;
    Ok(())
}

/// A one-line status for the last notable event.
fn describe(events: &[Event]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        Event::SessionCompleted { .. } => Some("Session complete! Your plant grew.".to_string()),
        Event::GrowthChanged { from, to, .. } => Some(format!("Growth {from} -> {to}")),
        Event::GrowthResetDeclined { .. } => Some("Reset cancelled".to_string()),
        Event::DurationChanged { duration_secs, .. } => {
            Some(format!("Session length {} min", duration_secs / 60))
        }
        _ => None,
    })
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantify_core::GrowthCause;

    #[test]
    fn parses_button_keys() {
        assert_eq!(parse_input("s"), Input::Action(Action::ToggleTimer));
        assert_eq!(parse_input(" + "), Input::Action(Action::AddGrowth));
        assert_eq!(parse_input("b"), Input::Action(Action::Bonus));
        assert_eq!(parse_input("x"), Input::AskReset);
        assert_eq!(parse_input("q"), Input::Quit);
    }

    #[test]
    fn duration_takes_raw_argument() {
        assert_eq!(
            parse_input("d 10"),
            Input::Action(Action::SetDuration("10".into()))
        );
        assert_eq!(
            parse_input("d"),
            Input::Action(Action::SetDuration(String::new()))
        );
    }

    #[test]
    fn unknown_input_is_reported() {
        assert_eq!(parse_input("zzz"), Input::Unknown("zzz".into()));
    }

    #[test]
    fn describe_prefers_latest_event() {
        let events = vec![
            Event::SessionCompleted {
                duration_secs: 60,
                at: Utc::now(),
            },
            Event::GrowthChanged {
                from: 1,
                to: 2,
                cause: GrowthCause::SessionCompleted,
                at: Utc::now(),
            },
        ];
        assert_eq!(describe(&events).as_deref(), Some("Growth 1 -> 2"));
        assert_eq!(describe(&[]), None);
    }
}
