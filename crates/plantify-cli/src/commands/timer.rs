use clap::Subcommand;
use plantify_core::Action;

use crate::state::{AppState, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the focus session
    Start,
    /// Pause, keeping the remaining time
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Stop and reload the full duration
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Set the session length in minutes (1-120; invalid input becomes 1)
    Duration {
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
}

pub fn run(action: TimerAction) -> CliResult {
    let mut state = AppState::open()?;
    let mut no_prompt = |_: &str| false;

    let mut events = match action {
        TimerAction::Start => state.garden.dispatch(Action::StartTimer, &mut no_prompt),
        TimerAction::Pause => state.garden.dispatch(Action::PauseTimer, &mut no_prompt),
        TimerAction::Toggle => state.garden.dispatch(Action::ToggleTimer, &mut no_prompt),
        TimerAction::Reset => state.garden.dispatch(Action::ResetTimer, &mut no_prompt),
        TimerAction::Status => state.garden.advance(),
        TimerAction::Duration { minutes } => state
            .garden
            .dispatch(Action::SetDuration(minutes), &mut no_prompt),
    };
    events.push(state.garden.snapshot());

    state.finish(&events)
}
