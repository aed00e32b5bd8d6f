use clap::Subcommand;
use plantify_core::{Action, Event};

use crate::prompt::confirm_stdin;
use crate::state::{AppState, CliResult};

#[derive(Subcommand)]
pub enum GrowthAction {
    /// Print the current garden state as JSON
    Show,
    /// Add growth
    Add {
        #[arg(default_value = "1")]
        n: u8,
    },
    /// Remove growth
    Remove {
        #[arg(default_value = "1")]
        n: u8,
    },
    /// Reset growth to zero (asks for confirmation)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Credit a finished session by hand (+1)
    Complete,
    /// Bonus growth (+2)
    Bonus,
}

pub fn run(action: GrowthAction) -> CliResult {
    let mut state = AppState::open()?;
    let mut confirm = |prompt: &str| confirm_stdin(prompt);
    let mut no_prompt = |_: &str| false;

    let events = match action {
        GrowthAction::Show => {
            let mut events = state.garden.advance();
            events.push(state.garden.snapshot());
            events
        }
        GrowthAction::Add { n } => repeat(&mut state, Action::AddGrowth, n),
        GrowthAction::Remove { n } => repeat(&mut state, Action::RemoveGrowth, n),
        GrowthAction::Reset { yes } => {
            if yes {
                state.garden.dispatch(Action::ResetGrowth, &mut |_: &str| true)
            } else {
                state.garden.dispatch(Action::ResetGrowth, &mut confirm)
            }
        }
        GrowthAction::Complete => state.garden.dispatch(Action::CompleteSession, &mut no_prompt),
        GrowthAction::Bonus => state.garden.dispatch(Action::Bonus, &mut no_prompt),
    };

    state.finish(&events)
}

fn repeat(state: &mut AppState, action: Action, n: u8) -> Vec<Event> {
    (0..n)
        .flat_map(|_| state.garden.dispatch(action.clone(), &mut |_: &str| true))
        .collect()
}
