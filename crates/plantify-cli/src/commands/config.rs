use clap::Subcommand;
use plantify_core::{Action, Config};

use crate::state::{AppState, CliResult};

const DURATION_KEY: &str = "timer.duration_minutes";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.duration_minutes", "wind.enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if key == DURATION_KEY {
                sync_timer(&config)?;
            }
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            sync_timer(&config)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Carry the configured session length over to the saved timer, the same way
/// `timer duration` changes it.
fn sync_timer(config: &Config) -> CliResult {
    let mut state = AppState::open()?;
    let minutes = config.timer.duration_minutes;
    if state.garden.timer().duration_secs() == minutes * 60 {
        return Ok(());
    }
    let events = state
        .garden
        .dispatch(Action::SetDuration(minutes.to_string()), &mut |_: &str| false);
    state.record(&events)?;
    state.save()
}
