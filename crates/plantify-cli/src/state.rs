//! Shared load/save plumbing for CLI commands.
//!
//! Every invocation opens the database, restores the garden (growth from the
//! kv table, the timer from its saved JSON), applies one command, logs any
//! sessions it produced and writes the timer back.

use plantify_core::{
    Config, Database, Event, Garden, KvStore, SessionSource, SessionTimer, WallTicker,
};

pub const TIMER_KEY: &str = "plantify-timer";

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct AppState {
    pub config: Config,
    pub garden: Garden<Database, WallTicker>,
}

impl AppState {
    pub fn open() -> CliResult<Self> {
        let config = Config::load_or_default();
        let db = Database::open()?;
        let timer = load_timer(&db, &config);
        Ok(Self {
            garden: Garden::new(timer, db),
            config,
        })
    }

    pub fn db(&self) -> &Database {
        self.garden.growth().store()
    }

    /// Append session-like growth changes to the log.
    pub fn record(&self, events: &[Event]) -> CliResult {
        record_sessions(self.db(), events)
    }

    pub fn save(&mut self) -> CliResult {
        let json = serde_json::to_string(self.garden.timer())?;
        self.garden.growth_mut().store_mut().kv_set(TIMER_KEY, &json)?;
        Ok(())
    }

    /// Record, persist and print the outcome of a one-shot command.
    pub fn finish(mut self, events: &[Event]) -> CliResult {
        self.record(events)?;
        self.save()?;
        print_events(events)?;
        Ok(())
    }
}

/// A timer completion is logged with the length of the session that finished,
/// which may differ from the current duration if the same command changed it.
fn record_sessions(db: &Database, events: &[Event]) -> CliResult {
    let mut finished_secs = 0;
    for event in events {
        match event {
            Event::SessionCompleted { duration_secs, .. } => finished_secs = *duration_secs,
            Event::GrowthChanged { to, cause, at, .. } => {
                let Some(source) = SessionSource::from_cause(*cause) else {
                    continue;
                };
                let secs = if source == SessionSource::Timer {
                    finished_secs
                } else {
                    0
                };
                db.record_session(source, secs, *to, *at)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn load_timer(db: &Database, config: &Config) -> SessionTimer<WallTicker> {
    if let Ok(Some(json)) = db.kv_get(TIMER_KEY) {
        match serde_json::from_str::<SessionTimer<WallTicker>>(&json) {
            Ok(timer) => return timer.normalized(),
            Err(e) => tracing::warn!(error = %e, "discarding unreadable saved timer"),
        }
    }
    SessionTimer::with_minutes(config.timer.duration_minutes)
}

pub fn print_events(events: &[Event]) -> CliResult {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plantify_core::GrowthCause;

    #[test]
    fn timer_session_logs_the_length_that_finished() {
        let db = Database::open_memory().unwrap();
        let at = Utc::now();
        // Completion credited before a duration change in the same command.
        let events = vec![
            Event::SessionCompleted {
                duration_secs: 1500,
                at,
            },
            Event::GrowthChanged {
                from: 0,
                to: 1,
                cause: GrowthCause::SessionCompleted,
                at,
            },
            Event::DurationChanged {
                duration_secs: 300,
                remaining_secs: 300,
                at,
            },
        ];
        record_sessions(&db, &events).unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.timer_sessions, 1);
        assert_eq!(stats.total_focus_secs, 1500);
    }

    #[test]
    fn manual_growth_logs_no_focus_time() {
        let db = Database::open_memory().unwrap();
        let at = Utc::now();
        let events = vec![
            Event::GrowthChanged {
                from: 1,
                to: 3,
                cause: GrowthCause::Bonus,
                at,
            },
            Event::GrowthChanged {
                from: 3,
                to: 4,
                cause: GrowthCause::Adjusted,
                at,
            },
        ];
        record_sessions(&db, &events).unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.bonus_sessions, 1);
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_focus_secs, 0);
    }
}
