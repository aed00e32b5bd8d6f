//! Integration tests for the garden over a real SQLite store.

use plantify_core::{
    Action, Database, Event, Garden, GrowthCause, KvStore, ManualTicker, SessionSource,
    SessionTimer, TimerState, WallTicker, GROWTH_KEY,
};

fn confirm_yes(_: &str) -> bool {
    true
}

#[test]
fn test_growth_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plantify.db");

    {
        let db = Database::open_at(&path).unwrap();
        let mut garden = Garden::new(SessionTimer::<ManualTicker>::new(1500), db);
        garden.dispatch(Action::Bonus, &mut confirm_yes);
        garden.dispatch(Action::AddGrowth, &mut confirm_yes);
        assert_eq!(garden.level(), 3);
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.kv_get(GROWTH_KEY).unwrap().as_deref(), Some("3"));
    let garden = Garden::new(SessionTimer::<ManualTicker>::new(1500), db);
    assert_eq!(garden.level(), 3);
}

#[test]
fn test_malformed_growth_in_database_starts_at_zero() {
    let mut db = Database::open_memory().unwrap();
    db.kv_set(GROWTH_KEY, "abc").unwrap();
    let garden = Garden::new(SessionTimer::<ManualTicker>::new(60), db);
    assert_eq!(garden.level(), 0);
}

#[test]
fn test_full_session_workflow_with_log() {
    let db = Database::open_memory().unwrap();
    let mut garden = Garden::new(SessionTimer::<ManualTicker>::new(1500), db);

    garden.dispatch(Action::SetDuration("10".into()), &mut confirm_yes);
    assert_eq!(garden.timer().remaining_secs(), 600);

    garden.dispatch(Action::ToggleTimer, &mut confirm_yes);
    garden.timer_mut().ticker_mut().advance(300);
    garden.advance();

    // Pause half way, time passes, resume.
    garden.dispatch(Action::ToggleTimer, &mut confirm_yes);
    assert_eq!(garden.timer().state(), TimerState::Paused);
    garden.timer_mut().ticker_mut().advance(10_000);
    garden.dispatch(Action::ToggleTimer, &mut confirm_yes);
    assert_eq!(garden.timer().remaining_secs(), 300);

    garden.timer_mut().ticker_mut().advance(300);
    let events = garden.advance();

    // Log every session-like growth change, as the CLI does.
    let growth = garden.growth_mut();
    for event in &events {
        if let Event::GrowthChanged { to, cause, at, .. } = event {
            if let Some(source) = SessionSource::from_cause(*cause) {
                growth
                    .store_mut()
                    .record_session(source, 600, *to, *at)
                    .unwrap();
            }
        }
    }

    assert!(events.iter().any(|e| matches!(
        e,
        Event::GrowthChanged { cause: GrowthCause::SessionCompleted, to: 1, .. }
    )));
    let stats = growth.store().stats_all().unwrap();
    assert_eq!(stats.timer_sessions, 1);
    assert_eq!(stats.total_focus_secs, 600);
}

#[test]
fn test_wall_timer_persisted_in_kv() {
    let mut db = Database::open_memory().unwrap();
    let mut timer: SessionTimer<WallTicker> = SessionTimer::new(1500);
    timer.start();
    db.kv_set("plantify-timer", &serde_json::to_string(&timer).unwrap())
        .unwrap();

    let json = db.kv_get("plantify-timer").unwrap().unwrap();
    let restored: SessionTimer<WallTicker> = serde_json::from_str(&json).unwrap();
    let restored = restored.normalized();
    assert!(restored.is_running());
    assert!(restored.remaining_secs() <= 1500);
}
