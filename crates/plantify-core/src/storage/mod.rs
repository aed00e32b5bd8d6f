mod config;
pub mod database;
mod memory;

pub use config::{Config, TimerConfig, WindConfig};
pub use database::{Database, SessionRecord, SessionSource, Stats};
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Local key-value persistence. Injected into the growth tracker so the
/// state machine runs the same against SQLite or an in-memory map.
pub trait KvStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Returns the Plantify data directory, creating it if needed.
///
/// `PLANTIFY_DATA_DIR` wins when set. Otherwise `~/.config/plantify[-dev]/`
/// based on `PLANTIFY_ENV` (set `PLANTIFY_ENV=dev` for a development copy).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PLANTIFY_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PLANTIFY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("plantify-dev")
            } else {
                base_dir.join("plantify")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| CoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
