pub mod backup;
pub mod db;
pub mod restore;
pub mod schedule;

use anyhow::Context;
use fintrack_core::AppConfig;
use rusqlite::Connection;

/// Open the configured database, creating and migrating it when needed
pub fn open_store(config: &AppConfig) -> anyhow::Result<Connection> {
    if let Some(dir) = config.database_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    Ok(fintrack_store::db::open_and_migrate(&config.database_path)?)
}
