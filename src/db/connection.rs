use rusqlite::Connection;
use std::path::PathBuf;
use anyhow::{Context, Result};
use crate::db::migrations::MigrationManager;

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".cultivar").join("cultivar.db")
    }

    /// Get database path from configuration file or default
    pub fn resolve_path() -> Result<PathBuf> {
        let config_path = Self::config_path();

        if config_path.exists() {
            if let Ok(config) = std::fs::read_to_string(&config_path) {
                for line in config.lines() {
                    let line = line.trim();
                    if let Some(path_str) = line.strip_prefix("data.location=") {
                        let path = PathBuf::from(path_str.trim());
                        if path.is_relative() {
                            return Ok(config_path.parent().unwrap().join(path));
                        } else {
                            return Ok(path);
                        }
                    }
                }
            }
        }

        Ok(Self::default_path())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".cultivar").join("rc")
    }

    /// Connect to the database, creating it and parent directories if needed
    pub fn connect() -> Result<Connection> {
        let db_path = Self::resolve_path()?;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn).context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        MigrationManager::initialize(&conn).context("Failed to initialize database schema")?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_uses_cultivar_dir() {
        let path = DbConnection::default_path();
        assert!(path.to_string_lossy().contains(".cultivar"));
        assert!(path.to_string_lossy().ends_with("cultivar.db"));
    }

    #[test]
    fn connect_in_memory_initializes_schema() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let version = MigrationManager::get_version(&conn).unwrap();
        assert!(version > 0);
    }
}
