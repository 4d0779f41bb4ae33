use rusqlite::{Connection, Result};
use std::collections::HashMap;

/// Current database schema version
const CURRENT_VERSION: u32 = 2;

/// Migration system for managing database schema versions
pub struct MigrationManager;

impl MigrationManager {
    /// Initialize the database with the current schema
    /// This creates the schema_version table and applies all migrations
    pub fn initialize(conn: &Connection) -> Result<()> {
        // Must be set on the raw connection before any transaction is opened —
        // PRAGMA foreign_keys is a no-op once a transaction is already pending.
        conn.execute("PRAGMA foreign_keys=ON", [])?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )?;

        let current_version: u32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for version in (current_version + 1)..=CURRENT_VERSION {
            Self::apply_migration(conn, version)?;
        }

        Ok(())
    }

    fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
        let migrations = get_migrations();
        if let Some(migration) = migrations.get(&version) {
            let tx = conn.unchecked_transaction()?;
            migration(&tx)?;
            tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
            tx.commit()?;
            Ok(())
        } else {
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(format!("No migration found for version {}", version)),
            ))
        }
    }

    pub fn get_version(conn: &Connection) -> Result<u32> {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }
}

fn get_migrations() -> HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> {
    let mut migrations: HashMap<u32, fn(&rusqlite::Transaction) -> Result<(), rusqlite::Error>> = HashMap::new();
    migrations.insert(1, migration_v1);
    migrations.insert(2, migration_v2);
    migrations
}

/// Migration v1: Initial schema — gardens, tasks, inventory, notification
/// history, and a generic settings table. All date/time columns store
/// local wall-clock RFC-3339-without-offset text, never Unix timestamps —
/// the engine never converts through UTC.
fn migration_v1(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute(
        "CREATE TABLE gardens (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            growing_method TEXT NOT NULL,
            plant_type TEXT NOT NULL,
            planted_on TEXT NOT NULL,
            current_stage TEXT NOT NULL,
            stage_started_on TEXT NOT NULL,
            location TEXT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY,
            garden_id INTEGER NOT NULL REFERENCES gardens(id) ON DELETE CASCADE,
            plant_id INTEGER NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            task_type TEXT NOT NULL,
            priority TEXT NOT NULL,
            due_on TEXT NOT NULL,
            estimated_duration_minutes INTEGER NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0,
            completed_on TEXT NULL,
            recurrence_pattern TEXT NULL,
            auto_generated INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL
        )",
        [],
    )?;
    tx.execute("CREATE INDEX idx_tasks_garden_id ON tasks(garden_id)", [])?;
    tx.execute("CREATE INDEX idx_tasks_due_on ON tasks(due_on)", [])?;
    tx.execute("CREATE INDEX idx_tasks_is_completed ON tasks(is_completed)", [])?;

    tx.execute(
        "CREATE TABLE inventory_items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            current_quantity REAL NOT NULL,
            minimum_threshold REAL NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE notification_history (
            id INTEGER PRIMARY KEY,
            notification_type TEXT NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            priority TEXT NOT NULL,
            task_id INTEGER NULL REFERENCES tasks(id) ON DELETE SET NULL,
            garden_id INTEGER NULL REFERENCES gardens(id) ON DELETE SET NULL,
            sent_at TEXT NOT NULL
        )",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_notification_history_type_sent ON notification_history(notification_type, sent_at)",
        [],
    )?;
    tx.execute(
        "CREATE INDEX idx_notification_history_task ON notification_history(task_id)",
        [],
    )?;

    tx.execute(
        "CREATE TABLE user_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Migration v2: Index gardens by active status, used by the Coordinator and
/// Generator's "all gardens" sweep to skip archived ones cheaply.
fn migration_v2(tx: &rusqlite::Transaction) -> Result<(), rusqlite::Error> {
    tx.execute("CREATE INDEX idx_gardens_is_active ON gardens(is_active)", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn migration_applies_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        assert_eq!(MigrationManager::get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn migration_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        MigrationManager::initialize(&conn).unwrap();
        assert_eq!(MigrationManager::get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn foreign_key_constraint_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationManager::initialize(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO tasks (garden_id, title, description, task_type, priority, due_on,
                    estimated_duration_minutes, created_on)
             VALUES (999, 't', 'd', 'watering', 'low', '2026-01-01T00:00:00', 10, '2026-01-01T00:00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
