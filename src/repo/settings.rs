use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::UserPreferences;

/// Generic key/value settings store backing [`UserPreferences`].
pub struct SettingsRepo;

const KEYS: &[&str] = &[
    "notification.enabled",
    "notification.reminders_enabled",
    "notification.overdue_enabled",
    "notification.growth_enabled",
    "notification.resource_enabled",
    "notification.system_enabled",
    "notification.sound_enabled",
    "notification.lead_time_minutes",
    "notification.quiet_hours_start",
    "notification.quiet_hours_end",
];

impl SettingsRepo {
    pub fn get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row("SELECT value FROM user_settings WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read setting {}", key))
    }

    pub fn set_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO user_settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .with_context(|| format!("Failed to write setting {}", key))?;
        Ok(())
    }

    pub fn load_preferences(conn: &Connection) -> Result<UserPreferences> {
        let defaults = UserPreferences::default();
        let bool_setting = |key: &str, default: bool| -> Result<bool> {
            Ok(Self::get_raw(conn, key)?.map(|v| v == "1").unwrap_or(default))
        };
        let int_setting = |key: &str, default: i64| -> Result<i64> {
            Ok(Self::get_raw(conn, key)?.and_then(|v| v.parse().ok()).unwrap_or(default))
        };

        Ok(UserPreferences {
            enabled: bool_setting("notification.enabled", defaults.enabled)?,
            reminders_enabled: bool_setting("notification.reminders_enabled", defaults.reminders_enabled)?,
            overdue_enabled: bool_setting("notification.overdue_enabled", defaults.overdue_enabled)?,
            growth_enabled: bool_setting("notification.growth_enabled", defaults.growth_enabled)?,
            resource_enabled: bool_setting("notification.resource_enabled", defaults.resource_enabled)?,
            system_enabled: bool_setting("notification.system_enabled", defaults.system_enabled)?,
            sound_enabled: bool_setting("notification.sound_enabled", defaults.sound_enabled)?,
            lead_time_minutes: int_setting("notification.lead_time_minutes", defaults.lead_time_minutes)?,
            quiet_hours_start: int_setting("notification.quiet_hours_start", defaults.quiet_hours_start as i64)? as u32,
            quiet_hours_end: int_setting("notification.quiet_hours_end", defaults.quiet_hours_end as i64)? as u32,
        })
    }

    pub fn save_preferences(conn: &Connection, prefs: &UserPreferences) -> Result<()> {
        Self::set_raw(conn, "notification.enabled", if prefs.enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.reminders_enabled", if prefs.reminders_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.overdue_enabled", if prefs.overdue_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.growth_enabled", if prefs.growth_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.resource_enabled", if prefs.resource_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.system_enabled", if prefs.system_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.sound_enabled", if prefs.sound_enabled { "1" } else { "0" })?;
        Self::set_raw(conn, "notification.lead_time_minutes", &prefs.lead_time_minutes.to_string())?;
        Self::set_raw(conn, "notification.quiet_hours_start", &prefs.quiet_hours_start.to_string())?;
        Self::set_raw(conn, "notification.quiet_hours_end", &prefs.quiet_hours_end.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn defaults_when_unset() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let prefs = SettingsRepo::load_preferences(&conn).unwrap();
        assert_eq!(prefs, UserPreferences::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let mut prefs = UserPreferences::default();
        prefs.lead_time_minutes = 45;
        prefs.quiet_hours_start = 23;
        prefs.sound_enabled = false;
        SettingsRepo::save_preferences(&conn, &prefs).unwrap();

        let loaded = SettingsRepo::load_preferences(&conn).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn known_keys_are_stable() {
        assert_eq!(KEYS.len(), 10);
    }
}
