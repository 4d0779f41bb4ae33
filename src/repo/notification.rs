use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::models::{NotificationRecord, NotificationType, Priority};

/// Notification repository — history and de-duplication lookups (§4.4).
pub struct NotificationRepo;

impl NotificationRepo {
    pub fn record(conn: &Connection, record: &NotificationRecord) -> Result<NotificationRecord> {
        conn.execute(
            "INSERT INTO notification_history (notification_type, title, body, priority, task_id, garden_id, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                record.notification_type.as_str(),
                record.title,
                record.body,
                record.priority.as_str(),
                record.task_id,
                record.garden_id,
                record.sent_at.to_string(),
            ],
        )
        .context("Failed to record notification")?;

        let id = conn.last_insert_rowid();
        Ok(NotificationRecord { id: Some(id), ..record.clone() })
    }

    /// Has a notification of this type already been sent for `task_id` within
    /// `window` of `as_of`? The core of reminder/overdue de-duplication.
    pub fn was_sent_recently(
        conn: &Connection,
        notification_type: NotificationType,
        task_id: i64,
        as_of: NaiveDateTime,
        window: chrono::Duration,
    ) -> Result<bool> {
        let since = as_of - window;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM notification_history
                 WHERE notification_type = ?1 AND task_id = ?2 AND sent_at >= ?3 AND sent_at <= ?4",
                rusqlite::params![notification_type.as_str(), task_id, since.to_string(), as_of.to_string()],
                |row| row.get(0),
            )
            .context("Failed to check notification history")?;
        Ok(count > 0)
    }

    pub fn list_recent(conn: &Connection, limit: i64) -> Result<Vec<NotificationRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, notification_type, title, body, priority, task_id, garden_id, sent_at
             FROM notification_history ORDER BY sent_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], Self::from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<NotificationRecord> {
        let notification_type: String = row.get(1)?;
        let priority: String = row.get(4)?;
        let sent_at: String = row.get(7)?;
        Ok(NotificationRecord {
            id: Some(row.get(0)?),
            notification_type: NotificationType::from_str(&notification_type).unwrap_or(NotificationType::SystemAlert),
            title: row.get(2)?,
            body: row.get(3)?,
            priority: Priority::from_str(&priority).unwrap_or(Priority::Medium),
            task_id: row.get(5)?,
            garden_id: row.get(6)?,
            sent_at: parse_naive(&sent_at),
        })
    }
}

fn parse_naive(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .unwrap_or_else(|_| panic!("invalid stored datetime: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn dedup_window_respects_boundary() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let record = NotificationRecord {
            id: None,
            notification_type: NotificationType::TaskOverdue,
            title: "t".into(),
            body: "b".into(),
            priority: Priority::High,
            task_id: Some(1),
            garden_id: None,
            sent_at: now(),
        };
        NotificationRepo::record(&conn, &record).unwrap();

        let within = NotificationRepo::was_sent_recently(
            &conn, NotificationType::TaskOverdue, 1, now() + chrono::Duration::hours(3), chrono::Duration::hours(4),
        ).unwrap();
        assert!(within);

        let outside = NotificationRepo::was_sent_recently(
            &conn, NotificationType::TaskOverdue, 1, now() + chrono::Duration::hours(5), chrono::Duration::hours(4),
        ).unwrap();
        assert!(!outside);
    }
}
