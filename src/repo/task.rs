use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Priority, Task, TaskType};

/// Task repository for database operations
pub struct TaskRepo;

impl TaskRepo {
    pub fn create(conn: &Connection, task: &Task) -> Result<Task> {
        conn.execute(
            "INSERT INTO tasks (garden_id, plant_id, title, description, task_type, priority,
                    due_on, estimated_duration_minutes, is_completed, completed_on,
                    recurrence_pattern, auto_generated, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                task.garden_id,
                task.plant_id,
                task.title,
                task.description,
                task.task_type.as_str(),
                task.priority.as_str(),
                task.due_on.to_string(),
                task.estimated_duration_minutes,
                task.is_completed,
                task.completed_on.map(|d| d.to_string()),
                task.recurrence_pattern,
                task.auto_generated,
                task.created_on.to_string(),
            ],
        )
        .with_context(|| format!("Failed to create task: {}", task.title))?;

        let id = conn.last_insert_rowid();
        Ok(Task { id: Some(id), ..task.clone() })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Task>> {
        let mut stmt = conn.prepare(Self::SELECT_COLUMNS)?;
        stmt.query_row([id], Self::from_row)
            .optional()
            .with_context(|| format!("Failed to fetch task {}", id))
    }

    /// Tasks not yet marked complete for one garden, due-date ascending.
    pub fn list_pending_for_garden(conn: &Connection, garden_id: i64) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE garden_id = ?1 AND is_completed = 0 ORDER BY due_on",
            Self::SELECT_BASE
        ))?;
        let rows = stmt.query_map([garden_id], Self::from_row)?;
        Self::collect(rows)
    }

    /// All pending tasks across every garden — the Coordinator's input set.
    pub fn list_all_pending(conn: &Connection) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!("{} WHERE is_completed = 0 ORDER BY due_on", Self::SELECT_BASE))?;
        let rows = stmt.query_map([], Self::from_row)?;
        Self::collect(rows)
    }

    /// Pending tasks due on or before `as_of` that are not yet flagged completed.
    pub fn list_overdue(conn: &Connection, as_of: NaiveDateTime) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE is_completed = 0 AND due_on < ?1 ORDER BY due_on",
            Self::SELECT_BASE
        ))?;
        let rows = stmt.query_map([as_of.to_string()], Self::from_row)?;
        Self::collect(rows)
    }

    /// Pending tasks due within `(as_of, as_of + window]`, for reminder scans.
    pub fn list_due_within(conn: &Connection, as_of: NaiveDateTime, window: chrono::Duration) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE is_completed = 0 AND due_on > ?1 AND due_on <= ?2 ORDER BY due_on",
            Self::SELECT_BASE
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![as_of.to_string(), (as_of + window).to_string()],
            Self::from_row,
        )?;
        Self::collect(rows)
    }

    pub fn mark_completed(conn: &Connection, id: i64, completed_on: NaiveDateTime) -> Result<()> {
        conn.execute(
            "UPDATE tasks SET is_completed = 1, completed_on = ?1 WHERE id = ?2",
            rusqlite::params![completed_on.to_string(), id],
        )
        .with_context(|| format!("Failed to complete task {}", id))?;
        Ok(())
    }

    const SELECT_BASE: &'static str = "SELECT id, garden_id, plant_id, title, description, task_type, priority,
                    due_on, estimated_duration_minutes, is_completed, completed_on,
                    recurrence_pattern, auto_generated, created_on
             FROM tasks";
    const SELECT_COLUMNS: &'static str = "SELECT id, garden_id, plant_id, title, description, task_type, priority,
                    due_on, estimated_duration_minutes, is_completed, completed_on,
                    recurrence_pattern, auto_generated, created_on
             FROM tasks WHERE id = ?1";

    fn collect(rows: rusqlite::MappedRows<impl FnMut(&rusqlite::Row) -> rusqlite::Result<Task>>) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let task_type: String = row.get(5)?;
        let priority: String = row.get(6)?;
        let due_on: String = row.get(7)?;
        let completed_on: Option<String> = row.get(10)?;
        let created_on: String = row.get(13)?;

        Ok(Task {
            id: Some(row.get(0)?),
            garden_id: row.get(1)?,
            plant_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            task_type: TaskType::from_str(&task_type).unwrap_or(TaskType::General),
            priority: Priority::from_str(&priority).unwrap_or(Priority::Medium),
            due_on: parse_naive(&due_on),
            estimated_duration_minutes: row.get(8)?,
            is_completed: row.get(9)?,
            completed_on: completed_on.map(|s| parse_naive(&s)),
            recurrence_pattern: row.get(11)?,
            auto_generated: row.get(12)?,
            created_on: parse_naive(&created_on),
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
    use crate::models::{Garden, GrowingMethod};
    use crate::repo::GardenRepo;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    fn seed_garden(conn: &Connection) -> i64 {
        let garden = Garden::new("Tent".into(), GrowingMethod::Hydroponic, "Basil".into(), now());
        GardenRepo::create(conn, &garden).unwrap().id.unwrap()
    }

    #[test]
    fn create_and_fetch_roundtrips() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn);
        let task = Task::new(
            garden_id,
            "Check pH".into(),
            "Measure reservoir pH".into(),
            TaskType::Monitoring,
            Priority::High,
            now(),
            10,
            true,
            now(),
        );
        let created = TaskRepo::create(&conn, &task).unwrap();
        let fetched = TaskRepo::get_by_id(&conn, created.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.title, "Check pH");
        assert_eq!(fetched.priority, Priority::High);
        assert!(!fetched.is_completed);
    }

    #[test]
    fn mark_completed_sets_timestamp() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn);
        let task = Task::new(
            garden_id,
            "Water".into(),
            "Water reservoir".into(),
            TaskType::Watering,
            Priority::Medium,
            now(),
            5,
            true,
            now(),
        );
        let created = TaskRepo::create(&conn, &task).unwrap();
        let completed_at = now() + chrono::Duration::hours(1);
        TaskRepo::mark_completed(&conn, created.id.unwrap(), completed_at).unwrap();

        let fetched = TaskRepo::get_by_id(&conn, created.id.unwrap()).unwrap().unwrap();
        assert!(fetched.is_completed);
        assert_eq!(fetched.completed_on, Some(completed_at));
    }

    #[test]
    fn list_overdue_excludes_future_and_completed() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn);
        let past = Task::new(garden_id, "Past".into(), "d".into(), TaskType::Watering, Priority::High, now() - chrono::Duration::days(1), 5, true, now());
        let future = Task::new(garden_id, "Future".into(), "d".into(), TaskType::Watering, Priority::High, now() + chrono::Duration::days(1), 5, true, now());
        let created_past = TaskRepo::create(&conn, &past).unwrap();
        TaskRepo::create(&conn, &future).unwrap();

        let overdue = TaskRepo::list_overdue(&conn, now()).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, created_past.id);
    }
}
