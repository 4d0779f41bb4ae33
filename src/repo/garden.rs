use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Garden, GrowingMethod, GrowthStage};

/// Garden repository for database operations
pub struct GardenRepo;

impl GardenRepo {
    pub fn create(conn: &Connection, garden: &Garden) -> Result<Garden> {
        conn.execute(
            "INSERT INTO gardens (name, growing_method, plant_type, planted_on, current_stage,
                    stage_started_on, location, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                garden.name,
                garden.growing_method.as_str(),
                garden.plant_type,
                garden.planted_on.to_string(),
                garden.current_stage.as_str(),
                garden.stage_started_on.to_string(),
                garden.location,
                garden.is_active,
            ],
        )
        .with_context(|| format!("Failed to create garden: {}", garden.name))?;

        let id = conn.last_insert_rowid();
        Ok(Garden { id: Some(id), ..garden.clone() })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Garden>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, growing_method, plant_type, planted_on, current_stage,
                    stage_started_on, location, is_active
             FROM gardens WHERE id = ?1",
        )?;

        let garden = stmt
            .query_row([id], Self::from_row)
            .optional()
            .with_context(|| format!("Failed to fetch garden {}", id))?;
        Ok(garden)
    }

    pub fn list_active(conn: &Connection) -> Result<Vec<Garden>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, growing_method, plant_type, planted_on, current_stage,
                    stage_started_on, location, is_active
             FROM gardens WHERE is_active = 1 ORDER BY id",
        )?;

        let rows = stmt.query_map([], Self::from_row)?;
        let mut gardens = Vec::new();
        for row in rows {
            gardens.push(row?);
        }
        Ok(gardens)
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<Garden>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, growing_method, plant_type, planted_on, current_stage,
                    stage_started_on, location, is_active
             FROM gardens ORDER BY id",
        )?;

        let rows = stmt.query_map([], Self::from_row)?;
        let mut gardens = Vec::new();
        for row in rows {
            gardens.push(row?);
        }
        Ok(gardens)
    }

    /// Advance a garden to a new stage, recording when the transition happened.
    /// Used by the Generator's stage-derivation pass (engine::stage).
    pub fn set_stage(conn: &Connection, garden_id: i64, stage: GrowthStage, started_on: NaiveDateTime) -> Result<()> {
        conn.execute(
            "UPDATE gardens SET current_stage = ?1, stage_started_on = ?2 WHERE id = ?3",
            rusqlite::params![stage.as_str(), started_on.to_string(), garden_id],
        )
        .with_context(|| format!("Failed to update stage for garden {}", garden_id))?;
        Ok(())
    }

    /// Remove a garden and, via `ON DELETE CASCADE`, every task that
    /// references it. Returns whether a garden with that id existed.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let affected = conn
            .execute("DELETE FROM gardens WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete garden {}", id))?;
        Ok(affected > 0)
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Garden> {
        let growing_method: String = row.get(2)?;
        let current_stage: String = row.get(5)?;
        let planted_on: String = row.get(4)?;
        let stage_started_on: String = row.get(6)?;

        Ok(Garden {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            growing_method: GrowingMethod::from_str(&growing_method).unwrap_or(GrowingMethod::Hydroponic),
            plant_type: row.get(3)?,
            planted_on: parse_naive(&planted_on),
            current_stage: GrowthStage::from_str(&current_stage).unwrap_or(GrowthStage::Germination),
            stage_started_on: parse_naive(&stage_started_on),
            location: row.get(7)?,
            is_active: row.get(8)?,
        })
    }
}

/// Local-wall-clock strings are stored via `NaiveDateTime::to_string` (the
/// `%Y-%m-%d %H:%M:%S[.%f]` format) and parsed back the same way.
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
    fn create_and_fetch_roundtrips() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = Garden::new("Tent A".into(), GrowingMethod::Hydroponic, "Lettuce".into(), now());
        let created = GardenRepo::create(&conn, &garden).unwrap();
        assert!(created.id.is_some());

        let fetched = GardenRepo::get_by_id(&conn, created.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.name, "Tent A");
        assert_eq!(fetched.growing_method, GrowingMethod::Hydroponic);
        assert_eq!(fetched.current_stage, GrowthStage::Germination);
    }

    #[test]
    fn set_stage_updates_row() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = Garden::new("Tent B".into(), GrowingMethod::Soil, "Tomato".into(), now());
        let created = GardenRepo::create(&conn, &garden).unwrap();

        let later = now() + chrono::Duration::days(10);
        GardenRepo::set_stage(&conn, created.id.unwrap(), GrowthStage::Vegetative, later).unwrap();

        let fetched = GardenRepo::get_by_id(&conn, created.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.current_stage, GrowthStage::Vegetative);
        assert_eq!(fetched.stage_started_on, later);
    }

    #[test]
    fn delete_cascades_to_tasks() {
        use crate::models::{Priority, Task, TaskType};
        use crate::repo::TaskRepo;

        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = Garden::new("Tent C".into(), GrowingMethod::Soil, "Pepper".into(), now());
        let created = GardenRepo::create(&conn, &garden).unwrap();
        let garden_id = created.id.unwrap();

        let task = Task::new(garden_id, "Water".into(), "d".into(), TaskType::Watering, Priority::Low, now(), 10, false, now());
        TaskRepo::create(&conn, &task).unwrap();

        assert!(GardenRepo::delete(&conn, garden_id).unwrap());

        assert!(GardenRepo::get_by_id(&conn, garden_id).unwrap().is_none());
        assert!(TaskRepo::list_pending_for_garden(&conn, garden_id).unwrap().is_empty());
    }

    #[test]
    fn delete_reports_missing_garden() {
        let conn = DbConnection::connect_in_memory().unwrap();
        assert!(!GardenRepo::delete(&conn, 9999).unwrap());
    }

    #[test]
    fn list_active_excludes_archived() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let active = Garden::new("Active".into(), GrowingMethod::Soil, "Basil".into(), now());
        let created = GardenRepo::create(&conn, &active).unwrap();
        let mut archived = Garden::new("Archived".into(), GrowingMethod::Soil, "Basil".into(), now());
        archived.is_active = false;
        GardenRepo::create(&conn, &archived).unwrap();

        let gardens = GardenRepo::list_active(&conn).unwrap();
        assert_eq!(gardens.len(), 1);
        assert_eq!(gardens[0].id, created.id);
    }
}
