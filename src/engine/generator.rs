use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::engine::stage::{days_in_stage, days_since, derive_stage};
use crate::error::{EngineError, EngineResult};
use crate::models::{Task, TaskTemplate};
use crate::repo::{GardenRepo, TaskRepo};
use crate::templates::templates_for;

/// Synthesises tasks for a garden from its compiled-in template catalogue
/// (§4.1, §4.2), one call per garden per invocation.
///
/// A `Generator` serializes concurrent `generate` calls per garden with an
/// internal mutex map, so two overlapping callers for the same garden can't
/// double-insert the same template occurrence.
pub struct Generator {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self { locks: Mutex::new(HashMap::new()) }
    }

    fn lock_for(&self, garden_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(garden_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Generate and persist due tasks for one garden, returning what was created.
    pub fn generate(&self, conn: &Connection, garden_id: i64, now: NaiveDateTime) -> EngineResult<Vec<Task>> {
        let garden_lock = self.lock_for(garden_id);
        let _guard = garden_lock.lock().unwrap();

        let garden = GardenRepo::get_by_id(conn, garden_id)
            .map_err(EngineError::from_store)?
            .ok_or_else(|| EngineError::NotFound(format!("garden {}", garden_id)))?;

        if !garden.is_active {
            return Ok(Vec::new());
        }

        let total_days = days_since(garden.planted_on, now);
        let stage = derive_stage(total_days);
        let stage_days = days_in_stage(stage, total_days);

        let templates = templates_for(garden.growing_method);
        let existing = TaskRepo::list_pending_for_garden(conn, garden_id).map_err(EngineError::from_store)?;

        let mut created = Vec::new();
        for template in templates {
            if template.target_stage != stage {
                continue;
            }
            if stage_days < template.days_from_stage_start {
                continue;
            }
            if !Self::should_generate(conn, &garden.name, template, &existing, now).map_err(EngineError::from_store)? {
                continue;
            }

            let task = Self::instantiate(garden_id, &garden.name, template, now);
            let saved = TaskRepo::create(conn, &task).map_err(EngineError::from_store)?;
            created.push(saved);
        }

        Ok(created)
    }

    /// Generate for every active garden. Returns the per-garden task counts
    /// (§4.2's "generate-all" sweep).
    pub fn generate_all(&self, conn: &Connection, now: NaiveDateTime) -> EngineResult<Vec<(i64, usize)>> {
        let gardens = GardenRepo::list_active(conn).map_err(EngineError::from_store)?;
        let mut results = Vec::with_capacity(gardens.len());
        for garden in gardens {
            let id = garden.id.expect("persisted garden has an id");
            let created = self.generate(conn, id, now)?;
            results.push((id, created.len()));
        }
        Ok(results)
    }

    fn should_generate(
        conn: &Connection,
        garden_name: &str,
        template: &TaskTemplate,
        existing: &[Task],
        now: NaiveDateTime,
    ) -> anyhow::Result<bool> {
        let _ = conn;
        if template.is_one_shot() {
            return Ok(!existing.iter().any(|t| Self::title_for(template, garden_name) == t.title));
        }

        let most_recent = existing
            .iter()
            .filter(|t| t.title.starts_with(template.name))
            .map(|t| t.created_on)
            .max();

        match most_recent {
            Some(last) => Ok((now - last).num_days() >= template.frequency_days),
            None => Ok(true),
        }
    }

    fn title_for(template: &TaskTemplate, garden_name: &str) -> String {
        format!("{} — {}", template.name, garden_name)
    }

    fn instantiate(garden_id: i64, garden_name: &str, template: &TaskTemplate, now: NaiveDateTime) -> Task {
        let description = Self::full_description(template);
        let due_on = now + Duration::days(1);
        let title = Self::title_for(template, garden_name);
        Task::new(
            garden_id,
            title,
            description,
            template.task_type,
            template.priority,
            due_on,
            template.duration_minutes,
            true,
            now,
        )
    }

    fn full_description(template: &TaskTemplate) -> String {
        let mut desc = format!("{}\n\nInstructions: {}\n", template.description, template.instructions);
        if !template.required_materials.is_empty() {
            desc.push_str(&format!("Required materials: {}\n", template.required_materials.join(", ")));
        }
        desc.push_str(&format!("Estimated duration: {} minutes", template.duration_minutes));
        desc
    }
}
