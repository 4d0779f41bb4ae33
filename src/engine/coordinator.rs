use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::error::{EngineError, EngineResult};
use crate::models::{Batch, Priority, ResourceRequirement, ResourceTag, Task, TaskType};
use crate::repo::TaskRepo;

const MAX_BATCH_SIZE: usize = 5;
const BATCHABLE_TIME_WINDOW_MINUTES: i64 = 120;
const SPACE_CONFLICT_BUFFER_MINUTES: i64 = 15;
const SHARING_WINDOW_MINUTES: i64 = 60;
const SETUP_MINUTES_PER_TASK: i64 = 5;
const SETUP_MINUTES_PER_BATCH: i64 = 10;
const DAY_START_HOUR: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConflictKind {
    Resource { resource: ResourceTag, flexibility_minutes: i64 },
    Space { travel_minutes: i64 },
}

#[derive(Debug, Clone)]
struct Conflict {
    kind: ConflictKind,
    task_a: i64,
    task_b: i64,
}

#[derive(Debug, Clone)]
pub struct SharingOpportunity {
    pub batch_a: usize,
    pub batch_b: usize,
    pub shared_resources: Vec<ResourceTag>,
    pub potential_time_savings_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct CoordinationResult {
    pub date: NaiveDate,
    pub total_tasks: usize,
    pub batches: Vec<Batch>,
    pub conflicts_detected: usize,
    pub sharing_opportunities: Vec<SharingOpportunity>,
    pub estimated_time_savings_minutes: i64,
    pub resource_efficiency: f64,
}

#[derive(Debug, Clone)]
pub struct ResourceUtilizationEntry {
    pub usage: f64,
    pub capacity: f64,
    pub percentage: f64,
    pub available: f64,
}

#[derive(Debug, Clone)]
pub struct ResourceUtilization {
    pub date: NaiveDate,
    pub entries: Vec<(ResourceTag, ResourceUtilizationEntry)>,
    pub over_capacity: Vec<ResourceTag>,
    pub recommendations: Vec<String>,
}

/// Cross-garden scheduling optimizer (§4.3). Pure with respect to the store:
/// it reads pending tasks and returns a proposed, resolved plan with
/// in-memory reschedules, but writes nothing back — nothing survives between
/// invocations.
pub struct Coordinator;

impl Coordinator {
    /// Coordinate all pending tasks due within `[target_date, target_date + 1 day)`.
    pub fn coordinate_daily(conn: &Connection, target_date: NaiveDate) -> EngineResult<CoordinationResult> {
        let day_start = target_date.and_hms_opt(0, 0, 0).unwrap();
        let day_end = day_start + Duration::days(1);

        let mut tasks: Vec<Task> = TaskRepo::list_all_pending(conn)
            .map_err(EngineError::from_store)?
            .into_iter()
            .filter(|t| t.due_on >= day_start && t.due_on < day_end)
            .collect();

        if tasks.is_empty() {
            return Ok(CoordinationResult {
                date: target_date,
                total_tasks: 0,
                batches: Vec::new(),
                conflicts_detected: 0,
                sharing_opportunities: Vec::new(),
                estimated_time_savings_minutes: 0,
                resource_efficiency: 0.0,
            });
        }

        let total_tasks = tasks.len();
        let requirements = Self::analyze_requirements(&tasks);
        let conflicts = Self::detect_conflicts(&tasks, &requirements);
        Self::resolve_conflicts(&mut tasks, &conflicts);

        let batches = Self::create_batches(tasks, &requirements);
        let ordered = Self::optimize_execution_order(batches, target_date);
        let sharing_opportunities = Self::sharing_opportunities(&ordered);
        let estimated_time_savings_minutes = Self::time_savings(&ordered);
        let resource_efficiency = Self::average_efficiency(&ordered);

        Ok(CoordinationResult {
            date: target_date,
            total_tasks,
            batches: ordered,
            conflicts_detected: conflicts.len(),
            sharing_opportunities,
            estimated_time_savings_minutes,
            resource_efficiency,
        })
    }

    /// Current resource utilization against fixed daily capacities (§9). The
    /// capacities (time=480min, nutrients=100L, water=500L, equipment=10
    /// units) are carried over unchanged from the original system.
    pub fn resource_utilization(conn: &Connection, target_date: NaiveDate) -> EngineResult<ResourceUtilization> {
        let result = Self::coordinate_daily(conn, target_date)?;

        let capacities: &[(ResourceTag, f64)] = &[
            (ResourceTag::Time, 480.0),
            (ResourceTag::Nutrients, 100.0),
            (ResourceTag::Water, 500.0),
            (ResourceTag::Equipment, 10.0),
        ];

        let mut usage: HashMap<ResourceTag, f64> = HashMap::new();
        for batch in &result.batches {
            for resource in &batch.shared_resources {
                let entry = usage.entry(*resource).or_insert(0.0);
                if *resource == ResourceTag::Time {
                    *entry += batch.total_duration_minutes as f64;
                } else {
                    *entry += batch.task_count() as f64;
                }
            }
        }

        let mut entries = Vec::new();
        for (resource, capacity) in capacities {
            let used = *usage.get(resource).unwrap_or(&0.0);
            let percentage = if *capacity > 0.0 { (used / capacity * 1000.0).round() / 10.0 } else { 0.0 };
            entries.push((
                *resource,
                ResourceUtilizationEntry { usage: used, capacity: *capacity, percentage, available: capacity - used },
            ));
        }

        let over_capacity: Vec<ResourceTag> =
            entries.iter().filter(|(_, e)| e.percentage > 100.0).map(|(r, _)| *r).collect();

        let mut recommendations = Vec::new();
        for (resource, entry) in &entries {
            if entry.percentage > 100.0 {
                recommendations.push(format!(
                    "{} is over capacity ({}% used) — spread tasks across more of the day",
                    resource.as_str(),
                    entry.percentage
                ));
            } else if entry.percentage > 90.0 {
                recommendations.push(format!("{} is near capacity ({}% used)", resource.as_str(), entry.percentage));
            }
        }

        Ok(ResourceUtilization { date: target_date, entries, over_capacity, recommendations })
    }

    fn analyze_requirements(tasks: &[Task]) -> HashMap<i64, Vec<ResourceRequirement>> {
        let mut map = HashMap::new();
        for task in tasks {
            let id = task.id.expect("coordinator operates on persisted tasks");
            map.insert(id, Self::requirements_for(task));
        }
        map
    }

    fn requirements_for(task: &Task) -> Vec<ResourceRequirement> {
        let duration = task.estimated_duration_minutes;
        match task.task_type {
            TaskType::Feeding => vec![
                ResourceRequirement { resource: ResourceTag::Nutrients, quantity: 2.0, duration_minutes: duration, flexibility_minutes: 60 },
                ResourceRequirement { resource: ResourceTag::Water, quantity: 10.0, duration_minutes: duration, flexibility_minutes: 60 },
                ResourceRequirement { resource: ResourceTag::Equipment, quantity: 1.0, duration_minutes: duration, flexibility_minutes: 60 },
                ResourceRequirement { resource: ResourceTag::Time, quantity: duration as f64, duration_minutes: duration, flexibility_minutes: 30 },
            ],
            TaskType::Watering => vec![
                ResourceRequirement { resource: ResourceTag::Water, quantity: 5.0, duration_minutes: duration, flexibility_minutes: 60 },
                ResourceRequirement { resource: ResourceTag::Time, quantity: duration as f64, duration_minutes: duration, flexibility_minutes: 60 },
            ],
            TaskType::Pruning => vec![
                ResourceRequirement { resource: ResourceTag::Equipment, quantity: 1.0, duration_minutes: duration, flexibility_minutes: 120 },
                ResourceRequirement { resource: ResourceTag::Time, quantity: duration as f64, duration_minutes: duration, flexibility_minutes: 120 },
            ],
            TaskType::Monitoring => vec![
                ResourceRequirement { resource: ResourceTag::Equipment, quantity: 1.0, duration_minutes: duration, flexibility_minutes: 180 },
                ResourceRequirement { resource: ResourceTag::Time, quantity: duration as f64, duration_minutes: duration, flexibility_minutes: 180 },
            ],
            _ => vec![ResourceRequirement {
                resource: ResourceTag::Time,
                quantity: duration as f64,
                duration_minutes: duration,
                flexibility_minutes: 60,
            }],
        }
    }

    fn detect_conflicts(tasks: &[Task], requirements: &HashMap<i64, Vec<ResourceRequirement>>) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        let mut by_resource: HashMap<ResourceTag, Vec<(i64, NaiveDateTime, NaiveDateTime, i64)>> = HashMap::new();
        for task in tasks {
            let id = task.id.expect("coordinator operates on persisted tasks");
            for req in requirements.get(&id).into_iter().flatten() {
                let end = task.due_on + Duration::minutes(req.duration_minutes);
                by_resource.entry(req.resource).or_default().push((id, task.due_on, end, req.flexibility_minutes));
            }
        }

        for (resource, mut usages) in by_resource {
            usages.sort_by_key(|(_, start, _, _)| *start);
            for pair in usages.windows(2) {
                let (id_a, _, end_a, flex_a) = pair[0];
                let (id_b, start_b, _, flex_b) = pair[1];
                if end_a > start_b {
                    conflicts.push(Conflict {
                        kind: ConflictKind::Resource { resource, flexibility_minutes: flex_a.min(flex_b) },
                        task_a: id_a,
                        task_b: id_b,
                    });
                }
            }
        }

        conflicts.extend(Self::detect_space_conflicts(tasks));
        conflicts
    }

    fn detect_space_conflicts(tasks: &[Task]) -> Vec<Conflict> {
        let mut physical: Vec<&Task> = tasks.iter().filter(|t| t.task_type.requires_physical_presence()).collect();
        physical.sort_by_key(|t| t.due_on);

        // Location isn't modeled per-task yet; physical-presence tasks from
        // different gardens are treated as different locations (§4.3 step 3).
        let mut conflicts = Vec::new();
        for pair in physical.windows(2) {
            let current = pair[0];
            let next = pair[1];
            if current.garden_id == next.garden_id {
                continue;
            }
            let current_end = current.end_on();
            let gap = (next.due_on - current_end).num_minutes();
            if gap < SPACE_CONFLICT_BUFFER_MINUTES {
                conflicts.push(Conflict {
                    kind: ConflictKind::Space { travel_minutes: SPACE_CONFLICT_BUFFER_MINUTES },
                    task_a: current.id.unwrap(),
                    task_b: next.id.unwrap(),
                });
            }
        }
        conflicts
    }

    /// A task pair can collide on several shared resources at once (nutrients,
    /// water, equipment, time all at the same instant); each shows up as its
    /// own `Conflict`. Collapse those down to one reschedule per pair - using
    /// the tightest flexibility among that pair's resource conflicts - so a
    /// single overlap isn't "resolved" several times over. Pairs are merged by
    /// (task_a, task_b) key rather than by conflict order, so the result
    /// doesn't depend on the (hashmap-derived) order `conflicts` arrives in.
    fn resolve_conflicts(tasks: &mut [Task], conflicts: &[Conflict]) {
        let mut by_pair: std::collections::BTreeMap<(i64, i64), Conflict> = std::collections::BTreeMap::new();
        for conflict in conflicts {
            let pair_key = (conflict.task_a.min(conflict.task_b), conflict.task_a.max(conflict.task_b));
            by_pair
                .entry(pair_key)
                .and_modify(|existing| {
                    if let (
                        ConflictKind::Resource { flexibility_minutes: existing_flex, .. },
                        ConflictKind::Resource { flexibility_minutes: new_flex, .. },
                    ) = (existing.kind, conflict.kind)
                    {
                        if new_flex < existing_flex {
                            existing.kind = conflict.kind;
                        }
                    }
                })
                .or_insert_with(|| conflict.clone());
        }

        for conflict in by_pair.values() {
            match conflict.kind {
                ConflictKind::Resource { flexibility_minutes, .. } => {
                    let priority_a = tasks.iter().find(|t| t.id == Some(conflict.task_a)).map(|t| t.priority);
                    let priority_b = tasks.iter().find(|t| t.id == Some(conflict.task_b)).map(|t| t.priority);
                    let (priority_a, priority_b) = match (priority_a, priority_b) {
                        (Some(a), Some(b)) => (a, b),
                        _ => continue,
                    };
                    let reschedule_id = if priority_a != priority_b {
                        if priority_a >= priority_b { conflict.task_b } else { conflict.task_a }
                    } else {
                        conflict.task_a.max(conflict.task_b)
                    };
                    if let Some(task) = tasks.iter_mut().find(|t| t.id == Some(reschedule_id)) {
                        task.due_on += Duration::minutes(flexibility_minutes);
                    }
                }
                ConflictKind::Space { travel_minutes } => {
                    if let Some(task) = tasks.iter_mut().find(|t| t.id == Some(conflict.task_b)) {
                        task.due_on += Duration::minutes(travel_minutes);
                    }
                }
            }
        }
    }

    fn priority_rank(p: Priority) -> i64 {
        match p {
            Priority::Critical => 3,
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }

    fn create_batches(mut remaining: Vec<Task>, requirements: &HashMap<i64, Vec<ResourceRequirement>>) -> Vec<Batch> {
        let mut batches = Vec::new();

        while !remaining.is_empty() {
            remaining.sort_by(|a, b| {
                (Self::priority_rank(b.priority), b.due_on).cmp(&(Self::priority_rank(a.priority), a.due_on))
            });

            let seed = remaining.remove(0);
            let seed_resources: std::collections::HashSet<ResourceTag> =
                requirements.get(&seed.id.unwrap()).into_iter().flatten().map(|r| r.resource).collect();

            let mut scored: Vec<(f64, i64, usize)> = remaining
                .iter()
                .enumerate()
                .filter(|(_, t)| Self::are_batchable(&seed, t, &seed_resources, requirements))
                .map(|(idx, t)| (Self::compatibility_score(&seed, t, &seed_resources, requirements), t.id.unwrap(), idx))
                .collect();
            // Ties broken by task id ascending, for determinism regardless of
            // `remaining`'s incoming order.
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap().then(a.1.cmp(&b.1)));

            let mut chosen_indices: Vec<usize> = scored.iter().take(MAX_BATCH_SIZE - 1).map(|(_, _, idx)| *idx).collect();
            chosen_indices.sort_unstable_by(|a, b| b.cmp(a));

            let mut batch_tasks = vec![seed];
            for idx in chosen_indices {
                batch_tasks.push(remaining.remove(idx));
            }

            batches.push(Self::build_batch(batch_tasks, requirements));
        }

        batches
    }

    /// Location isn't modeled per-task, so co-location is approximated by
    /// shared resources and time proximity alone (§4.3 step 5).
    fn are_batchable(
        seed: &Task,
        candidate: &Task,
        seed_resources: &std::collections::HashSet<ResourceTag>,
        requirements: &HashMap<i64, Vec<ResourceRequirement>>,
    ) -> bool {
        let candidate_resources: std::collections::HashSet<ResourceTag> =
            requirements.get(&candidate.id.unwrap()).into_iter().flatten().map(|r| r.resource).collect();
        if seed_resources.is_disjoint(&candidate_resources) {
            return false;
        }

        let diff = (candidate.due_on - seed.due_on).num_minutes().abs();
        diff <= BATCHABLE_TIME_WINDOW_MINUTES
    }

    fn compatibility_score(
        seed: &Task,
        candidate: &Task,
        seed_resources: &std::collections::HashSet<ResourceTag>,
        requirements: &HashMap<i64, Vec<ResourceRequirement>>,
    ) -> f64 {
        let mut score = 0.0;
        if seed.garden_id == candidate.garden_id {
            score += 10.0;
        }

        let candidate_resources: std::collections::HashSet<ResourceTag> =
            requirements.get(&candidate.id.unwrap()).into_iter().flatten().map(|r| r.resource).collect();
        let shared = seed_resources.intersection(&candidate_resources).count();
        score += shared as f64 * 2.0;

        let diff = (candidate.due_on - seed.due_on).num_minutes().abs() as f64;
        score += (60.0 - diff).max(0.0) * 0.1;

        score += Self::type_compatibility_bonus(seed.task_type, candidate.task_type);
        score
    }

    fn type_compatibility_bonus(a: TaskType, b: TaskType) -> f64 {
        let pair = (a, b);
        match pair {
            (TaskType::Feeding, TaskType::Monitoring) | (TaskType::Monitoring, TaskType::Feeding) => 3.0,
            (TaskType::Pruning, TaskType::Training) | (TaskType::Training, TaskType::Pruning) => 4.0,
            (TaskType::Watering, TaskType::Monitoring) | (TaskType::Monitoring, TaskType::Watering) => 2.0,
            _ => 0.0,
        }
    }

    fn build_batch(tasks: Vec<Task>, requirements: &HashMap<i64, Vec<ResourceRequirement>>) -> Batch {
        let total_duration_minutes: i64 = tasks.iter().map(|t| t.estimated_duration_minutes).sum();

        let mut shared_resources: Vec<ResourceTag> = tasks
            .iter()
            .flat_map(|t| requirements.get(&t.id.unwrap()).into_iter().flatten())
            .map(|r| r.resource)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        shared_resources.sort_by_key(|r| r.as_str());

        let optimal_start = tasks.iter().map(|t| t.due_on).min().unwrap();
        let gardens: Vec<i64> = tasks
            .iter()
            .map(|t| t.garden_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let efficiency = Self::batch_efficiency(&tasks, &shared_resources, total_duration_minutes, gardens.len());

        Batch {
            tasks,
            total_duration_minutes,
            shared_resources,
            optimal_start,
            scheduled_start: None,
            efficiency,
            gardens,
        }
    }

    fn batch_efficiency(tasks: &[Task], shared_resources: &[ResourceTag], total_duration_minutes: i64, garden_count: usize) -> f64 {
        let mut efficiency = 50.0;
        efficiency += tasks.len() as f64 * 10.0;
        efficiency += shared_resources.len() as f64 * 5.0;
        if garden_count == 1 {
            efficiency += 15.0;
        }
        if total_duration_minutes > BATCHABLE_TIME_WINDOW_MINUTES {
            efficiency -= (total_duration_minutes - BATCHABLE_TIME_WINDOW_MINUTES) as f64 * 0.1;
        }
        efficiency.clamp(0.0, 100.0)
    }

    fn optimize_execution_order(mut batches: Vec<Batch>, target_date: NaiveDate) -> Vec<Batch> {
        batches.sort_by(|a, b| {
            let score_a = a.efficiency * 0.6 + Self::urgency(a) * 0.4;
            let score_b = b.efficiency * 0.6 + Self::urgency(b) * 0.4;
            score_b.partial_cmp(&score_a).unwrap().then_with(|| Self::earliest_task_id(a).cmp(&Self::earliest_task_id(b)))
        });

        let mut current = target_date.and_hms_opt(DAY_START_HOUR, 0, 0).unwrap();
        for batch in &mut batches {
            batch.scheduled_start = Some(current);
            current += Duration::minutes(batch.total_duration_minutes + SPACE_CONFLICT_BUFFER_MINUTES);
        }
        batches
    }

    fn urgency(batch: &Batch) -> f64 {
        let total: f64 = batch.tasks.iter().map(|t| t.priority.urgency_weight()).sum();
        total / batch.tasks.len() as f64
    }

    fn earliest_task_id(batch: &Batch) -> i64 {
        batch.tasks.iter().filter_map(|t| t.id).min().unwrap_or(i64::MAX)
    }

    fn sharing_opportunities(batches: &[Batch]) -> Vec<SharingOpportunity> {
        let mut opportunities = Vec::new();
        for i in 0..batches.len() {
            for j in (i + 1)..batches.len() {
                let a = &batches[i];
                let b = &batches[j];
                let shared: Vec<ResourceTag> = a
                    .shared_resources
                    .iter()
                    .filter(|r| b.shared_resources.contains(r))
                    .copied()
                    .collect();
                if shared.is_empty() {
                    continue;
                }

                let (Some(a_start), Some(b_start)) = (a.scheduled_start, b.scheduled_start) else { continue };
                let a_end = a_start + Duration::minutes(a.total_duration_minutes);
                let gap = (b_start - a_end).num_minutes();
                if gap > 0 && gap < SHARING_WINDOW_MINUTES {
                    opportunities.push(SharingOpportunity {
                        batch_a: i,
                        batch_b: j,
                        potential_time_savings_minutes: (5 * shared.len() as i64).min(30),
                        shared_resources: shared,
                    });
                }
            }
        }
        opportunities
    }

    fn time_savings(batches: &[Batch]) -> i64 {
        let total_tasks: i64 = batches.iter().map(|b| b.task_count() as i64).sum();
        let individual_setup = total_tasks * SETUP_MINUTES_PER_TASK;
        let coordinated_setup = batches.len() as i64 * SETUP_MINUTES_PER_BATCH;
        (individual_setup - coordinated_setup).max(0)
    }

    fn average_efficiency(batches: &[Batch]) -> f64 {
        if batches.is_empty() {
            return 0.0;
        }
        let total: f64 = batches.iter().map(|b| b.efficiency).sum();
        ((total / batches.len() as f64) * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::models::{Garden, GrowingMethod};
    use crate::repo::GardenRepo;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn seed_garden(conn: &Connection, name: &str) -> i64 {
        let garden = Garden::new(name.into(), GrowingMethod::Hydroponic, "Basil".into(), day().and_hms_opt(0, 0, 0).unwrap());
        GardenRepo::create(conn, &garden).unwrap().id.unwrap()
    }

    fn push_task(conn: &Connection, garden_id: i64, task_type: TaskType, priority: Priority, hour: u32, minute: u32, duration: i64) -> Task {
        let due = day().and_hms_opt(hour, minute, 0).unwrap();
        let task = Task::new(garden_id, format!("{:?}", task_type), "d".into(), task_type, priority, due, duration, true, due);
        TaskRepo::create(conn, &task).unwrap()
    }

    #[test]
    fn empty_day_returns_empty_result() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let result = Coordinator::coordinate_daily(&conn, day()).unwrap();
        assert_eq!(result.total_tasks, 0);
        assert!(result.batches.is_empty());
    }

    #[test]
    fn batches_stay_within_the_target_day() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn, "Tent A");
        push_task(&conn, garden_id, TaskType::Watering, Priority::High, 9, 0, 10);
        push_task(&conn, garden_id, TaskType::Monitoring, Priority::Medium, 9, 15, 10);

        let result = Coordinator::coordinate_daily(&conn, day()).unwrap();
        let day_start = day().and_hms_opt(0, 0, 0).unwrap();
        let day_end = day_start + Duration::days(1);
        for batch in &result.batches {
            for task in &batch.tasks {
                assert!(task.due_on >= day_start && task.due_on < day_end);
            }
        }
    }

    #[test]
    fn resolved_plan_has_no_same_resource_overlap_after_resolution() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn, "Tent A");
        push_task(&conn, garden_id, TaskType::Feeding, Priority::Critical, 9, 0, 60);
        push_task(&conn, garden_id, TaskType::Feeding, Priority::Low, 9, 30, 60);

        let result = Coordinator::coordinate_daily(&conn, day()).unwrap();
        let all_tasks: Vec<&Task> = result.batches.iter().flat_map(|b| &b.tasks).collect();
        let nutrient_tasks: Vec<&&Task> = all_tasks.iter().filter(|t| t.task_type == TaskType::Feeding).collect();
        if nutrient_tasks.len() == 2 {
            let mut times: Vec<NaiveDateTime> = nutrient_tasks.iter().map(|t| t.due_on).collect();
            times.sort();
            assert!(times[1] >= times[0] + Duration::minutes(60));
        }
    }

    #[test]
    fn batch_efficiency_within_bounds() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn, "Tent A");
        for i in 0..5 {
            push_task(&conn, garden_id, TaskType::Watering, Priority::Medium, 9, i * 5, 10);
        }
        let result = Coordinator::coordinate_daily(&conn, day()).unwrap();
        for batch in &result.batches {
            assert!(batch.efficiency >= 0.0 && batch.efficiency <= 100.0);
        }
    }

    #[test]
    fn resource_utilization_reports_fixed_capacities() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn, "Tent A");
        push_task(&conn, garden_id, TaskType::Feeding, Priority::High, 9, 0, 30);

        let utilization = Coordinator::resource_utilization(&conn, day()).unwrap();
        let time_entry = utilization.entries.iter().find(|(r, _)| *r == ResourceTag::Time).unwrap();
        assert_eq!(time_entry.1.capacity, 480.0);
    }

    #[test]
    fn coordination_is_deterministic_across_runs() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden_id = seed_garden(&conn, "Tent A");
        push_task(&conn, garden_id, TaskType::Watering, Priority::High, 9, 0, 10);
        push_task(&conn, garden_id, TaskType::Monitoring, Priority::Medium, 9, 10, 10);

        let first = Coordinator::coordinate_daily(&conn, day()).unwrap();
        let second = Coordinator::coordinate_daily(&conn, day()).unwrap();
        assert_eq!(first.batches.len(), second.batches.len());
    }
}
