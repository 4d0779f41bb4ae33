use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The kind of work a task represents; drives resource analysis (§4.3) and
/// compatibility scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Watering,
    Feeding,
    Monitoring,
    Pruning,
    Training,
    Harvesting,
    Maintenance,
    Environmental,
    Transplanting,
    Inspection,
    Lighting,
    General,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Watering => "watering",
            TaskType::Feeding => "feeding",
            TaskType::Monitoring => "monitoring",
            TaskType::Pruning => "pruning",
            TaskType::Training => "training",
            TaskType::Harvesting => "harvesting",
            TaskType::Maintenance => "maintenance",
            TaskType::Environmental => "environmental",
            TaskType::Transplanting => "transplanting",
            TaskType::Inspection => "inspection",
            TaskType::Lighting => "lighting",
            TaskType::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "watering" => Some(TaskType::Watering),
            "feeding" => Some(TaskType::Feeding),
            "monitoring" => Some(TaskType::Monitoring),
            "pruning" => Some(TaskType::Pruning),
            "training" => Some(TaskType::Training),
            "harvesting" => Some(TaskType::Harvesting),
            "maintenance" => Some(TaskType::Maintenance),
            "environmental" => Some(TaskType::Environmental),
            "transplanting" => Some(TaskType::Transplanting),
            "inspection" => Some(TaskType::Inspection),
            "lighting" => Some(TaskType::Lighting),
            "general" => Some(TaskType::General),
            _ => None,
        }
    }

    /// Physical-presence task types that participate in space-conflict
    /// detection (§4.3 step 3).
    pub fn requires_physical_presence(&self) -> bool {
        matches!(
            self,
            TaskType::Pruning | TaskType::Training | TaskType::Harvesting | TaskType::Maintenance
        )
    }
}

/// Task urgency. Ordering matches the spec's `critical > high > medium > low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }

    /// Urgency weight used for the Coordinator's execution-order score (§4.3 step 7).
    pub fn urgency_weight(&self) -> f64 {
        match self {
            Priority::Critical => 100.0,
            Priority::High => 75.0,
            Priority::Medium => 50.0,
            Priority::Low => 25.0,
        }
    }
}

/// An actionable, dated, prioritised unit of work owned by a garden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub garden_id: i64,
    pub plant_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub task_type: TaskType,
    pub priority: Priority,
    pub due_on: NaiveDateTime,
    pub estimated_duration_minutes: i64,
    pub is_completed: bool,
    pub completed_on: Option<NaiveDateTime>,
    pub recurrence_pattern: Option<String>,
    pub auto_generated: bool,
    pub created_on: NaiveDateTime,
}

impl Task {
    /// Build a task from a template instantiation (§4.2's "task synthesis").
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        garden_id: i64,
        title: String,
        description: String,
        task_type: TaskType,
        priority: Priority,
        due_on: NaiveDateTime,
        estimated_duration_minutes: i64,
        auto_generated: bool,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            garden_id,
            plant_id: None,
            title,
            description,
            task_type,
            priority,
            due_on,
            estimated_duration_minutes,
            is_completed: false,
            completed_on: None,
            recurrence_pattern: None,
            auto_generated,
            created_on: now,
        }
    }

    pub fn end_on(&self) -> NaiveDateTime {
        self.due_on + chrono::Duration::minutes(self.estimated_duration_minutes)
    }
}
