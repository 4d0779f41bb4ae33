use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::task::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    TaskReminder,
    TaskOverdue,
    SystemAlert,
    GrowthMilestone,
    ResourceAlert,
    HarvestReady,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::TaskReminder => "task-reminder",
            NotificationType::TaskOverdue => "task-overdue",
            NotificationType::SystemAlert => "system-alert",
            NotificationType::GrowthMilestone => "growth-milestone",
            NotificationType::ResourceAlert => "resource-alert",
            NotificationType::HarvestReady => "harvest-ready",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task-reminder" => Some(NotificationType::TaskReminder),
            "task-overdue" => Some(NotificationType::TaskOverdue),
            "system-alert" => Some(NotificationType::SystemAlert),
            "growth-milestone" => Some(NotificationType::GrowthMilestone),
            "resource-alert" => Some(NotificationType::ResourceAlert),
            "harvest-ready" => Some(NotificationType::HarvestReady),
            _ => None,
        }
    }
}

/// A durable record of a delivered (or attempted) notification, used both as
/// history and as the de-duplication source of truth (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Option<i64>,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub task_id: Option<i64>,
    pub garden_id: Option<i64>,
    pub sent_at: NaiveDateTime,
}

/// A notification queued for delivery, before it has been sent or persisted.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub task_id: Option<i64>,
    pub garden_id: Option<i64>,
    /// Set when the event was enqueued during quiet hours; re-checked each
    /// drain cycle rather than delivered unconditionally.
    pub delayed: bool,
}

impl NotificationEvent {
    /// Seconds of on-screen time the transport should show this for (§6.3).
    pub fn duration_class_seconds(&self) -> u32 {
        match self.priority {
            Priority::Low => 5,
            Priority::Medium => 10,
            Priority::High => 15,
            Priority::Critical => 20,
        }
    }
}
