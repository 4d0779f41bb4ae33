use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// A resource pool the Coordinator reasons about for conflict detection and
/// utilization accounting (§4.3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceTag {
    Nutrients,
    Water,
    Equipment,
    Lighting,
    Time,
    Space,
}

impl ResourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceTag::Nutrients => "nutrients",
            ResourceTag::Water => "water",
            ResourceTag::Equipment => "equipment",
            ResourceTag::Lighting => "lighting",
            ResourceTag::Time => "time",
            ResourceTag::Space => "space",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "nutrients" => Some(ResourceTag::Nutrients),
            "water" => Some(ResourceTag::Water),
            "equipment" => Some(ResourceTag::Equipment),
            "lighting" => Some(ResourceTag::Lighting),
            "time" => Some(ResourceTag::Time),
            "space" => Some(ResourceTag::Space),
            _ => None,
        }
    }
}

/// What a single task consumes, derived from its `TaskType` (§4.3 step 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    pub resource: ResourceTag,
    pub quantity: f64,
    pub duration_minutes: i64,
    /// Minutes a conflicting occurrence of this requirement may be shifted
    /// before it is considered blocked (§4.3 step 4).
    pub flexibility_minutes: i64,
}

/// A group of compatible tasks the Coordinator proposes to execute together
/// (§4.3 steps 5-7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub tasks: Vec<Task>,
    pub total_duration_minutes: i64,
    pub shared_resources: Vec<ResourceTag>,
    pub optimal_start: NaiveDateTime,
    pub scheduled_start: Option<NaiveDateTime>,
    pub efficiency: f64,
    pub gardens: Vec<i64>,
}

impl Batch {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_single_garden(&self) -> bool {
        self.gardens.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_tag_roundtrip() {
        for tag in [
            ResourceTag::Nutrients,
            ResourceTag::Water,
            ResourceTag::Equipment,
            ResourceTag::Lighting,
            ResourceTag::Time,
            ResourceTag::Space,
        ] {
            assert_eq!(ResourceTag::from_str(tag.as_str()), Some(tag));
        }
    }
}
