use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cultivation technique, selects a template set (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowingMethod {
    Soil,
    Hydroponic,
    Aeroponic,
    Coco,
    Soilless,
    Greenhouse,
    Outdoor,
    Mixed,
}

impl GrowingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowingMethod::Soil => "soil",
            GrowingMethod::Hydroponic => "hydroponic",
            GrowingMethod::Aeroponic => "aeroponic",
            GrowingMethod::Coco => "coco",
            GrowingMethod::Soilless => "soilless",
            GrowingMethod::Greenhouse => "greenhouse",
            GrowingMethod::Outdoor => "outdoor",
            GrowingMethod::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "soil" => Some(GrowingMethod::Soil),
            "hydroponic" => Some(GrowingMethod::Hydroponic),
            "aeroponic" => Some(GrowingMethod::Aeroponic),
            "coco" => Some(GrowingMethod::Coco),
            "soilless" => Some(GrowingMethod::Soilless),
            "greenhouse" => Some(GrowingMethod::Greenhouse),
            "outdoor" => Some(GrowingMethod::Outdoor),
            "mixed" => Some(GrowingMethod::Mixed),
            _ => None,
        }
    }
}

/// A phase of a plant's lifecycle that determines which task templates apply.
///
/// `Curing` is part of the data model but is never produced by
/// [`crate::engine::stage::derive_stage`] — see SPEC_FULL.md §4.2 and §9 for
/// why the six-state set is kept but the derivation stays five-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthStage {
    Germination,
    Seedling,
    Vegetative,
    Flowering,
    Harvest,
    Curing,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Germination => "germination",
            GrowthStage::Seedling => "seedling",
            GrowthStage::Vegetative => "vegetative",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Harvest => "harvest",
            GrowthStage::Curing => "curing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "germination" => Some(GrowthStage::Germination),
            "seedling" => Some(GrowthStage::Seedling),
            "vegetative" => Some(GrowthStage::Vegetative),
            "flowering" => Some(GrowthStage::Flowering),
            "harvest" => Some(GrowthStage::Harvest),
            "curing" => Some(GrowthStage::Curing),
            _ => None,
        }
    }
}

/// One growing space with its own plant cohort, lifecycle, and stage history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garden {
    pub id: Option<i64>,
    pub name: String,
    pub growing_method: GrowingMethod,
    pub plant_type: String,
    pub planted_on: NaiveDateTime,
    pub current_stage: GrowthStage,
    pub stage_started_on: NaiveDateTime,
    pub location: Option<String>,
    pub is_active: bool,
}

impl Garden {
    /// Create a new garden, freshly planted, in germination.
    pub fn new(name: String, growing_method: GrowingMethod, plant_type: String, planted_on: NaiveDateTime) -> Self {
        Self {
            id: None,
            name,
            growing_method,
            plant_type,
            planted_on,
            current_stage: GrowthStage::Germination,
            stage_started_on: planted_on,
            location: None,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_method_roundtrip() {
        for method in [
            GrowingMethod::Soil,
            GrowingMethod::Hydroponic,
            GrowingMethod::Aeroponic,
            GrowingMethod::Coco,
            GrowingMethod::Soilless,
            GrowingMethod::Greenhouse,
            GrowingMethod::Outdoor,
            GrowingMethod::Mixed,
        ] {
            assert_eq!(GrowingMethod::from_str(method.as_str()), Some(method));
        }
        assert_eq!(GrowingMethod::from_str("bogus"), None);
    }

    #[test]
    fn growth_stage_roundtrip() {
        for stage in [
            GrowthStage::Germination,
            GrowthStage::Seedling,
            GrowthStage::Vegetative,
            GrowthStage::Flowering,
            GrowthStage::Harvest,
            GrowthStage::Curing,
        ] {
            assert_eq!(GrowthStage::from_str(stage.as_str()), Some(stage));
        }
    }
}
