use chrono::NaiveDateTime;

use crate::models::GrowthStage;

/// Stage boundaries in days-since-planting, inclusive lower bound. Shared by
/// the Generator and the Notifier so stage derivation has exactly one
/// implementation (§8's "single source of truth" property).
const SEEDLING_AT: i64 = 7;
const VEGETATIVE_AT: i64 = 21;
const FLOWERING_AT: i64 = 56;
const HARVEST_AT: i64 = 112;

/// Derive the growth stage from days elapsed since planting. `Curing` is
/// never returned here — it exists in the data model for manual/external
/// use but isn't part of the automatic progression.
pub fn derive_stage(days_since_planting: i64) -> GrowthStage {
    if days_since_planting < SEEDLING_AT {
        GrowthStage::Germination
    } else if days_since_planting < VEGETATIVE_AT {
        GrowthStage::Seedling
    } else if days_since_planting < FLOWERING_AT {
        GrowthStage::Vegetative
    } else if days_since_planting < HARVEST_AT {
        GrowthStage::Flowering
    } else {
        GrowthStage::Harvest
    }
}

/// How many days a garden has spent in its current stage, given the total
/// days since planting. Used to gate templates' `days_from_stage_start`.
pub fn days_in_stage(stage: GrowthStage, days_since_planting: i64) -> i64 {
    let stage_start = match stage {
        GrowthStage::Germination => 0,
        GrowthStage::Seedling => SEEDLING_AT,
        GrowthStage::Vegetative => VEGETATIVE_AT,
        GrowthStage::Flowering => FLOWERING_AT,
        GrowthStage::Harvest => HARVEST_AT,
        GrowthStage::Curing => HARVEST_AT,
    };
    days_since_planting - stage_start
}

pub fn days_since(planted_on: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - planted_on).num_days()
}
