use crate::models::{GrowingMethod, GrowthStage, Priority, TaskTemplate, TaskType};

/// Hydroponic templates, one per growth stage's recurring or one-shot task
/// (§4.1). Ported verbatim from the original growing-method catalogue:
/// names, stage placement, frequencies, durations, materials, and
/// instructions are unchanged.
const HYDROPONIC: &[TaskTemplate] = &[
    TaskTemplate {
        name: "Check Seed Germination",
        description: "Monitor seeds for germination progress",
        task_type: TaskType::Monitoring,
        target_stage: GrowthStage::Germination,
        days_from_stage_start: 1,
        frequency_days: 1,
        priority: Priority::High,
        duration_minutes: 5,
        instructions: "Check for root emergence and remove ungerminated seeds after 7 days",
        required_materials: &["Magnifying glass"],
    },
    TaskTemplate {
        name: "Maintain Germination Environment",
        description: "Ensure proper temperature and humidity for germination",
        task_type: TaskType::Environmental,
        target_stage: GrowthStage::Germination,
        days_from_stage_start: 0,
        frequency_days: 1,
        priority: Priority::Critical,
        duration_minutes: 10,
        instructions: "Maintain 75-80F temperature and 80-90% humidity",
        required_materials: &["Thermometer", "Humidity gauge"],
    },
    TaskTemplate {
        name: "First Nutrient Solution",
        description: "Introduce diluted nutrient solution for seedlings",
        task_type: TaskType::Feeding,
        target_stage: GrowthStage::Seedling,
        days_from_stage_start: 3,
        frequency_days: 7,
        priority: Priority::High,
        duration_minutes: 15,
        instructions: "Use 25% strength nutrient solution, EC 0.8-1.2, pH 5.5-6.5",
        required_materials: &["Nutrient solution", "EC meter", "pH meter"],
    },
    TaskTemplate {
        name: "Transplant to Growing System",
        description: "Move seedlings to main hydroponic system",
        task_type: TaskType::Maintenance,
        target_stage: GrowthStage::Seedling,
        days_from_stage_start: 14,
        frequency_days: 0,
        priority: Priority::Critical,
        duration_minutes: 30,
        instructions: "Carefully transplant when 2-3 true leaves are present",
        required_materials: &["Net pots", "Growing medium", "Support clips"],
    },
    TaskTemplate {
        name: "Weekly Nutrient Solution Change",
        description: "Replace nutrient solution for optimal growth",
        task_type: TaskType::Feeding,
        target_stage: GrowthStage::Vegetative,
        days_from_stage_start: 0,
        frequency_days: 7,
        priority: Priority::Critical,
        duration_minutes: 45,
        instructions: "Full solution change, EC 1.2-1.6, pH 5.5-6.5",
        required_materials: &["Fresh nutrients", "pH adjuster", "Clean water"],
    },
    TaskTemplate {
        name: "Prune Lower Leaves",
        description: "Remove lower yellowing leaves to focus energy",
        task_type: TaskType::Pruning,
        target_stage: GrowthStage::Vegetative,
        days_from_stage_start: 14,
        frequency_days: 14,
        priority: Priority::Medium,
        duration_minutes: 20,
        instructions: "Remove yellowing lower leaves and any dead growth",
        required_materials: &["Clean scissors", "Sanitizer"],
    },
    TaskTemplate {
        name: "LST (Low Stress Training)",
        description: "Bend and tie branches to optimize light exposure",
        task_type: TaskType::Training,
        target_stage: GrowthStage::Vegetative,
        days_from_stage_start: 21,
        frequency_days: 7,
        priority: Priority::Medium,
        duration_minutes: 25,
        instructions: "Gently bend branches to create even canopy",
        required_materials: &["Soft ties", "Clips"],
    },
    TaskTemplate {
        name: "Switch to Flowering Nutrients",
        description: "Change to flowering-specific nutrient formula",
        task_type: TaskType::Feeding,
        target_stage: GrowthStage::Flowering,
        days_from_stage_start: 0,
        frequency_days: 0,
        priority: Priority::Critical,
        duration_minutes: 30,
        instructions: "Switch to high P-K flowering formula, reduce nitrogen",
        required_materials: &["Flowering nutrients", "pH adjuster"],
    },
    TaskTemplate {
        name: "Monitor Flower Development",
        description: "Check flowering progress and identify issues",
        task_type: TaskType::Monitoring,
        target_stage: GrowthStage::Flowering,
        days_from_stage_start: 7,
        frequency_days: 3,
        priority: Priority::High,
        duration_minutes: 15,
        instructions: "Check for pistil development, pollen sacs, or hermaphrodites",
        required_materials: &["Magnifying glass", "Notebook"],
    },
    TaskTemplate {
        name: "Defoliation for Light Penetration",
        description: "Remove fan leaves blocking bud sites",
        task_type: TaskType::Pruning,
        target_stage: GrowthStage::Flowering,
        days_from_stage_start: 21,
        frequency_days: 0,
        priority: Priority::Medium,
        duration_minutes: 45,
        instructions: "Remove large fan leaves blocking light to lower bud sites",
        required_materials: &["Clean scissors", "Sanitizer"],
    },
    TaskTemplate {
        name: "Check Trichome Development",
        description: "Monitor trichomes for harvest readiness",
        task_type: TaskType::Monitoring,
        target_stage: GrowthStage::Harvest,
        days_from_stage_start: 0,
        frequency_days: 2,
        priority: Priority::Critical,
        duration_minutes: 10,
        instructions: "Look for milky white trichomes with some amber",
        required_materials: &["60x magnifying glass", "Jeweler's loupe"],
    },
    TaskTemplate {
        name: "Harvest Plants",
        description: "Cut and prepare plants for drying",
        task_type: TaskType::Harvesting,
        target_stage: GrowthStage::Harvest,
        days_from_stage_start: 7,
        frequency_days: 0,
        priority: Priority::Critical,
        duration_minutes: 120,
        instructions: "Cut at base, trim fan leaves, hang to dry in controlled environment",
        required_materials: &["Sharp scissors", "Gloves", "Drying racks"],
    },
];

const SOIL: &[TaskTemplate] = &[TaskTemplate {
    name: "Water Check - Soil",
    description: "Check soil moisture and water if needed",
    task_type: TaskType::Watering,
    target_stage: GrowthStage::Vegetative,
    days_from_stage_start: 0,
    frequency_days: 2,
    priority: Priority::High,
    duration_minutes: 10,
    instructions: "Water when top inch of soil is dry",
    required_materials: &["Watering can", "Moisture meter"],
}];

const AEROPONIC: &[TaskTemplate] = &[TaskTemplate {
    name: "Check Spray Nozzles",
    description: "Ensure all spray nozzles are functioning",
    task_type: TaskType::Maintenance,
    target_stage: GrowthStage::Vegetative,
    days_from_stage_start: 0,
    frequency_days: 3,
    priority: Priority::Critical,
    duration_minutes: 15,
    instructions: "Clean or replace any clogged nozzles",
    required_materials: &["Cleaning tools", "Replacement nozzles"],
}];

/// Template set for a growing method. Methods with no dedicated catalogue
/// (coco, soilless, greenhouse, outdoor, mixed) fall back to hydroponic,
/// matching the original generator's `templates.get(method, hydroponic)`.
pub fn templates_for(method: GrowingMethod) -> &'static [TaskTemplate] {
    match method {
        GrowingMethod::Hydroponic => HYDROPONIC,
        GrowingMethod::Soil => SOIL,
        GrowingMethod::Aeroponic => AEROPONIC,
        GrowingMethod::Coco
        | GrowingMethod::Soilless
        | GrowingMethod::Greenhouse
        | GrowingMethod::Outdoor
        | GrowingMethod::Mixed => HYDROPONIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydroponic_has_twelve_templates() {
        assert_eq!(HYDROPONIC.len(), 12);
    }

    #[test]
    fn unknown_methods_fall_back_to_hydroponic() {
        assert_eq!(templates_for(GrowingMethod::Coco).len(), HYDROPONIC.len());
        assert_eq!(templates_for(GrowingMethod::Outdoor).len(), HYDROPONIC.len());
    }

    #[test]
    fn one_shot_templates_marked_correctly() {
        let transplant = HYDROPONIC.iter().find(|t| t.name == "Transplant to Growing System").unwrap();
        assert!(transplant.is_one_shot());
        let nutrient_change = HYDROPONIC.iter().find(|t| t.name == "Weekly Nutrient Solution Change").unwrap();
        assert!(!nutrient_change.is_one_shot());
    }
}
