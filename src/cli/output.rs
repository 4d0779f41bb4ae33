// Output formatting utilities

use crate::engine::coordinator::{CoordinationResult, ResourceUtilization};
use crate::models::{Garden, InventoryItem};

/// Format a garden list as a table
pub fn format_garden_list(gardens: &[Garden]) -> String {
    if gardens.is_empty() {
        return "No gardens found.\n".to_string();
    }

    let mut id_width = 4;
    let mut name_width = 10;
    let mut method_width = 10;
    let mut plant_width = 10;
    let mut stage_width = 12;

    for g in gardens {
        id_width = id_width.max(g.id.map(|id| id.to_string().len()).unwrap_or(1));
        name_width = name_width.max(g.name.len());
        method_width = method_width.max(g.growing_method.as_str().len());
        plant_width = plant_width.max(g.plant_type.len());
        stage_width = stage_width.max(g.current_stage.as_str().len());
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id$} {:<name$} {:<method$} {:<plant$} {:<stage$} Active\n",
        "ID", "Name", "Method", "Plant", "Stage",
        id = id_width, name = name_width, method = method_width, plant = plant_width, stage = stage_width
    ));
    let total_width = id_width + name_width + method_width + plant_width + stage_width + 11;
    output.push_str(&format!("{}\n", "-".repeat(total_width)));

    for g in gardens {
        let id = g.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
        output.push_str(&format!(
            "{:<id$} {:<name$} {:<method$} {:<plant$} {:<stage$} {}\n",
            id, g.name, g.growing_method.as_str(), g.plant_type, g.current_stage.as_str(),
            if g.is_active { "yes" } else { "no" },
            id = id_width, name = name_width, method = method_width, plant = plant_width, stage = stage_width
        ));
    }
    output
}

/// Format inventory items as a table, flagging low-stock rows
pub fn format_inventory_list(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "No inventory items found.\n".to_string();
    }

    let mut name_width = 20;
    for item in items {
        name_width = name_width.max(item.name.len());
    }

    let mut output = String::new();
    output.push_str(&format!("{:<name$} {:>10} {:>10}\n", "Name", "Quantity", "Threshold", name = name_width));
    output.push_str(&format!("{}\n", "-".repeat(name_width + 22)));

    for item in items {
        let flag = if item.is_low_stock() { " (low)" } else { "" };
        output.push_str(&format!(
            "{:<name$} {:>10.1} {:>10.1}{}\n",
            item.name, item.current_quantity, item.minimum_threshold, flag, name = name_width
        ));
    }
    output
}

/// Format a coordination result: batches in execution order, then summary stats
pub fn format_coordination_result(result: &CoordinationResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("Coordination for {}\n", result.date));
    output.push_str(&format!("{}\n", "=".repeat(40)));

    if result.batches.is_empty() {
        output.push_str("No tasks due.\n");
        return output;
    }

    for (idx, batch) in result.batches.iter().enumerate() {
        output.push_str(&format!(
            "\nBatch {} - {} task(s), {}min, efficiency {:.2}\n",
            idx + 1,
            batch.task_count(),
            batch.total_duration_minutes,
            batch.efficiency
        ));
        if let Some(scheduled) = batch.scheduled_start {
            output.push_str(&format!("  Scheduled start: {}\n", scheduled));
        }
        let resources = batch.shared_resources.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ");
        if !resources.is_empty() {
            output.push_str(&format!("  Shared resources: {}\n", resources));
        }
        for task in &batch.tasks {
            output.push_str(&format!("    [{}] {} - due {}\n", task.priority.as_str(), task.title, task.due_on));
        }
    }

    output.push_str(&format!(
        "\n{} task(s), {} conflict(s) resolved, {} sharing opportunit(y/ies), ~{}min saved, {:.1}% efficient\n",
        result.total_tasks,
        result.conflicts_detected,
        result.sharing_opportunities.len(),
        result.estimated_time_savings_minutes,
        result.resource_efficiency * 100.0
    ));
    output
}

/// Format a resource utilization report
pub fn format_utilization(utilization: &ResourceUtilization) -> String {
    let mut output = String::new();
    output.push_str(&format!("Resource utilization for {}\n", utilization.date));
    output.push_str(&format!("{}\n", "-".repeat(40)));

    for (resource, entry) in &utilization.entries {
        output.push_str(&format!(
            "{:<12} {:>8.1} / {:<8.1} ({:>5.1}%), {:.1} available\n",
            resource.as_str(), entry.usage, entry.capacity, entry.percentage, entry.available
        ));
    }

    if !utilization.over_capacity.is_empty() {
        let names = utilization.over_capacity.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ");
        output.push_str(&format!("\nOver capacity: {}\n", names));
    }

    if !utilization.recommendations.is_empty() {
        output.push_str("\nRecommendations:\n");
        for rec in &utilization.recommendations {
            output.push_str(&format!("  - {}\n", rec));
        }
    }
    output
}
