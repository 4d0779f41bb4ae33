use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use crate::db::DbConnection;
use crate::engine::{Coordinator, Generator, LoggingTransport, Notifier};
use crate::models::{Garden, GrowingMethod, InventoryItem};
use crate::repo::{GardenRepo, InventoryRepo};

use super::output::{format_coordination_result, format_garden_list, format_inventory_list, format_utilization};

#[derive(Parser)]
#[command(name = "cultivar", about = "Scheduling engine for a personal grow operation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage gardens
    Garden {
        #[command(subcommand)]
        subcommand: GardenCommands,
    },
    /// Generate due tasks for one garden from its template catalogue
    Generate { garden_id: i64 },
    /// Generate due tasks for every active garden
    GenerateAll,
    /// Batch and resolve conflicts for all tasks due on a date (default: today)
    Coordinate { date: Option<String> },
    /// Report resource utilization for a date (default: today)
    Utilization { date: Option<String> },
    /// Notification scanning
    Notify {
        #[command(subcommand)]
        subcommand: NotifyCommands,
    },
    /// List inventory items and their stock levels
    Inventory {
        /// Emit machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum GardenCommands {
    /// Create a garden
    Add {
        name: String,
        #[arg(long, value_enum)]
        method: GrowingMethodArg,
        #[arg(long)]
        plant_type: String,
        /// Planting date as YYYY-MM-DD; defaults to today
        #[arg(long)]
        planted: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// List gardens
    List {
        /// Include archived (inactive) gardens
        #[arg(long)]
        all: bool,
        /// Emit machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete a garden and cascade-delete its tasks
    Remove { garden_id: i64 },
}

#[derive(Subcommand)]
pub enum NotifyCommands {
    /// Run the scan-and-alert loop in the foreground until interrupted
    Run,
    /// Run a single scan-and-drain cycle and print what was sent
    Once,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum GrowingMethodArg {
    Soil,
    Hydroponic,
    Aeroponic,
    Coco,
    Soilless,
    Greenhouse,
    Outdoor,
    Mixed,
}

impl From<GrowingMethodArg> for GrowingMethod {
    fn from(value: GrowingMethodArg) -> Self {
        match value {
            GrowingMethodArg::Soil => GrowingMethod::Soil,
            GrowingMethodArg::Hydroponic => GrowingMethod::Hydroponic,
            GrowingMethodArg::Aeroponic => GrowingMethod::Aeroponic,
            GrowingMethodArg::Coco => GrowingMethod::Coco,
            GrowingMethodArg::Soilless => GrowingMethod::Soilless,
            GrowingMethodArg::Greenhouse => GrowingMethod::Greenhouse,
            GrowingMethodArg::Outdoor => GrowingMethod::Outdoor,
            GrowingMethodArg::Mixed => GrowingMethod::Mixed,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Garden { subcommand } => match subcommand {
            GardenCommands::Add { name, method, plant_type, planted, location } => {
                handle_garden_add(name, method.into(), plant_type, planted, location)
            }
            GardenCommands::List { all, json } => handle_garden_list(all, json),
            GardenCommands::Remove { garden_id } => handle_garden_remove(garden_id),
        },
        Commands::Generate { garden_id } => handle_generate(garden_id),
        Commands::GenerateAll => handle_generate_all(),
        Commands::Coordinate { date } => handle_coordinate(date),
        Commands::Utilization { date } => handle_utilization(date),
        Commands::Notify { subcommand } => match subcommand {
            NotifyCommands::Run => handle_notify_run(),
            NotifyCommands::Once => handle_notify_once(),
        },
        Commands::Inventory { json } => handle_inventory(json),
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

fn handle_garden_add(
    name: String,
    growing_method: GrowingMethod,
    plant_type: String,
    planted: Option<String>,
    location: Option<String>,
) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;

    let planted_on = match planted {
        Some(d) => parse_date(&d)?.and_hms_opt(0, 0, 0).unwrap(),
        None => now(),
    };

    let mut garden = Garden::new(name, growing_method, plant_type, planted_on);
    garden.location = location;

    let created = GardenRepo::create(&conn, &garden).context("Failed to create garden")?;
    println!("Created garden {} ({})", created.id.unwrap(), created.name);

    let generator = Generator::new();
    let tasks = generator.generate(&conn, created.id.unwrap(), now())?;
    println!("Generated {} initial task(s)", tasks.len());
    Ok(())
}

fn handle_garden_list(all: bool, json: bool) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let gardens = if all { GardenRepo::list_all(&conn)? } else { GardenRepo::list_active(&conn)? };
    if json {
        println!("{}", serde_json::to_string_pretty(&gardens)?);
    } else {
        print!("{}", format_garden_list(&gardens));
    }
    Ok(())
}

fn handle_garden_remove(garden_id: i64) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    if GardenRepo::delete(&conn, garden_id)? {
        println!("Deleted garden {} and its tasks", garden_id);
    } else {
        println!("No garden {} found.", garden_id);
    }
    Ok(())
}

fn handle_generate(garden_id: i64) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let generator = Generator::new();
    let tasks = generator.generate(&conn, garden_id, now())?;
    if tasks.is_empty() {
        println!("No new tasks due for garden {}.", garden_id);
    } else {
        for task in &tasks {
            println!("  {} [{}] due {}", task.title, task.priority.as_str(), task.due_on);
        }
        println!("Generated {} task(s).", tasks.len());
    }
    Ok(())
}

fn handle_generate_all() -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let generator = Generator::new();
    let results = generator.generate_all(&conn, now())?;
    for (garden_id, count) in &results {
        println!("garden {}: {} task(s) generated", garden_id, count);
    }
    Ok(())
}

fn handle_coordinate(date: Option<String>) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let target_date = match date {
        Some(d) => parse_date(&d)?,
        None => now().date(),
    };
    let result = Coordinator::coordinate_daily(&conn, target_date)?;
    print!("{}", format_coordination_result(&result));
    Ok(())
}

fn handle_utilization(date: Option<String>) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let target_date = match date {
        Some(d) => parse_date(&d)?,
        None => now().date(),
    };
    let utilization = Coordinator::resource_utilization(&conn, target_date)?;
    print!("{}", format_utilization(&utilization));
    Ok(())
}

/// Foreground scan loop. There's no `ctrlc`-style dependency in this crate,
/// so SIGINT just terminates the process the usual way; the Notifier's
/// in-flight cycle still finishes before that happens.
fn handle_notify_run() -> Result<()> {
    let db_path = DbConnection::resolve_path().context("Failed to resolve database path")?;
    let notifier = Notifier::new(std::sync::Arc::new(LoggingTransport));
    notifier.start(db_path);
    println!("Notifier running. Press Ctrl-C to stop.");

    loop {
        std::thread::sleep(std::time::Duration::from_secs(3600));
    }
}

fn handle_notify_once() -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let notifier = Notifier::new(std::sync::Arc::new(LoggingTransport));
    let sent = notifier.run_once(&conn, now())?;
    if sent.is_empty() {
        println!("No notifications sent.");
    } else {
        for event in &sent {
            println!("  [{}] {}: {}", event.priority.as_str(), event.title, event.body);
        }
        println!("Sent {} notification(s).", sent.len());
    }
    Ok(())
}

fn handle_inventory(json: bool) -> Result<()> {
    let conn = DbConnection::connect().context("Failed to connect to database")?;
    let items: Vec<InventoryItem> = InventoryRepo::list_all(&conn)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!("{}", format_inventory_list(&items));
    }
    Ok(())
}
