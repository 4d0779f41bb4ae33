use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime, Timelike};
use rusqlite::Connection;

use crate::engine::stage::{days_since, derive_stage};
use crate::engine::transport::NotificationTransport;
use crate::error::{EngineError, EngineResult};
use crate::models::{NotificationEvent, NotificationRecord, NotificationType, Priority, UserPreferences};
use crate::repo::{GardenRepo, InventoryRepo, NotificationRepo, SettingsRepo, TaskRepo};

const SCAN_INTERVAL: StdDuration = StdDuration::from_secs(60);
const REMINDER_DEDUP_WINDOW_DAYS: i64 = 1;
const OVERDUE_DEDUP_WINDOW_HOURS: i64 = 4;
const MAX_DRAIN_PER_CYCLE: usize = 5;

/// Background scan-and-alert loop (§4.4): reminders, overdue tasks, growth
/// milestones and low-inventory alerts. A single dedicated thread wakes every
/// [`SCAN_INTERVAL`], or immediately on `stop()`, via a condvar rather than a
/// plain sleep so shutdown doesn't have to wait out the last cycle.
///
/// Queued events persist across cycles on the instance (a notification
/// delayed for quiet hours is carried forward, not dropped), so `Notifier`
/// owns the queue rather than threading it through call sites.
pub struct Notifier {
    transport: Arc<dyn NotificationTransport>,
    queue: Arc<Mutex<VecDeque<NotificationEvent>>>,
    running: Arc<AtomicBool>,
    wake: Arc<(Mutex<bool>, Condvar)>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self {
            transport,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            running: Arc::new(AtomicBool::new(false)),
            wake: Arc::new((Mutex::new(false), Condvar::new())),
            handle: Mutex::new(None),
        }
    }

    /// Start the background scan loop against the database at `db_path`.
    /// A no-op if already running.
    pub fn start(&self, db_path: PathBuf) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let running = self.running.clone();
        let wake = self.wake.clone();
        let transport = self.transport.clone();
        let queue = self.queue.clone();

        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match Connection::open(&db_path) {
                    Ok(conn) => {
                        let now = chrono::Local::now().naive_local();
                        if let Err(err) = run_once(&conn, &transport, &queue, now) {
                            log::error!("notifier cycle failed: {}", err);
                        }
                    }
                    Err(err) => log::error!("notifier failed to open database: {}", err),
                }

                let (lock, cvar) = &*wake;
                let guard = lock.lock().unwrap();
                let _ = cvar.wait_timeout(guard, SCAN_INTERVAL);
            }
        });

        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Stop the background loop and wait for the current cycle to finish.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let (_, cvar) = &*self.wake;
        cvar.notify_all();
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    /// Run a single scan-and-drain cycle against an already-open connection.
    /// Used by the background loop and exposed for a "notify once" CLI path.
    pub fn run_once(&self, conn: &Connection, now: NaiveDateTime) -> EngineResult<Vec<NotificationEvent>> {
        run_once(conn, &self.transport, &self.queue, now)
    }

    /// Send an immediate system alert, bypassing the category-specific
    /// preference flags (only the global `enabled` switch applies).
    pub fn send_manual(
        &self,
        conn: &Connection,
        title: String,
        body: String,
        priority: Priority,
        now: NaiveDateTime,
    ) -> EngineResult<()> {
        let prefs = SettingsRepo::load_preferences(conn).map_err(EngineError::from_store)?;
        let event = NotificationEvent {
            notification_type: NotificationType::SystemAlert,
            title,
            body,
            priority,
            task_id: None,
            garden_id: None,
            delayed: false,
        };
        deliver(conn, self.transport.as_ref(), &event, now, prefs.enabled).map_err(EngineError::from_store)
    }
}

fn run_once(
    conn: &Connection,
    transport: &Arc<dyn NotificationTransport>,
    queue: &Mutex<VecDeque<NotificationEvent>>,
    now: NaiveDateTime,
) -> EngineResult<Vec<NotificationEvent>> {
    let prefs = SettingsRepo::load_preferences(conn).map_err(EngineError::from_store)?;

    let mut new_events = Vec::new();
    if prefs.reminders_enabled {
        new_events.extend(check_reminders(conn, &prefs, now).map_err(EngineError::from_store)?);
    }
    if prefs.overdue_enabled {
        new_events.extend(check_overdue(conn, &prefs, now).map_err(EngineError::from_store)?);
    }
    if prefs.growth_enabled {
        new_events.extend(check_growth_milestones(conn, &prefs, now).map_err(EngineError::from_store)?);
    }
    if prefs.resource_enabled {
        new_events.extend(check_resource_alerts(conn, &prefs, now).map_err(EngineError::from_store)?);
    }

    {
        let mut q = queue.lock().unwrap();
        q.extend(new_events);
    }

    drain(conn, transport.as_ref(), queue, &prefs, now)
}

/// Tasks due within `lead_time_minutes`, one reminder per task per day.
fn check_reminders(conn: &Connection, prefs: &UserPreferences, now: NaiveDateTime) -> anyhow::Result<Vec<NotificationEvent>> {
    let window = Duration::minutes(prefs.lead_time_minutes);
    let due_soon = TaskRepo::list_due_within(conn, now, window)?;

    let mut events = Vec::new();
    for task in due_soon {
        let id = task.id.expect("persisted task");
        if NotificationRepo::was_sent_recently(conn, NotificationType::TaskReminder, id, now, Duration::days(REMINDER_DEDUP_WINDOW_DAYS))? {
            continue;
        }
        let garden_name = GardenRepo::get_by_id(conn, task.garden_id)?.map(|g| g.name).unwrap_or_else(|| "unknown garden".into());
        events.push(NotificationEvent {
            notification_type: NotificationType::TaskReminder,
            title: format!("Task reminder: {}", garden_name),
            body: format!("{} is due at {}", task.title, task.due_on),
            priority: if task.priority == Priority::High { Priority::Medium } else { Priority::Low },
            task_id: Some(id),
            garden_id: Some(task.garden_id),
            delayed: prefs.is_quiet_hour(now.hour()),
        });
    }
    Ok(events)
}

/// Tasks past due, severity escalating with how overdue they are.
fn check_overdue(conn: &Connection, prefs: &UserPreferences, now: NaiveDateTime) -> anyhow::Result<Vec<NotificationEvent>> {
    let overdue = TaskRepo::list_overdue(conn, now)?;

    let mut events = Vec::new();
    for task in overdue {
        let id = task.id.expect("persisted task");
        if NotificationRepo::was_sent_recently(conn, NotificationType::TaskOverdue, id, now, Duration::hours(OVERDUE_DEDUP_WINDOW_HOURS))? {
            continue;
        }

        let hours_overdue = (now - task.due_on).num_minutes() as f64 / 60.0;
        let priority = if hours_overdue < 2.0 {
            Priority::Medium
        } else if hours_overdue < 12.0 {
            Priority::High
        } else {
            Priority::Critical
        };
        let hours_text = if hours_overdue >= 1.0 {
            format!("{} hour(s)", hours_overdue as i64)
        } else {
            format!("{} minute(s)", (hours_overdue * 60.0) as i64)
        };

        let garden_name = GardenRepo::get_by_id(conn, task.garden_id)?.map(|g| g.name).unwrap_or_else(|| "unknown garden".into());
        events.push(NotificationEvent {
            notification_type: NotificationType::TaskOverdue,
            title: format!("Overdue task: {}", garden_name),
            body: format!("{} is {} overdue", task.title, hours_text),
            priority,
            task_id: Some(id),
            garden_id: Some(task.garden_id),
            delayed: prefs.is_quiet_hour(now.hour()),
        });
    }
    Ok(events)
}

/// Advance gardens past their expected stage boundary, emitting a milestone
/// event for each transition. The stage update is persisted immediately,
/// independent of whether the notification is ever delivered.
fn check_growth_milestones(conn: &Connection, prefs: &UserPreferences, now: NaiveDateTime) -> anyhow::Result<Vec<NotificationEvent>> {
    let gardens = GardenRepo::list_active(conn)?;

    let mut events = Vec::new();
    for garden in gardens {
        let total_days = days_since(garden.planted_on, now);
        let expected = derive_stage(total_days);
        if expected == garden.current_stage {
            continue;
        }

        events.push(NotificationEvent {
            notification_type: NotificationType::GrowthMilestone,
            title: format!("Growth milestone: {}", garden.name),
            body: format!("Ready to transition from {} to {} stage", garden.current_stage.as_str(), expected.as_str()),
            priority: Priority::Medium,
            task_id: None,
            garden_id: garden.id,
            delayed: prefs.is_quiet_hour(now.hour()),
        });

        GardenRepo::set_stage(conn, garden.id.expect("persisted garden"), expected, now)?;
    }
    Ok(events)
}

/// Inventory items at or below their restock threshold.
fn check_resource_alerts(conn: &Connection, prefs: &UserPreferences, now: NaiveDateTime) -> anyhow::Result<Vec<NotificationEvent>> {
    let low = InventoryRepo::list_low_stock(conn)?;
    Ok(low
        .into_iter()
        .map(|item| NotificationEvent {
            notification_type: NotificationType::ResourceAlert,
            title: "Low inventory alert".into(),
            body: format!("{} is running low ({} remaining, threshold {})", item.name, item.current_quantity, item.minimum_threshold),
            priority: Priority::High,
            task_id: None,
            garden_id: None,
            delayed: prefs.is_quiet_hour(now.hour()),
        })
        .collect())
}

fn drain(
    conn: &Connection,
    transport: &dyn NotificationTransport,
    queue: &Mutex<VecDeque<NotificationEvent>>,
    prefs: &UserPreferences,
    now: NaiveDateTime,
) -> EngineResult<Vec<NotificationEvent>> {
    let mut q = queue.lock().unwrap();
    let to_process = q.len().min(MAX_DRAIN_PER_CYCLE);

    let mut sent = Vec::new();
    for _ in 0..to_process {
        let Some(event) = q.pop_front() else { break };

        if event.delayed && prefs.is_quiet_hour(now.hour()) {
            q.push_back(event);
            continue;
        }

        deliver(conn, transport, &event, now, prefs.enabled).map_err(EngineError::from_store)?;
        sent.push(event);
    }
    Ok(sent)
}

fn deliver(
    conn: &Connection,
    transport: &dyn NotificationTransport,
    event: &NotificationEvent,
    now: NaiveDateTime,
    enabled: bool,
) -> anyhow::Result<()> {
    if !enabled {
        return Ok(());
    }

    if let Err(err) = transport.send(event) {
        log::warn!("failed to deliver notification {:?}: {:#}", event.notification_type, err);
        return Ok(());
    }

    NotificationRepo::record(
        conn,
        &NotificationRecord {
            id: None,
            notification_type: event.notification_type,
            title: event.title.clone(),
            body: event.body.clone(),
            priority: event.priority,
            task_id: event.task_id,
            garden_id: event.garden_id,
            sent_at: now,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::models::{Garden, GrowingMethod, GrowthStage, Task, TaskType};
    use crate::repo::{GardenRepo, TaskRepo};
    use std::sync::Mutex as StdMutex;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    struct RecordingTransport {
        sent: StdMutex<Vec<String>>,
    }

    impl NotificationTransport for RecordingTransport {
        fn send(&self, event: &NotificationEvent) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(event.title.clone());
            Ok(())
        }
    }

    fn seed_garden(conn: &Connection, planted_days_ago: i64) -> Garden {
        let garden = Garden::new("Tent".into(), GrowingMethod::Hydroponic, "Basil".into(), now() - Duration::days(planted_days_ago));
        GardenRepo::create(conn, &garden).unwrap()
    }

    #[test]
    fn reminder_fires_once_then_dedups() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = seed_garden(&conn, 5);
        let task = Task::new(garden.id.unwrap(), "Check pH".into(), "d".into(), TaskType::Monitoring, Priority::High, now() + Duration::minutes(10), 5, true, now());
        TaskRepo::create(&conn, &task).unwrap();

        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport.clone());

        notifier.run_once(&conn, now()).unwrap();
        notifier.run_once(&conn, now() + Duration::minutes(1)).unwrap();

        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn overdue_escalates_with_elapsed_time() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = seed_garden(&conn, 5);
        let task = Task::new(garden.id.unwrap(), "Water".into(), "d".into(), TaskType::Watering, Priority::Medium, now() - Duration::hours(13), 5, true, now());
        TaskRepo::create(&conn, &task).unwrap();

        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport.clone());
        let sent = notifier.run_once(&conn, now()).unwrap();

        let overdue = sent.iter().find(|e| e.notification_type == NotificationType::TaskOverdue).unwrap();
        assert_eq!(overdue.priority, Priority::Critical);
    }

    #[test]
    fn growth_milestone_advances_stage_even_when_disabled() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let garden = seed_garden(&conn, 10); // past germination -> seedling

        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport.clone());
        notifier.run_once(&conn, now()).unwrap();

        let refetched = GardenRepo::get_by_id(&conn, garden.id.unwrap()).unwrap().unwrap();
        assert_eq!(refetched.current_stage, GrowthStage::Seedling);
    }

    #[test]
    fn disabled_globally_still_runs_checks_but_sends_nothing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let mut prefs = UserPreferences::default();
        prefs.enabled = false;
        SettingsRepo::save_preferences(&conn, &prefs).unwrap();

        let garden = seed_garden(&conn, 10);
        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport.clone());
        notifier.run_once(&conn, now()).unwrap();

        assert!(transport.sent.lock().unwrap().is_empty());
        let refetched = GardenRepo::get_by_id(&conn, garden.id.unwrap()).unwrap().unwrap();
        assert_eq!(refetched.current_stage, GrowthStage::Seedling);
    }

    #[test]
    fn send_manual_bypasses_category_flags() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport.clone());

        notifier.send_manual(&conn, "Heads up".into(), "manual message".into(), Priority::Low, now()).unwrap();
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn start_and_stop_round_trip_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cultivar.db");
        let conn = Connection::open(&db_path).unwrap();
        crate::db::MigrationManager::initialize(&conn).unwrap();
        drop(conn);

        let transport = Arc::new(RecordingTransport { sent: StdMutex::new(Vec::new()) });
        let notifier = Notifier::new(transport);
        notifier.start(db_path);
        notifier.stop();
    }
}
