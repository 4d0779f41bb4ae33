use crate::models::{NotificationEvent, Priority};

/// Delivery backend for a [`NotificationEvent`]. The notification history row
/// is always written by the Notifier regardless of transport outcome; a
/// transport failure is logged and otherwise swallowed, matching the
/// best-effort delivery semantics of a desktop notifier (there is no one to
/// retry the toast for).
pub trait NotificationTransport: Send + Sync {
    fn send(&self, event: &NotificationEvent) -> anyhow::Result<()>;
}

/// Default transport: logs at a level derived from priority. Desktop toast
/// backends are platform-specific and out of scope here; this is the
/// fallback every platform gets.
pub struct LoggingTransport;

impl NotificationTransport for LoggingTransport {
    fn send(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        let level = match event.priority {
            Priority::Low => log::Level::Info,
            Priority::Medium => log::Level::Info,
            Priority::High => log::Level::Warn,
            Priority::Critical => log::Level::Error,
        };
        log::log!(level, "[{}] {}: {}", event.notification_type.as_str(), event.title, event.body);
        Ok(())
    }
}
