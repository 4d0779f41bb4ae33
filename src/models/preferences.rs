/// User notification preferences (§3), read-only to the core. Persisted as
/// `notification_*`-prefixed rows in the generic `user_settings` key/value
/// relation (§6.1) and re-read on every Notifier cycle — no caching.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub enabled: bool,
    pub reminders_enabled: bool,
    pub overdue_enabled: bool,
    pub growth_enabled: bool,
    pub resource_enabled: bool,
    pub system_enabled: bool,
    pub sound_enabled: bool,
    pub lead_time_minutes: i64,
    /// Hour-of-day, 0-23. May wrap midnight if `> quiet_hours_end`.
    pub quiet_hours_start: u32,
    pub quiet_hours_end: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            reminders_enabled: true,
            overdue_enabled: true,
            growth_enabled: true,
            resource_enabled: true,
            system_enabled: true,
            sound_enabled: true,
            lead_time_minutes: 30,
            quiet_hours_start: 22,
            quiet_hours_end: 7,
        }
    }
}

impl UserPreferences {
    /// A wrapping `[start, end)` interval on hour-of-day (§4.4).
    pub fn is_quiet_hour(&self, hour: u32) -> bool {
        if self.quiet_hours_start > self.quiet_hours_end {
            hour >= self.quiet_hours_start || hour < self.quiet_hours_end
        } else {
            hour >= self.quiet_hours_start && hour < self.quiet_hours_end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_hours_wrap_midnight() {
        let prefs = UserPreferences { quiet_hours_start: 22, quiet_hours_end: 7, ..Default::default() };
        assert!(prefs.is_quiet_hour(22));
        assert!(prefs.is_quiet_hour(6));
        assert!(!prefs.is_quiet_hour(7));
        assert!(!prefs.is_quiet_hour(21));
    }

    #[test]
    fn quiet_hours_same_day() {
        let prefs = UserPreferences { quiet_hours_start: 1, quiet_hours_end: 5, ..Default::default() };
        assert!(prefs.is_quiet_hour(1));
        assert!(prefs.is_quiet_hour(4));
        assert!(!prefs.is_quiet_hour(5));
        assert!(!prefs.is_quiet_hour(0));
    }
}
