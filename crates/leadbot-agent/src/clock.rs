// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock access and the office-hours window.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike, Weekday};
use leadbot_config::model::OfficeHoursConfig;

/// Source of the local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The host's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Whether a local time falls inside the configured opening window.
#[derive(Debug, Clone)]
pub struct OfficeHours {
    enabled: bool,
    open_hour: u32,
    close_hour: u32,
    weekdays_only: bool,
}

impl From<&OfficeHoursConfig> for OfficeHours {
    fn from(config: &OfficeHoursConfig) -> Self {
        Self {
            enabled: config.enabled,
            open_hour: config.open_hour,
            close_hour: config.close_hour,
            weekdays_only: config.weekdays_only,
        }
    }
}

impl OfficeHours {
    /// Always open when disabled.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        if !self.enabled {
            return true;
        }
        if self.weekdays_only && matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        (self.open_hour..self.close_hour).contains(&now.hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn enabled() -> OfficeHours {
        OfficeHours::from(&OfficeHoursConfig {
            enabled: true,
            ..OfficeHoursConfig::default()
        })
    }

    #[test]
    fn disabled_window_is_always_open() {
        let hours = OfficeHours::from(&OfficeHoursConfig::default());
        assert!(hours.is_open(at("2025-06-01 03:00")));
    }

    #[test]
    fn weekday_window_boundaries() {
        let hours = enabled();
        // 2025-06-02 is a Monday.
        assert!(!hours.is_open(at("2025-06-02 05:59")));
        assert!(hours.is_open(at("2025-06-02 06:00")));
        assert!(hours.is_open(at("2025-06-02 20:59")));
        assert!(!hours.is_open(at("2025-06-02 21:00")));
    }

    #[test]
    fn weekends_are_closed() {
        let hours = enabled();
        assert!(!hours.is_open(at("2025-06-01 12:00")));
        assert!(!hours.is_open(at("2025-05-31 12:00")));
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }
}
