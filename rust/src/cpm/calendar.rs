//! Projection of day offsets onto calendar dates.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::{CalendarWindow, Schedule, TimeRecord};

/// `plan_start` shifted by `offset` days, clamped to chrono's date range.
fn offset_date(plan_start: NaiveDate, offset: i64) -> NaiveDate {
    let shifted = Duration::try_days(offset).and_then(|d| plan_start.checked_add_signed(d));
    match shifted {
        Some(date) => date,
        None if offset < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

impl CalendarWindow {
    pub fn from_record(record: &TimeRecord, plan_start: NaiveDate) -> Self {
        Self {
            earliest_start: offset_date(plan_start, record.earliest_start),
            earliest_finish: offset_date(plan_start, record.earliest_finish),
            latest_start: offset_date(plan_start, record.latest_start),
            latest_finish: offset_date(plan_start, record.latest_finish),
        }
    }
}

impl Schedule {
    /// Every task's window as calendar dates, with day 0 at `plan_start`.
    pub fn calendar(&self, plan_start: NaiveDate) -> HashMap<String, CalendarWindow> {
        self.records
            .iter()
            .map(|(id, record)| (id.clone(), CalendarWindow::from_record(record, plan_start)))
            .collect()
    }

    /// Calendar date on which the whole plan completes.
    pub fn finish_date(&self, plan_start: NaiveDate) -> NaiveDate {
        offset_date(plan_start, self.horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_record() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        let record = TimeRecord {
            earliest_start: 3,
            earliest_finish: 5,
            latest_start: 5,
            latest_finish: 7,
            slack: 2,
            is_critical: false,
        };

        let window = CalendarWindow::from_record(&record, start);
        assert_eq!(window.earliest_start, NaiveDate::from_ymd_opt(2025, 2, 2).unwrap());
        assert_eq!(window.earliest_finish, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap());
        assert_eq!(window.latest_start, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap());
        assert_eq!(window.latest_finish, NaiveDate::from_ymd_opt(2025, 2, 6).unwrap());
    }

    #[test]
    fn test_schedule_calendar_and_finish_date() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut schedule = Schedule {
            horizon: 4,
            ..Schedule::default()
        };
        schedule.records.insert(
            "a".to_string(),
            TimeRecord {
                earliest_finish: 4,
                latest_finish: 4,
                is_critical: true,
                ..TimeRecord::default()
            },
        );

        let calendar = schedule.calendar(start);
        assert_eq!(calendar["a"].earliest_start, start);
        assert_eq!(calendar["a"].latest_finish, NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(schedule.finish_date(start), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    #[test]
    fn test_offset_clamps_out_of_range() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(offset_date(start, i64::MAX), NaiveDate::MAX);
        assert_eq!(offset_date(start, i64::MIN), NaiveDate::MIN);
    }
}
