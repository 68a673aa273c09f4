//! Turns a week of entered shift times into credited hours and days.
//!
//! Nothing in here fails: partially entered times and inverted shifts simply
//! contribute no hours. Use [`validate_work_day`] to flag the latter to the user.

use serde::{Deserialize, Serialize};

use crate::models::time::{CompleteTime, Minute, Period};
use crate::models::week::{DayMap, WorkDay, WorkWeek};

/// Working hours that make up one credited day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Fractional days at or above this are rounded up to a whole day.
pub const ROUND_UP_FRACTION: f64 = 0.85;

/// Shifts credited with a fixed number of hours instead of their clock span.
///
/// The 7 AM to 10 PM shift is worth two full days. The rule comes from payroll
/// as-is; it is not derived from the overtime policy.
pub const DURATION_OVERRIDES: &[(CompleteTime, CompleteTime, f64)] = &[(
    CompleteTime::at(7, Minute::Zero, Period::Am),
    CompleteTime::at(10, Minute::Zero, Period::Pm),
    16.0,
)];

/// Minutes since midnight, `0..=1439`.
pub fn time_to_minutes(time: CompleteTime) -> u32 {
    let hour = u32::from(time.hour.get());
    let hour = match (hour, time.period) {
        (12, Period::Am) => 0,
        (12, Period::Pm) => 12,
        (h, Period::Pm) => h + 12,
        (h, Period::Am) => h,
    };
    hour * 60 + u32::from(time.minute.get())
}

fn complete_bounds(day: &WorkDay) -> Option<(CompleteTime, CompleteTime)> {
    let start = day.start?.complete()?;
    let end = day.end?.complete()?;
    Some((start, end))
}

pub fn calculate_duration_hours(day: &WorkDay) -> f64 {
    let Some((start, end)) = complete_bounds(day) else {
        return 0.0;
    };

    let start_minutes = time_to_minutes(start);
    let end_minutes = time_to_minutes(end);
    if end_minutes <= start_minutes {
        return 0.0;
    }

    if let Some((_, _, hours)) = DURATION_OVERRIDES
        .iter()
        .find(|(from, to, _)| *from == start && *to == end)
    {
        return *hours;
    }

    f64::from(end_minutes - start_minutes) / 60.0
}

/// A day is invalid only when both ends are entered and the end is not after the start.
pub fn validate_work_day(day: &WorkDay) -> bool {
    match complete_bounds(day) {
        Some((start, end)) => time_to_minutes(end) > time_to_minutes(start),
        None => true,
    }
}

pub fn calculate_total_hours(week: &WorkWeek) -> f64 {
    week.iter()
        .map(|(weekday, day)| {
            let worked = calculate_duration_hours(day);
            if worked <= 0.0 {
                return 0.0;
            }
            match weekday.policy().overtime {
                Some(overtime) => overtime.credited_hours(worked),
                None => worked,
            }
        })
        .sum()
}

/// Converts credited hours into days, rounding to a tenth unless the week is
/// within 0.15 of the next whole day.
pub fn hours_to_days(total_hours: f64) -> f64 {
    let days = total_hours / HOURS_PER_DAY;
    if days <= 0.0 {
        return 0.0;
    }
    if days.fract() >= ROUND_UP_FRACTION {
        return days.ceil();
    }
    (days * 10.0).round() / 10.0
}

pub fn calculate_total_days(week: &WorkWeek) -> f64 {
    hours_to_days(calculate_total_hours(week))
}

/// Everything the timesheet view shows below the table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub total_hours: f64,
    pub total_days: f64,
    pub per_day_valid: DayMap<bool>,
}

impl WeekSummary {
    pub fn has_errors(&self) -> bool {
        self.per_day_valid.values().any(|valid| !valid)
    }
}

pub fn summarize(week: &WorkWeek) -> WeekSummary {
    let total_hours = calculate_total_hours(week);
    WeekSummary {
        total_hours,
        total_days: hours_to_days(total_hours),
        per_day_valid: DayMap::from_fn(|day| validate_work_day(week.day(day))),
    }
}
