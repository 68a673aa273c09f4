//! Weekly Timesheet Library
//!
//! This library turns the start and end times employees enter for each day of
//! the week into credited hours and days, and serves those timesheets over HTTP.

pub mod config;
pub mod helpers;
pub mod models;
pub mod service;
pub mod store;

pub use config::{Employee, TimesheetConfig};
pub use service::TimesheetService;
pub use store::WeekStore;

// Re-export key types for convenience
pub use helpers::hours::{
    WeekSummary, calculate_duration_hours, calculate_total_days, calculate_total_hours,
    summarize, time_to_minutes, validate_work_day,
};
pub use models::time::{CompleteTime, Hour, Minute, Period, Time};
pub use models::week::{Weekday, WorkDay, WorkWeek};
