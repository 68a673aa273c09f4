use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Local time for deciding which week "today" falls in.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

/// An employee allowed to keep a timesheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub username: String,
    pub display_name: String,
}

/// Configuration for the timesheet service
#[derive(Debug, Clone)]
pub struct TimesheetConfig {
    pub bind: SocketAddr,
    /// JSON snapshot of every stored week. In-memory only when unset.
    pub data_file: Option<PathBuf>,
    pub employees: Vec<Employee>,
    pub utc_offset: FixedOffset,
}

impl TimesheetConfig {
    /// Load configuration from the environment, honoring a `.env` file if present
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let bind = env::var("TIMESHEET_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .context("Invalid TIMESHEET_BIND address")?;

        let data_file = env::var("TIMESHEET_DATA_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let employees = match env::var("TIMESHEET_EMPLOYEES") {
            Ok(raw) => parse_employees(&raw)?,
            Err(_) => Vec::new(),
        };

        let offset_hours = match env::var("TIMESHEET_UTC_OFFSET_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .context("Invalid TIMESHEET_UTC_OFFSET_HOURS")?,
            Err(_) => DEFAULT_UTC_OFFSET_HOURS,
        };
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .with_context(|| format!("UTC offset {} hours is out of range", offset_hours))?;

        info!(
            "Loaded configuration: bind={}, employees={}, data_file={:?}",
            bind,
            employees.len(),
            data_file
        );

        Ok(TimesheetConfig {
            bind,
            data_file,
            employees,
            utc_offset,
        })
    }

    pub fn employee(&self, username: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.username == username)
    }
}

impl Default for TimesheetConfig {
    fn default() -> Self {
        TimesheetConfig {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_file: None,
            employees: Vec::new(),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Parses `user:Display Name` pairs separated by commas.
pub fn parse_employees(raw: &str) -> Result<Vec<Employee>> {
    let mut employees: Vec<Employee> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, display_name) = match entry.split_once(':') {
            Some((user, name)) => (user.trim(), name.trim()),
            None => (entry, entry),
        };
        if username.is_empty() {
            bail!("Employee entry '{}' has no username", entry);
        }
        if employees.iter().any(|e| e.username == username) {
            bail!("Employee '{}' is listed twice", username);
        }
        employees.push(Employee {
            username: username.to_string(),
            display_name: display_name.to_string(),
        });
    }

    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roster_with_display_names() {
        let employees = parse_employees("ahmad:أحمد, sara:سارة ,omar").unwrap();
        assert_eq!(employees.len(), 3);
        assert_eq!(employees[0].username, "ahmad");
        assert_eq!(employees[0].display_name, "أحمد");
        assert_eq!(employees[1].display_name, "سارة");
        assert_eq!(employees[2].display_name, "omar");
    }

    #[test]
    fn rejects_duplicate_and_blank_usernames() {
        assert!(parse_employees("ahmad:A,ahmad:B").is_err());
        assert!(parse_employees(":Nobody").is_err());
        assert!(parse_employees("").unwrap().is_empty());
    }

    #[test]
    fn default_config_uses_office_offset() {
        let config = TimesheetConfig::default();
        assert_eq!(config.utc_offset.local_minus_utc(), 3 * 3600);
        assert!(config.employee("anyone").is_none());
    }
}
