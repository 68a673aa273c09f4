use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    config::{Employee, TimesheetConfig},
    helpers::{
        hours::{WeekSummary, summarize},
        week_id::current_week_id,
    },
    models::week::WorkWeek,
    store::WeekStore,
};

/// An employee's timesheet for the current week along with its totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeWeek {
    pub week_id: String,
    pub work_week: WorkWeek,
    pub summary: WeekSummary,
}

/// One row of the admin overview. Employees who have not entered anything
/// this week have no week and no summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeOverview {
    pub username: String,
    pub display_name: String,
    pub work_week: Option<WorkWeek>,
    pub summary: Option<WeekSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub week_id: String,
    pub employees: Vec<EmployeeOverview>,
}

/// The timesheet service: computes weekly totals and keeps each employee's
/// current week.
pub struct TimesheetService {
    pub store: WeekStore,
    pub config: TimesheetConfig,
}

impl TimesheetService {
    /// Create a new timesheet service instance
    pub fn new(store: WeekStore, config: TimesheetConfig) -> Self {
        info!("Creating new TimesheetService instance");
        Self { store, config }
    }

    /// Create an Axum router for the timesheet service
    pub fn router(self) -> Router {
        info!("Creating timesheet service router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/timesheet/default-week", get(default_week))
            .route("/timesheet/summary", post(week_summary))
            .route("/weeks/{username}", get(load_week).put(save_week))
            .route("/admin/weeks", get(admin_overview).delete(clear_week))
            .with_state(shared_state)
    }

    pub fn current_week_id(&self) -> String {
        current_week_id(self.config.utc_offset)
    }

    fn employee(&self, username: &str) -> Result<&Employee, ApiError> {
        self.config.employee(username).ok_or_else(|| {
            warn!("Unknown employee requested: {}", username);
            ApiError::UnknownEmployee(username.to_string())
        })
    }

    pub async fn employee_week(&self, username: &str) -> EmployeeWeek {
        let week_id = self.current_week_id();
        let work_week = self
            .store
            .load(&week_id, username)
            .await
            .unwrap_or_default();
        let summary = summarize(&work_week);
        EmployeeWeek {
            week_id,
            work_week,
            summary,
        }
    }

    pub async fn overview(&self) -> AdminOverview {
        let week_id = self.current_week_id();
        let mut entries = self.store.load_all(&week_id).await;

        let employees = self
            .config
            .employees
            .iter()
            .map(|employee| {
                let work_week = entries.remove(&employee.username);
                EmployeeOverview {
                    username: employee.username.clone(),
                    display_name: employee.display_name.clone(),
                    summary: work_week.as_ref().map(summarize),
                    work_week,
                }
            })
            .collect();

        if !entries.is_empty() {
            warn!(
                "Week {} has {} timesheet(s) from users not on the roster",
                week_id,
                entries.len()
            );
        }

        AdminOverview { week_id, employees }
    }
}

/// Failures a handler reports back to the caller.
#[derive(Debug)]
pub enum ApiError {
    UnknownEmployee(String),
    Storage(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::UnknownEmployee(username) => (
                StatusCode::NOT_FOUND,
                format!("Unknown employee: {}", username),
            )
                .into_response(),
            ApiError::Storage(e) => {
                error!("Storage error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error storing timesheet: {}", e),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Storage(e)
    }
}

// Route handlers
async fn default_week() -> Json<WorkWeek> {
    Json(WorkWeek::default())
}

async fn week_summary(Json(week): Json<WorkWeek>) -> Json<WeekSummary> {
    Json(summarize(&week))
}

async fn load_week(
    State(service): State<Arc<TimesheetService>>,
    Path(username): Path<String>,
) -> Result<Json<EmployeeWeek>, ApiError> {
    service.employee(&username)?;
    Ok(Json(service.employee_week(&username).await))
}

/// Saves the week unless a day ends before it starts, in which case the
/// summary comes back with 422 so the view can highlight the bad days.
async fn save_week(
    State(service): State<Arc<TimesheetService>>,
    Path(username): Path<String>,
    Json(week): Json<WorkWeek>,
) -> Result<(StatusCode, Json<WeekSummary>), ApiError> {
    service.employee(&username)?;

    let summary = summarize(&week);
    if summary.has_errors() {
        info!("Not saving week for {}: some days end before they start", username);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(summary)));
    }

    let week_id = service.current_week_id();
    service.store.save(&week_id, &username, week).await?;
    info!(
        "Saved week {} for {}: {} hours, {} days",
        week_id, username, summary.total_hours, summary.total_days
    );
    Ok((StatusCode::OK, Json(summary)))
}

async fn admin_overview(State(service): State<Arc<TimesheetService>>) -> Json<AdminOverview> {
    Json(service.overview().await)
}

async fn clear_week(State(service): State<Arc<TimesheetService>>) -> Result<StatusCode, ApiError> {
    let week_id = service.current_week_id();
    info!("Clearing all timesheets for week {}", week_id);
    service.store.clear_week(&week_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
