use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weekly_timesheet::{TimesheetConfig, TimesheetService, WeekStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting weekly timesheet service");

    let config = TimesheetConfig::from_env()?;

    let store = match &config.data_file {
        Some(path) => WeekStore::open(path.clone()).await?,
        None => {
            info!("TIMESHEET_DATA_FILE not set, timesheets are kept in memory only");
            WeekStore::in_memory()
        }
    };

    let bind = config.bind;
    let app = TimesheetService::new(store, config).router();

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Server running on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
