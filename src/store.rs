use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::models::week::WorkWeek;

/// Every employee's timesheet for one week, keyed by username.
pub type WeekEntries = BTreeMap<String, WorkWeek>;

/// Weeks keyed by week id.
type Snapshot = BTreeMap<String, WeekEntries>;

/// Stores each employee's week as a whole value.
///
/// With a snapshot path, the full store is rewritten to that JSON file after
/// every change and read back by [`WeekStore::open`].
pub struct WeekStore {
    weeks: RwLock<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl WeekStore {
    pub fn in_memory() -> Self {
        WeekStore {
            weeks: RwLock::new(Snapshot::new()),
            snapshot_path: None,
        }
    }

    pub async fn open(path: PathBuf) -> Result<Self> {
        let weeks = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)
                .with_context(|| format!("Failed to parse snapshot {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                Snapshot::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        info!(
            "Opened week store at {} with {} week(s)",
            path.display(),
            weeks.len()
        );

        Ok(WeekStore {
            weeks: RwLock::new(weeks),
            snapshot_path: Some(path),
        })
    }

    pub async fn load(&self, week_id: &str, username: &str) -> Option<WorkWeek> {
        let weeks = self.weeks.read().await;
        weeks.get(week_id)?.get(username).copied()
    }

    pub async fn load_all(&self, week_id: &str) -> WeekEntries {
        let weeks = self.weeks.read().await;
        weeks.get(week_id).cloned().unwrap_or_default()
    }

    pub async fn save(&self, week_id: &str, username: &str, week: WorkWeek) -> Result<()> {
        let mut weeks = self.weeks.write().await;
        let mut updated = weeks.clone();
        updated
            .entry(week_id.to_string())
            .or_default()
            .insert(username.to_string(), week);
        self.persist(&updated).await?;
        *weeks = updated;
        info!("Saved week {} for {}", week_id, username);
        Ok(())
    }

    /// Drops every employee's entries for the week. Other weeks are untouched.
    pub async fn clear_week(&self, week_id: &str) -> Result<()> {
        let mut weeks = self.weeks.write().await;
        let mut updated = weeks.clone();
        let removed = updated.remove(week_id).map_or(0, |entries| entries.len());
        self.persist(&updated).await?;
        *weeks = updated;
        info!("Cleared week {} ({} timesheet(s))", week_id, removed);
        Ok(())
    }

    /// Writes the snapshot next to the target and renames it into place. The
    /// in-memory map is only replaced once this succeeds.
    async fn persist(&self, weeks: &Snapshot) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(weeks).context("Failed to encode snapshot")?;
        let tmp = temp_path(path);
        if let Err(e) = fs::write(&tmp, bytes).await {
            error!("Failed to write snapshot {}: {}", tmp.display(), e);
            return Err(e).with_context(|| format!("Failed to write {}", tmp.display()));
        }
        if let Err(e) = fs::rename(&tmp, path).await {
            error!("Failed to replace snapshot {}: {}", path.display(), e);
            return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
        }
        Ok(())
    }
}

/// `weeks.json` -> `weeks.json.tmp`, never the snapshot path itself.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::{CompleteTime, Minute, Period};
    use crate::models::week::{Weekday, WorkDay};

    fn sample_week() -> WorkWeek {
        let mut week = WorkWeek::default();
        week.set_day(
            Weekday::Monday,
            WorkDay::new(
                CompleteTime::at(9, Minute::Zero, Period::Am),
                CompleteTime::at(5, Minute::Zero, Period::Pm),
            ),
        );
        week
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = WeekStore::in_memory();
        assert!(store.load("2025-3-8", "ahmad").await.is_none());

        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();
        assert_eq!(store.load("2025-3-8", "ahmad").await, Some(sample_week()));
        assert!(store.load("2025-3-15", "ahmad").await.is_none());
        assert!(store.load("2025-3-8", "sara").await.is_none());
    }

    #[tokio::test]
    async fn save_replaces_the_whole_week() {
        let store = WeekStore::in_memory();
        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();
        store.save("2025-3-8", "ahmad", WorkWeek::empty()).await.unwrap();
        assert_eq!(store.load("2025-3-8", "ahmad").await, Some(WorkWeek::empty()));
    }

    #[tokio::test]
    async fn clear_week_only_touches_that_week() {
        let store = WeekStore::in_memory();
        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();
        store.save("2025-3-8", "sara", sample_week()).await.unwrap();
        store.save("2025-3-1", "ahmad", sample_week()).await.unwrap();
        assert_eq!(store.load_all("2025-3-8").await.len(), 2);

        store.clear_week("2025-3-8").await.unwrap();
        assert!(store.load_all("2025-3-8").await.is_empty());
        assert_eq!(store.load_all("2025-3-1").await.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weeks.json");

        let store = WeekStore::open(path.clone()).await.unwrap();
        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();
        drop(store);

        let reopened = WeekStore::open(path).await.unwrap();
        assert_eq!(reopened.load("2025-3-8", "ahmad").await, Some(sample_week()));
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weeks.json");
        std::fs::write(&path, b"not json").unwrap();

        assert!(WeekStore::open(path).await.is_err());
    }

    #[tokio::test]
    async fn failed_save_keeps_the_previous_week() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weeks.json");
        let store = WeekStore::open(path.clone()).await.unwrap();
        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();

        // A directory where the temp file goes makes the write fail.
        std::fs::create_dir(dir.path().join("weeks.json.tmp")).unwrap();

        let result = store.save("2025-3-8", "ahmad", WorkWeek::empty()).await;
        assert!(result.is_err());
        assert_eq!(store.load("2025-3-8", "ahmad").await, Some(sample_week()));
        assert!(store.load("2025-3-8", "sara").await.is_none());

        let result = store.save("2025-3-8", "sara", sample_week()).await;
        assert!(result.is_err());
        assert!(store.load("2025-3-8", "sara").await.is_none());

        drop(store);
        let reopened = WeekStore::open(path).await.unwrap();
        assert_eq!(reopened.load("2025-3-8", "ahmad").await, Some(sample_week()));
    }

    #[tokio::test]
    async fn failed_clear_keeps_the_week() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weeks.json");
        let store = WeekStore::open(path).await.unwrap();
        store.save("2025-3-8", "ahmad", sample_week()).await.unwrap();

        std::fs::create_dir(dir.path().join("weeks.json.tmp")).unwrap();

        assert!(store.clear_week("2025-3-8").await.is_err());
        assert_eq!(store.load_all("2025-3-8").await.len(), 1);
    }

    #[test]
    fn temp_file_never_shadows_the_snapshot() {
        assert_eq!(
            temp_path(Path::new("/data/weeks.json")),
            PathBuf::from("/data/weeks.json.tmp")
        );
        assert_eq!(
            temp_path(Path::new("/data/weeks.tmp")),
            PathBuf::from("/data/weeks.tmp.tmp")
        );
    }
}
