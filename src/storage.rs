use crate::ingest::{ValidationError, validate_entry};
use crate::models::{AppData, DailyEntry};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {index} is invalid: {source}")]
    InvalidEntry {
        index: usize,
        source: ValidationError,
    },
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

/// Persists, logging instead of failing; the in-memory copy stays authoritative.
pub async fn persist_or_log(path: &Path, data: &AppData) {
    if let Err(err) = persist_data(path, data).await {
        error!(path = %path.display(), "failed to persist data: {err}");
    }
}

pub fn export_entries(entries: &[DailyEntry]) -> Result<Vec<u8>, StorageError> {
    Ok(serde_json::to_vec_pretty(entries)?)
}

/// Parses an exported document. Every entry must pass validation or the
/// whole import is rejected.
pub fn import_entries(document: &[u8]) -> Result<Vec<DailyEntry>, StorageError> {
    let entries: Vec<DailyEntry> = serde_json::from_slice(document)?;
    for (index, entry) in entries.iter().enumerate() {
        validate_entry(entry).map_err(|source| StorageError::InvalidEntry { index, source })?;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Friend, WeatherSnapshot};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn unique_path(tag: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("fitness_tracker_{tag}_{}_{}.json", std::process::id(), nanos));
        path
    }

    fn sample_entries() -> Vec<DailyEntry> {
        vec![
            DailyEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 2, 1, 7, 15, 30).unwrap(),
                steps: 1200,
                calories: 150,
                water: 3,
                sleep: 6.5,
                weight: 81.3,
                mood: 4,
                active_minutes: 12,
                activities: vec!["stretching".into()],
                weather: Some(WeatherSnapshot {
                    temperature: -2.0,
                    condition: "Snow".into(),
                    humidity: 70.0,
                }),
                stress: Some(51.0),
            },
            DailyEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 1, 30, 21, 0, 0).unwrap(),
                steps: 11000,
                calories: 600,
                water: 9,
                sleep: 8.0,
                weight: 81.0,
                mood: 9,
                active_minutes: 75,
                activities: Vec::new(),
                weather: None,
                stress: None,
            },
        ]
    }

    #[test]
    fn export_then_import_is_lossless() {
        let entries = sample_entries();
        let document = export_entries(&entries).unwrap();
        let imported = import_entries(&document).unwrap();
        assert_eq!(imported, entries);
        assert_eq!(imported[1].date(), NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
    }

    #[test]
    fn import_rejects_invalid_entries() {
        let mut entries = sample_entries();
        entries[1].mood = 12;
        let document = export_entries(&entries).unwrap();
        let err = import_entries(&document).unwrap_err();
        assert_eq!(err.to_string(), "entry 1 is invalid: mood must be between 0 and 10");
        assert!(matches!(
            import_entries(b"not json"),
            Err(StorageError::Json(_))
        ));
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let path = unique_path("roundtrip");
        let mut data = AppData::default();
        data.entries = sample_entries();
        data.rewards.insert("Free Movie Ticket".into());
        data.friends.push(Friend {
            name: "Sam".into(),
            added_on: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        });

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.entries, data.entries);
        assert_eq!(loaded.rewards, data.rewards);
        assert_eq!(loaded.friends, data.friends);
        assert_eq!(loaded.goals, data.goals);
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_loads_defaults() {
        let path = unique_path("missing");
        assert!(load_data(&path).await.entries.is_empty());

        std::fs::write(&path, b"{ broken").unwrap();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);
        assert!(loaded.entries.is_empty());
        assert!(loaded.profile.is_none());
    }
}
