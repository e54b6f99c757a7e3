use crate::errors::ChecklistError;
use crate::models::PersistedReport;
use std::{env, io::ErrorKind, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Result of reading the durable record.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(PersistedReport),
    Absent,
    Corrupt(ChecklistError),
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/checklist.json")
}

/// A missing file is `Absent`, unparsable content is `Corrupt`. Only real
/// I/O failures are errors.
pub async fn load_report(path: &Path) -> Result<LoadOutcome, ChecklistError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Absent),
        Err(err) => return Err(err.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(report) => Ok(LoadOutcome::Loaded(report)),
        Err(err) => {
            warn!(path = %path.display(), "failed to parse saved report: {err}");
            Ok(LoadOutcome::Corrupt(err.into()))
        }
    }
}

/// Replaces the whole record: the new content is written next to the target
/// and renamed over it.
pub async fn persist_report(path: &Path, report: &PersistedReport) -> Result<(), ChecklistError> {
    let payload = serde_json::to_vec_pretty(report)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, payload).await?;
    fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), "report saved");
    Ok(())
}

pub async fn clear_report(path: &Path) -> Result<(), ChecklistError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormData, Planned, Presence, TaskRecord};
    use chrono::{NaiveDate, Utc};

    fn sample_report() -> PersistedReport {
        let mut report = PersistedReport {
            form_data: FormData {
                date: NaiveDate::from_ymd_opt(2026, 5, 2),
                responsible: "Karim".into(),
                staff_count: Some(3),
                start_time: "07:00".into(),
                end_time: String::new(),
                facility: Some("HE03/107F".into()),
            },
            checklist_data: vec![TaskRecord {
                id: "HE03/107F|Hall de stockage|1".into(),
                facility: "HE03/107F".into(),
                zone_group: "Hall de stockage".into(),
                location: "Extra Hall".into(),
                planned: Planned::Yes,
                status: None,
                photo_before: Presence::Present,
                photo_after: Presence::Absent,
                comment: "avec \"guillemets\"".into(),
            }],
            last_saved: Some(Utc::now()),
            ..PersistedReport::default()
        };
        report.photo_data.insert(
            "HE03/107F|Hall de stockage|1-before".into(),
            "data:image/png;base64,iVBORw0KGgo=".into(),
        );
        report
    }

    #[tokio::test]
    async fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_report(&dir.path().join("none.json")).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Absent));
    }

    #[tokio::test]
    async fn malformed_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{\"formData\": [").await.unwrap();

        let outcome = load_report(&path).await.unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Corrupt(ChecklistError::CorruptPersistedData(_))
        ));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let report = sample_report();

        persist_report(&path, &report).await.unwrap();
        assert!(!tmp_path(&path).exists());

        let LoadOutcome::Loaded(loaded) = load_report(&path).await.unwrap() else {
            panic!("expected a saved report");
        };
        assert_eq!(loaded.form_data, report.form_data);
        assert_eq!(loaded.checklist_data, report.checklist_data);
        assert_eq!(loaded.photo_data, report.photo_data);
    }

    #[tokio::test]
    async fn record_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        persist_report(&path, &sample_report()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(raw["formData"]["staffCount"], 3);
        assert_eq!(raw["formData"]["date"], "2026-05-02");
        assert_eq!(raw["checklistData"][0]["zoneGroup"], "Hall de stockage");
        assert!(raw["photoData"]["HE03/107F|Hall de stockage|1-before"].is_string());
        assert!(raw["lastSaved"].is_string());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        persist_report(&path, &sample_report()).await.unwrap();

        clear_report(&path).await.unwrap();
        clear_report(&path).await.unwrap();
        assert!(matches!(load_report(&path).await.unwrap(), LoadOutcome::Absent));
    }

    #[tokio::test]
    async fn unwritable_location_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("state.json");
        let err = persist_report(&path, &sample_report()).await.unwrap_err();
        assert!(matches!(err, ChecklistError::StorageUnavailable(_)));
    }
}
