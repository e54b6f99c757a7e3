use crate::errors::{AppError, ChecklistError};
use crate::export::{csv_filename, share_url, to_csv, to_share_text};
use crate::models::{
    CatalogResponse, FacilityRequest, MetadataPatch, Notice, PhotoQuery, PhotoUploadRequest,
    ReportResponse, ReportSnapshot, ShareResponse, TaskUpdateRequest,
};
use crate::photos::{decode_data_url, Photo};
use crate::state::AppState;
use crate::storage::{clear_report, load_report, persist_report, LoadOutcome};
use crate::store::ChecklistStore;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate, Utc};
use std::path::Path;
use tracing::{error, info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(render_index(store.catalog(), store.facility()))
}

pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let store = state.store.lock().await;
    let facilities = store
        .catalog()
        .facility_keys()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(CatalogResponse { facilities })
}

pub async fn get_report(State(state): State<AppState>) -> Json<ReportSnapshot> {
    let store = state.store.lock().await;
    Json(store.snapshot())
}

pub async fn select_facility(
    State(state): State<AppState>,
    Json(payload): Json<FacilityRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let mut store = state.store.lock().await;
    if !store.catalog().contains(&payload.facility) {
        return Err(ChecklistError::UnknownFacility(payload.facility).into());
    }

    store.select_facility(&payload.facility);
    let notice = commit(&state.data_path, &store).await;
    Ok(respond(&store, notice))
}

pub async fn update_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskUpdateRequest>,
) -> Json<ReportResponse> {
    let mut store = state.store.lock().await;
    let notice = if store.set_task_field(&payload.id, payload.change) {
        commit(&state.data_path, &store).await
    } else {
        None
    };
    respond(&store, notice)
}

pub async fn attach_photo(
    State(state): State<AppState>,
    Json(payload): Json<PhotoUploadRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let photo = Photo::from_upload(&payload.content_type, &payload.data)?;

    let mut store = state.store.lock().await;
    let stored = store.attach_photo(&payload.id, payload.phase, &photo);

    let notice = if stored {
        Some(
            commit(&state.data_path, &store)
                .await
                .unwrap_or_else(|| Notice::success("Photo ajoutée avec succès!")),
        )
    } else {
        None
    };
    Ok(respond(&store, notice))
}

pub async fn get_photo(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store.lock().await;
    let (content_type, bytes) = store
        .photo(&query.id, query.phase)
        .and_then(decode_data_url)
        .ok_or_else(|| AppError::not_found("no photo for this task"))?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

pub async fn update_metadata(
    State(state): State<AppState>,
    Json(patch): Json<MetadataPatch>,
) -> Json<ReportResponse> {
    let mut store = state.store.lock().await;
    store.update_metadata(patch);
    let notice = commit(&state.data_path, &store).await;
    respond(&store, notice)
}

pub async fn save(State(state): State<AppState>) -> Json<ReportResponse> {
    let store = state.store.lock().await;
    let notice = commit(&state.data_path, &store)
        .await
        .unwrap_or_else(|| Notice::success("Données sauvegardées localement!"));
    respond(&store, Some(notice))
}

pub async fn reload(State(state): State<AppState>) -> Json<ReportResponse> {
    let mut store = state.store.lock().await;
    let notice = restore_saved(&mut store, &state.data_path, today()).await;
    respond(&store, Some(notice))
}

pub async fn reset(State(state): State<AppState>) -> Json<ReportResponse> {
    let mut store = state.store.lock().await;
    store.reset(today());

    let notice = match clear_report(&state.data_path).await {
        Ok(()) => Notice::success("Toutes les données ont été réinitialisées."),
        Err(err) => {
            error!("failed to clear saved report: {err}");
            Notice::error("Erreur lors de la suppression de la sauvegarde")
        }
    };
    respond(&store, Some(notice))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store.lock().await;
    let body = to_csv(store.tasks())?;
    let disposition = format!("attachment; filename=\"{}\"", csv_filename(today()));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn share(State(state): State<AppState>) -> Json<ShareResponse> {
    let store = state.store.lock().await;
    let text = to_share_text(store.metadata(), store.facility(), &store.stats(), store.tasks());
    let url = share_url(&text);
    Json(ShareResponse { text, url })
}

/// Replaces the store's content with the saved record, if a usable one exists.
/// Missing, corrupt or unreadable records leave the store as it was.
pub async fn restore_saved(store: &mut ChecklistStore, path: &Path, today: NaiveDate) -> Notice {
    match load_report(path).await {
        Ok(LoadOutcome::Loaded(report)) => {
            store.restore(report, today);
            info!(facility = store.facility(), "saved report loaded");
            Notice::success("Données chargées avec succès!")
        }
        Ok(LoadOutcome::Absent) => Notice::info("Aucune sauvegarde trouvée"),
        Ok(LoadOutcome::Corrupt(err)) => {
            warn!("ignoring saved report: {err}");
            Notice::error("Sauvegarde illisible, elle a été ignorée")
        }
        Err(err) => {
            error!("failed to read saved report: {err}");
            Notice::error("Erreur lors du chargement des données")
        }
    }
}

// Persists the current store; a failure becomes a notice, never an error.
async fn commit(path: &Path, store: &ChecklistStore) -> Option<Notice> {
    match persist_report(path, &store.to_persisted(Utc::now())).await {
        Ok(()) => None,
        Err(err) => {
            error!("failed to save report: {err}");
            Some(Notice::error("Erreur lors de la sauvegarde"))
        }
    }
}

fn respond(store: &ChecklistStore, notice: Option<Notice>) -> Json<ReportResponse> {
    Json(ReportResponse {
        report: store.snapshot(),
        notice,
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{NoticeLevel, PhotoPhase, Planned, ReportMetadata, TaskChange, TaskStatus};
    use axum::http::StatusCode;
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn edited_store() -> ChecklistStore {
        let mut store = ChecklistStore::new(Catalog::builtin(), day());
        store.select_facility("HE03/107F");
        let id = store.tasks()[2].id.clone();
        store.set_task_field(&id, TaskChange::Planned(Planned::Yes));
        store.set_task_field(&id, TaskChange::Status(TaskStatus::Done));
        store.set_task_field(&id, TaskChange::Comment("fait à 9h".into()));
        store.update_metadata(MetadataPatch {
            responsible: Some("Hind".into()),
            ..MetadataPatch::default()
        });
        store
    }

    fn assert_same_state(store: &ChecklistStore, before: &ReportSnapshot) {
        assert_eq!(store.facility(), before.facility);
        assert_eq!(store.metadata(), &before.metadata);
        assert_eq!(store.tasks(), before.tasks.as_slice());
        assert_eq!(store.stats(), before.stats);
    }

    #[tokio::test]
    async fn corrupt_record_keeps_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{\"checklistData\": {").await.unwrap();

        let mut store = edited_store();
        let before = store.snapshot();
        let notice = restore_saved(&mut store, &path, day()).await;

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_same_state(&store, &before);
    }

    #[tokio::test]
    async fn unreadable_record_keeps_current_state() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = edited_store();
        let before = store.snapshot();
        // a directory cannot be read as a file
        let notice = restore_saved(&mut store, dir.path(), day()).await;

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_same_state(&store, &before);
    }

    #[tokio::test]
    async fn missing_record_at_startup_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ChecklistStore::new(Catalog::builtin(), day());
        let notice = restore_saved(&mut store, &dir.path().join("none.json"), day()).await;

        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(store.facility(), "HE06 JFC4/107D");
        assert_eq!(store.metadata(), &ReportMetadata::new(day()));
        assert!(!store.tasks().is_empty());
        assert!(store.tasks().iter().all(|task| task.planned == Planned::No && task.status.is_none()));
    }

    #[tokio::test]
    async fn saved_record_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let edited = edited_store();
        persist_report(&path, &edited.to_persisted(Utc::now())).await.unwrap();

        let mut store = ChecklistStore::new(Catalog::builtin(), day());
        let notice = restore_saved(&mut store, &path, day()).await;

        assert_eq!(notice.level, NoticeLevel::Success);
        assert_same_state(&store, &edited.snapshot());
    }

    #[tokio::test]
    async fn invalid_upload_is_rejected_while_store_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChecklistStore::new(Catalog::builtin(), day());
        let id = store.tasks()[0].id.clone();
        let state = AppState::new(dir.path().join("state.json"), store);

        let _held = state.store.lock().await;
        let request = PhotoUploadRequest {
            id,
            phase: PhotoPhase::Before,
            content_type: "text/plain".into(),
            data: "aGVsbG8=".into(),
        };
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            attach_photo(State(state.clone()), Json(request)),
        )
        .await
        .expect("upload validation must not wait for the store");

        let Err(err) = result else {
            panic!("non-image upload was accepted");
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
