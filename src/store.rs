use crate::catalog::Catalog;
use crate::flatten::flatten;
use crate::models::{
    FormData, MetadataPatch, PersistedReport, PhotoPhase, Presence, ReportMetadata,
    ReportSnapshot, TaskChange, TaskRecord,
};
use crate::photos::{Photo, PhotoStore};
use crate::stats::{compute_stats, Stats};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

/// Single source of truth for the report being filled in.
///
/// Every mutation goes through the methods below. They report whether
/// anything changed; persisting the result is the caller's job.
#[derive(Debug, Clone)]
pub struct ChecklistStore {
    catalog: Catalog,
    facility: String,
    tasks: Vec<TaskRecord>,
    photos: PhotoStore,
    metadata: ReportMetadata,
    stats: Stats,
}

impl ChecklistStore {
    pub fn new(catalog: Catalog, today: NaiveDate) -> Self {
        let facility = catalog.default_facility().unwrap_or_default().to_string();
        let photos = PhotoStore::default();
        let tasks = flatten(&catalog, &facility, &[], &photos);
        let stats = compute_stats(&tasks);
        Self {
            catalog,
            facility,
            tasks,
            photos,
            metadata: ReportMetadata::new(today),
            stats,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn facility(&self) -> &str {
        &self.facility
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn task(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn photo(&self, id: &str, phase: PhotoPhase) -> Option<&str> {
        self.photos.get(id, phase)
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            facility: self.facility.clone(),
            metadata: self.metadata.clone(),
            tasks: self.tasks.clone(),
            stats: self.stats,
            level: self.stats.level(),
        }
    }

    /// Rebuilds the task list for `key`, keeping values of matching ids.
    pub fn select_facility(&mut self, key: &str) {
        self.facility = key.to_string();
        self.refresh_tasks(true);
        info!(facility = %self.facility, tasks = self.tasks.len(), "facility selected");
    }

    /// Returns `false` when no task has this id.
    pub fn set_task_field(&mut self, id: &str, change: TaskChange) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task_id = id, "ignoring update for unknown task");
            return false;
        };

        match change {
            TaskChange::Planned(planned) => task.planned = planned,
            TaskChange::Status(status) => task.status = Some(status),
            TaskChange::Comment(comment) => {
                task.comment = comment;
                return true;
            }
        }
        self.stats = compute_stats(&self.tasks);
        true
    }

    /// Stores an already validated photo for one task phase. Returns `false`
    /// and stores nothing when no task has this id.
    pub fn attach_photo(&mut self, id: &str, phase: PhotoPhase, photo: &Photo) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(task_id = id, "ignoring photo for unknown task");
            return false;
        };

        *task.presence_mut(phase) = Presence::Present;
        self.photos.insert(id, phase, photo);
        info!(task_id = id, phase = phase.as_str(), "photo attached");
        true
    }

    pub fn update_metadata(&mut self, patch: MetadataPatch) {
        let metadata = &mut self.metadata;
        if let Some(date) = patch.date {
            metadata.date = date;
        }
        if let Some(responsible) = patch.responsible {
            metadata.responsible = responsible;
        }
        if let Some(staff_count) = patch.staff_count {
            metadata.staff_count = staff_count;
        }
        if let Some(start_time) = patch.start_time {
            metadata.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            metadata.end_time = end_time;
        }
    }

    /// Drops every entered value; the facility selection is kept.
    pub fn reset(&mut self, today: NaiveDate) {
        self.metadata = ReportMetadata::new(today);
        self.photos.clear();
        self.refresh_tasks(false);
        info!(facility = %self.facility, "report reset");
    }

    /// Applies a record read back from durable storage.
    pub fn restore(&mut self, report: PersistedReport, today: NaiveDate) {
        let form = report.form_data;
        let defaults = ReportMetadata::new(today);
        self.metadata = ReportMetadata {
            date: form.date.unwrap_or(defaults.date),
            responsible: form.responsible,
            staff_count: form.staff_count.unwrap_or(defaults.staff_count),
            start_time: form.start_time,
            end_time: form.end_time,
        };

        self.facility = match form.facility {
            Some(key) if self.catalog.contains(&key) => key,
            _ => self.catalog.default_facility().unwrap_or_default().to_string(),
        };
        self.photos = PhotoStore::from_entries(report.photo_data);
        self.tasks = flatten(
            &self.catalog,
            &self.facility,
            &report.checklist_data,
            &self.photos,
        );
        self.stats = compute_stats(&self.tasks);
    }

    pub fn to_persisted(&self, now: DateTime<Utc>) -> PersistedReport {
        PersistedReport {
            form_data: FormData {
                date: Some(self.metadata.date),
                responsible: self.metadata.responsible.clone(),
                staff_count: Some(self.metadata.staff_count),
                start_time: self.metadata.start_time.clone(),
                end_time: self.metadata.end_time.clone(),
                facility: Some(self.facility.clone()),
            },
            checklist_data: self.tasks.clone(),
            photo_data: self.photos.entries().clone(),
            last_saved: Some(now),
        }
    }

    fn refresh_tasks(&mut self, carry_over: bool) {
        let previous = if carry_over {
            std::mem::take(&mut self.tasks)
        } else {
            Vec::new()
        };
        self.tasks = flatten(&self.catalog, &self.facility, &previous, &self.photos);
        self.stats = compute_stats(&self.tasks);
    }
}
