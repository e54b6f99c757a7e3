use crate::stats::{CompletionLevel, Stats};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Planned {
    Yes,
    #[default]
    No,
}

/// Completion state of a task. "Unset" is modelled as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Done,
    NotDone,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Present,
    #[default]
    Absent,
}

impl Presence {
    pub fn from_flag(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoPhase {
    Before,
    After,
}

impl PhotoPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub facility: String,
    pub zone_group: String,
    pub location: String,
    #[serde(default)]
    pub planned: Planned,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub photo_before: Presence,
    #[serde(default)]
    pub photo_after: Presence,
    #[serde(default)]
    pub comment: String,
}

impl TaskRecord {
    pub fn is_planned(&self) -> bool {
        self.planned == Planned::Yes
    }

    pub fn presence_mut(&mut self, phase: PhotoPhase) -> &mut Presence {
        match phase {
            PhotoPhase::Before => &mut self.photo_before,
            PhotoPhase::After => &mut self.photo_after,
        }
    }
}

/// One field change addressed to a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum TaskChange {
    Planned(Planned),
    Status(TaskStatus),
    Comment(String),
}

/// Freestanding report fields, not tied to any task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub date: NaiveDate,
    pub responsible: String,
    pub staff_count: u32,
    pub start_time: String,
    pub end_time: String,
}

impl ReportMetadata {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            responsible: String::new(),
            staff_count: 1,
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<NaiveDate>,
    pub responsible: Option<String>,
    pub staff_count: Option<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

// A cleared date input arrives as "" and means "leave the date alone".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// `formData` section of the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub date: Option<NaiveDate>,
    pub responsible: String,
    pub staff_count: Option<u32>,
    pub start_time: String,
    pub end_time: String,
    pub facility: Option<String>,
}

/// The whole aggregate as written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedReport {
    pub form_data: FormData,
    pub checklist_data: Vec<TaskRecord>,
    pub photo_data: BTreeMap<String, String>,
    pub last_saved: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub facility: String,
    pub metadata: ReportMetadata,
    pub tasks: Vec<TaskRecord>,
    pub stats: Stats,
    pub level: CompletionLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient message shown to the operator after an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: ReportSnapshot,
    pub notice: Option<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct FacilityRequest {
    pub facility: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdateRequest {
    pub id: String,
    pub change: TaskChange,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadRequest {
    pub id: String,
    pub phase: PhotoPhase,
    pub content_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub id: String,
    pub phase: PhotoPhase,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub facilities: Vec<String>,
}
