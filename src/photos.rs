use crate::errors::ChecklistError;
use crate::models::PhotoPhase;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;

/// Photos keyed by `"<task id>-<phase>"`, each stored as a `data:` URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoStore {
    entries: BTreeMap<String, String>,
}

/// A validated image, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    content_type: String,
    encoded: String,
}

impl Photo {
    /// Accepts only `image/*` content types carrying non-empty base64 data.
    pub fn from_upload(content_type: &str, data: &str) -> Result<Self, ChecklistError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        let subtype = content_type
            .strip_prefix("image/")
            .ok_or_else(|| ChecklistError::InvalidPhotoFormat(content_type.clone()))?;
        if subtype.is_empty() {
            return Err(ChecklistError::InvalidPhotoFormat(content_type));
        }

        let encoded = data.trim();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| ChecklistError::InvalidPhotoFormat(content_type.clone()))?;
        if bytes.is_empty() {
            return Err(ChecklistError::InvalidPhotoFormat(content_type));
        }

        Ok(Self {
            content_type,
            encoded: encoded.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.encoded)
    }
}

pub fn photo_key(task_id: &str, phase: PhotoPhase) -> String {
    format!("{task_id}-{}", phase.as_str())
}

/// Splits a stored `data:` URL into its content type and raw bytes.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (content_type, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((content_type.to_string(), bytes))
}

impl PhotoStore {
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn contains(&self, task_id: &str, phase: PhotoPhase) -> bool {
        self.entries.contains_key(&photo_key(task_id, phase))
    }

    pub fn get(&self, task_id: &str, phase: PhotoPhase) -> Option<&str> {
        self.entries.get(&photo_key(task_id, phase)).map(String::as_str)
    }

    /// Last write wins; earlier photos for the same slot are dropped.
    pub fn insert(&mut self, task_id: &str, phase: PhotoPhase, photo: &Photo) {
        self.entries.insert(photo_key(task_id, phase), photo.to_data_url());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
