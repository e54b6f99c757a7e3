use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("not an image upload: {0}")]
    InvalidPhotoFormat(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),

    #[error("persisted report is corrupt: {0}")]
    CorruptPersistedData(#[from] serde_json::Error),

    #[error("unknown facility: {0}")]
    UnknownFacility(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for ChecklistError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ChecklistError> for AppError {
    fn from(err: ChecklistError) -> Self {
        match err {
            ChecklistError::InvalidPhotoFormat(_) => {
                Self::bad_request("Veuillez sélectionner une image valide")
            }
            ChecklistError::UnknownFacility(_) => Self::bad_request(err.to_string()),
            other => Self::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
