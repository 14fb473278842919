use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Validation,
    Conflict,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TubeError {
    #[error("email and password are required")]
    InvalidCredentials,
    #[error("selected file is not a video ({mime_type})")]
    InvalidMediaType { mime_type: String },
    #[error("selected file is not an image ({mime_type})")]
    InvalidThumbnailType { mime_type: String },
    #[error("no video file selected")]
    MissingMedia,
    #[error("a title is required")]
    MissingTitle,
    #[error("create a channel before uploading videos")]
    NoChannel,
    #[error("sign in to continue")]
    NoActiveIdentity,
    #[error("an upload is already in progress")]
    UploadInProgress,
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

impl TubeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials | Self::NoActiveIdentity => ErrorCode::Unauthorized,
            Self::InvalidMediaType { .. }
            | Self::InvalidThumbnailType { .. }
            | Self::MissingMedia
            | Self::MissingTitle
            | Self::NoChannel => ErrorCode::Validation,
            Self::UploadInProgress => ErrorCode::Conflict,
            Self::UploadFailed(_) => ErrorCode::Internal,
        }
    }
}

/// Serializable form of a [`TubeError`] for event subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&TubeError> for ErrorPayload {
    fn from(value: &TubeError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
