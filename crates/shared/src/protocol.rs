use serde::{Deserialize, Serialize};

use crate::{
    domain::{Channel, Identity, ResourceLocator, Video},
    error::{ErrorPayload, TubeError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Destructive,
}

/// A toast-style message for the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl From<&TubeError> for Notice {
    fn from(value: &TubeError) -> Self {
        Self::destructive("Error", value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientEvent {
    SessionChanged {
        #[serde(default)]
        identity: Option<Identity>,
    },
    ChannelCreated {
        channel: Channel,
    },
    VideoPublished {
        video: Video,
    },
    UploadPhaseChanged {
        phase: UploadPhase,
    },
    UploadProgress {
        percent: u8,
    },
    ThumbnailDerived {
        thumbnail: ResourceLocator,
    },
    UploadFailed(ErrorPayload),
    Notice(Notice),
}
