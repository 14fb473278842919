use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::ResourceLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeCategory {
    Video,
    Image,
    Other,
}

impl MimeCategory {
    pub fn of(mime_type: &str) -> Self {
        let top_level = mime_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match top_level.as_str() {
            "video" if mime_type.contains('/') => Self::Video,
            "image" if mime_type.contains('/') => Self::Image,
            _ => Self::Other,
        }
    }
}

/// A file the user picked, as handed over by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl MediaCandidate {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn category(&self) -> MimeCategory {
        MimeCategory::of(&self.mime_type)
    }

    pub fn is_video(&self) -> bool {
        self.category() == MimeCategory::Video
    }

    pub fn is_image(&self) -> bool {
        self.category() == MimeCategory::Image
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders a still of a selected video. Best effort: callers treat a failure
/// or a slow answer as "no thumbnail".
#[async_trait]
pub trait FrameSampler: Send + Sync {
    async fn sample_first_frame(
        &self,
        locator: &ResourceLocator,
        media: &MediaCandidate,
    ) -> Result<ResourceLocator>;
}

pub struct MissingFrameSampler;

#[async_trait]
impl FrameSampler for MissingFrameSampler {
    async fn sample_first_frame(
        &self,
        locator: &ResourceLocator,
        _media: &MediaCandidate,
    ) -> Result<ResourceLocator> {
        Err(anyhow!("frame sampler is unavailable for {locator}"))
    }
}

/// Encodes an image as a self-contained `data:` locator.
pub fn data_locator(mime_type: &str, bytes: &[u8]) -> ResourceLocator {
    ResourceLocator::new(format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)))
}
