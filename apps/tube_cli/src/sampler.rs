use std::{collections::HashMap, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use client_core::{media::data_locator, FrameSampler, MediaCandidate};
use shared::domain::ResourceLocator;

use crate::files;

/// Stands in for decoding: the "first frame" of a video is a poster image
/// stored next to it.
pub struct PosterFrameSampler {
    posters: HashMap<String, PathBuf>,
}

impl PosterFrameSampler {
    pub fn new(posters: HashMap<String, PathBuf>) -> Self {
        Self { posters }
    }
}

#[async_trait]
impl FrameSampler for PosterFrameSampler {
    async fn sample_first_frame(
        &self,
        _locator: &ResourceLocator,
        media: &MediaCandidate,
    ) -> Result<ResourceLocator> {
        let poster = self
            .posters
            .get(&media.file_name)
            .ok_or_else(|| anyhow!("no poster image next to {}", media.file_name))?;
        let bytes = tokio::fs::read(poster)
            .await
            .with_context(|| format!("failed to read poster '{}'", poster.display()))?;
        Ok(data_locator(&files::guess_mime(poster), &bytes))
    }
}
