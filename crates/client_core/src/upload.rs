//! Upload orchestration: draft editing, the simulated transfer timeline and
//! the final commit into the catalog.
//!
//! The orchestrator is `Idle` between submissions and `Uploading` while the
//! timeline runs. Progress is published as 0, 10, ..., 100, each step after
//! the transport has accepted it. Closing the upload surface resets the draft
//! but never interrupts a running timeline; it only bumps the draft
//! generation so that late writers (the timeline, a slow frame sampler) leave
//! the fresh draft alone.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{ResourceLocator, Video, Visibility},
    error::TubeError,
    protocol::{ClientEvent, Notice, UploadPhase},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    catalog::NewVideo,
    media::{FrameSampler, MediaCandidate},
    AppState,
};

pub const PROGRESS_STEP: u8 = 10;
pub const PROGRESS_DONE: u8 = 100;

/// Moves the bytes of an upload. Called once per progress step, before that
/// step is published; an error aborts the upload without committing.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn advance(&self, percent: u8) -> Result<()>;
}

/// Stand-in transport that only waits a fixed interval per step.
pub struct SimulatedTransport {
    step_delay: Duration,
}

impl SimulatedTransport {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

#[async_trait]
impl UploadTransport for SimulatedTransport {
    async fn advance(&self, _percent: u8) -> Result<()> {
        tokio::time::sleep(self.step_delay).await;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub candidate: MediaCandidate,
    pub locator: ResourceLocator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub media: Option<SelectedFile>,
    /// Custom thumbnail picked by the user.
    pub thumbnail: Option<SelectedFile>,
    /// What the view shows as thumbnail: the custom one, or a frame sampled
    /// from the media once the sampler answers.
    pub thumbnail_preview: Option<ResourceLocator>,
    pub progress: u8,
}

#[derive(Default)]
struct OrchestratorState {
    draft: UploadDraft,
    phase: UploadPhase,
    generation: u64,
}

impl OrchestratorState {
    fn reset_draft(&mut self) {
        self.draft = UploadDraft::default();
        self.generation += 1;
    }

    /// Drops the selected media and any frame sampled from it. Returns the
    /// object to release, unless a running upload still owns it.
    fn retire_media(&mut self) -> Vec<ResourceLocator> {
        let media = self.draft.media.take();
        if self.draft.thumbnail.is_none() {
            self.draft.thumbnail_preview = None;
        }
        self.releasable(media)
    }

    fn retire_thumbnail(&mut self) -> Vec<ResourceLocator> {
        let thumbnail = self.draft.thumbnail.take();
        self.draft.thumbnail_preview = None;
        self.releasable(thumbnail)
    }

    // while uploading, the draft's files are the ones being committed
    fn releasable(&self, file: Option<SelectedFile>) -> Vec<ResourceLocator> {
        match file {
            Some(file) if self.phase == UploadPhase::Idle => vec![file.locator],
            _ => Vec::new(),
        }
    }
}

/// What a submission carries forward once preconditions hold.
struct PendingUpload {
    new_video: NewVideo,
    visibility: Visibility,
    generation: u64,
}

pub struct UploadOrchestrator {
    app: Arc<AppState>,
    transport: Arc<dyn UploadTransport>,
    sampler: Arc<dyn FrameSampler>,
    inner: Mutex<OrchestratorState>,
}

impl UploadOrchestrator {
    pub fn new(app: Arc<AppState>, sampler: Arc<dyn FrameSampler>) -> Arc<Self> {
        let transport = Arc::new(SimulatedTransport::new(app.settings().progress_step_delay));
        Self::new_with_transport(app, transport, sampler)
    }

    pub fn new_with_transport(
        app: Arc<AppState>,
        transport: Arc<dyn UploadTransport>,
        sampler: Arc<dyn FrameSampler>,
    ) -> Arc<Self> {
        Arc::new(Self {
            app,
            transport,
            sampler,
            inner: Mutex::new(OrchestratorState::default()),
        })
    }

    pub async fn draft(&self) -> UploadDraft {
        self.inner.lock().await.draft.clone()
    }

    pub async fn phase(&self) -> UploadPhase {
        self.inner.lock().await.phase
    }

    pub async fn progress(&self) -> u8 {
        self.inner.lock().await.draft.progress
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.inner.lock().await.draft.title = title.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.inner.lock().await.draft.description = description.into();
    }

    pub async fn set_visibility(&self, visibility: Visibility) {
        self.inner.lock().await.draft.visibility = visibility;
    }

    /// Accepts a video for the draft. Without a custom thumbnail, a first
    /// frame is sampled in the background; whatever has arrived by the time
    /// of [`submit`](Self::submit) is what the video gets.
    pub async fn select_media(
        self: &Arc<Self>,
        candidate: MediaCandidate,
    ) -> Result<ResourceLocator, TubeError> {
        if !candidate.is_video() {
            warn!(
                file_name = %candidate.file_name,
                mime_type = %candidate.mime_type,
                "upload: rejected media candidate"
            );
            return Err(self.fail(TubeError::InvalidMediaType {
                mime_type: candidate.mime_type,
            }));
        }

        let locator = self.app.register_object(candidate.clone()).await;
        let (needs_frame, replaced) = {
            let mut state = self.inner.lock().await;
            let replaced = state.retire_media();
            state.draft.media = Some(SelectedFile {
                candidate: candidate.clone(),
                locator: locator.clone(),
            });
            (state.draft.thumbnail.is_none(), replaced)
        };
        self.release(replaced).await;
        info!(
            file_name = %candidate.file_name,
            size = candidate.len(),
            %locator,
            "upload: media selected"
        );

        if needs_frame {
            self.spawn_frame_sampling(locator.clone(), candidate);
        }
        Ok(locator)
    }

    /// Drag-and-drop intake: anything that is not a video is ignored without
    /// a notice.
    pub async fn drop_file(
        self: &Arc<Self>,
        candidate: MediaCandidate,
    ) -> Result<Option<ResourceLocator>, TubeError> {
        if !candidate.is_video() {
            debug!(mime_type = %candidate.mime_type, "upload: ignored dropped file");
            return Ok(None);
        }
        self.select_media(candidate).await.map(Some)
    }

    pub async fn select_thumbnail(
        &self,
        candidate: MediaCandidate,
    ) -> Result<ResourceLocator, TubeError> {
        if !candidate.is_image() {
            warn!(
                file_name = %candidate.file_name,
                mime_type = %candidate.mime_type,
                "upload: rejected thumbnail candidate"
            );
            return Err(self.fail(TubeError::InvalidThumbnailType {
                mime_type: candidate.mime_type,
            }));
        }

        let locator = self.app.register_object(candidate.clone()).await;
        let replaced = {
            let mut state = self.inner.lock().await;
            let replaced = state.retire_thumbnail();
            state.draft.thumbnail = Some(SelectedFile {
                candidate,
                locator: locator.clone(),
            });
            state.draft.thumbnail_preview = Some(locator.clone());
            replaced
        };
        self.release(replaced).await;
        debug!(%locator, "upload: custom thumbnail selected");
        Ok(locator)
    }

    pub async fn clear_media(&self) {
        let replaced = self.inner.lock().await.retire_media();
        self.release(replaced).await;
    }

    pub async fn clear_thumbnail(&self) {
        let replaced = self.inner.lock().await.retire_thumbnail();
        self.release(replaced).await;
    }

    /// Dismisses the upload surface. A running timeline keeps going and still
    /// commits its video.
    pub async fn close(&self) {
        let mut state = self.inner.lock().await;
        if state.phase == UploadPhase::Uploading {
            debug!("upload: surface closed while a timeline is running");
        }
        let mut retired = state.retire_media();
        retired.extend(state.retire_thumbnail());
        state.reset_draft();
        drop(state);
        self.release(retired).await;
    }

    pub async fn submit(&self) -> Result<Video, TubeError> {
        let channel = self.app.active_channel().await;
        let pending = {
            let mut state = self.inner.lock().await;
            if state.phase == UploadPhase::Uploading {
                drop(state);
                return Err(self.fail(TubeError::UploadInProgress));
            }
            let Some(media) = state.draft.media.clone() else {
                drop(state);
                return Err(self.fail(TubeError::MissingMedia));
            };
            let Some(channel) = channel else {
                drop(state);
                return Err(self.fail(TubeError::NoChannel));
            };
            if state.draft.title.trim().is_empty() {
                drop(state);
                return Err(self.fail(TubeError::MissingTitle));
            }

            state.phase = UploadPhase::Uploading;
            state.draft.progress = 0;
            PendingUpload {
                new_video: NewVideo {
                    title: state.draft.title.clone(),
                    description: state.draft.description.clone(),
                    thumbnail: state.draft.thumbnail_preview.clone().unwrap_or_default(),
                    media: media.locator,
                    channel_id: channel.id,
                },
                visibility: state.draft.visibility,
                generation: state.generation,
            }
        };

        info!(
            channel_id = pending.new_video.channel_id.0,
            visibility = ?pending.visibility,
            has_thumbnail = !pending.new_video.thumbnail.is_empty(),
            "upload: started"
        );
        self.app.publish(ClientEvent::UploadPhaseChanged {
            phase: UploadPhase::Uploading,
        });

        if let Err(err) = self.run_timeline(pending.generation).await {
            error!(error = %err, "upload: transport failed");
            {
                let mut state = self.inner.lock().await;
                state.phase = UploadPhase::Idle;
                state.draft.progress = 0;
            }
            self.app.publish(ClientEvent::UploadPhaseChanged {
                phase: UploadPhase::Idle,
            });
            let err = TubeError::UploadFailed(err.to_string());
            self.app.publish(ClientEvent::UploadFailed((&err).into()));
            return Err(self.fail(err));
        }

        let video = self.app.commit_video(pending.new_video).await;
        {
            let mut state = self.inner.lock().await;
            if state.generation == pending.generation {
                state.reset_draft();
            }
            state.phase = UploadPhase::Idle;
            state.draft.progress = 0;
        }
        info!(video_id = %video.id, "upload: complete");
        self.app.publish(ClientEvent::UploadPhaseChanged {
            phase: UploadPhase::Idle,
        });
        self.app.notify(Notice::info(
            "Upload complete",
            format!("\"{}\" was uploaded", video.title),
        ));
        Ok(video)
    }

    async fn run_timeline(&self, generation: u64) -> Result<()> {
        for percent in (0..=PROGRESS_DONE).step_by(usize::from(PROGRESS_STEP)) {
            self.transport.advance(percent).await?;
            {
                let mut state = self.inner.lock().await;
                if state.generation == generation {
                    state.draft.progress = percent;
                }
            }
            debug!(percent, "upload: progress");
            self.app.publish(ClientEvent::UploadProgress { percent });
        }
        Ok(())
    }

    fn spawn_frame_sampling(self: &Arc<Self>, locator: ResourceLocator, media: MediaCandidate) {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            let frame = match orchestrator.sampler.sample_first_frame(&locator, &media).await {
                Ok(frame) => frame,
                Err(err) => {
                    debug!(%locator, error = %err, "upload: no frame sampled");
                    return;
                }
            };

            {
                let mut state = orchestrator.inner.lock().await;
                let still_selected = state
                    .draft
                    .media
                    .as_ref()
                    .is_some_and(|selected| selected.locator == locator);
                if !still_selected || state.draft.thumbnail.is_some() {
                    debug!(%locator, "upload: discarded stale frame");
                    return;
                }
                state.draft.thumbnail_preview = Some(frame.clone());
            }
            debug!(%locator, "upload: thumbnail derived from first frame");
            orchestrator
                .app
                .publish(ClientEvent::ThumbnailDerived { thumbnail: frame });
        });
    }

    async fn release(&self, locators: Vec<ResourceLocator>) {
        for locator in &locators {
            self.app.release_object(locator).await;
        }
    }

    fn fail(&self, err: TubeError) -> TubeError {
        self.app.notify_error(&err);
        err
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
