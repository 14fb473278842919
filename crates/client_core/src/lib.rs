//! In-memory state core for the video sharing client.
//!
//! [`AppState`] is the single state holder: the active identity, the global
//! catalog, the view prompts and the object registry live behind one lock so
//! that every mutation is observed whole. Views subscribe to [`ClientEvent`]s
//! and re-render from snapshots. Uploads are sequenced by
//! [`UploadOrchestrator`], which holds its own draft state and commits through
//! [`AppState`].

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use shared::{
    domain::{Identity, ResourceLocator, Video},
    error::TubeError,
    protocol::{ClientEvent, Notice},
};
use tokio::sync::{broadcast, Mutex};

pub mod catalog;
pub mod channel;
pub mod config;
pub mod feed;
pub mod media;
pub mod player;
pub mod session;
pub mod upload;
pub mod view;

pub use catalog::NewVideo;
pub use config::{load_settings, Settings};
pub use feed::FeedCard;
pub use media::{FrameSampler, MediaCandidate, MimeCategory, MissingFrameSampler};
pub use player::PlaybackState;
pub use session::SessionState;
pub use upload::{SimulatedTransport, UploadDraft, UploadOrchestrator, UploadTransport};
pub use view::{UploadGate, ViewFlags};

pub struct AppState {
    settings: Settings,
    inner: Mutex<StudioState>,
    events: broadcast::Sender<ClientEvent>,
}

#[derive(Default)]
struct StudioState {
    identity: Option<Identity>,
    /// Newest first.
    catalog: VecDeque<Video>,
    flags: ViewFlags,
    objects: HashMap<ResourceLocator, MediaCandidate>,
    last_channel_id: i64,
}

impl AppState {
    pub fn new(settings: Settings) -> Arc<Self> {
        let (events, _) = broadcast::channel(settings.event_capacity);
        Arc::new(Self {
            settings,
            inner: Mutex::new(StudioState::default()),
            events,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Keeps `candidate` addressable for the rest of the session and returns
    /// the locator views use to display it.
    pub async fn register_object(&self, candidate: MediaCandidate) -> ResourceLocator {
        let locator = ResourceLocator::object();
        self.inner
            .lock()
            .await
            .objects
            .insert(locator.clone(), candidate);
        locator
    }

    /// Forgets an object that no video refers to any more.
    pub async fn release_object(&self, locator: &ResourceLocator) {
        self.inner.lock().await.objects.remove(locator);
    }

    pub async fn resolve_object(&self, locator: &ResourceLocator) -> Option<MediaCandidate> {
        self.inner.lock().await.objects.get(locator).cloned()
    }

    fn publish(&self, event: ClientEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn notify(&self, notice: Notice) {
        self.publish(ClientEvent::Notice(notice));
    }

    fn notify_error(&self, err: &TubeError) {
        self.notify(Notice::from(err));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
