use chrono::Utc;
use shared::{
    domain::{ChannelId, ResourceLocator, Video, VideoId},
    protocol::ClientEvent,
};
use tracing::info;

use crate::AppState;

/// Everything a new video needs apart from what the catalog assigns itself.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub thumbnail: ResourceLocator,
    pub media: ResourceLocator,
    pub channel_id: ChannelId,
}

impl AppState {
    /// Snapshot of the global feed, newest first.
    pub async fn list_all(&self) -> Vec<Video> {
        self.inner.lock().await.catalog.iter().cloned().collect()
    }

    /// Videos of one channel, newest first. The active identity's own channel
    /// is read directly; any other id is filtered out of the global feed.
    pub async fn list_for_channel(&self, channel_id: ChannelId) -> Vec<Video> {
        let inner = self.inner.lock().await;
        let own = inner
            .identity
            .as_ref()
            .and_then(|identity| identity.channel.as_ref())
            .filter(|channel| channel.id == channel_id);
        match own {
            Some(channel) => channel.videos.clone(),
            None => inner
                .catalog
                .iter()
                .filter(|video| video.channel_id == channel_id)
                .cloned()
                .collect(),
        }
    }

    /// Stamps `new` with an id and creation time and prepends it to the global
    /// feed and, when it belongs there, to the active identity's channel. Both
    /// lists change under one lock.
    pub(crate) async fn commit_video(&self, new: NewVideo) -> Video {
        let video = Video {
            id: VideoId::fresh(),
            title: new.title,
            description: new.description,
            thumbnail: new.thumbnail,
            media: new.media,
            created_at: Utc::now(),
            views: 0,
            likes: 0,
            channel_id: new.channel_id,
        };

        let in_own_channel = {
            let mut inner = self.inner.lock().await;
            inner.catalog.push_front(video.clone());
            match inner
                .identity
                .as_mut()
                .and_then(|identity| identity.channel.as_mut())
                .filter(|channel| channel.id == video.channel_id)
            {
                Some(channel) => {
                    channel.videos.insert(0, video.clone());
                    true
                }
                None => false,
            }
        };

        info!(
            video_id = %video.id,
            channel_id = video.channel_id.0,
            in_own_channel,
            "catalog: video committed"
        );
        self.publish(ClientEvent::VideoPublished {
            video: video.clone(),
        });
        video
    }
}
