use shared::{
    domain::{Channel, ChannelId, ResourceLocator},
    error::TubeError,
    protocol::ClientEvent,
};
use tracing::{info, warn};

use crate::{media::MediaCandidate, AppState};

impl AppState {
    /// Creates the active identity's channel, replacing any channel it already
    /// owns. The replacement keeps the previous channel id but starts with an
    /// empty video list.
    pub async fn create_channel(
        &self,
        name: &str,
        description: &str,
        avatar: Option<MediaCandidate>,
    ) -> Result<Channel, TubeError> {
        let mut inner = self.inner.lock().await;

        let Some(identity_avatar) = inner.identity.as_ref().map(|i| i.avatar.clone()) else {
            drop(inner);
            warn!("channel: create requested without an active identity");
            let err = TubeError::NoActiveIdentity;
            self.notify_error(&err);
            return Err(err);
        };

        let existing_id = inner
            .identity
            .as_ref()
            .and_then(|identity| identity.channel.as_ref())
            .map(|channel| channel.id);
        let id = match existing_id {
            Some(id) => id,
            None => {
                inner.last_channel_id += 1;
                ChannelId(inner.last_channel_id)
            }
        };

        let avatar = match avatar {
            Some(candidate) => {
                let locator = ResourceLocator::object();
                inner.objects.insert(locator.clone(), candidate);
                locator
            }
            None => identity_avatar,
        };

        let channel = Channel {
            id,
            name: name.to_string(),
            description: description.to_string(),
            avatar,
            videos: Vec::new(),
        };

        if let Some(identity) = inner.identity.as_mut() {
            identity.channel = Some(channel.clone());
        }
        inner.flags.channel_setup_prompt = false;
        drop(inner);

        info!(
            channel_id = id.0,
            replaced = existing_id.is_some(),
            "channel: created"
        );
        self.publish(ClientEvent::ChannelCreated {
            channel: channel.clone(),
        });
        Ok(channel)
    }

    pub async fn active_channel(&self) -> Option<Channel> {
        self.inner
            .lock()
            .await
            .identity
            .as_ref()
            .and_then(|identity| identity.channel.clone())
    }
}
