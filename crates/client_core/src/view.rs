use tracing::debug;

use crate::AppState;

/// Prompts the core asks the view layer to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFlags {
    pub login_prompt: bool,
    pub channel_setup_prompt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadGate {
    LoginRequired,
    ChannelSetupRequired,
    Ready,
}

impl AppState {
    /// Decides whether the upload surface may open, raising the prompt that
    /// stands in the way otherwise.
    pub async fn request_upload(&self) -> UploadGate {
        let mut inner = self.inner.lock().await;
        let has_channel = inner
            .identity
            .as_ref()
            .map(|identity| identity.channel.is_some());
        let gate = match has_channel {
            None => {
                inner.flags.login_prompt = true;
                UploadGate::LoginRequired
            }
            Some(false) => {
                inner.flags.channel_setup_prompt = true;
                UploadGate::ChannelSetupRequired
            }
            Some(true) => UploadGate::Ready,
        };
        debug!(?gate, "view: upload requested");
        gate
    }

    pub async fn view_flags(&self) -> ViewFlags {
        self.inner.lock().await.flags
    }

    pub async fn set_login_prompt(&self, open: bool) {
        self.inner.lock().await.flags.login_prompt = open;
    }

    pub async fn set_channel_setup_prompt(&self, open: bool) {
        self.inner.lock().await.flags.channel_setup_prompt = open;
    }
}
