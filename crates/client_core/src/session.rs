use shared::{
    domain::{Identity, ResourceLocator, UserId},
    error::TubeError,
    protocol::ClientEvent,
};
use tracing::{debug, info, warn};

use crate::AppState;

/// The demo stub signs everyone in as the same user.
pub const DEMO_USER_ID: UserId = UserId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl AppState {
    /// Signs in the demo identity bound to `email`. Any non-empty pair of
    /// credentials is accepted; an existing session is replaced, channel and
    /// all.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, TubeError> {
        if email.is_empty() || password.is_empty() {
            warn!("session: rejected login with empty credentials");
            return Err(TubeError::InvalidCredentials);
        }

        let identity = Identity {
            id: DEMO_USER_ID,
            display_name: self.settings.demo_display_name.clone(),
            email: email.to_string(),
            avatar: ResourceLocator::new(self.settings.demo_avatar_url.clone()),
            channel: None,
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.identity.is_some() {
                debug!("session: replacing active identity");
            }
            inner.identity = Some(identity.clone());
            inner.flags.login_prompt = false;
        }

        info!(user_id = identity.id.0, email, "session: signed in");
        self.publish(ClientEvent::SessionChanged {
            identity: Some(identity.clone()),
        });
        Ok(identity)
    }

    pub async fn logout(&self) {
        let previous = self.inner.lock().await.identity.take();
        if let Some(identity) = previous {
            info!(user_id = identity.id.0, "session: signed out");
        }
        self.publish(ClientEvent::SessionChanged { identity: None });
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.inner.lock().await.identity.clone()
    }

    pub async fn session_state(&self) -> SessionState {
        if self.inner.lock().await.identity.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }
}
