use client_core::FeedCard;
use shared::{
    domain::ResourceLocator,
    protocol::{ClientEvent, Severity},
};

const LOCATOR_PREVIEW_LEN: usize = 48;

/// One terminal line per event, or `None` for events the driver stays quiet
/// about.
pub fn describe_event(event: &ClientEvent) -> Option<String> {
    match event {
        ClientEvent::SessionChanged {
            identity: Some(identity),
        } => Some(format!(
            "signed in as {} <{}>",
            identity.display_name, identity.email
        )),
        ClientEvent::SessionChanged { identity: None } => Some("signed out".to_string()),
        ClientEvent::ChannelCreated { channel } => {
            Some(format!("channel '{}' ready (id {})", channel.name, channel.id))
        }
        ClientEvent::UploadProgress { percent } => Some(format!(
            "uploading [{:<10}] {percent:>3}%",
            "#".repeat(usize::from(*percent / 10))
        )),
        ClientEvent::ThumbnailDerived { thumbnail } => {
            Some(format!("thumbnail sampled: {}", shorten(thumbnail)))
        }
        ClientEvent::Notice(notice) => {
            let marker = match notice.severity {
                Severity::Info => "ok",
                Severity::Destructive => "!!",
            };
            Some(format!("[{marker}] {}: {}", notice.title, notice.description))
        }
        ClientEvent::VideoPublished { .. }
        | ClientEvent::UploadPhaseChanged { .. }
        | ClientEvent::UploadFailed(_) => None,
    }
}

pub fn describe_card(card: &FeedCard) -> String {
    let thumbnail = if card.thumbnail.is_empty() {
        "(no thumbnail)".to_string()
    } else {
        shorten(&card.thumbnail)
    };
    format!(
        "{}\n  {} | {} | {} | {} likes\n  thumbnail: {}\n  media:     {}",
        card.title,
        card.channel_name,
        card.views_label,
        card.age_label,
        card.likes,
        thumbnail,
        card.media,
    )
}

fn shorten(locator: &ResourceLocator) -> String {
    let raw = locator.as_str();
    match raw.char_indices().nth(LOCATOR_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_with_percent() {
        let line = describe_event(&ClientEvent::UploadProgress { percent: 30 }).expect("line");
        assert_eq!(line, "uploading [###       ]  30%");
    }

    #[test]
    fn long_locators_are_shortened() {
        let locator = ResourceLocator::new(format!("data:image/jpeg;base64,{}", "A".repeat(100)));
        let short = shorten(&locator);
        assert!(short.ends_with("..."));
        assert_eq!(short.len(), LOCATOR_PREVIEW_LEN + 3);
    }
}
