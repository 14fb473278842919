use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{Channel, ResourceLocator, Video, VideoId};

pub const PLACEHOLDER_CHANNEL_NAME: &str = "Channel name";

/// Display data for one entry of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedCard {
    pub video_id: VideoId,
    pub title: String,
    pub thumbnail: ResourceLocator,
    pub media: ResourceLocator,
    pub channel_name: String,
    pub channel_avatar: ResourceLocator,
    pub views_label: String,
    pub age_label: String,
    pub likes: u64,
}

impl FeedCard {
    /// `channel` is the channel to attribute the video to, if known; without
    /// one the card shows a placeholder name and `fallback_avatar`.
    pub fn project(
        video: &Video,
        channel: Option<&Channel>,
        fallback_avatar: &ResourceLocator,
        now: DateTime<Utc>,
    ) -> Self {
        let (channel_name, channel_avatar) = match channel {
            Some(channel) => (channel.name.clone(), channel.avatar.clone()),
            None => (PLACEHOLDER_CHANNEL_NAME.to_string(), fallback_avatar.clone()),
        };
        Self {
            video_id: video.id,
            title: video.title.clone(),
            thumbnail: video.thumbnail.clone(),
            media: video.media.clone(),
            channel_name,
            channel_avatar,
            views_label: format_views(video.views),
            age_label: format_age(video.created_at, now),
            likes: video.likes,
        }
    }
}

pub fn format_views(views: u64) -> String {
    match views {
        0..=999 => format!("{views} views"),
        1_000..=9_999 => format!("{:.1}K views", views as f64 / 1_000.0),
        10_000..=999_999 => format!("{}K views", views / 1_000),
        _ => format!("{:.1}M views", views as f64 / 1_000_000.0),
    }
}

pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - created_at).num_days();
    match days {
        i64::MIN..=0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => plural(days / 365, "year"),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
