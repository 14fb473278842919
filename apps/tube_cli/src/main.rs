use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use client_core::{
    config::load_settings_from, load_settings, AppState, FeedCard, UploadGate,
    UploadOrchestrator,
};
use shared::{domain::Visibility, protocol::ClientEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod files;
mod render;
mod sampler;

use sampler::PosterFrameSampler;

const PRINTER_DRAIN: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(about = "Run a scripted sign-in, channel setup and upload session")]
struct Args {
    #[arg(long, default_value = "demo@example.com")]
    email: String,
    #[arg(long, default_value = "demo")]
    password: String,
    #[arg(long, default_value = "My Channel")]
    channel_name: String,
    #[arg(long, default_value = "")]
    channel_description: String,
    #[arg(long)]
    channel_avatar: Option<PathBuf>,
    /// Video file to upload; repeat for several uploads.
    #[arg(long = "video", required = true)]
    videos: Vec<PathBuf>,
    /// Title for every upload; defaults to each file's name.
    #[arg(long)]
    title: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    /// Custom thumbnail applied to every upload.
    #[arg(long)]
    thumbnail: Option<PathBuf>,
    #[arg(long, default_value = "public")]
    visibility: Visibility,
    /// How long to wait for a sampled thumbnail before submitting.
    #[arg(long, default_value_t = 500)]
    frame_wait_ms: u64,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the final feed as JSON instead of cards.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_settings_from(path)
            .with_context(|| format!("failed to load settings from '{}'", path.display()))?,
        None => load_settings(),
    };

    let posters: HashMap<String, PathBuf> = args
        .videos
        .iter()
        .filter_map(|video| {
            files::poster_for(video).map(|poster| (files::file_name(video), poster))
        })
        .collect();

    let app = AppState::new(settings);
    let orchestrator =
        UploadOrchestrator::new(app.clone(), Arc::new(PosterFrameSampler::new(posters)));

    let printer = {
        let mut stream = BroadcastStream::new(app.subscribe_events());
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                match event {
                    Ok(event) => {
                        if let Some(line) = render::describe_event(&event) {
                            println!("{line}");
                        }
                    }
                    Err(err) => warn!(error = %err, "cli: event printer lagged"),
                }
            }
        })
    };

    if app.request_upload().await == UploadGate::LoginRequired {
        app.login(&args.email, &args.password).await?;
    }
    if app.request_upload().await == UploadGate::ChannelSetupRequired {
        let avatar = match &args.channel_avatar {
            Some(path) => Some(files::load_candidate(path).await?),
            None => None,
        };
        app.create_channel(&args.channel_name, &args.channel_description, avatar)
            .await?;
    }

    for path in &args.videos {
        upload_one(&app, &orchestrator, &args, path).await?;
    }

    let channel = app.active_channel().await;
    let fallback_avatar = app
        .identity()
        .await
        .map(|identity| identity.avatar)
        .unwrap_or_default();
    let now = Utc::now();
    let cards: Vec<FeedCard> = app
        .list_all()
        .await
        .iter()
        .map(|video| {
            let owner = channel.as_ref().filter(|c| c.id == video.channel_id);
            FeedCard::project(video, owner, &fallback_avatar, now)
        })
        .collect();

    // the printer ends once the last sender is gone
    drop(orchestrator);
    drop(app);
    if tokio::time::timeout(PRINTER_DRAIN, printer).await.is_err() {
        warn!("cli: event printer did not drain in time");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        println!("\nfeed ({} videos)", cards.len());
        for card in &cards {
            println!("{}", render::describe_card(card));
        }
    }

    Ok(())
}

async fn upload_one(
    app: &Arc<AppState>,
    orchestrator: &Arc<UploadOrchestrator>,
    args: &Args,
    path: &Path,
) -> Result<()> {
    let candidate = files::load_candidate(path).await?;
    if !candidate.is_video() {
        bail!(
            "'{}' is not a video ({})",
            path.display(),
            candidate.mime_type
        );
    }

    if let Some(thumbnail) = &args.thumbnail {
        orchestrator
            .select_thumbnail(files::load_candidate(thumbnail).await?)
            .await?;
    }

    let mut events = app.subscribe_events();
    orchestrator.select_media(candidate).await?;
    if args.thumbnail.is_none() {
        let wait = Duration::from_millis(args.frame_wait_ms);
        let derived = wait_for_thumbnail(&mut events, wait).await;
        if !derived {
            info!(path = %path.display(), "cli: submitting without a sampled thumbnail");
        }
    }

    orchestrator
        .set_title(args.title.clone().unwrap_or_else(|| files::default_title(path)))
        .await;
    orchestrator.set_description(args.description.clone()).await;
    orchestrator.set_visibility(args.visibility).await;
    orchestrator.submit().await?;
    Ok(())
}

/// Waits up to `wait` for a sampled thumbnail. Missed events are skipped,
/// the frame may still follow them.
async fn wait_for_thumbnail(
    events: &mut broadcast::Receiver<ClientEvent>,
    wait: Duration,
) -> bool {
    let frame = async {
        loop {
            match events.recv().await {
                Ok(ClientEvent::ThumbnailDerived { .. }) => return true,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "cli: missed events while waiting for a thumbnail");
                }
                Err(RecvError::Closed) => return false,
            }
        }
    };
    tokio::time::timeout(wait, frame).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use shared::{domain::ResourceLocator, protocol::Notice};

    use super::*;

    #[tokio::test]
    async fn thumbnail_wait_survives_lagging() {
        let (tx, mut rx) = broadcast::channel(2);
        for n in 0..5 {
            tx.send(ClientEvent::Notice(Notice::info("busy", n.to_string())))
                .expect("send");
        }
        tx.send(ClientEvent::ThumbnailDerived {
            thumbnail: ResourceLocator::new("data:image/png;base64,AA=="),
        })
        .expect("send");

        assert!(wait_for_thumbnail(&mut rx, Duration::from_secs(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn thumbnail_wait_gives_up_after_timeout() {
        let (tx, mut rx) = broadcast::channel::<ClientEvent>(4);
        assert!(!wait_for_thumbnail(&mut rx, Duration::from_millis(500)).await);
        drop(tx);
    }
}
