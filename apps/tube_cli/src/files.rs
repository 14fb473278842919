use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use client_core::MediaCandidate;

const POSTER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub async fn load_candidate(path: &Path) -> Result<MediaCandidate> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(MediaCandidate::new(file_name(path), guess_mime(path), bytes))
}

/// An image sitting next to `video` with the same stem, if any.
pub fn poster_for(video: &Path) -> Option<PathBuf> {
    POSTER_EXTENSIONS
        .iter()
        .map(|ext| video.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

pub fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_video_and_image_types() {
        assert_eq!(guess_mime(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime(Path::new("cover.png")), "image/png");
        assert_eq!(
            guess_mime(Path::new("notes.unknownext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn title_defaults_to_readable_stem() {
        assert_eq!(default_title(Path::new("/tmp/my_first-video.mp4")), "my first video");
    }

    #[tokio::test]
    async fn finds_sibling_poster() {
        let dir = std::env::temp_dir().join(format!("tube_cli_poster_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("dir");
        let video = dir.join("clip.mp4");
        tokio::fs::write(&video, b"video").await.expect("video");
        assert_eq!(poster_for(&video), None);

        tokio::fs::write(dir.join("clip.png"), b"png").await.expect("poster");
        assert_eq!(poster_for(&video), Some(dir.join("clip.png")));

        let candidate = load_candidate(&video).await.expect("candidate");
        assert!(candidate.is_video());
        assert_eq!(candidate.file_name, "clip.mp4");

        tokio::fs::remove_dir_all(dir).await.expect("cleanup");
    }
}
