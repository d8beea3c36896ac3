//! Classification of video source URLs.
//!
//! Classes are tried as a strict priority chain: YouTube, then Vimeo, then a
//! direct file link. The first class that matches wins even when a later one
//! would match as well.

use once_cell::sync::Lazy;
use regex::Regex;

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";
const VIMEO_PLAYER_BASE: &str = "https://player.vimeo.com/video/";

/// Watch, short-link, embed and shorts URL shapes, tried in this order.
static YOUTUBE_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        r"youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
    ]
    .map(|pattern| Regex::new(pattern).expect("youtube pattern must compile"))
});

static VIMEO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("vimeo pattern must compile"));

static DIRECT_FILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mp4|webm|ogg|mov|avi|mkv)$").expect("file pattern must compile")
});

/// Container format of a directly playable video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoContainer {
    Mp4,
    Webm,
    Ogg,
    Mov,
    Avi,
    Mkv,
}

impl VideoContainer {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "webm" => Some(Self::Webm),
            "ogg" => Some(Self::Ogg),
            "mov" => Some(Self::Mov),
            "avi" => Some(Self::Avi),
            "mkv" => Some(Self::Mkv),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Ogg => "video/ogg",
            Self::Mov => "video/quicktime",
            Self::Avi => "video/x-msvideo",
            Self::Mkv => "video/x-matroska",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Vimeo { id: String },
    DirectFile { container: VideoContainer },
    Unrecognized,
}

impl VideoSource {
    /// Canonical embeddable URL for hosted players. Direct files play from
    /// their original URL and unrecognized sources are never embedded.
    pub fn embed_url(&self) -> Option<String> {
        match self {
            VideoSource::YouTube { id } => Some(format!("{YOUTUBE_EMBED_BASE}{id}")),
            VideoSource::Vimeo { id } => Some(format!("{VIMEO_PLAYER_BASE}{id}")),
            VideoSource::DirectFile { .. } | VideoSource::Unrecognized => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoSource::YouTube { .. } => "youtube",
            VideoSource::Vimeo { .. } => "vimeo",
            VideoSource::DirectFile { .. } => "direct-file",
            VideoSource::Unrecognized => "unrecognized",
        }
    }
}

pub fn classify_video_source(url: &str) -> VideoSource {
    if let Some(id) = youtube_video_id(url) {
        return VideoSource::YouTube { id };
    }

    if let Some(id) = VIMEO_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
    {
        return VideoSource::Vimeo {
            id: id.as_str().to_string(),
        };
    }

    if let Some(container) = DIRECT_FILE_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .and_then(|extension| VideoContainer::from_extension(extension.as_str()))
    {
        return VideoSource::DirectFile { container };
    }

    VideoSource::Unrecognized
}

fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_shapes_are_recognised() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            assert_eq!(
                classify_video_source(url),
                VideoSource::YouTube {
                    id: "dQw4w9WgXcQ".into()
                },
                "{url}"
            );
        }
    }

    #[test]
    fn youtube_embed_url_is_canonical() {
        let source = classify_video_source("https://youtu.be/dQw4w9WgXcQ?t=42");
        assert_eq!(
            source.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn short_youtube_ids_are_not_recognised() {
        assert_eq!(
            classify_video_source("https://youtu.be/abc"),
            VideoSource::Unrecognized
        );
    }

    #[test]
    fn vimeo_numeric_id() {
        let source = classify_video_source("https://vimeo.com/76979871");
        assert_eq!(
            source,
            VideoSource::Vimeo {
                id: "76979871".into()
            }
        );
        assert_eq!(
            source.embed_url().as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
    }

    #[test]
    fn direct_files_match_extension_case_insensitively() {
        assert_eq!(
            classify_video_source("https://cdn.example.com/clip.mp4"),
            VideoSource::DirectFile {
                container: VideoContainer::Mp4
            }
        );
        let mov = classify_video_source("https://cdn.example.com/CLIP.MOV");
        assert_eq!(
            mov,
            VideoSource::DirectFile {
                container: VideoContainer::Mov
            }
        );
        assert_eq!(mov.embed_url(), None);
    }

    #[test]
    fn query_string_defeats_extension_match() {
        assert_eq!(
            classify_video_source("https://cdn.example.com/clip.mp4?sig=1"),
            VideoSource::Unrecognized
        );
    }

    #[test]
    fn higher_priority_class_wins() {
        assert_eq!(
            classify_video_source("https://vimeo.com/123/download.mp4"),
            VideoSource::Vimeo { id: "123".into() }
        );
    }

    #[test]
    fn unrecognised_urls() {
        assert_eq!(
            classify_video_source("https://example.com/watch"),
            VideoSource::Unrecognized
        );
        assert_eq!(classify_video_source(""), VideoSource::Unrecognized);
    }
}
