use thiserror::Error;
use url::Url;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaValidationError {
    #[error("Media URL cannot be empty.")]
    EmptyMediaUrl,

    #[error("Media URL is not valid: {0}")]
    InvalidMediaUrl(String),

    #[error("Hosted video URL has no video id: {0}")]
    MissingVideoId(String),
}

//
// ─── MEDIA SOURCES ─────────────────────────────────────────────────────────────
//

/// Video hosts whose embedded players can be driven without native controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProvider {
    YouTube,
    Vimeo,
}

impl VideoProvider {
    fn from_host(host: &str) -> Option<Self> {
        let host = host.strip_prefix("www.").unwrap_or(host);
        match host {
            "youtube.com" | "m.youtube.com" | "youtu.be" | "youtube-nocookie.com" => {
                Some(Self::YouTube)
            }
            "vimeo.com" | "player.vimeo.com" => Some(Self::Vimeo),
            _ => None,
        }
    }

    /// Origin the embedded player posts its progress messages from.
    #[must_use]
    pub fn message_origin(self) -> &'static str {
        match self {
            VideoProvider::YouTube => "https://www.youtube.com",
            VideoProvider::Vimeo => "https://player.vimeo.com",
        }
    }
}

/// Where a video lesson is played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Video hosted by a third-party provider, played through its iframe embed.
    Hosted {
        provider: VideoProvider,
        video_id: String,
    },
    /// Direct media file played by a native `<video>` element.
    File(Url),
}

impl MediaSource {
    /// Classify a raw content URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaValidationError` if the URL is blank, unparsable, or a hosted
    /// URL without a recognizable video id.
    pub fn from_url(raw: impl AsRef<str>) -> Result<Self, MediaValidationError> {
        let url = parse_media_url(raw.as_ref())?;
        let Some(provider) = url.host_str().and_then(VideoProvider::from_host) else {
            return Ok(MediaSource::File(url));
        };

        let video_id = match provider {
            VideoProvider::YouTube => youtube_id(&url),
            VideoProvider::Vimeo => vimeo_id(&url),
        }
        .ok_or_else(|| MediaValidationError::MissingVideoId(url.to_string()))?;

        Ok(MediaSource::Hosted { provider, video_id })
    }

    /// URL rendered into the playback surface.
    ///
    /// Hosted embeds are built with their own controls and keyboard shortcuts turned
    /// off and their JS message API turned on, so progress arrives via `postMessage`.
    #[must_use]
    pub fn embed_url(&self) -> String {
        match self {
            MediaSource::Hosted {
                provider: VideoProvider::YouTube,
                video_id,
            } => format!(
                "https://www.youtube.com/embed/{video_id}?controls=0&disablekb=1&fs=0&modestbranding=1&rel=0&playsinline=1&enablejsapi=1"
            ),
            MediaSource::Hosted {
                provider: VideoProvider::Vimeo,
                video_id,
            } => format!(
                "https://player.vimeo.com/video/{video_id}?controls=0&keyboard=0&pip=0&dnt=1&api=1"
            ),
            MediaSource::File(url) => url.to_string(),
        }
    }
}

pub(crate) fn parse_media_url(raw: &str) -> Result<Url, MediaValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(MediaValidationError::EmptyMediaUrl);
    }
    Url::parse(s).map_err(|_| MediaValidationError::InvalidMediaUrl(s.to_owned()))
}

fn youtube_id(url: &Url) -> Option<String> {
    let host = url.host_str().unwrap_or_default();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let id = if host.ends_with("youtu.be") {
        segments.next().map(str::to_owned)
    } else {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed" | "shorts" | "live" | "v") => segments.next().map(str::to_owned),
            _ => None,
        }
    };
    id.filter(|id| !id.is_empty())
}

fn vimeo_id(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .find(|s| s.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_youtube_watch_and_short_links() {
        let watch = MediaSource::from_url("https://www.youtube.com/watch?v=abc123&t=4").unwrap();
        let short = MediaSource::from_url("https://youtu.be/abc123").unwrap();
        let expected = MediaSource::Hosted {
            provider: VideoProvider::YouTube,
            video_id: "abc123".into(),
        };
        assert_eq!(watch, expected);
        assert_eq!(short, expected);
    }

    #[test]
    fn classifies_vimeo_player_links() {
        let source = MediaSource::from_url("https://player.vimeo.com/video/76979871").unwrap();
        assert!(matches!(
            source,
            MediaSource::Hosted { provider: VideoProvider::Vimeo, ref video_id } if video_id == "76979871"
        ));
        assert!(source.embed_url().contains("/video/76979871?controls=0&keyboard=0"));
    }

    #[test]
    fn other_hosts_are_direct_files() {
        let source = MediaSource::from_url("https://cdn.example.com/videos/safety.mp4").unwrap();
        assert!(matches!(source, MediaSource::File(_)));
        assert_eq!(source.embed_url(), "https://cdn.example.com/videos/safety.mp4");
    }

    #[test]
    fn youtube_embed_disables_controls_and_keyboard() {
        let source = MediaSource::from_url("https://youtu.be/xyz").unwrap();
        let embed = source.embed_url();
        assert!(embed.contains("controls=0"));
        assert!(embed.contains("disablekb=1"));
        assert!(embed.contains("enablejsapi=1"));
    }

    #[test]
    fn rejects_blank_and_idless_urls() {
        assert_eq!(
            MediaSource::from_url("  "),
            Err(MediaValidationError::EmptyMediaUrl)
        );
        assert!(matches!(
            MediaSource::from_url("https://www.youtube.com/feed/trending"),
            Err(MediaValidationError::MissingVideoId(_))
        ));
        assert!(matches!(
            MediaSource::from_url("not a url"),
            Err(MediaValidationError::InvalidMediaUrl(_))
        ));
    }
}
