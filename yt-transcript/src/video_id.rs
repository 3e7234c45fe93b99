use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::Error;

const ID_LEN: usize = 11;

const WATCH_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const SHORT_HOST: &str = "youtu.be";

/// A validated 11-character YouTube video ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_video_id(s).ok_or_else(|| Error::VideoIdNotFound(s.to_string()))
    }
}

/// Extract the video ID from a raw ID or a YouTube URL.
///
/// Recognized shapes:
/// - a bare 11-character ID
/// - `https://{www.,m.,}youtube.com/watch?v=<id>`
/// - `https://{www.,m.,}youtube.com/embed/<id>`
/// - `https://youtu.be/<id>`
///
/// Anything else, including other YouTube paths, returns `None`.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    if is_valid_id(input) {
        return Some(VideoId(input.to_string()));
    }

    let url = Url::parse(input).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    let mut segments = url.path_segments()?;

    let candidate = if WATCH_HOSTS.contains(&host.as_str()) {
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())?,
            "embed" => segments.next()?.to_string(),
            _ => return None,
        }
    } else if host == SHORT_HOST {
        segments.next()?.to_string()
    } else {
        return None;
    };

    is_valid_id(&candidate).then(|| VideoId(candidate))
}

fn is_valid_id(s: &str) -> bool {
    s.len() == ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
