use std::path::PathBuf;

/// All errors that can occur in yt-transcript.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("couldn't extract video ID from \"{0}\"")]
    VideoIdNotFound(String),

    #[error("invalid language code: \"{0}\" — expected e.g. \"en\" or \"pt-BR\"")]
    InvalidLanguage(String),

    #[error("invalid transcript entry: {0}")]
    InvalidEntry(String),

    #[error(
        "no {kind} transcript for video {video_id} in [{langs}]",
        kind = kind_label(.generated),
        langs = .languages.join(", ")
    )]
    TranscriptNotFound {
        video_id: String,
        languages: Vec<String>,
        generated: bool,
    },

    #[cfg(feature = "yt-dlp")]
    #[error("yt-dlp not found — install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("transcript fetch failed: {0}")]
    Fetch(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn kind_label(generated: &bool) -> &'static str {
    if *generated {
        "manual or auto-generated"
    } else {
        "manual"
    }
}

pub type Result<T> = std::result::Result<T, Error>;
