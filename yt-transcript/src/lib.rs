//! YouTube transcript library: video URL or ID in, SRT, Markdown and JSON out.
//!
//! **yt-transcript** resolves a video reference to its canonical ID, picks the
//! best caption track (manual first, auto-generated as fallback), downloads it
//! (track discovery via yt-dlp) and renders it as SRT subtitles, flattened
//! Markdown text, or JSON records.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> yt_transcript::Result<()> {
//! let transcript = yt_transcript::fetch("https://youtu.be/dQw4w9WgXcQ").await?;
//! println!("{}", transcript.to_srt());
//!
//! // Or write all three renderings to ~/Desktop/youtube_transcripts
//! let paths = yt_transcript::OutputPaths::new(
//!     yt_transcript::output::resolve_output_dir(None),
//!     &transcript.video_id,
//!     &transcript.language,
//! );
//! paths.write(&transcript)?;
//! # Ok(())
//! # }
//! ```
//!
//! Caption retrieval sits behind the [`TranscriptSource`] trait, so any
//! backend (or a test stub) can feed the renderers.

pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod source;
pub mod types;
pub mod video_id;
#[cfg(feature = "yt-dlp")]
pub mod ytdlp;

pub use config::{FetchOptions, Language};
pub use error::{Error, Result};
pub use output::{output_basename, OutputPaths};
pub use render::format_time;
pub use source::{fetch_transcript, CaptionTrack, Selection, TrackList, TranscriptSource};
pub use types::{TimedTextEntry, Transcript, TranscriptKind, TranscriptRecord};
pub use video_id::{extract_video_id, VideoId};
#[cfg(feature = "yt-dlp")]
pub use ytdlp::YtDlpSource;

/// Fetch the transcript for a video URL or ID with default options.
#[cfg(feature = "yt-dlp")]
pub async fn fetch(reference: &str) -> Result<Transcript> {
    fetch_with_options(reference, &FetchOptions::default()).await
}

/// Fetch the transcript for a video URL or ID with custom options.
#[cfg(feature = "yt-dlp")]
pub async fn fetch_with_options(reference: &str, options: &FetchOptions) -> Result<Transcript> {
    let video_id: VideoId = reference.parse()?;
    let source = YtDlpSource::new(options);
    fetch_transcript(&source, &video_id, options).await
}
