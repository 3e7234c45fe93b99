//! Fetch German captions only (no auto-generated fallback) and list the cues.
//!
//! Usage: cargo run --example options -- https://youtu.be/dQw4w9WgXcQ

use yt_transcript::{format_time, FetchOptions};

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let reference = std::env::args()
        .nth(1)
        .expect("usage: options <youtube-url-or-id>");

    let opts = FetchOptions::new()
        .languages(&["de", "de-DE"])?
        .allow_generated(false);

    let transcript = yt_transcript::fetch_with_options(&reference, &opts).await?;

    println!(
        "{} ({} track, {})",
        transcript.title.as_deref().unwrap_or("untitled"),
        transcript.kind,
        transcript.track_language
    );
    for entry in &transcript.entries {
        println!(
            "[{} - {}] {}",
            format_time(entry.start()),
            format_time(entry.end()),
            entry.text().trim()
        );
    }

    Ok(())
}
