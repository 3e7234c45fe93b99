//! Output a transcript as SRT, Markdown, and JSON.
//!
//! Usage: cargo run --example formats -- https://youtu.be/dQw4w9WgXcQ

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let reference = std::env::args()
        .nth(1)
        .expect("usage: formats <youtube-url-or-id>");

    let transcript = yt_transcript::fetch(&reference).await?;

    println!("=== SRT ===\n{}", transcript.to_srt());
    println!("=== Markdown ===\n{}", transcript.to_markdown());
    println!("=== JSON ===\n{}", transcript.to_json()?);

    Ok(())
}
