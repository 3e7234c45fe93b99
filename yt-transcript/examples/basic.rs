//! Fetch a transcript and print the flattened text.
//!
//! Usage: cargo run --example basic -- https://youtu.be/dQw4w9WgXcQ

#[tokio::main]
async fn main() -> yt_transcript::Result<()> {
    let reference = std::env::args()
        .nth(1)
        .expect("usage: basic <youtube-url-or-id>");

    let transcript = yt_transcript::fetch(&reference).await?;

    println!("{}", transcript.to_markdown());

    Ok(())
}
