use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::FetchOptions;
use crate::error::{Error, Result};
use crate::source::{CaptionTrack, TrackList, TranscriptSource};
use crate::types::{TimedTextEntry, TranscriptKind};
use crate::video_id::VideoId;

/// Timed-text format requested from YouTube's caption endpoint.
const CAPTION_FORMAT: &str = "json3";

/// Pseudo-language yt-dlp uses for live chat replays.
const LIVE_CHAT: &str = "live_chat";

/// Suffix yt-dlp gives the speech-recognition track in the spoken language.
const ORIGINAL_SUFFIX: &str = "-orig";

/// Upper bound on a single caption track download.
const MAX_TRACK_BYTES: usize = 16 * 1024 * 1024;

/// Caption source backed by the `yt-dlp` executable.
///
/// Track discovery shells out to `yt-dlp --dump-json`; the chosen track is
/// then downloaded directly over HTTP in YouTube's json3 format.
pub struct YtDlpSource {
    yt_dlp: PathBuf,
    client: reqwest::Client,
}

impl YtDlpSource {
    pub fn new(options: &FetchOptions) -> Self {
        Self {
            yt_dlp: options.yt_dlp.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn ensure_installed(&self) -> Result<()> {
        let check = tokio::process::Command::new(&self.yt_dlp)
            .arg("--version")
            .output()
            .await;

        match check {
            Ok(output) if output.status.success() => {
                debug!(
                    version = %String::from_utf8_lossy(&output.stdout).trim(),
                    "found yt-dlp"
                );
                Ok(())
            }
            _ => Err(Error::YtDlpNotFound),
        }
    }

    async fn download_body(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Fetch(format!("caption download failed: {e}")))?;

        if let Some(len) = response.content_length() {
            if len > MAX_TRACK_BYTES as u64 {
                return Err(Error::Fetch(format!(
                    "caption track too large ({len} bytes)"
                )));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > MAX_TRACK_BYTES {
                return Err(Error::Fetch(format!(
                    "caption track exceeds {MAX_TRACK_BYTES} bytes"
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptSource for YtDlpSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<TrackList> {
        self.ensure_installed().await?;

        let url = video_id.watch_url();
        info!(%url, "listing caption tracks");

        let output = tokio::process::Command::new(&self.yt_dlp)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                "--no-exec",
                "--no-warnings",
            ])
            .arg(&url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Fetch(format!(
                "yt-dlp failed: {}",
                truncate(&stderr, 1000)
            )));
        }

        parse_info(&output.stdout)
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TimedTextEntry>> {
        debug!(language = %track.language, kind = %track.kind, "downloading caption track");
        let body = self.download_body(&track.url).await?;
        let entries = parse_json3(&body)?;
        if entries.is_empty() {
            warn!(language = %track.language, "caption track has no entries");
        }
        Ok(entries)
    }
}

#[derive(Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    subtitles: Option<BTreeMap<String, Vec<YtDlpCaptionFormat>>>,
    automatic_captions: Option<BTreeMap<String, Vec<YtDlpCaptionFormat>>>,
}

#[derive(Deserialize)]
struct YtDlpCaptionFormat {
    ext: Option<String>,
    url: Option<String>,
    name: Option<String>,
}

/// Build a track list from `yt-dlp --dump-json` output, keeping only tracks
/// that offer the json3 format.
///
/// Automatic captions also list YouTube's machine translations of the
/// speech-recognition track (URLs carrying `tlang`). Those are dropped; the
/// spoken-language track (`<lang>-orig`) is kept under its plain code.
fn parse_info(json: &[u8]) -> Result<TrackList> {
    let info: YtDlpInfo = serde_json::from_slice(json)?;

    let mut tracks: Vec<CaptionTrack> = Vec::new();
    let groups = [
        (TranscriptKind::Manual, info.subtitles),
        (TranscriptKind::Generated, info.automatic_captions),
    ];
    for (kind, group) in groups {
        for (key, formats) in group.unwrap_or_default() {
            if key == LIVE_CHAT {
                continue;
            }
            let Some((url, name)) = formats
                .into_iter()
                .find(|f| f.ext.as_deref() == Some(CAPTION_FORMAT) && f.url.is_some())
                .and_then(|f| Some((f.url?, f.name)))
            else {
                continue;
            };

            let spoken = key.strip_suffix(ORIGINAL_SUFFIX).map(str::to_string);
            let language = match (kind, spoken) {
                (TranscriptKind::Generated, Some(spoken)) => spoken,
                (TranscriptKind::Generated, None) if is_translation(&url) => {
                    debug!(language = %key, "skipping machine-translated captions");
                    continue;
                }
                _ => key,
            };
            if tracks
                .iter()
                .any(|t| t.kind == kind && t.language == language)
            {
                continue;
            }

            tracks.push(CaptionTrack {
                language,
                name,
                kind,
                url,
            });
        }
    }

    debug!(tracks = tracks.len(), "parsed caption tracks");
    Ok(TrackList {
        title: info.title,
        tracks,
    })
}

/// Whether a caption URL asks YouTube to translate the track.
fn is_translation(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| u.query_pairs().any(|(key, _)| key == "tlang"))
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    a_append: u8,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Parse YouTube json3 timed text into entries.
///
/// Events without `segs` only define caption windows and are skipped, as are
/// append events (line breaks inside an auto-generated caption window).
fn parse_json3(json: &[u8]) -> Result<Vec<TimedTextEntry>> {
    let doc: Json3 = serde_json::from_slice(json)?;

    doc.events
        .into_iter()
        .filter(|event| event.a_append == 0)
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.into_iter().map(|s| s.utf8).collect();
            Some(TimedTextEntry::new(
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
                text,
            ))
        })
        .collect()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.trim().chars().take(max_chars).collect()
}
