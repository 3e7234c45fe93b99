use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{FetchOptions, Language};
use crate::error::{Error, Result};
use crate::types::{TimedTextEntry, Transcript, TranscriptKind};
use crate::video_id::VideoId;

/// One caption track offered for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Language code as reported by the service (e.g. "en", "en-GB").
    pub language: String,
    /// Human-readable track name, if the service provides one.
    pub name: Option<String>,
    pub kind: TranscriptKind,
    /// Where the timed text for this track is fetched from.
    pub url: String,
}

/// All caption tracks available for one video.
#[derive(Debug, Clone, Default)]
pub struct TrackList {
    pub title: Option<String>,
    pub tracks: Vec<CaptionTrack>,
}

/// A track chosen for one of the requested languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub track: &'a CaptionTrack,
    /// The requested language the track matched, which names the output.
    pub language: &'a Language,
}

impl TrackList {
    /// First manual track matching `languages` in priority order.
    pub fn find_manual<'a>(&'a self, languages: &'a [Language]) -> Option<Selection<'a>> {
        self.find(TranscriptKind::Manual, languages)
    }

    /// First auto-generated track matching `languages` in priority order.
    pub fn find_generated<'a>(&'a self, languages: &'a [Language]) -> Option<Selection<'a>> {
        self.find(TranscriptKind::Generated, languages)
    }

    /// Exact language matches win over regional variants, whatever the
    /// language priority.
    fn find<'a>(
        &'a self,
        kind: TranscriptKind,
        languages: &'a [Language],
    ) -> Option<Selection<'a>> {
        let of_kind = || self.tracks.iter().filter(move |t| t.kind == kind);
        let pick = |matches: fn(&Language, &str) -> bool| {
            languages.iter().find_map(|language| {
                of_kind()
                    .find(|t| matches(language, &t.language))
                    .map(|track| Selection { track, language })
            })
        };

        pick(Language::matches_exact).or_else(|| pick(Language::matches_variant))
    }

    /// Pick a manual track, else (if allowed) an auto-generated one.
    pub fn select<'a>(
        &'a self,
        video_id: &VideoId,
        languages: &'a [Language],
        allow_generated: bool,
    ) -> Result<Selection<'a>> {
        if let Some(selection) = self.find_manual(languages) {
            return Ok(selection);
        }
        debug!(
            %video_id,
            available = ?self.languages(TranscriptKind::Manual),
            "no manual transcript in requested languages"
        );

        if allow_generated {
            if let Some(selection) = self.find_generated(languages) {
                return Ok(selection);
            }
            debug!(
                %video_id,
                available = ?self.languages(TranscriptKind::Generated),
                "no auto-generated transcript in requested languages"
            );
        }

        Err(Error::TranscriptNotFound {
            video_id: video_id.to_string(),
            languages: languages.iter().map(|l| l.code().to_string()).collect(),
            generated: allow_generated,
        })
    }

    fn languages(&self, kind: TranscriptKind) -> Vec<&str> {
        self.tracks
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.language.as_str())
            .collect()
    }
}

/// Something that can list and download caption tracks for a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List every caption track the video offers.
    async fn list_tracks(&self, video_id: &VideoId) -> Result<TrackList>;

    /// Download one track as timed text entries, in playback order.
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TimedTextEntry>>;
}

/// Fetch the preferred transcript for a video: a manual track in the first
/// matching language, else an auto-generated one when `options` allow it.
pub async fn fetch_transcript<S>(
    source: &S,
    video_id: &VideoId,
    options: &FetchOptions,
) -> Result<Transcript>
where
    S: TranscriptSource + ?Sized,
{
    let list = source.list_tracks(video_id).await?;
    debug!(%video_id, tracks = list.tracks.len(), "listed caption tracks");

    let Selection { track, language } =
        list.select(video_id, &options.languages, options.allow_generated)?;
    info!(%video_id, language = %track.language, kind = %track.kind, "fetching transcript");

    let entries = source.fetch_track(track).await?;

    let transcript = Transcript {
        video_id: video_id.to_string(),
        language: language.clone(),
        track_language: track.language.clone(),
        kind: track.kind,
        title: list.title.clone(),
        entries,
    };
    debug!(
        %video_id,
        entries = transcript.entries.len(),
        seconds = transcript.end(),
        "fetched transcript"
    );
    Ok(transcript)
}
