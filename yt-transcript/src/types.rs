use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::error::{Error, Result};
use crate::render;

/// One caption unit: start offset and duration in seconds, plus its text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedTextEntry {
    start: f64,
    duration: f64,
    text: String,
}

impl TimedTextEntry {
    /// Build an entry, rejecting negative or non-finite timings.
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Result<Self> {
        if !start.is_finite() || start < 0.0 {
            return Err(Error::InvalidEntry(format!(
                "start offset {start} is not a non-negative number"
            )));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidEntry(format!(
                "duration {duration} is not a non-negative number"
            )));
        }
        Ok(Self {
            start,
            duration,
            text: text.into(),
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Start offset plus duration.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Raw text as returned by the fetcher (untrimmed).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Whether a caption track was authored by a person or produced by speech recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptKind {
    Manual,
    Generated,
}

impl fmt::Display for TranscriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptKind::Manual => write!(f, "manual"),
            TranscriptKind::Generated => write!(f, "auto-generated"),
        }
    }
}

/// A fetched transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    /// Requested language the track satisfied ("en" for an "en-GB" track).
    pub language: Language,
    /// Language code of the fetched track as the service reports it.
    pub track_language: String,
    pub kind: TranscriptKind,
    pub title: Option<String>,
    pub entries: Vec<TimedTextEntry>,
}

impl Transcript {
    /// Format as SRT subtitles.
    pub fn to_srt(&self) -> String {
        render::srt(&self.entries)
    }

    /// Flattened text, one non-empty caption per line.
    pub fn to_markdown(&self) -> String {
        render::markdown(&self.entries)
    }

    /// Format as pretty-printed JSON records.
    pub fn to_json(&self) -> Result<String> {
        render::json(&self.entries)
    }

    /// End offset of the last entry, or 0 for an empty transcript.
    pub fn end(&self) -> f64 {
        self.entries.last().map(TimedTextEntry::end).unwrap_or(0.0)
    }
}

/// A single record of the JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub in_ts: String,
    pub out_ts: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_end() {
        let e = TimedTextEntry::new(2.0, 1.5, "x").unwrap();
        assert_eq!(e.end(), 3.5);
    }

    #[test]
    fn test_entry_rejects_negative_start() {
        let result = TimedTextEntry::new(-0.1, 1.0, "x");
        assert!(matches!(result, Err(Error::InvalidEntry(_))));
    }

    #[test]
    fn test_entry_rejects_negative_duration() {
        assert!(TimedTextEntry::new(0.0, -1.0, "x").is_err());
    }

    #[test]
    fn test_entry_rejects_nan() {
        assert!(TimedTextEntry::new(f64::NAN, 1.0, "x").is_err());
        assert!(TimedTextEntry::new(0.0, f64::INFINITY, "x").is_err());
    }

    #[test]
    fn test_entry_keeps_text_untrimmed() {
        let e = TimedTextEntry::new(0.0, 1.0, "  hi ").unwrap();
        assert_eq!(e.text(), "  hi ");
    }

    #[test]
    fn test_transcript_end() {
        let t = Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            language: Language::default(),
            track_language: "en".into(),
            kind: TranscriptKind::Manual,
            title: None,
            entries: vec![
                TimedTextEntry::new(0.0, 2.0, "a").unwrap(),
                TimedTextEntry::new(2.0, 3.25, "b").unwrap(),
            ],
        };
        assert_eq!(t.end(), 5.25);
    }

    #[test]
    fn test_transcript_end_empty() {
        let t = Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            language: Language::default(),
            track_language: "en".into(),
            kind: TranscriptKind::Generated,
            title: None,
            entries: Vec::new(),
        };
        assert_eq!(t.end(), 0.0);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TranscriptKind::Manual.to_string(), "manual");
        assert_eq!(TranscriptKind::Generated.to_string(), "auto-generated");
    }
}
