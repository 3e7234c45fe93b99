//! Renderers mapping a sequence of [`TimedTextEntry`] to SRT, flattened
//! Markdown text, and JSON records.
//!
//! All three are pure: the same entries always produce the same output, and
//! the entries themselves are never modified.

use crate::error::Result;
use crate::types::{TimedTextEntry, TranscriptRecord};

/// Format seconds as SRT timestamp: HH:MM:SS,mmm
///
/// Every unit is truncated, never rounded. The value is snapped to whole
/// nanoseconds first so binary representation error (3661.999 stored as
/// 3661.99899...) doesn't cost a millisecond. Negative and non-finite inputs
/// format as zero.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_ns = (seconds * 1_000_000_000.0).round() as u64;
    let total_ms = total_ns / 1_000_000;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Format as SRT subtitles.
///
/// Every entry becomes a numbered block, including entries whose text is
/// empty after trimming.
pub fn srt(entries: &[TimedTextEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() * 4);
    for (i, entry) in entries.iter().enumerate() {
        lines.push((i + 1).to_string());
        lines.push(format!(
            "{} --> {}",
            format_time(entry.start()),
            format_time(entry.end())
        ));
        lines.push(entry.text().trim().to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Flattened text: trimmed captions one per line, empty ones dropped.
pub fn markdown(entries: &[TimedTextEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text().trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One JSON record per entry, in order.
pub fn records(entries: &[TimedTextEntry]) -> Vec<TranscriptRecord> {
    entries
        .iter()
        .map(|e| TranscriptRecord {
            in_ts: format_time(e.start()),
            out_ts: format_time(e.end()),
            text: e.text().trim().to_string(),
        })
        .collect()
}

/// Pretty-printed JSON array of records. Non-ASCII text is kept as-is.
pub fn json(entries: &[TimedTextEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&records(entries))?)
}
