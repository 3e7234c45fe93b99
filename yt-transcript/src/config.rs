use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;

/// A validated caption language code.
///
/// Accepts a two- or three-letter primary code ("en", "fil") optionally
/// followed by subtags ("pt-BR", "zh-Hans"). The primary code is normalized
/// to lowercase; subtags keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    /// Create a language from a code, validating its shape.
    pub fn new(code: &str) -> Result<Self, Error> {
        let code = code.trim();
        let mut parts = code.split('-');
        let primary = parts.next().unwrap_or_default();

        let primary_ok =
            (2..=3).contains(&primary.len()) && primary.bytes().all(|b| b.is_ascii_alphabetic());
        let subtags_ok = parts.all(|p| {
            (1..=8).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphanumeric())
        });

        if !primary_ok || !subtags_ok {
            return Err(Error::InvalidLanguage(code.to_string()));
        }

        let normalized = match code.split_once('-') {
            Some((primary, rest)) => format!("{}-{rest}", primary.to_ascii_lowercase()),
            None => code.to_ascii_lowercase(),
        };
        Ok(Language(normalized))
    }

    /// The code as given to the caption service (e.g. "en").
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether a caption track language matches this one exactly (case-insensitive).
    pub fn matches_exact(&self, track_language: &str) -> bool {
        track_language.eq_ignore_ascii_case(&self.0)
    }

    /// Whether a caption track language is a regional variant of this one
    /// ("en-GB" for "en").
    pub fn matches_variant(&self, track_language: &str) -> bool {
        let len = self.0.len();
        track_language.as_bytes().get(len) == Some(&b'-')
            && track_language
                .get(..len)
                .is_some_and(|primary| primary.eq_ignore_ascii_case(&self.0))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language("en".into())
    }
}

/// Builder for fetch and output options.
pub struct FetchOptions {
    /// Caption languages in priority order.
    pub languages: Vec<Language>,
    /// Fall back to auto-generated captions when no manual track exists.
    pub allow_generated: bool,
    /// yt-dlp executable name or path.
    pub yt_dlp: PathBuf,
    pub output_dir: Option<PathBuf>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            languages: vec![Language::default()],
            allow_generated: true,
            yt_dlp: PathBuf::from("yt-dlp"),
            output_dir: None,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language preference list. Each code is validated.
    /// An empty list keeps the default ("en").
    pub fn languages<S: AsRef<str>>(mut self, codes: &[S]) -> Result<Self, Error> {
        let languages = codes
            .iter()
            .map(|c| Language::new(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if !languages.is_empty() {
            self.languages = languages;
        }
        Ok(self)
    }

    pub fn allow_generated(mut self, enabled: bool) -> Self {
        self.allow_generated = enabled;
        self
    }

    pub fn yt_dlp(mut self, path: PathBuf) -> Self {
        self.yt_dlp = path;
        self
    }

    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Resolve the output directory, defaulting to ~/Desktop/youtube_transcripts.
    pub fn resolve_output_dir(&self) -> PathBuf {
        crate::output::resolve_output_dir(self.output_dir.as_deref())
    }
}
