use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Language;
use crate::error::{Error, Result};
use crate::types::Transcript;
use crate::video_id::VideoId;

const DEFAULT_DIR_NAME: &str = "youtube_transcripts";

/// Resolve the output directory: the override if given, else
/// `~/Desktop/youtube_transcripts`, else `./youtube_transcripts` when no home
/// directory is known.
pub fn resolve_output_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::home_dir()
            .map(|home| home.join("Desktop"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME),
    }
}

/// Base file name for the outputs: the stem of `local_file` when it names an
/// existing file, otherwise the video ID.
pub fn output_basename(video_id: &VideoId, local_file: Option<&Path>) -> String {
    local_file
        .filter(|path| path.is_file())
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| video_id.to_string())
}

/// The three output file paths for one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub srt: PathBuf,
    pub markdown: PathBuf,
    pub json: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, basename: &str, language: &Language) -> Self {
        let dir = dir.into();
        Self {
            srt: dir.join(format!("{basename}.{language}.srt")),
            markdown: dir.join(format!("{basename}.md")),
            json: dir.join(format!("{basename}.json")),
            dir,
        }
    }

    /// All paths in write order.
    pub fn files(&self) -> [&Path; 3] {
        [
            self.srt.as_path(),
            self.markdown.as_path(),
            self.json.as_path(),
        ]
    }

    /// Render the transcript and write all three files, creating the
    /// directory first. Files are written one after another; a failure leaves
    /// earlier files in place.
    pub fn write(&self, transcript: &Transcript) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::Write {
            path: self.dir.clone(),
            source,
        })?;

        write_file(&self.srt, &transcript.to_srt())?;
        write_file(&self.markdown, &transcript.to_markdown())?;
        write_file(&self.json, &transcript.to_json()?)?;

        info!(
            dir = %self.dir.display(),
            video_id = %transcript.video_id,
            "transcript files written"
        );
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
