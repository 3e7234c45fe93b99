use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use yt_transcript::{
    FetchOptions, Language, OutputPaths, Transcript, TranscriptKind, TranscriptSource, VideoId,
    YtDlpSource,
};

const USAGE: &str = "Usage: get-yt-transcript <YouTube-URL-or-ID> [optional-local-video-file]";

#[derive(Parser)]
#[command(
    name = "get-yt-transcript",
    about = "Download a YouTube video's transcript as SRT, Markdown, and JSON"
)]
struct Cli {
    /// YouTube URL or 11-character video ID.
    reference: Option<String>,

    /// Local video file; its name (without extension) is used for the output files.
    local_file: Option<PathBuf>,

    /// Caption language, repeat for fallbacks in priority order.
    #[arg(short = 'l', long = "lang", default_value = "en")]
    languages: Vec<String>,

    /// Only accept manually created captions.
    #[arg(long)]
    no_auto: bool,

    /// Output directory (default: ~/Desktop/youtube_transcripts).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// yt-dlp executable.
    #[arg(long, default_value = "yt-dlp")]
    yt_dlp: PathBuf,

    /// Also print one rendering to stdout once the files are written.
    #[arg(long, value_enum)]
    print: Option<PrintFormat>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum PrintFormat {
    Srt,
    Markdown,
    Json,
}

/// Why a run stopped. Every variant exits with status 1.
#[derive(Debug)]
enum Failure {
    Usage,
    BadReference(String),
    Error(yt_transcript::Error),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Usage => write!(f, "{USAGE}"),
            Failure::BadReference(reference) => {
                write!(f, "Couldn't extract video ID from '{reference}'")
            }
            Failure::Error(e) => write!(f, "Error: {e}"),
        }
    }
}

impl From<yt_transcript::Error> for Failure {
    fn from(e: yt_transcript::Error) -> Self {
        Failure::Error(e)
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Failure::Error(e.into())
    }
}

/// A resolved request, ready to fetch.
struct Job {
    reference: String,
    video_id: VideoId,
    options: FetchOptions,
    basename: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Help and version exit 0, every other parse error exits 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose { "debug" } else { "warn" };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["yt_transcript", "get_yt_transcript"] {
        filter = filter.add_directive(
            format!("{target}={level}")
                .parse()
                .expect("valid directive"),
        );
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match prepare(&cli) {
        Ok(job) => {
            let source = YtDlpSource::new(&job.options);
            run(&job, &source, cli.print.as_ref(), &mut std::io::stdout()).await
        }
        Err(failure) => Err(failure),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("{failure}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve the reference and build fetch options from the arguments.
fn prepare(cli: &Cli) -> Result<Job, Failure> {
    let reference = cli.reference.as_deref().ok_or(Failure::Usage)?;
    let video_id = yt_transcript::extract_video_id(reference)
        .ok_or_else(|| Failure::BadReference(reference.to_string()))?;

    let mut options = FetchOptions::new()
        .languages(cli.languages.as_slice())?
        .allow_generated(!cli.no_auto)
        .yt_dlp(cli.yt_dlp.clone());
    if let Some(dir) = cli.output_dir.clone() {
        options = options.output_dir(dir);
    }

    if let Some(path) = &cli.local_file {
        if !path.is_file() {
            warn!(
                path = %path.display(),
                "not an existing file, naming outputs after the video ID"
            );
        }
    }
    let basename = yt_transcript::output_basename(&video_id, cli.local_file.as_deref());

    Ok(Job {
        reference: reference.to_string(),
        video_id,
        options,
        basename,
    })
}

/// Fetch the transcript, write the three files and report progress to `out`.
async fn run<S>(
    job: &Job,
    source: &S,
    print: Option<&PrintFormat>,
    out: &mut impl Write,
) -> Result<(), Failure>
where
    S: TranscriptSource + ?Sized,
{
    writeln!(out, "Downloading subtitles for: {}", job.reference)?;

    let spinner = fetch_spinner(&job.video_id.to_string());
    let result = yt_transcript::fetch_transcript(source, &job.video_id, &job.options).await;
    spinner.finish_and_clear();
    let transcript = result?;

    if transcript.kind == TranscriptKind::Generated {
        writeln!(
            out,
            "No manual {} subtitles found, using auto-generated captions",
            language_list(&job.options.languages)
        )?;
    }

    let paths = OutputPaths::new(
        job.options.resolve_output_dir(),
        &job.basename,
        &transcript.language,
    );
    for path in paths.files() {
        writeln!(out, "-> {}", path.display())?;
    }

    paths.write(&transcript)?;

    if let Some(format) = print {
        writeln!(out, "{}", render(&transcript, format)?)?;
    }

    writeln!(out, "Transcript files saved to: {}", paths.dir.display())?;
    Ok(())
}

fn render(transcript: &Transcript, format: &PrintFormat) -> yt_transcript::Result<String> {
    match format {
        PrintFormat::Srt => Ok(transcript.to_srt()),
        PrintFormat::Markdown => Ok(transcript.to_markdown()),
        PrintFormat::Json => transcript.to_json(),
    }
}

fn fetch_spinner(video_id: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Fetching captions for {video_id}"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn language_list(languages: &[Language]) -> String {
    languages
        .iter()
        .map(Language::code)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    use super::*;
    use async_trait::async_trait;
    use clap::CommandFactory;
    use yt_transcript::{CaptionTrack, TimedTextEntry, TrackList};

    /// In-memory source keyed by track URL.
    struct StaticSource {
        tracks: Vec<CaptionTrack>,
        entries: HashMap<String, Vec<TimedTextEntry>>,
    }

    #[async_trait]
    impl TranscriptSource for StaticSource {
        async fn list_tracks(&self, _video_id: &VideoId) -> yt_transcript::Result<TrackList> {
            Ok(TrackList {
                title: Some("Test video".into()),
                tracks: self.tracks.clone(),
            })
        }

        async fn fetch_track(
            &self,
            track: &CaptionTrack,
        ) -> yt_transcript::Result<Vec<TimedTextEntry>> {
            self.entries.get(&track.url).cloned().ok_or_else(|| {
                yt_transcript::Error::Fetch(format!("no data for {}", track.url))
            })
        }
    }

    fn source_with(language: &str, kind: TranscriptKind) -> StaticSource {
        let url = format!("mem://{kind}/{language}");
        StaticSource {
            tracks: vec![CaptionTrack {
                language: language.into(),
                name: None,
                kind,
                url: url.clone(),
            }],
            entries: HashMap::from([(
                url,
                vec![
                    TimedTextEntry::new(0.0, 2.0, " hi ").unwrap(),
                    TimedTextEntry::new(2.0, 1.5, "").unwrap(),
                ],
            )]),
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("get-yt-transcript").chain(args.iter().copied()))
            .unwrap()
    }

    fn job_in(dir: &Path, args: &[&str]) -> Job {
        let mut cli = parse(args);
        cli.output_dir = Some(dir.to_path_buf());
        prepare(&cli).ok().unwrap()
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_positional_arguments() {
        let cli = parse(&["dQw4w9WgXcQ", "talk.mp4"]);
        assert_eq!(cli.reference.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(cli.local_file, Some(PathBuf::from("talk.mp4")));
        assert_eq!(cli.languages, vec!["en".to_string()]);
        assert!(!cli.no_auto);
    }

    #[test]
    fn test_cli_reference_is_optional() {
        let cli = parse(&[]);
        assert!(cli.reference.is_none());
    }

    #[test]
    fn test_cli_repeated_languages() {
        let cli = parse(&["dQw4w9WgXcQ", "-l", "de", "--lang", "en", "--no-auto"]);
        assert_eq!(cli.languages, vec!["de".to_string(), "en".to_string()]);
        assert!(cli.no_auto);
    }

    #[test]
    fn test_cli_invalid_print_format_goes_to_stderr() {
        let err = Cli::try_parse_from(["get-yt-transcript", "dQw4w9WgXcQ", "--print", "html"])
            .err()
            .unwrap();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_cli_help_is_not_a_failure() {
        let err = Cli::try_parse_from(["get-yt-transcript", "--help"])
            .err()
            .unwrap();
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_prepare_missing_reference() {
        let failure = prepare(&parse(&[])).err().unwrap();
        assert!(matches!(failure, Failure::Usage));
        assert_eq!(failure.to_string(), USAGE);
    }

    #[test]
    fn test_prepare_bad_reference() {
        let failure = prepare(&parse(&["https://example.com/watch?v=1"]))
            .err()
            .unwrap();
        assert_eq!(
            failure.to_string(),
            "Couldn't extract video ID from 'https://example.com/watch?v=1'"
        );
    }

    #[test]
    fn test_prepare_bad_language() {
        let failure = prepare(&parse(&["dQw4w9WgXcQ", "-l", "english"]))
            .err()
            .unwrap();
        assert!(matches!(
            failure,
            Failure::Error(yt_transcript::Error::InvalidLanguage(_))
        ));
        assert!(failure.to_string().starts_with("Error: "));
    }

    #[test]
    fn test_prepare_resolves_reference() {
        let job = prepare(&parse(&["https://youtu.be/dQw4w9WgXcQ", "-l", "de"]))
            .ok()
            .unwrap();
        assert_eq!(job.video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(job.basename, "dQw4w9WgXcQ");
        assert_eq!(job.options.languages, vec![Language::new("de").unwrap()]);
    }

    #[tokio::test]
    async fn test_run_manual_transcript() {
        let dir = fresh_dir("yt_transcript_cli_test_manual");
        let job = job_in(&dir, &["dQw4w9WgXcQ"]);
        let mut out = Vec::new();

        run(&job, &source_with("en", TranscriptKind::Manual), None, &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Downloading subtitles for: dQw4w9WgXcQ");
        assert!(!out.contains("auto-generated"));
        assert_eq!(
            lines[1],
            format!("-> {}", dir.join("dQw4w9WgXcQ.en.srt").display())
        );
        let saved = format!("Transcript files saved to: {}", dir.display());
        assert_eq!(lines.last().copied(), Some(saved.as_str()));
        assert_eq!(fs::read_to_string(dir.join("dQw4w9WgXcQ.md")).unwrap(), "hi");

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_run_generated_fallback_notice() {
        let dir = fresh_dir("yt_transcript_cli_test_generated");
        let job = job_in(&dir, &["dQw4w9WgXcQ"]);
        let mut out = Vec::new();

        run(&job, &source_with("en", TranscriptKind::Generated), None, &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out.lines().nth(1),
            Some("No manual en subtitles found, using auto-generated captions")
        );
        assert!(dir.join("dQw4w9WgXcQ.en.srt").is_file());

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_run_regional_track_names_srt_after_requested_language() {
        let dir = fresh_dir("yt_transcript_cli_test_regional");
        let job = job_in(&dir, &["dQw4w9WgXcQ"]);
        let mut out = Vec::new();

        run(&job, &source_with("en-GB", TranscriptKind::Manual), None, &mut out)
            .await
            .unwrap();

        assert!(dir.join("dQw4w9WgXcQ.en.srt").is_file());
        assert!(!dir.join("dQw4w9WgXcQ.en-GB.srt").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_run_prints_requested_rendering() {
        let dir = fresh_dir("yt_transcript_cli_test_print");
        let job = job_in(&dir, &["dQw4w9WgXcQ"]);
        let mut out = Vec::new();

        let source = source_with("en", TranscriptKind::Manual);
        run(&job, &source, Some(&PrintFormat::Markdown), &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[lines.len() - 2], "hi");

        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_run_transcript_not_found() {
        let dir = fresh_dir("yt_transcript_cli_test_missing");
        let job = job_in(&dir, &["dQw4w9WgXcQ", "--no-auto"]);
        let mut out = Vec::new();

        let source = source_with("en", TranscriptKind::Generated);
        let failure = run(&job, &source, None, &mut out).await.err().unwrap();

        assert!(matches!(
            failure,
            Failure::Error(yt_transcript::Error::TranscriptNotFound { .. })
        ));
        assert!(failure.to_string().starts_with("Error: "));
        assert!(!dir.exists());
    }

    #[test]
    fn test_render_markdown() {
        let transcript = Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            language: Language::default(),
            track_language: "en".into(),
            kind: TranscriptKind::Manual,
            title: None,
            entries: vec![TimedTextEntry::new(0.0, 1.0, " hi ").unwrap()],
        };
        assert_eq!(render(&transcript, &PrintFormat::Markdown).unwrap(), "hi");
    }

    #[test]
    fn test_language_list() {
        let langs = [Language::new("en").unwrap(), Language::new("de").unwrap()];
        assert_eq!(language_list(&langs), "en/de");
    }
}
