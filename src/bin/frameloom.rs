use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    thread,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use frameloom::{
    AssembleOptions, ExtractOptions, FfmpegLogLevel, FrameExtractor, FrameFormat,
    ProgressCallback, ProgressInfo, VideoAssembler, VideoCodec, VideoSource,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  frameloom extract input.mp4 --out frames --progress\n  frameloom assemble frames --out timelapse --fps 24 --progress\n  frameloom probe input.mp4 --json\n  frameloom completions zsh > _frameloom";

#[derive(Debug, Parser)]
#[command(
    name = "frameloom",
    version,
    about = "Split a video into still frames and stitch stills back into a video",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Split a video into numbered still frames.
    #[command(
        about = "Extract every video frame to an image directory",
        after_help = "Examples:\n  frameloom extract input.mp4 --out frames\n  frameloom extract input.mp4 --out frames --ext png --progress"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Output directory for frame images (created if missing).
        #[arg(long)]
        out: PathBuf,
        /// Output image format (jpg, png).
        #[arg(long, default_value = "jpg")]
        ext: String,
    },

    /// Stitch a folder of images into a video.
    #[command(
        about = "Assemble an image directory into a video",
        after_help = "Examples:\n  frameloom assemble frames --out timelapse\n  frameloom assemble frames --out clip.mp4 --fps 60 --width 1920 --height 1080"
    )]
    Assemble {
        /// Directory of .jpg/.png images, processed in sorted-name order.
        image_dir: PathBuf,
        /// Output video name; `.mp4` is appended if missing, and an
        /// existing file is never overwritten (`name_1.mp4`, ...).
        #[arg(long)]
        out: String,
        /// Output frame rate.
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Output width; inferred from the first image if omitted.
        #[arg(long)]
        width: Option<u32>,
        /// Output height; inferred from the first image if omitted.
        #[arg(long)]
        height: Option<u32>,
        /// Output codec (mpeg4, h264).
        #[arg(long, default_value = "mpeg4")]
        codec: String,
        /// Sleep ~1/fps per frame so progress animates at playback speed.
        #[arg(long)]
        paced: bool,
    },

    /// Print video metadata (dimensions, frame rate, advisory frame count).
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  frameloom probe input.mp4\n  frameloom probe input.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_frame_format(value: &str) -> Option<FrameFormat> {
    match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some(FrameFormat::Jpeg),
        "png" => Some(FrameFormat::Png),
        _ => None,
    }
}

fn parse_codec(value: &str) -> Option<VideoCodec> {
    match value.to_ascii_lowercase().as_str() {
        "mpeg4" | "mp4v" => Some(VideoCodec::Mpeg4),
        "h264" | "avc" => Some(VideoCodec::H264),
        _ => None,
    }
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        frameloom::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

/// Renders library progress events onto an indicatif bar.
///
/// The extractor's total is advisory, so the bar length follows whatever the
/// event reports; the terminal event snaps it to the true frame count.
struct TerminalProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if info.completed {
            self.bar.finish_with_message("done");
        } else if self.verbose {
            self.bar.set_message(info.to_string());
        }
    }
}

fn terminal_progress(global: &GlobalOptions) -> Result<Option<Arc<TerminalProgress>>, Box<dyn std::error::Error>> {
    if !global.progress {
        return Ok(None);
    }

    let bar = ProgressBar::new(0);
    let style =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    bar.set_style(style.progress_chars("##-"));

    Ok(Some(Arc::new(TerminalProgress {
        bar,
        verbose: global.verbose,
    })))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Extract { input, out, ext } => {
            let format =
                parse_frame_format(&ext).ok_or(format!("unsupported --ext: {ext} (jpg, png)"))?;

            // Input validation happens before the worker starts.
            if !input.exists() {
                return Err(format!("video file not found: {}", input.display()).into());
            }

            // Creating the output directory is the caller's job, not the
            // extractor's.
            fs::create_dir_all(&out)?;

            let mut options = ExtractOptions::new().with_format(format);
            if let Some(progress) = terminal_progress(&cli.global)? {
                options = options.with_progress(progress);
            }

            let worker_input = input.clone();
            let worker_out = out.clone();
            let worker = thread::spawn(move || {
                FrameExtractor::new(options).extract(&worker_input, &worker_out)
            });
            let written = worker
                .join()
                .map_err(|_| "extraction worker panicked")??;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Extracted {written} frame(s) to {}", out.display()).green()
            );
        }
        Commands::Assemble {
            image_dir,
            out,
            fps,
            width,
            height,
            codec,
            paced,
        } => {
            let codec = parse_codec(&codec)
                .ok_or(format!("unsupported --codec: {codec} (mpeg4, h264)"))?;

            // Blocking pre-flight checks, mirrored by the library.
            if out.trim().is_empty() {
                return Err("output name must not be blank".into());
            }
            if fps == 0 {
                return Err("--fps must be greater than 0".into());
            }
            if width == Some(0) || height == Some(0) {
                return Err("--width/--height must be greater than 0".into());
            }
            if !image_dir.is_dir() {
                return Err(format!("image folder not found: {}", image_dir.display()).into());
            }

            let mut options = AssembleOptions::new()
                .with_fps(fps)
                .with_dimensions(width, height)
                .with_codec(codec)
                .with_realtime_pacing(paced);
            if let Some(progress) = terminal_progress(&cli.global)? {
                options = options.with_progress(progress);
            }

            let worker_dir = image_dir.clone();
            let worker = thread::spawn(move || {
                VideoAssembler::new(options).assemble(&worker_dir, &out)
            });
            let output_path = worker
                .join()
                .map_err(|_| "assembly worker panicked")??;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Video written to {}", output_path.display()).green()
            );
        }
        Commands::Probe { input, json } => {
            let source = VideoSource::open(&input)?;
            let metadata = source.metadata();
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "width": metadata.video.width,
                    "height": metadata.video.height,
                    "fps": metadata.video.frames_per_second,
                    "frame_count": metadata.video.frame_count,
                    "codec": metadata.video.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                println!(
                    "Video: {}x{} @ {:.2} fps [{}], ~{} frames",
                    metadata.video.width,
                    metadata.video.height,
                    metadata.video.frames_per_second,
                    metadata.video.codec,
                    metadata.video.frame_count,
                );
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "frameloom", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_codec, parse_frame_format, parse_log_level};

    #[test]
    fn parse_frame_format_aliases() {
        assert!(parse_frame_format("jpg").is_some());
        assert!(parse_frame_format("JPEG").is_some());
        assert!(parse_frame_format(".png").is_some());
        assert!(parse_frame_format("webp").is_none());
    }

    #[test]
    fn parse_codec_aliases() {
        assert!(parse_codec("mpeg4").is_some());
        assert!(parse_codec("mp4v").is_some());
        assert!(parse_codec("H264").is_some());
        assert!(parse_codec("av1").is_none());
    }

    #[test]
    fn parse_log_level_aliases() {
        assert!(parse_log_level("quiet").is_some());
        assert!(parse_log_level("WARN").is_some());
        assert!(parse_log_level("chatty").is_none());
    }
}
