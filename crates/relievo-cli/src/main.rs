use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use relievo_cli::{convert, still};
use relievo_core::RelievoConfig;

#[derive(Parser)]
#[command(
    name = "relievo",
    version,
    about = "Relievo — 2D video to red/cyan anaglyph 3D",
    long_about = "Relievo converts ordinary 2D footage into pseudo-3D red/cyan anaglyph video.\nDepth is estimated from image gradients and turned into horizontal pixel\nshifts that synthesize a stereo pair, viewable with red/cyan glasses."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a 2D video into a red/cyan anaglyph video
    Convert {
        /// Path to the input video
        input: PathBuf,

        /// Output video path
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum horizontal pixel shift at full depth (default: 20)
        #[arg(long)]
        max_disparity: Option<u32>,

        /// FFmpeg encoder for the output file (default: libx264)
        #[arg(long)]
        codec: Option<String>,

        /// Show a live preview window while converting
        #[arg(long)]
        preview: bool,

        /// Key that cancels a running conversion (default: q)
        #[arg(long)]
        cancel_key: Option<char>,

        /// Path to a relievo.toml config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert a single still image into an anaglyph image
    Still {
        /// Path to the input image
        input: PathBuf,

        /// Output image path (format inferred from extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum horizontal pixel shift at full depth (default: 20)
        #[arg(long)]
        max_disparity: Option<u32>,
    },

    /// Print metadata about a video file
    Probe {
        /// Path to the video file to probe
        file: PathBuf,
    },

    /// Check that the FFmpeg tool family is installed
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            max_disparity,
            codec,
            preview,
            cancel_key,
            config,
        } => cmd_convert(
            input,
            output,
            max_disparity,
            codec,
            preview,
            cancel_key,
            config,
        ),
        Commands::Still {
            input,
            output,
            max_disparity,
        } => still::run(
            &input,
            &output,
            max_disparity.unwrap_or_else(|| RelievoConfig::default().stereo.max_disparity),
        ),
        Commands::Probe { file } => cmd_probe(&file),
        Commands::Doctor => cmd_doctor(),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    input: PathBuf,
    output: PathBuf,
    max_disparity: Option<u32>,
    codec: Option<String>,
    preview: bool,
    cancel_key: Option<char>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let opts = convert::ConvertOptions {
        input,
        output,
        max_disparity: max_disparity.unwrap_or(config.stereo.max_disparity),
        codec: codec.unwrap_or(config.output.codec),
        preview: preview || config.preview.enabled,
        cancel_key: cancel_key.unwrap_or(config.preview.cancel_key),
    };

    let summary = convert::run(&opts)?;

    println!(
        "🎬 Wrote {} ({} frames, {}x{} @ {:.3}fps){}",
        opts.output.display(),
        summary.frames_written,
        summary.width,
        summary.height,
        summary.fps,
        if summary.cancelled { " — cancelled" } else { "" }
    );
    println!("   content hash: {}", summary.content_hash);
    Ok(())
}

/// Load config from an explicit path, from ./relievo.toml when present, or
/// fall back to the built-in defaults.
fn load_config(path: Option<PathBuf>) -> Result<RelievoConfig> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = PathBuf::from("relievo.toml");
            if !default.exists() {
                return Ok(RelievoConfig::default());
            }
            default
        }
    };
    RelievoConfig::load_from_file(&path)
        .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e))
}

fn cmd_probe(file: &std::path::Path) -> Result<()> {
    let info = relievo_render::video_decoder::probe(file)?;
    println!("📹 {}", file.display());
    println!("   dimensions: {}x{}", info.width, info.height);
    println!("   frame rate: {:.3} fps", info.fps);
    println!("   duration:   {:.3}s", info.duration_secs);
    println!("   frames:     ~{}", info.frame_count);
    Ok(())
}

fn cmd_doctor() -> Result<()> {
    println!("🩺 Relievo Doctor");
    println!("   CLI version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "   OS: {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    let checks = [
        ("ffmpeg (decode/encode)", relievo_render::video_decoder::ffmpeg_available()),
        ("ffprobe (metadata)", relievo_render::video_decoder::ffprobe_available()),
        ("ffplay (preview)", relievo_encode::PreviewWindow::is_available()),
    ];

    let mut missing = false;
    for (name, available) in checks {
        println!("   {} {}", if available { "✓" } else { "✗" }, name);
        missing |= !available;
    }

    if missing {
        println!("   Install FFmpeg: https://ffmpeg.org/download.html");
    } else {
        println!("   All good.");
    }
    Ok(())
}
