use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stillclip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the audio loop plan for a source/target duration pair as JSON.
    Plan(PlanArgs),
    /// Render the letterboxed still frame as a PNG.
    Frame(FrameArgs),
    /// Render, export and save a clip (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Audio source length (`secs`, `secs.frac` or `value/timescale`).
    #[arg(long)]
    source: stillclip::Duration,

    /// Target clip length (`secs`, `secs.frac` or `value/timescale`).
    #[arg(long)]
    target: stillclip::Duration,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input still image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional pipeline config JSON (canvas and background are used).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input still image.
    #[arg(long)]
    image: PathBuf,

    /// Audio clip looped under the image.
    #[arg(long)]
    audio: PathBuf,

    /// Optional pipeline config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Library directory (overrides the config).
    #[arg(long)]
    library: Option<PathBuf>,

    /// Clip length (overrides the config).
    #[arg(long)]
    duration: Option<stillclip::Duration>,

    /// Open the saved clip in the configured player.
    #[arg(long, default_value_t = false)]
    play: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<stillclip::PipelineConfig> {
    match path {
        Some(p) => stillclip::PipelineConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(stillclip::PipelineConfig::default()),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let plan = stillclip::compute_audio_loop_plan(args.source, args.target)?;
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let image = stillclip::load_still(&args.image)?;
    let frame = stillclip::render_still(&image, cfg.canvas, cfg.background)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(dir) = args.library {
        cfg.library_dir = dir;
    }
    if let Some(d) = args.duration {
        cfg.duration = d;
    }

    let library = stillclip::DirectoryLibrary::new(cfg.library_dir.clone());
    let player = cfg.player.clone();
    let presenter: &dyn stillclip::Presenter = if args.play {
        &player
    } else {
        &stillclip::NullPresenter
    };

    let pipeline = stillclip::Pipeline::new(cfg, &library, presenter)?;
    let req = stillclip::PipelineRequest {
        image: args.image,
        audio: args.audio,
    };
    let out = match pipeline.run(&req) {
        Ok(out) => out,
        Err(e) if e.is_permission_denied() => {
            return Err(e).with_context(|| {
                format!(
                    "library '{}' is not writable; grant access and retry",
                    library.root().display()
                )
            });
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", out.saved_path.display());
    Ok(())
}
