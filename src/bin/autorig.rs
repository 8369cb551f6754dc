use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "autorig", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a layered model from a character image.
    Extract(ExtractArgs),
    /// Render a single frame of an exported model as a PNG.
    Frame(FrameArgs),
    /// Render one pass of a clip as numbered PNGs.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input PNG or JPEG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output model directory.
    #[arg(long)]
    out: PathBuf,

    /// Optional JSON config (mask, extract, render, clips).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional JSON detector outputs (summary, pose, partPaths, parts, faceLandmarks).
    #[arg(long)]
    inputs: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Exported model directory.
    #[arg(long)]
    model: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Clip to sample; the rest pose is rendered when omitted.
    #[arg(long)]
    clip: Option<String>,

    /// Time into the clip.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Layer ids to leave out.
    #[arg(long)]
    hide: Vec<String>,

    /// Optional JSON config; only the render section is used.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Exported model directory.
    #[arg(long)]
    model: PathBuf,

    /// Clip to render.
    #[arg(long)]
    clip: String,

    /// Output directory for `frame_NNNN.png`.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Optional JSON config; only the render section is used.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Extract(args) => cmd_extract(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<autorig::AutorigConfig> {
    match path {
        Some(p) => Ok(autorig::AutorigConfig::load(p)?),
        None => Ok(autorig::AutorigConfig::default()),
    }
}

fn read_inputs(path: Option<&Path>) -> anyhow::Result<autorig::DetectorInputs> {
    let Some(path) = path else {
        return Ok(autorig::DetectorInputs::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("open detector inputs '{}'", path.display()))?;
    serde_json::from_str(&s).with_context(|| "parse detector inputs JSON")
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let inputs = read_inputs(args.inputs.as_deref())?;
    let image = autorig::load_image(&args.in_path)?;

    let model = autorig::CharacterModel::build(&image, &inputs, &config)?;
    autorig::export_model(&model, &args.out)?;

    for layer in model.layers() {
        let state = if layer.has_content { "" } else { " (empty)" };
        eprintln!("  {}{state}", layer.id);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let model = autorig::import_model(&args.model)?;
    let compositor = autorig::Compositor::new(&model, config.render);

    let mut visibility = autorig::LayerVisibility::all_visible();
    for id in args.hide {
        visibility.hide(id);
    }

    let mut state = autorig::AnimationState::idle();
    if let Some(name) = &args.clip {
        state.start(model.clips().require(name)?, 0.0);
    }
    let frame = compositor.render(&state, args.at_ms, &visibility)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    autorig::save_png(&args.out, &frame.to_raster()?)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let model = autorig::import_model(&args.model)?;
    let compositor = autorig::Compositor::new(&model, config.render);

    let frames = autorig::render_clip_frames(
        &compositor,
        &args.clip,
        args.fps,
        &autorig::LayerVisibility::all_visible(),
    )?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        autorig::save_png(&args.out.join(format!("frame_{i:04}.png")), &frame.to_raster()?)?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out.display());
    Ok(())
}
