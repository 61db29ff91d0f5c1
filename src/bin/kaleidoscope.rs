use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kaleidoscope::encode::png::save_png;
use kaleidoscope::scene::layout::layout_wedges;
use kaleidoscope::{
    FfmpegSink, FfmpegSinkOpts, FrameIndex, FrameRange, KaleidoscopeConfig, PngSequenceSink,
    RenderSession,
};

#[derive(Parser, Debug)]
#[command(name = "kaleidoscope", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame range as numbered PNGs.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the wedge layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Kaleidoscope config JSON. Source images resolve relative to its directory.
    #[arg(long)]
    config: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Kaleidoscope config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive). Defaults to the configured duration.
    #[arg(long)]
    end: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Kaleidoscope config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Kaleidoscope config JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn load_session(config_path: &Path) -> anyhow::Result<(KaleidoscopeConfig, RenderSession)> {
    let config = KaleidoscopeConfig::from_path(config_path)
        .with_context(|| format!("load config '{}'", config_path.display()))?;
    let assets_root = config_path.parent().unwrap_or_else(|| Path::new("."));
    let sess = RenderSession::new(config.clone(), assets_root)
        .with_context(|| format!("set up kaleidoscope from '{}'", config_path.display()))?;
    Ok((config, sess))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, mut sess) = load_session(&args.config)?;
    let frame = sess
        .render_frame(FrameIndex(args.frame))
        .with_context(|| format!("render frame {}", args.frame))?;
    save_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (config, mut sess) = load_session(&args.config)?;
    let end = args.end.unwrap_or(config.duration);
    let range = FrameRange::new(FrameIndex(args.start), FrameIndex(end))?;

    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = sess.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (config, mut sess) = load_session(&args.config)?;

    let sink_opts = FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
    };
    let mut sink = FfmpegSink::new(sink_opts);
    let _stats = sess.render_range(config.timeline(), &mut sink)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let config = KaleidoscopeConfig::from_path(&args.config)
        .with_context(|| format!("load config '{}'", args.config.display()))?;
    config.validate()?;
    let layout = layout_wedges(config.canvas, config.fragment_count, config.clip_inset)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
