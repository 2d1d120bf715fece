use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "circuitwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the scene as a numbered PNG sequence.
    Pngs(PngsArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,

    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PngsArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the scene duration.
    #[arg(long)]
    end: Option<u64>,

    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Pngs(args) => cmd_pngs(args),
    }
}

fn load_scene(path: &std::path::Path, seed: Option<u64>) -> anyhow::Result<circuitwave::Scene> {
    let mut scene = circuitwave::Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    if let Some(seed) = seed {
        scene.seed = seed;
    }
    Ok(scene)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path, args.seed)?;
    let mut sess = circuitwave::RenderSession::new(&scene)?;
    let frame = sess.render_frame(circuitwave::FrameIndex(args.frame))?;

    circuitwave::encode::write_png(&args.out, &frame, background(&scene))
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path, args.seed)?;
    let mut sess = circuitwave::RenderSession::new(&scene)?;

    let sink_opts = circuitwave::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        background: background(&scene),
    };
    let mut sink = circuitwave::FfmpegSink::new(sink_opts);
    let stats = sess.render_range(scene.range(), &mut sink)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}

fn cmd_pngs(args: PngsArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path, args.seed)?;
    let mut sess = circuitwave::RenderSession::new(&scene)?;

    let end = args.end.unwrap_or(scene.duration);
    let range =
        circuitwave::FrameRange::new(circuitwave::FrameIndex(args.start), circuitwave::FrameIndex(end))?;
    let mut sink =
        circuitwave::PngSequenceSink::new(&args.out_dir).with_background(background(&scene));
    let stats = sess.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out_dir.display()
    );
    Ok(())
}

fn background(scene: &circuitwave::Scene) -> circuitwave::Rgb8 {
    scene
        .circuit
        .as_ref()
        .map_or_else(|| circuitwave::Palette::default().background, |c| c.palette.background)
}
