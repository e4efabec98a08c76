use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scorelight::{
    FfmpegSink, FfmpegSinkOpts, FrameIndex, FrameRange, FrameStream, PngSequenceSink, Project,
    RenderSession, RenderSessionOpts, Timeline,
};

#[derive(Parser, Debug)]
#[command(name = "scorelight", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render every frame as a numbered PNG.
    Pngs(PngsArgs),
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Project JSON naming the page, layout, timestamps and filters.
    #[arg(long)]
    project: PathBuf,

    /// Override the frame rate (frames per second, integer).
    #[arg(long)]
    fps: Option<u32>,

    /// Override the output window height in pixels.
    #[arg(long)]
    window_height: Option<u32>,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,
}

impl ProjectArgs {
    fn load(&self) -> anyhow::Result<(Project, Timeline)> {
        let mut project = Project::from_path(&self.project)
            .with_context(|| format!("load project '{}'", self.project.display()))?;
        if let Some(fps) = self.fps {
            project.timeline.fps = scorelight::Fps::new(fps, 1)?;
        }
        if let Some(h) = self.window_height {
            project.timeline.window_height = h;
        }
        if let Some(seed) = self.seed {
            project.timeline.seed = seed;
        }
        let timeline = project.load_timeline()?;
        Ok((project, timeline))
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Frame index.
    #[arg(long)]
    frame: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Write the whole composited page instead of the viewport window.
    #[arg(long, default_value_t = false)]
    full_page: bool,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First frame (defaults to the timeline start).
    #[arg(long)]
    start: Option<i64>,

    /// Last frame, inclusive (defaults to the timeline end).
    #[arg(long)]
    end: Option<i64>,

    /// Evaluate bars of a frame in parallel.
    #[arg(long, default_value_t = false)]
    parallel_bars: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

impl RangeArgs {
    fn range(&self, timeline: &Timeline) -> anyhow::Result<FrameRange> {
        let full = timeline.frame_range();
        Ok(FrameRange::new(
            self.start.map_or(full.start, FrameIndex),
            self.end.map_or(full.end, FrameIndex),
        )?)
    }

    fn session_opts(&self, audio: Option<PathBuf>) -> RenderSessionOpts {
        RenderSessionOpts {
            parallel_bars: self.parallel_bars,
            threads: self.threads,
            cancel: None,
            audio,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    range: RangeArgs,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists (`--overwrite false` to refuse).
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    overwrite: bool,

    /// Skip muxing the project's audio track.
    #[arg(long, default_value_t = false)]
    no_audio: bool,
}

#[derive(Parser, Debug)]
struct PngsArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    range: RangeArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Pngs(args) => cmd_pngs(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, timeline) = args.project.load()?;
    let mut stream = FrameStream::new(&timeline);
    let view = stream.advance(FrameIndex(args.frame))?;

    let (width, height, data) = if args.full_page {
        (view.page.width, view.page.height, view.page.data.clone())
    } else {
        let (w, h) = timeline.window_size();
        (w, h, view.window_rgb(h))
    };

    scorelight::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &data,
        width,
        height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (project, timeline) = args.project.load()?;
    let audio = if args.no_audio { None } else { project.audio };
    let session = RenderSession::new(&timeline, args.range.session_opts(audio));

    let mut sink_opts = FfmpegSinkOpts::new(&args.out);
    sink_opts.overwrite = args.overwrite;
    let mut sink = FfmpegSink::new(sink_opts);
    let stats = session.render_range(args.range.range(&timeline)?, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_rendered
    );
    Ok(())
}

fn cmd_pngs(args: PngsArgs) -> anyhow::Result<()> {
    let (_, timeline) = args.project.load()?;
    let session = RenderSession::new(&timeline, args.range.session_opts(None));

    let mut sink = PngSequenceSink::new(&args.out_dir);
    let stats = session.render_range(args.range.range(&timeline)?, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}
