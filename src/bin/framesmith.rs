use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use framesmith::{
    BatchOpts, EffectOrder, JobPaths, ScalingMode, Settings, compute_target, preview_all,
};

#[derive(Parser, Debug)]
#[command(name = "framesmith", version, about)]
struct Cli {
    /// Settings JSON. Missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, process and place every frame of a video (requires `ffmpeg` on PATH).
    Run(RunArgs),
    /// Process an existing directory of numbered PNG frames.
    Process(ProcessArgs),
    /// Render the middle frame of a video with the current settings.
    Preview(PreviewArgs),
    /// Print the output size of every scaling mode for a source size.
    Plan(PlanArgs),
    /// Write the default settings as JSON.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Extraction frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Scaling mode (A-E).
    #[arg(long, value_parser = parse_mode)]
    mode: Option<ScalingMode>,

    /// Disable scaling.
    #[arg(long)]
    no_scale: bool,

    /// Effect order.
    #[arg(long, value_enum)]
    order: Option<OrderChoice>,

    /// Disable corner/feather/blur processing.
    #[arg(long)]
    no_effects: bool,

    /// Centre frames on the configured canvas.
    #[arg(long)]
    canvas: bool,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory. Defaults to a directory named after the video, next to it.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Directory of numbered PNG frames.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output directory (may equal the input).
    #[arg(long)]
    out: PathBuf,

    /// Worker threads (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Apply the scaling settings in-core, sized from the first frame.
    #[arg(long)]
    scale: bool,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Probe the size from this video instead of --width/--height.
    #[arg(long = "in", conflicts_with_all = ["width", "height"])]
    in_path: Option<PathBuf>,

    /// Source width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Source height.
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct InitConfigArgs {
    /// Where to write the settings.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderChoice {
    #[value(name = "C-F-B")]
    CornerFeatherBlur,
    #[value(name = "C-B-F")]
    CornerBlurFeather,
}

impl From<OrderChoice> for EffectOrder {
    fn from(c: OrderChoice) -> Self {
        match c {
            OrderChoice::CornerFeatherBlur => EffectOrder::CornerFeatherBlur,
            OrderChoice::CornerBlurFeather => EffectOrder::CornerBlurFeather,
        }
    }
}

fn parse_mode(s: &str) -> Result<ScalingMode, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ScalingMode::from_letter(c).map_err(|e| e.to_string()),
        _ => Err(format!("expected a single mode letter A-E, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;
    match cli.cmd {
        Command::Run(args) => cmd_run(args, settings),
        Command::Process(args) => cmd_process(args, settings),
        Command::Preview(args) => cmd_preview(args, settings),
        Command::Plan(args) => cmd_plan(args, &settings),
        Command::InitConfig(args) => cmd_init_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "framesmith=info",
        1 => "framesmith=debug",
        _ => "framesmith=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(p) => {
            Settings::load_json(p).with_context(|| format!("load settings '{}'", p.display()))
        }
        None => Ok(Settings::default()),
    }
}

fn apply_overrides(mut settings: Settings, o: &Overrides) -> anyhow::Result<Settings> {
    if let Some(fps) = o.fps {
        settings.extraction.fps = fps;
    }
    if let Some(mode) = o.mode {
        settings.scaling.mode = mode;
    }
    if o.no_scale {
        settings.scaling.enabled = false;
    }
    if let Some(order) = o.order {
        settings.processing.order = order.into();
    }
    if o.no_effects {
        settings.processing.enabled = false;
    }
    if o.canvas {
        settings.composition.enabled = true;
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn cmd_run(args: RunArgs, settings: Settings) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.overrides)?;
    let paths = JobPaths::new(&args.in_path, args.out);
    let opts = BatchOpts {
        threads: args.threads,
        ..BatchOpts::default()
    };

    let report = framesmith::run_job(&paths, &settings, &opts, None)
        .with_context(|| format!("process video '{}'", paths.input.display()))?;
    if let Some(scale) = report.scale {
        tracing::info!(?scale, original = ?report.original, "scaled during extraction");
    }

    eprintln!(
        "wrote {} frames to {}",
        report.stats.frames_total,
        paths.output_dir.display()
    );
    Ok(())
}

fn cmd_process(args: ProcessArgs, settings: Settings) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.overrides)?;

    let resize = if args.scale {
        let frames = framesmith::scan_frames(&args.in_dir)?;
        match frames.first() {
            Some(first) => {
                let dims = image::image_dimensions(&first.path)
                    .with_context(|| format!("read size of '{}'", first.path.display()))?;
                compute_target(dims, &settings.scaling)
            }
            None => None,
        }
    } else {
        None
    };

    let opts = BatchOpts {
        threads: args.threads,
        resize,
        ..BatchOpts::default()
    };
    let stats = framesmith::process_sequence(&args.in_dir, &args.out, &settings, &opts, None)
        .with_context(|| format!("process frames in '{}'", args.in_dir.display()))?;

    eprintln!("wrote {} frames to {}", stats.frames_total, args.out.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs, settings: Settings) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.overrides)?;
    framesmith::render_preview(&args.in_path, &args.out, &settings)
        .with_context(|| format!("preview '{}'", args.in_path.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs, settings: &Settings) -> anyhow::Result<()> {
    let original = match (args.in_path, args.width, args.height) {
        (Some(path), _, _) => framesmith::probe_dimensions(&path)
            .with_context(|| format!("probe '{}'", path.display()))?,
        (None, Some(w), Some(h)) => (w, h),
        _ => anyhow::bail!("pass --in VIDEO or both --width and --height"),
    };

    println!("source {}x{}", original.0, original.1);
    for (mode, (w, h)) in preview_all(original, &settings.scaling) {
        let marker = if settings.scaling.enabled && mode == settings.scaling.mode {
            "*"
        } else {
            " "
        };
        println!("{marker} {} -> {w}x{h}", mode.letter());
    }
    Ok(())
}

fn cmd_init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Settings::default()
        .save_json(&args.out)
        .with_context(|| format!("write settings '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
