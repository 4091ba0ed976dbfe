use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "panelforge", version)]
struct Cli {
    /// Enable debug-level tracing output.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one scene descriptor as a PNG panel.
    Frame(FrameArgs),
    /// Render a pose transition as a horizontal strip of sample frames.
    Transition(TransitionArgs),
    /// Map a descriptor and print the resulting scene parameters as JSON.
    Map(MapArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene descriptor JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Panel width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Panel height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Substitute the neutral scene instead of failing on a bad descriptor.
    #[arg(long)]
    lenient: bool,
}

#[derive(Parser, Debug)]
struct TransitionArgs {
    /// Starting pose name.
    #[arg(long)]
    from: String,

    /// Target pose name.
    #[arg(long)]
    to: String,

    /// Number of transition steps.
    #[arg(long, default_value_t = panelforge::transition::DEFAULT_TRANSITION_STEPS)]
    steps: usize,

    /// How many intermediate frames to write into the strip.
    #[arg(long, default_value_t = 6)]
    samples: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Width of each sample frame in pixels.
    #[arg(long, default_value_t = 240)]
    width: u32,

    /// Height of each sample frame in pixels.
    #[arg(long, default_value_t = 360)]
    height: u32,
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// Input scene descriptor JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also print which mapping rules fired.
    #[arg(long)]
    report: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Transition(args) => cmd_transition(args),
        Command::Map(args) => cmd_map(args),
    }
}

fn read_descriptor_json(path: &Path) -> anyhow::Result<panelforge::SceneDescriptor> {
    let f = File::open(path).with_context(|| format!("open descriptor '{}'", path.display()))?;
    let r = BufReader::new(f);
    let descriptor: panelforge::SceneDescriptor =
        serde_json::from_reader(r).with_context(|| "parse descriptor JSON")?;
    Ok(descriptor)
}

fn write_png(path: &Path, frame: panelforge::RasterFrame) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let straight = frame.into_unpremultiplied();
    image::save_buffer_with_format(
        path,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let descriptor = read_descriptor_json(&args.in_path)?;
    let bounds = panelforge::PanelBounds::new(args.width, args.height)?;
    let settings = panelforge::RenderSettings::new(bounds);

    let frame = if args.lenient {
        panelforge::render_panel_or_neutral(&descriptor, &settings)?
    } else {
        panelforge::render_panel(&descriptor, &settings)?
    };

    write_png(&args.out, frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_transition(args: TransitionArgs) -> anyhow::Result<()> {
    if args.samples == 0 {
        anyhow::bail!("--samples must be >= 1");
    }

    let skeleton = panelforge::Skeleton::humanoid();
    let from = panelforge::pose::resolve_pose(&args.from)?;
    let to = panelforge::pose::resolve_pose(&args.to)?;
    let states = panelforge::pose_transition(&skeleton, from, to, args.steps)?;

    let bounds = panelforge::PanelBounds::new(args.width, args.height)?;
    let settings = panelforge::RenderSettings::new(bounds);

    let mut character = panelforge::CharacterParams::invisible();
    character.visible = true;
    let mut params = panelforge::SceneParameters::neutral();
    params.character = character;

    // Evenly spaced sample states, always including both endpoints.
    let mut strip =
        image::RgbaImage::new(args.width * args.samples as u32, args.height);
    for i in 0..args.samples {
        let t = if args.samples == 1 {
            0.0
        } else {
            i as f64 / (args.samples - 1) as f64
        };
        let idx = ((states.len() - 1) as f64 * t).round() as usize;
        let frame = render_posed(&params, &skeleton, &states[idx], &settings)?;

        let straight = frame.into_unpremultiplied();
        let tile = image::RgbaImage::from_raw(args.width, args.height, straight.data)
            .context("raster frame size mismatch")?;
        image::imageops::replace(&mut strip, &tile, i64::from(args.width * i as u32), 0);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    strip
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn render_posed(
    params: &panelforge::SceneParameters,
    skeleton: &panelforge::Skeleton,
    state: &panelforge::SkeletonState,
    settings: &panelforge::RenderSettings,
) -> anyhow::Result<panelforge::RasterFrame> {
    let camera = panelforge::render::ViewCamera::new(&params.camera, settings.bounds)?;
    let expression = panelforge::expression::resolve_expression(&params.character.expression)?;
    let mut prims = panelforge::render::environment::background_primitives(
        &params.background,
        &params.composition.foreground,
    );
    prims.extend(panelforge::render::figure::character_primitives(
        &params.character,
        skeleton,
        state,
        expression,
    ));
    prims.sort_by_key(|p| p.category);

    let mut fills = Vec::new();
    for prim in &prims {
        if let Ok(cmds) = panelforge::render::primitives::project_primitive(&camera, &prim.shape)
        {
            fills.extend(cmds);
        }
    }
    Ok(panelforge::render::rasterize(
        settings.bounds,
        settings.clear,
        &fills,
    )?)
}

fn cmd_map(args: MapArgs) -> anyhow::Result<()> {
    let descriptor = read_descriptor_json(&args.in_path)?;
    let (params, report) = panelforge::map_with_report(&descriptor)?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    if args.report {
        eprintln!("fired rules:");
        for rule in &report.fired_rules {
            eprintln!("  {rule}");
        }
    }
    Ok(())
}
