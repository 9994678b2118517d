use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use photostrip::{
    ComposeContext, ComposeOptions, FilterKey, FsOverlaySource, LayoutId, Photo, PhotoManifest,
    PhotoSource, StripConfig, StripSession, compose_with_token, export_png, fontdb_with_dir,
};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    /// Log pipeline decisions (layout, canvas size, slot inference) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose photos into a strip and write it as PNG.
    Compose(ComposeArgs),
    /// List the layouts of the registry.
    Layouts(ConfigArgs),
    /// List the frame color presets.
    Colors(ConfigArgs),
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Strip config JSON; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Layout key or alias (`three-slot`/`3`, `four-slot`/`4v`, `four-grid`/`4h`).
    #[arg(long)]
    layout: Option<LayoutId>,

    /// Frame color as `#rrggbb`.
    #[arg(long)]
    color: Option<String>,

    /// Photo file, in capture order. Repeatable.
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,

    /// Filter preset applied to every `--photo`.
    #[arg(long)]
    filter: Option<FilterKey>,

    /// Saved capture session JSON; its photos come before any `--photo`.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Directory holding the overlay templates. Fonts in it, or in its `fonts/`
    /// subdirectory, are available to overlay text.
    #[arg(long, default_value = "templates")]
    templates: PathBuf,

    /// Output PNG path; the config's `export_file_name` in the working directory when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Outline slots and black out the empty ones.
    #[arg(long, default_value_t = false)]
    debug_slots: bool,

    /// With fewer photos than slots, switch to a layout holding exactly that many.
    #[arg(long, default_value_t = false)]
    match_layout: bool,

    /// Override rayon worker threads for photo preparation.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Layouts(args) => cmd_layouts(args),
        Command::Colors(args) => cmd_colors(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<StripConfig> {
    match &args.config {
        Some(path) => Ok(StripConfig::from_path(path)?),
        None => Ok(StripConfig::default()),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;

    let mut photos = Vec::new();
    let mut manifest_layout = None;
    let mut manifest_color = None;
    if let Some(path) = &args.manifest {
        let manifest = PhotoManifest::from_path(path)?;
        manifest_layout = manifest.layout;
        manifest_color = manifest.frame_color;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        photos.extend(manifest.into_photos(base_dir)?);
    }
    photos.extend(args.photos.iter().map(|p| Photo {
        source: PhotoSource::Path(p.clone()),
        filter: args.filter,
        adjustments: None,
    }));
    if photos.is_empty() {
        anyhow::bail!("no photos given; pass --photo or --manifest");
    }

    let session = StripSession::new(manifest_color.unwrap_or(config.default_frame_color));
    if let Some(color) = &args.color
        && let Err(e) = session.set_frame_color(color)
    {
        eprintln!("warning: {e}; keeping {}", session.frame_color());
    }

    let layout = args
        .layout
        .or(manifest_layout)
        .unwrap_or(LayoutId::ThreeSlot);
    let overlays = FsOverlaySource::new(&args.templates);
    let ctx = ComposeContext::new(&config, &overlays)
        .with_options(ComposeOptions {
            match_layout_to_photos: args.match_layout,
            debug_slots: args.debug_slots,
            threads: args.threads,
        })
        .with_fonts(fontdb_with_dir(&args.templates));

    let token = session.begin_run();
    let strip = compose_with_token(&photos, layout, session.frame_color(), &ctx, &token)
        .with_context(|| format!("compose {layout} strip"))?;
    for diagnostic in &strip.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let (dir, file_name) = match &args.out {
        Some(out) => {
            let name = out
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("output path '{}' has no file name", out.display()))?;
            let dir = match out.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            (dir, name)
        }
        None => (Path::new("."), config.export_file_name.as_str()),
    };
    let path = export_png(&strip.canvas, dir, file_name)?;
    eprintln!(
        "wrote {} ({}x{}, {} of {} slots filled)",
        path.display(),
        strip.canvas.width(),
        strip.canvas.height(),
        strip.filled.iter().filter(|f| **f).count(),
        strip.slots.len()
    );
    Ok(())
}

fn cmd_layouts(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    for layout in config.layouts.iter() {
        println!(
            "{}\t{}\t{} slots\t{}",
            layout.id,
            layout.id.short_key(),
            layout.slot_count(),
            layout.overlay
        );
    }
    Ok(())
}

fn cmd_colors(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    for color in &config.color_presets {
        let marker = if *color == config.default_frame_color {
            " (default)"
        } else {
            ""
        };
        println!("{color}{marker}");
    }
    Ok(())
}
