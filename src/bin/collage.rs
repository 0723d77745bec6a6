use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "collage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate collages and masks from a sprite directory.
    Generate(GenerateArgs),
    /// Render a size preview of one sprite on a white canvas.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Sprite root: one sub-directory per label.
    #[arg(long)]
    sprites: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// JSON generation config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resize every sprite to WIDTHxHEIGHT on import.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Per-label import size as LABEL=WIDTHxHEIGHT; repeatable, wins over --resize.
    #[arg(long = "label-size", value_parser = parse_label_size)]
    label_sizes: Vec<(String, (u32, u32))>,

    /// Canvas size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    canvas: Option<(u32, u32)>,

    /// Number of collages to generate.
    #[arg(long)]
    collages: Option<u32>,

    /// Walk iterations per sprite before it is dropped.
    #[arg(long)]
    patience: Option<u32>,

    #[arg(long, value_enum)]
    strategy: Option<StrategyChoice>,

    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for parallel generation.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Sprite image.
    #[arg(long)]
    sprite: PathBuf,

    /// Canvas size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size, default_value = "512x512")]
    canvas: (u32, u32),

    /// Resize the sprite to WIDTHxHEIGHT first.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyChoice {
    Secondary,
    Try,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Pixel,
    Instance,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("size must be at least 1x1".to_string());
    }
    Ok((w, h))
}

fn parse_label_size(s: &str) -> Result<(String, (u32, u32)), String> {
    let (label, size) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=WIDTHxHEIGHT, got '{s}'"))?;
    if label.is_empty() {
        return Err(format!("missing label in '{s}'"));
    }
    Ok((label.to_string(), parse_size(size)?))
}

fn size_policy(resize: Option<(u32, u32)>) -> collage::SizePolicy {
    match resize {
        Some((width, height)) => collage::SizePolicy::Resize { width, height },
        None => collage::SizePolicy::Original,
    }
}

fn build_config(args: &GenerateArgs) -> anyhow::Result<collage::GenerateConfig> {
    let mut cfg = match &args.config {
        Some(path) => collage::GenerateConfig::from_json_file(path)?,
        None => collage::GenerateConfig::default(),
    };
    if let Some((w, h)) = args.canvas {
        cfg.width = w;
        cfg.height = h;
    }
    if let Some(n) = args.collages {
        cfg.collages = n;
    }
    if let Some(p) = args.patience {
        cfg.patience = p;
    }
    if let Some(s) = args.strategy {
        cfg.strategy = match s {
            StrategyChoice::Secondary => collage::Strategy::Secondary,
            StrategyChoice::Try => collage::Strategy::Try,
        };
    }
    if let Some(f) = args.format {
        cfg.format = match f {
            FormatChoice::Pixel => collage::MaskFormat::Pixel,
            FormatChoice::Instance => collage::MaskFormat::Instance,
        };
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    if args.resize.is_some() {
        cfg.import.default_size = size_policy(args.resize);
    }
    for (label, size) in &args.label_sizes {
        cfg.import
            .label_sizes
            .insert(label.clone(), size_policy(Some(*size)));
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;

    let mut library = collage::SpriteLibrary::new();
    let report = collage::import_dir(&mut library, &args.sprites, &cfg.import)
        .with_context(|| format!("import sprites from '{}'", args.sprites.display()))?;
    for (path, reason) in report.skipped() {
        eprintln!("skipped {}: {reason}", path.display());
    }
    eprintln!(
        "imported {} sprites across {} labels",
        report.added(),
        library.labels().len()
    );

    let batch = collage::generate_batch(&library, &cfg)?;
    for generated in &batch {
        let stem = format!("collage_{:04}", generated.index);
        collage::write_collage(&args.out, &stem, generated, &library)?;
        eprintln!(
            "{stem}: placed {} of {} sprites ({} dropped)",
            generated.placed, generated.attempted, generated.dropped
        );
    }
    eprintln!("wrote {} collages to {}", batch.len(), args.out.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let img = image::open(&args.sprite)
        .with_context(|| format!("open sprite '{}'", args.sprite.display()))?;
    let rgb = size_policy(args.resize).apply(img.to_rgb8())?;
    let sprite = collage::Sprite::from_image(&rgb)?;
    let (w, h) = args.canvas;
    let canvas = collage::preview(&sprite, w, h)?;
    collage::save_canvas_png(&canvas, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
