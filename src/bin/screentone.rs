use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use screentone::{
    HalftoneParams, Lang, Layer, Palette, RenderRequest, SessionDefaults, SourceImage,
    ToleranceBand, naming, render_export,
};

// Preview bound applied to uploaded images; larger sources are shrunk to fit.
const MAX_SOURCE_WIDTH: u32 = 800;
const MAX_SOURCE_HEIGHT: u32 = 600;

#[derive(Parser, Debug)]
#[command(name = "screentone", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a halftone separation and write raster (and optionally SVG) files.
    Render(RenderArgs),
    /// List the marker palette with screen angles.
    Palette(PaletteArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source image (PNG/JPEG/...); shrunk to fit 800x600 before rendering.
    #[arg(long)]
    image: PathBuf,

    /// Render request JSON (layers, overrides, z-order).
    #[arg(long)]
    request: PathBuf,

    /// Output directory for the merged and per-layer files.
    #[arg(long)]
    out: PathBuf,

    /// Also write per-layer and merged SVG documents.
    #[arg(long)]
    svg: bool,

    /// Override the request's determinism seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Language for display names.
    #[arg(long, value_enum, default_value_t = LangChoice::Fr)]
    lang: LangChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LangChoice {
    Fr,
    En,
}

impl From<LangChoice> for Lang {
    fn from(choice: LangChoice) -> Self {
        match choice {
            LangChoice::Fr => Lang::Fr,
            LangChoice::En => Lang::En,
        }
    }
}

/// On-disk render request. Layers reference palette colors by hex key; a
/// present `custom` block is what flips the per-layer override on.
#[derive(Debug, serde::Deserialize)]
struct RequestFile {
    #[serde(default)]
    lang: Lang,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    defaults: SessionDefaults,
    layers: Vec<LayerEntry>,
    /// Defaults to the layer listing order when absent.
    #[serde(default)]
    front_to_back: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize)]
struct LayerEntry {
    color: String,
    #[serde(default)]
    custom: Option<LayerOverrides>,
}

#[derive(Debug, serde::Deserialize)]
struct LayerOverrides {
    #[serde(default)]
    halftone: Option<HalftoneParams>,
    #[serde(default)]
    tolerance: Option<ToleranceBand>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Palette(args) => cmd_palette(args),
    }
}

fn read_request_json(path: &Path) -> anyhow::Result<RequestFile> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let request: RequestFile =
        serde_json::from_reader(r).with_context(|| "parse request JSON")?;
    Ok(request)
}

fn build_request(file: RequestFile) -> anyhow::Result<(Lang, RenderRequest)> {
    if file.layers.is_empty() {
        anyhow::bail!("no colors selected: the request must list at least one layer");
    }

    let palette = Palette::builtin();
    let mut layers = Vec::with_capacity(file.layers.len());
    for entry in &file.layers {
        let color = palette
            .find(&entry.color)
            .with_context(|| format!("unknown palette color '{}'", entry.color))?
            .clone();
        let mut layer = Layer::new(color);
        if let Some(custom) = &entry.custom {
            layer.custom_enabled = true;
            layer.halftone = custom.halftone.unwrap_or(file.defaults.halftone);
            layer.tolerance = custom.tolerance.unwrap_or(file.defaults.tolerance);
        }
        layers.push(layer);
    }

    let mut request = RenderRequest::new(layers);
    request.defaults = file.defaults;
    request.seed = file.seed;
    if let Some(order) = file.front_to_back {
        request.front_to_back = order;
    }
    request.validate()?;

    Ok((file.lang, request))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let file = read_request_json(&args.request)?;
    let (lang, mut request) = build_request(file)?;
    if let Some(seed) = args.seed {
        request.seed = seed;
    }

    let decoded = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?;
    let source = SourceImage::fit_within(decoded, MAX_SOURCE_WIDTH, MAX_SOURCE_HEIGHT);

    let export = render_export(&source, &request)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    write_png(
        &args.out.join(naming::complete_raster_name(lang)),
        &export.raster.merged.data,
        export.raster.width,
        export.raster.height,
    )?;
    for layer in &export.raster.layers {
        write_png(
            &args.out.join(naming::layer_raster_name(lang, &layer.color)),
            &layer.raster.data,
            export.raster.width,
            export.raster.height,
        )?;
    }

    if args.svg {
        let merged_path = args.out.join(naming::complete_vector_name(lang));
        std::fs::write(&merged_path, export.merged_vector.to_svg_string())
            .with_context(|| format!("write svg '{}'", merged_path.display()))?;
        eprintln!("wrote {}", merged_path.display());

        for (layer, doc) in export.raster.layers.iter().zip(&export.layer_vectors) {
            let path = args.out.join(naming::layer_vector_name(lang, &layer.color));
            std::fs::write(&path, doc.to_svg_string())
                .with_context(|| format!("write svg '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn write_png(path: &Path, data: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let lang: Lang = args.lang.into();
    for color in Palette::builtin().colors() {
        println!(
            "{}  {:>5.1}°  {}",
            color.hex,
            color.screen_angle_degrees,
            color.display_name(lang)
        );
    }
    Ok(())
}
