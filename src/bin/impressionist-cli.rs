use core::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impressionist::config::Config;
use impressionist::rand::Rng;
use impressionist::sample::SourceImage;
use impressionist::script::PointerScript;
use impressionist::session::Session;
use impressionist::stroke::BrushType;

/// Paints an impressionist rendition of IMAGE and writes it as a PNG.
#[derive(Parser)]
struct Opts {
    /// Source image to sample stroke colors from.
    image: PathBuf,
    /// Output path. Defaults to `<seed>-<brush>.png` in the working directory.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Canvas width; defaults to the image width.
    #[clap(long)]
    width: Option<i32>,
    /// Canvas height; defaults to the image height.
    #[clap(long)]
    height: Option<i32>,
    #[clap(long, value_enum, default_value_t = BrushType::Square)]
    brush: BrushType,
    /// Hex seed for the stroke jitter and fill scatter.
    #[clap(long, default_value = "0x00")]
    seed: Seed,
    /// JSON pointer script to replay after the fill.
    #[clap(long)]
    script: Option<PathBuf>,
    /// JSON config file; replaces the config flags below.
    #[clap(long = "config", value_name = "FILE.json")]
    config_file: Option<PathBuf>,
    /// Skip the random fill pass.
    #[clap(long)]
    no_fill: bool,
    /// Outline where the source image sits on the canvas.
    #[clap(long)]
    border: bool,
    #[clap(flatten)]
    config: Config,
}

#[derive(Clone)]
struct Seed(pub Vec<u8>);
impl Seed {
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
impl FromStr for Seed {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        Ok(Seed(hex::decode(s)?))
    }
}
impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}
impl Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impressionist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::parse();
    let config = match &opts.config_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text).context("Failed to parse config JSON")?
        }
        None => opts.config.clone(),
    };

    let decoded = image::open(&opts.image)
        .with_context(|| format!("Failed to decode {}", opts.image.display()))?
        .into_rgba8();
    let (w, h) = decoded.dimensions();
    let source = SourceImage::from_rgba8(w, h, decoded.as_raw())?;

    let width = opts.width.unwrap_or(w as i32);
    let height = opts.height.unwrap_or(h as i32);
    let mut session = Session::new(width, height, &config, Rng::from_seed(opts.seed.as_bytes()))?;
    session.set_source_image(Some(Arc::new(source)));
    session.set_brush_type(opts.brush);
    tracing::info!(width, height, placement = ?session.placement(), "painting");

    if !opts.no_fill {
        session.fill(config.fill_count, config.fill_jitter)?;
    }
    if let Some(path) = &opts.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let script = PointerScript::from_json(&text).context("Failed to parse pointer script")?;
        let report = script.replay(&mut session);
        tracing::info!(
            commands = report.commands,
            rejected = report.rejected.len(),
            "replayed pointer script"
        );
    }

    let canvas = if opts.border {
        session.render_with_border()
    } else {
        session.canvas().clone()
    };
    let filename = opts.output.unwrap_or_else(|| {
        let brush = match opts.brush {
            BrushType::Square => "square",
            BrushType::Circle => "circle",
            BrushType::CircleSplatter => "splatter",
        };
        PathBuf::from(format!("{}-{}.png", &opts.seed, brush))
    });
    canvas
        .write_png(&filename)
        .with_context(|| format!("Failed to write {}", filename.display()))?;
    eprintln!("wrote png: {}", filename.display());
    Ok(())
}
