use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use minifb::{Key, Window, WindowOptions};
use pixel_enhance::{EnhancementConfig, Enhancer, RasterBuffer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: pixel_enhance <image> [config.json] [seed]";

struct Args {
    image: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = std::env::args().skip(1);
        let image = args.next().map(PathBuf::from).context(USAGE)?;
        let config = args.next().map(PathBuf::from);
        let seed = args
            .next()
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("seed must be an unsigned integer")?;
        Ok(Self { image, config, seed })
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EnhancementConfig> {
    let Some(path) = path else {
        return Ok(EnhancementConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(EnhancementConfig::from_json(&json)?)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse()?;
    let config = load_config(args.config.as_ref())?;

    let source = image::open(&args.image)
        .with_context(|| format!("decoding {}", args.image.display()))?
        .to_rgba8();
    let source = RasterBuffer::try_from(source)?;
    info!(width = source.width(), height = source.height(), "loaded {}", args.image.display());

    let enhancer = match args.seed {
        Some(seed) => Enhancer::with_seed(config, seed),
        None => Enhancer::new(config),
    };

    let now = Instant::now();
    let enhanced = enhancer.enhance(source)?;
    info!(
        width = enhanced.width(),
        height = enhanced.height(),
        elapsed_ms = now.elapsed().as_millis() as u64,
        "enhanced"
    );

    let (width, height) = (enhanced.width(), enhanced.height());
    let frame = enhanced.to_u32_buffer();

    let mut window = Window::new("Pixel Enhance", width, height, WindowOptions::default())?;
    window.set_target_fps(60);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&frame, width, height)?;
    }
    Ok(())
}
