use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use multitables::document::SceneDocument;
use multitables::model::Composition;
use multitables::rendering::image::FsImageDecoder;
use multitables::rendering::text::GlyphBackend;
use multitables::{RenderConfig, Renderer};

#[derive(Parser)]
#[command(name = "multitables", version, about = "Render list/row/section table diagrams to PNG")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a scene to a PNG file
    Render {
        /// Scene description (JSON)
        scene: PathBuf,
        /// Output PNG path (defaults to the scene path with a .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pixels per logical unit
        #[arg(long, default_value_t = 10.0)]
        scale: f64,
        /// Glyph source for text
        #[arg(long, value_enum, default_value_t = Glyphs::Cosmic)]
        glyphs: Glyphs,
        /// Print the SHA-256 digest of the rendered pixels
        #[arg(long)]
        digest: bool,
        /// Print the PNG as a data URI instead of writing a file
        #[arg(long)]
        data_uri: bool,
    },
    /// Print resolved cell rectangles as JSON
    Layout {
        scene: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        scale: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Glyphs {
    Cosmic,
    Block,
}

impl From<Glyphs> for GlyphBackend {
    fn from(g: Glyphs) -> Self {
        match g {
            Glyphs::Cosmic => GlyphBackend::Cosmic,
            Glyphs::Block => GlyphBackend::Block,
        }
    }
}

fn load_scene(path: &Path) -> anyhow::Result<Composition> {
    let doc = SceneDocument::from_path(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(doc.into_composition(base, &FsImageDecoder))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Render { scene, output, scale, glyphs, digest, data_uri } => {
            let composition = load_scene(&scene)?;
            let config = RenderConfig { scale, glyphs: glyphs.into(), ..Default::default() };
            let mut renderer = Renderer::new(config)?;
            let bitmap = renderer.render(&composition)?;
            tracing::info!(
                width = bitmap.width,
                height = bitmap.height,
                "rendered {}",
                scene.display()
            );

            if digest {
                println!("{}", bitmap.digest());
            }
            if data_uri {
                println!("{}", bitmap.to_data_uri()?);
            } else {
                let out = output.unwrap_or_else(|| scene.with_extension("png"));
                std::fs::write(&out, bitmap.to_png()?)
                    .with_context(|| format!("writing {}", out.display()))?;
                tracing::info!("wrote {}", out.display());
            }
        }
        Command::Layout { scene, scale } => {
            let composition = load_scene(&scene)?;
            let config = RenderConfig { scale, glyphs: GlyphBackend::Block, ..Default::default() };
            let layout = Renderer::new(config)?.layout(&composition)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }
    Ok(())
}
