//! Typeshelf CLI
//!
//! Measures and renders text through the glyph atlas cache, and dumps atlas
//! bitmaps for inspection. Settings come from `typeshelf.toml` and can be
//! overridden per invocation.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{TypeshelfConfig, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use typeshelf_paint::{Color, CpuCanvas};
use typeshelf_text::{load_font, Font, FontBackend, LoadFlags};

#[derive(Parser)]
#[command(name = "typeshelf")]
#[command(author, version, about = "Measure and render text through a glyph atlas cache", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file or directory containing typeshelf.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default typeshelf.toml
    Init {
        /// Directory to create it in
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Font file to record in the config
        #[arg(short, long)]
        font: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the advance width of a string
    Measure {
        text: String,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Draw a string and write the canvas to a PNG
    Render {
        text: String,

        /// Output file
        #[arg(short, long, default_value = "out.png")]
        output: PathBuf,

        #[command(flatten)]
        font: FontArgs,

        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Text color (#rrggbb or #rrggbbaa)
        #[arg(long)]
        color: Option<String>,

        /// Background color (#rrggbb or #rrggbbaa)
        #[arg(long)]
        background: Option<String>,
    },

    /// Draw a string and write the first glyph atlas to a PNG
    Atlas {
        text: String,

        /// Output file
        #[arg(short, long, default_value = "atlas.png")]
        output: PathBuf,

        #[command(flatten)]
        font: FontArgs,
    },
}

/// Font options shared by every command
#[derive(Args)]
struct FontArgs {
    /// Font file
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Pixel size
    #[arg(short, long)]
    size: Option<u32>,

    /// Disable pairwise kerning
    #[arg(long)]
    no_kerning: bool,
}

impl FontArgs {
    fn load(&self, config: &TypeshelfConfig) -> Result<Font> {
        let path = self
            .font
            .clone()
            .or_else(|| config.font.path.clone())
            .context("No font given. Pass --font or set [font] path in typeshelf.toml")?;
        let size = self.size.unwrap_or(config.font.size);

        let mut flags = LoadFlags::NONE;
        if self.no_kerning || !config.font.kerning {
            flags |= LoadFlags::NO_KERNING;
        }

        load_font(&path, size, flags)
            .with_context(|| format!("Failed to load font {}", path.display()))
    }
}

/// Log level used when neither `-v` nor `RUST_LOG` is given
const DEFAULT_LOG_LEVEL: &str = "info";

fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .init();

    if let Commands::Init { path, font, force } = &cli.command {
        return cmd_init(path, font.clone(), *force);
    }

    let mut config = match &cli.config {
        Some(path) => TypeshelfConfig::load(path)?,
        None => TypeshelfConfig::load_default()?,
    };

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Measure { text, font } => cmd_measure(&config, &text, &font),
        Commands::Render {
            text,
            output,
            font,
            width,
            height,
            color,
            background,
        } => {
            let canvas = &mut config.canvas;
            canvas.width = width.unwrap_or(canvas.width);
            canvas.height = height.unwrap_or(canvas.height);
            if let Some(color) = color {
                canvas.color = color;
            }
            if let Some(background) = background {
                canvas.background = background;
            }
            cmd_render(&config, &text, &font, output)
        }
        Commands::Atlas { text, output, font } => cmd_atlas(&config, &text, &font, output),
    }
}

fn cmd_init(dir: &Path, font: Option<PathBuf>, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    let mut config = TypeshelfConfig::default();
    config.font.path = font;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}

fn cmd_measure(config: &TypeshelfConfig, text: &str, font: &FontArgs) -> Result<()> {
    let font = font.load(config)?;
    let width = font.measure_text(text, text.chars().count());
    println!("{}", width);
    Ok(())
}

fn cmd_render(
    config: &TypeshelfConfig,
    text: &str,
    font: &FontArgs,
    output: PathBuf,
) -> Result<()> {
    let target = &config.canvas;
    let color = target.text_color()?;
    let background = target.background_color()?;

    let mut font = font.load(config)?;
    let mut canvas = CpuCanvas::new(target.width, target.height)?;
    canvas.clear_target(background);

    let count = text.chars().count();
    let width = font.measure_text(text, count);
    let x = (target.width as i32 - width) / 2;
    let y = (target.height as i32 - font.height()) / 2;

    let result = font.draw_text(&mut canvas, text, count, x, y, color);
    let atlases = font.atlas_count();
    font.destroy(&mut canvas);
    let advance = result?;

    canvas
        .capture()
        .save_png(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Rendered {} codepoints ({}px wide, {} atlases) to {}",
        count,
        advance,
        atlases,
        output.display()
    );
    Ok(())
}

fn cmd_atlas(config: &TypeshelfConfig, text: &str, font: &FontArgs, output: PathBuf) -> Result<()> {
    let mut font = font.load(config)?;
    let mut canvas = CpuCanvas::new(1, 1)?;

    let result = font
        .draw_text(&mut canvas, text, text.chars().count(), 0, 0, Color::WHITE)
        .map(|_| font.atlases().first().and_then(|&atlas| canvas.capture_bitmap(atlas)));
    let cached = font.cached_glyph_count();
    font.destroy(&mut canvas);

    let frame = result?.context("Text produced no glyphs, nothing to dump")?;
    frame
        .save_png(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote atlas with {} glyphs to {}", cached, output.display());
    Ok(())
}
