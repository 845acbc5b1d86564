use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::RgbaImage;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use planet_forge::{
    CraterPlacement, GenerateOptions, Roster, TextureRequest, TextureType, TextureWorker, generate_with,
};

#[derive(Parser)]
#[command(name = "planet-forge")]
#[command(about = "Procedural planet surface texture generator")]
#[command(version)]
struct Cli {
    /// Log every generation step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single texture and write it as PNG
    Generate {
        /// Texture type (GAS_GIANT, ICE_GIANT, TERRESTRIAL, CRATERED, VOLCANIC, SUN)
        #[arg(short, long, value_parser = parse_texture)]
        texture: TextureType,

        /// Base color as #RRGGBB
        #[arg(short, long)]
        base: String,

        /// Secondary color as #RRGGBB
        #[arg(short, long)]
        secondary: String,

        /// Edge length in pixels
        #[arg(short, long, default_value_t = 512, allow_negative_numbers = true)]
        resolution: i64,

        /// Output PNG file
        #[arg(short, long, default_value = "planet.png")]
        output: PathBuf,

        /// Skip craters and storm spots
        #[arg(long)]
        no_overlays: bool,

        /// Place craters differently on every run
        #[arg(long)]
        random_craters: bool,
    },

    /// Render every body in a roster file through the worker pool
    Roster {
        /// Path to a roster TOML file
        #[arg(default_value = "assets/solar_system.toml")]
        roster: PathBuf,

        /// Directory the PNG files are written to
        #[arg(short, long, default_value = "textures")]
        out_dir: PathBuf,

        /// Number of worker threads (defaults to available cores)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Skip craters and storm spots
        #[arg(long)]
        no_overlays: bool,
    },
}

fn parse_texture(tag: &str) -> Result<TextureType, Infallible> {
    Ok(TextureType::from(tag))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "planet_forge=debug" } else { "planet_forge=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    match cli.command {
        Commands::Generate {
            texture,
            base,
            secondary,
            resolution,
            output,
            no_overlays,
            random_craters,
        } => {
            let options = GenerateOptions {
                overlays: !no_overlays,
                craters: if random_craters { CraterPlacement::Entropy } else { CraterPlacement::Seeded },
            };
            generate_one(texture, &base, &secondary, resolution, &output, &options)
        }
        Commands::Roster {
            roster,
            out_dir,
            workers,
            no_overlays,
        } => {
            let workers = workers.unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));
            let options = GenerateOptions {
                overlays: !no_overlays,
                ..GenerateOptions::default()
            };
            render_roster(&roster, &out_dir, workers, options)
        }
    }
}

/// Generate one texture on the current thread and save it
fn generate_one(
    texture: TextureType,
    base: &str,
    secondary: &str,
    resolution: i64,
    output: &Path,
    options: &GenerateOptions,
) -> Result<()> {
    let request = TextureRequest::new(texture, base, secondary, resolution)
        .with_context(|| format!("Invalid {} request", texture))?;

    let start = Instant::now();
    let buffer = generate_with(&request, options);
    info!(
        %texture,
        resolution = request.resolution(),
        seed = request.seed(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "generated texture"
    );

    buffer
        .save_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());
    Ok(())
}

/// Render a whole roster in parallel, writing `<name>.png` per body
fn render_roster(roster_path: &Path, out_dir: &Path, workers: usize, options: GenerateOptions) -> Result<()> {
    let roster =
        Roster::load(roster_path).with_context(|| format!("Failed to load roster {}", roster_path.display()))?;
    fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {}", out_dir.display()))?;

    // Reject a bad roster before any texture is queued
    let requests = roster
        .requests()
        .with_context(|| format!("Invalid texture settings in {}", roster_path.display()))?;

    let mut pool = TextureWorker::spawn(workers, options).context("Failed to start texture workers")?;
    info!(bodies = requests.len(), workers = pool.workers(), "Rendering roster");

    let start = Instant::now();
    let mut pending = HashMap::new();
    for (body, request) in requests {
        let id = pool.submit(request)?;
        debug!(%id, body = %body.name, "submitted");
        pending.insert(id, body);
    }

    while pool.in_flight() > 0 {
        let response = pool.recv()?;
        let Some(body) = pending.remove(&response.id) else {
            continue;
        };

        let path = out_dir.join(format!("{}.png", body.file_stem()));
        let image = RgbaImage::from_raw(response.width, response.height, response.buffer)
            .with_context(|| format!("Texture for {} has the wrong size", body.name))?;
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("{} -> {}", body.name, path.display());
    }

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered {} textures into {}",
        roster.bodies.len(),
        out_dir.display()
    );
    Ok(())
}
