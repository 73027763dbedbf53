#![deny(unsafe_code)]
//! CLI binary for backdrop.
//!
//! Subcommands:
//! - `render <engine>`: replay an engine for N frames and write a PNG
//! - `trace <engine>`: print the draw commands of the final frame as JSON
//! - `list`: print available engines and their parameters

mod error;

use backdrop_core::surface::RecordingSurface;
use backdrop_core::{Engine, Rgba, Seed};
use backdrop_engines::{replay, EngineKind, RasterSurface};
use clap::{Args, Parser, Subcommand};
use error::CliError;
use log::debug;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "backdrop", about = "Animated page backdrops, rendered offline")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Everything needed to build a [`Seed`] from the command line.
#[derive(Args)]
struct SceneArgs {
    /// Engine name ("particles" or "wave"). Ignored with --seed-file.
    #[arg(required_unless_present = "seed_file")]
    engine: Option<String>,

    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 640)]
    width: u32,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 360)]
    height: u32,

    /// Number of frames to run before capturing.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Milliseconds between frame timestamps.
    #[arg(long, default_value_t = backdrop_core::seed::DEFAULT_FRAME_INTERVAL_MS)]
    frame_ms: f64,

    /// Fixed pointer position as "x,y".
    #[arg(long)]
    pointer: Option<String>,

    /// Engine parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Load the whole scene from a seed JSON file instead.
    #[arg(long)]
    seed_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay an engine for N frames and write a PNG snapshot.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Background color behind the backdrop (hex).
        #[arg(short, long, default_value = "#000000")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,

        /// Also write the resolved seed to this path.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Replay an engine and print the final frame's draw commands.
    Trace {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// List available engines.
    List,
}

/// Parses a pointer given as "x,y".
fn parse_pointer(s: &str) -> Result<[f64; 2], CliError> {
    let bad = || CliError::Input(format!("invalid --pointer '{s}': expected x,y"));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(bad());
    }
    Ok([x, y])
}

fn read_seed_file(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn resolve_seed(scene: SceneArgs) -> Result<Seed, CliError> {
    if let Some(path) = &scene.seed_file {
        debug!("loading scene from {}", path.display());
        return read_seed_file(path);
    }
    let engine = scene
        .engine
        .ok_or_else(|| CliError::Input("an engine name is required".into()))?;
    let params: serde_json::Value = serde_json::from_str(&scene.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let pointer = scene.pointer.as_deref().map(parse_pointer).transpose()?;

    let mut seed = Seed::new(&engine, scene.width, scene.height, scene.seed);
    seed.params = params;
    seed.frames = scene.frames;
    seed.frame_interval_ms = scene.frame_ms;
    seed.pointer = pointer;
    Ok(seed)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in engines {
                    let engine = EngineKind::from_name(name, 0, &serde_json::json!({}))?;
                    schemas.insert((*name).to_string(), engine.param_schema());
                }
                let info = serde_json::json!({
                    "engines": engines,
                    "params": schemas,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            scene,
            background,
            output,
            save_seed,
        } => {
            let background = Rgba::from_hex(&background)?;
            let seed = resolve_seed(scene)?;
            seed.validate()?;

            let mut raster =
                RasterSurface::new(seed.width as usize, seed.height as usize, background)?;
            replay(&seed, &mut raster)?;
            backdrop_engines::snapshot::write_png(&raster, &output)?;

            if let Some(path) = &save_seed {
                let text = serde_json::to_string_pretty(&seed)?;
                std::fs::write(path, text)
                    .map_err(|e| CliError::Io(format!("failed to write {}: {e}", path.display())))?;
            }

            if cli.json {
                let info = serde_json::json!({
                    "engine": seed.engine,
                    "width": seed.width,
                    "height": seed.height,
                    "frames": seed.frames,
                    "seed": seed.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    seed.engine,
                    seed.width,
                    seed.height,
                    seed.frames,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Trace { scene } => {
            let seed = resolve_seed(scene)?;
            let mut scratch = RecordingSurface::new();
            let engine = replay(&seed, &mut scratch)?;

            let mut last = RecordingSurface::new();
            engine.render(&mut last);
            let commands = last.take();

            if cli.json {
                let info = serde_json::json!({
                    "engine": seed.engine,
                    "frames": seed.frames,
                    "commands": commands,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for command in &commands {
                    println!("{}", serde_json::to_string(command)?);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "exit_code": e.exit_code(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
