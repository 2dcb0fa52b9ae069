#![deny(unsafe_code)]
//! CLI binary for the plexus particle field.
//!
//! Subcommands:
//! - `render` runs the field N frames headless and writes one PNG
//! - `frames` writes every Nth frame as a numbered PNG sequence
//! - `replay <seed.json>` reruns a saved seed
//! - `list` prints palettes and the parameter schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use plexus_core::{FrameStats, Palette, Rgb, Seed};
use plexus_field::FieldConfig;
use plexus_render::snapshot::write_png;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_FRAMES: usize = 120;

#[derive(Parser)]
#[command(name = "plexus", about = "Render the plexus particle field headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 400)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 300)]
    height: usize,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = DEFAULT_FRAMES)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Palette name (contact, ember, glacier).
    #[arg(short, long, default_value = "contact")]
    palette: String,

    /// Field parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    #[command(flatten)]
    backdrop: BackdropArgs,
}

#[derive(Args)]
struct BackdropArgs {
    /// Background color as hex.
    #[arg(long, default_value = "0b1020")]
    background: String,

    /// Keep the background transparent instead of filling it.
    #[arg(long)]
    transparent: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the field for N frames and write the last one as a PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "plexus.png")]
        output: PathBuf,

        /// Also write the seed as JSON for `replay`.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Run the field and write every Nth frame as a numbered PNG.
    Frames {
        #[command(flatten)]
        scene: SceneArgs,

        /// Write one frame out of every N.
        #[arg(long, default_value_t = 1)]
        every: usize,

        /// Directory the frames are written into.
        #[arg(long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Rerun a saved seed and write the last frame as a PNG.
    Replay {
        /// Seed JSON file written by `render --save-seed`.
        seed_file: PathBuf,

        /// Override the frame count stored in the seed.
        #[arg(short, long)]
        frames: Option<usize>,

        /// Output file path.
        #[arg(short, long, default_value = "plexus.png")]
        output: PathBuf,

        #[command(flatten)]
        backdrop: BackdropArgs,
    },
    /// List palettes and field parameters.
    List,
}

impl SceneArgs {
    fn to_seed(&self) -> Result<Seed, CliError> {
        if self.frames == 0 {
            return Err(CliError::Input("--frames must be at least 1".into()));
        }
        Palette::from_name(&self.palette)?;
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        if !params.is_object() {
            return Err(CliError::Input("--params must be a JSON object".into()));
        }
        let mut seed = Seed::new(&self.palette, self.width, self.height, self.seed);
        seed.params = params;
        seed.frames = self.frames;
        Ok(seed)
    }
}

impl BackdropArgs {
    fn color(&self) -> Result<Option<Rgb>, CliError> {
        if self.transparent {
            Ok(None)
        } else {
            Ok(Some(Rgb::from_hex(&self.background)?))
        }
    }
}

fn frame_path(dir: &Path, n: usize) -> PathBuf {
    dir.join(format!("frame_{n:05}.png"))
}

/// Runs `seed` and writes its last frame to `output`.
fn render_still(
    seed: &Seed,
    background: Option<Rgb>,
    output: &Path,
) -> Result<FrameStats, CliError> {
    let mut last = FrameStats::default();
    let raster = plexus_render::run(seed, seed.frames, |_, _, stats| {
        last = *stats;
        Ok(())
    })?;
    write_png(&raster, background, output)?;
    Ok(last)
}

fn print_render(
    json: bool,
    seed: &Seed,
    stats: &FrameStats,
    output: &Path,
) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "palette": seed.palette,
            "width": seed.width,
            "height": seed.height,
            "frames": seed.frames,
            "seed": seed.seed,
            "stats": stats,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {} frames, seed {}, {} links) -> {}",
            seed.palette,
            seed.width,
            seed.height,
            seed.frames,
            seed.seed,
            stats.links,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let palettes = Palette::list_names();
            let schema = FieldConfig::schema();
            if cli.json {
                let info = serde_json::json!({
                    "palettes": palettes,
                    "params": schema,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
                println!("Params:");
                if let Some(params) = schema.as_object() {
                    for (key, entry) in params {
                        println!(
                            "  {key} (default {}): {}",
                            entry["default"],
                            entry["description"].as_str().unwrap_or_default()
                        );
                    }
                }
            }
        }
        Command::Render {
            scene,
            output,
            save_seed,
        } => {
            let seed = scene.to_seed()?;
            let background = scene.backdrop.color()?;
            let stats = render_still(&seed, background, &output)?;
            if let Some(path) = save_seed {
                fs::write(&path, serde_json::to_string_pretty(&seed)?)?;
                log::info!("seed written to {}", path.display());
            }
            print_render(cli.json, &seed, &stats, &output)?;
        }
        Command::Frames {
            scene,
            every,
            out_dir,
        } => {
            if every == 0 {
                return Err(CliError::Input("--every must be at least 1".into()));
            }
            let seed = scene.to_seed()?;
            let background = scene.backdrop.color()?;
            fs::create_dir_all(&out_dir)?;

            let mut written = Vec::new();
            plexus_render::run(&seed, seed.frames, |n, raster, _| {
                if n % every == 0 {
                    let path = frame_path(&out_dir, n);
                    write_png(raster, background, &path)?;
                    log::debug!("wrote {}", path.display());
                    written.push(path);
                }
                Ok(())
            })?;

            if cli.json {
                let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
                let info = serde_json::json!({
                    "frames": seed.frames,
                    "every": every,
                    "files": files,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {} of {} frames -> {}",
                    written.len(),
                    seed.frames,
                    out_dir.display()
                );
            }
        }
        Command::Replay {
            seed_file,
            frames,
            output,
            backdrop,
        } => {
            let text = fs::read_to_string(&seed_file)?;
            let mut seed: Seed = serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid seed file: {e}")))?;
            seed.frames = match frames.unwrap_or(seed.frames) {
                0 => DEFAULT_FRAMES,
                n => n,
            };
            let background = backdrop.color()?;
            let stats = render_still(&seed, background, &output)?;
            print_render(cli.json, &seed, &stats, &output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
