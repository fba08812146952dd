//! cavegen - command line front end for the cave generator.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use cave_core::bridge::CaveLayoutResponse;
use cave_core::generation::floor_manager::DungeonProgress;
use cave_core::generation::LayoutKind;
use cave_core::hotreload::ConfigWatcher;
use cave_core::logging::{init_tracing, LogLevel, LogSettings};
use cave_core::visualization::render_ascii;
use cave_core::{generate_cave, CaveConfig, CaveLayout};

/// Procedural cave generator
#[derive(Parser, Debug)]
#[command(name = "cavegen")]
#[command(author, version, about = "Generate connected procedural caves", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single cave
    Generate {
        #[command(flatten)]
        params: CaveArgs,

        /// Output format
        #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Ascii)]
        format: Format,
    },
    /// Generate one floor of a seeded dungeon
    Floor {
        /// Dungeon seed
        #[arg(short = 's', long = "seed", default_value_t = cave_core::constants::DEFAULT_SEED)]
        seed: u64,

        /// Floor number (1-based)
        #[arg(short = 'n', long = "floor", default_value_t = 1)]
        floor: u32,

        /// Base config file (RON, or JSON with a .json extension)
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Ascii)]
        format: Format,
    },
    /// Regenerate and print the cave every time the config file changes
    Watch {
        /// Config file to watch
        config: PathBuf,

        /// Poll interval in milliseconds
        #[arg(long = "interval", default_value_t = 250)]
        interval_ms: u64,
    },
}

#[derive(clap::Args, Debug)]
struct CaveArgs {
    /// Config file (RON, or JSON with a .json extension)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Seed override
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid width override
    #[arg(long = "width")]
    width: Option<usize>,

    /// Grid height override
    #[arg(long = "height")]
    height: Option<usize>,

    /// Room count override
    #[arg(long = "rooms")]
    room_count: Option<u32>,

    /// Initial wall percentage override
    #[arg(long = "fill")]
    fill_percentage: Option<u32>,
}

impl CaveArgs {
    fn resolve(&self) -> Result<CaveConfig> {
        let mut config = load_base(self.config.as_deref())?;
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(room_count) = self.room_count {
            config.room_count = room_count;
        }
        if let Some(fill) = self.fill_percentage {
            config.fill_percentage = fill;
        }
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&LogSettings::with_level(LogLevel::from_verbosity(
        cli.verbose,
    )));

    match cli.command {
        Command::Generate { params, format } => {
            let config = params.resolve()?;
            let layout = generate_cave(&config).context("cave generation failed")?;
            print_layout(&layout, format)
        }
        Command::Floor {
            seed,
            floor,
            config,
            format,
        } => {
            anyhow::ensure!(floor >= 1, "floor numbers start at 1");
            let base = load_base(config.as_deref())?;
            let progress = DungeonProgress {
                current_floor: floor,
                highest_reached: floor,
                ..DungeonProgress::new(seed)
            };
            let layout = progress
                .generate_current(&base)
                .with_context(|| format!("failed to generate floor {floor}"))?;
            if format == Format::Ascii {
                println!("Floor {} ({:?})", floor, LayoutKind::for_floor(floor));
            }
            print_layout(&layout, format)
        }
        Command::Watch {
            config,
            interval_ms,
        } => watch(&config, Duration::from_millis(interval_ms)),
    }
}

fn load_base(path: Option<&Path>) -> Result<CaveConfig> {
    match path {
        Some(path) => CaveConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(CaveConfig::default()),
    }
}

fn print_layout(layout: &CaveLayout, format: Format) -> Result<()> {
    match format {
        Format::Ascii => {
            print!("{}", render_ascii(layout));
            if layout.skipped_rooms > 0 {
                println!("({} room(s) could not be placed)", layout.skipped_rooms);
            }
        }
        Format::Json => {
            let response = CaveLayoutResponse::from(layout);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn watch(path: &Path, interval: Duration) -> Result<()> {
    let mut watcher = ConfigWatcher::new(path)?;
    let config = watcher.reload()?;
    print_layout(&generate_cave(&config)?, Format::Ascii)?;
    info!("Watching {} for changes", watcher.path().display());

    loop {
        thread::sleep(interval);
        match watcher.poll() {
            Some(Ok(config)) => match generate_cave(&config) {
                Ok(layout) => print_layout(&layout, Format::Ascii)?,
                Err(e) => warn!("Generation failed: {}", e),
            },
            // Already logged by the watcher; keep the previous cave on screen
            Some(Err(_)) | None => {}
        }
    }
}
