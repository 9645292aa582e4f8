use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use harness_core::video::present::MAX_SCALE;
use harness_cores::registry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppError;

mod config;
mod emulator;
mod error;
mod input;
mod rom_path;
mod screenshot;
mod video;

#[derive(Parser, Debug)]
#[command(name = "harness", about = "Desktop host for NES emulation cores")]
struct Cli {
    /// ROM image (.nes, or a .zip holding one).
    #[arg(value_name = "ROM", required_unless_present = "list_cores")]
    rom: Option<PathBuf>,

    /// Registered core to run (see --list-cores).
    #[arg(long)]
    core: Option<String>,

    /// Integer window scale.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE)))]
    scale: Option<u32>,

    /// Present as fast as possible instead of at the display refresh.
    #[arg(long, default_value_t = false)]
    no_vsync: bool,

    /// Settings file (defaults to the platform config dir).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Write the last headless frame as a PNG.
    #[arg(long, value_name = "PATH", requires = "headless")]
    screenshot: Option<PathBuf>,

    /// Print the registered cores and exit.
    #[arg(long, default_value_t = false)]
    list_cores: bool,
}

impl Cli {
    /// Command-line flags win over the settings file.
    fn apply(&self, config: &mut Config) {
        if let Some(core) = &self.core {
            config.core.clone_from(core);
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if self.no_vsync {
            config.vsync = false;
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    init_logging(&config);
    tracing::debug!(?config, "configuration");

    if cli.list_cores {
        for entry in registry::all() {
            println!("{:<16} {}", entry.name, entry.description);
        }
        return Ok(());
    }

    let Some(rom_path) = cli.rom.as_deref() else {
        return Ok(());
    };
    let rom = rom_path::load_rom(rom_path)?;
    let core = registry::create(&config.core, &rom)?;
    info!(core = %config.core, rom = %rom_path.display(), "loaded");

    if cli.headless {
        emulator::run_headless_to_png(
            core,
            config.scale,
            cli.frames,
            cli.screenshot.as_deref(),
        )
    } else {
        let key_map = input::default_key_map();
        emulator::run(core, &key_map, &config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("harness: {e}");
            if let AppError::Core(harness_core::error::CoreError::UnknownCore(_)) = e {
                let names: Vec<_> = registry::all().iter().map(|entry| entry.name).collect();
                eprintln!("available cores: {}", names.join(", "));
            }
            ExitCode::FAILURE
        }
    }
}
