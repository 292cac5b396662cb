// src/main.rs

use anyhow::Context;
use clap::Parser;
use fbsim::config::{Config, CONFIG};
use fbsim::display::{DisplayBackend, DisplayManager, DriverConfig};
use fbsim::task::{self, DRIVER_NAMES};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "fbsim",
    version,
    about = "Run a framebuffer display driver against a simulated window."
)]
struct Cli {
    /// Driver to run (color-bars, gradient, bouncing-box, idle).
    driver: String,

    /// Number of seconds to run the simulation before automatically exiting.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Seconds to wait for the driver to open its display.
    #[arg(long, value_name = "SECS")]
    discovery_timeout: Option<u64>,

    /// Integer window scale factor.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    scale: Option<u32>,

    /// JSON config file (overrides $FBSIM_CONFIG).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without opening a window.
    #[arg(long)]
    headless: bool,
}

/// Main entry point for the simulator.
fn main() -> ExitCode {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    let Some(driver) = task::lookup(&cli.driver) else {
        eprintln!(
            "Error: Unknown driver '{}'. Available drivers: {}",
            cli.driver,
            DRIVER_NAMES.join(", ")
        );
        return ExitCode::from(2);
    };

    match run(cli, driver) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, driver: Box<dyn task::DriverTask>) -> anyhow::Result<ExitCode> {
    // --- Configuration ---
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => match &*CONFIG {
            Ok(config) => config.clone(),
            Err(e) => anyhow::bail!("{}", e),
        },
    };
    if let Some(secs) = cli.timeout {
        config.timing.run_timeout_secs = Some(secs);
    }
    if let Some(secs) = cli.discovery_timeout {
        config.timing.discovery_timeout_ms = secs.saturating_mul(1000);
    }
    if let Some(scale) = cli.scale {
        config.display.scale = scale;
    }
    config.validate()?;
    info!("Configuration: {:?}", config);

    fbsim::signal::install()?;

    // --- Display ---
    let backend = if cli.headless {
        DisplayBackend::Headless
    } else {
        DisplayBackend::detect()
    };
    let (width_px, height_px) = config.display.window_size();
    let display = DisplayManager::open(
        backend,
        DriverConfig {
            width_px,
            height_px,
            title: config.display.window_title(driver.name()),
        },
    )
    .context("Failed to open the simulator window")?;

    // --- Run ---
    match fbsim::run_simulation(&config, driver, display) {
        Ok(summary) => {
            info!("Run summary: {:?}", summary);
            println!("Simulator closed.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
