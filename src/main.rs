// src/main.rs

use clap::Parser;
use std::process;

// Module declarations
mod cli;
mod config;
mod file_utils;
mod gsettings;
mod rotator;
mod selection;

// Crate imports for convenience
use crate::cli::Cli;
use crate::config::Config;
use crate::gsettings::GsettingsSetter;
use crate::rotator::{CancellationFlag, Rotator};

fn main() {
    if let Err(err) = run_app() {
        eprintln!("\nApplication Error: {}", err);
        process::exit(1);
    }
}

fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli_args = Cli::parse();
    let once = cli_args.once;
    let config = Config::resolve(&cli_args)?;

    log::info!(
        "Rotating wallpaper from '{}' every {}s (extensions: {}).",
        config.folder.display(),
        config.interval.as_secs(),
        config.extensions.join(", ")
    );

    let setter = GsettingsSetter::new();
    let rotator = Rotator::new(config, &setter);

    if once {
        rotator.rotate_once(&mut rand::rng())?;
        return Ok(());
    }

    // The loop has no terminal state of its own; it runs until the process
    // is killed. The flag exists so tests (and callers embedding the loop)
    // can stop it.
    let cancel = CancellationFlag::new();
    rotator.run(&cancel)
}
