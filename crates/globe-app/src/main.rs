//! The globe viewer binary.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `globe --width 1920 --height 1080 --offline`.

use clap::Parser;
use globe_app::platform::PlatformDirs;
use globe_config::{CliArgs, Config};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    // Logging needs the config for its level, so load problems are reported
    // once the subscriber is up.
    let (mut config, load_error) = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    let invalid = config.validate().err();
    if invalid.is_some() {
        config = Config::default();
        config.apply_cli_overrides(&args);
    }

    globe_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        warn!("Failed to load config: {e}, using defaults");
    }
    if let Some(e) = invalid {
        warn!("Invalid config: {e}, using defaults");
    }
    info!("Config directory: {}", dirs.config_dir.display());

    if let Err(e) = globe_app::run(config) {
        error!("{e}");
        std::process::exit(1);
    }
}
