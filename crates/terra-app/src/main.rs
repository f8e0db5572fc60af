//! The `terra` binary: an interactive day/night globe.

use clap::Parser;
use terra_app::{AppError, PlatformDirs, run_with_config};
use terra_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        eprintln!("terra: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir.clone()),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);

    terra_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    tracing::info!(
        "Terra starting (config: {}, assets: {})",
        dirs.config_dir.display(),
        config.globe.asset_dir.display()
    );

    run_with_config(config)
}
