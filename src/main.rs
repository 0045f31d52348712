//! asset-gallery CLI entry point

use std::process::ExitCode;

use clap::Parser;

use asset_gallery::cli::{Commands, ServeArgs};
use asset_gallery::commands::{init_tracing, run_render, run_scan, run_serve, CommandContext};
use asset_gallery::{Cli, GalleryConfig};

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> asset_gallery::Result<String> {
    let cli = Cli::parse();
    let config = GalleryConfig::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_tracing(level);
    if let Ok(effective) = config.to_toml() {
        tracing::debug!("Effective configuration:\n{}", effective);
    }

    let ctx = CommandContext::new(cli.format, cli.verbose, config)?;

    match &cli.command {
        None => run_serve(&ctx, &ServeArgs::default()),
        Some(Commands::Serve(args)) => run_serve(&ctx, args),
        Some(Commands::Scan(args)) => run_scan(&ctx, args),
        Some(Commands::Render(args)) => run_render(&ctx, args),
    }
}
