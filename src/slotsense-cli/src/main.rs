mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use slotsense::Rect;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    // Diagnostics go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotsense=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    tracing::debug!(path = %config_path.display(), "using config");

    match cli.command {
        Commands::Configure { show, init } => {
            commands::configure::handle(&config_path, show, init)?;
        }

        Commands::Discover { snapshot } => {
            let config = Config::load_from(&config_path)?;
            commands::discover::handle(&snapshot, &config.engine)?;
        }

        Commands::Probe {
            snapshot,
            type_name,
        } => {
            commands::probe::handle(&snapshot, type_name.as_deref())?;
        }

        Commands::Count { snapshot } => {
            let config = Config::load_from(&config_path)?;
            commands::count::handle(&snapshot, &config.engine)?;
        }

        Commands::Replay {
            snapshots,
            ticks_per_frame,
            tick_ms,
            screen_width,
            screen_height,
        } => {
            let config = Config::load_from(&config_path)?;
            let options = commands::replay::ReplayOptions {
                ticks_per_frame,
                tick: Duration::from_millis(tick_ms),
                screen: Rect {
                    x: 0.0,
                    y: 0.0,
                    width: screen_width,
                    height: screen_height,
                },
            };
            commands::replay::handle(&snapshots, &options, &config.engine)?;
        }
    }

    Ok(())
}
