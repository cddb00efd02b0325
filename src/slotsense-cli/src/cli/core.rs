//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slotsense")]
#[command(about = "Inventory slot occupancy from object-graph snapshots", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "SLOTSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect whether the inventory is open and where the badge would anchor
    #[command(visible_alias = "d")]
    Discover {
        /// Snapshot file (.json or .yaml)
        snapshot: PathBuf,
    },

    /// Show collection-like and quantity-like attributes per type
    #[command(visible_alias = "p")]
    Probe {
        /// Snapshot file (.json or .yaml)
        snapshot: PathBuf,

        /// Only probe this type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },

    /// Resolve every slot and print the counts and badge text
    #[command(visible_alias = "n")]
    Count {
        /// Snapshot file (.json or .yaml)
        snapshot: PathBuf,
    },

    /// Drive the poller across snapshot frames and print overlay notifications
    #[command(visible_alias = "r")]
    Replay {
        /// Snapshot files, one per frame, in order
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,

        /// Poller ticks spent on each frame
        #[arg(long, default_value = "4")]
        ticks_per_frame: u32,

        /// Simulated time per tick, in milliseconds
        #[arg(long, default_value = "250")]
        tick_ms: u64,

        /// Screen size used for badge placement
        #[arg(long, default_value = "1920")]
        screen_width: f32,

        #[arg(long, default_value = "1080")]
        screen_height: f32,
    },

    /// Show or create the config file
    #[command(visible_alias = "c")]
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Write the default configuration (keeps an existing file)
        #[arg(long)]
        init: bool,
    },
}
