//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Verdant command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "verdant", about = "Streams a procedurally generated 2D world")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chunk width in world units.
    #[arg(long)]
    pub chunk_width: Option<u32>,

    /// Chunks kept on each side of the viewer.
    #[arg(long)]
    pub visibility_radius: Option<u32>,

    /// Tree probability per block-aligned slot.
    #[arg(long)]
    pub tree_probability: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of simulated ticks (demo only).
    #[arg(long, default_value_t = 600)]
    pub steps: u32,

    /// Viewer speed in world units per tick (demo only).
    #[arg(long, default_value_t = 12.0)]
    pub speed: f64,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(width) = args.chunk_width {
            self.streaming.chunk_width = width;
        }
        if let Some(radius) = args.visibility_radius {
            self.streaming.visibility_radius = radius;
        }
        if let Some(p) = args.tree_probability {
            self.flora.tree_probability = p;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
