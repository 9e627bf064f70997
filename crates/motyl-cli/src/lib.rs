//! # Motyl CLI
//!
//! Command-line driver for the Motyl scene.
//!
//! ## Commands
//! - `run` - Drive the scene headless for a number of frames
//! - `dodecahedron` - Print the mirror face table
//! - `moebius` - Print Moebius strip mesh statistics
//! - `pose` - Print the butterfly pose at a given time

pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motyl_core::SceneConfig;
use serde::Serialize;

pub use commands::{Drag, dodecahedron_report, moebius_report, pose_report, run_frames};

/// Motyl mirror scene
#[derive(Parser)]
#[command(name = "motyl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scene configuration (JSON); defaults are used for missing fields
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Drive the scene headless for a number of frames
    Run {
        /// Number of frames
        #[arg(short, long, default_value = "600")]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Animation speed relative to real time
        #[arg(long, default_value_t = 1.0)]
        time_scale: f64,

        /// Mouse drag applied every frame, in pixels
        #[arg(long, value_parser = commands::parse_drag, allow_hyphen_values = true)]
        drag: Option<Drag>,

        /// Drag with the right button (zoom) instead of the left (rotate)
        #[arg(long, requires = "drag")]
        right: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the mirror face table
    Dodecahedron {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print Moebius strip mesh statistics
    Moebius {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the butterfly pose at a given time
    Pose {
        /// Seconds since the start of the animation
        #[arg(short, long, value_parser = commands::parse_finite, allow_hyphen_values = true)]
        time: f32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Load and validate a scene configuration, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SceneConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn print_report<T: Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            frames,
            dt,
            time_scale,
            drag,
            right,
            json,
        } => {
            let drag = drag.map(|drag| if right { drag.with_right_button() } else { drag });
            log::info!("Running {frames} frames at {dt:.4}s, time scale {time_scale}");
            let report = run_frames(&config, frames, dt, time_scale, drag)?;
            log::info!(
                "Done: {} draw calls, {} triangles",
                report.total.draw_calls,
                report.total.triangles
            );
            print_report(&report, json)?;
        }

        Commands::Dodecahedron { json } => {
            print_report(&dodecahedron_report(), json)?;
        }

        Commands::Moebius { json } => {
            print_report(&moebius_report(&config)?, json)?;
        }

        Commands::Pose { time, json } => {
            print_report(&pose_report(&config, time)?, json)?;
        }
    }

    Ok(())
}
