#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::float_cmp)]
//! # Double Pendulum Runtime
//!
//! Headless driver for the `pendulum` crate. Steps the simulation at a fixed
//! frame time and logs the same HUD a renderer would draw:
//!
//! ```text
//! time = 1.0, energy = 10.391 J
//! ```
//!
//! Settings come from an optional JSON file (`--config`) with command-line
//! flags layered on top. Log verbosity follows `RUST_LOG` (default `info`).

mod app;
mod cli;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::config::SimulationConfig;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    config.apply(&args);
    tracing::debug!(?config, "Resolved configuration");

    app::run(&config)?;
    Ok(())
}
