//! Toroidal Game of Life simulator
//!
//! The crate provides a wrapping cell grid, the generation rules, and a
//! background engine that advances the grid under start/stop/step/speed
//! control while readers observe complete generations only.

pub mod config;
pub mod controls;
pub mod error;
pub mod game_of_life;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use error::GridError;
pub use game_of_life::{Grid, Rules};
pub use simulation::{GridEvent, SimulationConfig, SimulationEngine, Snapshot};

use anyhow::Result;

/// Evolve `grid` synchronously for `generations` steps using the configured rules
pub fn run_generations(settings: &Settings, grid: Grid, generations: usize) -> Result<Grid> {
    settings.validate()?;
    Ok(settings.rules.evolve_generations(grid, generations))
}
