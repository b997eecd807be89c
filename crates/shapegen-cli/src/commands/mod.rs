//! Command implementations.
//!
//! - [`build`] - run a unit and write its artifacts
//! - [`check`] - run a unit without writing

pub mod build;
pub mod check;
pub(crate) mod utils;

use std::path::Path;

use shapegen_config::{ConfigDiscovery, ShapegenConfig};

use crate::error::Result;

pub use build::execute as build_execute;
pub use check::execute as check_execute;

/// Load configuration relative to the working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<ShapegenConfig> {
    let cwd = std::env::current_dir()?;
    Ok(ConfigDiscovery::new(cwd).load(explicit)?)
}
