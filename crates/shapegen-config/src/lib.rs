//! Configuration for the shapegen engine and its command-line host.
//!
//! Values are layered with `figment`: built-in defaults, then a
//! `shapegen.toml` file, then `SHAPEGEN_`-prefixed environment variables.

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod settings;
pub mod validation;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use settings::*;

pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery};
pub use validation::validate_schema;
