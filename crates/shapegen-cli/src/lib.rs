//! Shapegen CLI - drive the schema derivation engine from the command line.
//!
//! # Architecture
//!
//! - [`cli`] - argument definitions (clap derive)
//! - [`commands`] - `build` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use shapegen_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false, None);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
