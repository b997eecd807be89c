//! Command-line interface definition.
//!
//! - `shapegen build` - run both passes over a unit and write its artifacts
//! - `shapegen check` - run the same pipeline without writing anything

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Derive data, create-request and patch-request types from model declarations
#[derive(Parser, Debug)]
#[command(
    name = "shapegen",
    version,
    about = "Derive data, create-request and patch-request types from model declarations",
    long_about = "Shapegen reads one unit's model declarations, resolves them against the\n\
                  metadata of upstream units, validates the merged model graph and plans\n\
                  the variant types and patch serializers a code emitter should produce."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a shapegen.toml (defaults to ./shapegen.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a unit and write its metadata and emission plan
    ///
    /// The metadata artifact is written even when validation fails, so units
    /// depending on this one can still be configured.
    Build(BuildArgs),

    /// Validate a unit without writing any artifact
    Check(CheckArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Declarations file (JSON) describing the unit
    #[arg(value_name = "DECLARATIONS")]
    pub declarations: PathBuf,

    /// Output directory for shapegen-models.json and emission.json
    ///
    /// Overrides `metadata.output_dir` from the configuration.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Additional upstream metadata files or directories
    ///
    /// Appended to `metadata.search_paths` from the configuration.
    #[arg(short = 's', long = "search-path", value_name = "PATH")]
    pub search_paths: Vec<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Declarations file (JSON) describing the unit
    #[arg(value_name = "DECLARATIONS")]
    pub declarations: PathBuf,

    /// Additional upstream metadata files or directories
    #[arg(short = 's', long = "search-path", value_name = "PATH")]
    pub search_paths: Vec<PathBuf>,
}
