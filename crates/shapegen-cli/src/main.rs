//! Shapegen CLI entry point.
//!
//! Parses arguments, loads configuration, initializes logging and dispatches
//! to the requested command.

use clap::Parser;
use miette::Result;
use shapegen_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = commands::load_config(args.config.as_deref()).map_err(error::cli_error_to_miette)?;

    logger::init_logger(
        args.verbose,
        args.quiet,
        args.no_color,
        config.settings.log_level.as_deref(),
    );
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args, &config),
        cli::Command::Check(check_args) => commands::check_execute(check_args, &config),
    };

    result.map_err(error::cli_error_to_miette)
}
