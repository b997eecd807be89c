//! Check command: validate a unit without writing artifacts.

use shapegen_config::ShapegenConfig;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

pub fn execute(args: CheckArgs, config: &ShapegenConfig) -> Result<()> {
    ui::info(&format!("Checking {}", args.declarations.display()));

    let search_paths = utils::search_paths(config, &args.search_paths);
    let run = utils::run_unit(&args.declarations, &search_paths, &config.engine)?;
    if !search_paths.is_empty() && run.upstream_sources == 0 {
        ui::warning("No upstream metadata was found on the search paths");
    }

    let plan = run.report.outcome?;
    let variants: usize = plan.containers.iter().map(|c| c.variants.len()).sum();
    ui::success(&format!(
        "{} model(s) valid: {} container(s), {} variant type(s)",
        run.report.metadata.models.len(),
        plan.containers.len(),
        variants
    ));
    Ok(())
}
