//! Build command: run a unit and write its artifacts.
//!
//! `shapegen-models.json` is always written once the build pass succeeds;
//! `emission.json` only when the merged graph validates.

use std::fs;
use std::path::{Path, PathBuf};

use shapegen_config::ShapegenConfig;
use shapegen_core::{EmissionPlan, StubPlan, upstream};
use tracing::info;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// File receiving the emission plan.
pub const EMISSION_FILE_NAME: &str = "emission.json";

/// File receiving the stub plan.
pub const STUBS_FILE_NAME: &str = "stubs.json";

pub fn execute(args: BuildArgs, config: &ShapegenConfig) -> Result<()> {
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.metadata.output_dir.clone());
    let search_paths = utils::search_paths(config, &args.search_paths);

    ui::info(&format!("Building {}", args.declarations.display()));
    let run = utils::run_unit(&args.declarations, &search_paths, &config.engine)?;

    let metadata_path = upstream::write(&out_dir, &run.report.metadata)?;
    info!(path = %metadata_path.display(), "wrote metadata");

    let plan = run.report.outcome?;
    write_stubs(&out_dir, &run.stubs)?;
    let emission_path = write_plan(&out_dir, &plan)?;

    ui::success(&format!(
        "Built {} model(s) into {} container(s) ({})",
        run.report.metadata.models.len(),
        plan.containers.len(),
        emission_path.display()
    ));
    Ok(())
}

fn write_plan(out_dir: &Path, plan: &EmissionPlan) -> Result<PathBuf> {
    write_json(out_dir.join(EMISSION_FILE_NAME), plan.to_json()?)
}

fn write_stubs(out_dir: &Path, stubs: &StubPlan) -> Result<PathBuf> {
    write_json(out_dir.join(STUBS_FILE_NAME), serde_json::to_string_pretty(stubs)?)
}

fn write_json(path: PathBuf, json: String) -> Result<PathBuf> {
    match fs::write(&path, json) {
        Ok(()) => Ok(path),
        Err(source) => Err(CliError::Write { path, source }),
    }
}
