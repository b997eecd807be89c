//! Pipeline shared by `build` and `check`.

use std::fs;
use std::path::{Path, PathBuf};

use shapegen_config::{EngineOptions, ShapegenConfig};
use shapegen_core::{BuildSession, FinishReport, ProcessOutcome, StubPlan, UnitDeclarations};
use tracing::debug;

use crate::error::{CliError, Result};

/// Outcome of running one unit through both passes.
pub(crate) struct UnitRun {
    pub stubs: StubPlan,
    pub upstream_sources: usize,
    pub report: FinishReport,
}

pub(crate) fn read_declarations(path: &Path) -> Result<UnitDeclarations> {
    if !path.exists() {
        return Err(CliError::DeclarationsNotFound(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    UnitDeclarations::from_json(&source).map_err(|source| CliError::InvalidDeclarations {
        path: path.to_path_buf(),
        source,
    })
}

/// Configured search paths followed by the ones given on the command line.
pub(crate) fn search_paths(config: &ShapegenConfig, extra: &[PathBuf]) -> Vec<PathBuf> {
    config
        .metadata
        .search_paths
        .iter()
        .chain(extra)
        .cloned()
        .collect()
}

/// Run the stub and build passes, then finish the session.
///
/// Usage errors from either pass abort immediately; validation failures are
/// left in the returned report.
pub(crate) fn run_unit(
    declarations: &Path,
    search_paths: &[PathBuf],
    options: &EngineOptions,
) -> Result<UnitRun> {
    let unit = read_declarations(declarations)?;
    let mut session = BuildSession::with_search_paths(options.clone(), search_paths);
    let upstream_sources = session.upstream().sources.len();

    let stubs = match session.process(&unit)? {
        ProcessOutcome::Stubs(stubs) => stubs,
        ProcessOutcome::Built { .. } => StubPlan::default(),
    };
    debug!(containers = stubs.containers().count(), "stub pass");
    session.process(&unit)?;

    Ok(UnitRun {
        stubs,
        upstream_sources,
        report: session.finish(),
    })
}
