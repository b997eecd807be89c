//! Shared helpers for shapegen-core integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use shapegen_config::EngineOptions;
use shapegen_core::upstream::UpstreamMetadata;
use shapegen_core::{BuildSession, FinishReport, UnitDeclarations};

/// Parse a unit from inline JSON.
pub fn unit(json: &str) -> UnitDeclarations {
    UnitDeclarations::from_json(json).expect("unit declarations should parse")
}

/// Run both passes and finish, with no upstream metadata.
pub fn build(unit: &UnitDeclarations) -> FinishReport {
    run(
        BuildSession::new(EngineOptions::default(), UpstreamMetadata::default()),
        unit,
    )
}

/// Run both passes and finish with custom engine options.
pub fn build_with_options(unit: &UnitDeclarations, options: EngineOptions) -> FinishReport {
    run(BuildSession::new(options, UpstreamMetadata::default()), unit)
}

/// Run both passes and finish, reading upstream metadata from `search_paths`.
pub fn build_with_upstream(unit: &UnitDeclarations, search_paths: &[PathBuf]) -> FinishReport {
    run(
        BuildSession::with_search_paths(EngineOptions::default(), search_paths),
        unit,
    )
}

fn run(mut session: BuildSession, unit: &UnitDeclarations) -> FinishReport {
    session.process(unit).expect("stub pass");
    session.process(unit).expect("build pass");
    session.finish()
}
