//! Per-unit build orchestration.
//!
//! A [`BuildSession`] is driven by the host in a fixed order:
//!
//! ```text
//!  process() ──▶ STUB ──▶ process() ──▶ BUILD ──▶ finish()
//!               StubPlan               models     validate + EmissionPlan
//! ```
//!
//! The stub pass only registers placeholder containers so that the build pass
//! can resolve field types pointing at models of the same unit. Upstream
//! metadata is loaded once, when the session is created.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shapegen_config::EngineOptions;
use shapegen_graph::{Model, ModelIndex, ModuleMetadata, SerializerMappings, validate};
use tracing::{debug, info};

use crate::classify::PropertyClassifier;
use crate::declaration::{ModelDeclaration, UnitDeclarations};
use crate::directives::{
    resolve_apply, resolve_global_config, resolve_model_variants, resolve_property_variants,
    resolve_versioning,
};
use crate::emit::{EmissionPlan, Emitter};
use crate::error::{PhaseError, Result};
use crate::stub::{StubPlan, build_stubs};
use crate::symbols::SymbolTable;
use crate::upstream::{self, UpstreamMetadata};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Stub,
    Build,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Stub => "stub",
            Phase::Build => "build",
            Phase::Finished => "finished",
        })
    }
}

/// Result of one [`BuildSession::process`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Placeholders to emit before the build pass.
    Stubs(StubPlan),
    /// The build pass completed with this many models.
    Built { models: usize },
}

/// Output of [`BuildSession::finish`].
///
/// `metadata` is always present so downstream units can be configured even
/// when this unit failed validation.
#[derive(Debug)]
pub struct FinishReport {
    pub metadata: ModuleMetadata,
    pub outcome: Result<EmissionPlan>,
}

/// State of one unit's build.
#[derive(Debug)]
pub struct BuildSession {
    options: EngineOptions,
    upstream: UpstreamMetadata,
    symbols: SymbolTable,
    phase: Phase,
    models: Vec<Model>,
    global_serializers: SerializerMappings,
}

impl BuildSession {
    pub fn new(options: EngineOptions, upstream: UpstreamMetadata) -> Self {
        Self {
            options,
            upstream,
            symbols: SymbolTable::new(),
            phase: Phase::Stub,
            models: Vec::new(),
            global_serializers: SerializerMappings::new(),
        }
    }

    /// Create a session, loading upstream metadata from `search_paths`.
    pub fn with_search_paths(options: EngineOptions, search_paths: &[PathBuf]) -> Self {
        Self::new(options, upstream::load(search_paths))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Models built by the build pass.
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn upstream(&self) -> &UpstreamMetadata {
        &self.upstream
    }

    /// Run the next pass over `unit`.
    pub fn process(&mut self, unit: &UnitDeclarations) -> Result<ProcessOutcome> {
        match self.phase {
            Phase::Stub => {
                self.symbols.register_upstream(&self.upstream.models);
                let plan = build_stubs(unit, &self.options, &mut self.symbols);
                self.phase = Phase::Build;
                debug!(symbols = self.symbols.len(), "stub pass complete");
                Ok(ProcessOutcome::Stubs(plan?))
            }
            Phase::Build => {
                self.phase = Phase::Finished;
                let (models, global) = self.build(unit)?;
                debug!(models = models.len(), "build pass complete");
                self.models = models;
                self.global_serializers = global;
                Ok(ProcessOutcome::Built {
                    models: self.models.len(),
                })
            }
            Phase::Finished => Err(PhaseError::UnitComplete.into()),
        }
    }

    fn build(&self, unit: &UnitDeclarations) -> Result<(Vec<Model>, SerializerMappings)> {
        let global = resolve_global_config(&unit.configs, &self.options)?;
        let mut mappings = self.upstream.serializers.clone();
        mappings.merge(&global);

        let classifier = PropertyClassifier::new(&self.symbols);
        let models = unit
            .visible_models()
            .map(|decl| build_model(decl, &classifier, &mappings))
            .collect::<Result<Vec<_>>>()?;
        Ok((models, global))
    }

    /// Validate the merged graph and plan emission for this unit's models.
    pub fn finish(self) -> FinishReport {
        let metadata = ModuleMetadata::new(self.models.clone(), self.global_serializers.clone());
        let outcome = self.plan();
        match &outcome {
            Ok(plan) => info!(
                models = metadata.models.len(),
                containers = plan.containers.len(),
                "unit finished"
            ),
            Err(err) => info!(models = metadata.models.len(), error = %err, "unit failed"),
        }
        FinishReport { metadata, outcome }
    }

    fn plan(&self) -> Result<EmissionPlan> {
        if self.phase != Phase::Finished {
            return Err(PhaseError::NotBuilt { phase: self.phase }.into());
        }
        if self.models.is_empty() {
            return Ok(EmissionPlan::default());
        }

        let index = ModelIndex::from_models(
            self.models
                .iter()
                .chain(&self.upstream.models)
                .cloned(),
        );
        debug!(
            local = self.models.len(),
            merged = index.len(),
            "validating merged graph"
        );
        validate::validate(&index)?;
        Ok(Emitter::new(&index, &self.options).plan(&self.models)?)
    }
}

fn build_model(
    decl: &ModelDeclaration,
    classifier: &PropertyClassifier<'_>,
    mappings: &SerializerMappings,
) -> Result<Model> {
    let variants = resolve_model_variants(&decl.name, &decl.model)?;
    let versioning = resolve_versioning(decl)?;
    let configs = resolve_apply(&decl.name, &variants, &decl.apply)?;

    let mut builder = Model::builder(&decl.name, &decl.namespace, variants.clone())
        .visibility(decl.model.visibility)
        .auto_contextual(decl.model.auto_contextual)
        .type_serializers(mappings.clone());
    for field in &decl.fields {
        let field_variants =
            resolve_property_variants(&decl.name, &variants, field.property.as_ref())?;
        builder = builder.property(classifier.classify(&decl.name, field, field_variants)?);
    }
    for directive in &decl.directives {
        builder = builder.directive(directive);
    }
    for config in configs {
        builder = builder.directive_config(config);
    }
    for supertype in &decl.model.supertypes {
        builder = builder.supertype(supertype);
    }
    if let Some(versioning) = versioning {
        builder = builder.versioning(versioning);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, UsageError};

    fn unit(json: &str) -> UnitDeclarations {
        UnitDeclarations::from_json(json).unwrap()
    }

    fn session() -> BuildSession {
        BuildSession::new(EngineOptions::default(), UpstreamMetadata::default())
    }

    #[test]
    fn runs_both_passes_then_refuses_a_third() {
        let unit = unit(
            r#"{ "models": [{ "name": "User", "namespace": "app",
                 "model": { "variants": ["DATA"] },
                 "fields": [{ "name": "name", "ty": { "name": "core.String" } }] }] }"#,
        );
        let mut session = session();
        assert!(matches!(session.process(&unit), Ok(ProcessOutcome::Stubs(_))));
        assert_eq!(session.phase(), Phase::Build);
        assert!(matches!(
            session.process(&unit),
            Ok(ProcessOutcome::Built { models: 1 })
        ));
        assert!(matches!(
            session.process(&unit),
            Err(BuildError::Phase(PhaseError::UnitComplete))
        ));

        let report = session.finish();
        assert_eq!(report.metadata.models.len(), 1);
        let plan = report.outcome.unwrap();
        assert!(plan.variant("app.UserSchema.Data").is_some());
    }

    #[test]
    fn finish_before_build_is_a_phase_error() {
        let mut session = session();
        session.process(&UnitDeclarations::default()).unwrap();
        let report = session.finish();
        assert!(matches!(
            report.outcome,
            Err(BuildError::Phase(PhaseError::NotBuilt { phase: Phase::Build }))
        ));
        assert_eq!(
            PhaseError::NotBuilt { phase: Phase::Build }.to_string(),
            "cannot finish a unit in the build phase"
        );
    }

    #[test]
    fn stub_failure_still_advances_the_phase() {
        let bad = unit(r#"{ "models": [{ "name": "User" }] }"#);
        let mut session = session();
        assert!(matches!(
            session.process(&bad),
            Err(BuildError::Usage(UsageError::MissingVariants { .. }))
        ));
        assert_eq!(session.phase(), Phase::Build);
    }

    #[test]
    fn empty_unit_yields_empty_plan() {
        let mut session = session();
        let unit = UnitDeclarations::default();
        session.process(&unit).unwrap();
        session.process(&unit).unwrap();
        let report = session.finish();
        assert!(report.metadata.models.is_empty());
        assert!(report.outcome.unwrap().containers.is_empty());
    }

    #[test]
    fn global_config_exports_serializers() {
        let unit = unit(
            r#"{
                "models": [{ "name": "Event", "namespace": "app",
                    "model": { "variants": ["DATA"] },
                    "directives": ["serde.Serializable"],
                    "fields": [{ "name": "at", "ty": { "name": "time.Instant" } }] }],
                "configs": [{ "name": "app.Serialization", "singleton": true,
                    "serialization_config": true,
                    "serializers": [{ "target": "time.Instant",
                                      "serializer": "app.InstantSerializer",
                                      "serializer_is_object": true }] }]
            }"#,
        );
        let mut session = session();
        session.process(&unit).unwrap();
        session.process(&unit).unwrap();
        let report = session.finish();

        assert!(report.metadata.exported_serializers.contains("time.Instant"));
        let plan = report.outcome.unwrap();
        let at = plan.variant("app.EventSchema.Data").unwrap().field("at").unwrap();
        assert_eq!(at.serializer.as_deref(), Some("app.InstantSerializer"));
        assert_eq!(at.ty.to_string(), "@With(app.InstantSerializer) time.Instant");
    }

    #[test]
    fn two_configs_are_rejected_by_name() {
        let unit = unit(
            r#"{ "configs": [
                { "name": "a.One", "singleton": true, "serialization_config": true },
                { "name": "b.Two", "singleton": true, "serialization_config": true }
            ] }"#,
        );
        let mut session = session();
        session.process(&unit).unwrap();
        let err = session.process(&unit).unwrap_err();
        assert_eq!(err.to_string(), "multiple global configurations found: a.One, b.Two");
        assert!(session.models().is_empty());
    }
}
