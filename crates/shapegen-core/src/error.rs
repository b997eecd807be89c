//! Error types for the build pipeline.
//!
//! Usage errors abort a unit immediately and name the offending declaration.
//! Graph-level problems are collected into a [`ValidationReport`] instead.

use std::path::PathBuf;

use miette::Diagnostic;
use shapegen_graph::{ModelError, ModelRef, ValidationReport, Variant, VariantSet, format_variants};
use thiserror::Error;

use crate::session::Phase;

/// Misuse of the declaration surface.
#[derive(Error, Debug, Diagnostic)]
pub enum UsageError {
    #[error("model '{model}' does not declare any variants")]
    #[diagnostic(
        code(shapegen::usage::missing_variants),
        help("the 'variants' list of the model directive is mandatory, e.g. variants = [\"DATA\"]")
    )]
    MissingVariants { model: String },

    #[error("model '{model}' names unknown variant '{name}'")]
    #[diagnostic(
        code(shapegen::usage::unknown_variant),
        help("variants are DATA, CREATE and PATCH")
    )]
    UnknownVariant { model: String, name: String },

    #[error(
        "apply directive on '{model}' targets unknown variants {}; allowed variants are {}",
        format_variants(.offending),
        format_variants(.allowed)
    )]
    #[diagnostic(
        code(shapegen::usage::unknown_apply_variant),
        help("an apply directive can only target variants the model declares")
    )]
    UnknownApplyVariants {
        model: String,
        offending: VariantSet,
        allowed: VariantSet,
    },

    #[error("cannot determine the schema version of '{model}' in family '{family}'")]
    #[diagnostic(
        code(shapegen::usage::missing_schema_version),
        help("name the version 'V<number>' or add a schema_version directive")
    )]
    MissingSchemaVersion { model: String, family: String },

    #[error("'{model}' has a schema_version directive but is not part of a versioned family")]
    #[diagnostic(
        code(shapegen::usage::unexpected_schema_version),
        help("declare the model inside a family or remove schema_version")
    )]
    UnexpectedSchemaVersion { model: String },

    #[error("property '{field}' in '{model}' is mutable")]
    #[diagnostic(
        code(shapegen::usage::mutable_field),
        help("model fields must be immutable; declare '{field}' as read-only")
    )]
    MutableField { model: String, field: String },

    #[error("property '{field}' in '{model}' has an unresolvable type '{ty}'")]
    #[diagnostic(
        code(shapegen::usage::unresolved_type),
        help(
            "generated containers only exist for models declared in this unit or built upstream; \
             check that the referenced model is not hidden and that its unit is built first"
        )
    )]
    UnresolvedType {
        model: String,
        field: String,
        ty: String,
    },

    #[error("property '{field}' in '{model}' uses model '{ty}' directly")]
    #[diagnostic(
        code(shapegen::usage::abstract_model_reference),
        help("reference the generated container '{suggestion}' instead")
    )]
    AbstractModelReference {
        model: String,
        field: String,
        ty: String,
        suggestion: String,
    },

    #[error("property '{field}' in '{model}' flattens model '{ty}' directly")]
    #[diagnostic(
        code(shapegen::usage::flatten_abstract_model),
        help("flatten the generated container '{suggestion}' instead")
    )]
    FlattenAbstractModel {
        model: String,
        field: String,
        ty: String,
        suggestion: String,
    },

    #[error("flatten on property '{field}' in '{model}' is invalid: {reason}")]
    #[diagnostic(
        code(shapegen::usage::invalid_flatten_target),
        help("flatten can only be used on a non-nullable generated container such as 'AddressSchema'")
    )]
    InvalidFlattenTarget {
        model: String,
        field: String,
        reason: String,
    },

    #[error("multiple global configurations found: {}", .names.join(", "))]
    #[diagnostic(
        code(shapegen::usage::multiple_configs),
        help("only one global configuration is allowed per unit")
    )]
    MultipleConfigs { names: Vec<String> },

    #[error("global configuration '{name}' must be a singleton")]
    #[diagnostic(code(shapegen::usage::config_not_singleton))]
    ConfigNotSingleton { name: String },

    #[error("global configuration '{name}' must implement '{capability}'")]
    #[diagnostic(code(shapegen::usage::config_missing_capability))]
    ConfigMissingCapability { name: String, capability: String },

    #[error(transparent)]
    #[diagnostic(code(shapegen::usage::invalid_model))]
    InvalidModel(#[from] ModelError),
}

/// Failure to derive a variant type from the graph.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum DeriveError {
    #[error("variant {variant} is not declared by '{model}'")]
    #[diagnostic(
        code(shapegen::derive::variant_not_declared),
        help("add {variant} to the model's variants")
    )]
    VariantNotDeclared { model: String, variant: Variant },

    #[error("property '{property}' of '{model}' is not part of variant {variant}")]
    #[diagnostic(code(shapegen::derive::property_not_in_variant))]
    PropertyNotInVariant {
        model: String,
        property: String,
        variant: Variant,
    },

    #[error("property '{property}' of '{model}' is flattened and has no type of its own")]
    #[diagnostic(
        code(shapegen::derive::flattened_property),
        help("derive the model's fields instead to expand flattened properties")
    )]
    FlattenedProperty { model: String, property: String },

    #[error("property '{property}' of '{model}' references unknown model '{target}'")]
    #[diagnostic(code(shapegen::derive::unknown_target))]
    UnknownTarget {
        model: String,
        property: String,
        target: ModelRef,
    },

    #[error("flattening '{model}' loops back through '{target}'")]
    #[diagnostic(code(shapegen::derive::flatten_cycle))]
    FlattenCycle { model: String, target: ModelRef },
}

/// Problems with a metadata artifact.
#[derive(Error, Debug, Diagnostic)]
pub enum MetadataError {
    #[error("metadata file not found: {}", .path.display())]
    #[diagnostic(code(shapegen::metadata::missing))]
    Missing { path: PathBuf },

    #[error("metadata file is empty: {}", .path.display())]
    #[diagnostic(code(shapegen::metadata::empty))]
    Empty { path: PathBuf },

    #[error("failed to read metadata file {}: {source}", .path.display())]
    #[diagnostic(code(shapegen::metadata::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse metadata file {}: {source}", .path.display())]
    #[diagnostic(
        code(shapegen::metadata::parse),
        help("the file may have been written by an incompatible version; rebuild the upstream unit")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode metadata for {}: {source}", .path.display())]
    #[diagnostic(code(shapegen::metadata::encode))]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A session method was called out of order.
#[derive(Error, Debug, Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    #[error("the unit has already been processed twice")]
    #[diagnostic(
        code(shapegen::phase::unit_complete),
        help("a session runs exactly one stub pass and one build pass")
    )]
    UnitComplete,

    #[error("cannot finish a unit in the {phase} phase")]
    #[diagnostic(code(shapegen::phase::not_built), help("run the build pass before finishing"))]
    NotBuilt { phase: Phase },
}

/// Any fatal outcome of a build.
#[derive(Error, Debug, Diagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    #[diagnostic(
        code(shapegen::validation_failed),
        help("every issue above must be fixed before types can be emitted")
    )]
    Validation(#[from] ValidationReport),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Derive(#[from] DeriveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Phase(#[from] PhaseError),
}

impl From<ModelError> for BuildError {
    fn from(err: ModelError) -> Self {
        Self::Usage(UsageError::InvalidModel(err))
    }
}

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_error_lists_offending_and_allowed() {
        let err = UsageError::UnknownApplyVariants {
            model: "User".into(),
            offending: [Variant::PatchRequest].into_iter().collect(),
            allowed: [Variant::Data, Variant::CreateRequest].into_iter().collect(),
        };
        assert_eq!(
            err.to_string(),
            "apply directive on 'User' targets unknown variants [PATCH]; allowed variants are [DATA, CREATE]"
        );
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("shapegen::usage::unknown_apply_variant")
        );
    }

    #[test]
    fn build_error_forwards_usage_diagnostics() {
        let err: BuildError = UsageError::MultipleConfigs {
            names: vec!["A".into(), "B".into()],
        }
        .into();
        assert_eq!(err.to_string(), "multiple global configurations found: A, B");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("shapegen::usage::multiple_configs")
        );
    }
}
