//! # shapegen-core
//!
//! Two-phase model build, variant type derivation and patch serializer
//! synthesis.
//!
//! The host feeds a unit's declarations to a [`BuildSession`] twice: the stub
//! pass returns placeholder containers, the build pass turns declarations into
//! [`shapegen_graph::Model`]s. [`BuildSession::finish`] validates the models
//! together with every upstream unit's metadata and returns an
//! [`EmissionPlan`] describing each variant type to emit.
//!
//! ## Example
//!
//! ```rust
//! use shapegen_config::EngineOptions;
//! use shapegen_core::{BuildSession, UnitDeclarations, upstream::UpstreamMetadata};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let unit = UnitDeclarations::from_json(r#"{ "models": [{
//!     "name": "User", "namespace": "app",
//!     "model": { "variants": ["DATA", "PATCH"] },
//!     "fields": [{ "name": "name", "ty": { "name": "core.String" } }]
//! }] }"#)?;
//!
//! let mut session = BuildSession::new(EngineOptions::default(), UpstreamMetadata::default());
//! session.process(&unit)?;
//! session.process(&unit)?;
//! let plan = session.finish().outcome?;
//!
//! let patch = plan.variant("app.UserSchema.PatchRequest").expect("patch variant");
//! assert_eq!(
//!     patch.fields[0].ty.to_string(),
//!     "shapegen.runtime.Patchable<core.String>"
//! );
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod declaration;
pub mod derive;
pub mod directives;
pub mod emit;
pub mod error;
pub mod patch;
pub mod serializers;
pub mod session;
pub mod stub;
pub mod symbols;
pub mod type_name;
pub mod upstream;

pub use declaration::{ConfigDeclaration, DeclaredType, FieldDeclaration, ModelDeclaration, UnitDeclarations};
pub use derive::TypeDeriver;
pub use emit::{ContainerRequest, EmissionPlan, FieldDefault, FieldRequest, VariantRequest};
pub use error::{BuildError, DeriveError, MetadataError, PhaseError, Result, UsageError};
pub use patch::Patch;
pub use serializers::{PatchSerializers, SerializerExpr};
pub use session::{BuildSession, FinishReport, Phase, ProcessOutcome};
pub use stub::{StubContainer, StubPlan};
pub use type_name::{SerialMarker, TypeName};
