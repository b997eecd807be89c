//! # shapegen-graph
//!
//! Pure data structures for the model graph plus whole-graph validation.
//!
//! A [`Model`] is a named bundle of [`Property`] values from which three
//! purpose-specific shapes ([`Variant`]s) are derived: a data view, a
//! create-request view and a patch-request view. Properties reference other
//! models by [`ModelRef`] key, never by pointer, so a graph with mutual
//! references is just a [`ModelIndex`] of plain values.
//!
//! ```text
//!  upstream ModuleMetadata ──┐
//!                            ├──▶ ModelIndex ──▶ validate() ──▶ ValidationReport
//!  local models ─────────────┘
//! ```
//!
//! Nothing here performs I/O; reading and writing [`ModuleMetadata`] files is
//! left to the build orchestration layer.
//!
//! ## Example
//!
//! ```rust
//! use shapegen_graph::{Model, ModelIndex, Property, TypeInfo, Variant, validate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let user = Model::builder("User", "app", Variant::all())
//!     .property(Property::regular("name", TypeInfo::new("core.String"), Variant::all()))
//!     .build()?;
//!
//! let index = ModelIndex::from_models([user]);
//! validate::validate(&index)?;
//! # Ok(())
//! # }
//! ```

pub mod index;
pub mod metadata;
pub mod model;
pub mod model_ref;
pub mod property;
pub mod serializer;
pub mod type_info;
pub mod validate;
pub mod variant;

pub use index::ModelIndex;
pub use metadata::{METADATA_FILE_NAME, ModuleMetadata};
pub use model::{
    DirectiveConfig, Model, ModelBuilder, ModelError, VERSION_FIELD, VERSION_FIELD_TYPE,
    Versioning, Visibility,
};
pub use model_ref::{CONTAINER_SUFFIX, ModelRef, qualify};
pub use property::{Property, PropertyKind};
pub use serializer::{SerializerMapping, SerializerMappings};
pub use type_info::TypeInfo;
pub use validate::{EffectiveFields, GraphValidator, ValidationIssue, ValidationReport};
pub use variant::{UnknownVariant, Variant, VariantSet, format_variants};
