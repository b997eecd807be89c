//! Placeholder containers emitted before any model is built.
//!
//! The stub pass only needs names and variant lists. It registers every
//! container in the [`SymbolTable`] so field types in the build pass can
//! refer to models of the same unit.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shapegen_config::EngineOptions;
use shapegen_graph::{CONTAINER_SUFFIX, ModelRef, Variant, Visibility, qualify};
use tracing::debug;

use crate::declaration::{ModelDeclaration, UnitDeclarations};
use crate::directives::resolve_model_variants;
use crate::error::UsageError;
use crate::symbols::SymbolTable;

/// Placeholders for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubPlan {
    /// One container per public family.
    pub public: Vec<StubContainer>,
    /// Internal families, emitted together.
    pub internal: Vec<StubContainer>,
}

impl StubPlan {
    pub fn containers(&self) -> impl Iterator<Item = &StubContainer> {
        self.public.iter().chain(&self.internal)
    }

    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.internal.is_empty()
    }
}

/// A closed family container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubContainer {
    /// Qualified container name (`app.UserSchema`).
    pub name: String,
    pub visibility: Visibility,
    pub serializable: bool,
    pub shape: StubShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StubShape {
    /// A plain family: one nested placeholder per variant.
    Variants { variants: Vec<Variant> },
    /// A versioned family: one nested interface per version.
    Versions { versions: Vec<StubVersion> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubVersion {
    pub name: String,
    pub serializable: bool,
    pub variants: Vec<Variant>,
}

/// Plan placeholders for every visible declaration and register them.
pub fn build_stubs(
    unit: &UnitDeclarations,
    options: &EngineOptions,
    symbols: &mut SymbolTable,
) -> Result<StubPlan, UsageError> {
    for decl in &unit.models {
        symbols.register_declaration(decl);
    }

    let mut families: IndexMap<(String, String), Vec<&ModelDeclaration>> = IndexMap::new();
    for decl in unit.visible_models() {
        families
            .entry((decl.namespace.clone(), decl.base_name().to_string()))
            .or_default()
            .push(decl);
    }

    let mut plan = StubPlan::default();
    for ((namespace, base), versions) in families {
        let container = stub_container(&namespace, &base, &versions, options, symbols)?;
        match container.visibility {
            Visibility::Public => plan.public.push(container),
            Visibility::Internal => plan.internal.push(container),
        }
    }

    debug!(
        public = plan.public.len(),
        internal = plan.internal.len(),
        "planned stub containers"
    );
    Ok(plan)
}

fn stub_container(
    namespace: &str,
    base: &str,
    versions: &[&ModelDeclaration],
    options: &EngineOptions,
    symbols: &mut SymbolTable,
) -> Result<StubContainer, UsageError> {
    let directive = options.serializable_directive.as_str();
    let serializable = versions.iter().any(|decl| decl.mentions_directive(directive));
    let representative = versions[0];

    let shape = if representative.family.is_some() {
        let mut stubs = Vec::with_capacity(versions.len());
        for decl in versions {
            let variants: Vec<Variant> =
                resolve_model_variants(&decl.name, &decl.model)?.into_iter().collect();
            symbols.register_container(ModelRef::versioned(namespace, base, &decl.name), &variants);
            stubs.push(StubVersion {
                name: decl.name.clone(),
                serializable: serializable || decl.mentions_directive(directive),
                variants,
            });
        }
        StubShape::Versions { versions: stubs }
    } else {
        let variants: Vec<Variant> =
            resolve_model_variants(&representative.name, &representative.model)?
                .into_iter()
                .collect();
        symbols.register_container(ModelRef::unversioned(namespace, base), &variants);
        StubShape::Variants { variants }
    };

    Ok(StubContainer {
        name: qualify(namespace, &format!("{base}{CONTAINER_SUFFIX}")),
        visibility: representative.model.visibility,
        serializable,
        shape,
    })
}
