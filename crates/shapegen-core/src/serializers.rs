//! Serializer expressions and the per-container patch serializer cache.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use shapegen_config::EngineOptions;
use shapegen_graph::{SerializerMappings, qualify};
use tracing::debug;

use crate::type_name::TypeName;

/// An expression constructing the serializer of a type, e.g.
/// `serde.builtins.ListSerializer(app.Tag.serializer()).nullable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializerExpr(String);

impl SerializerExpr {
    pub fn build(base: &TypeName, mappings: &SerializerMappings, options: &EngineOptions) -> Self {
        Self(render(base, mappings, options))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerializerExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn render(ty: &TypeName, mappings: &SerializerMappings, options: &EngineOptions) -> String {
    let collections = &options.collections;
    let args: Vec<String> = ty
        .args
        .iter()
        .map(|arg| render(arg, mappings, options))
        .collect();

    // Overrides win over collection combinators, generic or not.
    let expr = match (mappings.get(&ty.raw), args.as_slice()) {
        (Some(mapping), _) if mapping.is_serializer_object => mapping.serializer_fqn.clone(),
        (Some(mapping), args) => format!("{}({})", mapping.serializer_fqn, args.join(", ")),
        (None, []) => format!("{}.serializer()", ty.raw),
        (None, [element]) if ty.raw == collections.list => {
            format!("{}({element})", collections.list_serializer)
        }
        (None, [element]) if ty.raw == collections.set => {
            format!("{}({element})", collections.set_serializer)
        }
        (None, [key, value]) if ty.raw == collections.map => {
            format!("{}({key}, {value})", collections.map_serializer)
        }
        (None, args) => format!("{}.serializer({})", ty.raw, args.join(", ")),
    };

    if ty.nullable {
        format!("{expr}.{}", collections.nullable_adapter)
    } else {
        expr
    }
}

/// A synthesized serializer for one patch-wrapped field type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSerializer {
    /// Qualified name of the generated serializer.
    pub name: String,
    /// The unwrapped field type it handles.
    pub ty: TypeName,
    /// Serializer of the unwrapped type, handed to the base class.
    pub expr: SerializerExpr,
}

/// Deduplicating registry of patch serializers for one container.
///
/// Two fields share a serializer when both their rendered type and their
/// serializer expression agree.
#[derive(Debug, Clone)]
pub struct PatchSerializers {
    namespace: String,
    owner: String,
    entries: IndexMap<String, PatchSerializer>,
    counter: usize,
}

impl PatchSerializers {
    pub fn new(namespace: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            owner: owner.into(),
            entries: IndexMap::new(),
            counter: 0,
        }
    }

    /// Qualified name of the serializer for `base`, registering a new one
    /// on first use.
    pub fn get_or_register(
        &mut self,
        base: &TypeName,
        mappings: &SerializerMappings,
        options: &EngineOptions,
    ) -> &str {
        let expr = SerializerExpr::build(base, mappings, options);
        let key = format!("{base}::{expr}");
        let entry = match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let simple = format!("_{}PatchSerializer{}", self.owner, self.counter);
                self.counter += 1;
                debug!(serializer = %simple, ty = %base, "registered patch serializer");
                entry.insert(PatchSerializer {
                    name: qualify(&self.namespace, &simple),
                    ty: base.clone(),
                    expr,
                })
            }
        };
        &entry.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<PatchSerializer> {
        self.entries.into_values().collect()
    }
}
