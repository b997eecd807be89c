//! Global type → serializer overrides.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Associates a type with the serializer that must be used for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializerMapping {
    pub type_fqn: String,
    pub serializer_fqn: String,
    /// The serializer is a singleton and is referenced without construction.
    pub is_serializer_object: bool,
}

impl SerializerMapping {
    pub fn new(
        type_fqn: impl Into<String>,
        serializer_fqn: impl Into<String>,
        is_serializer_object: bool,
    ) -> Self {
        Self {
            type_fqn: type_fqn.into(),
            serializer_fqn: serializer_fqn.into(),
            is_serializer_object,
        }
    }
}

/// Mappings keyed by the overridden type's qualified name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializerMappings(IndexMap<String, SerializerMapping>);

impl SerializerMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, replacing any earlier one for the same type.
    pub fn insert(&mut self, mapping: SerializerMapping) {
        self.0.insert(mapping.type_fqn.clone(), mapping);
    }

    pub fn get(&self, type_fqn: &str) -> Option<&SerializerMapping> {
        self.0.get(type_fqn)
    }

    pub fn contains(&self, type_fqn: &str) -> bool {
        self.0.contains_key(type_fqn)
    }

    /// Overlay `other` on top of `self`; entries from `other` win.
    pub fn merge(&mut self, other: &SerializerMappings) {
        for mapping in other.iter() {
            self.insert(mapping.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SerializerMapping> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<SerializerMapping> for SerializerMappings {
    fn from_iter<I: IntoIterator<Item = SerializerMapping>>(iter: I) -> Self {
        let mut mappings = Self::new();
        for mapping in iter {
            mappings.insert(mapping);
        }
        mappings
    }
}
