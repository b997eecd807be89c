//! Names known to the classifier: generated containers and abstract models.

use rustc_hash::{FxHashMap, FxHashSet};
use shapegen_graph::{CONTAINER_SUFFIX, Model, ModelRef, Variant, qualify};

use crate::declaration::ModelDeclaration;

/// Registry of generated container paths, filled by the stub phase and by
/// upstream metadata.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Referencable containers (`ns.UserSchema`, `ns.AccountSchema.V1`).
    containers: FxHashMap<String, ModelRef>,
    /// Root container of every family, hidden or not.
    families: FxHashSet<String>,
    /// Nested placeholders that are ordinary types (`ns.UserSchema.Data`).
    placeholders: FxHashSet<String>,
    /// Abstract declarations mapped to the container to use instead.
    abstract_models: FxHashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the container a model is referenced through plus its
    /// per-variant placeholders.
    pub fn register_container<'a>(
        &mut self,
        target: ModelRef,
        variants: impl IntoIterator<Item = &'a Variant>,
    ) {
        let path = target.referenced_name();
        for variant in variants {
            self.placeholders.insert(format!("{path}.{}", variant.suffix()));
        }
        self.families.insert(target.container_name());
        self.containers.insert(path, target);
    }

    /// Record a declaration so direct references to it can be rejected.
    /// Hidden declarations are recorded too.
    pub fn register_declaration(&mut self, decl: &ModelDeclaration) {
        let container = format!("{}{CONTAINER_SUFFIX}", decl.base_name());
        self.families.insert(qualify(&decl.namespace, &container));
        match &decl.family {
            Some(family) => {
                self.abstract_models
                    .insert(qualify(&decl.namespace, family), container.clone());
                self.abstract_models
                    .insert(decl.qualified_name(), format!("{container}.{}", decl.name));
            }
            None => {
                self.abstract_models.insert(decl.qualified_name(), container);
            }
        }
    }

    /// Register models built by upstream units.
    pub fn register_upstream<'a>(&mut self, models: impl IntoIterator<Item = &'a Model>) {
        for model in models {
            let key = model.key();
            let container = format!("{}{CONTAINER_SUFFIX}", key.base_name);
            match &key.version {
                Some(version) => {
                    self.abstract_models.insert(
                        qualify(&key.namespace, &format!("{}.{version}", key.base_name)),
                        format!("{container}.{version}"),
                    );
                }
                None => {
                    self.abstract_models
                        .insert(qualify(&key.namespace, &key.base_name), container);
                }
            }
            self.register_container(key, &model.variants);
        }
    }

    /// Model a container path refers to.
    pub fn target(&self, name: &str) -> Option<&ModelRef> {
        self.containers.get(name)
    }

    /// Container to reference instead of the abstract declaration `name`.
    pub fn abstract_suggestion(&self, name: &str) -> Option<&str> {
        self.abstract_models.get(name).map(String::as_str)
    }

    /// A name inside some family's container that does not resolve to a
    /// referencable container or a placeholder.
    pub fn is_dangling_container_path(&self, name: &str) -> bool {
        if self.containers.contains_key(name) || self.placeholders.contains(name) {
            return false;
        }
        let mut prefix = name;
        loop {
            if self.families.contains(prefix) {
                return true;
            }
            match prefix.rsplit_once('.') {
                Some((head, _)) => prefix = head,
                None => return false,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
