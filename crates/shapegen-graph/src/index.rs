//! Lookup of models by graph key.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::model::Model;
use crate::model_ref::ModelRef;

/// The merged model set of one build, keyed by [`ModelRef`].
///
/// Insertion order is preserved so every traversal (and therefore every
/// report) is deterministic. When two models share a key the first one wins;
/// callers insert local models before upstream ones.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    models: IndexMap<ModelRef, Model>,
}

impl ModelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from models in priority order.
    pub fn from_models<I>(models: I) -> Self
    where
        I: IntoIterator<Item = Model>,
    {
        let mut index = Self::new();
        for model in models {
            index.insert(model);
        }
        index
    }

    /// Insert `model` unless a model with the same key is already present.
    /// Returns whether it was inserted.
    pub fn insert(&mut self, model: Model) -> bool {
        match self.models.entry(model.key()) {
            Entry::Occupied(entry) => {
                debug!(model = %entry.key(), "skipping duplicate model");
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(model);
                true
            }
        }
    }

    pub fn get(&self, key: &ModelRef) -> Option<&Model> {
        self.models.get(key)
    }

    /// The stored key together with its model.
    pub fn get_key_value(&self, key: &ModelRef) -> Option<(&ModelRef, &Model)> {
        self.models.get_key_value(key)
    }

    pub fn contains(&self, key: &ModelRef) -> bool {
        self.models.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelRef, &Model)> {
        self.models.iter()
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<Model> for ModelIndex {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        Self::from_models(iter)
    }
}
