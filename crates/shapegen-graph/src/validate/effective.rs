//! Effective per-variant field sets.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::index::ModelIndex;
use crate::model::VERSION_FIELD;
use crate::model_ref::ModelRef;
use crate::property::PropertyKind;
use crate::variant::Variant;

/// Memoised effective field names per `(model, variant)`.
///
/// A model's effective fields for a variant are its own non-flattened
/// properties carrying the variant, plus the effective fields of every
/// flattened target whose property carries the variant, minus the version
/// discriminator. Names keep declaration order with flattened fields inlined
/// in place of the flattening property.
///
/// Unknown targets contribute nothing. A target that is still being expanded
/// (only possible on a cyclic graph) also contributes nothing, so the
/// computation always terminates.
pub struct EffectiveFields<'a> {
    index: &'a ModelIndex,
    memo: FxHashMap<(ModelRef, Variant), IndexSet<String>>,
}

impl<'a> EffectiveFields<'a> {
    pub fn new(index: &'a ModelIndex) -> Self {
        Self {
            index,
            memo: FxHashMap::default(),
        }
    }

    /// Effective field names of `key` for `variant`.
    pub fn get(&mut self, key: &ModelRef, variant: Variant) -> &IndexSet<String> {
        let slot = (key.clone(), variant);
        if !self.memo.contains_key(&slot) {
            self.fill(key, variant);
        }
        self.memo.entry(slot).or_default()
    }

    /// Union of the effective names over every variant.
    pub fn across_variants(&mut self, key: &ModelRef) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for variant in Variant::ALL {
            names.extend(self.get(key, variant).iter().cloned());
        }
        names
    }

    /// Post-order expansion with an explicit stack.
    fn fill(&mut self, root: &ModelRef, variant: Variant) {
        let index = self.index;
        let mut entered: FxHashSet<ModelRef> = FxHashSet::default();
        let mut stack = vec![(root.clone(), false)];

        while let Some((key, expanded)) = stack.pop() {
            let slot = (key, variant);
            if self.memo.contains_key(&slot) {
                continue;
            }
            let key = slot.0;
            let Some(model) = index.get(&key) else {
                self.memo.insert((key, variant), IndexSet::new());
                continue;
            };

            if !expanded {
                if !entered.insert(key.clone()) {
                    continue;
                }
                let pending: Vec<ModelRef> = model
                    .properties
                    .iter()
                    .filter(|property| property.applies_to(variant))
                    .filter_map(|property| property.flatten_target())
                    .filter(|target| !self.memo.contains_key(&((*target).clone(), variant)))
                    .cloned()
                    .collect();
                stack.push((key, true));
                stack.extend(pending.into_iter().rev().map(|target| (target, false)));
                continue;
            }

            let mut fields = IndexSet::new();
            for property in model.properties.iter().filter(|p| p.applies_to(variant)) {
                match &property.kind {
                    PropertyKind::Regular | PropertyKind::Foreign { .. } => {
                        fields.insert(property.name.clone());
                    }
                    PropertyKind::Flattened { target } => {
                        if let Some(inner) = self.memo.get(&(target.clone(), variant)) {
                            fields.extend(inner.iter().cloned());
                        }
                    }
                }
            }
            fields.shift_remove(VERSION_FIELD);
            self.memo.insert((key, variant), fields);
        }
    }
}
