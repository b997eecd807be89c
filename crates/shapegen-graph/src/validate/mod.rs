//! Whole-graph validation.
//!
//! Runs over the merged model set of a build. Flattening cycles are checked
//! first; when any exist they are the only thing reported, since every later
//! check expands flattened fields. Otherwise unknown references, flattening
//! collisions, empty variants and cross-model dependency problems are all
//! collected into one [`ValidationReport`].

mod cycles;
mod effective;
mod report;

pub use cycles::find_cycles;
pub use effective::EffectiveFields;
pub use report::{ValidationIssue, ValidationReport};

use indexmap::IndexMap;
use tracing::debug;

use crate::index::ModelIndex;
use crate::model::Model;
use crate::model_ref::ModelRef;
use crate::property::PropertyKind;
use crate::variant::Variant;

/// Variants whose foreign references must exist on the target.
const DEPENDENT_VARIANTS: [Variant; 2] = [Variant::CreateRequest, Variant::PatchRequest];

/// Validate the merged model set.
pub fn validate(index: &ModelIndex) -> Result<(), ValidationReport> {
    GraphValidator::new(index).run()
}

/// Holds the index and the effective field cache for one validation run.
pub struct GraphValidator<'a> {
    index: &'a ModelIndex,
    effective: EffectiveFields<'a>,
}

impl<'a> GraphValidator<'a> {
    pub fn new(index: &'a ModelIndex) -> Self {
        Self {
            index,
            effective: EffectiveFields::new(index),
        }
    }

    pub fn run(mut self) -> Result<(), ValidationReport> {
        let cycles = find_cycles(self.index);
        if !cycles.is_empty() {
            debug!(count = cycles.len(), "flattening cycles found, skipping remaining checks");
            let issues = cycles
                .into_iter()
                .map(|path| ValidationIssue::Cycle { path })
                .collect();
            return Err(ValidationReport::new(issues));
        }

        let index = self.index;
        let mut issues = self.unknown_references();
        for (key, model) in index.iter() {
            issues.extend(self.collisions(key, model));
            issues.extend(self.empty_variants(key, model));
            issues.extend(self.dependencies(key, model));
        }

        debug!(
            models = self.index.len(),
            issues = issues.len(),
            "graph validation finished"
        );
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport::new(issues))
        }
    }

    fn unknown_references(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (key, model) in self.index.iter() {
            for property in &model.properties {
                let targets = match &property.kind {
                    PropertyKind::Regular => Vec::new(),
                    PropertyKind::Foreign { .. } => property.foreign_targets(),
                    PropertyKind::Flattened { target } => vec![target],
                };
                for target in targets {
                    if !self.index.contains(target) {
                        issues.push(ValidationIssue::UnknownReference {
                            model: key.clone(),
                            property: property.name.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        issues
    }

    fn collisions(&mut self, key: &ModelRef, model: &Model) -> Vec<ValidationIssue> {
        let local: Vec<&str> = model
            .properties
            .iter()
            .filter(|property| !property.is_flattened())
            .map(|property| property.name.as_str())
            .collect();

        let mut issues = Vec::new();
        let mut produced: IndexMap<String, &str> = IndexMap::new();
        for property in &model.properties {
            let Some(target) = property.flatten_target() else {
                continue;
            };
            for field in self.effective.across_variants(target) {
                if local.contains(&field.as_str()) {
                    issues.push(ValidationIssue::LocalCollision {
                        model: key.clone(),
                        field: field.clone(),
                        flattened: property.name.clone(),
                    });
                }
                if let Some(first) = produced.get(&field) {
                    issues.push(ValidationIssue::FlattenCollision {
                        model: key.clone(),
                        field: field.clone(),
                        first: (*first).to_string(),
                        second: property.name.clone(),
                    });
                }
                produced.insert(field, property.name.as_str());
            }
        }
        issues
    }

    fn empty_variants(&mut self, key: &ModelRef, model: &Model) -> Option<ValidationIssue> {
        let failing: Vec<Variant> = model
            .variants
            .iter()
            .copied()
            .filter(|variant| self.effective.get(key, *variant).is_empty())
            .collect();

        (!failing.is_empty()).then(|| ValidationIssue::EmptyVariants {
            model: key.clone(),
            declared: model.variants.clone(),
            failing,
        })
    }

    fn dependencies(&self, key: &ModelRef, model: &Model) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for property in &model.properties {
            for target_key in property.foreign_targets() {
                let Some(target) = self.index.get(target_key) else {
                    continue;
                };
                for variant in DEPENDENT_VARIANTS {
                    if property.applies_to(variant) && !target.declares(variant) {
                        issues.push(ValidationIssue::MissingDependency {
                            parent: key.clone(),
                            parent_variants: model.variants.clone(),
                            property: property.name.clone(),
                            target: target_key.clone(),
                            target_variants: target.variants.clone(),
                            variant,
                        });
                    }
                }
            }
        }
        issues
    }
}
