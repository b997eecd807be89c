//! Aggregated graph validation findings.

use std::fmt;

use crate::model_ref::ModelRef;
use crate::variant::{Variant, VariantSet, format_variants};

const ISSUE_SEPARATOR: &str = "\n\n--------------------------------------------------\n\n";

/// One graph-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Flattening loops back on itself; `path` starts and ends with the same model.
    Cycle { path: Vec<ModelRef> },
    /// A foreign or flattened property points at a model that is not in the graph.
    UnknownReference {
        model: ModelRef,
        property: String,
        target: ModelRef,
    },
    /// A flattened field shadows a field declared on the model itself.
    LocalCollision {
        model: ModelRef,
        field: String,
        flattened: String,
    },
    /// Two flattened properties contribute the same field.
    FlattenCollision {
        model: ModelRef,
        field: String,
        first: String,
        second: String,
    },
    /// Declared variants that end up with no fields.
    EmptyVariants {
        model: ModelRef,
        declared: VariantSet,
        failing: Vec<Variant>,
    },
    /// A foreign property needs a variant its target does not declare.
    MissingDependency {
        parent: ModelRef,
        parent_variants: VariantSet,
        property: String,
        target: ModelRef,
        target_variants: VariantSet,
        variant: Variant,
    },
}

impl ValidationIssue {
    pub fn is_cycle(&self) -> bool {
        matches!(self, ValidationIssue::Cycle { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Cycle { path } => {
                let names: Vec<String> = path.iter().map(ToString::to_string).collect();
                write!(f, "Flattening cycle detected: {}", names.join(" -> "))
            }
            ValidationIssue::UnknownReference {
                model,
                property,
                target,
            } => write!(
                f,
                "Unknown referenced model in '{model}': property '{property}' refers to '{target}', \
                 which is neither declared in this unit nor found in upstream metadata.\n\n\
                 How to fix:\n\
                 Make sure the unit declaring '{target}' is built first and its metadata is on the search path."
            ),
            ValidationIssue::LocalCollision {
                model,
                field,
                flattened,
            } => write!(
                f,
                "Flattening collision in model '{model}': property '{field}' is defined locally \
                 but is also present in the flattened property '{flattened}'."
            ),
            ValidationIssue::FlattenCollision {
                model,
                field,
                first,
                second,
            } => write!(
                f,
                "Flattening collision in model '{model}': property '{field}' is present in \
                 multiple flattened properties ('{first}' and '{second}')."
            ),
            ValidationIssue::EmptyVariants {
                model,
                declared,
                failing,
            } => {
                let failing = format_variants(failing);
                write!(
                    f,
                    "Validation error in model '{model}':\n\
                     This model is declared with variants {declared}.\n\n\
                     However, no effective properties were found for the following variants: \
                     {failing} (after resolving flattened properties).\n\n\
                     Why this happens:\n\
                     Every property of '{model}' is routed to other variants, leaving nothing \
                     for the failing variants.\n\n\
                     How to fix:\n\
                     1. Remove {failing} from the variants of '{model}'.\n   OR\n\
                     2. Adjust the property variant directives to include {failing}.",
                    declared = format_variants(declared),
                )
            }
            ValidationIssue::MissingDependency {
                parent,
                parent_variants,
                property,
                target,
                target_variants,
                variant,
            } => {
                let suffix = variant.suffix();
                write!(
                    f,
                    "Cannot generate '{parent}{suffix}': required nested model '{target}{suffix}' \
                     cannot be generated.\n\
                     Details:\n    \
                     Parent model      : {parent} (variants: {parent_variants})\n    \
                     Variant requested : {variant}\n    \
                     Nested property   : {property} (type: {target})\n\n\
                     Why:\n    \
                     '{parent}' generates a {variant} variant that includes '{property}', which \
                     refers to '{target}'.\n    \
                     However, '{target}' (variants: {target_variants}) does not support {variant}.\n\n\
                     To fix this, either add {variant} to the variants of '{target}', or adjust \
                     the variants of the '{property}' property.",
                    parent_variants = format_variants(parent_variants),
                    target_variants = format_variants(target_variants),
                )
            }
        }
    }
}

/// Every issue found in one validation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_cycles(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_cycle)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model validation failed with {} error(s):\n\n",
            self.issues.len()
        )?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str(ISSUE_SEPARATOR)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_header_counts_issues() {
        let report = ValidationReport::new(vec![
            ValidationIssue::Cycle {
                path: vec![
                    ModelRef::unversioned("app", "A"),
                    ModelRef::unversioned("app", "B"),
                    ModelRef::unversioned("app", "A"),
                ],
            },
            ValidationIssue::LocalCollision {
                model: ModelRef::unversioned("app", "User"),
                field: "city".into(),
                flattened: "address".into(),
            },
        ]);

        let text = report.to_string();
        assert!(text.starts_with("Model validation failed with 2 error(s):"));
        assert!(text.contains("Flattening cycle detected: A -> B -> A"));
        assert!(text.contains(ISSUE_SEPARATOR));
        assert!(report.has_cycles());
    }

    #[test]
    fn dependency_message_names_all_parties() {
        let issue = ValidationIssue::MissingDependency {
            parent: ModelRef::unversioned("shop", "LineItem"),
            parent_variants: Variant::all(),
            property: "order".into(),
            target: ModelRef::unversioned("shop", "Order"),
            target_variants: [Variant::Data].into_iter().collect(),
            variant: Variant::CreateRequest,
        };
        let text = issue.to_string();
        assert!(text.contains("Cannot generate 'LineItemCreateRequest'"));
        assert!(text.contains("'Order' (variants: [DATA]) does not support CREATE"));
    }
}
