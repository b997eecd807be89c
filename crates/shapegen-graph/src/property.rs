//! Model properties.

use serde::{Deserialize, Serialize};

use crate::model_ref::ModelRef;
use crate::type_info::TypeInfo;
use crate::variant::{Variant, VariantSet};

/// How a property participates in derivation.
///
/// Every consumer matches this exhaustively, so a new shape has to be
/// handled everywhere before the workspace compiles again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PropertyKind {
    /// A plain field.
    Regular,
    /// A field typed by another model's generated container; substituted with
    /// the requested variant's type at derivation time.
    Foreign { target: ModelRef },
    /// Inlines the target's effective fields in place of itself.
    Flattened { target: ModelRef },
}

/// A field of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub type_info: TypeInfo,
    pub variants: VariantSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
    /// Property-level contextual switch; `None` inherits the model's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_contextual: Option<bool>,
    pub kind: PropertyKind,
}

impl Property {
    pub fn regular(name: impl Into<String>, type_info: TypeInfo, variants: VariantSet) -> Self {
        Self::with_kind(name, type_info, variants, PropertyKind::Regular)
    }

    pub fn foreign(
        name: impl Into<String>,
        type_info: TypeInfo,
        variants: VariantSet,
        target: ModelRef,
    ) -> Self {
        Self::with_kind(name, type_info, variants, PropertyKind::Foreign { target })
    }

    pub fn flattened(
        name: impl Into<String>,
        type_info: TypeInfo,
        variants: VariantSet,
        target: ModelRef,
    ) -> Self {
        Self::with_kind(name, type_info, variants, PropertyKind::Flattened { target })
    }

    fn with_kind(
        name: impl Into<String>,
        type_info: TypeInfo,
        variants: VariantSet,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name: name.into(),
            type_info,
            variants,
            directives: Vec::new(),
            auto_contextual: None,
            kind,
        }
    }

    pub fn with_directives(mut self, directives: Vec<String>) -> Self {
        self.directives = directives;
        self
    }

    pub fn applies_to(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    pub fn is_flattened(&self) -> bool {
        matches!(self.kind, PropertyKind::Flattened { .. })
    }

    /// Target of a flattened property.
    pub fn flatten_target(&self) -> Option<&ModelRef> {
        match &self.kind {
            PropertyKind::Flattened { target } => Some(target),
            PropertyKind::Regular | PropertyKind::Foreign { .. } => None,
        }
    }

    /// Every model a foreign property depends on. A foreign property may
    /// reference more than one container when its type is generic
    /// (`Map<ASchema, BSchema>`); the declared target comes first.
    pub fn foreign_targets(&self) -> Vec<&ModelRef> {
        match &self.kind {
            PropertyKind::Foreign { target } => {
                let mut targets = vec![target];
                for found in self.type_info.references() {
                    if !targets.contains(&found) {
                        targets.push(found);
                    }
                }
                targets
            }
            PropertyKind::Regular | PropertyKind::Flattened { .. } => Vec::new(),
        }
    }
}
