//! Recursive description of a declared field type.

use serde::{Deserialize, Serialize};

use crate::model_ref::ModelRef;

/// A declared type: qualified name, ordered type arguments, nullability and
/// classification flags.
///
/// A node without arguments is a leaf. Trees are finite: arguments are owned
/// values, so a node can never contain itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeInfo>,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub is_value_class: bool,
    #[serde(default)]
    pub is_data_class: bool,
    /// Set on leaves that name another model's generated container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ModelRef>,
}

impl TypeInfo {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments: Vec::new(),
            is_nullable: false,
            is_enum: false,
            is_value_class: false,
            is_data_class: false,
            reference: None,
        }
    }

    pub fn with_args(mut self, arguments: Vec<TypeInfo>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn referencing(mut self, target: ModelRef) -> Self {
        self.reference = Some(target);
        self
    }

    /// Every model referenced anywhere in the tree, depth-first.
    pub fn references(&self) -> Vec<&ModelRef> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(target) = &node.reference {
                found.push(target);
            }
            stack.extend(node.arguments.iter().rev());
        }
        found
    }
}
