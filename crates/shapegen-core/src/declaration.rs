//! Parsed declarations handed over by the host's extractor.
//!
//! Variant names stay strings here so a misspelling can be reported against
//! the declaration that contains it.

use std::fmt;

use serde::{Deserialize, Serialize};
use shapegen_graph::{ModelRef, Visibility, qualify};

/// Everything one unit declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitDeclarations {
    pub models: Vec<ModelDeclaration>,
    pub configs: Vec<ConfigDeclaration>,
}

impl UnitDeclarations {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Declarations that take part in processing.
    pub fn visible_models(&self) -> impl Iterator<Item = &ModelDeclaration> {
        self.models.iter().filter(|decl| !decl.hide)
    }
}

/// An abstract model declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDeclaration {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Base name of the versioned family this declaration is nested in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default)]
    pub model: ModelDirective,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub apply: Vec<ApplyDirective>,
    #[serde(default)]
    pub directives: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

impl ModelDeclaration {
    pub fn base_name(&self) -> &str {
        self.family.as_deref().unwrap_or(&self.name)
    }

    pub fn key(&self) -> ModelRef {
        match &self.family {
            Some(family) => ModelRef::versioned(&self.namespace, family, &self.name),
            None => ModelRef::unversioned(&self.namespace, &self.name),
        }
    }

    /// Qualified name of the declaration itself (`ns.Account.V1` for a version).
    pub fn qualified_name(&self) -> String {
        match &self.family {
            Some(family) => qualify(&self.namespace, &format!("{family}.{}", self.name)),
            None => qualify(&self.namespace, &self.name),
        }
    }

    /// Whether `directive` is attached to some variant, directly or by an apply rule.
    pub fn mentions_directive(&self, directive: &str) -> bool {
        self.directives.iter().any(|d| d == directive)
            || self
                .apply
                .iter()
                .any(|apply| apply.directives.iter().any(|d| d == directive))
    }
}

/// Model-level directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDirective {
    /// Mandatory; `None` and an empty list are both rejected.
    pub variants: Option<Vec<String>>,
    pub visibility: Visibility,
    pub supertypes: Vec<String>,
    pub auto_contextual: bool,
}

impl Default for ModelDirective {
    fn default() -> Self {
        Self {
            variants: None,
            visibility: Visibility::Public,
            supertypes: Vec::new(),
            auto_contextual: true,
        }
    }
}

/// Attaches extra directives to a subset of variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyDirective {
    pub directives: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(default)]
    pub mutable: bool,
    pub ty: DeclaredType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyDirective>,
    #[serde(default)]
    pub flatten: bool,
    #[serde(default)]
    pub directives: Vec<String>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            mutable: false,
            ty,
            property: None,
            flatten: false,
            directives: Vec::new(),
        }
    }
}

/// Per-field variant routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDirective {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// `None` inherits the model's switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_contextual: Option<bool>,
}

/// A field type as the extractor saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    #[serde(default)]
    pub args: Vec<DeclaredType>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub is_value: bool,
    #[serde(default)]
    pub is_record: bool,
    /// The extractor could not resolve this node.
    #[serde(default)]
    pub unresolved: bool,
}

impl DeclaredType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
            is_enum: false,
            is_value: false,
            is_record: false,
            unresolved: false,
        }
    }

    pub fn with_args(mut self, args: Vec<DeclaredType>) -> Self {
        self.args = args;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Every node of the tree, depth-first, root first.
    pub fn nodes(&self) -> Vec<&DeclaredType> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.args.iter().rev());
        }
        nodes
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// A candidate global configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDeclaration {
    pub name: String,
    /// Declared as a singleton object.
    #[serde(default)]
    pub singleton: bool,
    /// Implements the serialization-config capability.
    #[serde(default)]
    pub serialization_config: bool,
    #[serde(default)]
    pub serializers: Vec<SerializerDeclaration>,
}

/// One type → serializer override entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerDeclaration {
    pub target: String,
    pub serializer: String,
    #[serde(default)]
    pub serializer_is_object: bool,
}
