//! The `Model` record and its checked builder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model_ref::ModelRef;
use crate::property::{Property, PropertyKind};
use crate::serializer::SerializerMappings;
use crate::type_info::TypeInfo;
use crate::variant::{Variant, VariantSet, format_variants};

/// Name of the discriminator field every version of a family carries.
pub const VERSION_FIELD: &str = "schemaVersion";

/// Type of the discriminator field.
pub const VERSION_FIELD_TYPE: &str = "core.Int";

/// Visibility of the generated container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Internal => f.write_str("internal"),
        }
    }
}

/// Membership of a versioned family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    pub base_name: String,
    pub schema_version: u32,
}

/// A directive attached to a subset of the model's variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveConfig {
    pub directive: String,
    pub variants: VariantSet,
}

/// A fully resolved model.
///
/// Only [`ModelBuilder::build`] produces one from parts, and models read back
/// from metadata are re-checked with [`Model::check`], so every `Model` in a
/// graph has at least one property and no property claims a variant the model
/// does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    pub namespace: String,
    pub properties: Vec<Property>,
    pub variants: VariantSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_configs: Vec<DirectiveConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<Versioning>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,
    #[serde(default = "enabled")]
    pub auto_contextual: bool,
    /// Serializer overrides in force when this model was built.
    #[serde(default, skip_serializing_if = "SerializerMappings::is_empty")]
    pub type_serializers: SerializerMappings,
}

fn enabled() -> bool {
    true
}

impl Model {
    pub fn builder(
        name: impl Into<String>,
        namespace: impl Into<String>,
        variants: VariantSet,
    ) -> ModelBuilder {
        ModelBuilder {
            model: Self {
                name: name.into(),
                namespace: namespace.into(),
                properties: Vec::new(),
                variants,
                directive_configs: Vec::new(),
                directives: Vec::new(),
                versioning: None,
                visibility: Visibility::Public,
                supertypes: Vec::new(),
                auto_contextual: true,
                type_serializers: SerializerMappings::new(),
            },
        }
    }

    /// Graph key of this model.
    pub fn key(&self) -> ModelRef {
        match &self.versioning {
            Some(versioning) => {
                ModelRef::versioned(&self.namespace, &versioning.base_name, &self.name)
            }
            None => ModelRef::unversioned(&self.namespace, &self.name),
        }
    }

    pub fn base_name(&self) -> &str {
        self.versioning
            .as_ref()
            .map_or(self.name.as_str(), |versioning| versioning.base_name.as_str())
    }

    pub fn schema_version(&self) -> Option<u32> {
        self.versioning.as_ref().map(|versioning| versioning.schema_version)
    }

    pub fn declares(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    /// Whether `directive` is attached to this model for `variant`.
    pub fn has_directive_for(&self, directive: &str, variant: Variant) -> bool {
        self.directive_configs
            .iter()
            .any(|config| config.directive == directive && config.variants.contains(&variant))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Re-establish the construction invariants.
    pub fn check(&self) -> Result<(), ModelError> {
        if self.properties.is_empty() {
            return Err(ModelError::NoProperties {
                model: self.name.clone(),
            });
        }

        let offenders: Vec<(String, VariantSet)> = self
            .properties
            .iter()
            .filter(|property| !property.variants.is_subset(&self.variants))
            .map(|property| (property.name.clone(), property.variants.clone()))
            .collect();

        if !offenders.is_empty() {
            return Err(ModelError::InvalidPropertyVariants {
                model: self.name.clone(),
                model_variants: self.variants.clone(),
                offenders,
            });
        }
        Ok(())
    }
}

/// Builder for [`Model`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn property(mut self, property: Property) -> Self {
        self.model.properties.push(property);
        self
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.model.properties.extend(properties);
        self
    }

    pub fn directive_config(mut self, config: DirectiveConfig) -> Self {
        self.model.directive_configs.push(config);
        self
    }

    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.model.directives.push(directive.into());
        self
    }

    pub fn versioning(mut self, versioning: Versioning) -> Self {
        self.model.versioning = Some(versioning);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.model.visibility = visibility;
        self
    }

    pub fn supertype(mut self, qualified_name: impl Into<String>) -> Self {
        self.model.supertypes.push(qualified_name.into());
        self
    }

    pub fn auto_contextual(mut self, enabled: bool) -> Self {
        self.model.auto_contextual = enabled;
        self
    }

    pub fn type_serializers(mut self, mappings: SerializerMappings) -> Self {
        self.model.type_serializers = mappings;
        self
    }

    /// Finish the model, injecting the version discriminator for versioned
    /// models that do not declare one.
    pub fn build(mut self) -> Result<Model, ModelError> {
        let model = &mut self.model;
        if model.versioning.is_some() && model.property(VERSION_FIELD).is_none() {
            model.properties.push(Property {
                name: VERSION_FIELD.to_string(),
                type_info: TypeInfo::new(VERSION_FIELD_TYPE),
                variants: model.variants.clone(),
                directives: Vec::new(),
                auto_contextual: None,
                kind: PropertyKind::Regular,
            });
        }
        self.model.check()?;
        Ok(self.model)
    }
}

/// Violations of the model construction invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error(
        "model validation failed for '{model}': models cannot be empty and must contain at least one property"
    )]
    NoProperties { model: String },

    #[error("{}", invalid_variants_message(.model, .model_variants, .offenders))]
    InvalidPropertyVariants {
        model: String,
        model_variants: VariantSet,
        offenders: Vec<(String, VariantSet)>,
    },
}

fn invalid_variants_message(
    model: &str,
    model_variants: &VariantSet,
    offenders: &[(String, VariantSet)],
) -> String {
    let (plural, noun, verb) = if offenders.len() == 1 {
        ("", "property", "is")
    } else {
        ("s", "properties", "are")
    };
    let mut message = format!(
        "invalid property variant{plural} found in model '{model}':\n\
         the model's variants are {}, which does not contain every property variant.\n\
         The following {noun} {verb} invalid:",
        format_variants(model_variants)
    );
    for (name, variants) in offenders {
        message.push_str(&format!(
            "\n - property '{name}' (has variants {})",
            format_variants(variants)
        ));
    }
    message
}
