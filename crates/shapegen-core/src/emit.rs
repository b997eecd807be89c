//! Structured emission requests for the host's code emitter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shapegen_config::EngineOptions;
use shapegen_graph::{Model, ModelIndex, VERSION_FIELD, Variant, Visibility};
use tracing::debug;

use crate::derive::{TypeDeriver, is_serializable};
use crate::error::DeriveError;
use crate::serializers::{PatchSerializer, PatchSerializers};
use crate::type_name::TypeName;

/// Everything to emit for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionPlan {
    pub containers: Vec<ContainerRequest>,
}

impl EmissionPlan {
    pub fn variant(&self, type_name: &str) -> Option<&VariantRequest> {
        self.containers
            .iter()
            .flat_map(|c| &c.variants)
            .find(|v| v.type_name == type_name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One family container with all its variant types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRequest {
    pub name: String,
    pub visibility: Visibility,
    pub serializable: bool,
    /// Version interfaces nested in a versioned family.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    /// `<Suffix>Variant` marker interfaces of a versioned family.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variant_markers: Vec<String>,
    pub variants: Vec<VariantRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch_serializers: Vec<PatchSerializerRequest>,
}

/// One concrete variant type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRequest {
    pub type_name: String,
    pub model: String,
    pub variant: Variant,
    pub superinterfaces: Vec<String>,
    pub directives: Vec<String>,
    pub fields: Vec<FieldRequest>,
}

impl VariantRequest {
    pub fn field(&self, name: &str) -> Option<&FieldRequest> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequest {
    pub name: String,
    pub ty: TypeName,
    /// Serializer to use for the field, if it must be explicit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serializer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldDefault {
    SchemaVersion(u32),
    /// Qualified "leave as-is" case of the patch wrapper. A field holding it
    /// is left out of the serialized output.
    Unchanged(String),
}

/// A synthesized patch serializer extending the runtime base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSerializerRequest {
    pub name: String,
    /// `<patch_serializer_base><ty>`.
    pub supertype: String,
    pub ty: TypeName,
    pub expr: String,
}

impl PatchSerializerRequest {
    fn new(serializer: PatchSerializer, options: &EngineOptions) -> Self {
        Self {
            supertype: format!("{}<{}>", options.patch_serializer_base, serializer.ty),
            name: serializer.name,
            expr: serializer.expr.to_string(),
            ty: serializer.ty,
        }
    }
}

/// Builds an [`EmissionPlan`] from a validated graph.
pub struct Emitter<'a> {
    deriver: TypeDeriver<'a>,
    options: &'a EngineOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(index: &'a ModelIndex, options: &'a EngineOptions) -> Self {
        Self {
            deriver: TypeDeriver::new(index, options),
            options,
        }
    }

    /// Plan every variant of `models`, grouped by family container.
    pub fn plan(&self, models: &[Model]) -> Result<EmissionPlan, DeriveError> {
        let mut families: IndexMap<String, Vec<&Model>> = IndexMap::new();
        for model in models {
            families
                .entry(model.key().container_name())
                .or_default()
                .push(model);
        }

        let containers = families
            .into_iter()
            .map(|(name, members)| self.container(name, &members))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(containers = containers.len(), "planned emission");
        Ok(EmissionPlan { containers })
    }

    fn container(&self, name: String, members: &[&Model]) -> Result<ContainerRequest, DeriveError> {
        let first = members[0];
        let mut serializers = PatchSerializers::new(&first.namespace, first.base_name());
        let versioned = first.versioning.is_some();

        let mut variants = Vec::new();
        for model in members {
            for &variant in &model.variants {
                variants.push(self.variant(model, variant, &mut serializers)?);
            }
        }

        let (versions, variant_markers) = if versioned {
            let versions = members.iter().map(|m| m.name.clone()).collect();
            let mut used: Vec<Variant> = members.iter().flat_map(|m| m.variants.iter().copied()).collect();
            used.sort();
            used.dedup();
            let markers = used
                .into_iter()
                .map(|variant| format!("{name}.{}Variant", variant.suffix()))
                .collect();
            (versions, markers)
        } else {
            (Vec::new(), Vec::new())
        };

        let serializable = members.iter().any(|model| {
            model.variants.iter().any(|&v| is_serializable(model, v, self.options))
        });

        Ok(ContainerRequest {
            name,
            visibility: first.visibility,
            serializable,
            versions,
            variant_markers,
            variants,
            patch_serializers: serializers
                .into_entries()
                .into_iter()
                .map(|s| PatchSerializerRequest::new(s, self.options))
                .collect(),
        })
    }

    fn variant(
        &self,
        model: &Model,
        variant: Variant,
        serializers: &mut PatchSerializers,
    ) -> Result<VariantRequest, DeriveError> {
        let key = model.key();
        let suffix = variant.suffix();

        let mut superinterfaces = vec![key.container_name()];
        if model.versioning.is_some() {
            let version = key.referenced_name();
            superinterfaces.push(version.clone());
            superinterfaces.push(format!("{}.{suffix}Variant", key.container_name()));
            superinterfaces.push(format!("{}<{version}>", self.global_interface(variant)));
        }
        for supertype in &model.supertypes {
            superinterfaces.push(supertype.clone());
            superinterfaces.push(format!("{supertype}{suffix}"));
        }

        let directives = model
            .directives
            .iter()
            .cloned()
            .chain(
                model
                    .directive_configs
                    .iter()
                    .filter(|config| config.variants.contains(&variant))
                    .map(|config| config.directive.clone()),
            )
            .collect();

        let mut fields = Vec::new();
        for derived in self.deriver.derive_fields(model, variant)? {
            let property = derived.property;
            let override_mapping = model.type_serializers.get(&property.type_info.qualified_name);

            let serializer = match variant {
                Variant::PatchRequest => Some(
                    serializers
                        .get_or_register(&derived.base, &model.type_serializers, self.options)
                        .to_string(),
                ),
                Variant::Data | Variant::CreateRequest => {
                    override_mapping.map(|mapping| mapping.serializer_fqn.clone())
                }
            };

            let default = match (variant, model.schema_version()) {
                (Variant::PatchRequest, _) => {
                    Some(FieldDefault::Unchanged(self.options.unchanged_value()))
                }
                (_, Some(version)) if property.name == VERSION_FIELD => {
                    Some(FieldDefault::SchemaVersion(version))
                }
                _ => None,
            };

            let directives = property
                .directives
                .iter()
                .filter(|d| override_mapping.is_none() || **d != self.options.contextual_directive)
                .cloned()
                .collect();

            fields.push(FieldRequest {
                name: property.name.clone(),
                ty: derived.ty,
                serializer,
                directives,
                default,
            });
        }

        Ok(VariantRequest {
            type_name: format!("{}.{suffix}", key.referenced_name()),
            model: model.name.clone(),
            variant,
            superinterfaces,
            directives,
            fields,
        })
    }

    fn global_interface(&self, variant: Variant) -> &str {
        let interfaces = &self.options.variant_interfaces;
        match variant {
            Variant::Data => &interfaces.data,
            Variant::CreateRequest => &interfaces.create_request,
            Variant::PatchRequest => &interfaces.patch_request,
        }
    }
}
