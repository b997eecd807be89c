//! Names of the runtime types and directives the engine emits against.

use serde::{Deserialize, Serialize};

/// Runtime vocabulary of the derivation engine.
///
/// Every generated type signature and serializer expression is spelled with
/// these names, so a host can point the engine at its own runtime library
/// without touching the derivation logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Two-case optional-update wrapper used by the patch variant.
    pub patch_wrapper: String,
    /// Case of [`patch_wrapper`](Self::patch_wrapper) meaning "leave as-is".
    pub unchanged_case: String,
    /// Directive that makes a model variant serializable.
    pub serializable_directive: String,
    /// Marker attached to nodes that need contextual serialization.
    pub contextual_directive: String,
    /// Capability a global configuration object must implement.
    pub serialization_config: String,
    /// Base type patch serializers extend.
    pub patch_serializer_base: String,
    pub variant_interfaces: VariantInterfaces,
    /// Types that are always serializable without help.
    pub intrinsic_types: Vec<String>,
    pub collections: CollectionTypes,
}

/// Global per-variant interfaces implemented by versioned variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantInterfaces {
    pub data: String,
    pub create_request: String,
    pub patch_request: String,
}

/// Collection types and the combinators that serialize them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionTypes {
    pub list: String,
    pub set: String,
    pub map: String,
    pub list_serializer: String,
    pub set_serializer: String,
    pub map_serializer: String,
    /// Adapter suffix applied to nullable serializers (`<expr>.nullable`).
    pub nullable_adapter: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            patch_wrapper: "shapegen.runtime.Patchable".to_string(),
            unchanged_case: "Unchanged".to_string(),
            serializable_directive: "serde.Serializable".to_string(),
            contextual_directive: "serde.Contextual".to_string(),
            serialization_config: "shapegen.runtime.SerializationConfig".to_string(),
            patch_serializer_base: "shapegen.runtime.PatchableSerializer".to_string(),
            variant_interfaces: VariantInterfaces::default(),
            intrinsic_types: default_intrinsics(),
            collections: CollectionTypes::default(),
        }
    }
}

impl Default for VariantInterfaces {
    fn default() -> Self {
        Self {
            data: "shapegen.runtime.DataVariant".to_string(),
            create_request: "shapegen.runtime.CreateVariant".to_string(),
            patch_request: "shapegen.runtime.PatchVariant".to_string(),
        }
    }
}

impl Default for CollectionTypes {
    fn default() -> Self {
        Self {
            list: "core.List".to_string(),
            set: "core.Set".to_string(),
            map: "core.Map".to_string(),
            list_serializer: "serde.builtins.ListSerializer".to_string(),
            set_serializer: "serde.builtins.SetSerializer".to_string(),
            map_serializer: "serde.builtins.MapSerializer".to_string(),
            nullable_adapter: "nullable".to_string(),
        }
    }
}

fn default_intrinsics() -> Vec<String> {
    [
        "core.String",
        "core.Char",
        "core.Boolean",
        "core.Byte",
        "core.Short",
        "core.Int",
        "core.Long",
        "core.Float",
        "core.Double",
        "core.List",
        "core.Set",
        "core.Map",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl EngineOptions {
    /// Qualified "leave as-is" case, `<patch_wrapper>.<unchanged_case>`.
    pub fn unchanged_value(&self) -> String {
        format!("{}.{}", self.patch_wrapper, self.unchanged_case)
    }

    pub fn is_intrinsic(&self, qualified_name: &str) -> bool {
        self.intrinsic_types.iter().any(|name| name == qualified_name)
    }

    /// Every configured name, labelled by its config key.
    pub fn named_entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("engine.patch_wrapper", self.patch_wrapper.as_str()),
            ("engine.unchanged_case", self.unchanged_case.as_str()),
            ("engine.serializable_directive", self.serializable_directive.as_str()),
            ("engine.contextual_directive", self.contextual_directive.as_str()),
            ("engine.serialization_config", self.serialization_config.as_str()),
            ("engine.patch_serializer_base", self.patch_serializer_base.as_str()),
            ("engine.variant_interfaces.data", self.variant_interfaces.data.as_str()),
            (
                "engine.variant_interfaces.create_request",
                self.variant_interfaces.create_request.as_str(),
            ),
            (
                "engine.variant_interfaces.patch_request",
                self.variant_interfaces.patch_request.as_str(),
            ),
            ("engine.collections.list", self.collections.list.as_str()),
            ("engine.collections.set", self.collections.set.as_str()),
            ("engine.collections.map", self.collections.map.as_str()),
            ("engine.collections.list_serializer", self.collections.list_serializer.as_str()),
            ("engine.collections.set_serializer", self.collections.set_serializer.as_str()),
            ("engine.collections.map_serializer", self.collections.map_serializer.as_str()),
            ("engine.collections.nullable_adapter", self.collections.nullable_adapter.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_collections_as_intrinsic() {
        let options = EngineOptions::default();
        assert!(options.is_intrinsic("core.String"));
        assert!(options.is_intrinsic(&options.collections.list));
        assert!(!options.is_intrinsic("time.Instant"));
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let options: EngineOptions = toml::from_str(
            r#"
patch_wrapper = "my.runtime.Optional"

[collections]
list = "my.Vec"
"#,
        )
        .unwrap();
        assert_eq!(options.patch_wrapper, "my.runtime.Optional");
        assert_eq!(options.unchanged_case, "Unchanged");
        assert_eq!(options.unchanged_value(), "my.runtime.Optional.Unchanged");
        assert_eq!(options.collections.list, "my.Vec");
        assert_eq!(options.collections.map, "core.Map");
    }
}
