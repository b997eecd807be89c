//! Per-unit metadata artifact exchanged between independently built units.

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::serializer::SerializerMappings;

/// File name every unit writes its metadata under.
pub const METADATA_FILE_NAME: &str = "shapegen-models.json";

/// Every model built in a unit plus the serializer overrides it exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetadata {
    pub models: Vec<Model>,
    #[serde(default)]
    pub exported_serializers: SerializerMappings,
}

impl ModuleMetadata {
    pub fn new(models: Vec<Model>, exported_serializers: SerializerMappings) -> Self {
        Self {
            models,
            exported_serializers,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use crate::type_info::TypeInfo;
    use crate::variant::Variant;

    #[test]
    fn uses_camel_case_keys() {
        let model = Model::builder("Order", "shop", Variant::all())
            .property(Property::regular("id", TypeInfo::new("core.String"), Variant::all()))
            .build()
            .unwrap();
        let metadata = ModuleMetadata::new(vec![model.clone()], SerializerMappings::new());

        let json = metadata.to_json().unwrap();
        assert!(json.contains("\"exportedSerializers\""));
        assert!(json.contains("\"typeInfo\""));

        let back = ModuleMetadata::from_json(&json).unwrap();
        assert_eq!(back.models, vec![model]);
    }

    #[test]
    fn missing_serializers_default_to_empty() {
        let metadata = ModuleMetadata::from_json(r#"{"models": []}"#).unwrap();
        assert!(metadata.exported_serializers.is_empty());
    }
}
