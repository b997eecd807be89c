//! Stable keys for models in the merged graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix appended to a family's base name to form its generated container.
pub const CONTAINER_SUFFIX: &str = "Schema";

/// Key of one model in the graph: `(namespace, base-name, version)`.
///
/// `version` is set only for members of a versioned family; a version may
/// share its family's name. Properties point at other models through this
/// key rather than holding the model itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    pub namespace: String,
    pub base_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModelRef {
    /// Key for one version of a versioned family.
    pub fn versioned(
        namespace: impl Into<String>,
        base_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            base_name: base_name.into(),
            version: Some(version.into()),
        }
    }

    /// Key for a model that does not belong to a versioned family.
    pub fn unversioned(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            base_name: name.into(),
            version: None,
        }
    }

    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// Qualified name of the family container (`ns.UserSchema`).
    pub fn container_name(&self) -> String {
        qualify(&self.namespace, &format!("{}{}", self.base_name, CONTAINER_SUFFIX))
    }

    /// Qualified name of the type a property references: the family
    /// container, or the nested version interface for a versioned family.
    pub fn referenced_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}.{version}", self.container_name()),
            None => self.container_name(),
        }
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}.{version}", self.base_name),
            None => f.write_str(&self.base_name),
        }
    }
}

/// Join a namespace and a simple name, tolerating the root namespace.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_reference_points_at_container() {
        let key = ModelRef::unversioned("app.model", "User");
        assert!(!key.is_versioned());
        assert_eq!(key.referenced_name(), "app.model.UserSchema");
        assert_eq!(key.to_string(), "User");
    }

    #[test]
    fn versioned_reference_points_at_version_interface() {
        let key = ModelRef::versioned("app.model", "Account", "V2");
        assert!(key.is_versioned());
        assert_eq!(key.referenced_name(), "app.model.AccountSchema.V2");
        assert_eq!(key.to_string(), "Account.V2");
    }

    #[test]
    fn version_named_like_its_family_stays_versioned() {
        let version = ModelRef::versioned("app", "Account", "Account");
        let plain = ModelRef::unversioned("app", "Account");
        assert!(version.is_versioned());
        assert_ne!(version, plain);
        assert_eq!(version.referenced_name(), "app.AccountSchema.Account");
        assert_eq!(plain.referenced_name(), "app.AccountSchema");
    }

    #[test]
    fn unversioned_key_omits_version_in_json() {
        let json = serde_json::to_value(ModelRef::unversioned("app", "User")).unwrap();
        assert!(json.get("version").is_none());
        let back: ModelRef = serde_json::from_value(json).unwrap();
        assert!(!back.is_versioned());
    }

    #[test]
    fn root_namespace_is_not_prefixed() {
        assert_eq!(ModelRef::unversioned("", "User").container_name(), "UserSchema");
    }
}
