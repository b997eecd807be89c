//! Derived type signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialization hint attached to one node of a derived type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerialMarker {
    #[default]
    None,
    /// Resolved from the serialization context at runtime.
    Contextual,
    /// Serialized with the named override.
    With(String),
}

impl SerialMarker {
    pub fn is_none(&self) -> bool {
        matches!(self, SerialMarker::None)
    }
}

/// A derived type: raw name, arguments, nullability and a marker.
///
/// Renders as `core.List<app.AddressSchema.Data>?`, with markers as
/// `@Contextual` / `@With(..)` prefixes on the node they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeName>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "SerialMarker::is_none")]
    pub marker: SerialMarker,
}

impl TypeName {
    pub fn leaf(raw: impl Into<String>) -> Self {
        Self::generic(raw, Vec::new())
    }

    pub fn generic(raw: impl Into<String>, args: Vec<TypeName>) -> Self {
        Self {
            raw: raw.into(),
            args,
            nullable: false,
            marker: SerialMarker::None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn marked(mut self, marker: SerialMarker) -> Self {
        self.marker = marker;
        self
    }

    /// `wrapper<self>`.
    pub fn wrap(self, wrapper: impl Into<String>) -> Self {
        Self::generic(wrapper, vec![self])
    }

    pub fn is_leaf(&self) -> bool {
        self.args.is_empty()
    }

    /// Number of nodes named `raw` anywhere in the tree.
    pub fn count(&self, raw: &str) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.raw == raw {
                count += 1;
            }
            stack.extend(&node.args);
        }
        count
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.marker {
            SerialMarker::None => {}
            SerialMarker::Contextual => f.write_str("@Contextual ")?,
            SerialMarker::With(serializer) => write!(f, "@With({serializer}) ")?,
        }
        f.write_str(&self.raw)?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_markers_on_their_node() {
        let ty = TypeName::generic(
            "core.List",
            vec![TypeName::leaf("time.Instant").marked(SerialMarker::Contextual)],
        )
        .nullable(true)
        .wrap("shapegen.runtime.Patchable");

        assert_eq!(
            ty.to_string(),
            "shapegen.runtime.Patchable<core.List<@Contextual time.Instant>?>"
        );
        assert_eq!(ty.count("shapegen.runtime.Patchable"), 1);
    }

    #[test]
    fn json_omits_defaults() {
        let json = serde_json::to_value(TypeName::leaf("core.Int")).unwrap();
        assert_eq!(json, serde_json::json!({ "raw": "core.Int", "nullable": false }));

        let json = serde_json::to_value(
            TypeName::leaf("time.Instant").marked(SerialMarker::With("x.S".into())),
        )
        .unwrap();
        assert_eq!(json["marker"], serde_json::json!({ "with": "x.S" }));
    }
}
