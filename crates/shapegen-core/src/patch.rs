//! The optional-update wrapper used by patch requests.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a patch request: either a new value or "leave as-is".
///
/// Only `Set` ever reaches the wire. A `Patch` cannot drop itself from its
/// parent, so every `Patch` field must carry
/// `#[serde(default, skip_serializing_if = "Patch::is_unchanged")]`; without
/// it `Unchanged` is written as `null`, which reads back as `Set(None)`.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shapegen_core::patch::Patch;
///
/// #[derive(Serialize, Deserialize)]
/// struct UserPatch {
///     #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
///     name: Patch<String>,
///     #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
///     nickname: Patch<Option<String>>,
/// }
///
/// let patch: UserPatch = serde_json::from_str(r#"{"nickname": null}"#).unwrap();
/// assert!(patch.name.is_unchanged());
/// assert_eq!(patch.nickname, Patch::Set(None));
/// assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"nickname":null}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Patch<T> {
    Set(T),
    Unchanged,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Set(value) => Patch::Set(value),
            Patch::Unchanged => Patch::Unchanged,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Unchanged => Patch::Unchanged,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unchanged => None,
        }
    }

    /// Overwrite `target` when a value is set.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Unchanged, Patch::Set)
    }
}

/// `Unchanged` serializes as unit. Pair with `skip_serializing_if` so it never
/// appears in output.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unchanged => serializer.serialize_unit(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}
