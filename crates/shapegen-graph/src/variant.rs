//! Variant kinds derived from a model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A purpose-specific shape derived from a model.
///
/// Ordering is declaration order (`Data < CreateRequest < PatchRequest`) so
/// sets of variants always render the same way in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variant {
    #[serde(alias = "Data")]
    Data,
    #[serde(rename = "CREATE", alias = "CreateRequest")]
    CreateRequest,
    #[serde(rename = "PATCH", alias = "PatchRequest")]
    PatchRequest,
}

/// Ordered set of variants.
pub type VariantSet = BTreeSet<Variant>;

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Data, Variant::CreateRequest, Variant::PatchRequest];

    /// Name suffix used for derived-type identity (e.g. `UserSchema.CreateRequest`).
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Data => "Data",
            Variant::CreateRequest => "CreateRequest",
            Variant::PatchRequest => "PatchRequest",
        }
    }

    /// Directive spelling (`DATA`, `CREATE`, `PATCH`).
    pub fn directive_name(self) -> &'static str {
        match self {
            Variant::Data => "DATA",
            Variant::CreateRequest => "CREATE",
            Variant::PatchRequest => "PATCH",
        }
    }

    pub fn all() -> VariantSet {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name())
    }
}

/// Error for a variant name that is neither a directive spelling nor a suffix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}' (expected one of DATA, CREATE, PATCH)")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Variant::ALL
            .into_iter()
            .find(|v| {
                trimmed.eq_ignore_ascii_case(v.directive_name())
                    || trimmed.eq_ignore_ascii_case(v.suffix())
            })
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Render a variant set as `[DATA, CREATE]`.
pub fn format_variants<'a>(variants: impl IntoIterator<Item = &'a Variant>) -> String {
    let names: Vec<&str> = variants.into_iter().map(|v| v.directive_name()).collect();
    format!("[{}]", names.join(", "))
}
