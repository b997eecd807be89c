//! Global settings shared by every command.

use serde::{Deserialize, Serialize};

/// Levels accepted for `settings.log_level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default log level when neither `--verbose`/`--quiet` nor `RUST_LOG` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}
