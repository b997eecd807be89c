//! Schema checks applied to every loaded configuration.

use crate::config::ShapegenConfig;
use crate::error::{ConfigError, Result};
use crate::settings::LOG_LEVELS;

/// Schema-only validation (no filesystem checks).
///
/// # Example
///
/// ```
/// use shapegen_config::{ShapegenConfig, validate_schema};
///
/// validate_schema(&ShapegenConfig::default()).unwrap();
/// ```
pub fn validate_schema(config: &ShapegenConfig) -> Result<()> {
    for (field, value) in config.engine.named_entries() {
        if value.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: format!("'{field}' cannot be empty"),
                hint: Some(format!("Remove '{field}' to use the built-in default")),
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ConfigError::SchemaValidation {
                message: format!("'{field}' must be a qualified name, got '{value}'"),
                hint: Some("Qualified names cannot contain whitespace".to_string()),
            });
        }
    }

    if config.engine.intrinsic_types.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::SchemaValidation {
            message: "intrinsic type names cannot be empty".to_string(),
            hint: Some("Remove empty strings from 'engine.intrinsic_types'".to_string()),
        });
    }

    if let Some(level) = &config.settings.log_level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::SchemaValidation {
                message: format!("unknown log level '{level}'"),
                hint: Some(format!("Use one of: {}", LOG_LEVELS.join(", "))),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_defaults() {
        assert!(validate_schema(&ShapegenConfig::default()).is_ok());
    }

    #[test]
    fn rejects_empty_engine_name() {
        let mut config = ShapegenConfig::default();
        config.engine.unchanged_case = "  ".to_string();
        let err = validate_schema(&config).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
        assert!(err.to_string().contains("engine.unchanged_case"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = ShapegenConfig::default();
        config.settings.log_level = Some("loud".to_string());
        let err = validate_schema(&config).unwrap_err();
        assert_eq!(err.hint(), Some("Use one of: trace, debug, info, warn, error"));
    }

    #[test]
    fn rejects_blank_intrinsic() {
        let mut config = ShapegenConfig::default();
        config.engine.intrinsic_types.push(String::new());
        assert!(validate_schema(&config).is_err());
    }
}
