//! Top-level configuration and layered loading.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::EngineOptions;
use crate::error::{ConfigError, Result};
use crate::settings::GlobalSettings;
use crate::validation::validate_schema;

/// Prefix of environment overrides. Nested keys are separated by `__`
/// (`SHAPEGEN_METADATA__OUTPUT_DIR`).
pub const ENV_PREFIX: &str = "SHAPEGEN_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapegenConfig {
    #[serde(default)]
    pub engine: EngineOptions,

    #[serde(default)]
    pub metadata: MetadataOptions,

    #[serde(default)]
    pub settings: GlobalSettings,
}

/// Where upstream metadata is read from and where this unit's is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataOptions {
    /// Files or directories searched for upstream metadata artifacts.
    pub search_paths: Vec<PathBuf>,
    /// Directory receiving this unit's metadata artifact.
    pub output_dir: PathBuf,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            output_dir: PathBuf::from("build/shapegen"),
        }
    }
}

impl ShapegenConfig {
    /// Load configuration from multiple sources.
    /// Priority: environment variables > config file > defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(format!("{e}; check shapegen.toml syntax and field types")),
        })?;
        validate_schema(&config)?;
        Ok(config)
    }
}
