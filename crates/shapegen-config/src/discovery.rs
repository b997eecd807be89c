//! File-based config discovery for CLI use.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ShapegenConfig;
use crate::error::{ConfigError, Result};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "shapegen.toml";

/// Searches a root directory for the shapegen config file.
///
/// # Example
///
/// ```no_run
/// use shapegen_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load(None).unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of `shapegen.toml` in the root, if present.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    /// Pick the config file to load.
    ///
    /// `explicit` wins and must exist; otherwise the discovered file is used,
    /// and running without one is fine.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if `explicit` does not exist.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Ok(Some(path.to_path_buf())),
            None => Ok(self.find()),
        }
    }

    /// Load the resolved config file layered over defaults.
    pub fn load(&self, explicit: Option<&Path>) -> Result<ShapegenConfig> {
        let file = self.resolve(explicit)?;
        if file.is_none() {
            debug!(root = %self.root.display(), "no config file, using defaults");
        }
        ShapegenConfig::load(file.as_deref())
    }
}
