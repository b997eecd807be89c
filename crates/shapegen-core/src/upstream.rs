//! Reading and writing metadata artifacts.
//!
//! Upstream artifacts are best effort: a missing, empty or unparsable file is
//! skipped with a warning so one broken dependency does not hide the others.

use std::fs;
use std::path::{Path, PathBuf};

use shapegen_graph::{METADATA_FILE_NAME, Model, ModuleMetadata, SerializerMappings};
use tracing::{debug, warn};

use crate::error::MetadataError;

/// Everything read from upstream units.
#[derive(Debug, Clone, Default)]
pub struct UpstreamMetadata {
    pub models: Vec<Model>,
    /// Exported serializer overrides, later files winning.
    pub serializers: SerializerMappings,
    /// Artifacts that were read successfully.
    pub sources: Vec<PathBuf>,
}

impl UpstreamMetadata {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.serializers.is_empty()
    }
}

/// Load every artifact reachable from `search_paths`.
///
/// A directory is searched for `shapegen-models.json`; a file is used only
/// when it has that name.
pub fn load(search_paths: &[PathBuf]) -> UpstreamMetadata {
    let mut upstream = UpstreamMetadata::default();

    for path in search_paths {
        let candidate = if path.is_dir() {
            path.join(METADATA_FILE_NAME)
        } else if path.file_name().is_some_and(|name| name == METADATA_FILE_NAME) {
            path.clone()
        } else {
            debug!(path = %path.display(), "ignoring search path that is not a metadata artifact");
            continue;
        };

        match read(&candidate) {
            Ok(metadata) => {
                let before = upstream.models.len();
                for model in metadata.models {
                    match model.check() {
                        Ok(()) => upstream.models.push(model),
                        Err(err) => {
                            warn!(path = %candidate.display(), error = %err, "skipping invalid upstream model");
                        }
                    }
                }
                upstream.serializers.merge(&metadata.exported_serializers);
                debug!(
                    path = %candidate.display(),
                    models = upstream.models.len() - before,
                    "loaded upstream metadata"
                );
                upstream.sources.push(candidate);
            }
            Err(err) => warn!(error = %err, "skipping upstream metadata"),
        }
    }

    upstream
}

/// Read and parse one artifact.
pub fn read(path: &Path) -> Result<ModuleMetadata, MetadataError> {
    if !path.exists() {
        return Err(MetadataError::Missing {
            path: path.to_path_buf(),
        });
    }
    let source = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if source.trim().is_empty() {
        return Err(MetadataError::Empty {
            path: path.to_path_buf(),
        });
    }
    ModuleMetadata::from_json(&source).map_err(|source| MetadataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `metadata` into `dir`, creating it if needed. Returns the file path.
pub fn write(dir: &Path, metadata: &ModuleMetadata) -> Result<PathBuf, MetadataError> {
    let path = dir.join(METADATA_FILE_NAME);
    let io_error = |source| MetadataError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_error)?;
    let json = metadata.to_json().map_err(|source| MetadataError::Encode {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(io_error)?;
    debug!(path = %path.display(), models = metadata.models.len(), "wrote metadata");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_graph::{Property, SerializerMapping, TypeInfo, Variant};
    use tempfile::TempDir;

    fn metadata(name: &str) -> ModuleMetadata {
        let model = Model::builder(name, "shop", Variant::all())
            .property(Property::regular("id", TypeInfo::new("core.String"), Variant::all()))
            .build()
            .unwrap();
        let serializers = [SerializerMapping::new("time.Instant", "shop.InstantSerializer", true)]
            .into_iter()
            .collect();
        ModuleMetadata::new(vec![model], serializers)
    }

    #[test]
    fn writes_then_loads_from_directory() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), &metadata("Order")).unwrap();
        assert_eq!(path, dir.path().join(METADATA_FILE_NAME));

        let upstream = load(&[dir.path().to_path_buf()]);
        assert_eq!(upstream.models.len(), 1);
        assert!(upstream.serializers.contains("time.Instant"));
        assert_eq!(upstream.sources, vec![path]);
    }

    #[test]
    fn skips_missing_empty_and_broken_files() {
        let empty = TempDir::new().unwrap();
        fs::write(empty.path().join(METADATA_FILE_NAME), "  \n").unwrap();

        let broken = TempDir::new().unwrap();
        fs::write(broken.path().join(METADATA_FILE_NAME), "{ not json").unwrap();

        let good = TempDir::new().unwrap();
        write(good.path(), &metadata("Order")).unwrap();

        let upstream = load(&[
            empty.path().join("missing").join(METADATA_FILE_NAME),
            empty.path().to_path_buf(),
            broken.path().to_path_buf(),
            good.path().join(METADATA_FILE_NAME),
        ]);
        assert_eq!(upstream.models.len(), 1);
        assert_eq!(upstream.sources.len(), 1);
    }

    #[test]
    fn ignores_files_with_other_names() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("models.json");
        fs::write(&other, metadata("Order").to_json().unwrap()).unwrap();

        let upstream = load(&[other]);
        assert!(upstream.is_empty());
    }

    #[test]
    fn read_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(METADATA_FILE_NAME);
        fs::write(&path, "[]").unwrap();
        assert!(matches!(read(&path), Err(MetadataError::Parse { .. })));
        assert!(matches!(
            read(&dir.path().join("nope.json")),
            Err(MetadataError::Missing { .. })
        ));
    }

    #[test]
    fn invalid_models_are_dropped() {
        let dir = TempDir::new().unwrap();
        let mut broken = metadata("Order");
        broken.models[0].properties.clear();
        write(dir.path(), &broken).unwrap();

        let upstream = load(&[dir.path().to_path_buf()]);
        assert!(upstream.models.is_empty());
        assert_eq!(upstream.sources.len(), 1);
    }
}
