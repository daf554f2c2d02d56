//! Materializes reference statistics from a directory of per-class files.
//!
//! Each class lives in `<class_id>_mean_inv_cov.json` (see [`record`]). Layers
//! are sorted by their recorded `layer_index` before they are added, so the
//! positional order never depends on how the file happened to list them.

pub mod record;

use crate::stats::{ClassStatistics, ReferenceStatisticsStore, ShapeError};
use log::{debug, info, warn};
use nalgebra::DVector;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use record::{ClassRecord, InverseCovariance, LayerRecord};

/// File name suffix identifying a per-class statistics file.
pub const CLASS_FILE_SUFFIX: &str = "_mean_inv_cov.json";

/// Reasons why statistics could not be loaded.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadError {
    /// No statistics file exists for the class.
    NotFound { class_id: String, dir: PathBuf },
    /// The directory could not be listed or a file could not be read.
    Read { path: PathBuf, message: String },
    /// The file is not valid JSON or violates the record schema.
    Malformed { path: PathBuf, message: String },
    /// A layer's mean and inverse covariance disagree in shape.
    Shape {
        path: PathBuf,
        layer_index: usize,
        source: ShapeError,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound { class_id, dir } => write!(
                f,
                "statistics for class ID {class_id} not found in {}",
                dir.display()
            ),
            LoadError::Read { message, .. } => write!(f, "{message}"),
            LoadError::Malformed { path, message } => {
                write!(f, "malformed statistics file {}: {message}", path.display())
            }
            LoadError::Shape {
                path,
                layer_index,
                source,
            } => write!(
                f,
                "invalid layer {layer_index} in {}: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Shape { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Extract the class id from a statistics file name.
pub fn class_id_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(CLASS_FILE_SUFFIX)
        .filter(|id| !id.is_empty())
}

/// Loader bound to one statistics directory.
#[derive(Clone, Debug)]
pub struct StatisticsLoader {
    data_dir: PathBuf,
}

impl StatisticsLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the statistics file for `class_id`.
    pub fn class_file_path(&self, class_id: &str) -> PathBuf {
        self.data_dir.join(format!("{class_id}{CLASS_FILE_SUFFIX}"))
    }

    /// Load every class file found in the directory.
    ///
    /// Entries that are not regular files or do not follow the naming
    /// convention are skipped.
    pub fn load_all_class_data(&self) -> Result<HashMap<String, ClassStatistics>, LoadError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| LoadError::Read {
            path: self.data_dir.clone(),
            message: format!("Failed to list {}: {e}", self.data_dir.display()),
        })?;

        let mut classes = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoadError::Read {
                path: self.data_dir.clone(),
                message: format!("Failed to list {}: {e}", self.data_dir.display()),
            })?;
            let path = entry.path();
            let file_name = entry.file_name();
            let Some(class_id) = file_name
                .to_str()
                .and_then(class_id_from_file_name)
                .map(str::to_owned)
            else {
                debug!("StatisticsLoader skip {}", path.display());
                continue;
            };
            if !path.is_file() {
                debug!("StatisticsLoader skip non-file {}", path.display());
                continue;
            }
            let class = self.load_data_by_class_id(&class_id)?;
            classes.insert(class_id, class);
        }
        info!(
            "StatisticsLoader loaded {} classes from {}",
            classes.len(),
            self.data_dir.display()
        );
        Ok(classes)
    }

    /// Load every class file into a fresh store.
    pub fn load_store(&self) -> Result<ReferenceStatisticsStore, LoadError> {
        self.load_all_class_data().map(ReferenceStatisticsStore::from)
    }

    /// Load the statistics of a single class.
    pub fn load_data_by_class_id(&self, class_id: &str) -> Result<ClassStatistics, LoadError> {
        let path = self.class_file_path(class_id);
        if !path.exists() {
            return Err(LoadError::NotFound {
                class_id: class_id.to_string(),
                dir: self.data_dir.clone(),
            });
        }
        let data = fs::read_to_string(&path).map_err(|e| LoadError::Read {
            path: path.clone(),
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let record: ClassRecord =
            serde_json::from_str(&data).map_err(|e| LoadError::Malformed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let class = build_class(class_id, record, &path)?;
        info!(
            "StatisticsLoader class={} layers={}",
            class.class_id,
            class.len()
        );
        Ok(class)
    }
}

fn build_class(
    class_id: &str,
    mut record: ClassRecord,
    path: &Path,
) -> Result<ClassStatistics, LoadError> {
    if let Some(recorded) = record.class_id.as_deref() {
        if recorded != class_id {
            warn!(
                "StatisticsLoader {} records class_id={} but file name says {}",
                path.display(),
                recorded,
                class_id
            );
        }
    }

    record.layers.sort_by_key(|layer| layer.layer_index);
    for (position, pair) in record.layers.windows(2).enumerate() {
        let (prev, next) = (pair[0].layer_index, pair[1].layer_index);
        if prev == next {
            return Err(LoadError::Malformed {
                path: path.to_path_buf(),
                message: format!("duplicate layer_index {next}"),
            });
        }
        if next != prev + 1 {
            warn!(
                "StatisticsLoader {} layer_index jumps {} -> {} at position {}",
                path.display(),
                prev,
                next,
                position + 1
            );
        }
    }

    let mut class = ClassStatistics::new(class_id);
    for layer in record.layers {
        let shape_err = |source| LoadError::Shape {
            path: path.to_path_buf(),
            layer_index: layer.layer_index,
            source,
        };
        let inv_cov = layer.inv_cov_feat.to_matrix().map_err(shape_err)?;
        class
            .add(
                layer.layer_index,
                DVector::from_vec(layer.mean_feat),
                inv_cov,
            )
            .map_err(shape_err)?;
    }
    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_id_is_file_name_prefix() {
        assert_eq!(class_id_from_file_name("bolt_mean_inv_cov.json"), Some("bolt"));
        assert_eq!(
            class_id_from_file_name("hex_nut_mean_inv_cov.json"),
            Some("hex_nut")
        );
        assert_eq!(class_id_from_file_name("_mean_inv_cov.json"), None);
        assert_eq!(class_id_from_file_name("bolt_mean_inv_cov.pkl"), None);
        assert_eq!(class_id_from_file_name("notes.txt"), None);
    }

    #[test]
    fn build_class_sorts_layers_by_index() {
        let record: ClassRecord = serde_json::from_str(
            r#"{ "layers": [
                { "layer_index": 1, "mean_feat": [0.0, 1.0, 0.0], "inv_cov_feat": [[1,0,0],[0,1,0],[0,0,1]] },
                { "layer_index": 0, "mean_feat": [1.0, 0.0], "inv_cov_feat": [[1,0],[0,1]] }
            ] }"#,
        )
        .unwrap();
        let class = build_class("bolt", record, Path::new("bolt_mean_inv_cov.json")).unwrap();
        assert_eq!(class.get_layer_data(0).unwrap().layer_index, 0);
        assert_eq!(class.get_layer_data(0).unwrap().dim(), 2);
        assert_eq!(class.get_layer_data(1).unwrap().dim(), 3);
    }

    #[test]
    fn build_class_rejects_duplicate_indices() {
        let record: ClassRecord = serde_json::from_str(
            r#"{ "layers": [
                { "layer_index": 0, "mean_feat": [1.0], "inv_cov_feat": 1.0 },
                { "layer_index": 0, "mean_feat": [2.0], "inv_cov_feat": 1.0 }
            ] }"#,
        )
        .unwrap();
        let err = build_class("bolt", record, Path::new("x")).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
    }

    #[test]
    fn build_class_reports_shape_errors_with_layer() {
        let record: ClassRecord = serde_json::from_str(
            r#"{ "layers": [
                { "layer_index": 3, "mean_feat": [1.0, 2.0, 3.0], "inv_cov_feat": [[1,0],[0,1]] }
            ] }"#,
        )
        .unwrap();
        let err = build_class("bolt", record, Path::new("x")).unwrap_err();
        match err {
            LoadError::Shape {
                layer_index,
                source,
                ..
            } => {
                assert_eq!(layer_index, 3);
                assert_eq!(
                    source,
                    ShapeError::InverseDimensionMismatch {
                        mean_len: 3,
                        inv_dim: 2
                    }
                );
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn not_found_names_class_and_directory() {
        let err = LoadError::NotFound {
            class_id: "bolt".to_string(),
            dir: PathBuf::from("/data/stats"),
        };
        let msg = err.to_string();
        assert!(msg.contains("bolt"), "{msg}");
        assert!(msg.contains("/data/stats"), "{msg}");
    }
}
