use feature_anomaly::loader::{ClassRecord, InverseCovariance, LayerRecord, CLASS_FILE_SUFFIX};
use feature_anomaly::ClassStatistics;
use std::fs;
use std::path::Path;

/// Identity matrix as nested rows.
pub fn identity_rows(dim: usize) -> Vec<Vec<f64>> {
    (0..dim)
        .map(|r| (0..dim).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Layer record with an identity inverse covariance.
pub fn identity_layer(layer_index: usize, mean: &[f64]) -> LayerRecord {
    LayerRecord {
        layer_index,
        mean_feat: mean.to_vec(),
        inv_cov_feat: InverseCovariance::Matrix(identity_rows(mean.len())),
    }
}

/// Write `<class_id>_mean_inv_cov.json` into `dir`.
pub fn write_class(dir: &Path, class_id: &str, layers: Vec<LayerRecord>) {
    write_record(
        dir,
        &ClassRecord {
            class_id: Some(class_id.to_string()),
            layers,
        },
    );
}

/// Persist in-memory statistics under their class id.
pub fn write_statistics(dir: &Path, class: &ClassStatistics) {
    write_record(dir, &ClassRecord::from_statistics(class));
}

fn write_record(dir: &Path, record: &ClassRecord) {
    let class_id = record.class_id.as_deref().expect("fixture records carry a class id");
    let path = dir.join(format!("{class_id}{CLASS_FILE_SUFFIX}"));
    let json = serde_json::to_string_pretty(record).expect("serialize class record");
    fs::write(&path, json).expect("write class record");
}

/// The two-layer class used across the scoring tests:
/// layer 0 mean `[1, 0]`, layer 1 mean `[0, 1]`, identity inverses.
pub fn write_two_layer_class(dir: &Path, class_id: &str) {
    write_class(
        dir,
        class_id,
        vec![identity_layer(0, &[1.0, 0.0]), identity_layer(1, &[0.0, 1.0])],
    );
}
