mod common;

use common::fixtures::{identity_layer, write_class, write_two_layer_class};
use feature_anomaly::handler::{BoundingBox, Detection, DetectionScorer, ScoringParams};
use feature_anomaly::loader::StatisticsLoader;
use feature_anomaly::stats::LayerOutOfRange;
use feature_anomaly::{DistanceEngine, SampleFeatures, ScoreError};
use std::path::Path;
use std::sync::Arc;

const EPS: f64 = 1e-9;

fn engine_from(dir: &Path) -> DistanceEngine {
    let store = StatisticsLoader::new(dir).load_store().unwrap();
    DistanceEngine::new(Arc::new(store))
}

fn stacked(vectors: &[&[f64]]) -> Vec<Vec<Vec<f64>>> {
    SampleFeatures::from_layer_vectors(vectors.iter().map(|v| v.to_vec()).collect()).layer_outputs
}

#[test]
fn sample_equal_to_mean_scores_zero() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    write_class(dir.path(), "bolt", vec![identity_layer(0, &[1.0, 0.0])]);
    let engine = engine_from(dir.path());

    let samples = stacked(&[&[1.0, 0.0]]);
    assert_eq!(engine.distances("bolt", &samples).unwrap(), 0.0);
    assert_eq!(engine.angle_difference_sum("bolt", &samples).unwrap(), 0.0);
}

#[test]
fn orthogonal_sample_scores_sqrt2_and_90_degrees() {
    let dir = tempfile::tempdir().unwrap();
    write_class(dir.path(), "bolt", vec![identity_layer(0, &[1.0, 0.0])]);
    let engine = engine_from(dir.path());

    let samples = stacked(&[&[0.0, 1.0]]);
    let distance = engine.distances("bolt", &samples).unwrap();
    let angle = engine.angle_difference_sum("bolt", &samples).unwrap();
    assert!((distance - 1.41421).abs() < 1e-5, "distance={distance}");
    assert!((angle - 90.0).abs() < EPS, "angle={angle}");
}

#[test]
fn two_layer_class_with_matching_samples_scores_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "bolt");
    let engine = engine_from(dir.path());

    let samples = stacked(&[&[1.0, 0.0], &[0.0, 1.0]]);
    let score = engine.score("bolt", &samples).unwrap();
    assert_eq!(score.distance, 0.0);
    assert!(score.angle_deg.abs() < EPS);
}

#[test]
fn layer_scores_add_up() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "pair");
    write_class(dir.path(), "first", vec![identity_layer(0, &[1.0, 0.0])]);
    write_class(dir.path(), "second", vec![identity_layer(0, &[0.0, 1.0])]);
    let engine = engine_from(dir.path());

    let a: &[f64] = &[0.3, -0.8];
    let b: &[f64] = &[2.0, 0.5];
    let both = stacked(&[a, b]);

    let d_pair = engine.distances("pair", &both).unwrap();
    let d_sum = engine.distances("first", &stacked(&[a])).unwrap()
        + engine.distances("second", &stacked(&[b])).unwrap();
    assert!((d_pair - d_sum).abs() < EPS, "{d_pair} vs {d_sum}");

    let a_pair = engine.angle_difference_sum("pair", &both).unwrap();
    let a_sum = engine.angle_difference_sum("first", &stacked(&[a])).unwrap()
        + engine.angle_difference_sum("second", &stacked(&[b])).unwrap();
    assert!((a_pair - a_sum).abs() < EPS, "{a_pair} vs {a_sum}");
}

#[test]
fn shorter_sample_scores_available_prefix() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "bolt");
    let engine = engine_from(dir.path());

    let samples = stacked(&[&[0.0, 1.0]]);
    let report = engine.score_with_diagnostics("bolt", &samples).unwrap();
    assert_eq!(report.layers.len(), 1);
    assert!((report.score.distance - std::f64::consts::SQRT_2).abs() < EPS);
}

#[test]
fn longer_sample_fails_on_first_extra_layer() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "bolt");
    let engine = engine_from(dir.path());

    let samples = stacked(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0], &[1.0, 1.0]]);
    let expected = ScoreError::LayerOutOfRange(LayerOutOfRange {
        class_id: "bolt".to_string(),
        index: 2,
        available: 2,
    });
    assert_eq!(engine.distances("bolt", &samples).unwrap_err(), expected);
    assert_eq!(
        engine.angle_difference_sum("bolt", &samples).unwrap_err(),
        expected
    );
}

#[test]
fn unknown_class_is_rejected_at_score_time() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "bolt");
    let engine = engine_from(dir.path());

    let err = engine
        .distances("washer", &stacked(&[&[1.0, 0.0]]))
        .unwrap_err();
    assert!(
        matches!(&err, ScoreError::UnknownClass { class_id } if class_id == "washer"),
        "{err:?}"
    );
}

#[test]
fn scorer_produces_records_for_a_frame() {
    let dir = tempfile::tempdir().unwrap();
    write_two_layer_class(dir.path(), "bolt");
    let engine = engine_from(dir.path());
    let scorer = DetectionScorer::new(&engine, ScoringParams::default());

    let bbox = BoundingBox {
        x1: 5,
        y1: 5,
        x2: 60,
        y2: 60,
    };
    let detections = vec![
        Detection {
            class_id: 1,
            class_label: "bolt".to_string(),
            score: 0.8,
            bbox,
        },
        Detection {
            class_id: 2,
            class_label: "unknown".to_string(),
            score: 0.8,
            bbox,
        },
    ];
    let features = vec![
        Some(SampleFeatures::from_layer_vectors(vec![
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ])),
        Some(SampleFeatures::from_layer_vectors(vec![vec![0.0, 1.0]])),
    ];

    let records = scorer.score_frame(&detections, 640, 480, &features);
    assert_eq!(records.len(), 2);
    assert!((records[0].anomaly_distances - std::f64::consts::SQRT_2).abs() < EPS);
    assert!((records[0].angle_diff - 90.0).abs() < EPS);
    assert_eq!(records[1].anomaly_distances, 0.0);
    assert_eq!(records[1].angle_diff, 0.0);
}
