use feature_anomaly::{ClassStatistics, DistanceEngine, SampleFeatures};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

fn main() {
    // Demo stub: builds a two-layer class in memory and scores a few samples
    let mut class = ClassStatistics::new("demo");
    let layers = [vec![1.0, 0.0], vec![0.0, 1.0]];
    for (index, mean) in layers.iter().enumerate() {
        let mean = DVector::from_vec(mean.clone());
        if let Err(err) = class.add(index, mean, DMatrix::identity(2, 2)) {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
    let engine = DistanceEngine::new(Arc::new(std::iter::once(class).collect()));

    let samples = [
        vec![vec![1.0, 0.0]],
        vec![vec![0.0, 1.0]],
        vec![vec![1.0, 0.0], vec![0.0, 1.0]],
    ];
    for sample in samples {
        let feats = SampleFeatures::from_layer_vectors(sample.clone());
        match engine.score("demo", &feats.layer_outputs) {
            Ok(score) => println!(
                "sample={:?} distance={:.5} angle_deg={:.3}",
                sample, score.distance, score.angle_deg
            ),
            Err(err) => println!("sample={sample:?} error={err}"),
        }
    }
}
