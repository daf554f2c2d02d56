use feature_anomaly::config::scoring;
use feature_anomaly::handler::{Detection, DetectionScorer};
use feature_anomaly::io::{read_json_file, write_json_file};
use feature_anomaly::{DistanceEngine, SampleFeatures, StatisticsLoader};
use log::info;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::sync::Arc;

/// One frame worth of detections with their extracted features.
#[derive(Debug, Deserialize)]
struct FrameInput {
    frame_width: i32,
    frame_height: i32,
    detections: Vec<DetectionInput>,
}

#[derive(Debug, Deserialize)]
struct DetectionInput {
    #[serde(flatten)]
    detection: Detection,
    #[serde(default)]
    features: Option<SampleFeatures>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = scoring::load_config(Path::new(&config_path))?;

    let loader = StatisticsLoader::new(&config.statistics_dir);
    let store = loader.load_store().map_err(|e| e.to_string())?;
    info!("score_detections classes={}", store.len());
    let engine = DistanceEngine::new(Arc::new(store));

    let frame: FrameInput = read_json_file(&config.input)?;
    let (detections, features): (Vec<Detection>, Vec<Option<SampleFeatures>>) = frame
        .detections
        .into_iter()
        .map(|d| (d.detection, d.features))
        .unzip();

    let scorer = DetectionScorer::new(&engine, config.scoring.clone());
    let records = scorer.score_frame(
        &detections,
        frame.frame_width,
        frame.frame_height,
        &features,
    );

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &records)?;
            println!("{} detection records written to {}", records.len(), path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&records)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn usage() -> String {
    "Usage: score_detections <config.json>".to_string()
}
