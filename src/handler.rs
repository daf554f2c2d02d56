//! Per-detection scoring on top of the [`DistanceEngine`].
//!
//! A detection is scored only when its confidence reaches
//! [`ScoringParams::min_score`], its box covers a non-empty region of the
//! frame and features were extracted for it. Scoring failures never abort a
//! frame: the failing signal is logged and reported as `0.0`.

use crate::features::SampleFeatures;
use crate::metrics::DistanceEngine;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Width in pixels; widened so extreme coordinates cannot overflow.
    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }

    /// True when the box covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Clamp the box into a `width × height` frame.
    ///
    /// Returns `None` when the box is empty before or after clamping, which
    /// includes boxes lying entirely outside the frame.
    pub fn clip(&self, width: i32, height: i32) -> Option<BoundingBox> {
        if self.is_empty() {
            return None;
        }
        let (width, height) = (width.max(0), height.max(0));
        let clipped = BoundingBox {
            x1: self.x1.clamp(0, width),
            y1: self.y1.clamp(0, height),
            x2: self.x2.clamp(0, width),
            y2: self.y2.clamp(0, height),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// One object reported by the detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: i64,
    pub class_label: String,
    pub score: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Result record for one detection, including both anomaly signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub class_id: i64,
    pub class_label: String,
    pub score: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub anomaly_distances: f64,
    pub angle_diff: f64,
}

/// Knobs for the per-detection scorer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Detections below this confidence are passed through unscored.
    pub min_score: f32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self { min_score: 0.1 }
    }
}

/// Scores detections of a frame, falling back to zero on failures.
pub struct DetectionScorer<'a> {
    engine: &'a DistanceEngine,
    params: ScoringParams,
}

impl<'a> DetectionScorer<'a> {
    pub fn new(engine: &'a DistanceEngine, params: ScoringParams) -> Self {
        Self { engine, params }
    }

    /// Score one detection of a `frame_width × frame_height` frame.
    ///
    /// Features are looked up against the detection's class label.
    pub fn score(
        &self,
        detection: &Detection,
        frame_width: i32,
        frame_height: i32,
        features: Option<&SampleFeatures>,
    ) -> DetectionRecord {
        let mut record = DetectionRecord {
            class_id: detection.class_id,
            class_label: detection.class_label.clone(),
            score: detection.score,
            bbox: detection.bbox,
            anomaly_distances: 0.0,
            angle_diff: 0.0,
        };

        if detection.score < self.params.min_score {
            return record;
        }
        if detection.bbox.clip(frame_width, frame_height).is_none() {
            debug!(
                "DetectionScorer skip label={} degenerate box {:?}",
                detection.class_label, detection.bbox
            );
            return record;
        }
        let Some(features) = features.filter(|f| f.has_results()) else {
            debug!(
                "DetectionScorer skip label={} without features",
                detection.class_label
            );
            return record;
        };

        let label = detection.class_label.as_str();
        match self.engine.distances(label, &features.layer_outputs) {
            Ok(distance) => {
                debug!("distances is {distance}");
                record.anomaly_distances = distance;
            }
            Err(err) => warn!("DetectionScorer distance failed label={label}: {err}"),
        }
        match self.engine.angle_difference_sum(label, &features.layer_outputs) {
            Ok(angle) => {
                debug!("angle diff is {angle}");
                record.angle_diff = angle;
            }
            Err(err) => warn!("DetectionScorer angle failed label={label}: {err}"),
        }
        record
    }

    /// Score every detection of a frame; `features[i]` belongs to
    /// `detections[i]`, missing entries count as no features.
    pub fn score_frame(
        &self,
        detections: &[Detection],
        frame_width: i32,
        frame_height: i32,
        features: &[Option<SampleFeatures>],
    ) -> Vec<DetectionRecord> {
        detections
            .iter()
            .enumerate()
            .map(|(i, detection)| {
                let feats = features.get(i).and_then(Option::as_ref);
                self.score(detection, frame_width, frame_height, feats)
            })
            .collect()
    }
}
