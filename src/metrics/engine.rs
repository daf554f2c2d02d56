use super::error::ScoreError;
use super::mahalanobis::{angle_difference_deg, mahalanobis};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{AnomalyScore, LayerScore, ScoreReport, TimingBreakdown};
use crate::stats::{ClassStatistics, LayerStatistic, ReferenceStatisticsStore, ShapeError};
use log::debug;
use std::sync::Arc;
use std::time::Instant;

/// Scores per-layer sample features against the reference statistics of a
/// class.
///
/// Sample sequences are aligned with class layers by position. A sequence
/// shorter than the class is scored over its prefix; a longer one fails with
/// [`ScoreError::LayerOutOfRange`] at the first unmatched position.
#[derive(Clone, Debug)]
pub struct DistanceEngine {
    store: Arc<ReferenceStatisticsStore>,
}

impl DistanceEngine {
    pub fn new(store: Arc<ReferenceStatisticsStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ReferenceStatisticsStore {
        &self.store
    }

    /// Sum of per-layer Mahalanobis distances.
    pub fn distances(
        &self,
        class_id: &str,
        sample_feats: &[Vec<Vec<f64>>],
    ) -> Result<f64, ScoreError> {
        let class = self.class(class_id)?;
        let mut total = 0.0;
        for (index, output) in sample_feats.iter().enumerate() {
            let (sample, layer) = align(class, index, output)?;
            total += layer_distance(index, sample, layer)?;
        }
        debug!("DistanceEngine::distances class={class_id} total={total}");
        Ok(total)
    }

    /// Sum of per-layer angles, in degrees, between sample and mean vectors.
    pub fn angle_difference_sum(
        &self,
        class_id: &str,
        sample_feats: &[Vec<Vec<f64>>],
    ) -> Result<f64, ScoreError> {
        let class = self.class(class_id)?;
        let mut total = 0.0;
        for (index, output) in sample_feats.iter().enumerate() {
            let (sample, layer) = align(class, index, output)?;
            total += layer_angle(index, sample, layer)?;
        }
        debug!("DistanceEngine::angle_difference_sum class={class_id} total={total}");
        Ok(total)
    }

    /// Both signals in a single pass over the layers.
    pub fn score(
        &self,
        class_id: &str,
        sample_feats: &[Vec<Vec<f64>>],
    ) -> Result<AnomalyScore, ScoreError> {
        self.score_with_diagnostics(class_id, sample_feats)
            .map(|report| report.score)
    }

    /// Score and keep the per-layer breakdown and timings.
    pub fn score_with_diagnostics(
        &self,
        class_id: &str,
        sample_feats: &[Vec<Vec<f64>>],
    ) -> Result<ScoreReport, ScoreError> {
        let total_start = Instant::now();
        let class = self.class(class_id)?;
        let mut timing = TimingBreakdown::default();
        let mut score = AnomalyScore::default();
        let mut layers = Vec::with_capacity(sample_feats.len());

        for (index, output) in sample_feats.iter().enumerate() {
            let layer_start = Instant::now();
            let (sample, layer) = align(class, index, output)?;
            let distance = layer_distance(index, sample, layer)?;
            let angle_deg = layer_angle(index, sample, layer)?;
            score.distance += distance;
            score.angle_deg += angle_deg;
            layers.push(LayerScore {
                position: index,
                layer_index: layer.layer_index,
                dim: layer.dim(),
                distance,
                angle_deg,
            });
            timing.push(format!("layer{index}"), elapsed_ms(layer_start));
        }
        timing.total_ms = elapsed_ms(total_start);

        debug!(
            "DistanceEngine::score class={} layers={} distance={:.4} angle_deg={:.3} total_ms={:.3}",
            class_id,
            layers.len(),
            score.distance,
            score.angle_deg,
            timing.total_ms
        );
        Ok(ScoreReport {
            class_id: class_id.to_string(),
            score,
            layers,
            timing,
        })
    }

    fn class(&self, class_id: &str) -> Result<&ClassStatistics, ScoreError> {
        self.store.get(class_id).ok_or_else(|| ScoreError::UnknownClass {
            class_id: class_id.to_string(),
        })
    }
}

/// Pair the sample vector at `index` with the class layer at the same position.
fn align<'a>(
    class: &'a ClassStatistics,
    index: usize,
    output: &'a [Vec<f64>],
) -> Result<(&'a [f64], &'a LayerStatistic), ScoreError> {
    let layer = class.get_layer_data(index)?;
    let sample = output
        .first()
        .ok_or_else(|| ScoreError::from(ShapeError::EmptyLayerOutput).at_layer(index))?;
    Ok((sample.as_slice(), layer))
}

fn layer_distance(
    index: usize,
    sample: &[f64],
    layer: &LayerStatistic,
) -> Result<f64, ScoreError> {
    mahalanobis(sample, layer.mean_feat.as_slice(), &layer.inv_cov_feat)
        .map_err(|e| e.at_layer(index))
}

fn layer_angle(index: usize, sample: &[f64], layer: &LayerStatistic) -> Result<f64, ScoreError> {
    angle_difference_deg(sample, layer.mean_feat.as_slice()).map_err(|e| e.at_layer(index))
}
