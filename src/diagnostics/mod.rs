pub mod report;
pub mod timing;

pub use report::{AnomalyScore, LayerScore, ScoreReport};
pub use timing::{StageTiming, TimingBreakdown};
