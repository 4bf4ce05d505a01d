//! Projection models blended by the velocity ensemble.
//!
//! Each model maps current progress plus the history summary onto an
//! estimated completion percentage. Values are not clamped per model.

use crate::config::{EnsembleWeights, Thresholds};
use crate::models::{CurrentProgress, ModelContribution};

use super::history::{HistoricalTrend, HistorySummary};

pub trait ProjectionModel: Send + Sync {
    fn name(&self) -> &'static str;
    fn project(&self, current: &CurrentProgress, history: &HistorySummary) -> f64;
}

fn percent_of_total(points: f64, total_points: f64) -> f64 {
    if total_points <= 0.0 {
        return 0.0;
    }
    points / total_points * 100.0
}

/// Extrapolates the average daily pace across the whole iteration.
pub struct LinearVelocity;

impl ProjectionModel for LinearVelocity {
    fn name(&self) -> &'static str {
        "linear_velocity"
    }

    fn project(&self, current: &CurrentProgress, _: &HistorySummary) -> f64 {
        let elapsed = current.elapsed_days.max(1) as f64;
        let projected = current.completed_points / elapsed * current.total_days.max(0) as f64;
        percent_of_total(projected, current.total_points)
    }
}

/// Average historical completion rate, nudged by the historical trend.
pub struct HistoricalRate {
    pub trend_adjustment: f64,
}

impl ProjectionModel for HistoricalRate {
    fn name(&self) -> &'static str {
        "historical_rate"
    }

    fn project(&self, _: &CurrentProgress, history: &HistorySummary) -> f64 {
        let adjustment = match history.trend {
            HistoricalTrend::Improving => self.trend_adjustment,
            HistoricalTrend::Declining => -self.trend_adjustment,
            HistoricalTrend::Stable => 0.0,
        };
        history.average_completion_rate * 100.0 + adjustment
    }
}

/// Daily burn rate carried over the iteration length. Same arithmetic as
/// [`LinearVelocity`], reported separately in the model breakdown.
pub struct BurnRate;

impl ProjectionModel for BurnRate {
    fn name(&self) -> &'static str {
        "burn_rate"
    }

    fn project(&self, current: &CurrentProgress, _: &HistorySummary) -> f64 {
        let burn_per_day = current.completed_points / current.elapsed_days.max(1) as f64;
        let burned_by_end = burn_per_day * current.total_days.max(0) as f64;
        percent_of_total(burned_by_end, current.total_points)
    }
}

/// Completed work plus the share of in-flight work expected to land.
pub struct InProgressAware {
    pub landing_ratio: f64,
}

impl ProjectionModel for InProgressAware {
    fn name(&self) -> &'static str {
        "in_progress_aware"
    }

    fn project(&self, current: &CurrentProgress, _: &HistorySummary) -> f64 {
        let expected =
            current.completed_points + current.in_progress_points * self.landing_ratio;
        percent_of_total(expected, current.total_points)
    }
}

pub struct WeightedModel {
    pub model: Box<dyn ProjectionModel>,
    pub weight: f64,
}

/// A weighted set of projection models.
pub struct Ensemble {
    models: Vec<WeightedModel>,
}

impl Ensemble {
    pub fn new(models: Vec<WeightedModel>) -> Self {
        Self { models }
    }

    /// The four standard models with their configured weights.
    pub fn standard(weights: &EnsembleWeights, thresholds: &Thresholds) -> Self {
        Self::new(vec![
            WeightedModel {
                model: Box::new(LinearVelocity),
                weight: weights.linear_velocity,
            },
            WeightedModel {
                model: Box::new(HistoricalRate {
                    trend_adjustment: thresholds.historical_trend_adjustment,
                }),
                weight: weights.historical_rate,
            },
            WeightedModel {
                model: Box::new(BurnRate),
                weight: weights.burn_rate,
            },
            WeightedModel {
                model: Box::new(InProgressAware {
                    landing_ratio: thresholds.in_flight_landing_ratio,
                }),
                weight: weights.in_progress_aware,
            },
        ])
    }

    pub fn run(&self, current: &CurrentProgress, history: &HistorySummary) -> Vec<ModelContribution> {
        self.models
            .iter()
            .map(|m| ModelContribution {
                name: m.model.name().to_string(),
                value: m.model.project(current, history),
                weight: m.weight,
            })
            .collect()
    }
}

/// Weighted mean of the model outputs. Zero when no weight is registered.
pub fn blend(contributions: &[ModelContribution]) -> f64 {
    let weight_sum: f64 = contributions.iter().map(|c| c.weight).sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }
    contributions.iter().map(|c| c.value * c.weight).sum::<f64>() / weight_sum
}

/// Population variance of the model outputs.
pub fn variance(contributions: &[ModelContribution]) -> f64 {
    if contributions.is_empty() {
        return 0.0;
    }
    let n = contributions.len() as f64;
    let mean = contributions.iter().map(|c| c.value).sum::<f64>() / n;
    contributions
        .iter()
        .map(|c| (c.value - mean).powi(2))
        .sum::<f64>()
        / n
}
