pub mod factors;
pub mod history;

use crate::config::{EngineConfig, HealthWeights};
use crate::models::{FactorScore, HealthRecord, HealthTrend};
use crate::snapshot::MetricsSnapshot;

use factors::{
    BurndownHealth, EstimationAccuracy, HealthFactor, NoBlockers, ProgressOnTrack,
    ScopeStability, TeamBalance, VelocityTrendFactor,
};
use history::{HistoricalFactorProvider, NeutralHistory};

/// Classify a score against the previously stored one.
///
/// A change strictly larger than `delta` in either direction leaves `Stable`.
pub fn classify_trend(score: u8, prior_score: Option<u8>, delta: i32) -> HealthTrend {
    let Some(prior) = prior_score else {
        return HealthTrend::Stable;
    };
    let diff = i32::from(score) - i32::from(prior);
    if diff > delta {
        HealthTrend::Improving
    } else if diff < -delta {
        HealthTrend::Declining
    } else {
        HealthTrend::Stable
    }
}

fn factors_for(weights: &HealthWeights) -> Vec<Box<dyn HealthFactor>> {
    vec![
        Box::new(ProgressOnTrack {
            weight: weights.progress_on_track,
        }),
        Box::new(NoBlockers {
            weight: weights.no_blockers,
        }),
        Box::new(TeamBalance {
            weight: weights.team_balance,
        }),
        Box::new(VelocityTrendFactor {
            weight: weights.velocity_trend,
        }),
        Box::new(ScopeStability {
            weight: weights.scope_stability,
        }),
        Box::new(EstimationAccuracy {
            weight: weights.estimation_accuracy,
        }),
        Box::new(BurndownHealth {
            weight: weights.burndown_health,
        }),
    ]
}

/// Weighted seven-factor health scorer.
pub struct HealthScorer<H = NeutralHistory> {
    weights: HealthWeights,
    trend_delta: i32,
    history: H,
}

impl HealthScorer<NeutralHistory> {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_history(config, NeutralHistory)
    }
}

impl<H: HistoricalFactorProvider> HealthScorer<H> {
    pub fn with_history(config: &EngineConfig, history: H) -> Self {
        Self {
            weights: config.health_weights.clone(),
            trend_delta: config.thresholds.health_trend_delta,
            history,
        }
    }

    pub fn score(&self, snapshot: &MetricsSnapshot, prior_score: Option<u8>) -> HealthRecord {
        let factors: Vec<FactorScore> = factors_for(&self.weights)
            .iter()
            .map(|f| f.score(snapshot, &self.history))
            .collect();

        let raw_total: f64 = factors.iter().map(|f| f.weighted_score).sum();
        let score = raw_total.clamp(0.0, 100.0).round() as u8;
        let trend = classify_trend(score, prior_score, self.trend_delta);

        tracing::debug!(
            iteration = %snapshot.iteration_id,
            score,
            ?prior_score,
            ?trend,
            "computed iteration health"
        );

        HealthRecord {
            score,
            trend,
            factors,
        }
    }
}

/// Score a snapshot with the default weight table and neutral history.
pub fn compute_health(snapshot: &MetricsSnapshot, prior_score: Option<u8>) -> HealthRecord {
    HealthScorer::new(&EngineConfig::default()).score(snapshot, prior_score)
}
