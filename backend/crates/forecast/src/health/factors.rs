//! The seven health factors. Each scores a snapshot on a 0-100 scale.

use crate::models::FactorScore;
use crate::snapshot::MetricsSnapshot;

use super::history::HistoricalFactorProvider;

/// Points deducted per stuck item.
pub const BLOCKER_PENALTY: f64 = 20.0;
/// Points deducted per overloaded member.
pub const OVERLOAD_PENALTY: f64 = 15.0;
/// Points deducted per underutilized member.
pub const UNDERUTILIZED_PENALTY: f64 = 5.0;

pub trait HealthFactor {
    fn name(&self) -> &'static str;
    fn weight(&self) -> f64;
    fn raw_score(&self, snapshot: &MetricsSnapshot, history: &dyn HistoricalFactorProvider)
        -> f64;

    fn score(
        &self,
        snapshot: &MetricsSnapshot,
        history: &dyn HistoricalFactorProvider,
    ) -> FactorScore {
        let raw = self.raw_score(snapshot, history);
        // Non-finite provider output counts as a zero sub-score.
        let score = if raw.is_finite() {
            raw.clamp(0.0, 100.0)
        } else {
            0.0
        };
        FactorScore {
            name: self.name().to_string(),
            score,
            weight: self.weight(),
            weighted_score: score * self.weight(),
        }
    }
}

pub struct ProgressOnTrack {
    pub weight: f64,
}

impl HealthFactor for ProgressOnTrack {
    fn name(&self) -> &'static str {
        "progress_on_track"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(&self, snapshot: &MetricsSnapshot, _: &dyn HistoricalFactorProvider) -> f64 {
        let ideal = f64::from(snapshot.timeline.ideal_progress).max(1.0);
        (f64::from(snapshot.progress_pct) / ideal * 100.0).min(100.0)
    }
}

pub struct NoBlockers {
    pub weight: f64,
}

impl HealthFactor for NoBlockers {
    fn name(&self) -> &'static str {
        "no_blockers"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(&self, snapshot: &MetricsSnapshot, _: &dyn HistoricalFactorProvider) -> f64 {
        (100.0 - snapshot.blocked_count as f64 * BLOCKER_PENALTY).max(0.0)
    }
}

pub struct TeamBalance {
    pub weight: f64,
}

impl HealthFactor for TeamBalance {
    fn name(&self) -> &'static str {
        "team_balance"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(&self, snapshot: &MetricsSnapshot, _: &dyn HistoricalFactorProvider) -> f64 {
        let load = &snapshot.team_load;
        (100.0
            - load.overloaded_count as f64 * OVERLOAD_PENALTY
            - load.underutilized_count as f64 * UNDERUTILIZED_PENALTY)
            .max(0.0)
    }
}

pub struct VelocityTrendFactor {
    pub weight: f64,
}

impl HealthFactor for VelocityTrendFactor {
    fn name(&self) -> &'static str {
        "velocity_trend"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(
        &self,
        snapshot: &MetricsSnapshot,
        history: &dyn HistoricalFactorProvider,
    ) -> f64 {
        history.velocity_trend(snapshot)
    }
}

pub struct ScopeStability {
    pub weight: f64,
}

impl HealthFactor for ScopeStability {
    fn name(&self) -> &'static str {
        "scope_stability"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(
        &self,
        snapshot: &MetricsSnapshot,
        history: &dyn HistoricalFactorProvider,
    ) -> f64 {
        history.scope_stability(snapshot)
    }
}

pub struct EstimationAccuracy {
    pub weight: f64,
}

impl HealthFactor for EstimationAccuracy {
    fn name(&self) -> &'static str {
        "estimation_accuracy"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(
        &self,
        snapshot: &MetricsSnapshot,
        history: &dyn HistoricalFactorProvider,
    ) -> f64 {
        history.estimation_accuracy(snapshot)
    }
}

pub struct BurndownHealth {
    pub weight: f64,
}

impl HealthFactor for BurndownHealth {
    fn name(&self) -> &'static str {
        "burndown_health"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn raw_score(&self, snapshot: &MetricsSnapshot, _: &dyn HistoricalFactorProvider) -> f64 {
        let gap = f64::from(snapshot.progress_pct) - f64::from(snapshot.timeline.ideal_progress);
        (100.0 - gap.abs()).max(0.0)
    }
}
