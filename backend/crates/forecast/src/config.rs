use serde::{Deserialize, Serialize};

/// Lowest confidence the predictor ever reports.
pub const MIN_CONFIDENCE: f64 = 0.5;
/// Highest confidence the predictor ever reports.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Confidence reported by the current-pace projection used without history.
pub const SIMPLE_PROJECTION_CONFIDENCE: f64 = 0.6;
/// Confidence gained per closed iteration in the lookback window.
pub const CONFIDENCE_PER_SAMPLE: f64 = 0.05;
/// Closed iterations beyond this count add no further confidence.
pub const MAX_CONFIDENCE_SAMPLES: usize = 3;
/// Confidence gained at full time progress, scaled linearly.
pub const CONFIDENCE_TIME_WEIGHT: f64 = 0.2;
/// Confidence gained for each variance band the ensemble falls under.
pub const CONFIDENCE_AGREEMENT_BONUS: f64 = 0.1;

/// Weight table for the seven health factors. Sums to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthWeights {
    pub progress_on_track: f64,
    pub no_blockers: f64,
    pub team_balance: f64,
    pub velocity_trend: f64,
    pub scope_stability: f64,
    pub estimation_accuracy: f64,
    pub burndown_health: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            progress_on_track: 0.25,
            no_blockers: 0.20,
            team_balance: 0.15,
            velocity_trend: 0.15,
            scope_stability: 0.10,
            estimation_accuracy: 0.10,
            burndown_health: 0.05,
        }
    }
}

impl HealthWeights {
    pub fn total(&self) -> f64 {
        self.progress_on_track
            + self.no_blockers
            + self.team_balance
            + self.velocity_trend
            + self.scope_stability
            + self.estimation_accuracy
            + self.burndown_health
    }
}

/// Weight table for the four projection models. Sums to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub linear_velocity: f64,
    pub historical_rate: f64,
    pub burn_rate: f64,
    pub in_progress_aware: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            linear_velocity: 0.30,
            historical_rate: 0.30,
            burn_rate: 0.25,
            in_progress_aware: 0.15,
        }
    }
}

impl EnsembleWeights {
    pub fn total(&self) -> f64 {
        self.linear_velocity + self.historical_rate + self.burn_rate + self.in_progress_aware
    }
}

/// Named thresholds used by the scorer and predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Health score delta (exclusive) that flips the trend away from stable.
    pub health_trend_delta: i32,
    /// Actual-vs-expected progress deviation (exclusive) for ahead/behind.
    pub prediction_trend_deviation: f64,
    /// Deviation (exclusive) before the schedule note is added to factors.
    pub schedule_deviation: f64,
    /// Regression slope (exclusive) of historical completed points.
    pub historical_slope: f64,
    /// Points added to or removed from the historical model per trend.
    pub historical_trend_adjustment: f64,
    /// Remaining days at or under which the deadline note fires.
    pub deadline_window_days: i64,
    /// Share of total points in flight before the in-progress note fires.
    pub in_progress_share: f64,
    /// Fraction of in-flight points assumed to land by the end.
    pub in_flight_landing_ratio: f64,
    pub variance_loose: f64,
    pub variance_tight: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            health_trend_delta: 5,
            prediction_trend_deviation: 0.1,
            schedule_deviation: 0.10,
            historical_slope: 1.0,
            historical_trend_adjustment: 5.0,
            deadline_window_days: 3,
            in_progress_share: 0.25,
            in_flight_landing_ratio: 0.7,
            variance_loose: 100.0,
            variance_tight: 50.0,
        }
    }
}

/// Options recognized by the engine. Owned and supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub stuck_task_days: i64,
    pub lookback_sprints: usize,
    pub standard_capacity_points: f64,
    #[serde(default)]
    pub health_weights: HealthWeights,
    #[serde(default)]
    pub ensemble_weights: EnsembleWeights,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stuck_task_days: 2,
            lookback_sprints: 3,
            standard_capacity_points: 20.0,
            health_weights: HealthWeights::default(),
            ensemble_weights: EnsembleWeights::default(),
            thresholds: Thresholds::default(),
        }
    }
}
