use crate::snapshot::MetricsSnapshot;

pub const NEUTRAL_VELOCITY_TREND: f64 = 70.0;
pub const NEUTRAL_SCOPE_STABILITY: f64 = 80.0;
pub const NEUTRAL_ESTIMATION_ACCURACY: f64 = 75.0;

/// Source of the health factors that need multi-iteration history.
///
/// Every method returns a 0-100 sub-score. Implementations backed by real
/// change history or estimate-vs-actual ledgers can replace [`NeutralHistory`]
/// without touching the weight table.
pub trait HistoricalFactorProvider: Send + Sync {
    fn velocity_trend(&self, snapshot: &MetricsSnapshot) -> f64;
    fn scope_stability(&self, snapshot: &MetricsSnapshot) -> f64;
    fn estimation_accuracy(&self, snapshot: &MetricsSnapshot) -> f64;
}

/// Fixed stand-in values used when no history is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralHistory;

impl HistoricalFactorProvider for NeutralHistory {
    fn velocity_trend(&self, _snapshot: &MetricsSnapshot) -> f64 {
        NEUTRAL_VELOCITY_TREND
    }

    fn scope_stability(&self, _snapshot: &MetricsSnapshot) -> f64 {
        NEUTRAL_SCOPE_STABILITY
    }

    fn estimation_accuracy(&self, _snapshot: &MetricsSnapshot) -> f64 {
        NEUTRAL_ESTIMATION_ACCURACY
    }
}
