use chrono::{DateTime, Utc};
use uuid::Uuid;

use cadence_common::error::CadenceResult;
use cadence_forecast::{
    assess_risks, EngineConfig, HealthScorer, MetricsSnapshot, PredictionRecord,
    VelocityPredictor,
};

use super::models::IterationReport;
use super::sources::IterationSource;
use super::store::HealthStore;

pub struct IterationService<S: IterationSource, H: HealthStore> {
    source: S,
    store: H,
    config: EngineConfig,
}

impl<S: IterationSource, H: HealthStore> IterationService<S, H> {
    pub fn new(source: S, store: H, config: EngineConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Score and forecast the board's running iteration, then save the report.
    pub async fn evaluate(&self, board_id: &str) -> CadenceResult<IterationReport> {
        self.evaluate_at(board_id, Utc::now()).await
    }

    /// Same as [`Self::evaluate`] with an explicit instant.
    ///
    /// Current and historical data are fetched concurrently. A failed current
    /// fetch is returned as an error; a failed history fetch degrades the
    /// forecast to the fallback prediction. A failed prior-score read scores
    /// the iteration without a trend baseline.
    pub async fn evaluate_at(
        &self,
        board_id: &str,
        now: DateTime<Utc>,
    ) -> CadenceResult<IterationReport> {
        let (current, history) = tokio::join!(
            self.source.current_iteration(board_id),
            self.source
                .closed_iterations(board_id, self.config.lookback_sprints),
        );
        let current = current?;

        let snapshot =
            MetricsSnapshot::build(&current.iteration, &current.items, now, &self.config);

        let prior_score = match self.store.latest_score(&current.iteration.id).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(
                    iteration = %current.iteration.id,
                    error = %e,
                    "failed to read prior health score"
                );
                None
            }
        };
        let health = HealthScorer::new(&self.config).score(&snapshot, prior_score);

        let prediction = match history {
            Ok(history) => VelocityPredictor::new(&self.config)
                .predict(&snapshot.current_progress(), Some(&history)),
            Err(e) => {
                tracing::warn!(
                    board = board_id,
                    error = %e,
                    "historical iteration fetch failed, using fallback prediction"
                );
                PredictionRecord::fallback()
            }
        };

        let risks = assess_risks(&snapshot, &health, &prediction);

        tracing::info!(
            board = board_id,
            iteration = %current.iteration.id,
            score = health.score,
            trend = ?health.trend,
            completion = prediction.completion_percentage,
            confidence = prediction.confidence,
            risks = risks.len(),
            "iteration evaluated"
        );

        let report = IterationReport {
            id: Uuid::new_v4(),
            board_id: board_id.to_owned(),
            iteration_id: current.iteration.id.clone(),
            computed_at: now,
            snapshot,
            health,
            prediction,
            risks,
        };
        self.store.save(report).await
    }
}
