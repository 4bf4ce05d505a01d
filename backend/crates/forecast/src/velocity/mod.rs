pub mod history;
pub mod models;

use crate::config::{
    EngineConfig, Thresholds, CONFIDENCE_AGREEMENT_BONUS, CONFIDENCE_PER_SAMPLE,
    CONFIDENCE_TIME_WEIGHT, MAX_CONFIDENCE, MAX_CONFIDENCE_SAMPLES, MIN_CONFIDENCE,
    SIMPLE_PROJECTION_CONFIDENCE,
};
use crate::models::{
    CurrentProgress, HistoricalVelocity, ModelContribution, PredictionRecord, VelocityTrend,
};

use history::{summarize, HistoricalTrend, HistorySummary};
use models::{blend, variance, Ensemble};

const TYPICAL_PACE_NOTE: &str = "Completion pace is typical for this team";

/// Forecasts end-of-iteration completion from current progress and history.
pub struct VelocityPredictor {
    lookback: usize,
    thresholds: Thresholds,
    ensemble: Ensemble,
}

impl VelocityPredictor {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_ensemble(
            config,
            Ensemble::standard(&config.ensemble_weights, &config.thresholds),
        )
    }

    pub fn with_ensemble(config: &EngineConfig, ensemble: Ensemble) -> Self {
        Self {
            lookback: config.lookback_sprints,
            thresholds: config.thresholds.clone(),
            ensemble,
        }
    }

    /// Never fails: a forecast that cannot be assembled from finite values
    /// yields [`PredictionRecord::fallback`].
    pub fn predict(
        &self,
        current: &CurrentProgress,
        history: Option<&HistoricalVelocity>,
    ) -> PredictionRecord {
        let recent = history.map(|h| h.recent(self.lookback)).unwrap_or(&[]);
        let record = match summarize(recent, self.thresholds.historical_slope) {
            Some(summary) => self.ensemble_projection(current, &summary),
            None => Some(simple_projection(current)),
        };

        let Some(record) = record.filter(is_well_formed) else {
            tracing::warn!(
                completed = current.completed_points,
                total = current.total_points,
                "velocity prediction produced non-finite values, using fallback"
            );
            return PredictionRecord::fallback();
        };

        tracing::debug!(
            predicted = record.predicted_points,
            completion = record.completion_percentage,
            confidence = record.confidence,
            trend = ?record.trend,
            "computed velocity prediction"
        );
        record
    }

    fn ensemble_projection(
        &self,
        current: &CurrentProgress,
        summary: &HistorySummary,
    ) -> Option<PredictionRecord> {
        let contributions = self.ensemble.run(current, summary);
        let blended = blend(&contributions);
        if !blended.is_finite() {
            return None;
        }
        let completion = blended.clamp(0.0, 100.0);
        let completion_percentage = completion.round() as u32;
        let predicted_points = (completion / 100.0 * current.total_points.max(0.0)).round();

        let confidence = self.confidence(current, summary, &contributions);
        let deviation = schedule_deviation(current, summary);
        let trend = if deviation > self.thresholds.prediction_trend_deviation {
            VelocityTrend::Ahead
        } else if deviation < -self.thresholds.prediction_trend_deviation {
            VelocityTrend::Behind
        } else {
            VelocityTrend::OnTrack
        };

        Some(PredictionRecord {
            current_points: current.completed_points,
            predicted_points,
            completion_percentage,
            confidence,
            trend,
            factors: self.factors(current, summary, deviation, completion_percentage),
            model_breakdown: contributions,
        })
    }

    fn confidence(
        &self,
        current: &CurrentProgress,
        summary: &HistorySummary,
        contributions: &[ModelContribution],
    ) -> f64 {
        let samples = summary.sample_count.min(MAX_CONFIDENCE_SAMPLES) as f64;
        let spread = variance(contributions);

        let mut confidence = MIN_CONFIDENCE
            + samples * CONFIDENCE_PER_SAMPLE
            + current.time_progress.clamp(0.0, 1.0) * CONFIDENCE_TIME_WEIGHT;
        if spread < self.thresholds.variance_loose {
            confidence += CONFIDENCE_AGREEMENT_BONUS;
        }
        if spread < self.thresholds.variance_tight {
            confidence += CONFIDENCE_AGREEMENT_BONUS;
        }
        confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }

    /// Annotations in fixed order: historical trend, schedule, in-progress
    /// volume, deadline.
    fn factors(
        &self,
        current: &CurrentProgress,
        summary: &HistorySummary,
        deviation: f64,
        completion_percentage: u32,
    ) -> Vec<String> {
        let mut factors = Vec::new();

        match summary.trend {
            HistoricalTrend::Improving => factors
                .push("Team velocity has been improving over recent iterations".to_owned()),
            HistoricalTrend::Declining => factors
                .push("Team velocity has been declining over recent iterations".to_owned()),
            HistoricalTrend::Stable => {}
        }

        if deviation > self.thresholds.schedule_deviation {
            factors.push(format!(
                "Running {:.0}% ahead of the usual pace",
                deviation * 100.0
            ));
        } else if deviation < -self.thresholds.schedule_deviation {
            factors.push(format!(
                "Running {:.0}% behind the usual pace",
                -deviation * 100.0
            ));
        }

        if current.total_points > 0.0
            && current.in_progress_points / current.total_points >= self.thresholds.in_progress_share
        {
            factors.push(format!(
                "{:.0} points are still in progress",
                current.in_progress_points
            ));
        }

        if (0..=self.thresholds.deadline_window_days).contains(&current.remaining_days)
            && completion_percentage < 100
        {
            factors.push(format!(
                "Only {} day(s) left in the iteration",
                current.remaining_days
            ));
        }

        if factors.is_empty() {
            factors.push(TYPICAL_PACE_NOTE.to_owned());
        }
        factors
    }
}

/// Actual completed share minus the share history says should be done by now.
fn schedule_deviation(current: &CurrentProgress, summary: &HistorySummary) -> f64 {
    let actual = if current.total_points > 0.0 {
        current.completed_points / current.total_points
    } else {
        0.0
    };
    let expected = current.time_progress * summary.average_completion_rate;
    actual - expected
}

/// Current-pace projection used when no closed iteration is available.
fn simple_projection(current: &CurrentProgress) -> PredictionRecord {
    if current.time_progress <= 0.0 {
        return PredictionRecord {
            current_points: current.completed_points,
            predicted_points: 0.0,
            completion_percentage: 0,
            confidence: MIN_CONFIDENCE,
            trend: VelocityTrend::Unknown,
            factors: vec!["Iteration has not progressed yet; no projection available".to_owned()],
            model_breakdown: Vec::new(),
        };
    }

    let rate = current.completed_points / current.time_progress;
    let predicted_points = rate.round().max(0.0);
    let completion = if current.total_points > 0.0 {
        (predicted_points / current.total_points * 100.0).min(100.0)
    } else {
        0.0
    };
    let completion_percentage = completion.round().max(0.0) as u32;

    PredictionRecord {
        current_points: current.completed_points,
        predicted_points,
        completion_percentage,
        confidence: SIMPLE_PROJECTION_CONFIDENCE,
        trend: VelocityTrend::Unknown,
        factors: vec!["No closed iterations on record; projecting from current pace".to_owned()],
        model_breakdown: vec![ModelContribution {
            name: "simple_projection".to_owned(),
            value: completion,
            weight: 1.0,
        }],
    }
}

fn is_well_formed(record: &PredictionRecord) -> bool {
    record.confidence.is_finite()
        && record.predicted_points.is_finite()
        && record.current_points.is_finite()
        && record.model_breakdown.iter().all(|c| c.value.is_finite())
}

/// Predict with the default configuration.
pub fn predict_velocity(
    current: &CurrentProgress,
    history: Option<&HistoricalVelocity>,
) -> PredictionRecord {
    VelocityPredictor::new(&EngineConfig::default()).predict(current, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IterationVelocity;
    use super::models::{ProjectionModel, WeightedModel};

    fn progress(
        total: f64,
        completed: f64,
        in_progress: f64,
        elapsed: i64,
        total_days: i64,
    ) -> CurrentProgress {
        let time_progress = if total_days > 0 {
            (elapsed as f64 / total_days as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        CurrentProgress {
            total_points: total,
            completed_points: completed,
            in_progress_points: in_progress,
            elapsed_days: elapsed,
            total_days,
            remaining_days: total_days - elapsed,
            time_progress,
        }
    }

    fn history(pairs: &[(f64, f64)]) -> HistoricalVelocity {
        HistoricalVelocity::new(
            pairs
                .iter()
                .map(|&(done, total)| IterationVelocity::new(done, total))
                .collect(),
        )
    }

    #[test]
    fn unstarted_iteration_without_history_is_unknown() {
        let record = predict_velocity(&progress(100.0, 0.0, 0.0, 0, 10), None);
        assert_eq!(record.predicted_points, 0.0);
        assert_eq!(record.completion_percentage, 0);
        assert!((record.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(record.trend, VelocityTrend::Unknown);
    }

    #[test]
    fn simple_projection_extrapolates_current_pace() {
        // 30 points done at 40% of the way through → 75 predicted
        let record = predict_velocity(&progress(100.0, 30.0, 10.0, 4, 10), None);
        assert_eq!(record.predicted_points, 75.0);
        assert_eq!(record.completion_percentage, 75);
        assert!((record.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(record.trend, VelocityTrend::Unknown);
        assert_eq!(record.model_breakdown.len(), 1);
    }

    #[test]
    fn simple_projection_caps_completion() {
        let record = predict_velocity(&progress(50.0, 45.0, 0.0, 5, 10), None);
        assert_eq!(record.predicted_points, 90.0);
        assert_eq!(record.completion_percentage, 100);
    }

    #[test]
    fn empty_history_takes_simple_branch() {
        let empty = HistoricalVelocity::default();
        let record = predict_velocity(&progress(100.0, 30.0, 0.0, 4, 10), Some(&empty));
        assert!((record.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(record.trend, VelocityTrend::Unknown);
    }

    #[test]
    fn ensemble_blends_four_models() {
        let hist = history(&[(30.0, 50.0), (40.0, 50.0), (45.0, 50.0)]);
        let record = predict_velocity(&progress(100.0, 40.0, 20.0, 5, 10), Some(&hist));

        // linear 80, historical 76.67 + 5, burn 80, in-progress 54 → 76.6
        assert_eq!(record.completion_percentage, 77);
        assert_eq!(record.predicted_points, 77.0);
        assert_eq!(record.model_breakdown.len(), 4);
        // variance ≈ 132.7 → no agreement bonus; 0.5 + 0.15 + 0.1
        assert!((record.confidence - 0.75).abs() < 1e-9, "{}", record.confidence);
        // actual 0.40 vs expected 0.383
        assert_eq!(record.trend, VelocityTrend::OnTrack);
        assert_eq!(
            record.factors,
            vec!["Team velocity has been improving over recent iterations".to_owned()]
        );
    }

    #[test]
    fn ahead_and_behind_follow_expected_progress() {
        let hist = history(&[(40.0, 50.0), (40.0, 50.0)]);
        let ahead = predict_velocity(&progress(100.0, 70.0, 0.0, 5, 10), Some(&hist));
        assert_eq!(ahead.trend, VelocityTrend::Ahead);
        assert!(ahead.factors.iter().any(|f| f.contains("ahead")));

        let behind = predict_velocity(&progress(100.0, 10.0, 0.0, 5, 10), Some(&hist));
        assert_eq!(behind.trend, VelocityTrend::Behind);
        assert!(behind.factors.iter().any(|f| f.contains("behind")));
    }

    #[test]
    fn factor_notes_keep_fixed_order() {
        let hist = history(&[(50.0, 50.0), (40.0, 50.0), (20.0, 50.0)]);
        let record = predict_velocity(&progress(100.0, 10.0, 40.0, 8, 10), Some(&hist));
        assert_eq!(record.factors.len(), 4, "{:?}", record.factors);
        assert!(record.factors[0].contains("declining"));
        assert!(record.factors[1].contains("behind"));
        assert!(record.factors[2].contains("in progress"));
        assert!(record.factors[3].contains("day(s) left"));
    }

    #[test]
    fn confidence_is_capped() {
        let hist = history(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        let record = predict_velocity(&progress(100.0, 100.0, 0.0, 10, 10), Some(&hist));
        assert!((record.confidence - MAX_CONFIDENCE).abs() < 1e-9);
    }

    /// Projection model that always reports the same completion.
    struct Fixed(f64);

    impl ProjectionModel for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn project(&self, _: &CurrentProgress, _: &HistorySummary) -> f64 {
            self.0
        }
    }

    fn fixed_predictor(config: &EngineConfig, outputs: &[f64]) -> VelocityPredictor {
        let weight = 1.0 / outputs.len() as f64;
        let models = outputs
            .iter()
            .map(|&value| WeightedModel {
                model: Box::new(Fixed(value)),
                weight,
            })
            .collect();
        VelocityPredictor::with_ensemble(config, Ensemble::new(models))
    }

    /// Two stable closed iterations at half time: 0.5 + 0.10 + 0.10 before
    /// any agreement bonus.
    fn confidence_for(outputs: &[f64]) -> f64 {
        let hist = history(&[(40.0, 50.0), (40.0, 50.0)]);
        fixed_predictor(&EngineConfig::default(), outputs)
            .predict(&progress(100.0, 40.0, 0.0, 5, 10), Some(&hist))
            .confidence
    }

    #[test]
    fn agreement_bonus_per_variance_band() {
        // variance 0: both bands
        assert!((confidence_for(&[60.0, 60.0]) - 0.9).abs() < 1e-9);
        // variance 64: loose band only
        assert!((confidence_for(&[42.0, 58.0]) - 0.8).abs() < 1e-9);
        // variance 400: neither
        assert!((confidence_for(&[30.0, 70.0]) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn variance_bands_are_strict() {
        // exactly 100: no bonus
        assert!((confidence_for(&[40.0, 60.0]) - 0.7).abs() < 1e-9);
        // exactly 50 (deviations -10, 5, 5): loose band only
        assert!((confidence_for(&[40.0, 55.0, 55.0]) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn variance_bands_follow_thresholds() {
        let config = EngineConfig {
            thresholds: Thresholds {
                variance_loose: 64.0,
                variance_tight: 10.0,
                ..Thresholds::default()
            },
            ..EngineConfig::default()
        };
        let hist = history(&[(40.0, 50.0), (40.0, 50.0)]);
        let record = fixed_predictor(&config, &[42.0, 58.0])
            .predict(&progress(100.0, 40.0, 0.0, 5, 10), Some(&hist));
        assert!((record.confidence - 0.7).abs() < 1e-9, "{}", record.confidence);
    }

    #[test]
    fn sample_bonus_stops_at_three_iterations() {
        let config = EngineConfig {
            lookback_sprints: 5,
            ..EngineConfig::default()
        };
        let hist = history(&[(40.0, 50.0); 5]);
        let record = fixed_predictor(&config, &[40.0, 60.0])
            .predict(&progress(100.0, 40.0, 0.0, 5, 10), Some(&hist));
        // 0.5 + 3 * 0.05 + 0.5 * 0.2, no agreement bonus
        assert!((record.confidence - 0.75).abs() < 1e-9, "{}", record.confidence);
    }

    #[test]
    fn predicted_points_use_unrounded_completion() {
        let hist = history(&[(40.0, 50.0), (40.0, 50.0)]);
        let record = fixed_predictor(&EngineConfig::default(), &[49.6])
            .predict(&progress(33.0, 10.0, 0.0, 5, 10), Some(&hist));
        assert_eq!(record.completion_percentage, 50);
        // 49.6% of 33 is 16.37
        assert_eq!(record.predicted_points, 16.0);
    }

    #[test]
    fn confidence_stays_in_bounds_for_degenerate_inputs() {
        let hist = history(&[(10.0, 20.0)]);
        let cases = [
            progress(0.0, 0.0, 0.0, 0, 0),
            progress(0.0, 5.0, 3.0, 3, 0),
            progress(100.0, 0.0, 0.0, -4, 10),
            progress(10.0, 500.0, 0.0, 1, 10),
        ];
        for current in &cases {
            for h in [None, Some(&hist)] {
                let record = predict_velocity(current, h);
                assert!(
                    (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&record.confidence),
                    "confidence={} for {:?}",
                    record.confidence,
                    current
                );
                assert!(record.completion_percentage <= 100);
            }
        }
    }

    #[test]
    fn only_lookback_window_is_used() {
        let config = EngineConfig {
            lookback_sprints: 1,
            ..EngineConfig::default()
        };
        let predictor = VelocityPredictor::new(&config);
        // Only the newest (10 of 10) counts: a single point has no slope.
        let hist = history(&[(0.0, 10.0), (5.0, 10.0), (10.0, 10.0)]);
        let record = predictor.predict(&progress(100.0, 50.0, 0.0, 5, 10), Some(&hist));
        let historical = record
            .model_breakdown
            .iter()
            .find(|c| c.name == "historical_rate")
            .expect("historical model present");
        assert!((historical.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_input_yields_fallback() {
        let hist = history(&[(10.0, 20.0)]);
        let record = predict_velocity(&progress(100.0, f64::INFINITY, 0.0, 5, 10), Some(&hist));
        assert_eq!(record, PredictionRecord::fallback());
    }

    #[test]
    fn typical_note_when_nothing_stands_out() {
        let hist = history(&[(40.0, 50.0), (40.0, 50.0)]);
        let record = predict_velocity(&progress(100.0, 40.0, 0.0, 5, 10), Some(&hist));
        assert_eq!(record.factors, vec![TYPICAL_PACE_NOTE.to_owned()]);
    }
}
