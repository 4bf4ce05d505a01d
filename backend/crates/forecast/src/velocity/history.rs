use serde::{Deserialize, Serialize};

use crate::models::IterationVelocity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoricalTrend {
    Improving,
    Declining,
    Stable,
}

/// What the predictor needs to know about closed iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub sample_count: usize,
    pub average_completion_rate: f64,
    pub slope: f64,
    pub trend: HistoricalTrend,
}

/// Ordinary least-squares slope of `values` against their index.
///
/// Low-confidence with two or three points; kept as-is for comparability
/// with previously stored forecasts. Returns 0 when fewer than two points.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = values.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (i, &y)| {
            let x = i as f64;
            (sx + x, sy + y, sxy + x * y, sxx + x * x)
        },
    );
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

pub fn classify_slope(slope: f64, threshold: f64) -> HistoricalTrend {
    if slope > threshold {
        HistoricalTrend::Improving
    } else if slope < -threshold {
        HistoricalTrend::Declining
    } else {
        HistoricalTrend::Stable
    }
}

/// Summarize closed iterations, oldest first.
///
/// Iterations with nothing committed do not count toward the completion rate.
/// Returns `None` when no iteration is usable.
pub fn summarize(iterations: &[IterationVelocity], slope_threshold: f64) -> Option<HistorySummary> {
    let rates: Vec<f64> = iterations
        .iter()
        .filter_map(IterationVelocity::completion_rate)
        .collect();
    if rates.is_empty() {
        return None;
    }

    let average_completion_rate = rates.iter().sum::<f64>() / rates.len() as f64;
    let completed: Vec<f64> = iterations
        .iter()
        .map(|it| it.completed_points.max(0.0))
        .collect();
    let slope = regression_slope(&completed);

    Some(HistorySummary {
        sample_count: rates.len(),
        average_completion_rate,
        slope,
        trend: classify_slope(slope, slope_threshold),
    })
}
