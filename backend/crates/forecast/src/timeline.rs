use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::IterationDescriptor;

/// Day-granularity position of `now` inside an iteration.
///
/// `elapsed_days` and `remaining_days` are not clamped: negative elapsed means
/// the iteration has not started, negative remaining means it overran.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub total_days: i64,
    pub elapsed_days: i64,
    pub remaining_days: i64,
    /// Expected percent complete at `now`, clamped to [0, 100].
    pub ideal_progress: u32,
}

impl Timeline {
    pub fn compute(iteration: &IterationDescriptor, now: DateTime<Utc>) -> Self {
        let total_days = (iteration.end_date - iteration.start_date).num_days();
        let elapsed_days = (now - iteration.start_date).num_days();
        let remaining_days = (iteration.end_date - now).num_days();

        let ideal_progress = if total_days > 0 {
            (elapsed_days as f64 / total_days as f64 * 100.0)
                .round()
                .clamp(0.0, 100.0) as u32
        } else {
            0
        };

        Self {
            total_days,
            elapsed_days,
            remaining_days,
            ideal_progress,
        }
    }

    /// Zero-length or inverted range.
    pub fn is_malformed(&self) -> bool {
        self.total_days <= 0
    }

    /// Elapsed share of the iteration in [0, 1]; zero for malformed ranges.
    pub fn time_progress(&self) -> f64 {
        if self.is_malformed() {
            return 0.0;
        }
        (self.elapsed_days as f64 / self.total_days as f64).clamp(0.0, 1.0)
    }
}
