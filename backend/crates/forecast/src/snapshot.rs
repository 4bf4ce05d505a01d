use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{blocked_count, status_breakdown, team_load};
use crate::config::EngineConfig;
use crate::models::{CurrentProgress, IterationDescriptor, TeamLoadSummary, WorkItem};
use crate::timeline::Timeline;

/// Aggregated view of one iteration at a single instant. Input to the health scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub iteration_id: String,
    pub board_id: String,
    pub captured_at: DateTime<Utc>,
    pub total_items: usize,
    pub todo_count: usize,
    pub in_progress_count: usize,
    pub done_count: usize,
    pub total_points: f64,
    pub completed_points: f64,
    pub in_progress_points: f64,
    pub todo_points: f64,
    pub remaining_points: f64,
    /// Completed share of total points, percent in [0, 100].
    pub progress_pct: u32,
    pub blocked_count: usize,
    pub team_load: TeamLoadSummary,
    pub timeline: Timeline,
}

impl MetricsSnapshot {
    /// Run the aggregator and the time model against the same `now`.
    pub fn build(
        iteration: &IterationDescriptor,
        items: &[WorkItem],
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Self {
        let breakdown = status_breakdown(items);
        let total_points = breakdown.total_points();
        let completed_points = breakdown.completed_points;

        let progress_pct = if total_points > 0.0 {
            (completed_points / total_points * 100.0)
                .round()
                .clamp(0.0, 100.0) as u32
        } else {
            0
        };

        Self {
            iteration_id: iteration.id.clone(),
            board_id: iteration.board_id.clone(),
            captured_at: now,
            total_items: breakdown.total_items(),
            todo_count: breakdown.todo_count,
            in_progress_count: breakdown.in_progress_count,
            done_count: breakdown.done_count,
            total_points,
            completed_points,
            in_progress_points: breakdown.in_progress_points,
            todo_points: breakdown.todo_points,
            remaining_points: total_points - completed_points,
            progress_pct,
            blocked_count: blocked_count(items, now, config.stuck_task_days),
            team_load: team_load(items, config.standard_capacity_points),
            timeline: Timeline::compute(iteration, now),
        }
    }

    pub fn current_progress(&self) -> CurrentProgress {
        CurrentProgress {
            total_points: self.total_points,
            completed_points: self.completed_points,
            in_progress_points: self.in_progress_points,
            elapsed_days: self.timeline.elapsed_days,
            total_days: self.timeline.total_days,
            remaining_days: self.timeline.remaining_days,
            time_progress: self.timeline.time_progress(),
        }
    }
}
