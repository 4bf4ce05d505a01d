//! Reduces a work-item collection into status, effort, and team-load summaries.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{MemberLoad, StatusCategory, TeamLoadSummary, WorkItem};

/// Load (percent of capacity) above which a member counts as overloaded.
pub const OVERLOADED_LOAD_PERCENT: u32 = 100;
/// Load (percent of capacity) below which a member counts as underutilized.
pub const UNDERUTILIZED_LOAD_PERCENT: u32 = 50;

/// Item counts and effort sums per status bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBreakdown {
    pub todo_count: usize,
    pub in_progress_count: usize,
    pub done_count: usize,
    pub todo_points: f64,
    pub in_progress_points: f64,
    pub completed_points: f64,
}

impl StatusBreakdown {
    pub fn total_items(&self) -> usize {
        self.todo_count + self.in_progress_count + self.done_count
    }

    pub fn total_points(&self) -> f64 {
        self.todo_points + self.in_progress_points + self.completed_points
    }
}

pub fn status_breakdown(items: &[WorkItem]) -> StatusBreakdown {
    items
        .iter()
        .fold(StatusBreakdown::default(), |mut acc, item| {
            let points = item.effort();
            match item.status_category {
                StatusCategory::Done => {
                    acc.done_count += 1;
                    acc.completed_points += points;
                }
                StatusCategory::InProgress => {
                    acc.in_progress_count += 1;
                    acc.in_progress_points += points;
                }
                StatusCategory::Todo => {
                    acc.todo_count += 1;
                    acc.todo_points += points;
                }
            }
            acc
        })
}

/// `round(points / capacity * 100)`, never negative.
pub fn load_percent(effort_points: f64, capacity_points: f64) -> u32 {
    if capacity_points <= 0.0 || !effort_points.is_finite() || effort_points <= 0.0 {
        return 0;
    }
    (effort_points / capacity_points * 100.0).round() as u32
}

/// Group assigned items per member and rank them by load, heaviest first.
///
/// Unassigned items are skipped. Ties keep the order in which members were
/// first encountered.
pub fn team_load(items: &[WorkItem], capacity_points: f64) -> TeamLoadSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut members: Vec<MemberLoad> = Vec::new();

    for item in items {
        let Some(assignee) = &item.assignee else {
            continue;
        };
        let slot = *index.entry(assignee.id.as_str()).or_insert_with(|| {
            members.push(MemberLoad {
                id: assignee.id.clone(),
                name: assignee.display_name.clone(),
                effort_points: 0.0,
                task_count: 0,
                load_percent: 0,
            });
            members.len() - 1
        });
        let member = &mut members[slot];
        member.effort_points += item.effort();
        member.task_count += 1;
    }

    for member in &mut members {
        member.load_percent = load_percent(member.effort_points, capacity_points);
    }
    members.sort_by(|a, b| b.load_percent.cmp(&a.load_percent));

    let average_load = if members.is_empty() {
        0
    } else {
        let sum: u64 = members.iter().map(|m| u64::from(m.load_percent)).sum();
        (sum as f64 / members.len() as f64).round() as u32
    };
    let overloaded_count = members
        .iter()
        .filter(|m| m.load_percent > OVERLOADED_LOAD_PERCENT)
        .count();
    let underutilized_count = members
        .iter()
        .filter(|m| m.load_percent < UNDERUTILIZED_LOAD_PERCENT)
        .count();

    TeamLoadSummary {
        members,
        average_load,
        overloaded_count,
        underutilized_count,
    }
}

/// In-progress items with no update for at least `stuck_days`.
///
/// A threshold too large for a [`Duration`] matches nothing.
pub fn stuck_items<'a>(
    items: &'a [WorkItem],
    now: DateTime<Utc>,
    stuck_days: i64,
) -> impl Iterator<Item = &'a WorkItem> {
    let threshold = Duration::try_days(stuck_days);
    items.iter().filter(move |item| {
        item.status_category == StatusCategory::InProgress
            && threshold.is_some_and(|t| now - item.last_updated_at >= t)
    })
}

pub fn blocked_count(items: &[WorkItem], now: DateTime<Utc>, stuck_days: i64) -> usize {
    stuck_items(items, now, stuck_days).count()
}
