//! Human-facing risk flags derived from a scored, forecast iteration.

use serde::{Deserialize, Serialize};

use crate::aggregate::OVERLOADED_LOAD_PERCENT;
use crate::models::{HealthRecord, PredictionRecord, VelocityTrend};
use crate::snapshot::MetricsSnapshot;

pub const HEALTH_HIGH_RISK_BELOW: u8 = 50;
pub const HEALTH_MEDIUM_RISK_BELOW: u8 = 70;
pub const BEHIND_HIGH_RISK_COMPLETION_BELOW: u32 = 50;
pub const STUCK_HIGH_RISK_COUNT: usize = 3;
pub const SEVERE_OVERLOAD_PERCENT: u32 = 150;
pub const DEADLINE_WINDOW_DAYS: i64 = 2;
pub const DEADLINE_PROGRESS_BELOW: u32 = 80;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    LowHealth,
    BehindSchedule,
    StuckItems,
    OverloadedMembers,
    DeadlinePressure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskFlag {
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
}

/// Flags ordered by severity, highest first. Empty for a healthy iteration.
pub fn assess_risks(
    snapshot: &MetricsSnapshot,
    health: &HealthRecord,
    prediction: &PredictionRecord,
) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    if health.score < HEALTH_MEDIUM_RISK_BELOW {
        let severity = if health.score < HEALTH_HIGH_RISK_BELOW {
            Severity::High
        } else {
            Severity::Medium
        };
        flags.push(RiskFlag {
            kind: RiskKind::LowHealth,
            severity,
            message: format!("Iteration health is {} of 100", health.score),
        });
    }

    if prediction.trend == VelocityTrend::Behind {
        let severity = if prediction.completion_percentage < BEHIND_HIGH_RISK_COMPLETION_BELOW {
            Severity::High
        } else {
            Severity::Medium
        };
        flags.push(RiskFlag {
            kind: RiskKind::BehindSchedule,
            severity,
            message: format!(
                "Forecast completion is {}% and trailing the usual pace",
                prediction.completion_percentage
            ),
        });
    }

    if snapshot.blocked_count > 0 {
        let severity = if snapshot.blocked_count >= STUCK_HIGH_RISK_COUNT {
            Severity::High
        } else {
            Severity::Medium
        };
        flags.push(RiskFlag {
            kind: RiskKind::StuckItems,
            severity,
            message: format!(
                "{} item(s) in progress without recent updates",
                snapshot.blocked_count
            ),
        });
    }

    let overloaded: Vec<&str> = snapshot
        .team_load
        .members
        .iter()
        .filter(|m| m.load_percent > OVERLOADED_LOAD_PERCENT)
        .map(|m| m.name.as_str())
        .collect();
    if !overloaded.is_empty() {
        let severe = snapshot
            .team_load
            .members
            .iter()
            .any(|m| m.load_percent >= SEVERE_OVERLOAD_PERCENT);
        flags.push(RiskFlag {
            kind: RiskKind::OverloadedMembers,
            severity: if severe { Severity::High } else { Severity::Medium },
            message: format!("Over capacity: {}", overloaded.join(", ")),
        });
    }

    let remaining = snapshot.timeline.remaining_days;
    if (0..=DEADLINE_WINDOW_DAYS).contains(&remaining)
        && snapshot.progress_pct < DEADLINE_PROGRESS_BELOW
    {
        flags.push(RiskFlag {
            kind: RiskKind::DeadlinePressure,
            severity: Severity::High,
            message: format!(
                "{remaining} day(s) left with {}% of points done",
                snapshot.progress_pct
            ),
        });
    }

    flags.sort_by(|a, b| b.severity.cmp(&a.severity));
    flags
}
