use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow bucket of a work item, as reported by the tracker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum StatusCategory {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl StatusCategory {
    /// Map a tracker status category key or name onto a bucket.
    /// Anything unrecognized lands in `Todo`.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "done" | "closed" | "resolved" | "complete" | "completed" => Self::Done,
            "inprogress" | "indeterminate" | "inreview" | "review" | "started" => {
                Self::InProgress
            }
            _ => Self::Todo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl From<String> for StatusCategory {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeRef {
    pub id: String,
    pub display_name: String,
}

/// Snapshot of one tracker issue inside the current iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    #[serde(default)]
    pub status_category: StatusCategory,
    #[serde(default)]
    pub effort_points: Option<f64>,
    #[serde(default)]
    pub assignee: Option<AssigneeRef>,
    pub last_updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Effort with missing, negative, and non-finite values read as zero.
    pub fn effort(&self) -> f64 {
        match self.effort_points {
            Some(points) if points.is_finite() && points > 0.0 => points,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationDescriptor {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub board_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoad {
    pub id: String,
    pub name: String,
    pub effort_points: f64,
    pub task_count: usize,
    pub load_percent: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamLoadSummary {
    pub members: Vec<MemberLoad>,
    pub average_load: u32,
    pub overloaded_count: usize,
    pub underutilized_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthTrend {
    Improving,
    Declining,
    Stable,
}

/// One health factor's contribution to the composite score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub score: u8,
    pub trend: HealthTrend,
    pub factors: Vec<FactorScore>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VelocityTrend {
    Ahead,
    Behind,
    OnTrack,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelContribution {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub current_points: f64,
    pub predicted_points: f64,
    pub completion_percentage: u32,
    pub confidence: f64,
    pub trend: VelocityTrend,
    pub factors: Vec<String>,
    pub model_breakdown: Vec<ModelContribution>,
}

impl PredictionRecord {
    /// Canned minimum-confidence prediction used when a forecast cannot be assembled.
    pub fn fallback() -> Self {
        Self {
            current_points: 0.0,
            predicted_points: 0.0,
            completion_percentage: 0,
            confidence: crate::config::MIN_CONFIDENCE,
            trend: VelocityTrend::Unknown,
            factors: vec!["Prediction unavailable; showing a neutral placeholder".to_owned()],
            model_breakdown: Vec::new(),
        }
    }
}

/// Progress figures of the running iteration, as the predictor sees them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProgress {
    pub total_points: f64,
    pub completed_points: f64,
    pub in_progress_points: f64,
    pub elapsed_days: i64,
    pub total_days: i64,
    pub remaining_days: i64,
    /// Elapsed share of the iteration in [0, 1].
    pub time_progress: f64,
}

/// Outcome of one closed iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IterationVelocity {
    #[serde(default)]
    pub iteration_id: Option<String>,
    pub completed_points: f64,
    pub total_points: f64,
}

impl IterationVelocity {
    pub fn new(completed_points: f64, total_points: f64) -> Self {
        Self {
            iteration_id: None,
            completed_points,
            total_points,
        }
    }

    /// Completed share of committed points, `None` when nothing was committed.
    pub fn completion_rate(&self) -> Option<f64> {
        if self.total_points > 0.0 && self.total_points.is_finite() {
            Some(self.completed_points.max(0.0) / self.total_points)
        } else {
            None
        }
    }
}

/// Closed iterations ordered oldest to newest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HistoricalVelocity {
    pub iterations: Vec<IterationVelocity>,
}

impl HistoricalVelocity {
    pub fn new(iterations: Vec<IterationVelocity>) -> Self {
        Self { iterations }
    }

    /// The newest `lookback` iterations, still oldest first.
    pub fn recent(&self, lookback: usize) -> &[IterationVelocity] {
        let skip = self.iterations.len().saturating_sub(lookback);
        &self.iterations[skip..]
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_map_to_buckets() {
        assert_eq!(StatusCategory::from_label("Done"), StatusCategory::Done);
        assert_eq!(StatusCategory::from_label("done"), StatusCategory::Done);
        assert_eq!(
            StatusCategory::from_label("In Progress"),
            StatusCategory::InProgress
        );
        assert_eq!(
            StatusCategory::from_label("indeterminate"),
            StatusCategory::InProgress
        );
        assert_eq!(
            StatusCategory::from_label("in_progress"),
            StatusCategory::InProgress
        );
        assert_eq!(StatusCategory::from_label("new"), StatusCategory::Todo);
    }

    #[test]
    fn unknown_status_defaults_to_todo() {
        assert_eq!(StatusCategory::from_label("Parked"), StatusCategory::Todo);
        assert_eq!(StatusCategory::from_label(""), StatusCategory::Todo);
    }

    #[test]
    fn deserialize_work_item_with_missing_fields() {
        let json = r#"{"id": "PAY-12", "lastUpdatedAt": "2026-03-02T10:00:00Z"}"#;
        let item: WorkItem = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(item.status_category, StatusCategory::Todo);
        assert!(item.effort_points.is_none());
        assert!(item.assignee.is_none());
        assert_eq!(item.effort(), 0.0);
    }

    #[test]
    fn deserialize_work_item_with_tracker_labels() {
        let json = r#"{
            "id": "PAY-13",
            "statusCategory": "In Progress",
            "effortPoints": 5,
            "assignee": {"id": "acc-1", "displayName": "Mia Krystof"},
            "lastUpdatedAt": "2026-03-02T10:00:00Z"
        }"#;
        let item: WorkItem = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(item.status_category, StatusCategory::InProgress);
        assert_eq!(item.effort(), 5.0);
        assert_eq!(item.assignee.map(|a| a.display_name).as_deref(), Some("Mia Krystof"));
    }

    #[test]
    fn negative_effort_reads_as_zero() {
        let item = WorkItem {
            id: "X-1".to_owned(),
            status_category: StatusCategory::Done,
            effort_points: Some(-3.0),
            assignee: None,
            last_updated_at: Utc::now(),
        };
        assert_eq!(item.effort(), 0.0);
    }

    #[test]
    fn recent_keeps_newest_entries() {
        let history = HistoricalVelocity::new(
            (1..=5)
                .map(|i| IterationVelocity::new(i as f64, 10.0))
                .collect(),
        );
        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].completed_points, 3.0);
        assert_eq!(recent[2].completed_points, 5.0);
        assert_eq!(history.recent(10).len(), 5);
    }

    #[test]
    fn completion_rate_ignores_empty_commitment() {
        assert_eq!(IterationVelocity::new(4.0, 0.0).completion_rate(), None);
        assert_eq!(IterationVelocity::new(5.0, 10.0).completion_rate(), Some(0.5));
    }

    #[test]
    fn trends_serialize_snake_case() {
        let json = serde_json::to_string(&VelocityTrend::OnTrack).expect("serialize");
        assert_eq!(json, "\"on_track\"");
        let json = serde_json::to_string(&HealthTrend::Improving).expect("serialize");
        assert_eq!(json, "\"improving\"");
    }
}
