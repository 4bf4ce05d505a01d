use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cadence_forecast::{
    HealthRecord, IterationDescriptor, IterationVelocity, MetricsSnapshot, PredictionRecord,
    RiskFlag, WorkItem,
};

/// Everything computed for one iteration in one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationReport {
    pub id: Uuid,
    pub board_id: String,
    pub iteration_id: String,
    pub computed_at: DateTime<Utc>,
    pub snapshot: MetricsSnapshot,
    pub health: HealthRecord,
    pub prediction: PredictionRecord,
    pub risks: Vec<RiskFlag>,
}

/// The running iteration and its work items, as fetched from the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentIteration {
    pub iteration: IterationDescriptor,
    pub items: Vec<WorkItem>,
}

/// On-disk iteration export: the running iteration plus closed-iteration history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationBundle {
    pub iteration: IterationDescriptor,
    #[serde(default)]
    pub items: Vec<WorkItem>,
    #[serde(default)]
    pub history: Vec<IterationVelocity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_bundle_deserializes() {
        let raw = include_str!("../../fixtures/iteration.json");
        let bundle: IterationBundle = serde_json::from_str(raw).expect("should deserialize");
        assert_eq!(bundle.iteration.board_id, "PAY");
        assert_eq!(bundle.items.len(), 6);
        assert_eq!(bundle.history.len(), 3);
        assert!(bundle.items[5].effort_points.is_none());
    }

    #[test]
    fn minimal_bundle_defaults_collections() {
        let raw = r#"{"iteration": {
            "id": "s1",
            "startDate": "2026-01-05T00:00:00Z",
            "endDate": "2026-01-19T00:00:00Z",
            "boardId": "OPS"
        }}"#;
        let bundle: IterationBundle = serde_json::from_str(raw).expect("should deserialize");
        assert!(bundle.items.is_empty());
        assert!(bundle.history.is_empty());
    }
}
