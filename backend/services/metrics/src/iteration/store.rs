use std::sync::Mutex;

use async_trait::async_trait;

use cadence_common::error::{CadenceError, CadenceResult};

use super::models::IterationReport;

/// Persistence for computed reports; the source of prior health scores.
#[async_trait]
pub trait HealthStore: Send + Sync {
    async fn latest_score(&self, iteration_id: &str) -> CadenceResult<Option<u8>>;
    async fn save(&self, report: IterationReport) -> CadenceResult<IterationReport>;
}

/// Process-local store, newest report last.
#[derive(Default)]
pub struct InMemoryHealthStore {
    reports: Mutex<Vec<IterationReport>>,
}

impl InMemoryHealthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
    async fn latest_score(&self, iteration_id: &str) -> CadenceResult<Option<u8>> {
        let reports = self
            .reports
            .lock()
            .map_err(|_| CadenceError::Internal("health store lock poisoned".to_owned()))?;
        Ok(reports
            .iter()
            .rev()
            .find(|r| r.iteration_id == iteration_id)
            .map(|r| r.health.score))
    }

    async fn save(&self, report: IterationReport) -> CadenceResult<IterationReport> {
        self.reports
            .lock()
            .map_err(|_| CadenceError::Internal("health store lock poisoned".to_owned()))?
            .push(report.clone());
        Ok(report)
    }
}
