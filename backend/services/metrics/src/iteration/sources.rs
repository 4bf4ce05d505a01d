use std::path::{Path, PathBuf};

use async_trait::async_trait;

use cadence_common::error::{CadenceError, CadenceResult};
use cadence_forecast::HistoricalVelocity;

use super::models::{CurrentIteration, IterationBundle};

/// Read side of the issue tracker, already normalized into work items.
#[async_trait]
pub trait IterationSource: Send + Sync {
    async fn current_iteration(&self, board_id: &str) -> CadenceResult<CurrentIteration>;

    /// Up to `limit` closed iterations, oldest first.
    async fn closed_iterations(
        &self,
        board_id: &str,
        limit: usize,
    ) -> CadenceResult<HistoricalVelocity>;
}

/// Serves a single board from a JSON export on disk.
pub struct FileIterationSource {
    path: PathBuf,
    bundle: IterationBundle,
}

impl FileIterationSource {
    pub async fn load(path: impl AsRef<Path>) -> CadenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CadenceError::Source(format!("reading {}: {e}", path.display())))?;
        let bundle: IterationBundle = serde_json::from_str(&raw)
            .map_err(|e| CadenceError::Source(format!("parsing {}: {e}", path.display())))?;

        tracing::info!(
            path = %path.display(),
            board = %bundle.iteration.board_id,
            items = bundle.items.len(),
            history = bundle.history.len(),
            "loaded iteration bundle"
        );
        Ok(Self { path, bundle })
    }

    pub fn board_id(&self) -> &str {
        &self.bundle.iteration.board_id
    }

    fn ensure_board(&self, board_id: &str) -> CadenceResult<()> {
        if board_id == self.board_id() {
            Ok(())
        } else {
            Err(CadenceError::NotFound(format!(
                "board {board_id} is not in {}",
                self.path.display()
            )))
        }
    }
}

#[async_trait]
impl IterationSource for FileIterationSource {
    async fn current_iteration(&self, board_id: &str) -> CadenceResult<CurrentIteration> {
        self.ensure_board(board_id)?;
        Ok(CurrentIteration {
            iteration: self.bundle.iteration.clone(),
            items: self.bundle.items.clone(),
        })
    }

    async fn closed_iterations(
        &self,
        board_id: &str,
        limit: usize,
    ) -> CadenceResult<HistoricalVelocity> {
        self.ensure_board(board_id)?;
        let skip = self.bundle.history.len().saturating_sub(limit);
        Ok(HistoricalVelocity::new(self.bundle.history[skip..].to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/iteration.json")
    }

    #[tokio::test]
    async fn loads_fixture_bundle() {
        let source = FileIterationSource::load(fixture_path())
            .await
            .expect("fixture should load");
        assert_eq!(source.board_id(), "PAY");

        let current = source.current_iteration("PAY").await.expect("current");
        assert_eq!(current.iteration.id, "sprint-42");
        assert_eq!(current.items.len(), 6);
    }

    #[tokio::test]
    async fn closed_iterations_respects_limit() {
        let source = FileIterationSource::load(fixture_path())
            .await
            .expect("fixture should load");
        let history = source.closed_iterations("PAY", 2).await.expect("history");
        assert_eq!(history.iterations.len(), 2);
        assert_eq!(
            history.iterations[1].iteration_id.as_deref(),
            Some("sprint-41")
        );
    }

    #[tokio::test]
    async fn unknown_board_is_not_found() {
        let source = FileIterationSource::load(fixture_path())
            .await
            .expect("fixture should load");
        let result = source.current_iteration("OPS").await;
        assert!(matches!(result, Err(CadenceError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_file_is_source_error() {
        let result = FileIterationSource::load("/nonexistent/cadence/iteration.json").await;
        assert!(matches!(result, Err(CadenceError::Source(_))));
    }
}
