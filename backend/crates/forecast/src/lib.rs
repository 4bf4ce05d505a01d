//! Iteration health scoring and velocity forecasting.
//!
//! Pure functions over already-fetched tracker data. Nothing here performs
//! I/O or reads the environment; callers own configuration and storage.

pub mod aggregate;
pub mod config;
pub mod health;
pub mod models;
pub mod risk;
pub mod snapshot;
pub mod timeline;
pub mod velocity;

pub use config::EngineConfig;
pub use health::history::{HistoricalFactorProvider, NeutralHistory};
pub use health::{compute_health, HealthScorer};
pub use models::{
    AssigneeRef, CurrentProgress, HealthRecord, HealthTrend, HistoricalVelocity,
    IterationDescriptor, IterationVelocity, PredictionRecord, StatusCategory, VelocityTrend,
    WorkItem,
};
pub use risk::{assess_risks, RiskFlag};
pub use snapshot::MetricsSnapshot;
pub use timeline::Timeline;
pub use velocity::{predict_velocity, VelocityPredictor};
