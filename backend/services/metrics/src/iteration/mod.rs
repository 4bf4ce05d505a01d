pub mod models;
pub mod service;
pub mod sources;
pub mod store;

use cadence_config::AppConfig;
use cadence_forecast::EngineConfig;

/// Engine options taken from the service configuration; tables stay at defaults.
pub fn engine_config(app: &AppConfig) -> EngineConfig {
    EngineConfig {
        stuck_task_days: app.stuck_task_days,
        lookback_sprints: app.lookback_sprints,
        standard_capacity_points: app.standard_capacity_points,
        ..EngineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_copies_recognized_options() {
        let app = AppConfig {
            log_level: "debug".to_owned(),
            stuck_task_days: 5,
            lookback_sprints: 4,
            standard_capacity_points: 30.0,
            iteration_fixture: None,
        };
        let cfg = engine_config(&app);
        assert_eq!(cfg.stuck_task_days, 5);
        assert_eq!(cfg.lookback_sprints, 4);
        assert!((cfg.standard_capacity_points - 30.0).abs() < f64::EPSILON);
        assert_eq!(cfg.thresholds.health_trend_delta, 5);
    }
}
