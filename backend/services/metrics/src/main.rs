mod iteration;

use cadence_config::{init_tracing, AppConfig};

use crate::iteration::service::IterationService;
use crate::iteration::sources::FileIterationSource;
use crate::iteration::store::InMemoryHealthStore;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "cadence-metrics", "starting");

    let Some(path) = config.iteration_fixture.clone() else {
        tracing::info!("ITERATION_FIXTURE not set, nothing to evaluate");
        return;
    };

    let source = match FileIterationSource::load(&path).await {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "failed to load iteration source");
            std::process::exit(1);
        }
    };
    let board_id = source.board_id().to_owned();

    let service = IterationService::new(
        source,
        InMemoryHealthStore::new(),
        iteration::engine_config(&config),
    );

    match service.evaluate(&board_id).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize report");
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!(board = %board_id, error = %e, "iteration evaluation failed");
            std::process::exit(1);
        }
    }

    tracing::info!("shutting down");
}
