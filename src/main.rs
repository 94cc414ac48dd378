use thiserror::Error;
use tracing_subscriber::EnvFilter;

use postwars::config;
use postwars::prelude::*;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Env(#[from] config::EnvErr),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

type Result<T> = core::result::Result<T, RunnerErr>;

/// One company-wide achievement sweep. Scheduling and retries belong to the
/// surrounding job runner; this binary is a single pass.
#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::config().await?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_filter))
        .init();
    tracing::info!("starting achievement sweep");

    let store = PgStore::connect(&cfg.database_url).await?;
    let evaluator = AchievementEvaluator::new(&store);

    let users = store.all_users().await?;
    tracing::info!(user_count = users.len(), "evaluating achievement catalog");

    let mut granted = 0usize;
    let mut failed = 0usize;
    for chunk in users.chunks(MAX_BATCH_USERS) {
        let ids: Vec<UserId> = chunk.iter().map(|u| u.id.clone()).collect();
        let report = evaluator.check_and_award_batch(&ids).await?;

        for entry in report {
            if let Ok(line) = serde_json::to_string(&entry) {
                tracing::debug!(%line, "batch entry");
            }

            match entry.outcome {
                BatchOutcome::Granted(ids) if !ids.is_empty() => {
                    granted += ids.len();
                    tracing::info!(user = %entry.user_id, achievements = ?ids, "granted");
                }
                BatchOutcome::Granted(_) => {}
                BatchOutcome::Failed(message) => {
                    failed += 1;
                    tracing::error!(user = %entry.user_id, message, "evaluation failed");
                }
            }
        }
    }

    tracing::info!(granted, failed, "sweep complete");
    Ok(())
}
