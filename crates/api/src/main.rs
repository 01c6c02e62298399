use std::sync::Arc;

use anyhow::Context;

use bankledger_api::app::{build_app, AppServices};
use bankledger_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    bankledger_observability::init(config.log_format);

    if config.seed_accounts {
        tracing::warn!("seeding bootstrap accounts alice/bob; disable with BANKLEDGER_SEED_ACCOUNTS=false");
    }
    let services = AppServices::in_memory(config.seed_accounts)
        .context("failed to initialize ledger")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
