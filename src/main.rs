use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use api::{AppConfig, ApplicationServer, Logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards have to live as long as main or the file writer and sentry stop flushing
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    info!(
        "logger ready, proxying tmdb at {} and moviebox at {}",
        config.tmdb_base_url, config.moviebox_base_url
    );

    if config.tmdb_api_key.is_empty() {
        tracing::warn!("TMDB_API_KEY is empty, every /api/tmdb call will be rejected upstream");
    }

    ApplicationServer::serve(config)
        .await
        .context("the api refused to serve")?;

    Ok(())
}
