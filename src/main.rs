//! Duka - Kenyan Toy Shop Backend

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duka::config::Config;
use duka::http::{self, AppState};
use duka::notify::{Notifier, NullNotifier, SmtpNotifier};
use duka::seed;
use duka::store::{DocumentStore, MemoryStore, PgStore};
use duka::workflow::OrderWorkflow;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(MemoryStore::default())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::new(smtp, config.shop.clone())?),
        None => {
            tracing::warn!("SMTP not configured, order emails are disabled");
            Arc::new(NullNotifier)
        }
    };

    if config.seed_zones_on_start {
        let report = seed::seed_delivery_zones(store.as_ref()).await?;
        tracing::info!("{}", report.summary());
    }

    let state = AppState {
        store: Arc::clone(&store),
        workflow: OrderWorkflow::new(store, notifier),
    };
    let app = http::router(state, http::cors_layer(&config.cors_origins));

    tracing::info!("🚀 Duka backend listening on 0.0.0.0:{}", config.port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?,
        app,
    )
    .await?;
    Ok(())
}
