use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use launch_dashboard::{config::DashboardConfig, server, DashboardContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("launch_dashboard=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = DashboardConfig::from_env().context("failed to read configuration")?;
    let ctx = DashboardContext::load(&cfg).with_context(|| {
        format!(
            "failed to load {} / {}",
            cfg.data_path.display(),
            cfg.model_path.display()
        )
    })?;

    let app = server::router(Arc::new(ctx));

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    tracing::info!("listening on http://{}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
