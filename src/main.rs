use anyhow::Result;
use kv_chunk_sync::config::Settings;
use kv_chunk_sync::Application;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting kv_chunk_sync");

    Application::with_settings(settings).run().await?;

    Ok(())
}
