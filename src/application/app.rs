use crate::config::Settings;
use crate::proxy::{ProxyConfig, ProxyService};
use crate::{Error, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
}

impl Application {
    #[instrument]
    pub async fn new() -> Result<Self> {
        let settings = Settings::new()?;
        Ok(Self::with_settings(settings))
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Proxy router with the full middleware stack
    pub fn router(&self) -> Result<Router> {
        let config = ProxyConfig::from(&self.settings.proxy);
        Ok(ProxyService::new(config)?.into_router())
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let address = self.settings.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| Error::application(format!("failed to bind {address}: {e}")))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.router()?;
        info!(
            address = %listener.local_addr()?,
            environment = %self.settings.application.environment,
            trusted_domain_suffix = %self.settings.proxy.trusted_domain_suffix,
            "Starting kv_chunk_sync proxy"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config_types::{Host, Port};

    #[tokio::test]
    async fn test_application_can_be_created() {
        let app = Application::new().await.expect("Failed to create application");
        assert!(*app.settings().application.port.as_ref() > 0);
    }

    #[tokio::test]
    async fn test_served_router_answers_health() {
        let app = Application::new().await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(app.serve(listener));

        let body = reqwest::get(format!("http://{address}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body, "OK");
        server.abort();
    }

    #[tokio::test]
    async fn test_run_reports_bind_failure() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let mut settings = Settings::new().unwrap();
        settings.application.host = Host::try_new("127.0.0.1".to_string()).unwrap();
        settings.application.port = Port::try_new(port).unwrap();

        let error = Application::with_settings(settings).run().await.unwrap_err();

        match error {
            Error::Application { message } => {
                assert!(message.starts_with(&format!("failed to bind 127.0.0.1:{port}")));
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }
}
