use std::sync::Arc;
use std::time::Duration;

use autobiz_agent::checkout::SimulatedCheckout;
use autobiz_agent::conversation::SessionStore;
use autobiz_agent::llm::client_from_config;
use autobiz_agent::runtime::ConsultantRuntime;
use autobiz_core::accounts::UserDirectory;
use autobiz_core::catalog::{Catalog, CatalogError, CatalogStore};
use autobiz_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::info;

use crate::api::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("consultant setup failed: {0}")]
    Consultant(String),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Catalog::load_or_builtin(config.catalog.path.as_deref())?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        templates = catalog.len(),
        source = if config.catalog.path.is_some() { "file" } else { "builtin" },
        "template catalog loaded"
    );
    let catalog = Arc::new(CatalogStore::new(catalog));

    let llm = client_from_config(&config)
        .map_err(|error| BootstrapError::Consultant(error.to_string()))?;
    let consultant = ConsultantRuntime::new(catalog.clone(), llm)
        .map_err(|error| BootstrapError::Consultant(error.to_string()))?
        .with_temperature(config.llm.temperature);
    info!(
        event_name = "system.bootstrap.consultant_ready",
        correlation_id = "bootstrap",
        provider = consultant.llm_name(),
        model = %config.llm.model,
        "consultant runtime initialized"
    );

    let checkout = SimulatedCheckout::new(
        catalog.clone(),
        Duration::from_millis(config.checkout.confirmation_delay_ms),
    );

    let state = AppState {
        catalog,
        users: Arc::new(UserDirectory::with_demo_user()),
        sessions: Arc::new(SessionStore::new()),
        consultant: Arc::new(consultant),
        checkout: Arc::new(checkout),
    };

    Ok(Application { config, state })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use autobiz_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use tempfile::TempDir;

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    async fn bootstrap(catalog_path: Option<PathBuf>) -> Result<Application, BootstrapError> {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { catalog_path, ..ConfigOverrides::default() },
            ..LoadOptions::default()
        })?;
        bootstrap_with_config(config).await
    }

    #[tokio::test]
    async fn bootstrap_with_defaults_serves_builtin_catalog() {
        let app = bootstrap(None).await.expect("bootstrap should succeed");

        assert_eq!(app.state.catalog.snapshot().len(), 8);
        assert_eq!(app.state.users.len(), 1, "demo account should be seeded");
        assert_eq!(app.state.consultant.llm_name(), "offline");
        assert_eq!(app.config.server.port, 8080);
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_unreadable_catalog() {
        let result = bootstrap(Some(PathBuf::from("/definitely/not/here/catalog.json"))).await;

        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }

    #[tokio::test]
    async fn bootstrap_rejects_catalog_with_duplicate_ids() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("catalog.json");
        let entry = r#"{"id":"dup","name":"Dup","description":"d","category":"crm","industry":["any"],
            "businessSize":"small","complexity":"basic","estimatedROI":200,
            "implementationTime":"1 week","price":100}"#;
        fs::write(&path, format!("[{entry},{entry}]")).expect("write catalog");

        let result = bootstrap(Some(path)).await;

        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        assert!(message.contains("dup"), "got {message}");
    }
}
