//! Runtime composition.
//!
//! The composer turns a normalized config into one handle: demo mode
//! wires the tier chain, the initialized repository, the mock auth
//! provider, and the mock router; every other mode wires the HTTP
//! pass-through client and the stub auth provider with no persistence.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::auth::{AuthProvider, MockAuthProvider, RealAuthProvider};
use crate::config::{AppMode, RuntimeConfig};
use crate::demo::repository::DemoRepository;
use crate::error::RuntimeError;
use crate::http::HttpApiClient;
use crate::persistence::TierChain;
use crate::router::MockApiClient;

/// The capability the presentation layer consumes. Implemented by the
/// mock router in demo mode and the HTTP client elsewhere.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, RuntimeError>;

    async fn post(&self, path: &str, body: Value) -> Result<Value, RuntimeError>;
}

pub struct Runtime {
    config: RuntimeConfig,
    api: Arc<dyn ApiClient>,
    auth: Arc<dyn AuthProvider>,
    repository: Option<Arc<DemoRepository>>,
}

impl Runtime {
    /// Compose a runtime from the process environment.
    pub async fn from_env() -> Result<Self, RuntimeError> {
        Self::create(RuntimeConfig::from_env()).await
    }

    pub async fn create(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.enforce_demo_safety()?;

        if config.app_mode == AppMode::Demo {
            info!(
                namespace = %config.demo_namespace,
                state_dir = %config.state_dir.display(),
                "composing demo runtime"
            );
            let chain = Arc::new(TierChain::standard(&config.state_dir, &config.demo_namespace));
            let repository = Arc::new(DemoRepository::new(chain));
            repository.init().await;

            let auth: Arc<dyn AuthProvider> =
                Arc::new(MockAuthProvider::new(repository.clone(), config.app_mode));
            let api = Arc::new(MockApiClient::new(
                repository.clone(),
                auth.clone(),
                config.app_mode,
            ));
            return Ok(Self {
                config,
                api,
                auth,
                repository: Some(repository),
            });
        }

        info!(mode = %config.app_mode, base_url = %config.api_base_url, "composing live runtime");
        Ok(Self {
            api: Arc::new(HttpApiClient::new(&config.api_base_url)),
            auth: Arc::new(RealAuthProvider),
            repository: None,
            config,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn ApiClient> {
        &self.api
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    /// The demo repository handle; `None` outside demo mode.
    pub fn repository(&self) -> Option<&Arc<DemoRepository>> {
        self.repository.as_ref()
    }
}
