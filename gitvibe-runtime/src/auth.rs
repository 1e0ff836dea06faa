//! Auth status providers.
//!
//! One capability, two fixed variants chosen at composition time: the
//! mock provider reports the demo session's identity, the real provider
//! reports an unauthenticated placeholder (actual authentication lives
//! in the live backend, outside this runtime).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppMode;
use crate::demo::repository::DemoRepository;
use crate::error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub mode: String,
    pub app_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_app_ready: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbac_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_protection_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_rotation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn auth_status(&self) -> Result<AuthStatus, RuntimeError>;
}

/// Demo-mode provider: always authenticated as the namespace's single
/// lazily-created session.
pub struct MockAuthProvider {
    repository: Arc<DemoRepository>,
    app_mode: AppMode,
}

impl MockAuthProvider {
    pub fn new(repository: Arc<DemoRepository>, app_mode: AppMode) -> Self {
        Self {
            repository,
            app_mode,
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn auth_status(&self) -> Result<AuthStatus, RuntimeError> {
        let session = self.repository.get_or_create_session().await?;
        Ok(AuthStatus {
            authenticated: true,
            mode: "demo".to_string(),
            app_mode: self.app_mode.as_str().to_string(),
            github_app_ready: Some(false),
            rbac_enabled: Some(false),
            csrf_protection_enabled: Some(false),
            token_rotation_enabled: Some(false),
            ai_provider: Some("mock-ai".to_string()),
            user: Some(session.user),
            role: Some(session.role),
        })
    }
}

/// Live-mode stub: the backend owns authentication, this handle only
/// reports the placeholder.
pub struct RealAuthProvider;

#[async_trait]
impl AuthProvider for RealAuthProvider {
    async fn auth_status(&self) -> Result<AuthStatus, RuntimeError> {
        Ok(AuthStatus {
            authenticated: false,
            mode: "github_app_oauth".to_string(),
            app_mode: AppMode::Development.as_str().to_string(),
            github_app_ready: None,
            rbac_enabled: None,
            csrf_protection_enabled: None,
            token_rotation_enabled: None,
            ai_provider: None,
            user: None,
            role: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryTier, TierChain};

    async fn demo_repository() -> Arc<DemoRepository> {
        let chain = Arc::new(TierChain::new(vec![Arc::new(MemoryTier::new())]));
        let repository = Arc::new(DemoRepository::new(chain));
        repository.init().await;
        repository
    }

    #[tokio::test]
    async fn test_mock_provider_reports_demo_session() {
        let provider = MockAuthProvider::new(demo_repository().await, AppMode::Demo);
        let status = provider.auth_status().await.unwrap();

        assert!(status.authenticated);
        assert_eq!(status.mode, "demo");
        assert_eq!(status.app_mode, "demo");
        assert_eq!(status.github_app_ready, Some(false));
        assert_eq!(status.rbac_enabled, Some(false));
        assert_eq!(status.csrf_protection_enabled, Some(false));
        assert_eq!(status.token_rotation_enabled, Some(false));
        assert_eq!(status.ai_provider.as_deref(), Some("mock-ai"));
        assert_eq!(status.user.as_deref(), Some("demo-admin"));
        assert_eq!(status.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_mock_provider_reuses_the_session() {
        let repository = demo_repository().await;
        let provider = MockAuthProvider::new(repository.clone(), AppMode::Demo);

        provider.auth_status().await.unwrap();
        let session = repository.get_or_create_session().await.unwrap();
        provider.auth_status().await.unwrap();
        assert_eq!(repository.get_or_create_session().await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_real_provider_reports_placeholder() {
        let status = RealAuthProvider.auth_status().await.unwrap();

        assert!(!status.authenticated);
        assert_eq!(status.mode, "github_app_oauth");
        assert_eq!(status.app_mode, "development");
        assert_eq!(status.user, None);

        // The placeholder serializes without the demo capability flags.
        let value = serde_json::to_value(&status).unwrap();
        assert!(value.get("github_app_ready").is_none());
        assert!(value.get("ai_provider").is_none());
    }
}
