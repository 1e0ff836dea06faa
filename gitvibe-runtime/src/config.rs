use std::env;
use std::path::PathBuf;

use crate::error::RuntimeError;

/// Storage key prefix used when no `DEMO_NAMESPACE` is configured.
pub const DEFAULT_DEMO_NAMESPACE: &str = "gitvibe_demo_v1";

/// Hostnames on which demo mode may run without the escape flag.
const LOCAL_HOSTS: [&str; 4] = ["", "localhost", "127.0.0.1", "::1"];

/// Operating mode of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Demo,
    Development,
    Production,
}

impl AppMode {
    /// Normalize an arbitrary mode string. Anything unrecognized falls
    /// back to `Development`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "demo" => AppMode::Demo,
            "production" => AppMode::Production,
            "development" => AppMode::Development,
            _ => AppMode::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Demo => "demo",
            AppMode::Development => "development",
            AppMode::Production => "production",
        }
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized, immutable runtime settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub app_mode: AppMode,
    /// Base URL of the live backend. Only consulted outside demo mode.
    pub api_base_url: String,
    /// Storage key prefix for the demo dataset.
    pub demo_namespace: String,
    /// Escape hatch for running demo mode on a non-local host.
    pub allow_demo_on_public_host: bool,
    /// Host the dashboard is reachable on. Empty means local.
    pub app_host: String,
    /// Directory for persistent tier state (SQLite database, JSON file).
    pub state_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` is
    /// the production path; tests inject their own lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let app_mode = AppMode::parse(&lookup("APP_MODE").unwrap_or_default());
        let api_base_url = lookup("API_BASE_URL").unwrap_or_default();
        let demo_namespace = lookup("DEMO_NAMESPACE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DEMO_NAMESPACE.to_string());
        let allow_demo_on_public_host =
            parse_boolean(lookup("ALLOW_DEMO_ON_PUBLIC_HOST").as_deref(), false);
        let app_host = lookup("APP_HOST").unwrap_or_default();
        let state_dir = lookup("STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            app_mode,
            api_base_url,
            demo_namespace,
            allow_demo_on_public_host,
            app_host,
            state_dir,
        }
    }

    pub fn is_local_host(&self) -> bool {
        let host = self.app_host.trim().to_ascii_lowercase();
        LOCAL_HOSTS.contains(&host.as_str())
    }

    /// Refuse to run a simulated backend on a public host unless the
    /// operator explicitly opted in.
    pub fn enforce_demo_safety(&self) -> Result<(), RuntimeError> {
        if self.app_mode != AppMode::Demo {
            return Ok(());
        }
        if self.is_local_host() || self.allow_demo_on_public_host {
            return Ok(());
        }
        Err(RuntimeError::DemoModeBlocked)
    }
}

/// Parse a boolean-like configuration string.
///
/// Accepts 1/true/yes/on and 0/false/no/off (case-insensitive, trimmed);
/// anything else yields the fallback.
pub fn parse_boolean(value: Option<&str>, fallback: bool) -> bool {
    let Some(value) = value else {
        return fallback;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> RuntimeConfig {
        RuntimeConfig::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
    }

    #[test]
    fn test_mode_normalization() {
        assert_eq!(AppMode::parse("demo"), AppMode::Demo);
        assert_eq!(AppMode::parse("  DEMO "), AppMode::Demo);
        assert_eq!(AppMode::parse("Production"), AppMode::Production);
        assert_eq!(AppMode::parse("development"), AppMode::Development);
        assert_eq!(AppMode::parse("staging"), AppMode::Development);
        assert_eq!(AppMode::parse(""), AppMode::Development);
    }

    #[test]
    fn test_parse_boolean_truthy_and_falsy_tokens() {
        for token in ["1", "true", "YES", " on "] {
            assert!(parse_boolean(Some(token), false), "token: {token:?}");
        }
        for token in ["0", "false", "No", "off"] {
            assert!(!parse_boolean(Some(token), true), "token: {token:?}");
        }
    }

    #[test]
    fn test_parse_boolean_fallback() {
        assert!(!parse_boolean(None, false));
        assert!(parse_boolean(None, true));
        assert!(parse_boolean(Some("maybe"), true));
        assert!(!parse_boolean(Some(""), false));
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.app_mode, AppMode::Development);
        assert_eq!(config.demo_namespace, DEFAULT_DEMO_NAMESPACE);
        assert_eq!(config.api_base_url, "");
        assert!(!config.allow_demo_on_public_host);
        assert_eq!(config.state_dir, PathBuf::from("."));
        assert!(config.is_local_host());
    }

    #[test]
    fn test_blank_namespace_falls_back_to_default() {
        let config = config_with(&[("DEMO_NAMESPACE", "   ")]);
        assert_eq!(config.demo_namespace, DEFAULT_DEMO_NAMESPACE);
    }

    #[test]
    fn test_demo_safety_allows_loopback_hosts() {
        for host in ["", "localhost", "127.0.0.1", "::1", "LOCALHOST"] {
            let config = config_with(&[("APP_MODE", "demo"), ("APP_HOST", host)]);
            assert!(config.enforce_demo_safety().is_ok(), "host: {host:?}");
        }
    }

    #[test]
    fn test_demo_safety_blocks_public_host() {
        let config = config_with(&[("APP_MODE", "demo"), ("APP_HOST", "dashboard.example.com")]);
        assert!(matches!(
            config.enforce_demo_safety(),
            Err(RuntimeError::DemoModeBlocked)
        ));
    }

    #[test]
    fn test_demo_safety_escape_flag() {
        let config = config_with(&[
            ("APP_MODE", "demo"),
            ("APP_HOST", "dashboard.example.com"),
            ("ALLOW_DEMO_ON_PUBLIC_HOST", "true"),
        ]);
        assert!(config.enforce_demo_safety().is_ok());
    }

    #[test]
    fn test_non_demo_modes_ignore_host() {
        let config = config_with(&[("APP_MODE", "production"), ("APP_HOST", "example.com")]);
        assert!(config.enforce_demo_safety().is_ok());
    }
}
