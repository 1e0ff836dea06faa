//! Mock REST router for demo mode.
//!
//! Reproduces the live backend's endpoint semantics with no network:
//! paths are normalized and matched in-process, and every handler is a
//! thin translation onto the demo repository. An unmatched verb+path is
//! a programming error on the caller's side and is surfaced, never
//! swallowed.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde_json::{json, Value};

use crate::auth::AuthProvider;
use crate::config::AppMode;
use crate::demo::repository::DemoRepository;
use crate::error::RuntimeError;
use crate::runtime::ApiClient;

pub struct MockApiClient {
    repository: Arc<DemoRepository>,
    auth: Arc<dyn AuthProvider>,
    app_mode: AppMode,
}

impl MockApiClient {
    pub fn new(
        repository: Arc<DemoRepository>,
        auth: Arc<dyn AuthProvider>,
        app_mode: AppMode,
    ) -> Self {
        Self {
            repository,
            auth,
            app_mode,
        }
    }
}

/// Normalize a request path before matching: force a leading slash,
/// drop any query string, and strip one trailing slash (for anything
/// longer than `/`).
fn normalize_path(path: &str) -> String {
    let mut value = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if let Some(index) = value.find('?') {
        value.truncate(index);
    }
    if value.len() > 1 && value.ends_with('/') {
        value.pop();
    }
    value
}

/// Percent-decode one path segment; a malformed escape sequence falls
/// back to the raw segment.
fn decode_segment(segment: &str) -> String {
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

fn parse_pull_number(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Serialize a response payload; on the (unreachable) encode failure,
/// degrade to null rather than fail the request.
fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get(&self, path: &str) -> Result<Value, RuntimeError> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized[1..].split('/').collect();

        match segments.as_slice() {
            ["health"] => Ok(json!({
                "status": "ok",
                "demo_mode": true,
                "app_mode": self.app_mode.as_str(),
                "ai_provider": "mock-ai",
                "services": {},
            })),
            ["api", "auth", "status"] => {
                let status = self.auth.auth_status().await?;
                Ok(to_json(&status))
            }
            ["api", "repos"] => {
                let repos = self.repository.list_repos().await?;
                Ok(json!({ "repos": to_json(&repos) }))
            }
            ["api", "repos", owner, repo, "pulls"] => {
                let pulls = self
                    .repository
                    .list_pulls(&decode_segment(owner), &decode_segment(repo))
                    .await?;
                Ok(json!({ "pull_requests": to_json(&pulls) }))
            }
            ["api", "repos", owner, repo, "issues"] => {
                let issues = self
                    .repository
                    .list_issues(&decode_segment(owner), &decode_segment(repo))
                    .await?;
                Ok(json!({ "issues": to_json(&issues) }))
            }
            ["api", "jobs", id] => {
                let job = self
                    .repository
                    .get_job(&decode_segment(id))
                    .await?
                    .ok_or(RuntimeError::JobNotFound)?;
                Ok(json!({ "job": to_json(&job) }))
            }
            _ => Err(RuntimeError::RouteNotImplemented {
                method: "GET",
                path: normalized,
            }),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, RuntimeError> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized[1..].split('/').collect();

        match segments.as_slice() {
            ["api", "repos", owner, repo, "pulls", number, "merge"] => {
                let Some(number) = parse_pull_number(number) else {
                    return Err(RuntimeError::RouteNotImplemented {
                        method: "POST",
                        path: normalized,
                    });
                };
                let merge_method = body
                    .get("merge_method")
                    .and_then(Value::as_str)
                    .filter(|method| !method.is_empty());
                let outcome = self
                    .repository
                    .merge_pull(
                        &decode_segment(owner),
                        &decode_segment(repo),
                        number,
                        Some("demo-admin"),
                        merge_method,
                    )
                    .await?;
                Ok(to_json(&outcome))
            }
            ["api", "ai", "review", "jobs"] => {
                let owner = body
                    .get("owner")
                    .and_then(Value::as_str)
                    .filter(|owner| !owner.is_empty())
                    .unwrap_or("demo-org");
                let repo = body
                    .get("repo")
                    .and_then(Value::as_str)
                    .filter(|repo| !repo.is_empty())
                    .unwrap_or("platform-api");
                let pull_number = body
                    .get("pull_number")
                    .and_then(|value| {
                        value
                            .as_u64()
                            .or_else(|| value.as_str().and_then(|raw| raw.parse().ok()))
                    })
                    .filter(|number| *number != 0)
                    .unwrap_or(1);
                let focus = body
                    .get("focus")
                    .and_then(Value::as_str)
                    .filter(|focus| !focus.is_empty())
                    .map(str::to_string);

                let job = self
                    .repository
                    .create_review_job(owner, repo, pull_number, focus)
                    .await?;
                Ok(json!({
                    "job": {
                        "id": job.id,
                        "status": to_json(&job.status),
                        "created_at": to_json(&job.created_at),
                    }
                }))
            }
            _ => Err(RuntimeError::RouteNotImplemented {
                method: "POST",
                path: normalized,
            }),
        }
    }
}
