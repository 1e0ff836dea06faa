//! Persisted demo dataset types.
//!
//! Exactly one [`DemoState`] document exists per namespace. The document
//! is serialized as a whole (full snapshot replace, no merge) and the
//! `schema_version` field is a hard compatibility gate: a mismatch
//! invalidates the entire document and triggers a reseed, never a
//! partial migration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::demo::review::ReviewResult;

/// Current document version. Bump on any breaking change to the shape
/// below; old documents are discarded and reseeded.
pub const DEMO_STATE_SCHEMA_VERSION: u32 = 1;

/// The complete demo dataset, persisted atomically as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoState {
    pub schema_version: u32,
    pub seeded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub repos: Vec<Repo>,
    #[serde(rename = "pullsByRepo")]
    pub pulls_by_repo: HashMap<String, Vec<PullRequest>>,
    #[serde(rename = "issuesByRepo")]
    pub issues_by_repo: HashMap<String, Vec<Issue>>,
    pub jobs: HashMap<String, Job>,
    pub session: Option<Session>,
}

impl DemoState {
    /// Whether this document carries the current schema version.
    pub fn is_current(&self) -> bool {
        self.schema_version == DEMO_STATE_SCHEMA_VERSION
    }
}

/// Map key for the per-repo collections: lowercase `owner/name`.
pub fn repo_key(owner: &str, name: &str) -> String {
    format!(
        "{}/{}",
        owner.to_ascii_lowercase(),
        name.to_ascii_lowercase()
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub stargazers_count: u64,
}

/// A repo annotated with its computed open-PR count, as returned by
/// `list_repos`. The count is derived on every call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoSummary {
    pub id: u64,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub stargazers_count: u64,
    pub open_prs: usize,
}

impl RepoSummary {
    pub fn new(repo: &Repo, open_prs: usize) -> Self {
        Self {
            id: repo.id,
            owner: repo.owner.clone(),
            name: repo.name.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            stargazers_count: repo.stargazers_count,
            open_prs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub state: PullState,
    #[serde(default)]
    pub merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub head_branch: String,
    pub base_branch: String,
    pub body: String,
    pub diff: String,
}

impl PullRequest {
    /// Open and not yet merged; the definition behind `open_prs`.
    pub fn is_open(&self) -> bool {
        self.state == PullState::Open && !self.merged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// Status of a simulated review job. Transitions are monotonic:
/// `Queued -> Completed` or `Queued -> Failed`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
    pub focus: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<ReviewResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The single demo session for a namespace. Created lazily on first
/// auth-status query, never rotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub token_id: String,
}

/// Outcome of a merge attempt. "Not found" is a result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub merged: bool,
    pub message: String,
}
