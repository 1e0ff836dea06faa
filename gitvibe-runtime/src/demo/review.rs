//! Deterministic simulated review results.
//!
//! The demo AI produces the same findings for the same input, so the
//! dashboard renders a stable review without any model in the loop.

use serde::{Deserialize, Serialize};

use super::state::{repo_key, DemoState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub summary: String,
    pub findings: Vec<Finding>,
}

/// Payload stored on a completed job, shaped as `{"review": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub review: Review,
}

/// Build the review for a pull request. Findings are appended in a fixed
/// order: the TODO finding (when the diff carries the marker), the
/// coverage finding (always), and the focus finding (when a non-empty
/// focus was requested).
pub fn build_review_result(
    state: &DemoState,
    owner: &str,
    repo: &str,
    pull_number: u64,
    focus: Option<&str>,
) -> ReviewResult {
    let key = repo_key(owner, repo);
    let pull = state
        .pulls_by_repo
        .get(&key)
        .and_then(|pulls| pulls.iter().find(|pull| pull.number == pull_number));

    let mut findings = Vec::new();

    if pull.is_some_and(|pull| pull.diff.contains("TODO")) {
        findings.push(Finding {
            severity: Severity::Medium,
            title: "Outstanding TODO in changed code".to_string(),
            description: "Replace TODO markers with explicit validation or follow-up issue \
                          references."
                .to_string(),
            file: Some("app/main.py".to_string()),
            line: Some(15),
        });
    }

    findings.push(Finding {
        severity: Severity::Low,
        title: "Expand regression coverage".to_string(),
        description: "Add tests for merge and AI review pathways for this change set."
            .to_string(),
        file: Some("backend/tests".to_string()),
        line: None,
    });

    if let Some(focus) = focus.filter(|focus| !focus.is_empty()) {
        findings.push(Finding {
            severity: Severity::Info,
            title: "Focus area considered".to_string(),
            description: format!("Requested review focus: {focus}"),
            file: None,
            line: None,
        });
    }

    ReviewResult {
        review: Review {
            summary: format!("Demo AI review for #{pull_number} in {owner}/{repo}."),
            findings,
        },
    }
}
