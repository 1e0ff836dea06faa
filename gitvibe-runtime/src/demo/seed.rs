//! The fixed dataset a fresh demo namespace starts from.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use super::state::{
    repo_key, DemoState, Issue, PullRequest, PullState, Repo, DEMO_STATE_SCHEMA_VERSION,
};

fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("seed timestamps are valid")
}

/// Build a freshly seeded demo document, stamped with the current time.
pub fn seeded_state() -> DemoState {
    let now = Utc::now();
    let mut pulls_by_repo = HashMap::new();
    let mut issues_by_repo = HashMap::new();

    pulls_by_repo.insert(
        repo_key("demo-org", "platform-api"),
        vec![
            PullRequest {
                number: 42,
                title: "feat: add AI repo insights endpoint".to_string(),
                author: "copilot-bot".to_string(),
                state: PullState::Open,
                merged: false,
                merged_at: None,
                merged_by: None,
                merge_method: None,
                created_at: seed_time(2026, 2, 12, 9, 12),
                head_branch: "feature/ai-insights".to_string(),
                base_branch: "main".to_string(),
                body: "Adds an endpoint to summarize risky files and review latency."
                    .to_string(),
                diff: concat!(
                    "diff --git a/app/main.py b/app/main.py\n",
                    "@@ -12,6 +12,11 @@\n",
                    "+@app.get('/api/repos/{repo}/insights')\n",
                    "+async def repo_insights(repo: str):\n",
                    "+    # TODO: add pagination guards\n",
                    "+    return {'repo': repo}\n",
                )
                .to_string(),
            },
            PullRequest {
                number: 44,
                title: "fix: tighten webhook signature validation".to_string(),
                author: "security-maintainer".to_string(),
                state: PullState::Open,
                merged: false,
                merged_at: None,
                merged_by: None,
                merge_method: None,
                created_at: seed_time(2026, 2, 13, 14, 33),
                head_branch: "fix/webhook-hardening".to_string(),
                base_branch: "main".to_string(),
                body: "Enforces timestamp validation and strict signature checks.".to_string(),
                diff: concat!(
                    "diff --git a/app/auth.py b/app/auth.py\n",
                    "@@ -20,7 +20,8 @@\n",
                    "-if not signature:\n",
                    "+if not signature or not timestamp:\n",
                    "     raise HTTPException(status_code=401)\n",
                )
                .to_string(),
            },
        ],
    );

    pulls_by_repo.insert(
        repo_key("demo-org", "platform-web"),
        vec![PullRequest {
            number: 13,
            title: "chore: improve dashboard loading states".to_string(),
            author: "frontend-dev".to_string(),
            state: PullState::Open,
            merged: false,
            merged_at: None,
            merged_by: None,
            merge_method: None,
            created_at: seed_time(2026, 2, 11, 18, 20),
            head_branch: "chore/loading-state".to_string(),
            base_branch: "main".to_string(),
            body: "Improves user feedback during data fetches.".to_string(),
            diff: concat!(
                "diff --git a/src/components/dashboard.tsx b/src/components/dashboard.tsx\n",
                "@@ -1,4 +1,6 @@\n",
                "+const LoadingState = () => <Spinner />\n",
                " export default function Dashboard() { ... }\n",
            )
            .to_string(),
        }],
    );

    issues_by_repo.insert(
        repo_key("demo-org", "platform-api"),
        vec![
            Issue {
                number: 8,
                title: "api: harden OAuth callback validation".to_string(),
                author: "security-maintainer".to_string(),
                state: "open".to_string(),
                created_at: seed_time(2026, 2, 10, 10, 0),
            },
            Issue {
                number: 9,
                title: "api: add queue retries for review jobs".to_string(),
                author: "backend-dev".to_string(),
                state: "open".to_string(),
                created_at: seed_time(2026, 2, 9, 13, 0),
            },
        ],
    );

    issues_by_repo.insert(
        repo_key("demo-org", "platform-web"),
        vec![Issue {
            number: 3,
            title: "web: improve merge action feedback".to_string(),
            author: "frontend-dev".to_string(),
            state: "open".to_string(),
            created_at: seed_time(2026, 2, 8, 8, 45),
        }],
    );

    DemoState {
        schema_version: DEMO_STATE_SCHEMA_VERSION,
        seeded_at: now,
        updated_at: now,
        repos: vec![
            Repo {
                id: 101,
                owner: "demo-org".to_string(),
                name: "platform-api".to_string(),
                description: "Backend APIs and orchestration workflows.".to_string(),
                language: "Python".to_string(),
                stargazers_count: 245,
            },
            Repo {
                id: 102,
                owner: "demo-org".to_string(),
                name: "platform-web".to_string(),
                description: "Frontend shell for review and merge workflows.".to_string(),
                language: "JavaScript".to_string(),
                stargazers_count: 173,
            },
        ],
        pulls_by_repo,
        issues_by_repo,
        jobs: HashMap::new(),
        session: None,
    }
}
