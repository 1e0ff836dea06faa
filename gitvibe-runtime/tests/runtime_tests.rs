//! End-to-end tests over the composed demo runtime: configuration in,
//! REST-shaped calls out, with the standard tier stack on disk.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{json, Value};

use gitvibe_runtime::{Runtime, RuntimeConfig, RuntimeError};

fn temp_state_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gitvibe_e2e_{}_{}", label, std::process::id()))
}

fn demo_config(state_dir: &PathBuf) -> RuntimeConfig {
    let state_dir = state_dir.display().to_string();
    RuntimeConfig::from_lookup(move |key| match key {
        "APP_MODE" => Some("demo".to_string()),
        "STATE_DIR" => Some(state_dir.clone()),
        _ => None,
    })
}

async fn poll_job(runtime: &Runtime, job_id: &str) -> Value {
    let deadline = Duration::from_secs(5);
    let poll = async {
        loop {
            let job = runtime
                .api()
                .get(&format!("/api/jobs/{job_id}"))
                .await
                .expect("job lookup succeeds");
            if job["job"]["status"] == "completed" {
                return job;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };
    tokio::time::timeout(deadline, poll)
        .await
        .expect("job completes within the deadline")
}

#[tokio::test]
async fn seeded_runtime_serves_repos_pulls_and_issues() {
    let state_dir = temp_state_dir("seeded");
    let _ = std::fs::remove_dir_all(&state_dir);
    let runtime = Runtime::create(demo_config(&state_dir)).await.unwrap();

    let repos = runtime.api().get("/api/repos").await.unwrap();
    let repos = repos["repos"].as_array().unwrap();
    assert_eq!(repos.len(), 2);
    let api_repo = repos
        .iter()
        .find(|repo| repo["name"] == "platform-api")
        .unwrap();
    assert_eq!(api_repo["open_prs"], 2);
    assert_eq!(api_repo["stargazers_count"], 245);

    let pulls = runtime
        .api()
        .get("/api/repos/demo-org/platform-api/pulls")
        .await
        .unwrap();
    let numbers: Vec<u64> = pulls["pull_requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pull| pull["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![42, 44]);

    let issues = runtime
        .api()
        .get("/api/repos/demo-org/platform-web/issues")
        .await
        .unwrap();
    assert_eq!(issues["issues"].as_array().unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&state_dir);
}

#[tokio::test]
async fn merge_is_idempotent_and_survives_restart() {
    let state_dir = temp_state_dir("merge");
    let _ = std::fs::remove_dir_all(&state_dir);

    {
        let runtime = Runtime::create(demo_config(&state_dir)).await.unwrap();
        let first = runtime
            .api()
            .post("/api/repos/demo-org/platform-api/pulls/42/merge", json!({}))
            .await
            .unwrap();
        assert_eq!(first["merged"], true);
        assert_eq!(first["message"], "Pull request merged in demo mode.");

        let second = runtime
            .api()
            .post("/api/repos/demo-org/platform-api/pulls/42/merge", json!({}))
            .await
            .unwrap();
        assert_eq!(second["merged"], true);
        assert_eq!(second["message"], "Pull request already merged.");
    }

    // A fresh composition over the same namespace adopts the mutated
    // document instead of reseeding.
    let runtime = Runtime::create(demo_config(&state_dir)).await.unwrap();
    let repos = runtime.api().get("/api/repos").await.unwrap();
    let api_repo = repos["repos"]
        .as_array()
        .unwrap()
        .iter()
        .find(|repo| repo["name"] == "platform-api")
        .unwrap()
        .clone();
    assert_eq!(api_repo["open_prs"], 1);

    let _ = std::fs::remove_dir_all(&state_dir);
}

#[tokio::test]
async fn review_job_completes_with_deterministic_findings() {
    let state_dir = temp_state_dir("review");
    let _ = std::fs::remove_dir_all(&state_dir);
    let runtime = Runtime::create(demo_config(&state_dir)).await.unwrap();

    let created = runtime
        .api()
        .post(
            "/api/ai/review/jobs",
            json!({
                "owner": "demo-org",
                "repo": "platform-api",
                "pull_number": 42,
                "focus": "pagination"
            }),
        )
        .await
        .unwrap();
    assert_eq!(created["job"]["status"], "queued");
    let job_id = created["job"]["id"].as_str().unwrap().to_string();

    let completed = poll_job(&runtime, &job_id).await;
    let review = &completed["job"]["result"]["review"];
    assert_eq!(
        review["summary"],
        "Demo AI review for #42 in demo-org/platform-api."
    );

    // Seeded PR #42 carries a TODO marker, so the TODO finding leads,
    // the coverage finding follows, and the focus finding closes.
    let findings = review["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0]["severity"], "medium");
    assert_eq!(findings[1]["severity"], "low");
    assert_eq!(findings[2]["severity"], "info");
    assert_eq!(
        findings[2]["description"],
        "Requested review focus: pagination"
    );

    let _ = std::fs::remove_dir_all(&state_dir);
}

#[tokio::test]
async fn auth_status_reports_the_demo_session() {
    let state_dir = temp_state_dir("auth");
    let _ = std::fs::remove_dir_all(&state_dir);
    let runtime = Runtime::create(demo_config(&state_dir)).await.unwrap();

    let status = runtime.api().get("/api/auth/status").await.unwrap();
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["mode"], "demo");
    assert_eq!(status["user"], "demo-admin");
    assert_eq!(status["role"], "admin");

    // The session is created once and reused across queries.
    let again = runtime.api().get("/api/auth/status").await.unwrap();
    assert_eq!(status, again);

    let _ = std::fs::remove_dir_all(&state_dir);
}

#[tokio::test]
async fn demo_mode_refuses_public_hosts_without_the_escape_flag() {
    let config = RuntimeConfig::from_lookup(|key| match key {
        "APP_MODE" => Some("demo".to_string()),
        "APP_HOST" => Some("dashboard.example.com".to_string()),
        _ => None,
    });
    let result = Runtime::create(config).await;
    assert!(matches!(result, Err(RuntimeError::DemoModeBlocked)));

    let config = RuntimeConfig::from_lookup(|key| match key {
        "APP_MODE" => Some("demo".to_string()),
        "APP_HOST" => Some("dashboard.example.com".to_string()),
        "ALLOW_DEMO_ON_PUBLIC_HOST" => Some("yes".to_string()),
        "STATE_DIR" => Some(
            temp_state_dir("escape")
                .display()
                .to_string(),
        ),
        _ => None,
    });
    assert!(Runtime::create(config).await.is_ok());
    let _ = std::fs::remove_dir_all(temp_state_dir("escape"));
}
