use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, Level};

use gitvibe_runtime::Runtime;

/// GitVibe: dashboard runtime driver
#[derive(Parser, Debug)]
#[command(name = "gitvibe")]
#[command(about = "Drive the GitVibe dashboard runtime from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check backend health
    Health,
    /// Show the current auth status
    Auth,
    /// List repositories with their open-PR counts
    Repos,
    /// List pull requests for a repository
    Pulls(RepoArgs),
    /// List issues for a repository
    Issues(RepoArgs),
    /// Merge a pull request
    Merge(MergeArgs),
    /// Queue an AI review job for a pull request
    Review(ReviewArgs),
    /// Look up a review job by id
    Job(JobArgs),
}

#[derive(Parser, Debug)]
struct RepoArgs {
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    owner: String,
    repo: String,
    /// Pull request number
    number: u64,

    /// Merge method recorded on the pull request
    #[arg(long, value_parser = ["merge", "squash", "rebase"])]
    method: Option<String>,
}

#[derive(Parser, Debug)]
struct ReviewArgs {
    owner: String,
    repo: String,
    /// Pull request number
    number: u64,

    /// Focus area for the review
    #[arg(long)]
    focus: Option<String>,

    /// Poll until the job completes and print the result
    #[arg(long)]
    wait: bool,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Job id (e.g. demo-job-1f0c...)
    id: String,
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Poll a job until it leaves the queued state.
async fn wait_for_job(runtime: &Runtime, job_id: &str) -> Result<Value> {
    let deadline = Duration::from_secs(30);
    let poll = async {
        loop {
            let response = runtime.api().get(&format!("/api/jobs/{job_id}")).await?;
            let status = response["job"]["status"].as_str().unwrap_or_default().to_string();
            if status != "queued" {
                return Ok::<_, anyhow::Error>(response);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    };
    tokio::time::timeout(deadline, poll)
        .await
        .map_err(|_| anyhow!("review job {job_id} did not complete in time"))?
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::WARN).init();

    let cli = Cli::parse();
    let runtime = Runtime::from_env().await?;
    info!(mode = %runtime.config().app_mode, "runtime composed");

    match cli.command {
        Commands::Health => {
            let health = runtime.api().get("/health").await?;
            print_json(&health)?;
        }
        Commands::Auth => {
            let status = runtime.api().get("/api/auth/status").await?;
            print_json(&status)?;
        }
        Commands::Repos => {
            let repos = runtime.api().get("/api/repos").await?;
            print_json(&repos)?;
        }
        Commands::Pulls(args) => {
            let pulls = runtime
                .api()
                .get(&format!("/api/repos/{}/{}/pulls", args.owner, args.repo))
                .await?;
            print_json(&pulls)?;
        }
        Commands::Issues(args) => {
            let issues = runtime
                .api()
                .get(&format!("/api/repos/{}/{}/issues", args.owner, args.repo))
                .await?;
            print_json(&issues)?;
        }
        Commands::Merge(args) => {
            let mut body = json!({});
            if let Some(method) = args.method {
                body["merge_method"] = Value::String(method);
            }
            let outcome = runtime
                .api()
                .post(
                    &format!(
                        "/api/repos/{}/{}/pulls/{}/merge",
                        args.owner, args.repo, args.number
                    ),
                    body,
                )
                .await?;
            print_json(&outcome)?;
        }
        Commands::Review(args) => {
            let created = runtime
                .api()
                .post(
                    "/api/ai/review/jobs",
                    json!({
                        "owner": args.owner,
                        "repo": args.repo,
                        "pull_number": args.number,
                        "focus": args.focus,
                    }),
                )
                .await?;

            if args.wait {
                let job_id = created["job"]["id"]
                    .as_str()
                    .ok_or_else(|| anyhow!("job response carried no id"))?
                    .to_string();
                let finished = wait_for_job(&runtime, &job_id).await?;
                print_json(&finished)?;
            } else {
                print_json(&created)?;
            }
        }
        Commands::Job(args) => {
            let job = runtime.api().get(&format!("/api/jobs/{}", args.id)).await?;
            print_json(&job)?;
        }
    }

    Ok(())
}
