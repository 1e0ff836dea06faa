//! The demo repository: single owner of the canonical dataset.
//!
//! Every read hands out owned copies and every mutation runs
//! read-modify-write under one lock, followed by a write-through persist
//! via the tier chain. Callers hold the repository by `Arc` and never
//! touch the dataset directly, so no mutation can interleave with
//! another.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::review::build_review_result;
use super::seed::seeded_state;
use super::state::{
    repo_key, DemoState, Issue, Job, JobStatus, MergeOutcome, PullRequest, PullState, RepoSummary,
    Session,
};
use crate::error::RuntimeError;
use crate::persistence::TierChain;

/// Simulated latency between queueing a review job and completing it.
pub const DEFAULT_REVIEW_JOB_DELAY: Duration = Duration::from_millis(800);

pub struct DemoRepository {
    chain: Arc<TierChain>,
    state: Arc<RwLock<Option<DemoState>>>,
    review_delay: Duration,
}

impl DemoRepository {
    pub fn new(chain: Arc<TierChain>) -> Self {
        Self::with_review_delay(chain, DEFAULT_REVIEW_JOB_DELAY)
    }

    pub fn with_review_delay(chain: Arc<TierChain>, review_delay: Duration) -> Self {
        Self {
            chain,
            state: Arc::new(RwLock::new(None)),
            review_delay,
        }
    }

    /// Load or seed the dataset. Must be called exactly once, before any
    /// data operation.
    ///
    /// A persisted document with the current schema version is adopted
    /// as-is; anything else (absent, undecodable, version mismatch) is
    /// replaced by a freshly seeded dataset. Jobs that were still queued
    /// when the previous process died are re-armed so they complete
    /// instead of staying queued forever.
    pub async fn init(&self) {
        let loaded = self.chain.read().await;
        let mut guard = self.state.write().await;
        match loaded {
            Some(state) if state.is_current() => {
                let requeue: Vec<String> = state
                    .jobs
                    .values()
                    .filter(|job| job.status == JobStatus::Queued)
                    .map(|job| job.id.clone())
                    .collect();
                info!(
                    repos = state.repos.len(),
                    jobs = state.jobs.len(),
                    "adopted persisted demo dataset"
                );
                *guard = Some(state);
                drop(guard);
                for job_id in requeue {
                    info!(%job_id, "re-arming queued review job");
                    self.arm_completion(job_id);
                }
            }
            loaded => {
                if loaded.is_some() {
                    warn!("persisted demo document has an incompatible schema version, reseeding");
                }
                let mut state = seeded_state();
                Self::persist_locked(&self.chain, &mut state).await;
                info!("seeded fresh demo dataset");
                *guard = Some(state);
            }
        }
    }

    /// Stamp `updated_at` and write the document through the chain.
    /// Callers hold the state lock for the whole read-modify-write.
    async fn persist_locked(chain: &TierChain, state: &mut DemoState) {
        state.updated_at = Utc::now();
        chain.write(state).await;
    }

    pub async fn list_repos(&self) -> Result<Vec<RepoSummary>, RuntimeError> {
        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(RuntimeError::NotInitialized)?;
        Ok(state
            .repos
            .iter()
            .map(|repo| {
                let key = repo_key(&repo.owner, &repo.name);
                let open_prs = state
                    .pulls_by_repo
                    .get(&key)
                    .map(|pulls| pulls.iter().filter(|pull| pull.is_open()).count())
                    .unwrap_or(0);
                RepoSummary::new(repo, open_prs)
            })
            .collect())
    }

    pub async fn list_pulls(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, RuntimeError> {
        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(RuntimeError::NotInitialized)?;
        Ok(state
            .pulls_by_repo
            .get(&repo_key(owner, name))
            .cloned()
            .unwrap_or_default())
    }

    pub async fn list_issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>, RuntimeError> {
        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(RuntimeError::NotInitialized)?;
        Ok(state
            .issues_by_repo
            .get(&repo_key(owner, name))
            .cloned()
            .unwrap_or_default())
    }

    /// Merge a pull request.
    ///
    /// An unknown PR is a not-merged result with no mutation. A PR that
    /// is already merged or already closed reports success without
    /// touching the document again, so repeated merges are idempotent.
    pub async fn merge_pull(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        merged_by: Option<&str>,
        merge_method: Option<&str>,
    ) -> Result<MergeOutcome, RuntimeError> {
        let mut guard = self.state.write().await;
        let state = guard.as_mut().ok_or(RuntimeError::NotInitialized)?;

        let key = repo_key(owner, name);
        let Some(pull) = state
            .pulls_by_repo
            .get_mut(&key)
            .and_then(|pulls| pulls.iter_mut().find(|pull| pull.number == number))
        else {
            return Ok(MergeOutcome {
                merged: false,
                message: "Pull request not found.".to_string(),
            });
        };

        if pull.merged || pull.state == PullState::Closed {
            return Ok(MergeOutcome {
                merged: true,
                message: "Pull request already merged.".to_string(),
            });
        }

        pull.state = PullState::Closed;
        pull.merged = true;
        pull.merged_at = Some(Utc::now());
        pull.merged_by = Some(merged_by.unwrap_or("demo-user").to_string());
        pull.merge_method = Some(merge_method.unwrap_or("merge").to_string());
        Self::persist_locked(&self.chain, state).await;

        Ok(MergeOutcome {
            merged: true,
            message: "Pull request merged in demo mode.".to_string(),
        })
    }

    /// Queue a simulated review job and return it immediately.
    ///
    /// Completion happens out of band after [`DEFAULT_REVIEW_JOB_DELAY`]
    /// (or the delay this repository was built with); the caller polls
    /// `get_job` to observe it.
    pub async fn create_review_job(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
        focus: Option<String>,
    ) -> Result<Job, RuntimeError> {
        let job = Job {
            id: format!("demo-job-{}", Uuid::new_v4()),
            status: JobStatus::Queued,
            owner: owner.to_string(),
            repo: repo.to_string(),
            pull_number,
            focus: focus.filter(|focus| !focus.is_empty()),
            created_at: Utc::now(),
            completed_at: None,
            result: None,
            error: None,
        };

        {
            let mut guard = self.state.write().await;
            let state = guard.as_mut().ok_or(RuntimeError::NotInitialized)?;
            state.jobs.insert(job.id.clone(), job.clone());
            Self::persist_locked(&self.chain, state).await;
        }

        self.arm_completion(job.id.clone());
        Ok(job)
    }

    /// Schedule the deferred completion of a queued job.
    ///
    /// The task clones the shared dataset handle, not a snapshot: when
    /// the timer fires it re-reads the job through the same lock every
    /// other mutation uses. A job that was deleted, or already left the
    /// queued state, is skipped.
    fn arm_completion(&self, job_id: String) {
        let chain = Arc::clone(&self.chain);
        let shared = Arc::clone(&self.state);
        let delay = self.review_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut guard = shared.write().await;
            let Some(state) = guard.as_mut() else {
                return;
            };
            let Some(job) = state.jobs.get(&job_id) else {
                return;
            };
            if job.status != JobStatus::Queued {
                return;
            }

            let owner = job.owner.clone();
            let repo = job.repo.clone();
            let pull_number = job.pull_number;
            let focus = job.focus.clone();
            let result = build_review_result(state, &owner, &repo, pull_number, focus.as_deref());

            if let Some(job) = state.jobs.get_mut(&job_id) {
                job.status = JobStatus::Completed;
                job.completed_at = Some(Utc::now());
                job.result = Some(result);
            }
            Self::persist_locked(&chain, state).await;
        });
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Option<Job>, RuntimeError> {
        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(RuntimeError::NotInitialized)?;
        Ok(state.jobs.get(job_id).cloned())
    }

    /// Return the namespace's single session, creating it on first use.
    pub async fn get_or_create_session(&self) -> Result<Session, RuntimeError> {
        let mut guard = self.state.write().await;
        let state = guard.as_mut().ok_or(RuntimeError::NotInitialized)?;

        if let Some(session) = &state.session {
            return Ok(session.clone());
        }

        let session = Session {
            user: "demo-admin".to_string(),
            role: "admin".to_string(),
            issued_at: Utc::now(),
            token_id: format!("demo-token-{}", Uuid::new_v4()),
        };
        state.session = Some(session.clone());
        Self::persist_locked(&self.chain, state).await;
        Ok(session)
    }
}
