//! Actions operations (workflows, runs, jobs, artifacts).

use crate::client::GitHub;
use crate::errors::{require, ApiResult};
use crate::types::{RepoRef, Workflow, WorkflowRun};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service for Actions operations.
pub struct ActionsService<'a> {
    client: &'a GitHub,
}

impl<'a> ActionsService<'a> {
    /// Creates a new actions service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    // Workflows

    /// Lists workflows in a repository.
    pub async fn list_workflows(&self, repo: &RepoRef) -> ApiResult<WorkflowList> {
        self.client
            .get(&format!("/{}/actions/workflows", repo.api_prefix()))
            .await
    }

    /// Gets a workflow.
    pub async fn get_workflow(&self, repo: &RepoRef, workflow: &WorkflowId) -> ApiResult<Workflow> {
        self.client
            .get(&format!(
                "/{}/actions/workflows/{}",
                repo.api_prefix(),
                workflow
            ))
            .await
    }

    /// Disables a workflow.
    pub async fn disable_workflow(&self, repo: &RepoRef, workflow: &WorkflowId) -> ApiResult<()> {
        self.client
            .put_no_response(
                &format!(
                    "/{}/actions/workflows/{}/disable",
                    repo.api_prefix(),
                    workflow
                ),
                &(),
            )
            .await
    }

    /// Enables a workflow.
    pub async fn enable_workflow(&self, repo: &RepoRef, workflow: &WorkflowId) -> ApiResult<()> {
        self.client
            .put_no_response(
                &format!(
                    "/{}/actions/workflows/{}/enable",
                    repo.api_prefix(),
                    workflow
                ),
                &(),
            )
            .await
    }

    /// Triggers a workflow dispatch event.
    pub async fn dispatch_workflow(
        &self,
        repo: &RepoRef,
        workflow: &WorkflowId,
        dispatch: &WorkflowDispatch,
    ) -> ApiResult<()> {
        require("ref", &dispatch.r#ref)?;
        self.client
            .post_no_response(
                &format!(
                    "/{}/actions/workflows/{}/dispatches",
                    repo.api_prefix(),
                    workflow
                ),
                dispatch,
            )
            .await
    }

    // Runs

    /// Lists workflow runs for a repository.
    pub async fn list_runs(
        &self,
        repo: &RepoRef,
        filters: &RunFilters,
    ) -> ApiResult<WorkflowRunList> {
        self.client
            .get_with_params(&format!("/{}/actions/runs", repo.api_prefix()), filters)
            .await
    }

    /// Lists runs of a single workflow.
    pub async fn list_workflow_runs(
        &self,
        repo: &RepoRef,
        workflow: &WorkflowId,
        filters: &RunFilters,
    ) -> ApiResult<WorkflowRunList> {
        self.client
            .get_with_params(
                &format!("/{}/actions/workflows/{}/runs", repo.api_prefix(), workflow),
                filters,
            )
            .await
    }

    /// Gets a workflow run.
    pub async fn get_run(&self, repo: &RepoRef, run_id: u64) -> ApiResult<WorkflowRun> {
        self.client
            .get(&format!("/{}/actions/runs/{}", repo.api_prefix(), run_id))
            .await
    }

    /// Cancels a workflow run.
    pub async fn cancel_run(&self, repo: &RepoRef, run_id: u64) -> ApiResult<()> {
        self.client
            .post_no_response(
                &format!("/{}/actions/runs/{}/cancel", repo.api_prefix(), run_id),
                &(),
            )
            .await
    }

    /// Re-runs a workflow run.
    pub async fn rerun(&self, repo: &RepoRef, run_id: u64) -> ApiResult<()> {
        self.client
            .post_no_response(
                &format!("/{}/actions/runs/{}/rerun", repo.api_prefix(), run_id),
                &(),
            )
            .await
    }

    /// Deletes a workflow run.
    pub async fn delete_run(&self, repo: &RepoRef, run_id: u64) -> ApiResult<()> {
        self.client
            .delete(&format!("/{}/actions/runs/{}", repo.api_prefix(), run_id))
            .await
    }

    // Jobs

    /// Lists jobs for a workflow run.
    pub async fn list_jobs(&self, repo: &RepoRef, run_id: u64) -> ApiResult<JobList> {
        self.client
            .get(&format!("/{}/actions/runs/{}/jobs", repo.api_prefix(), run_id))
            .await
    }

    /// Gets a job.
    pub async fn get_job(&self, repo: &RepoRef, job_id: u64) -> ApiResult<Job> {
        self.client
            .get(&format!("/{}/actions/jobs/{}", repo.api_prefix(), job_id))
            .await
    }

    // Artifacts

    /// Lists artifacts for a repository.
    pub async fn list_artifacts(&self, repo: &RepoRef) -> ApiResult<ArtifactList> {
        self.client
            .get(&format!("/{}/actions/artifacts", repo.api_prefix()))
            .await
    }

    /// Lists artifacts produced by a run.
    pub async fn list_run_artifacts(&self, repo: &RepoRef, run_id: u64) -> ApiResult<ArtifactList> {
        self.client
            .get(&format!(
                "/{}/actions/runs/{}/artifacts",
                repo.api_prefix(),
                run_id
            ))
            .await
    }

    /// Gets an artifact.
    pub async fn get_artifact(&self, repo: &RepoRef, artifact_id: u64) -> ApiResult<Artifact> {
        self.client
            .get(&format!(
                "/{}/actions/artifacts/{}",
                repo.api_prefix(),
                artifact_id
            ))
            .await
    }

    /// Deletes an artifact.
    pub async fn delete_artifact(&self, repo: &RepoRef, artifact_id: u64) -> ApiResult<()> {
        self.client
            .delete(&format!(
                "/{}/actions/artifacts/{}",
                repo.api_prefix(),
                artifact_id
            ))
            .await
    }
}

/// Addresses a workflow by numeric id or file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowId {
    /// Numeric workflow id.
    Id(u64),
    /// Workflow file name (e.g. "ci.yml").
    FileName(String),
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::FileName(name) => write!(f, "{}", name),
        }
    }
}

/// Workflow listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowList {
    /// Total workflow count.
    pub total_count: u64,
    /// The workflows.
    pub workflows: Vec<Workflow>,
}

/// Workflow run listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunList {
    /// Total run count.
    pub total_count: u64,
    /// The runs.
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Filters for listing workflow runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunFilters {
    /// Filter by actor login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Filter by branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Filter by triggering event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Filter by status or conclusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Payload for a workflow dispatch event.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDispatch {
    /// Branch or tag to run on.
    pub r#ref: String,
    /// Input parameters defined by the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,
}

/// Job listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JobList {
    /// Total job count.
    pub total_count: u64,
    /// The jobs.
    pub jobs: Vec<Job>,
}

/// A workflow job.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Job ID.
    pub id: u64,
    /// Owning run ID.
    pub run_id: u64,
    /// Job name.
    pub name: String,
    /// Job status.
    pub status: String,
    /// Job conclusion.
    pub conclusion: Option<String>,
    /// Head SHA.
    pub head_sha: String,
    /// Start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// HTML URL.
    pub html_url: Option<String>,
    /// Steps.
    #[serde(default)]
    pub steps: Vec<JobStep>,
}

/// A step within a job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStep {
    /// Step name.
    pub name: String,
    /// Step status.
    pub status: String,
    /// Step conclusion.
    pub conclusion: Option<String>,
    /// Step number.
    pub number: u32,
}

/// Artifact listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactList {
    /// Total artifact count.
    pub total_count: u64,
    /// The artifacts.
    pub artifacts: Vec<Artifact>,
}

/// A workflow artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Artifact ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Artifact name.
    pub name: String,
    /// Size in bytes.
    pub size_in_bytes: u64,
    /// Download URL.
    pub archive_download_url: String,
    /// Whether the artifact has expired.
    pub expired: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_id_display() {
        assert_eq!(WorkflowId::Id(42).to_string(), "42");
        assert_eq!(WorkflowId::FileName("ci.yml".into()).to_string(), "ci.yml");
    }
}
