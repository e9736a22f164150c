//! Issue operations.

use crate::client::{path_with_params, GitHub};
use crate::errors::{require, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::{Comment, Issue, IssueState, Label, Milestone, MilestoneState, RepoRef};
use serde::Serialize;

/// Service for issue operations.
pub struct IssuesService<'a> {
    client: &'a GitHub,
}

impl<'a> IssuesService<'a> {
    /// Creates a new issues service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Lists issues in a repository.
    pub async fn list(&self, repo: &RepoRef, options: &ApiOptions) -> ApiResult<Vec<Issue>> {
        self.client
            .get_all(&format!("/{}/issues", repo.api_prefix()), options)
            .await
    }

    /// Lists issues with filters.
    pub async fn list_with_filters(
        &self,
        repo: &RepoRef,
        filters: &IssueFilters,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Issue>> {
        let path = path_with_params(&format!("/{}/issues", repo.api_prefix()), filters)?;
        self.client.get_all(&path, options).await
    }

    /// Gets an issue.
    pub async fn get(&self, repo: &RepoRef, issue_number: u32) -> ApiResult<Issue> {
        self.client
            .get(&format!("/{}/issues/{}", repo.api_prefix(), issue_number))
            .await
    }

    /// Creates an issue.
    pub async fn create(&self, repo: &RepoRef, issue: &NewIssue) -> ApiResult<Issue> {
        require("title", &issue.title)?;
        self.client
            .post(&format!("/{}/issues", repo.api_prefix()), issue)
            .await
    }

    /// Updates an issue.
    pub async fn update(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        update: &IssueUpdate,
    ) -> ApiResult<Issue> {
        self.client
            .patch(
                &format!("/{}/issues/{}", repo.api_prefix(), issue_number),
                update,
            )
            .await
    }

    /// Locks an issue.
    pub async fn lock(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        lock_reason: Option<LockReason>,
    ) -> ApiResult<()> {
        let body = LockRequest { lock_reason };
        self.client
            .put_no_response(
                &format!("/{}/issues/{}/lock", repo.api_prefix(), issue_number),
                &body,
            )
            .await
    }

    /// Unlocks an issue.
    pub async fn unlock(&self, repo: &RepoRef, issue_number: u32) -> ApiResult<()> {
        self.client
            .delete(&format!("/{}/issues/{}/lock", repo.api_prefix(), issue_number))
            .await
    }

    // Comments

    /// Lists comments on an issue.
    pub async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Comment>> {
        self.client
            .get_all(
                &format!("/{}/issues/{}/comments", repo.api_prefix(), issue_number),
                options,
            )
            .await
    }

    /// Gets a comment.
    pub async fn get_comment(&self, repo: &RepoRef, comment_id: u64) -> ApiResult<Comment> {
        self.client
            .get(&format!("/{}/issues/comments/{}", repo.api_prefix(), comment_id))
            .await
    }

    /// Creates a comment.
    pub async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        body: &str,
    ) -> ApiResult<Comment> {
        require("body", body)?;
        let request = CommentRequest {
            body: body.to_string(),
        };
        self.client
            .post(
                &format!("/{}/issues/{}/comments", repo.api_prefix(), issue_number),
                &request,
            )
            .await
    }

    /// Updates a comment.
    pub async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> ApiResult<Comment> {
        require("body", body)?;
        let request = CommentRequest {
            body: body.to_string(),
        };
        self.client
            .patch(
                &format!("/{}/issues/comments/{}", repo.api_prefix(), comment_id),
                &request,
            )
            .await
    }

    /// Deletes a comment.
    pub async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> ApiResult<()> {
        self.client
            .delete(&format!("/{}/issues/comments/{}", repo.api_prefix(), comment_id))
            .await
    }

    // Labels

    /// Lists labels in a repository.
    pub async fn list_labels(&self, repo: &RepoRef, options: &ApiOptions) -> ApiResult<Vec<Label>> {
        self.client
            .get_all(&format!("/{}/labels", repo.api_prefix()), options)
            .await
    }

    /// Gets a label.
    pub async fn get_label(&self, repo: &RepoRef, name: &str) -> ApiResult<Label> {
        require("name", name)?;
        self.client
            .get(&format!("/{}/labels/{}", repo.api_prefix(), name))
            .await
    }

    /// Creates a label.
    pub async fn create_label(&self, repo: &RepoRef, label: &NewLabel) -> ApiResult<Label> {
        require("name", &label.name)?;
        self.client
            .post(&format!("/{}/labels", repo.api_prefix()), label)
            .await
    }

    /// Updates a label.
    pub async fn update_label(
        &self,
        repo: &RepoRef,
        name: &str,
        update: &LabelUpdate,
    ) -> ApiResult<Label> {
        require("name", name)?;
        self.client
            .patch(&format!("/{}/labels/{}", repo.api_prefix(), name), update)
            .await
    }

    /// Deletes a label.
    pub async fn delete_label(&self, repo: &RepoRef, name: &str) -> ApiResult<()> {
        require("name", name)?;
        self.client
            .delete(&format!("/{}/labels/{}", repo.api_prefix(), name))
            .await
    }

    /// Adds labels to an issue.
    pub async fn add_labels(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        labels: &[String],
    ) -> ApiResult<Vec<Label>> {
        let request = LabelsRequest {
            labels: labels.to_vec(),
        };
        self.client
            .post(
                &format!("/{}/issues/{}/labels", repo.api_prefix(), issue_number),
                &request,
            )
            .await
    }

    /// Removes a label from an issue.
    pub async fn remove_label(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        label: &str,
    ) -> ApiResult<()> {
        require("label", label)?;
        self.client
            .delete(&format!(
                "/{}/issues/{}/labels/{}",
                repo.api_prefix(),
                issue_number,
                label
            ))
            .await
    }

    // Milestones

    /// Lists milestones.
    pub async fn list_milestones(
        &self,
        repo: &RepoRef,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Milestone>> {
        self.client
            .get_all(&format!("/{}/milestones", repo.api_prefix()), options)
            .await
    }

    /// Gets a milestone.
    pub async fn get_milestone(
        &self,
        repo: &RepoRef,
        milestone_number: u32,
    ) -> ApiResult<Milestone> {
        self.client
            .get(&format!(
                "/{}/milestones/{}",
                repo.api_prefix(),
                milestone_number
            ))
            .await
    }

    /// Creates a milestone.
    pub async fn create_milestone(
        &self,
        repo: &RepoRef,
        milestone: &NewMilestone,
    ) -> ApiResult<Milestone> {
        require("title", &milestone.title)?;
        self.client
            .post(&format!("/{}/milestones", repo.api_prefix()), milestone)
            .await
    }

    /// Updates a milestone.
    pub async fn update_milestone(
        &self,
        repo: &RepoRef,
        milestone_number: u32,
        update: &MilestoneUpdate,
    ) -> ApiResult<Milestone> {
        self.client
            .patch(
                &format!("/{}/milestones/{}", repo.api_prefix(), milestone_number),
                update,
            )
            .await
    }

    /// Deletes a milestone.
    pub async fn delete_milestone(
        &self,
        repo: &RepoRef,
        milestone_number: u32,
    ) -> ApiResult<()> {
        self.client
            .delete(&format!(
                "/{}/milestones/{}",
                repo.api_prefix(),
                milestone_number
            ))
            .await
    }

    // Assignees

    /// Adds assignees to an issue.
    pub async fn add_assignees(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        assignees: &[String],
    ) -> ApiResult<Issue> {
        let request = AssigneesRequest {
            assignees: assignees.to_vec(),
        };
        self.client
            .post(
                &format!("/{}/issues/{}/assignees", repo.api_prefix(), issue_number),
                &request,
            )
            .await
    }

    /// Removes assignees from an issue.
    pub async fn remove_assignees(
        &self,
        repo: &RepoRef,
        issue_number: u32,
        assignees: &[String],
    ) -> ApiResult<Issue> {
        let request = AssigneesRequest {
            assignees: assignees.to_vec(),
        };
        // The API takes DELETE with a body here
        self.client
            .delete_with_body(
                &format!("/{}/issues/{}/assignees", repo.api_prefix(), issue_number),
                &request,
            )
            .await
    }
}

/// Filters for listing issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueFilters {
    /// Filter by milestone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    /// Filter by state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueStateFilter>,
    /// Filter by assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Filter by creator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Filter by mentioned user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<String>,
    /// Filter by labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<IssueSort>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    /// Filter by update time (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

/// Issue state filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    /// Open issues.
    Open,
    /// Closed issues.
    Closed,
    /// All issues.
    All,
}

/// Issue sort field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    /// By creation time.
    Created,
    /// By update time.
    Updated,
    /// By comment count.
    Comments,
}

/// Sort direction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Payload to create an issue.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,
    /// Issue body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Assignees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    /// Milestone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u32>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl NewIssue {
    /// Creates a payload with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            assignees: None,
            milestone: None,
            labels: None,
        }
    }
}

/// Payload to update an issue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
    /// Issue title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Issue body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Issue state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    /// State reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<StateReason>,
    /// Assignees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    /// Milestone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u32>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// State reason for closing an issue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    /// Work completed.
    Completed,
    /// Will not be worked on.
    NotPlanned,
    /// Reopened.
    Reopened,
}

/// Lock reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    /// Off topic.
    OffTopic,
    /// Too heated.
    TooHeated,
    /// Resolved.
    Resolved,
    /// Spam.
    Spam,
}

#[derive(Debug, Clone, Serialize)]
struct LockRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    lock_reason: Option<LockReason>,
}

#[derive(Debug, Clone, Serialize)]
struct CommentRequest {
    body: String,
}

/// Payload to create a label.
#[derive(Debug, Clone, Serialize)]
pub struct NewLabel {
    /// Label name.
    pub name: String,
    /// Label color (hex without #).
    pub color: String,
    /// Label description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload to update a label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelUpdate {
    /// New label name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Label color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct LabelsRequest {
    labels: Vec<String>,
}

/// Payload to create a milestone.
#[derive(Debug, Clone, Serialize)]
pub struct NewMilestone {
    /// Milestone title.
    pub title: String,
    /// Milestone state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MilestoneState>,
    /// Milestone description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

/// Payload to update a milestone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MilestoneUpdate {
    /// Milestone title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Milestone state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MilestoneState>,
    /// Milestone description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AssigneesRequest {
    assignees: Vec<String>,
}
