//! Pull request operations.

use crate::client::{path_with_params, GitHub};
use crate::errors::{require, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::{Comment, PullRequest, PullRequestState, RepoRef, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service for pull request operations.
pub struct PullRequestsService<'a> {
    client: &'a GitHub,
}

impl<'a> PullRequestsService<'a> {
    /// Creates a new pull requests service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Lists pull requests.
    pub async fn list(&self, repo: &RepoRef, options: &ApiOptions) -> ApiResult<Vec<PullRequest>> {
        self.client
            .get_all(&format!("/{}/pulls", repo.api_prefix()), options)
            .await
    }

    /// Lists pull requests with filters.
    pub async fn list_with_filters(
        &self,
        repo: &RepoRef,
        filters: &PullRequestFilters,
        options: &ApiOptions,
    ) -> ApiResult<Vec<PullRequest>> {
        let path = path_with_params(&format!("/{}/pulls", repo.api_prefix()), filters)?;
        self.client.get_all(&path, options).await
    }

    /// Gets a pull request.
    pub async fn get(&self, repo: &RepoRef, number: u32) -> ApiResult<PullRequest> {
        self.client
            .get(&format!("/{}/pulls/{}", repo.api_prefix(), number))
            .await
    }

    /// Creates a pull request.
    pub async fn create(&self, repo: &RepoRef, pull: &NewPullRequest) -> ApiResult<PullRequest> {
        require("title", &pull.title)?;
        require("head", &pull.head)?;
        require("base", &pull.base)?;
        self.client
            .post(&format!("/{}/pulls", repo.api_prefix()), pull)
            .await
    }

    /// Updates a pull request.
    pub async fn update(
        &self,
        repo: &RepoRef,
        number: u32,
        update: &PullRequestUpdate,
    ) -> ApiResult<PullRequest> {
        self.client
            .patch(&format!("/{}/pulls/{}", repo.api_prefix(), number), update)
            .await
    }

    /// Lists commits on a pull request.
    pub async fn list_commits(
        &self,
        repo: &RepoRef,
        number: u32,
        options: &ApiOptions,
    ) -> ApiResult<Vec<PullRequestCommit>> {
        self.client
            .get_all(
                &format!("/{}/pulls/{}/commits", repo.api_prefix(), number),
                options,
            )
            .await
    }

    /// Lists files changed by a pull request.
    pub async fn list_files(
        &self,
        repo: &RepoRef,
        number: u32,
        options: &ApiOptions,
    ) -> ApiResult<Vec<PullRequestFile>> {
        self.client
            .get_all(
                &format!("/{}/pulls/{}/files", repo.api_prefix(), number),
                options,
            )
            .await
    }

    /// Checks whether a pull request has been merged.
    pub async fn is_merged(&self, repo: &RepoRef, number: u32) -> ApiResult<bool> {
        let result = self
            .client
            .get_no_content(&format!("/{}/pulls/{}/merge", repo.api_prefix(), number))
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(e) if *e.kind() == crate::errors::ApiErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Merges a pull request.
    pub async fn merge(
        &self,
        repo: &RepoRef,
        number: u32,
        request: &MergeRequest,
    ) -> ApiResult<MergeResult> {
        self.client
            .put(
                &format!("/{}/pulls/{}/merge", repo.api_prefix(), number),
                request,
            )
            .await
    }

    // Review comments

    /// Lists review comments on a pull request.
    pub async fn list_review_comments(
        &self,
        repo: &RepoRef,
        number: u32,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Comment>> {
        self.client
            .get_all(
                &format!("/{}/pulls/{}/comments", repo.api_prefix(), number),
                options,
            )
            .await
    }

    // Requested reviewers

    /// Requests reviewers for a pull request.
    pub async fn request_reviewers(
        &self,
        repo: &RepoRef,
        number: u32,
        reviewers: &[String],
    ) -> ApiResult<PullRequest> {
        let request = ReviewersRequest {
            reviewers: reviewers.to_vec(),
        };
        self.client
            .post(
                &format!(
                    "/{}/pulls/{}/requested_reviewers",
                    repo.api_prefix(),
                    number
                ),
                &request,
            )
            .await
    }

    /// Removes requested reviewers from a pull request.
    pub async fn remove_requested_reviewers(
        &self,
        repo: &RepoRef,
        number: u32,
        reviewers: &[String],
    ) -> ApiResult<PullRequest> {
        let request = ReviewersRequest {
            reviewers: reviewers.to_vec(),
        };
        self.client
            .delete_with_body(
                &format!(
                    "/{}/pulls/{}/requested_reviewers",
                    repo.api_prefix(),
                    number
                ),
                &request,
            )
            .await
    }

    // Reviews

    /// Lists reviews on a pull request.
    pub async fn list_reviews(
        &self,
        repo: &RepoRef,
        number: u32,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Review>> {
        self.client
            .get_all(
                &format!("/{}/pulls/{}/reviews", repo.api_prefix(), number),
                options,
            )
            .await
    }

    /// Gets a review.
    pub async fn get_review(
        &self,
        repo: &RepoRef,
        number: u32,
        review_id: u64,
    ) -> ApiResult<Review> {
        self.client
            .get(&format!(
                "/{}/pulls/{}/reviews/{}",
                repo.api_prefix(),
                number,
                review_id
            ))
            .await
    }

    /// Creates a review.
    pub async fn create_review(
        &self,
        repo: &RepoRef,
        number: u32,
        review: &NewReview,
    ) -> ApiResult<Review> {
        self.client
            .post(
                &format!("/{}/pulls/{}/reviews", repo.api_prefix(), number),
                review,
            )
            .await
    }

    /// Submits a pending review.
    pub async fn submit_review(
        &self,
        repo: &RepoRef,
        number: u32,
        review_id: u64,
        submission: &SubmitReview,
    ) -> ApiResult<Review> {
        self.client
            .post(
                &format!(
                    "/{}/pulls/{}/reviews/{}/events",
                    repo.api_prefix(),
                    number,
                    review_id
                ),
                submission,
            )
            .await
    }

    /// Dismisses a review.
    pub async fn dismiss_review(
        &self,
        repo: &RepoRef,
        number: u32,
        review_id: u64,
        message: &str,
    ) -> ApiResult<Review> {
        require("message", message)?;
        let request = DismissRequest {
            message: message.to_string(),
        };
        self.client
            .put(
                &format!(
                    "/{}/pulls/{}/reviews/{}/dismissals",
                    repo.api_prefix(),
                    number,
                    review_id
                ),
                &request,
            )
            .await
    }
}

/// Filters for listing pull requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullRequestFilters {
    /// Filter by state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PullRequestStateFilter>,
    /// Filter by head (`user:ref-name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    /// Filter by base branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<PullRequestSort>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<super::SortDirection>,
}

/// Pull request state filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStateFilter {
    /// Open pull requests.
    Open,
    /// Closed pull requests.
    Closed,
    /// All pull requests.
    All,
}

/// Pull request sort field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestSort {
    /// By creation time.
    Created,
    /// By update time.
    Updated,
    /// By popularity.
    Popularity,
    /// By long-running status.
    LongRunning,
}

/// Payload to create a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    /// PR title.
    pub title: String,
    /// Head branch (`user:ref-name` for cross-repo).
    pub head: String,
    /// Base branch.
    pub base: String,
    /// PR body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Draft flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Allow maintainers to modify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

/// Payload to update a pull request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullRequestUpdate {
    /// PR title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// PR body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// PR state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PullRequestState>,
    /// Base branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Allow maintainers to modify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

/// Payload to merge a pull request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequest {
    /// Commit title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,
    /// Commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    /// SHA the head must match for the merge to proceed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Merge method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<MergeMethod>,
}

/// Merge method.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Merge commit.
    Merge,
    /// Squash and merge.
    Squash,
    /// Rebase and merge.
    Rebase,
}

/// Merge result.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeResult {
    /// Merge commit SHA.
    pub sha: Option<String>,
    /// Whether the merge happened.
    pub merged: bool,
    /// Server message.
    pub message: String,
}

/// A commit on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestCommit {
    /// Commit SHA.
    pub sha: String,
    /// Commit detail.
    pub commit: CommitDetail,
    /// HTML URL.
    pub html_url: String,
    /// Author account, when resolvable.
    pub author: Option<User>,
}

/// Commit detail in a pull request commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Commit message.
    pub message: String,
    /// Author signature.
    pub author: Option<CommitSignature>,
}

/// Name/email/date commit signature.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Date.
    pub date: DateTime<Utc>,
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestFile {
    /// Blob SHA.
    pub sha: String,
    /// File path.
    pub filename: String,
    /// Change status (added, removed, modified, renamed).
    pub status: String,
    /// Added lines.
    pub additions: u32,
    /// Removed lines.
    pub deletions: u32,
    /// Total changed lines.
    pub changes: u32,
    /// Patch hunk, when small enough to inline.
    pub patch: Option<String>,
}

/// A pull request review.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    /// Review ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Reviewer.
    pub user: User,
    /// Review body.
    pub body: Option<String>,
    /// Review state.
    pub state: ReviewState,
    /// HTML URL.
    pub html_url: String,
    /// Commit the review applies to.
    pub commit_id: Option<String>,
    /// Submission time.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Review state.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Approved.
    Approved,
    /// Changes requested.
    ChangesRequested,
    /// Commented.
    Commented,
    /// Dismissed.
    Dismissed,
    /// Pending submission.
    Pending,
}

/// Payload to create a review.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewReview {
    /// Commit to review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    /// Review body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Review event; omitted leaves the review pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<ReviewEvent>,
}

/// Review event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    /// Approve the changes.
    Approve,
    /// Request changes.
    RequestChanges,
    /// Comment without approval.
    Comment,
}

/// Payload to submit a pending review.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReview {
    /// Review body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Review event.
    pub event: ReviewEvent,
}

#[derive(Debug, Clone, Serialize)]
struct ReviewersRequest {
    reviewers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct DismissRequest {
    message: String,
}
