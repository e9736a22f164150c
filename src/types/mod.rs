//! Core data types shared across services.

use crate::errors::{require, ApiResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses a repository either by `owner/name` or by numeric id.
///
/// Every repository-scoped endpoint accepts both addressing variants; the
/// variant only changes the path prefix (`repos/{owner}/{name}` vs
/// `repositories/{id}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoRef {
    /// Address by owner login and repository name.
    Full {
        /// Owner login.
        owner: String,
        /// Repository name.
        name: String,
    },
    /// Address by numeric repository id.
    Id(u64),
}

impl RepoRef {
    /// Creates an `owner/name` reference, rejecting empty components.
    pub fn full(owner: impl Into<String>, name: impl Into<String>) -> ApiResult<Self> {
        let owner = owner.into();
        let name = name.into();
        require("owner", &owner)?;
        require("name", &name)?;
        Ok(Self::Full { owner, name })
    }

    /// Creates a reference by numeric repository id.
    pub fn id(id: u64) -> Self {
        Self::Id(id)
    }

    /// Renders the path prefix for this repository.
    pub(crate) fn api_prefix(&self) -> String {
        match self {
            Self::Full { owner, name } => format!("repos/{}/{}", owner, name),
            Self::Id(id) => format!("repositories/{}", id),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { owner, name } => write!(f, "{}/{}", owner, name),
            Self::Id(id) => write!(f, "#{}", id),
        }
    }
}

/// User (minimal representation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username (login).
    pub login: String,
    /// User node ID.
    pub node_id: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// User type (User, Organization, Bot).
    #[serde(rename = "type")]
    pub user_type: String,
    /// Site admin flag.
    pub site_admin: bool,
    /// Profile URL.
    pub html_url: String,
}

/// Repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Repository name.
    pub name: String,
    /// Full name (owner/repo).
    pub full_name: String,
    /// Owner information.
    pub owner: User,
    /// Whether the repository is private.
    pub private: bool,
    /// Repository description.
    pub description: Option<String>,
    /// Whether the repository is a fork.
    pub fork: bool,
    /// Repository URL.
    pub url: String,
    /// HTML URL.
    pub html_url: String,
    /// Clone URL.
    pub clone_url: String,
    /// SSH URL.
    pub ssh_url: String,
    /// Default branch.
    pub default_branch: String,
    /// Primary language.
    pub language: Option<String>,
    /// Fork count.
    pub forks_count: u32,
    /// Stargazer count.
    pub stargazers_count: u32,
    /// Watcher count.
    pub watchers_count: u32,
    /// Open issue count.
    pub open_issues_count: u32,
    /// Repository size in KB.
    pub size: u64,
    /// Topics.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Whether issues are enabled.
    #[serde(default = "default_true")]
    pub has_issues: bool,
    /// Whether wiki is enabled.
    #[serde(default = "default_true")]
    pub has_wiki: bool,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// Whether the repository is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// License information.
    pub license: Option<License>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Last push time.
    pub pushed_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Repository license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// License key.
    pub key: String,
    /// License name.
    pub name: String,
    /// SPDX ID.
    pub spdx_id: Option<String>,
    /// License URL.
    pub url: Option<String>,
}

/// Branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Commit reference.
    pub commit: BranchCommit,
    /// Whether branch is protected.
    pub protected: bool,
}

/// Branch commit reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCommit {
    /// Commit SHA.
    pub sha: String,
    /// Commit URL.
    pub url: String,
}

/// Issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Issue number.
    pub number: u32,
    /// Issue title.
    pub title: String,
    /// Issue body.
    pub body: Option<String>,
    /// Issue state.
    pub state: IssueState,
    /// Issue author.
    pub user: User,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Milestone.
    pub milestone: Option<Milestone>,
    /// Whether the issue is locked.
    #[serde(default)]
    pub locked: bool,
    /// Lock reason.
    pub active_lock_reason: Option<String>,
    /// Comment count.
    pub comments: u32,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Close time.
    pub closed_at: Option<DateTime<Utc>>,
    /// User who closed the issue.
    pub closed_by: Option<User>,
}

/// Issue state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open issue.
    Open,
    /// Closed issue.
    Closed,
}

/// Label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Label name.
    pub name: String,
    /// Label description.
    pub description: Option<String>,
    /// Label color (hex).
    pub color: String,
    /// Default label flag.
    #[serde(default)]
    pub default: bool,
}

/// Milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Milestone number.
    pub number: u32,
    /// Milestone title.
    pub title: String,
    /// Milestone description.
    pub description: Option<String>,
    /// Milestone state.
    pub state: MilestoneState,
    /// Creator.
    pub creator: User,
    /// Open issue count.
    pub open_issues: u32,
    /// Closed issue count.
    pub closed_issues: u32,
    /// Due date.
    pub due_on: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Close time.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Milestone state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    /// Open milestone.
    Open,
    /// Closed milestone.
    Closed,
}

/// Comment (issues, pull requests).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Comment body.
    pub body: String,
    /// Comment author.
    pub user: User,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// PR number.
    pub number: u32,
    /// PR title.
    pub title: String,
    /// PR body.
    pub body: Option<String>,
    /// PR state.
    pub state: PullRequestState,
    /// PR author.
    pub user: User,
    /// Head branch info.
    pub head: PullRequestRef,
    /// Base branch info.
    pub base: PullRequestRef,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Requested reviewers.
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
    /// Milestone.
    pub milestone: Option<Milestone>,
    /// Whether the PR is locked.
    #[serde(default)]
    pub locked: bool,
    /// Whether the PR is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Whether the PR is merged.
    #[serde(default)]
    pub merged: bool,
    /// Merge commit SHA.
    pub merge_commit_sha: Option<String>,
    /// User who merged the PR.
    pub merged_by: Option<User>,
    /// Merged time.
    pub merged_at: Option<DateTime<Utc>>,
    /// Whether the PR is mergeable (None while the server computes it).
    pub mergeable: Option<bool>,
    /// Mergeable state (e.g. "clean", "dirty", "blocked").
    pub mergeable_state: Option<String>,
    /// Comment count.
    pub comments: u32,
    /// Commit count.
    pub commits: u32,
    /// Additions.
    pub additions: u32,
    /// Deletions.
    pub deletions: u32,
    /// Changed files count.
    pub changed_files: u32,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Close time.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Pull request state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Open PR.
    Open,
    /// Closed PR.
    Closed,
}

/// Pull request branch reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Branch label.
    pub label: String,
    /// Branch name.
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA.
    pub sha: String,
    /// User.
    pub user: User,
    /// Repository.
    pub repo: Option<Repository>,
}

/// Release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Tag name.
    pub tag_name: String,
    /// Target commitish.
    pub target_commitish: String,
    /// Release name.
    pub name: Option<String>,
    /// Release body.
    pub body: Option<String>,
    /// Whether it's a draft.
    pub draft: bool,
    /// Whether it's a prerelease.
    pub prerelease: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Publish time.
    pub published_at: Option<DateTime<Utc>>,
    /// Author.
    pub author: User,
    /// Assets.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
    /// HTML URL.
    pub html_url: String,
    /// Tarball URL.
    pub tarball_url: Option<String>,
    /// Zipball URL.
    pub zipball_url: Option<String>,
}

/// Release asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Asset name.
    pub name: String,
    /// Asset label.
    pub label: Option<String>,
    /// Content type.
    pub content_type: String,
    /// Asset state.
    pub state: String,
    /// Asset size in bytes.
    pub size: u64,
    /// Download count.
    pub download_count: u64,
    /// Browser download URL.
    pub browser_download_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Uploader.
    pub uploader: User,
}

/// Repository content (file or directory entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Content encoding.
    pub encoding: Option<String>,
    /// Content size.
    pub size: u64,
    /// Content name.
    pub name: String,
    /// Content path.
    pub path: String,
    /// Content (base64 encoded for files).
    pub content: Option<String>,
    /// Git SHA.
    pub sha: String,
    /// Content URL.
    pub url: String,
    /// HTML URL.
    pub html_url: String,
    /// Git URL.
    pub git_url: Option<String>,
    /// Download URL.
    pub download_url: Option<String>,
}

/// Content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// File content.
    File,
    /// Directory content.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Git submodule.
    Submodule,
}

/// Workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Workflow name.
    pub name: String,
    /// Workflow path.
    pub path: String,
    /// Workflow state.
    pub state: WorkflowState,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// HTML URL.
    pub html_url: String,
    /// Badge URL.
    pub badge_url: String,
}

/// Workflow state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Active workflow.
    Active,
    /// Deleted workflow.
    Deleted,
    /// Disabled because the fork is inactive.
    DisabledFork,
    /// Disabled by inactivity.
    DisabledInactivity,
    /// Disabled manually.
    DisabledManually,
    /// Unknown state.
    Unknown,
}

/// Workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Run ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Run name.
    pub name: Option<String>,
    /// Workflow ID.
    pub workflow_id: u64,
    /// Run number.
    pub run_number: u32,
    /// Run attempt.
    pub run_attempt: u32,
    /// Event that triggered the run.
    pub event: String,
    /// Run status.
    pub status: Option<WorkflowRunStatus>,
    /// Run conclusion.
    pub conclusion: Option<WorkflowRunConclusion>,
    /// Head branch.
    pub head_branch: Option<String>,
    /// Head SHA.
    pub head_sha: String,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Run start time.
    pub run_started_at: Option<DateTime<Utc>>,
}

/// Workflow run status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowRunStatus {
    /// Queued.
    Queued,
    /// In progress.
    InProgress,
    /// Completed.
    Completed,
    /// Waiting.
    Waiting,
    /// Requested.
    Requested,
    /// Pending.
    Pending,
}

/// Workflow run conclusion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowRunConclusion {
    /// Success.
    Success,
    /// Failure.
    Failure,
    /// Neutral.
    Neutral,
    /// Cancelled.
    Cancelled,
    /// Skipped.
    Skipped,
    /// Timed out.
    TimedOut,
    /// Action required.
    ActionRequired,
    /// Stale.
    Stale,
}

/// Organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: u64,
    /// Node ID.
    pub node_id: String,
    /// Organization login.
    pub login: String,
    /// Organization name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Blog URL.
    pub blog: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar_url: String,
    /// HTML URL.
    pub html_url: String,
    /// Public repos count.
    pub public_repos: u32,
    /// Followers count.
    pub followers: u32,
    /// Following count.
    pub following: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Organization membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgMembership {
    /// Membership state.
    pub state: MembershipState,
    /// Membership role.
    pub role: MembershipRole,
    /// The member.
    pub user: User,
    /// The organization.
    pub organization: Organization,
}

/// Organization membership state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    /// Active member.
    Active,
    /// Invitation pending.
    Pending,
}

/// Organization membership role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Organization administrator.
    Admin,
    /// Regular member.
    Member,
    /// Billing manager.
    BillingManager,
}

/// Search results envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults<T> {
    /// Total count of matches.
    pub total_count: u64,
    /// Whether results are incomplete (search timed out).
    #[serde(default)]
    pub incomplete_results: bool,
    /// The matching items.
    pub items: Vec<T>,
}

/// Package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Package ID.
    pub id: u64,
    /// Package name.
    pub name: String,
    /// Package ecosystem.
    pub package_type: PackageType,
    /// Owner.
    pub owner: Option<User>,
    /// Number of versions.
    pub version_count: u32,
    /// Visibility ("public" or "private").
    pub visibility: String,
    /// Package URL.
    pub url: String,
    /// HTML URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Package ecosystem.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// npm registry.
    Npm,
    /// Maven registry.
    Maven,
    /// RubyGems registry.
    Rubygems,
    /// Docker registry.
    Docker,
    /// NuGet registry.
    Nuget,
    /// Container registry.
    Container,
}

impl PackageType {
    /// Renders the path segment for this ecosystem.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Maven => "maven",
            Self::Rubygems => "rubygems",
            Self::Docker => "docker",
            Self::Nuget => "nuget",
            Self::Container => "container",
        }
    }
}

/// Package version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Version ID.
    pub id: u64,
    /// Version name (e.g. "1.2.3").
    pub name: String,
    /// Version URL.
    pub url: String,
    /// HTML URL of the owning package.
    pub package_html_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_prefixes() {
        let by_name = RepoRef::full("octocat", "hello-world").unwrap();
        assert_eq!(by_name.api_prefix(), "repos/octocat/hello-world");
        assert_eq!(by_name.to_string(), "octocat/hello-world");

        let by_id = RepoRef::id(1296269);
        assert_eq!(by_id.api_prefix(), "repositories/1296269");
    }

    #[test]
    fn test_repo_ref_rejects_empty_components() {
        assert!(RepoRef::full("", "hello-world").is_err());
        assert!(RepoRef::full("octocat", " ").is_err());
    }

    #[test]
    fn test_deserialize_user() {
        let json = r#"{
            "id": 1,
            "login": "octocat",
            "node_id": "MDQ6VXNlcjE=",
            "avatar_url": "https://github.com/images/error/octocat_happy.gif",
            "type": "User",
            "site_admin": false,
            "html_url": "https://github.com/octocat"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.id, 1);
    }

    #[test]
    fn test_issue_state() {
        assert_eq!(
            serde_json::from_str::<IssueState>(r#""open""#).unwrap(),
            IssueState::Open
        );
        assert_eq!(
            serde_json::from_str::<IssueState>(r#""closed""#).unwrap(),
            IssueState::Closed
        );
    }

    #[test]
    fn test_search_results_envelope() {
        let json = r#"{"total_count": 2, "incomplete_results": false, "items": [1, 2]}"#;
        let results: SearchResults<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(results.total_count, 2);
        assert_eq!(results.items, vec![1, 2]);
    }
}
