//! Repository operations.

use crate::client::{path_with_params, GitHub};
use crate::errors::{require, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::{Branch, Content, Release, ReleaseAsset, RepoRef, Repository};
use serde::{Deserialize, Serialize};

/// Service for repository operations.
pub struct RepositoriesService<'a> {
    client: &'a GitHub,
}

impl<'a> RepositoriesService<'a> {
    /// Creates a new repositories service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Lists repositories for a user.
    pub async fn list_for_user(
        &self,
        username: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Repository>> {
        require("username", username)?;
        self.client
            .get_all(&format!("/users/{}/repos", username), options)
            .await
    }

    /// Lists repositories for an organization.
    pub async fn list_for_org(&self, org: &str, options: &ApiOptions) -> ApiResult<Vec<Repository>> {
        require("org", org)?;
        self.client
            .get_all(&format!("/orgs/{}/repos", org), options)
            .await
    }

    /// Lists repositories for the authenticated user.
    pub async fn list_for_authenticated_user(
        &self,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Repository>> {
        self.client.get_all("/user/repos", options).await
    }

    /// Gets a repository.
    pub async fn get(&self, repo: &RepoRef) -> ApiResult<Repository> {
        self.client.get(&format!("/{}", repo.api_prefix())).await
    }

    /// Creates a repository for the authenticated user.
    pub async fn create(&self, repository: &NewRepository) -> ApiResult<Repository> {
        require("name", &repository.name)?;
        self.client.post("/user/repos", repository).await
    }

    /// Creates a repository in an organization.
    pub async fn create_for_org(
        &self,
        org: &str,
        repository: &NewRepository,
    ) -> ApiResult<Repository> {
        require("org", org)?;
        require("name", &repository.name)?;
        self.client
            .post(&format!("/orgs/{}/repos", org), repository)
            .await
    }

    /// Updates a repository.
    pub async fn update(&self, repo: &RepoRef, update: &RepositoryUpdate) -> ApiResult<Repository> {
        self.client
            .patch(&format!("/{}", repo.api_prefix()), update)
            .await
    }

    /// Deletes a repository.
    pub async fn delete(&self, repo: &RepoRef) -> ApiResult<()> {
        self.client.delete(&format!("/{}", repo.api_prefix())).await
    }

    // Branches

    /// Lists branches.
    pub async fn list_branches(
        &self,
        repo: &RepoRef,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Branch>> {
        self.client
            .get_all(&format!("/{}/branches", repo.api_prefix()), options)
            .await
    }

    /// Gets a branch.
    pub async fn get_branch(&self, repo: &RepoRef, branch: &str) -> ApiResult<Branch> {
        require("branch", branch)?;
        self.client
            .get(&format!("/{}/branches/{}", repo.api_prefix(), branch))
            .await
    }

    // Contents

    /// Gets repository contents at a path.
    pub async fn get_contents(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<Content> {
        require("path", path)?;
        let mut url = format!("/{}/contents/{}", repo.api_prefix(), path);
        if let Some(r) = git_ref {
            url = format!("{}?ref={}", url, r);
        }
        self.client.get(&url).await
    }

    /// Creates or updates a file.
    pub async fn create_or_update_file(
        &self,
        repo: &RepoRef,
        path: &str,
        request: &FileCommitRequest,
    ) -> ApiResult<FileCommit> {
        require("path", path)?;
        require("message", &request.message)?;
        self.client
            .put(&format!("/{}/contents/{}", repo.api_prefix(), path), request)
            .await
    }

    /// Deletes a file.
    pub async fn delete_file(
        &self,
        repo: &RepoRef,
        path: &str,
        request: &FileDeleteRequest,
    ) -> ApiResult<FileCommit> {
        require("path", path)?;
        require("message", &request.message)?;
        require("sha", &request.sha)?;
        self.client
            .delete_with_body(&format!("/{}/contents/{}", repo.api_prefix(), path), request)
            .await
    }

    // Topics

    /// Lists repository topics.
    pub async fn list_topics(&self, repo: &RepoRef) -> ApiResult<Vec<String>> {
        let topics: TopicsResponse = self
            .client
            .get(&format!("/{}/topics", repo.api_prefix()))
            .await?;
        Ok(topics.names)
    }

    /// Replaces repository topics.
    pub async fn replace_topics(&self, repo: &RepoRef, names: &[String]) -> ApiResult<Vec<String>> {
        let request = TopicsResponse {
            names: names.to_vec(),
        };
        let topics: TopicsResponse = self
            .client
            .put(&format!("/{}/topics", repo.api_prefix()), &request)
            .await?;
        Ok(topics.names)
    }

    // Releases

    /// Lists releases.
    pub async fn list_releases(
        &self,
        repo: &RepoRef,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Release>> {
        self.client
            .get_all(&format!("/{}/releases", repo.api_prefix()), options)
            .await
    }

    /// Gets a release.
    pub async fn get_release(&self, repo: &RepoRef, release_id: u64) -> ApiResult<Release> {
        self.client
            .get(&format!("/{}/releases/{}", repo.api_prefix(), release_id))
            .await
    }

    /// Gets the latest release.
    pub async fn get_latest_release(&self, repo: &RepoRef) -> ApiResult<Release> {
        self.client
            .get(&format!("/{}/releases/latest", repo.api_prefix()))
            .await
    }

    /// Gets a release by tag name.
    pub async fn get_release_by_tag(&self, repo: &RepoRef, tag: &str) -> ApiResult<Release> {
        require("tag", tag)?;
        self.client
            .get(&format!("/{}/releases/tags/{}", repo.api_prefix(), tag))
            .await
    }

    /// Creates a release.
    pub async fn create_release(&self, repo: &RepoRef, release: &NewRelease) -> ApiResult<Release> {
        require("tag_name", &release.tag_name)?;
        self.client
            .post(&format!("/{}/releases", repo.api_prefix()), release)
            .await
    }

    /// Updates a release.
    pub async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> ApiResult<Release> {
        self.client
            .patch(
                &format!("/{}/releases/{}", repo.api_prefix(), release_id),
                update,
            )
            .await
    }

    /// Deletes a release.
    pub async fn delete_release(&self, repo: &RepoRef, release_id: u64) -> ApiResult<()> {
        self.client
            .delete(&format!("/{}/releases/{}", repo.api_prefix(), release_id))
            .await
    }

    /// Lists assets for a release.
    pub async fn list_release_assets(
        &self,
        repo: &RepoRef,
        release_id: u64,
        options: &ApiOptions,
    ) -> ApiResult<Vec<ReleaseAsset>> {
        self.client
            .get_all(
                &format!("/{}/releases/{}/assets", repo.api_prefix(), release_id),
                options,
            )
            .await
    }

    // Forks

    /// Lists forks of a repository.
    pub async fn list_forks(
        &self,
        repo: &RepoRef,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Repository>> {
        self.client
            .get_all(&format!("/{}/forks", repo.api_prefix()), options)
            .await
    }

    /// Lists repository languages with byte counts.
    pub async fn list_languages(
        &self,
        repo: &RepoRef,
    ) -> ApiResult<std::collections::HashMap<String, u64>> {
        self.client
            .get(&format!("/{}/languages", repo.api_prefix()))
            .await
    }

    /// Lists contributors.
    pub async fn list_contributors(
        &self,
        repo: &RepoRef,
        filters: &ContributorFilters,
        options: &ApiOptions,
    ) -> ApiResult<Vec<crate::types::User>> {
        let path = path_with_params(&format!("/{}/contributors", repo.api_prefix()), filters)?;
        self.client.get_all(&path, options).await
    }
}

/// Payload to create a repository.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    /// Repository name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Private flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Enable issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    /// Enable wiki.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    /// Initialize with a README.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    /// Gitignore template name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    /// License template key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

impl NewRepository {
    /// Creates a payload with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            homepage: None,
            private: None,
            has_issues: None,
            has_wiki: None,
            auto_init: None,
            gitignore_template: None,
            license_template: None,
        }
    }
}

/// Payload to update a repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepositoryUpdate {
    /// Repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Private flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Default branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Archive the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Payload to create or update a file.
#[derive(Debug, Clone, Serialize)]
pub struct FileCommitRequest {
    /// Commit message.
    pub message: String,
    /// File content, base64 encoded.
    pub content: String,
    /// Blob SHA of the file being replaced (updates only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Target branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Payload to delete a file.
#[derive(Debug, Clone, Serialize)]
pub struct FileDeleteRequest {
    /// Commit message.
    pub message: String,
    /// Blob SHA of the file being deleted.
    pub sha: String,
    /// Target branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Response for file create/update/delete.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommit {
    /// The affected content entry (absent on delete).
    pub content: Option<Content>,
    /// The created commit.
    pub commit: FileCommitInfo,
}

/// Commit info in a file commit response.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommitInfo {
    /// Commit SHA.
    pub sha: String,
    /// Commit URL.
    pub url: String,
    /// HTML URL.
    pub html_url: Option<String>,
    /// Commit message.
    pub message: Option<String>,
}

/// Payload to create a release.
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease {
    /// Tag name.
    pub tag_name: String,
    /// Target commitish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    /// Release name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Draft flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Prerelease flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

impl NewRelease {
    /// Creates a payload with only a tag name.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            target_commitish: None,
            name: None,
            body: None,
            draft: None,
            prerelease: None,
        }
    }
}

/// Payload to update a release.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReleaseUpdate {
    /// Tag name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Release name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Draft flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Prerelease flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

/// Filters for listing contributors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContributorFilters {
    /// Include anonymous contributors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TopicsResponse {
    names: Vec<String>,
}
