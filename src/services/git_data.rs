//! Git data operations (blobs, trees, commits, references, tags).

use crate::client::GitHub;
use crate::errors::{require, ApiError, ApiResult};
use crate::types::RepoRef;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Service for git data operations.
pub struct GitDataService<'a> {
    client: &'a GitHub,
}

impl<'a> GitDataService<'a> {
    /// Creates a new git data service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    // Blob operations

    /// Gets a blob.
    pub async fn get_blob(&self, repo: &RepoRef, sha: &str) -> ApiResult<Blob> {
        require("sha", sha)?;
        self.client
            .get(&format!("/{}/git/blobs/{}", repo.api_prefix(), sha))
            .await
    }

    /// Creates a blob.
    pub async fn create_blob(&self, repo: &RepoRef, blob: &NewBlob) -> ApiResult<BlobReference> {
        self.client
            .post(&format!("/{}/git/blobs", repo.api_prefix()), blob)
            .await
    }

    // Tree operations

    /// Gets a tree.
    pub async fn get_tree(&self, repo: &RepoRef, sha: &str, recursive: bool) -> ApiResult<Tree> {
        require("sha", sha)?;
        let path = if recursive {
            format!("/{}/git/trees/{}?recursive=1", repo.api_prefix(), sha)
        } else {
            format!("/{}/git/trees/{}", repo.api_prefix(), sha)
        };
        self.client.get(&path).await
    }

    /// Creates a tree.
    pub async fn create_tree(&self, repo: &RepoRef, tree: &NewTree) -> ApiResult<Tree> {
        self.client
            .post(&format!("/{}/git/trees", repo.api_prefix()), tree)
            .await
    }

    // Commit operations

    /// Gets a commit.
    pub async fn get_commit(&self, repo: &RepoRef, sha: &str) -> ApiResult<GitCommit> {
        require("sha", sha)?;
        self.client
            .get(&format!("/{}/git/commits/{}", repo.api_prefix(), sha))
            .await
    }

    /// Creates a commit.
    pub async fn create_commit(&self, repo: &RepoRef, commit: &NewCommit) -> ApiResult<GitCommit> {
        require("message", &commit.message)?;
        require("tree", &commit.tree)?;
        self.client
            .post(&format!("/{}/git/commits", repo.api_prefix()), commit)
            .await
    }

    // Reference operations

    /// Lists references, optionally under a namespace (e.g. "heads").
    pub async fn list_refs(
        &self,
        repo: &RepoRef,
        namespace: Option<&str>,
    ) -> ApiResult<Vec<GitReference>> {
        let path = if let Some(ns) = namespace {
            format!("/{}/git/refs/{}", repo.api_prefix(), ns)
        } else {
            format!("/{}/git/refs", repo.api_prefix())
        };
        self.client.get(&path).await
    }

    /// Gets a reference.
    pub async fn get_ref(&self, repo: &RepoRef, ref_name: &str) -> ApiResult<GitReference> {
        require("ref_name", ref_name)?;
        let ref_path = strip_refs_prefix(ref_name);
        self.client
            .get(&format!("/{}/git/refs/{}", repo.api_prefix(), ref_path))
            .await
    }

    /// Creates a reference.
    pub async fn create_ref(
        &self,
        repo: &RepoRef,
        ref_name: &str,
        sha: &str,
    ) -> ApiResult<GitReference> {
        require("ref_name", ref_name)?;
        require("sha", sha)?;
        let request = NewRef {
            ref_name: if ref_name.starts_with("refs/") {
                ref_name.to_string()
            } else {
                format!("refs/{}", ref_name)
            },
            sha: sha.to_string(),
        };
        self.client
            .post(&format!("/{}/git/refs", repo.api_prefix()), &request)
            .await
    }

    /// Updates a reference.
    pub async fn update_ref(
        &self,
        repo: &RepoRef,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> ApiResult<GitReference> {
        require("ref_name", ref_name)?;
        require("sha", sha)?;
        let ref_path = strip_refs_prefix(ref_name);
        let request = UpdateRef {
            sha: sha.to_string(),
            force,
        };
        self.client
            .patch(
                &format!("/{}/git/refs/{}", repo.api_prefix(), ref_path),
                &request,
            )
            .await
    }

    /// Deletes a reference.
    pub async fn delete_ref(&self, repo: &RepoRef, ref_name: &str) -> ApiResult<()> {
        require("ref_name", ref_name)?;
        let ref_path = strip_refs_prefix(ref_name);
        self.client
            .delete(&format!("/{}/git/refs/{}", repo.api_prefix(), ref_path))
            .await
    }

    // Tag operations

    /// Gets an annotated tag.
    pub async fn get_tag(&self, repo: &RepoRef, sha: &str) -> ApiResult<GitTag> {
        require("sha", sha)?;
        self.client
            .get(&format!("/{}/git/tags/{}", repo.api_prefix(), sha))
            .await
    }

    /// Creates an annotated tag.
    pub async fn create_tag(&self, repo: &RepoRef, tag: &NewTag) -> ApiResult<GitTag> {
        require("tag", &tag.tag)?;
        require("object", &tag.object)?;
        self.client
            .post(&format!("/{}/git/tags", repo.api_prefix()), tag)
            .await
    }
}

/// Removes a leading "refs/" if present.
fn strip_refs_prefix(ref_name: &str) -> &str {
    ref_name.strip_prefix("refs/").unwrap_or(ref_name)
}

// Blob types

/// A git blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    /// Blob SHA.
    pub sha: String,
    /// Node ID.
    pub node_id: String,
    /// Size in bytes.
    pub size: u64,
    /// Blob URL.
    pub url: String,
    /// Content (base64 encoded, possibly with embedded newlines).
    pub content: Option<String>,
    /// Content encoding.
    pub encoding: String,
}

impl Blob {
    /// Decodes the blob content to bytes.
    ///
    /// Base64 content arrives with embedded and trailing newlines, which
    /// are stripped before decoding. UTF-8 content passes through as is.
    pub fn decoded_content(&self) -> ApiResult<Vec<u8>> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| ApiError::deserialization("Blob has no content"))?;

        match self.encoding.as_str() {
            "base64" => {
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                BASE64.decode(compact).map_err(|e| {
                    ApiError::deserialization(format!("Invalid base64 blob content: {}", e))
                })
            }
            "utf-8" => Ok(content.as_bytes().to_vec()),
            other => Err(ApiError::deserialization(format!(
                "Unsupported blob encoding: {}",
                other
            ))),
        }
    }
}

/// A reference to a created blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobReference {
    /// Blob SHA.
    pub sha: String,
    /// Blob URL.
    pub url: String,
}

/// Payload to create a blob.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    /// Blob content.
    pub content: String,
    /// Content encoding.
    pub encoding: BlobEncoding,
}

impl NewBlob {
    /// Creates a UTF-8 blob payload.
    pub fn utf8(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: BlobEncoding::Utf8,
        }
    }

    /// Creates a base64 blob payload from raw bytes.
    pub fn base64(bytes: &[u8]) -> Self {
        Self {
            content: BASE64.encode(bytes),
            encoding: BlobEncoding::Base64,
        }
    }
}

/// Blob encoding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobEncoding {
    /// UTF-8 encoding.
    #[serde(rename = "utf-8")]
    Utf8,
    /// Base64 encoding.
    Base64,
}

// Tree types

/// A git tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Tree SHA.
    pub sha: String,
    /// Tree URL.
    pub url: String,
    /// Tree entries.
    pub tree: Vec<TreeEntry>,
    /// Whether the listing was truncated.
    pub truncated: bool,
}

/// A tree entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry path.
    pub path: String,
    /// File mode.
    pub mode: String,
    /// Entry type (blob, tree, commit).
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Entry SHA.
    pub sha: Option<String>,
    /// Size in bytes (blobs only).
    pub size: Option<u64>,
    /// Entry URL.
    pub url: Option<String>,
}

/// Payload to create a tree.
#[derive(Debug, Clone, Serialize)]
pub struct NewTree {
    /// Entries to create.
    pub tree: Vec<NewTreeEntry>,
    /// SHA of the base tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<String>,
}

/// An entry in a tree creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreeEntry {
    /// File path.
    pub path: String,
    /// File mode.
    pub mode: TreeMode,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    /// SHA of an existing object (mutually exclusive with content).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Inline content (mutually exclusive with sha).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Tree entry mode.
#[derive(Debug, Clone, Serialize)]
pub enum TreeMode {
    /// Regular file (100644).
    #[serde(rename = "100644")]
    File,
    /// Executable file (100755).
    #[serde(rename = "100755")]
    Executable,
    /// Subdirectory (040000).
    #[serde(rename = "040000")]
    Subdirectory,
    /// Submodule (160000).
    #[serde(rename = "160000")]
    Submodule,
    /// Symbolic link (120000).
    #[serde(rename = "120000")]
    Symlink,
}

/// Tree entry type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    /// A blob (file).
    Blob,
    /// A tree (directory).
    Tree,
    /// A commit (submodule).
    Commit,
}

// Commit types

/// A git commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitCommit {
    /// Commit SHA.
    pub sha: String,
    /// Node ID.
    pub node_id: String,
    /// Commit URL.
    pub url: String,
    /// Author.
    pub author: GitUser,
    /// Committer.
    pub committer: GitUser,
    /// Commit message.
    pub message: String,
    /// Tree reference.
    pub tree: TreeReference,
    /// Parent commits.
    pub parents: Vec<ParentCommit>,
    /// Signature verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

/// Git user signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitUser {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Date (ISO 8601).
    pub date: String,
}

/// Tree reference in a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeReference {
    /// Tree SHA.
    pub sha: String,
    /// Tree URL.
    pub url: String,
}

/// Parent commit reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentCommit {
    /// Parent SHA.
    pub sha: String,
    /// Parent URL.
    pub url: String,
    /// HTML URL.
    pub html_url: String,
}

/// Signature verification for signed objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    /// Whether the signature verified.
    pub verified: bool,
    /// Verification status reason.
    pub reason: String,
    /// Signature.
    pub signature: Option<String>,
    /// Signed payload.
    pub payload: Option<String>,
}

/// Payload to create a commit.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    /// Commit message.
    pub message: String,
    /// Tree SHA.
    pub tree: String,
    /// Parent SHAs.
    pub parents: Vec<String>,
    /// Author signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitAuthor>,
    /// Committer signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<CommitAuthor>,
    /// PGP signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Commit author/committer signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Timestamp (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// Reference types

/// A git reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitReference {
    /// Reference name (e.g. "refs/heads/main").
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Node ID.
    pub node_id: String,
    /// Reference URL.
    pub url: String,
    /// Object the reference points to.
    pub object: GitObject,
}

/// A git object pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitObject {
    /// Object SHA.
    pub sha: String,
    /// Object type (commit, tree, blob, tag).
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object URL.
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
struct NewRef {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: String,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateRef {
    sha: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    force: bool,
}

// Tag types

/// An annotated git tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitTag {
    /// Tag SHA.
    pub sha: String,
    /// Node ID.
    pub node_id: String,
    /// Tag URL.
    pub url: String,
    /// Tag name.
    pub tag: String,
    /// Tag message.
    pub message: String,
    /// Tagger signature.
    pub tagger: GitUser,
    /// Tagged object.
    pub object: GitObject,
    /// Signature verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

/// Payload to create an annotated tag.
#[derive(Debug, Clone, Serialize)]
pub struct NewTag {
    /// Tag name.
    pub tag: String,
    /// Tag message.
    pub message: String,
    /// SHA of the object to tag.
    pub object: String,
    /// Tagged object type.
    #[serde(rename = "type")]
    pub object_type: TagObjectType,
    /// Tagger signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagger: Option<CommitAuthor>,
}

/// Tag object type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagObjectType {
    /// A commit.
    Commit,
    /// A tree.
    Tree,
    /// A blob.
    Blob,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_roundtrip_utf8() {
        let payload = NewBlob::utf8("hello world");
        assert_eq!(payload.content, "hello world");

        let blob = Blob {
            sha: "abc".into(),
            node_id: "n".into(),
            size: 11,
            url: "u".into(),
            content: Some("hello world".into()),
            encoding: "utf-8".into(),
        };
        assert_eq!(blob.decoded_content().unwrap(), b"hello world");
    }

    #[test]
    fn test_blob_base64_strips_newlines() {
        // The API wraps base64 content and appends a trailing newline
        let blob = Blob {
            sha: "abc".into(),
            node_id: "n".into(),
            size: 11,
            url: "u".into(),
            content: Some("aGVsbG8g\nd29ybGQ=\n".into()),
            encoding: "base64".into(),
        };
        assert_eq!(blob.decoded_content().unwrap(), b"hello world");
    }

    #[test]
    fn test_blob_unknown_encoding_rejected() {
        let blob = Blob {
            sha: "abc".into(),
            node_id: "n".into(),
            size: 0,
            url: "u".into(),
            content: Some("".into()),
            encoding: "utf-16".into(),
        };
        assert!(blob.decoded_content().is_err());
    }

    #[test]
    fn test_new_blob_base64() {
        let payload = NewBlob::base64(b"hello world");
        assert_eq!(payload.content, "aGVsbG8gd29ybGQ=");
    }

    #[test]
    fn test_strip_refs_prefix() {
        assert_eq!(strip_refs_prefix("refs/heads/main"), "heads/main");
        assert_eq!(strip_refs_prefix("heads/main"), "heads/main");
    }
}
