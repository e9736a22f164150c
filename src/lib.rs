//! # octorest
//!
//! A typed asynchronous client for the GitHub REST API:
//! - One shared HTTP transport with bearer, basic, and GitHub App auth
//! - A service per resource (repositories, issues, pull requests, git
//!   data, actions, organizations, users, search, packages)
//! - Link-header pagination bounded by caller-supplied page options
//! - A deterministic HTTP-status to typed-error mapping
//! - Last-call metadata (rate limit, etag, pagination links) snapshot
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octorest::{ApiOptions, GitHub, RepoRef};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHub::builder()
//!         .token("ghp_xxxxxxxxxxxx")
//!         .build()?;
//!
//!     let repo = RepoRef::full("octocat", "hello-world")?;
//!     let issues = client
//!         .issues()
//!         .list(&repo, &ApiOptions::none().page_size(50).page_count(2))
//!         .await?;
//!     for issue in issues {
//!         println!("#{} {}", issue.number, issue.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Errors surface as [`ApiError`] with a typed [`ApiErrorKind`]: 404 maps
//! to `NotFound`, 422 to `Validation` with field detail, 401 to
//! `Unauthorized`, and a 403 with an exhausted quota to
//! `RateLimitExceeded`. There is no retry layer; callers retry at the
//! application level.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod meta;
pub mod types;

// Authentication
pub mod auth;

// HTTP client and transport
pub mod client;

// Pagination handling
pub mod pagination;

// API services
pub mod services;

// Re-exports for convenience
pub use auth::{CredentialProvider, CredentialStore, Credentials};
pub use client::{GitHub, GitHubBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use errors::{ApiError, ApiErrorKind, ApiResult, FieldError};
pub use meta::{ApiInfo, RateLimit};
pub use pagination::{ApiOptions, Page, PageLinks, Paginator, Rel};
pub use types::*;
