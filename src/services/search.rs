//! Search operations.

use crate::client::GitHub;
use crate::errors::{require, ApiResult};
use crate::types::{Issue, Repository, SearchResults, User};
use serde::{Deserialize, Serialize};

/// Service for search operations.
///
/// Search endpoints answer a `total_count` envelope and are subject to a
/// separate rate-limit resource.
pub struct SearchService<'a> {
    client: &'a GitHub,
}

impl<'a> SearchService<'a> {
    /// Creates a new search service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Searches repositories.
    pub async fn repositories(&self, query: &SearchQuery) -> ApiResult<SearchResults<Repository>> {
        require("q", &query.q)?;
        self.client.get_with_params("/search/repositories", query).await
    }

    /// Searches issues and pull requests.
    pub async fn issues(&self, query: &SearchQuery) -> ApiResult<SearchResults<Issue>> {
        require("q", &query.q)?;
        self.client.get_with_params("/search/issues", query).await
    }

    /// Searches users.
    pub async fn users(&self, query: &SearchQuery) -> ApiResult<SearchResults<User>> {
        require("q", &query.q)?;
        self.client.get_with_params("/search/users", query).await
    }

    /// Searches code.
    pub async fn code(&self, query: &SearchQuery) -> ApiResult<SearchResults<CodeSearchItem>> {
        require("q", &query.q)?;
        self.client.get_with_params("/search/code", query).await
    }
}

/// A search query with optional ordering.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    /// Query string in search syntax (e.g. "repo:octocat/hello state:open").
    pub q: String,
    /// Sort field, endpoint-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SearchOrder>,
}

impl SearchQuery {
    /// Creates a query.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            sort: None,
            order: None,
        }
    }

    /// Sets the sort field.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets the sort order.
    pub fn order(mut self, order: SearchOrder) -> Self {
        self.order = Some(order);
        self
    }
}

/// Search sort order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A code search match.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchItem {
    /// File name.
    pub name: String,
    /// File path.
    pub path: String,
    /// Blob SHA.
    pub sha: String,
    /// HTML URL.
    pub html_url: String,
    /// Containing repository.
    pub repository: Repository,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serialization() {
        let query = SearchQuery::new("language:rust stars:>100")
            .sort("stars")
            .order(SearchOrder::Desc);

        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "q=language%3Arust+stars%3A%3E100&sort=stars&order=desc");
    }
}
