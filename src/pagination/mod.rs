//! Link-header pagination handling.

use crate::client::GitHub;
use crate::errors::{ApiError, ApiErrorKind, ApiResult};
use futures::Stream;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Largest page size the API will serve.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A pagination relation name from a `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rel {
    /// The page after the current one.
    Next,
    /// The page before the current one.
    Prev,
    /// The first page of the collection.
    First,
    /// The last page of the collection.
    Last,
}

impl Rel {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "next" => Some(Self::Next),
            "prev" => Some(Self::Prev),
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Pagination relations advertised through a response's `Link` header.
///
/// The header carries comma-separated `<url>; rel="name"` entries
/// (RFC 8288). Only the four pagination rels are retained; unknown rels
/// and malformed entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct PageLinks {
    rels: Vec<(Rel, String)>,
}

impl PageLinks {
    /// Parses the `Link` header out of a response header map.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Parses a raw `Link` header value.
    pub fn parse(header: &str) -> Self {
        Self {
            rels: header.split(',').filter_map(parse_entry).collect(),
        }
    }

    /// URL advertised for a relation.
    pub fn get(&self, rel: Rel) -> Option<&str> {
        self.rels
            .iter()
            .find(|(r, _)| *r == rel)
            .map(|(_, url)| url.as_str())
    }

    /// URL of the next page.
    pub fn next(&self) -> Option<&str> {
        self.get(Rel::Next)
    }

    /// Returns true when the server advertised a next page.
    pub fn has_next(&self) -> bool {
        self.next().is_some()
    }
}

/// Parses one `<url>; rel="name"` entry.
fn parse_entry(entry: &str) -> Option<(Rel, String)> {
    let mut segments = entry.split(';').map(str::trim);
    let url = segments.next()?.strip_prefix('<')?.strip_suffix('>')?;
    let rel = segments.find_map(|param| {
        let name = param.strip_prefix("rel=")?;
        Rel::from_name(name.trim_matches('"'))
    })?;
    Some((rel, url.to_string()))
}

/// One decoded page of a list response.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The decoded items, in server order.
    pub items: Vec<T>,
    /// Relations advertised by the response's `Link` header.
    pub links: PageLinks,
    /// Page number, when it could be determined.
    pub page: Option<u32>,
    /// Requested items per page, when one was set.
    pub per_page: Option<u32>,
}

impl<T> Page<T> {
    /// Returns true when the server advertised a page after this one.
    pub fn has_next(&self) -> bool {
        self.links.has_next()
    }

    /// URL of the next page.
    pub fn next_url(&self) -> Option<&str> {
        self.links.next()
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page, keeping only the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Pagination bounds for list requests.
///
/// `page_size` and `page_count`, when set, must be positive; `start_page`,
/// when set, must be at least 1. `start_page` skips directly to that page
/// rather than iterating from page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOptions {
    page_size: Option<u32>,
    page_count: Option<u32>,
    start_page: Option<u32>,
}

impl ApiOptions {
    /// Creates empty options: server defaults, all pages.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the number of items per page.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sets the maximum number of pages to fetch.
    pub fn page_count(mut self, count: u32) -> Self {
        self.page_count = Some(count);
        self
    }

    /// Sets the page to start fetching from (1-indexed).
    pub fn start_page(mut self, page: u32) -> Self {
        self.start_page = Some(page);
        self
    }

    /// Gets the configured page size.
    pub fn get_page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Gets the configured page count.
    pub fn get_page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Gets the configured start page.
    pub fn get_start_page(&self) -> Option<u32> {
        self.start_page
    }

    /// Checks the option invariants.
    pub fn validate(&self) -> ApiResult<()> {
        if self.page_size == Some(0) {
            return Err(ApiError::new(
                ApiErrorKind::InvalidParameter,
                "page_size must be a positive integer",
            ));
        }
        if self.page_count == Some(0) {
            return Err(ApiError::new(
                ApiErrorKind::InvalidParameter,
                "page_count must be a positive integer",
            ));
        }
        if self.start_page == Some(0) {
            return Err(ApiError::new(
                ApiErrorKind::InvalidParameter,
                "start_page must be at least 1",
            ));
        }
        Ok(())
    }

    /// Converts to query parameters for the first request.
    ///
    /// Page sizes above the API maximum of 100 are clamped; the server
    /// would clamp them anyway.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(size) = self.page_size {
            params.push(("per_page".to_string(), size.min(MAX_PAGE_SIZE).to_string()));
        }
        if let Some(page) = self.start_page {
            params.push(("page".to_string(), page.to_string()));
        }
        params
    }
}

/// Follows `rel="next"` links page by page, bounded by `page_count`.
pub struct Paginator<'a, T> {
    client: &'a GitHub,
    state: PaginatorState,
    page_limit: Option<u32>,
    pages_fetched: u32,
    _marker: PhantomData<fn() -> T>,
}

enum PaginatorState {
    Start { path: String, options: ApiOptions },
    Next(String),
    Done,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    /// Creates a paginator for a list endpoint.
    ///
    /// Fails fast when the options violate their invariants.
    pub fn new(client: &'a GitHub, path: impl Into<String>, options: ApiOptions) -> ApiResult<Self> {
        options.validate()?;
        let page_limit = options.get_page_count();
        Ok(Self {
            client,
            state: PaginatorState::Start {
                path: path.into(),
                options,
            },
            page_limit,
            pages_fetched: 0,
            _marker: PhantomData,
        })
    }

    /// Fetches the next page, or `None` when exhausted.
    pub async fn next_page(&mut self) -> ApiResult<Option<Page<T>>> {
        let page = match std::mem::replace(&mut self.state, PaginatorState::Done) {
            PaginatorState::Start { path, options } => {
                self.client.fetch_page(&path, &options).await?
            }
            PaginatorState::Next(url) => self.client.fetch_page_at(&url).await?,
            PaginatorState::Done => return Ok(None),
        };

        self.pages_fetched += 1;
        let at_limit = self
            .page_limit
            .map_or(false, |limit| self.pages_fetched >= limit);
        if !at_limit {
            if let Some(next) = page.links.next() {
                self.state = PaginatorState::Next(next.to_string());
            }
        }

        Ok(Some(page))
    }

    /// Collects all remaining items, in server order.
    pub async fn collect_all(mut self) -> ApiResult<Vec<T>> {
        let mut all_items = Vec::new();

        while let Some(page) = self.next_page().await? {
            all_items.extend(page.into_items());
        }

        Ok(all_items)
    }

    /// Adapts the paginator into a stream of pages.
    pub fn into_stream(self) -> impl Stream<Item = ApiResult<Page<T>>> + 'a
    where
        T: 'a,
    {
        futures::stream::try_unfold(self, |mut pager| async move {
            match pager.next_page().await? {
                Some(page) => Ok(Some((page, pager))),
                None => Ok(None),
            }
        })
    }
}

/// Extracts the `page` query parameter from a URL.
pub fn extract_page_number(url: &str) -> Option<u32> {
    url::Url::parse(url).ok().and_then(|u| {
        u.query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rels_from_link_header() {
        let links = PageLinks::parse(
            "<https://api.github.com/repositories/1296269/issues?per_page=2&page=4>; rel=\"next\", \
             <https://api.github.com/repositories/1296269/issues?per_page=2&page=2>; rel=\"prev\", \
             <https://api.github.com/repositories/1296269/issues?per_page=2&page=1>; rel=\"first\", \
             <https://api.github.com/repositories/1296269/issues?per_page=2&page=9>; rel=\"last\"",
        );

        assert!(links.has_next());
        assert_eq!(extract_page_number(links.next().unwrap()), Some(4));
        assert_eq!(extract_page_number(links.get(Rel::Prev).unwrap()), Some(2));
        assert_eq!(extract_page_number(links.get(Rel::First).unwrap()), Some(1));
        assert_eq!(extract_page_number(links.get(Rel::Last).unwrap()), Some(9));
    }

    #[test]
    fn test_parse_skips_unknown_rels_and_malformed_entries() {
        let links = PageLinks::parse(
            "<https://api.github.com/items?page=2>; rel=\"next\", \
             <https://api.github.com/hub>; rel=\"hub\", \
             no-angle-brackets; rel=\"prev\", \
             <https://api.github.com/items?page=5>",
        );

        assert!(links.next().unwrap().ends_with("page=2"));
        assert!(links.get(Rel::Prev).is_none());
        assert!(links.get(Rel::Last).is_none());
    }

    #[test]
    fn test_parse_empty_header() {
        let links = PageLinks::parse("");
        assert!(!links.has_next());
        assert!(links.get(Rel::First).is_none());
    }

    #[test]
    fn test_options_query() {
        let options = ApiOptions::none().page_size(50).start_page(3);
        let query = options.to_query();

        assert!(query.contains(&("per_page".to_string(), "50".to_string())));
        assert!(query.contains(&("page".to_string(), "3".to_string())));
    }

    #[test]
    fn test_page_size_clamped() {
        let options = ApiOptions::none().page_size(200);
        let query = options.to_query();
        assert!(query.contains(&("per_page".to_string(), "100".to_string())));
    }

    #[test]
    fn test_options_invariants() {
        assert!(ApiOptions::none().validate().is_ok());
        assert!(ApiOptions::none().page_size(1).page_count(1).start_page(1).validate().is_ok());
        assert!(ApiOptions::none().page_size(0).validate().is_err());
        assert!(ApiOptions::none().page_count(0).validate().is_err());
        assert!(ApiOptions::none().start_page(0).validate().is_err());
    }

    #[test]
    fn test_page_accessors() {
        let page = Page {
            items: vec![1, 2, 3],
            links: PageLinks::default(),
            page: Some(1),
            per_page: Some(30),
        };

        assert_eq!(page.len(), 3);
        assert!(!page.is_empty());
        assert!(!page.has_next());
        assert!(page.next_url().is_none());
        assert_eq!(page.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn test_extract_page_number() {
        assert_eq!(
            extract_page_number("https://api.github.com/repos?per_page=30&page=7"),
            Some(7)
        );
        assert_eq!(extract_page_number("https://api.github.com/repos"), None);
    }
}
