//! Response metadata captured from the most recent API call.

use crate::pagination::PageLinks;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

/// Rate limit counters parsed from `X-RateLimit-*` response headers.
#[derive(Debug, Clone)]
pub struct RateLimit {
    /// Maximum requests allowed in the current window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// Time at which the window resets.
    pub reset_at: DateTime<Utc>,
    /// `Retry-After` header value in seconds, if present.
    pub retry_after: Option<u64>,
    /// Resource category (e.g. "core", "search").
    pub resource: Option<String>,
}

impl RateLimit {
    /// Parses rate limit counters from response headers.
    ///
    /// Returns `None` unless all three `x-ratelimit-*` counters are present
    /// and well-formed.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_value(headers, "x-ratelimit-limit")?.parse().ok()?;
        let remaining = header_value(headers, "x-ratelimit-remaining")?.parse().ok()?;
        let reset_timestamp: i64 = header_value(headers, "x-ratelimit-reset")?.parse().ok()?;
        let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

        let retry_after = header_value(headers, "retry-after").and_then(|v| v.parse().ok());
        let resource = header_value(headers, "x-ratelimit-resource").map(String::from);

        Some(Self {
            limit,
            remaining,
            reset_at,
            retry_after,
            resource,
        })
    }

    /// Returns true if the window is fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, if the reset lies in the future.
    pub fn seconds_until_reset(&self) -> Option<u64> {
        let now = Utc::now();
        if self.reset_at > now {
            Some((self.reset_at - now).num_seconds() as u64)
        } else {
            None
        }
    }
}

/// Metadata snapshot from the most recent API response.
///
/// The client overwrites one process-wide snapshot on every request, so
/// under concurrent calls the last writer wins. Callers needing per-call
/// metadata must not interleave concurrent calls on one client instance.
#[derive(Debug, Clone, Default)]
pub struct ApiInfo {
    /// Entity tag of the response, usable for conditional requests.
    pub etag: Option<String>,
    /// Pagination links parsed from the `Link` header.
    pub links: PageLinks,
    /// Rate limit counters, when the response carried them.
    pub rate_limit: Option<RateLimit>,
    /// Server-assigned request id.
    pub request_id: Option<String>,
}

impl ApiInfo {
    /// Builds a snapshot from response headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            etag: header_value(headers, "etag").map(String::from),
            links: PageLinks::from_headers(headers),
            rate_limit: RateLimit::from_headers(headers),
            request_id: header_value(headers, "x-github-request-id").map(String::from),
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                name.parse::<HeaderName>().unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let map = headers(&[
            ("x-ratelimit-limit", "5000"),
            ("x-ratelimit-remaining", "4999"),
            ("x-ratelimit-reset", "1714000000"),
            ("x-ratelimit-resource", "core"),
        ]);

        let limit = RateLimit::from_headers(&map).unwrap();
        assert_eq!(limit.limit, 5000);
        assert_eq!(limit.remaining, 4999);
        assert_eq!(limit.reset_at.timestamp(), 1714000000);
        assert_eq!(limit.resource.as_deref(), Some("core"));
        assert!(!limit.is_exhausted());
    }

    #[test]
    fn test_rate_limit_requires_all_counters() {
        let map = headers(&[("x-ratelimit-limit", "5000")]);
        assert!(RateLimit::from_headers(&map).is_none());
    }

    #[test]
    fn test_api_info_from_headers() {
        let map = headers(&[
            ("etag", "\"644b5b0155e6404a9cc4bd9d8b1ae730\""),
            ("x-github-request-id", "DD0E:6011"),
            (
                "link",
                "<https://api.github.com/repos?page=2>; rel=\"next\"",
            ),
        ]);

        let info = ApiInfo::from_headers(&map);
        assert_eq!(info.etag.as_deref(), Some("\"644b5b0155e6404a9cc4bd9d8b1ae730\""));
        assert_eq!(info.request_id.as_deref(), Some("DD0E:6011"));
        assert!(info.links.has_next());
        assert!(info.rate_limit.is_none());
    }
}
