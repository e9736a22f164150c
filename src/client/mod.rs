//! API client and HTTP transport.

use crate::auth::{CredentialProvider, CredentialStore, Credentials, EnvCredentialProvider, InstallationToken};
use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::errors::{ApiError, ApiErrorKind, ApiResult, FieldError};
use crate::meta::{ApiInfo, RateLimit};
use crate::pagination::{extract_page_number, ApiOptions, Page, PageLinks, Paginator, MAX_PAGE_SIZE};
use crate::services::*;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Default media type for REST requests.
const MEDIA_TYPE_JSON: &str = "application/vnd.github+json";

/// Date-based API version header name.
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Error response body format.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: String,
    documentation_url: Option<String>,
    errors: Option<Vec<FieldError>>,
}

/// API client.
///
/// One shared HTTP transport; service accessors expose the per-resource
/// method surface. Every request overwrites the last-call [`ApiInfo`]
/// snapshot (last writer wins under concurrent use).
pub struct GitHub {
    /// HTTP client.
    http: reqwest::Client,
    /// Configuration.
    config: ClientConfig,
    /// Credential store.
    credentials: Arc<CredentialStore>,
    /// Metadata from the most recent response.
    last_api_info: Arc<RwLock<Option<ApiInfo>>>,
}

impl GitHub {
    /// Creates a new client.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                ApiError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let credentials = Arc::new(CredentialStore::new(config.credentials.clone().ok_or_else(
            || ApiError::new(ApiErrorKind::MissingCredentials, "Credentials required"),
        )?));

        Ok(Self {
            http,
            config,
            credentials,
            last_api_info: Arc::new(RwLock::new(None)),
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> GitHubBuilder {
        GitHubBuilder::new()
    }

    /// Creates a client with credentials resolved from a provider.
    pub async fn from_provider(provider: &dyn CredentialProvider) -> ApiResult<Self> {
        let credentials = provider.get_credentials().await?;
        let config = ClientConfig::builder().credentials(credentials).build()?;
        Self::new(config)
    }

    /// Creates a client from the `GITHUB_TOKEN` environment variable.
    pub async fn from_env() -> ApiResult<Self> {
        Self::from_provider(&EnvCredentialProvider::from_github_token()).await
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Gets the metadata snapshot from the most recent API call.
    ///
    /// Overwritten by every request; see [`ApiInfo`] for the concurrency
    /// caveat.
    pub fn api_info(&self) -> Option<ApiInfo> {
        self.last_api_info.read().ok().and_then(|info| info.clone())
    }

    // Service accessors

    /// Gets the repositories service.
    pub fn repositories(&self) -> RepositoriesService {
        RepositoriesService::new(self)
    }

    /// Gets the issues service.
    pub fn issues(&self) -> IssuesService {
        IssuesService::new(self)
    }

    /// Gets the pull requests service.
    pub fn pull_requests(&self) -> PullRequestsService {
        PullRequestsService::new(self)
    }

    /// Gets the git data service.
    pub fn git_data(&self) -> GitDataService {
        GitDataService::new(self)
    }

    /// Gets the actions service.
    pub fn actions(&self) -> ActionsService {
        ActionsService::new(self)
    }

    /// Gets the organizations service.
    pub fn organizations(&self) -> OrganizationsService {
        OrganizationsService::new(self)
    }

    /// Gets the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self)
    }

    /// Gets the search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(self)
    }

    /// Gets the packages service.
    pub fn packages(&self) -> PackagesService {
        PackagesService::new(self)
    }

    // HTTP methods

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
    ) -> ApiResult<T> {
        let path = path_with_params(path, params)?;
        self.request(Method::GET, &path, Option::<&()>::None).await
    }

    /// Makes a GET request with a non-default `Accept` media type.
    ///
    /// Used for preview-gated endpoints.
    pub async fn get_with_accept<T: DeserializeOwned>(
        &self,
        path: &str,
        accept: &str,
    ) -> ApiResult<T> {
        let url = self.build_url(path)?;
        let response = self
            .execute(Method::GET, &url, None, Some(accept), None)
            .await?;
        deserialize_body(response).await
    }

    /// Makes a GET request expecting no response body.
    ///
    /// Existence checks answer 204 on success and 404 otherwise.
    pub async fn get_no_content(&self, path: &str) -> ApiResult<()> {
        self.request_no_response(Method::GET, path, Option::<&()>::None)
            .await
    }

    /// Makes a conditional GET request with an `If-None-Match` etag.
    ///
    /// Returns `None` when the server answers 304 Not Modified.
    pub async fn get_if_none_match<T: DeserializeOwned>(
        &self,
        path: &str,
        etag: &str,
    ) -> ApiResult<Option<T>> {
        let url = self.build_url(path)?;
        let response = self
            .execute(Method::GET, &url, None, None, Some(etag))
            .await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }
        Ok(Some(deserialize_body(response).await?))
    }

    /// Makes a paginated GET request for a single page.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &ApiOptions,
    ) -> ApiResult<Page<T>> {
        options.validate()?;
        self.fetch_page(path, options).await
    }

    /// Creates a paginator over a list endpoint.
    pub fn paginate<'a, T: DeserializeOwned>(
        &'a self,
        path: &str,
        options: &ApiOptions,
    ) -> ApiResult<Paginator<'a, T>> {
        Paginator::new(self, path, options.clone())
    }

    /// Collects all items from a list endpoint, following `next` links.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<T>> {
        self.paginate(path, options)?.collect_all().await
    }

    /// Makes a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Makes a POST request without a response body.
    pub async fn post_no_response<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.request_no_response(Method::POST, path, Some(body)).await
    }

    /// Makes a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Makes a PUT request without a response body.
    pub async fn put_no_response<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.request_no_response(Method::PUT, path, Some(body)).await
    }

    /// Makes a PATCH request.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request_no_response(Method::DELETE, path, Option::<&()>::None)
            .await
    }

    /// Makes a DELETE request carrying a body and returning one.
    pub async fn delete_with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::DELETE, path, Some(body)).await
    }

    // Internal methods

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = self.build_url(path)?;
        let body_bytes = serialize_body(body)?;
        let response = self.execute(method, &url, body_bytes, None, None).await?;
        deserialize_body(response).await
    }

    async fn request_no_response<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<()> {
        let url = self.build_url(path)?;
        let body_bytes = serialize_body(body)?;
        self.execute(method, &url, body_bytes, None, None).await?;
        Ok(())
    }

    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &ApiOptions,
    ) -> ApiResult<Page<T>> {
        let url = append_query(self.build_url(path)?, &options.to_query());
        let response = self.execute(Method::GET, &url, None, None, None).await?;

        let links = PageLinks::from_headers(response.headers());
        let items: Vec<T> = deserialize_body(response).await?;

        Ok(Page {
            items,
            links,
            page: Some(options.get_start_page().unwrap_or(1)),
            per_page: options.get_page_size().map(|size| size.min(MAX_PAGE_SIZE)),
        })
    }

    pub(crate) async fn fetch_page_at<T: DeserializeOwned>(&self, url: &str) -> ApiResult<Page<T>> {
        let response = self.execute(Method::GET, url, None, None, None).await?;

        let links = PageLinks::from_headers(response.headers());
        let page_number = extract_page_number(url);
        let items: Vec<T> = deserialize_body(response).await?;

        Ok(Page {
            items,
            links,
            page: page_number,
            per_page: None,
        })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body_bytes: Option<Vec<u8>>,
        accept: Option<&str>,
        if_none_match: Option<&str>,
    ) -> ApiResult<Response> {
        let auth_header = self.auth_header().await?;
        let started = Instant::now();

        tracing::debug!(
            method = %method,
            url = %url,
            auth = self.credentials.credentials().token_prefix(),
            "API request started"
        );

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, &auth_header)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, accept.unwrap_or(MEDIA_TYPE_JSON))
            .header(API_VERSION_HEADER, &self.config.api_version);

        if let Some(etag) = if_none_match {
            request = request.header("If-None-Match", etag);
        }

        if let Some(bytes) = body_bytes {
            request = request.header("Content-Type", "application/json").body(bytes);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        self.record_api_info(response.headers());

        let status = response.status();
        tracing::info!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "API request completed"
        );

        if status == StatusCode::NOT_MODIFIED && if_none_match.is_some() {
            return Ok(response);
        }

        if !status.is_success() {
            return Err(handle_error_response(response).await);
        }

        Ok(response)
    }

    /// Resolves the `Authorization` header, fetching and caching an
    /// installation token when App credentials carry an installation ID.
    async fn auth_header(&self) -> ApiResult<String> {
        if self.credentials.requires_installation_token() {
            if let Some(header) = self.credentials.cached_installation_header().await {
                return Ok(header);
            }
            return self.fetch_installation_token().await;
        }
        self.credentials.auth_header()
    }

    async fn fetch_installation_token(&self) -> ApiResult<String> {
        let installation_id = self.credentials.installation_id().ok_or_else(|| {
            ApiError::new(ApiErrorKind::MissingCredentials, "Installation ID required")
        })?;
        // App-level JWT authenticates the exchange
        let jwt_header = self.credentials.auth_header()?;
        let url = self.build_url(&format!(
            "app/installations/{}/access_tokens",
            installation_id
        ))?;

        tracing::debug!(installation_id, "Fetching installation token");

        let response = self
            .http
            .request(Method::POST, &url)
            .header(AUTHORIZATION, &jwt_header)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, MEDIA_TYPE_JSON)
            .header(API_VERSION_HEADER, &self.config.api_version)
            .send()
            .await
            .map_err(map_transport_error)?;

        self.record_api_info(response.headers());

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        let token: InstallationToken = deserialize_body(response).await?;
        self.credentials
            .cache_installation_token(&token.token, token.expires_at)
            .await;

        Ok(format!("Bearer {}", token.token))
    }

    fn build_url(&self, path: &str) -> ApiResult<String> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(format!("{}/{}", base, path))
    }

    fn record_api_info(&self, headers: &HeaderMap) {
        let info = ApiInfo::from_headers(headers);
        if let Some(ref limit) = info.rate_limit {
            if limit.is_exhausted() {
                tracing::warn!(
                    limit = limit.limit,
                    reset_at = %limit.reset_at,
                    resource = limit.resource.as_deref().unwrap_or("core"),
                    "Rate limit exhausted"
                );
            }
        }
        if let Ok(mut snapshot) = self.last_api_info.write() {
            *snapshot = Some(info);
        }
    }
}

/// Renders a path plus serialized query parameters.
pub(crate) fn path_with_params<P: Serialize>(path: &str, params: &P) -> ApiResult<String> {
    let query = serde_urlencoded::to_string(params).map_err(|e| {
        ApiError::invalid_parameter(format!("Failed to serialize parameters: {}", e))
    })?;

    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}

fn append_query(url: String, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url;
    }
    let query: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query.join("&"))
}

fn serialize_body<B: Serialize>(body: Option<&B>) -> ApiResult<Option<Vec<u8>>> {
    body.map(serde_json::to_vec).transpose().map_err(|e| {
        ApiError::invalid_parameter(format!("Failed to serialize request body: {}", e))
    })
}

async fn deserialize_body<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json()
        .await
        .map_err(|e| ApiError::deserialization(format!("Failed to deserialize response: {}", e)))
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::timeout(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        ApiError::new(
            ApiErrorKind::ConnectionFailed,
            format!("Connection failed: {}", e),
        )
    } else {
        ApiError::new(ApiErrorKind::Unknown, format!("Request failed: {}", e))
    }
}

async fn handle_error_response(response: Response) -> ApiError {
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-github-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let rate_limit = RateLimit::from_headers(response.headers());
    let rate_limited = (status == StatusCode::FORBIDDEN
        && rate_limit.as_ref().map_or(false, RateLimit::is_exhausted))
        || status == StatusCode::TOO_MANY_REQUESTS;

    let error_body = response.json::<ApiErrorBody>().await.ok();

    let message = error_body
        .as_ref()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| format!("HTTP {} error", status.as_u16()));
    let documentation_url = error_body.as_ref().and_then(|e| e.documentation_url.clone());
    let field_errors = error_body.and_then(|e| e.errors).unwrap_or_default();

    let mut error = ApiError::from_response(
        status.as_u16(),
        rate_limited,
        message,
        documentation_url,
        request_id,
    )
    .with_field_errors(field_errors);

    if let Some(limit) = rate_limit {
        if error.is_rate_limit() {
            tracing::warn!(
                limit = limit.limit,
                reset_at = %limit.reset_at,
                "Rate limit exceeded"
            );
        }
        error = error.with_rate_limit(limit);
    }

    error
}

/// Builder for [`GitHub`].
pub struct GitHubBuilder {
    config_builder: ClientConfigBuilder,
}

impl GitHubBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: ClientConfig::builder(),
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config_builder = self.config_builder.credentials(credentials);
        self
    }

    /// Sets a bearer token.
    pub fn token(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::token(token))
    }

    /// Sets basic-auth credentials.
    pub fn basic(self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::basic(login, password))
    }

    /// Sets GitHub App credentials.
    pub fn app(self, app_id: u64, private_key: impl Into<String>) -> Self {
        self.credentials(Credentials::app(app_id, private_key))
    }

    /// Sets the API version header.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_version(version);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Builds the client.
    pub fn build(self) -> ApiResult<GitHub> {
        let config = self.config_builder.build()?;
        GitHub::new(config)
    }
}

impl Default for GitHubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let client = GitHub::builder().token("test").build().unwrap();

        assert_eq!(
            client.build_url("/repos/owner/repo").unwrap(),
            "https://api.github.com/repos/owner/repo"
        );
        assert_eq!(
            client.build_url("repos/owner/repo").unwrap(),
            "https://api.github.com/repos/owner/repo"
        );
    }

    #[test]
    fn test_client_builder() {
        let result = GitHub::builder()
            .token("ghp_xxxx")
            .user_agent("test-client/1.0")
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_client_requires_credentials() {
        let config = ClientConfig::builder().build().unwrap();
        let result = GitHub::new(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_api_info_starts_empty() {
        let client = GitHub::builder().token("test").build().unwrap();
        assert!(client.api_info().is_none());
    }

    #[tokio::test]
    async fn test_from_provider() {
        use crate::auth::StaticCredentialProvider;

        let provider = StaticCredentialProvider::new(Credentials::token("test"));
        assert!(GitHub::from_provider(&provider).await.is_ok());
    }

    #[test]
    fn test_append_query() {
        assert_eq!(
            append_query("https://x/y".into(), &[("page".into(), "2".into())]),
            "https://x/y?page=2"
        );
        assert_eq!(
            append_query("https://x/y?state=open".into(), &[("page".into(), "2".into())]),
            "https://x/y?state=open&page=2"
        );
        assert_eq!(append_query("https://x/y".into(), &[]), "https://x/y");
    }

    #[test]
    fn test_path_with_params() {
        #[derive(serde::Serialize)]
        struct Params {
            state: &'static str,
        }

        let path = path_with_params("/repos/o/r/issues", &Params { state: "open" }).unwrap();
        assert_eq!(path, "/repos/o/r/issues?state=open");
    }
}
