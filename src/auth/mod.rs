//! Authentication for the API.

use crate::errors::{ApiError, ApiErrorKind, ApiResult};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Credentials attached to every outbound request.
///
/// Set once at client construction, immutable thereafter.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Bearer token (PAT, OAuth, or Actions token).
    Token(SecretString),
    /// Basic authentication with login and password.
    Basic {
        /// Account login.
        login: String,
        /// Account password.
        password: SecretString,
    },
    /// GitHub App authentication.
    App(AppCredentials),
}

impl Credentials {
    /// Creates bearer-token credentials.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(SecretString::new(token.into()))
    }

    /// Creates basic-auth credentials.
    pub fn basic(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            login: login.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Creates GitHub App credentials.
    pub fn app(app_id: u64, private_key: impl Into<String>) -> Self {
        Self::App(AppCredentials {
            app_id,
            private_key: SecretString::new(private_key.into()),
            installation_id: None,
        })
    }

    /// Gets the token prefix for logging.
    pub fn token_prefix(&self) -> &'static str {
        match self {
            Self::Token(t) => {
                let exposed = t.expose_secret();
                if exposed.starts_with("ghp_") {
                    "ghp_***"
                } else if exposed.starts_with("github_pat_") {
                    "github_pat_***"
                } else if exposed.starts_with("gho_") {
                    "gho_***"
                } else if exposed.starts_with("ghs_") {
                    "ghs_***"
                } else {
                    "***"
                }
            }
            Self::Basic { .. } => "basic",
            Self::App(_) => "app_jwt",
        }
    }
}

/// GitHub App credentials.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    /// App ID.
    pub app_id: u64,
    /// Private key (PEM format).
    pub private_key: SecretString,
    /// Installation ID, when authenticating as an installation.
    pub installation_id: Option<u64>,
}

impl AppCredentials {
    /// Sets the installation ID.
    pub fn with_installation(mut self, installation_id: u64) -> Self {
        self.installation_id = Some(installation_id);
        self
    }
}

/// JWT claims for GitHub App authentication.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    /// Issued at (Unix timestamp).
    iat: i64,
    /// Expiration (Unix timestamp).
    exp: i64,
    /// Issuer (App ID).
    iss: String,
}

/// Installation token response.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationToken {
    /// Access token.
    pub token: String,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
    /// Permissions granted.
    #[serde(default)]
    pub permissions: std::collections::HashMap<String, String>,
    /// Repository selection.
    pub repository_selection: Option<String>,
}

/// Cached installation token.
#[derive(Debug, Clone)]
struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Holds credentials and a cached installation token.
pub struct CredentialStore {
    credentials: Credentials,
    cached_installation_token: Arc<RwLock<Option<CachedToken>>>,
}

impl CredentialStore {
    /// Creates a new store.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cached_installation_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the held credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Generates the `Authorization` header value for non-installation flows.
    ///
    /// App credentials with an installation ID are resolved by the client,
    /// which fetches and caches installation tokens; this method then only
    /// produces the app-level JWT used for that exchange.
    pub fn auth_header(&self) -> ApiResult<String> {
        match &self.credentials {
            Credentials::Token(token) => Ok(format!("Bearer {}", token.expose_secret())),
            Credentials::Basic { login, password } => {
                let raw = format!("{}:{}", login, password.expose_secret());
                Ok(format!("Basic {}", BASE64.encode(raw)))
            }
            Credentials::App(app) => {
                let jwt = self.generate_jwt(app)?;
                Ok(format!("Bearer {}", jwt))
            }
        }
    }

    /// Generates a JWT for GitHub App authentication.
    fn generate_jwt(&self, app: &AppCredentials) -> ApiResult<String> {
        let now = Utc::now();
        // Issued at: 60 seconds in the past for clock drift tolerance
        let iat = (now - Duration::seconds(60)).timestamp();
        // Expires in 9 minutes (max allowed is 10)
        let exp = (now + Duration::minutes(9)).timestamp();

        let claims = JwtClaims {
            iat,
            exp,
            iss: app.app_id.to_string(),
        };

        let key = EncodingKey::from_rsa_pem(app.private_key.expose_secret().as_bytes())
            .map_err(|e| {
                ApiError::new(
                    ApiErrorKind::InvalidConfiguration,
                    format!("Failed to parse App private key: {}", e),
                )
            })?;

        let header = Header::new(Algorithm::RS256);
        encode(&header, &claims, &key).map_err(|e| {
            ApiError::new(
                ApiErrorKind::Unauthorized,
                format!("Failed to generate App JWT: {}", e),
            )
        })
    }

    /// Gets the cached installation token header if still valid.
    pub async fn cached_installation_header(&self) -> Option<String> {
        let cache = self.cached_installation_token.read().await;
        if let Some(ref cached) = *cache {
            // 5 minute refresh buffer
            if cached.expires_at > Utc::now() + Duration::minutes(5) {
                return Some(format!("Bearer {}", cached.token.expose_secret()));
            }
        }
        None
    }

    /// Caches an installation token.
    pub async fn cache_installation_token(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut cache = self.cached_installation_token.write().await;
        *cache = Some(CachedToken {
            token: SecretString::new(token.to_string()),
            expires_at,
        });
    }

    /// Clears the installation token cache.
    pub async fn clear_cache(&self) {
        let mut cache = self.cached_installation_token.write().await;
        *cache = None;
    }

    /// Returns true if requests must carry an installation token.
    pub fn requires_installation_token(&self) -> bool {
        matches!(&self.credentials, Credentials::App(app) if app.installation_id.is_some())
    }

    /// Gets the installation ID if applicable.
    pub fn installation_id(&self) -> Option<u64> {
        match &self.credentials {
            Credentials::App(app) => app.installation_id,
            _ => None,
        }
    }
}

/// Credential provider trait for dynamic credential resolution.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolves the credentials to construct a client with.
    async fn get_credentials(&self) -> ApiResult<Credentials>;

    /// Checks if credentials are available.
    async fn is_valid(&self) -> bool;
}

/// Static credential provider using fixed credentials.
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    /// Creates a new static credential provider.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn get_credentials(&self) -> ApiResult<Credentials> {
        Ok(self.credentials.clone())
    }

    async fn is_valid(&self) -> bool {
        true
    }
}

/// Environment variable credential provider.
pub struct EnvCredentialProvider {
    token_var: String,
}

impl EnvCredentialProvider {
    /// Creates a provider reading `GITHUB_TOKEN`.
    pub fn from_github_token() -> Self {
        Self {
            token_var: "GITHUB_TOKEN".to_string(),
        }
    }

    /// Creates a provider reading a custom environment variable.
    pub fn from_env_var(var_name: impl Into<String>) -> Self {
        Self {
            token_var: var_name.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credentials(&self) -> ApiResult<Credentials> {
        std::env::var(&self.token_var)
            .map(Credentials::token)
            .map_err(|_| {
                ApiError::new(
                    ApiErrorKind::MissingCredentials,
                    format!("Environment variable {} not set", self.token_var),
                )
            })
    }

    async fn is_valid(&self) -> bool {
        std::env::var(&self.token_var).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_prefix() {
        assert_eq!(Credentials::token("ghp_xxxxxxxxxxxx").token_prefix(), "ghp_***");
        assert_eq!(Credentials::token("gho_xxxxxxxxxxxx").token_prefix(), "gho_***");
        assert_eq!(Credentials::basic("octocat", "hunter2").token_prefix(), "basic");
        assert_eq!(Credentials::app(12345, "pem").token_prefix(), "app_jwt");
    }

    #[test]
    fn test_bearer_header() {
        let store = CredentialStore::new(Credentials::token("ghp_test"));
        let header = store.auth_header().unwrap();
        assert_eq!(header, "Bearer ghp_test");
    }

    #[test]
    fn test_basic_header() {
        let store = CredentialStore::new(Credentials::basic("octocat", "hunter2"));
        let header = store.auth_header().unwrap();
        // base64("octocat:hunter2")
        assert_eq!(header, "Basic b2N0b2NhdDpodW50ZXIy");
    }

    #[tokio::test]
    async fn test_installation_token_cache() {
        let store = CredentialStore::new(Credentials::app(1, "pem"));
        assert!(store.cached_installation_header().await.is_none());

        store
            .cache_installation_token("ghs_abc", Utc::now() + Duration::hours(1))
            .await;
        assert_eq!(
            store.cached_installation_header().await.as_deref(),
            Some("Bearer ghs_abc")
        );

        // An expired token is not served
        store
            .cache_installation_token("ghs_old", Utc::now() - Duration::minutes(1))
            .await;
        assert!(store.cached_installation_header().await.is_none());

        store.clear_cache().await;
        assert!(store.cached_installation_header().await.is_none());
    }

    #[test]
    fn test_requires_installation_token() {
        let plain = CredentialStore::new(Credentials::app(1, "pem"));
        assert!(!plain.requires_installation_token());

        let with_installation = CredentialStore::new(Credentials::App(
            AppCredentials {
                app_id: 1,
                private_key: SecretString::new("pem".into()),
                installation_id: None,
            }
            .with_installation(99),
        ));
        assert!(with_installation.requires_installation_token());
        assert_eq!(with_installation.installation_id(), Some(99));
    }

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider = StaticCredentialProvider::new(Credentials::token("test"));
        assert!(provider.is_valid().await);
        assert!(provider.get_credentials().await.is_ok());
    }
}
