//! User operations.

use crate::client::GitHub;
use crate::errors::{require, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::User;
use serde::{Deserialize, Serialize};

/// Service for user operations.
pub struct UsersService<'a> {
    client: &'a GitHub,
}

impl<'a> UsersService<'a> {
    /// Creates a new users service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Gets a user by login.
    pub async fn get(&self, username: &str) -> ApiResult<User> {
        require("username", username)?;
        self.client.get(&format!("/users/{}", username)).await
    }

    /// Gets the authenticated user.
    pub async fn get_authenticated(&self) -> ApiResult<User> {
        self.client.get("/user").await
    }

    /// Updates the authenticated user's profile.
    pub async fn update_authenticated(&self, update: &UserUpdate) -> ApiResult<User> {
        self.client.patch("/user", update).await
    }

    /// Lists followers of a user.
    pub async fn list_followers(
        &self,
        username: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<User>> {
        require("username", username)?;
        self.client
            .get_all(&format!("/users/{}/followers", username), options)
            .await
    }

    /// Lists accounts a user follows.
    pub async fn list_following(
        &self,
        username: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<User>> {
        require("username", username)?;
        self.client
            .get_all(&format!("/users/{}/following", username), options)
            .await
    }

    /// Lists email addresses for the authenticated user.
    pub async fn list_emails(&self, options: &ApiOptions) -> ApiResult<Vec<Email>> {
        self.client.get_all("/user/emails", options).await
    }

    /// Lists public SSH keys for the authenticated user.
    pub async fn list_ssh_keys(&self, options: &ApiOptions) -> ApiResult<Vec<SshKey>> {
        self.client.get_all("/user/keys", options).await
    }
}

/// Payload to update the authenticated user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Public email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Blog URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Hireable flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hireable: Option<bool>,
    /// Biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// An email address on an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Email {
    /// The address.
    pub email: String,
    /// Whether it is verified.
    pub verified: bool,
    /// Whether it is the primary address.
    pub primary: bool,
    /// Visibility ("public", "private").
    pub visibility: Option<String>,
}

/// A public SSH key.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKey {
    /// Key ID.
    pub id: u64,
    /// Key material.
    pub key: String,
    /// Key title.
    pub title: Option<String>,
}
