//! Organization operations.

use crate::client::GitHub;
use crate::errors::{require, ApiErrorKind, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::{MembershipRole, OrgMembership, Organization, User};
use serde::Serialize;

/// Service for organization operations.
pub struct OrganizationsService<'a> {
    client: &'a GitHub,
}

impl<'a> OrganizationsService<'a> {
    /// Creates a new organizations service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    /// Gets an organization.
    pub async fn get(&self, org: &str) -> ApiResult<Organization> {
        require("org", org)?;
        self.client.get(&format!("/orgs/{}", org)).await
    }

    /// Updates an organization.
    pub async fn update(&self, org: &str, update: &OrganizationUpdate) -> ApiResult<Organization> {
        require("org", org)?;
        self.client.patch(&format!("/orgs/{}", org), update).await
    }

    /// Lists organizations for a user.
    pub async fn list_for_user(
        &self,
        username: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Organization>> {
        require("username", username)?;
        self.client
            .get_all(&format!("/users/{}/orgs", username), options)
            .await
    }

    /// Lists organizations for the authenticated user.
    pub async fn list_for_authenticated_user(
        &self,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Organization>> {
        self.client.get_all("/user/orgs", options).await
    }

    // Members

    /// Lists organization members.
    pub async fn list_members(&self, org: &str, options: &ApiOptions) -> ApiResult<Vec<User>> {
        require("org", org)?;
        self.client
            .get_all(&format!("/orgs/{}/members", org), options)
            .await
    }

    /// Checks whether a user is a member of an organization.
    pub async fn check_membership(&self, org: &str, username: &str) -> ApiResult<bool> {
        require("org", org)?;
        require("username", username)?;
        let result = self
            .client
            .get_no_content(&format!("/orgs/{}/members/{}", org, username))
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(e) if *e.kind() == ApiErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Removes a member from an organization.
    pub async fn remove_member(&self, org: &str, username: &str) -> ApiResult<()> {
        require("org", org)?;
        require("username", username)?;
        self.client
            .delete(&format!("/orgs/{}/members/{}", org, username))
            .await
    }

    // Memberships

    /// Gets a user's membership in an organization.
    pub async fn get_membership(&self, org: &str, username: &str) -> ApiResult<OrgMembership> {
        require("org", org)?;
        require("username", username)?;
        self.client
            .get(&format!("/orgs/{}/memberships/{}", org, username))
            .await
    }

    /// Sets a user's membership role in an organization.
    pub async fn set_membership(
        &self,
        org: &str,
        username: &str,
        role: MembershipRole,
    ) -> ApiResult<OrgMembership> {
        require("org", org)?;
        require("username", username)?;
        let request = MembershipRequest { role };
        self.client
            .put(&format!("/orgs/{}/memberships/{}", org, username), &request)
            .await
    }

    /// Removes a user's membership in an organization.
    pub async fn remove_membership(&self, org: &str, username: &str) -> ApiResult<()> {
        require("org", org)?;
        require("username", username)?;
        self.client
            .delete(&format!("/orgs/{}/memberships/{}", org, username))
            .await
    }
}

/// Payload to update an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationUpdate {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Blog URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Public email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct MembershipRequest {
    role: MembershipRole,
}
