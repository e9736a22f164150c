//! Package operations.

use crate::client::GitHub;
use crate::errors::{require, ApiResult};
use crate::pagination::ApiOptions;
use crate::types::{Package, PackageType, PackageVersion};

/// Service for package operations.
pub struct PackagesService<'a> {
    client: &'a GitHub,
}

impl<'a> PackagesService<'a> {
    /// Creates a new packages service.
    pub fn new(client: &'a GitHub) -> Self {
        Self { client }
    }

    // Organization packages

    /// Lists packages in an organization.
    pub async fn list_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Package>> {
        require("org", org)?;
        self.client
            .get_all(
                &format!("/orgs/{}/packages?package_type={}", org, package_type.as_str()),
                options,
            )
            .await
    }

    /// Gets a package in an organization.
    pub async fn get_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<Package> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .get(&format!(
                "/orgs/{}/packages/{}/{}",
                org,
                package_type.as_str(),
                package_name
            ))
            .await
    }

    /// Deletes a package in an organization.
    pub async fn delete_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<()> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .delete(&format!(
                "/orgs/{}/packages/{}/{}",
                org,
                package_type.as_str(),
                package_name
            ))
            .await
    }

    /// Restores a deleted package in an organization.
    pub async fn restore_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<()> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .post_no_response(
                &format!(
                    "/orgs/{}/packages/{}/{}/restore",
                    org,
                    package_type.as_str(),
                    package_name
                ),
                &(),
            )
            .await
    }

    // Authenticated user packages

    /// Lists packages for the authenticated user.
    pub async fn list_for_authenticated_user(
        &self,
        package_type: PackageType,
        options: &ApiOptions,
    ) -> ApiResult<Vec<Package>> {
        self.client
            .get_all(
                &format!("/user/packages?package_type={}", package_type.as_str()),
                options,
            )
            .await
    }

    /// Gets a package for the authenticated user.
    pub async fn get_for_authenticated_user(
        &self,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<Package> {
        require("package_name", package_name)?;
        self.client
            .get(&format!(
                "/user/packages/{}/{}",
                package_type.as_str(),
                package_name
            ))
            .await
    }

    /// Deletes a package for the authenticated user.
    pub async fn delete_for_authenticated_user(
        &self,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<()> {
        require("package_name", package_name)?;
        self.client
            .delete(&format!(
                "/user/packages/{}/{}",
                package_type.as_str(),
                package_name
            ))
            .await
    }

    /// Restores a deleted package for the authenticated user.
    pub async fn restore_for_authenticated_user(
        &self,
        package_type: PackageType,
        package_name: &str,
    ) -> ApiResult<()> {
        require("package_name", package_name)?;
        self.client
            .post_no_response(
                &format!(
                    "/user/packages/{}/{}/restore",
                    package_type.as_str(),
                    package_name
                ),
                &(),
            )
            .await
    }

    // Versions

    /// Lists versions of a package in an organization.
    pub async fn list_versions_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
        options: &ApiOptions,
    ) -> ApiResult<Vec<PackageVersion>> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .get_all(
                &format!(
                    "/orgs/{}/packages/{}/{}/versions",
                    org,
                    package_type.as_str(),
                    package_name
                ),
                options,
            )
            .await
    }

    /// Gets a package version in an organization.
    pub async fn get_version_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
        version_id: u64,
    ) -> ApiResult<PackageVersion> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .get(&format!(
                "/orgs/{}/packages/{}/{}/versions/{}",
                org,
                package_type.as_str(),
                package_name,
                version_id
            ))
            .await
    }

    /// Deletes a package version in an organization.
    pub async fn delete_version_for_org(
        &self,
        org: &str,
        package_type: PackageType,
        package_name: &str,
        version_id: u64,
    ) -> ApiResult<()> {
        require("org", org)?;
        require("package_name", package_name)?;
        self.client
            .delete(&format!(
                "/orgs/{}/packages/{}/{}/versions/{}",
                org,
                package_type.as_str(),
                package_name,
                version_id
            ))
            .await
    }
}
