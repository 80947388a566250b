//! IAM instance profile listing and deletion

use super::context::{AwsContext, FromAwsContext};
use super::types::{InstanceProfileRecord, ListingPage, delete_context, sdk_string, sdk_timestamp};
use anyhow::{Context, Result};
use aws_sdk_iam::Client;
use aws_sdk_iam::types::InstanceProfile;
use sweeper_common::ResourceKind;
use tracing::{debug, info};

/// IAM client for instance profiles
pub struct IamClient {
    client: Client,
}

impl FromAwsContext for IamClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.iam_client(),
        }
    }
}

impl IamClient {
    /// List one page of instance profiles, starting at `marker`
    ///
    /// IAM cannot filter this listing by name; callers filter client side.
    pub async fn list_instance_profiles(
        &self,
        marker: Option<String>,
    ) -> Result<ListingPage<InstanceProfileRecord>> {
        let response = self
            .client
            .list_instance_profiles()
            .set_marker(marker)
            .send()
            .await
            .context("Failed to list instance profiles")?;

        let records: Vec<_> = response
            .instance_profiles()
            .iter()
            .map(InstanceProfileRecord::from)
            .collect();
        debug!(
            count = records.len(),
            truncated = response.is_truncated(),
            "Listed instance profiles"
        );

        Ok(ListingPage {
            records,
            is_truncated: response.is_truncated(),
            marker: response.marker().map(|s| s.to_string()),
        })
    }

    /// Delete an instance profile, detaching its roles first
    ///
    /// IAM rejects deleting a profile that still has a role attached.
    pub async fn delete_instance_profile(&self, profile_name: &str) -> Result<()> {
        let response = self
            .client
            .get_instance_profile()
            .instance_profile_name(profile_name)
            .send()
            .await
            .with_context(|| format!("Failed to get instance profile {profile_name}"))?;

        let role_names: Vec<String> = response
            .instance_profile()
            .map(|profile| {
                profile
                    .roles()
                    .iter()
                    .filter_map(|r| sdk_string(r.role_name()))
                    .collect()
            })
            .unwrap_or_default();

        for role_name in &role_names {
            self.client
                .remove_role_from_instance_profile()
                .instance_profile_name(profile_name)
                .role_name(role_name)
                .send()
                .await
                .with_context(|| {
                    format!("Failed to remove role {role_name} from instance profile {profile_name}")
                })?;
            info!(profile_name = %profile_name, role_name = %role_name, "Removed role from instance profile");
        }

        self.client
            .delete_instance_profile()
            .instance_profile_name(profile_name)
            .send()
            .await
            .with_context(|| delete_context(ResourceKind::IamInstanceProfile, profile_name))?;
        Ok(())
    }
}

impl From<&InstanceProfile> for InstanceProfileRecord {
    fn from(profile: &InstanceProfile) -> Self {
        Self {
            name: sdk_string(profile.instance_profile_name()).unwrap_or_default(),
            arn: sdk_string(profile.arn()).unwrap_or_default(),
            instance_profile_id: sdk_string(profile.instance_profile_id()).unwrap_or_default(),
            path: sdk_string(profile.path()).unwrap_or_default(),
            role_names: profile
                .roles()
                .iter()
                .filter_map(|r| sdk_string(r.role_name()))
                .collect(),
            created_at: sdk_timestamp(profile.create_date()),
        }
    }
}

/// Trait for IAM operations that can be mocked in tests.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait IamOperations: Send + Sync {
    /// List one page of instance profiles
    async fn list_instance_profiles(
        &self,
        marker: Option<String>,
    ) -> Result<ListingPage<InstanceProfileRecord>>;

    /// Delete a single instance profile
    async fn delete_instance_profile(&self, profile_name: &str) -> Result<()>;
}

impl IamOperations for IamClient {
    async fn list_instance_profiles(
        &self,
        marker: Option<String>,
    ) -> Result<ListingPage<InstanceProfileRecord>> {
        IamClient::list_instance_profiles(self, marker).await
    }

    async fn delete_instance_profile(&self, profile_name: &str) -> Result<()> {
        IamClient::delete_instance_profile(self, profile_name).await
    }
}
