//! Autoscaling group and launch configuration operations

use super::context::{AwsContext, FromAwsContext};
use super::types::{
    AutoScalingGroupRecord, DescribePage, LaunchConfigurationRecord, delete_context, sdk_string,
    sdk_timestamp,
};
use anyhow::{Context, Result};
use aws_sdk_autoscaling::Client;
use aws_sdk_autoscaling::types::{AutoScalingGroup, LaunchConfiguration};
use sweeper_common::ResourceKind;
use tracing::debug;

/// Autoscaling client for describing and deleting groups and launch configurations
pub struct AutoScalingClient {
    client: Client,
}

impl FromAwsContext for AutoScalingClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.autoscaling_client(),
        }
    }
}

impl AutoScalingClient {
    /// Describe one page of autoscaling groups by name
    pub async fn describe_auto_scaling_groups(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<AutoScalingGroupRecord>> {
        let response = self
            .client
            .describe_auto_scaling_groups()
            .set_auto_scaling_group_names(Some(names))
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to describe autoscaling groups")?;

        let records: Vec<_> = response
            .auto_scaling_groups()
            .iter()
            .map(AutoScalingGroupRecord::from)
            .collect();
        debug!(count = records.len(), "Described autoscaling groups");

        Ok(DescribePage {
            records,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    /// Delete an autoscaling group
    ///
    /// With `force_delete` AWS terminates the group's instances instead of
    /// refusing while any are running.
    pub async fn delete_auto_scaling_group(&self, name: &str, force_delete: bool) -> Result<()> {
        self.client
            .delete_auto_scaling_group()
            .auto_scaling_group_name(name)
            .force_delete(force_delete)
            .send()
            .await
            .with_context(|| delete_context(ResourceKind::AutoScalingGroup, name))?;
        Ok(())
    }

    /// Describe one page of launch configurations by name
    pub async fn describe_launch_configurations(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<LaunchConfigurationRecord>> {
        let response = self
            .client
            .describe_launch_configurations()
            .set_launch_configuration_names(Some(names))
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to describe launch configurations")?;

        let records: Vec<_> = response
            .launch_configurations()
            .iter()
            .map(LaunchConfigurationRecord::from)
            .collect();
        debug!(count = records.len(), "Described launch configurations");

        Ok(DescribePage {
            records,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    /// Delete a launch configuration
    pub async fn delete_launch_configuration(&self, name: &str) -> Result<()> {
        self.client
            .delete_launch_configuration()
            .launch_configuration_name(name)
            .send()
            .await
            .with_context(|| delete_context(ResourceKind::LaunchConfiguration, name))?;
        Ok(())
    }
}

impl From<&AutoScalingGroup> for AutoScalingGroupRecord {
    fn from(group: &AutoScalingGroup) -> Self {
        Self {
            name: sdk_string(group.auto_scaling_group_name()).unwrap_or_default(),
            arn: sdk_string(group.auto_scaling_group_arn()),
            launch_configuration_name: sdk_string(group.launch_configuration_name()),
            instance_ids: group
                .instances()
                .iter()
                .filter_map(|i| sdk_string(i.instance_id()))
                .collect(),
        }
    }
}

impl From<&LaunchConfiguration> for LaunchConfigurationRecord {
    fn from(lc: &LaunchConfiguration) -> Self {
        Self {
            name: sdk_string(lc.launch_configuration_name()).unwrap_or_default(),
            arn: sdk_string(lc.launch_configuration_arn()),
            iam_instance_profile: sdk_string(lc.iam_instance_profile()),
            image_id: sdk_string(lc.image_id()),
            instance_type: sdk_string(lc.instance_type()),
            created_at: sdk_timestamp(lc.created_time()),
        }
    }
}

/// Trait for autoscaling operations that can be mocked in tests.
///
/// Parameters are owned where mockall cannot express the borrowed form.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait AutoScalingOperations: Send + Sync {
    /// Describe one page of autoscaling groups by name
    async fn describe_auto_scaling_groups(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<AutoScalingGroupRecord>>;

    /// Delete a single autoscaling group
    async fn delete_auto_scaling_group(&self, name: &str, force_delete: bool) -> Result<()>;

    /// Describe one page of launch configurations by name
    async fn describe_launch_configurations(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<LaunchConfigurationRecord>>;

    /// Delete a single launch configuration
    async fn delete_launch_configuration(&self, name: &str) -> Result<()>;
}

impl AutoScalingOperations for AutoScalingClient {
    async fn describe_auto_scaling_groups(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<AutoScalingGroupRecord>> {
        AutoScalingClient::describe_auto_scaling_groups(self, names, next_token).await
    }

    async fn delete_auto_scaling_group(&self, name: &str, force_delete: bool) -> Result<()> {
        AutoScalingClient::delete_auto_scaling_group(self, name, force_delete).await
    }

    async fn describe_launch_configurations(
        &self,
        names: Vec<String>,
        next_token: Option<String>,
    ) -> Result<DescribePage<LaunchConfigurationRecord>> {
        AutoScalingClient::describe_launch_configurations(self, names, next_token).await
    }

    async fn delete_launch_configuration(&self, name: &str) -> Result<()> {
        AutoScalingClient::delete_launch_configuration(self, name).await
    }
}

