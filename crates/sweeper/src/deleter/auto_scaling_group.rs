//! Autoscaling group deleter

use super::batch::delete_each;
use super::client_slot::ClientSlot;
use super::config::DeleteConfig;
use super::paginate::describe_all;
use super::sink::DeleteSink;
use crate::aws::{AutoScalingClient, AutoScalingGroupRecord, AutoScalingOperations, AwsContext};
use anyhow::Result;
use sweeper_common::defaults::AUTO_SCALING_GROUP_COOLDOWN;
use sweeper_common::{ResourceKind, ResourceName, ResourceNames};
use tracing::info;

const KIND: ResourceKind = ResourceKind::AutoScalingGroup;

/// Groups are always force deleted so running instances do not block removal
const FORCE_DELETE: bool = true;

/// Deletes autoscaling groups by name
pub struct AutoScalingGroupDeleter<A = AutoScalingClient> {
    client: ClientSlot<A>,
    names: ResourceNames,
}

impl AutoScalingGroupDeleter {
    /// Deleter whose client is created from `ctx` on first use
    pub fn new(ctx: &AwsContext) -> Self {
        Self {
            client: ClientSlot::lazy(ctx),
            names: ResourceNames::new(),
        }
    }
}

impl<A: AutoScalingOperations> AutoScalingGroupDeleter<A> {
    pub fn with_client(client: A) -> Self {
        Self {
            client: ClientSlot::ready(client),
            names: ResourceNames::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        KIND
    }

    pub fn add_resource_names<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<ResourceName>,
    {
        self.names.extend(names);
    }

    pub fn resource_names(&self) -> &ResourceNames {
        &self.names
    }

    /// Describe the groups named in this deleter
    pub async fn request_auto_scaling_groups(&mut self) -> Result<Vec<AutoScalingGroupRecord>> {
        if self.names.is_empty() {
            return Ok(Vec::new());
        }

        let names = self.names.to_strings();
        let names = &names;
        let client = self.client.get();
        describe_all(move |next_token| client.describe_auto_scaling_groups(names.clone(), next_token))
            .await
    }

    /// Force delete every named group.
    ///
    /// After a real pass the deleter waits [`AUTO_SCALING_GROUP_COOLDOWN`]
    /// for AWS to finish terminating instances, even if every delete failed
    /// in ignore mode.
    pub async fn delete_resources(&mut self, cfg: &DeleteConfig, sink: &dyn DeleteSink) -> Result<()> {
        if self.names.is_empty() {
            return Ok(());
        }

        let client = self.client.get();
        delete_each(KIND, &self.names, cfg, sink, move |name| async move {
            client.delete_auto_scaling_group(&name, FORCE_DELETE).await
        })
        .await?;

        if !cfg.dry_run {
            info!(
                cooldown_secs = AUTO_SCALING_GROUP_COOLDOWN.as_secs(),
                "Waiting for autoscaling group teardown"
            );
            tokio::time::sleep(AUTO_SCALING_GROUP_COOLDOWN).await;
        }

        Ok(())
    }
}

impl<A> std::fmt::Display for AutoScalingGroupDeleter<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"{{"Type": "{}", "Names": {}}}"#, KIND, self.names)
    }
}
