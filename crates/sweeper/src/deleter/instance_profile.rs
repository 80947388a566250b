//! IAM instance profile deleter

use super::batch::delete_each;
use super::client_slot::ClientSlot;
use super::config::DeleteConfig;
use super::paginate::list_all;
use super::sink::DeleteSink;
use crate::aws::{AwsContext, IamClient, IamOperations, InstanceProfileRecord};
use anyhow::Result;
use sweeper_common::{ResourceKind, ResourceName, ResourceNames};

const KIND: ResourceKind = ResourceKind::IamInstanceProfile;

/// List every instance profile in the account and keep those `wanted` accepts.
///
/// Records come back in listing order.
pub(crate) async fn list_instance_profiles_matching<I, P>(
    iam: &I,
    wanted: P,
) -> Result<Vec<InstanceProfileRecord>>
where
    I: IamOperations,
    P: Fn(&str) -> bool,
{
    let profiles = list_all(|marker| iam.list_instance_profiles(marker)).await?;
    Ok(profiles.into_iter().filter(|p| wanted(&p.name)).collect())
}

/// Deletes IAM instance profiles by name
pub struct InstanceProfileDeleter<I = IamClient> {
    client: ClientSlot<I>,
    names: ResourceNames,
}

impl InstanceProfileDeleter {
    pub fn new(ctx: &AwsContext) -> Self {
        Self {
            client: ClientSlot::lazy(ctx),
            names: ResourceNames::new(),
        }
    }
}

impl<I: IamOperations> InstanceProfileDeleter<I> {
    pub fn with_client(client: I) -> Self {
        Self {
            client: ClientSlot::ready(client),
            names: ResourceNames::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        KIND
    }

    pub fn add_resource_names<It, N>(&mut self, names: It)
    where
        It: IntoIterator<Item = N>,
        N: Into<ResourceName>,
    {
        self.names.extend(names);
    }

    /// Add names that are not already queued, returning how many were added.
    ///
    /// Used when merging resolved profiles into names given explicitly, so a
    /// profile is not deleted twice.
    pub fn add_missing_resource_names<It, N>(&mut self, names: It) -> usize
    where
        It: IntoIterator<Item = N>,
        N: Into<ResourceName>,
    {
        self.names.extend_missing(names)
    }

    pub fn resource_names(&self) -> &ResourceNames {
        &self.names
    }

    /// Instance profiles whose names were added to this deleter.
    ///
    /// IAM has no describe-by-name call for profiles, so this walks the full
    /// listing.
    pub async fn request_instance_profiles(&mut self) -> Result<Vec<InstanceProfileRecord>> {
        if self.names.is_empty() {
            return Ok(Vec::new());
        }

        let names = &self.names;
        let client = self.client.get();
        list_instance_profiles_matching(client, |name| names.contains(name)).await
    }

    pub async fn delete_resources(&mut self, cfg: &DeleteConfig, sink: &dyn DeleteSink) -> Result<()> {
        if self.names.is_empty() {
            return Ok(());
        }

        let client = self.client.get();
        delete_each(KIND, &self.names, cfg, sink, move |name| async move {
            client.delete_instance_profile(&name).await
        })
        .await
    }
}

impl<I> std::fmt::Display for InstanceProfileDeleter<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"{{"Type": "{}", "Names": {}}}"#, KIND, self.names)
    }
}
