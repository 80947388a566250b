//! Launch configuration deleter
//!
//! Besides deleting launch configurations, this deleter resolves the IAM
//! instance profiles they reference so a caller can remove those too.

use super::batch::delete_each;
use super::client_slot::ClientSlot;
use super::config::DeleteConfig;
use super::instance_profile::list_instance_profiles_matching;
use super::paginate::describe_all;
use super::reference::referenced_instance_profiles;
use super::sink::DeleteSink;
use crate::aws::{
    AutoScalingClient, AutoScalingOperations, AwsContext, IamClient, IamOperations,
    InstanceProfileRecord, LaunchConfigurationRecord,
};
use anyhow::Result;
use sweeper_common::{ResourceKind, ResourceName, ResourceNames};
use tracing::{debug, info};

const KIND: ResourceKind = ResourceKind::LaunchConfiguration;

/// Deletes launch configurations by name
pub struct LaunchConfigurationDeleter<A = AutoScalingClient, I = IamClient> {
    client: ClientSlot<A>,
    iam: ClientSlot<I>,
    names: ResourceNames,
}

impl LaunchConfigurationDeleter {
    pub fn new(ctx: &AwsContext) -> Self {
        Self {
            client: ClientSlot::lazy(ctx),
            iam: ClientSlot::lazy(ctx),
            names: ResourceNames::new(),
        }
    }
}

impl<A: AutoScalingOperations, I: IamOperations> LaunchConfigurationDeleter<A, I> {
    pub fn with_clients(client: A, iam: I) -> Self {
        Self {
            client: ClientSlot::ready(client),
            iam: ClientSlot::ready(iam),
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

    pub fn resource_names(&self) -> &ResourceNames {
        &self.names
    }

    /// Describe the launch configurations named in this deleter
    pub async fn request_launch_configurations(&mut self) -> Result<Vec<LaunchConfigurationRecord>> {
        if self.names.is_empty() {
            return Ok(Vec::new());
        }

        let names = self.names.to_strings();
        let names = &names;
        let client = self.client.get();
        describe_all(move |next_token| client.describe_launch_configurations(names.clone(), next_token))
            .await
    }

    /// Instance profiles referenced by the named launch configurations.
    ///
    /// References that cannot be reduced to a profile name are skipped.
    /// Profiles come back in IAM listing order.
    pub async fn request_instance_profiles_from_launch_configurations(
        &mut self,
    ) -> Result<Vec<InstanceProfileRecord>> {
        if self.names.is_empty() {
            return Ok(Vec::new());
        }

        let launch_configurations = self.request_launch_configurations().await?;
        let wanted = referenced_instance_profiles(&launch_configurations);
        debug!(
            launch_configurations = launch_configurations.len(),
            referenced = wanted.len(),
            "Resolved instance profile references"
        );

        let iam = self.iam.get();
        let profiles = list_instance_profiles_matching(iam, |name| wanted.contains(name)).await?;
        info!(count = profiles.len(), "Found instance profiles referenced by launch configurations");
        Ok(profiles)
    }

    pub async fn delete_resources(&mut self, cfg: &DeleteConfig, sink: &dyn DeleteSink) -> Result<()> {
        if self.names.is_empty() {
            return Ok(());
        }

        let client = self.client.get();
        delete_each(KIND, &self.names, cfg, sink, move |name| async move {
            client.delete_launch_configuration(&name).await
        })
        .await
    }
}

impl<A, I> std::fmt::Display for LaunchConfigurationDeleter<A, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"{{"Type": "{}", "Names": {}}}"#, KIND, self.names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::{DescribePage, ListingPage, MockAutoScalingOperations, MockIamOperations};
    use crate::deleter::sink::{RecordingSink, SinkEvent};
    use mockall::Sequence;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    fn lc(name: &str, profile: Option<&str>) -> LaunchConfigurationRecord {
        LaunchConfigurationRecord {
            name: name.to_string(),
            iam_instance_profile: profile.map(String::from),
            ..Default::default()
        }
    }

    fn describing(records: Vec<LaunchConfigurationRecord>) -> MockAutoScalingOperations {
        let mut mock = MockAutoScalingOperations::new();
        mock.expect_describe_launch_configurations()
            .times(1)
            .return_once(move |_, _| Ok(DescribePage::last(records)));
        mock
    }

    fn listing(names: &[&str]) -> MockIamOperations {
        let records: Vec<_> = names.iter().map(|n| InstanceProfileRecord::named(*n)).collect();
        let mut mock = MockIamOperations::new();
        mock.expect_list_instance_profiles()
            .times(1)
            .return_once(move |_| Ok(ListingPage::last(records)));
        mock
    }

    /// Deletes fail for `b`; every attempted name is recorded
    fn failing_on_b(expected_calls: usize) -> (MockAutoScalingOperations, Arc<Mutex<Vec<String>>>) {
        let attempts = Arc::new(Mutex::new(Vec::new()));
        let recorded = attempts.clone();
        let mut mock = MockAutoScalingOperations::new();
        mock.expect_delete_launch_configuration()
            .times(expected_calls)
            .returning(move |name| {
                recorded.lock().unwrap().push(name.to_string());
                if name == "b" {
                    Err(anyhow::anyhow!("ResourceInUse: b is attached to a group"))
                } else {
                    Ok(())
                }
            });
        (mock, attempts)
    }

    #[tokio::test(start_paused = true)]
    async fn ignore_mode_attempts_every_name() {
        let (mock, attempts) = failing_on_b(3);
        let mut deleter = LaunchConfigurationDeleter::with_clients(mock, MockIamOperations::new());
        deleter.add_resource_names(["a", "b", "c"]);
        let sink = RecordingSink::default();
        let start = Instant::now();

        deleter
            .delete_resources(&DeleteConfig::execute(true, Duration::from_secs(1)), &sink)
            .await
            .unwrap();

        assert_eq!(*attempts.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(sink.deleted_names(), vec!["a", "c"]);
        assert_eq!(sink.failed_names(), vec!["b"]);
        // No cooldown for launch configurations
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn abort_mode_returns_first_failure_unchanged() {
        let (mock, attempts) = failing_on_b(2);
        let mut deleter = LaunchConfigurationDeleter::with_clients(mock, MockIamOperations::new());
        deleter.add_resource_names(["a", "b", "c"]);
        let sink = RecordingSink::default();

        let err = deleter
            .delete_resources(&DeleteConfig::execute(false, Duration::from_secs(1)), &sink)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "ResourceInUse: b is attached to a group");
        assert_eq!(*attempts.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Deleted(KIND, "a".to_string()),
                SinkEvent::Failed(
                    KIND,
                    "b".to_string(),
                    "ResourceInUse: b is attached to a group".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn request_follows_next_token() {
        let mut mock = MockAutoScalingOperations::new();
        let mut seq = Sequence::new();
        mock.expect_describe_launch_configurations()
            .withf(|names, token| names == &["lc-1", "lc-2"] && token.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(DescribePage {
                    records: vec![lc("lc-1", None)],
                    next_token: Some("t1".to_string()),
                })
            });
        mock.expect_describe_launch_configurations()
            .withf(|_, token| token.as_deref() == Some("t1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(DescribePage {
                    records: vec![lc("lc-2", None)],
                    next_token: Some(String::new()),
                })
            });

        let mut deleter = LaunchConfigurationDeleter::with_clients(mock, MockIamOperations::new());
        deleter.add_resource_names(["lc-1", "lc-2"]);
        let records = deleter.request_launch_configurations().await.unwrap();

        assert_eq!(records, vec![lc("lc-1", None), lc("lc-2", None)]);
    }

    #[tokio::test]
    async fn resolves_bare_and_arn_references_in_listing_order() {
        let asg = describing(vec![
            lc("lc-1", Some("arn:aws:iam::123456789012:instance-profile/web")),
            lc("lc-2", Some("batch")),
            lc("lc-3", Some("web")),
            lc("lc-4", None),
        ]);
        let iam = listing(&["batch", "unrelated", "web"]);
        let mut deleter = LaunchConfigurationDeleter::with_clients(asg, iam);
        deleter.add_resource_names(["lc-1", "lc-2", "lc-3", "lc-4"]);

        let profiles = deleter
            .request_instance_profiles_from_launch_configurations()
            .await
            .unwrap();

        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["batch", "web"]);
    }

    #[tokio::test]
    async fn resolver_follows_listing_marker() {
        let asg = describing(vec![lc("lc-1", Some("late"))]);
        let mut iam = MockIamOperations::new();
        let mut seq = Sequence::new();
        iam.expect_list_instance_profiles()
            .withf(|marker| marker.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(ListingPage {
                    records: vec![InstanceProfileRecord::named("early")],
                    is_truncated: true,
                    marker: Some("m1".to_string()),
                })
            });
        iam.expect_list_instance_profiles()
            .withf(|marker| marker.as_deref() == Some("m1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ListingPage::last(vec![InstanceProfileRecord::named("late")])));

        let mut deleter = LaunchConfigurationDeleter::with_clients(asg, iam);
        deleter.add_resource_names(["lc-1"]);
        let profiles = deleter
            .request_instance_profiles_from_launch_configurations()
            .await
            .unwrap();

        assert_eq!(profiles, vec![InstanceProfileRecord::named("late")]);
    }

    #[tokio::test]
    async fn malformed_references_are_skipped() {
        let asg = describing(vec![
            lc("lc-1", Some("arn:aws:iam::123456789012:role/")),
            lc("lc-2", Some("")),
        ]);
        let iam = listing(&["role", "web"]);
        let mut deleter = LaunchConfigurationDeleter::with_clients(asg, iam);
        deleter.add_resource_names(["lc-1", "lc-2"]);

        let profiles = deleter
            .request_instance_profiles_from_launch_configurations()
            .await
            .unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn listing_error_is_returned_without_references() {
        let asg = describing(vec![lc("lc-1", None)]);
        let mut iam = MockIamOperations::new();
        iam.expect_list_instance_profiles()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("AccessDenied")));
        let mut deleter = LaunchConfigurationDeleter::with_clients(asg, iam);
        deleter.add_resource_names(["lc-1"]);

        let err = deleter
            .request_instance_profiles_from_launch_configurations()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "AccessDenied");
    }

    #[tokio::test]
    async fn enumeration_error_skips_listing() {
        let mut asg = MockAutoScalingOperations::new();
        asg.expect_describe_launch_configurations()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("Throttling: Rate exceeded")));
        let mut deleter = LaunchConfigurationDeleter::with_clients(asg, MockIamOperations::new());
        deleter.add_resource_names(["lc-1"]);

        let err = deleter
            .request_instance_profiles_from_launch_configurations()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Throttling: Rate exceeded");
    }

    #[tokio::test]
    async fn empty_names_issue_no_calls() {
        let mut deleter = LaunchConfigurationDeleter::with_clients(
            MockAutoScalingOperations::new(),
            MockIamOperations::new(),
        );
        let sink = RecordingSink::default();

        assert!(deleter.request_launch_configurations().await.unwrap().is_empty());
        assert!(
            deleter
                .request_instance_profiles_from_launch_configurations()
                .await
                .unwrap()
                .is_empty()
        );
        deleter
            .delete_resources(&DeleteConfig::execute(false, Duration::ZERO), &sink)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dry_run_reports_without_calling() {
        let mut deleter = LaunchConfigurationDeleter::with_clients(
            MockAutoScalingOperations::new(),
            MockIamOperations::new(),
        );
        deleter.add_resource_names(["a", "b"]);
        let sink = RecordingSink::default();
        let start = Instant::now();

        deleter
            .delete_resources(&DeleteConfig::default(), &sink)
            .await
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::DryRun(KIND, "a".to_string()),
                SinkEvent::DryRun(KIND, "b".to_string()),
            ]
        );
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
