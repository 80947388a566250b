//! Resource records and page types shared by the AWS clients and deleters

use chrono::{DateTime, Utc};
use serde::Serialize;
use sweeper_common::ResourceKind;

/// One page of a "describe by names" call, continued by `next_token`
#[derive(Debug, Clone, PartialEq)]
pub struct DescribePage<T> {
    pub records: Vec<T>,
    /// Absent or empty when there are no more pages
    pub next_token: Option<String>,
}

impl<T> DescribePage<T> {
    /// A page with no continuation
    pub fn last(records: Vec<T>) -> Self {
        Self {
            records,
            next_token: None,
        }
    }
}

/// One page of an unfiltered listing, continued by `marker` while truncated
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage<T> {
    pub records: Vec<T>,
    pub is_truncated: bool,
    pub marker: Option<String>,
}

impl<T> ListingPage<T> {
    pub fn last(records: Vec<T>) -> Self {
        Self {
            records,
            is_truncated: false,
            marker: None,
        }
    }
}

/// Autoscaling group as returned by DescribeAutoScalingGroups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoScalingGroupRecord {
    pub name: String,
    pub arn: Option<String>,
    pub launch_configuration_name: Option<String>,
    pub instance_ids: Vec<String>,
}

/// Launch configuration as returned by DescribeLaunchConfigurations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchConfigurationRecord {
    pub name: String,
    pub arn: Option<String>,
    /// Instance profile name or ARN, exactly as AWS returns it
    pub iam_instance_profile: Option<String>,
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// IAM instance profile as returned by ListInstanceProfiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceProfileRecord {
    pub name: String,
    pub arn: String,
    pub instance_profile_id: String,
    pub path: String,
    pub role_names: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl InstanceProfileRecord {
    /// Minimal record, mostly useful for tests and fixtures
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Error context for a failed delete, naming the resource
pub(crate) fn delete_context(kind: ResourceKind, name: &str) -> String {
    format!("Failed to delete {} {name}", kind.label())
}

/// Owned copy of an SDK string field.
///
/// Accepts both the `&str` accessors of required members and the
/// `Option<&str>` accessors of optional ones.
pub(crate) fn sdk_string<'a>(value: impl Into<Option<&'a str>>) -> Option<String> {
    value.into().map(str::to_string)
}

/// Convert an SDK timestamp to chrono, accepting required or optional accessors.
pub(crate) fn sdk_timestamp<'a>(
    value: impl Into<Option<&'a aws_sdk_autoscaling::primitives::DateTime>>,
) -> Option<DateTime<Utc>> {
    value
        .into()
        .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
}
