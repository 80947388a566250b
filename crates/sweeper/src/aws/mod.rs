//! AWS client modules
//!
//! Thin wrappers around the AWS SDK clients the deleters talk to:
//! - autoscaling: Autoscaling groups and launch configurations
//! - iam: Instance profile listing and deletion
//!
//! Each wrapper implements an operations trait so deleters can be tested
//! against mocks instead of a real account.

pub mod autoscaling;
pub mod context;
pub mod error;
pub mod iam;
pub mod types;

pub use autoscaling::{AutoScalingClient, AutoScalingOperations};
pub use context::{AwsContext, FromAwsContext};
pub use error::{AwsError, classify_anyhow_error, classify_aws_error};
pub use iam::{IamClient, IamOperations};
pub use types::{
    AutoScalingGroupRecord, DescribePage, InstanceProfileRecord, LaunchConfigurationRecord,
    ListingPage,
};

#[cfg(test)]
pub use autoscaling::MockAutoScalingOperations;
#[cfg(test)]
pub use iam::MockIamOperations;
