//! Configuration types for the sweeper CLI

use crate::deleter::DeleteConfig;
use std::path::PathBuf;
use std::time::Duration;
use sweeper_common::defaults::MAX_BACKOFF_MS;
use thiserror::Error;

/// Invalid command line input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no resource names given; pass at least one --auto-scaling-group, --launch-configuration or --instance-profile")]
    NoResourceNames,

    #[error("backoff of {backoff_ms}ms exceeds the maximum of {max_ms}ms")]
    BackoffTooLarge { backoff_ms: u128, max_ms: u64 },

    #[error("--with-instance-profiles needs at least one --launch-configuration")]
    ProfilesWithoutLaunchConfigurations,
}

/// AWS connection configuration
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub aws_profile: Option<String>,
}

/// Names to act on, grouped by kind
#[derive(Debug, Clone, Default)]
pub struct TargetNames {
    pub auto_scaling_groups: Vec<String>,
    pub launch_configurations: Vec<String>,
    pub instance_profiles: Vec<String>,
    /// Also act on the instance profiles the launch configurations reference
    pub with_instance_profiles: bool,
}

impl TargetNames {
    pub fn is_empty(&self) -> bool {
        self.auto_scaling_groups.is_empty()
            && self.launch_configurations.is_empty()
            && self.instance_profiles.is_empty()
    }
}

/// Configuration for one delete run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub aws: AwsConfig,
    pub targets: TargetNames,
    pub delete: DeleteConfig,
    /// Append a JSON line per failed delete to this file
    pub error_log: Option<PathBuf>,
}

impl RunConfig {
    pub fn region(&self) -> &str {
        &self.aws.region
    }

    pub fn aws_profile(&self) -> Option<&str> {
        self.aws.aws_profile.as_deref()
    }

    /// Reject runs that would do nothing or pause for too long
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoResourceNames);
        }
        if self.targets.with_instance_profiles && self.targets.launch_configurations.is_empty() {
            return Err(ConfigError::ProfilesWithoutLaunchConfigurations);
        }
        check_backoff(self.delete.backoff_time)
    }
}

fn check_backoff(backoff: Duration) -> Result<(), ConfigError> {
    if backoff > Duration::from_millis(MAX_BACKOFF_MS) {
        return Err(ConfigError::BackoffTooLarge {
            backoff_ms: backoff.as_millis(),
            max_ms: MAX_BACKOFF_MS,
        });
    }
    Ok(())
}
