//! Batch deletion configuration

use std::time::Duration;
use sweeper_common::defaults::default_backoff_time;

/// Settings shared by every deleter in one run.
///
/// Deleters only read it; pass the same value to each of them so every
/// batch follows the same policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Report what would be deleted without calling AWS
    pub dry_run: bool,
    /// Keep going after a failed delete instead of returning its error
    pub ignore_errors: bool,
    /// Pause before every real delete call
    pub backoff_time: Duration,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            ignore_errors: false,
            backoff_time: default_backoff_time(),
        }
    }
}

impl DeleteConfig {
    /// Config that performs real deletions with the given policy
    pub fn execute(ignore_errors: bool, backoff_time: Duration) -> Self {
        Self {
            dry_run: false,
            ignore_errors,
            backoff_time,
        }
    }
}
