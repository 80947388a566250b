//! Default configuration values
//!
//! Shared by the deleters and the CLI so both agree on pacing.

use std::time::Duration;

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-2";

/// Default pause before every real delete call, in milliseconds
pub const DEFAULT_BACKOFF_MS: u64 = 1000;

/// Largest pause accepted from the command line, in milliseconds
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Pause after a real pass over autoscaling groups.
///
/// Force-deleting a group terminates its instances asynchronously; launch
/// configurations and instance profiles stay in use until that settles.
pub const AUTO_SCALING_GROUP_COOLDOWN: Duration = Duration::from_secs(30);

/// Returns the default backoff as a `Duration`
pub fn default_backoff_time() -> Duration {
    Duration::from_millis(DEFAULT_BACKOFF_MS)
}
