//! Instance profile references embedded in launch configurations
//!
//! A launch configuration names its instance profile either directly or by
//! ARN (`arn:aws:iam::123456789012:instance-profile/web`).

use crate::aws::LaunchConfigurationRecord;
use std::collections::HashSet;

const ARN_PREFIX: &str = "arn:";
const INSTANCE_PROFILE_MARKER: &str = "instance-profile/";

/// Bare instance profile name from a launch configuration's reference.
///
/// Returns `None` for ARNs that do not split into exactly two parts around
/// `instance-profile/` with a non-empty name, and for empty values.
pub fn instance_profile_name(raw: &str) -> Option<&str> {
    if raw.starts_with(ARN_PREFIX) {
        let parts: Vec<&str> = raw.split(INSTANCE_PROFILE_MARKER).collect();
        return match parts.as_slice() {
            [_, name] if !name.is_empty() => Some(*name),
            _ => None,
        };
    }
    (!raw.is_empty()).then_some(raw)
}

/// Names of every instance profile the given launch configurations reference
pub fn referenced_instance_profiles(records: &[LaunchConfigurationRecord]) -> HashSet<String> {
    records
        .iter()
        .filter_map(|lc| lc.iam_instance_profile.as_deref())
        .filter_map(instance_profile_name)
        .map(str::to_string)
        .collect()
}
