//! Resource kinds and cleanup ordering
//!
//! Deleters work within one kind. Callers that delete several kinds use
//! [`ResourceKind::cleanup_priority`] to go from dependents to dependencies.

use serde::Serialize;

/// Kinds of AWS resources sweeper can delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    /// Autoscaling group (owns instances launched from a launch configuration)
    #[serde(rename = "AWS::AutoScaling::AutoScalingGroup")]
    AutoScalingGroup,
    /// Launch configuration (in use while any group references it)
    #[serde(rename = "AWS::AutoScaling::LaunchConfiguration")]
    LaunchConfiguration,
    /// IAM instance profile (referenced by launch configurations)
    #[serde(rename = "AWS::IAM::InstanceProfile")]
    IamInstanceProfile,
}

impl ResourceKind {
    /// Resource type name as used by CloudFormation and resource tagging
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::AutoScalingGroup => "AWS::AutoScaling::AutoScalingGroup",
            ResourceKind::LaunchConfiguration => "AWS::AutoScaling::LaunchConfiguration",
            ResourceKind::IamInstanceProfile => "AWS::IAM::InstanceProfile",
        }
    }

    /// Short label for progress lines
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::AutoScalingGroup => "AutoScalingGroup",
            ResourceKind::LaunchConfiguration => "LaunchConfiguration",
            ResourceKind::IamInstanceProfile => "InstanceProfile",
        }
    }

    /// Get cleanup priority (lower number = cleanup first)
    ///
    /// - 0: Autoscaling groups (hold instances using the launch configuration)
    /// - 1: Launch configurations (reference instance profiles)
    /// - 2: Instance profiles
    pub fn cleanup_priority(self) -> u8 {
        match self {
            ResourceKind::AutoScalingGroup => 0,
            ResourceKind::LaunchConfiguration => 1,
            ResourceKind::IamInstanceProfile => 2,
        }
    }

    pub fn all() -> [ResourceKind; 3] {
        [
            ResourceKind::AutoScalingGroup,
            ResourceKind::LaunchConfiguration,
            ResourceKind::IamInstanceProfile,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_before_launch_configurations() {
        assert!(
            ResourceKind::AutoScalingGroup.cleanup_priority()
                < ResourceKind::LaunchConfiguration.cleanup_priority(),
            "Groups must be deleted before the launch configurations they use"
        );
    }

    #[test]
    fn test_launch_configurations_before_instance_profiles() {
        assert!(
            ResourceKind::LaunchConfiguration.cleanup_priority()
                < ResourceKind::IamInstanceProfile.cleanup_priority(),
            "Launch configurations must be deleted before their instance profiles"
        );
    }

    #[test]
    fn test_all_is_sorted_by_priority() {
        let kinds = ResourceKind::all();
        assert!(
            kinds
                .windows(2)
                .all(|w| w[0].cleanup_priority() < w[1].cleanup_priority())
        );
    }

    #[test]
    fn test_serialized_name_matches_as_str() {
        for kind in ResourceKind::all() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
