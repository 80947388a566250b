//! AWS error classification
//!
//! Typed errors for autoscaling and IAM SDK failures using the `.code()`
//! metadata instead of string matching on the Debug format. Deleters never
//! act on the classification; it feeds failure reports only.

use thiserror::Error;

/// AWS error categories for failure reporting
#[derive(Debug, Error)]
pub enum AwsError {
    /// Resource was not found (usually already deleted)
    #[error("Resource not found: {message}")]
    NotFound { code: String, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    Throttled { code: String },

    /// Resource is still used by another resource or has a scaling activity running
    #[error("Resource in use: {message}")]
    ResourceInUse { code: String, message: String },

    /// IAM refused the delete because dependents (e.g. roles) are still attached
    #[error("Delete conflict: {message}")]
    DeleteConflict { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is a throttling error
    pub fn is_throttled(&self) -> bool {
        matches!(self, AwsError::Throttled { .. })
    }

    /// The AWS error code this was classified from, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::NotFound { code, .. }
            | AwsError::Throttled { code }
            | AwsError::ResourceInUse { code, .. } => Some(code),
            AwsError::DeleteConflict { .. } => Some("DeleteConflict"),
            AwsError::Sdk { code, .. } => code.as_deref(),
        }
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &["NoSuchEntity"];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Autoscaling codes for resources still attached to something else
const IN_USE_CODES: &[&str] = &["ResourceInUse", "ScalingActivityInProgress"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            code: c.to_string(),
            message,
        },
        // Autoscaling reports missing groups and configurations as validation errors
        Some(c @ "ValidationError") if message.contains("not found") => AwsError::NotFound {
            code: c.to_string(),
            message,
        },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled {
            code: c.to_string(),
        },
        Some(c) if IN_USE_CODES.contains(&c) => AwsError::ResourceInUse {
            code: c.to_string(),
            message,
        },
        Some("DeleteConflict") => AwsError::DeleteConflict { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify an error from an anyhow::Error by extracting the AWS error code.
///
/// Walks the error chain using `ProvideErrorMetadata` to extract `.code()` and
/// `.message()` from the autoscaling and IAM operation errors sweeper issues.
pub fn classify_anyhow_error(error: &anyhow::Error) -> AwsError {
    use aws_sdk_autoscaling::error::{ProvideErrorMetadata, SdkError as AsgSdkError};
    use aws_sdk_autoscaling::operation as asg_op;
    use aws_sdk_iam::error::SdkError as IamSdkError;
    use aws_sdk_iam::operation as iam_op;

    macro_rules! classify_sdk_error {
        ($cause:expr, $($err:ty),+ $(,)?) => {
            $(
                if let Some(e) = $cause.downcast_ref::<$err>() {
                    let meta = ProvideErrorMetadata::meta(e);
                    return classify_aws_error(meta.code(), meta.message());
                }
            )+
        };
    }

    for cause in error.chain() {
        classify_sdk_error!(
            cause,
            AsgSdkError<asg_op::delete_auto_scaling_group::DeleteAutoScalingGroupError>,
            AsgSdkError<asg_op::delete_launch_configuration::DeleteLaunchConfigurationError>,
            AsgSdkError<asg_op::describe_auto_scaling_groups::DescribeAutoScalingGroupsError>,
            AsgSdkError<asg_op::describe_launch_configurations::DescribeLaunchConfigurationsError>,
            IamSdkError<iam_op::delete_instance_profile::DeleteInstanceProfileError>,
            IamSdkError<iam_op::get_instance_profile::GetInstanceProfileError>,
            IamSdkError<iam_op::remove_role_from_instance_profile::RemoveRoleFromInstanceProfileError>,
            IamSdkError<iam_op::list_instance_profiles::ListInstanceProfilesError>,
        );
    }

    AwsError::Sdk {
        code: None,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify_aws_error(Some(code), Some("some message"));
            assert!(err.is_not_found(), "Expected NotFound for code: {code}");
            assert_eq!(err.code(), Some(*code));
        }
    }

    #[test]
    fn autoscaling_validation_not_found() {
        let err = classify_aws_error(
            Some("ValidationError"),
            Some("Launch configuration name not found - web-lc"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.code(), Some("ValidationError"));

        let other = classify_aws_error(Some("ValidationError"), Some("1 validation error"));
        assert!(matches!(other, AwsError::Sdk { .. }));
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(err.is_throttled(), "Expected Throttled for code: {code}");
        }
    }

    #[test]
    fn in_use_and_conflict() {
        let err = classify_aws_error(Some("ResourceInUse"), Some("still attached"));
        assert!(matches!(err, AwsError::ResourceInUse { .. }));

        let err = classify_aws_error(Some("DeleteConflict"), Some("has roles"));
        assert!(matches!(err, AwsError::DeleteConflict { .. }));
        assert_eq!(err.code(), Some("DeleteConflict"));
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify_aws_error(Some("SomeNewError"), Some("details"));
        assert!(matches!(err, AwsError::Sdk { .. }));
        assert_eq!(err.code(), Some("SomeNewError"));

        let err2 = classify_aws_error(None, Some("something failed"));
        assert!(matches!(err2, AwsError::Sdk { code: None, .. }));
        assert_eq!(err2.code(), None);
    }

    #[test]
    fn plain_anyhow_error_has_no_code() {
        let err = anyhow::anyhow!("connection refused");
        let classified = classify_anyhow_error(&err);
        assert_eq!(classified.code(), None);
        assert_eq!(classified.to_string(), "AWS error: connection refused");
    }
}
