//! sweeper - rate-limited deletion of autoscaling resources
//!
//! Deletes autoscaling groups, launch configurations and the IAM instance
//! profiles they reference, one call at a time with a pause between calls.

pub mod aws;
pub mod config;
pub mod deleter;
