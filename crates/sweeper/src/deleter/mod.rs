//! Per-kind deleters
//!
//! Each deleter owns a set of names for one resource kind and can:
//! - describe those resources (`request_*`)
//! - delete them one by one under a shared [`DeleteConfig`]
//!
//! Deleters do not order work across kinds. Callers delete autoscaling
//! groups before the launch configurations they use, and resolve instance
//! profiles before deleting the launch configurations that reference them.

mod auto_scaling_group;
mod batch;
mod client_slot;
mod config;
mod instance_profile;
mod launch_configuration;
mod paginate;
mod reference;
mod sink;

pub use auto_scaling_group::AutoScalingGroupDeleter;
pub use config::DeleteConfig;
pub use instance_profile::InstanceProfileDeleter;
pub use launch_configuration::LaunchConfigurationDeleter;
pub use reference::{instance_profile_name, referenced_instance_profiles};
pub use sink::{ConsoleSink, DeleteErrorRecord, DeleteSink, JsonErrorLog, progress_line};
