//! sweeper-common - Shared types for sweeper
//!
//! Resource kinds, resource names and default values, kept free of any
//! AWS SDK dependency.
//!
//! ## Modules
//!
//! - [`defaults`]: Default configuration values
//! - [`names`]: Resource name newtypes
//! - [`resource_kind`]: Resource kinds and cleanup ordering

pub mod defaults;
pub mod names;
pub mod resource_kind;

pub use names::{ResourceName, ResourceNames};
pub use resource_kind::ResourceKind;
