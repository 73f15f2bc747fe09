//! This crate provides the core logic for cfn-update:
//! - `KEY=VALUE` parameter override parsing
//! - Stack stability polling with deadline and cancellation
//! - Parameter-only stack update planning and application through CloudFormation
//!

mod aws;
pub mod commands;
mod error;
mod parsing;
mod types;
pub mod waiter;

// Re-exports for a small, focused public API
pub use aws::{AwsError, AwsResult};
pub use commands::{build_update_plan, StackUpdateService};
pub use error::{CfnUpdateError, CfnUpdateResult};
pub use parsing::{parse_parameters, ParameterError};
pub use types::{
    AwsOptions, ParameterChange, ParameterSet, StackParameter, StackSnapshot, UpdateOutcome,
    UpdatePlan, WaitOptions,
};
pub use waiter::{wait_for_stable_stack, StackStatusQuery, WaitError};
