//! Top-level error type for cfn-update operations

use crate::aws::AwsError;
use crate::parsing::ParameterError;
use crate::waiter::WaitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfnUpdateError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Aws(#[from] AwsError),

    #[error("Stack '{stack_name}' does not declare parameter(s): {}", .names.join(", "))]
    UnknownParameters {
        stack_name: String,
        names: Vec<String>,
    },

    #[error("Update of stack '{stack_name}' did not complete; stack settled in {status}")]
    UpdateRolledBack { stack_name: String, status: String },
}

pub type CfnUpdateResult<T> = Result<T, CfnUpdateError>;
