//! AWS CloudFormation client wrapper for stack operations

use crate::aws::{AwsError, AwsResult};
use crate::types::{ParameterChange, StackParameter, StackSnapshot, UpdatePlan};
use crate::waiter::StackStatusQuery;
use async_trait::async_trait;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types::{Capability, Parameter, Stack, StackStatus};
use aws_sdk_cloudformation::Client as CfnClient;

const NO_UPDATES_MESSAGE: &str = "No updates are to be performed";

/// What CloudFormation did with an update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateSubmission {
    Submitted { stack_id: Option<String> },
    NoUpdates,
}

/// Describe and update operations the service needs on top of status polling.
#[async_trait]
pub(crate) trait StackOperations: StackStatusQuery {
    /// Describe a stack and convert it into a [`StackSnapshot`].
    async fn describe_stack(&self, stack_name: &str) -> AwsResult<StackSnapshot>;

    /// Submit an `UpdateStack` request that reuses the previous template.
    async fn update_stack(&self, plan: &UpdatePlan) -> AwsResult<UpdateSubmission>;
}

pub(crate) struct AwsCfnClient {
    client: CfnClient,
}

impl AwsCfnClient {
    pub(crate) fn new(client: CfnClient) -> Self {
        Self { client }
    }

    async fn describe(&self, stack_name: &str) -> AwsResult<Stack> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| describe_error(stack_name, e))?;

        output
            .stacks()
            .first()
            .cloned()
            .ok_or_else(|| AwsError::StackNotFound(stack_name.to_string()))
    }
}

#[async_trait]
impl StackOperations for AwsCfnClient {
    async fn describe_stack(&self, stack_name: &str) -> AwsResult<StackSnapshot> {
        let stack = self.describe(stack_name).await?;
        snapshot_from_stack(stack_name, &stack)
    }

    async fn update_stack(&self, plan: &UpdatePlan) -> AwsResult<UpdateSubmission> {
        let parameters: Vec<Parameter> = plan.changes.iter().map(to_sdk_parameter).collect();
        let capabilities: Vec<Capability> = plan
            .stack
            .capabilities
            .iter()
            .map(|c| Capability::from(c.as_str()))
            .collect();
        let stack_name = &plan.stack.stack_name;

        let result = self
            .client
            .update_stack()
            .stack_name(stack_name)
            .use_previous_template(true)
            .set_parameters(Some(parameters))
            .set_capabilities((!capabilities.is_empty()).then_some(capabilities))
            .send()
            .await;

        match result {
            Ok(output) => Ok(UpdateSubmission::Submitted {
                stack_id: output.stack_id().map(str::to_string),
            }),
            Err(e) if is_no_updates(e.message()) => Ok(UpdateSubmission::NoUpdates),
            Err(e) => Err(AwsError::CloudFormationError(format!(
                "Failed to update stack '{stack_name}': {}",
                DisplayErrorContext(&e)
            ))),
        }
    }
}

#[async_trait]
impl StackStatusQuery for AwsCfnClient {
    async fn stack_status(&self, stack_name: &str) -> AwsResult<StackStatus> {
        let stack = self.describe(stack_name).await?;
        let status = stack
            .stack_status()
            .cloned()
            .ok_or_else(|| missing_status(stack_name))?;
        log::debug!("Stack '{}' status: {}", stack_name, status.as_str());
        Ok(status)
    }
}

fn describe_error<E, R>(stack_name: &str, err: SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    // DescribeStacks reports a missing stack as a ValidationError.
    if err.message().is_some_and(|m| m.contains("does not exist")) {
        return AwsError::StackNotFound(stack_name.to_string());
    }
    AwsError::CloudFormationError(format!(
        "Failed to describe stack '{stack_name}': {}",
        DisplayErrorContext(&err)
    ))
}

/// CloudFormation rejects a parameter set identical to the current one
/// with a validation error carrying this message.
fn is_no_updates(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.contains(NO_UPDATES_MESSAGE))
}

fn missing_status(stack_name: &str) -> AwsError {
    AwsError::CloudFormationError(format!("Stack '{stack_name}' has no status"))
}

fn to_sdk_parameter(change: &ParameterChange) -> Parameter {
    match change {
        ParameterChange::Keep { key } => Parameter::builder()
            .parameter_key(key)
            .use_previous_value(true)
            .build(),
        ParameterChange::Set { key, value, .. } => Parameter::builder()
            .parameter_key(key)
            .parameter_value(value)
            .build(),
    }
}

fn snapshot_from_stack(stack_name: &str, stack: &Stack) -> AwsResult<StackSnapshot> {
    let status = stack
        .stack_status()
        .ok_or_else(|| missing_status(stack_name))?;

    Ok(StackSnapshot {
        stack_name: stack.stack_name().unwrap_or(stack_name).to_string(),
        stack_id: stack.stack_id().map(str::to_string),
        status: status.as_str().to_string(),
        parameters: stack
            .parameters()
            .iter()
            .filter_map(|p| {
                Some(StackParameter {
                    key: p.parameter_key()?.to_string(),
                    value: p.parameter_value().map(str::to_string),
                })
            })
            .collect(),
        capabilities: stack
            .capabilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        outputs: stack
            .outputs()
            .iter()
            .filter_map(|o| Some((o.output_key()?.to_string(), o.output_value()?.to_string())))
            .collect(),
    })
}
