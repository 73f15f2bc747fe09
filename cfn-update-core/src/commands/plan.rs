//! Plan creation logic for the cfn-update service

use crate::error::{CfnUpdateError, CfnUpdateResult};
use crate::types::{ParameterChange, ParameterSet, StackSnapshot, UpdatePlan};

impl super::service::StackUpdateService {
    /// Create an update plan for `stack_name`
    ///
    /// Describes the stack and decides, for every parameter it declares,
    /// whether the override set replaces its value or the previous value is kept.
    pub async fn plan(
        &self,
        stack_name: &str,
        overrides: &ParameterSet,
    ) -> CfnUpdateResult<UpdatePlan> {
        let stack = self.cfn_client.describe_stack(stack_name).await?;
        log::info!(
            "Stack '{}' is {} with {} declared parameter(s)",
            stack.stack_name,
            stack.status,
            stack.parameters.len()
        );
        build_update_plan(stack, overrides)
    }
}

/// Build an [`UpdatePlan`] from a described stack and a set of overrides.
///
/// Every override must name a parameter the stack declares. An override whose
/// value matches the current value is kept rather than set.
pub fn build_update_plan(
    stack: StackSnapshot,
    overrides: &ParameterSet,
) -> CfnUpdateResult<UpdatePlan> {
    let unknown: Vec<String> = overrides
        .iter()
        .filter(|(name, _)| !stack.parameters.iter().any(|p| p.key == *name))
        .map(|(name, _)| name.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(CfnUpdateError::UnknownParameters {
            stack_name: stack.stack_name,
            names: unknown,
        });
    }

    let changes = stack
        .parameters
        .iter()
        .map(|current| match overrides.get(&current.key) {
            Some(value) if current.value.as_deref() != Some(value) => ParameterChange::Set {
                key: current.key.clone(),
                previous: current.value.clone(),
                value: value.to_string(),
            },
            _ => ParameterChange::Keep {
                key: current.key.clone(),
            },
        })
        .collect();

    Ok(UpdatePlan { stack, changes })
}
