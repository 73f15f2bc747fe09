//! Apply logic for the cfn-update service

use crate::aws::cfn_client::{StackOperations, UpdateSubmission};
use crate::error::{CfnUpdateError, CfnUpdateResult};
use crate::types::{UpdateOutcome, UpdatePlan, WaitOptions};
use crate::waiter::wait_for_stable_stack;
use aws_sdk_cloudformation::types::StackStatus;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

impl super::service::StackUpdateService {
    /// Apply an update plan and wait for the stack to settle.
    ///
    /// The stack must be stable before the update is submitted. Only
    /// `UPDATE_COMPLETE` counts as success afterwards; a stack that rolled
    /// back is reported as an error. `wait.timeout` bounds both waits together.
    pub async fn apply(
        &self,
        plan: &UpdatePlan,
        wait: &WaitOptions,
        cancel: &CancellationToken,
    ) -> CfnUpdateResult<UpdateOutcome> {
        let stack_name = plan.stack.stack_name.as_str();
        let unchanged = || UpdateOutcome::Unchanged {
            stack_name: stack_name.to_string(),
        };
        let client: &dyn StackOperations = self.cfn_client.as_ref();

        if plan.is_empty() {
            log::info!("No parameter changes for stack '{}'", stack_name);
            return Ok(unchanged());
        }

        let started = Instant::now();
        log::info!("Waiting for stack '{}' to be stable", stack_name);
        wait_for_stable_stack(client, stack_name, wait.poll_interval, wait.timeout, cancel).await?;

        let stack_id = match client.update_stack(plan).await? {
            UpdateSubmission::NoUpdates => {
                log::info!("CloudFormation reported no updates for stack '{}'", stack_name);
                return Ok(unchanged());
            }
            UpdateSubmission::Submitted { stack_id } => stack_id,
        };

        log::info!("Update submitted for stack '{}'", stack_name);
        let remaining = wait.timeout.saturating_sub(started.elapsed());
        let final_status =
            wait_for_stable_stack(client, stack_name, wait.poll_interval, remaining, cancel)
                .await?;

        if final_status != StackStatus::UpdateComplete {
            return Err(CfnUpdateError::UpdateRolledBack {
                stack_name: stack_name.to_string(),
                status: final_status.as_str().to_string(),
            });
        }

        let snapshot = client.describe_stack(stack_name).await?;
        Ok(UpdateOutcome::Updated {
            stack_name: snapshot.stack_name,
            stack_id: stack_id.or(snapshot.stack_id),
            final_status: final_status.as_str().to_string(),
            outputs: snapshot.outputs,
        })
    }
}
