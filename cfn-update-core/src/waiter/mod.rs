//! Stack stability polling
//!
//! [`wait_for_stable_stack`] repeatedly asks a [`StackStatusQuery`] for the
//! current status of one stack until the status settles, the deadline passes,
//! or the caller cancels.

pub mod status;

use crate::aws::{AwsError, AwsResult};
use async_trait::async_trait;
use aws_sdk_cloudformation::types::StackStatus;
use status::{classify, Stability};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Fetches the current status of a single stack.
#[async_trait]
pub trait StackStatusQuery: Send + Sync {
    async fn stack_status(&self, stack_name: &str) -> AwsResult<StackStatus>;
}

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("Stack '{stack_name}' is in failed state {}", .status.as_str())]
    StackFailed {
        stack_name: String,
        status: StackStatus,
    },
    #[error(
        "Timed out after {timeout:?} waiting for stack '{stack_name}' to stabilize (last status: {})",
        .last_status.as_str()
    )]
    Timeout {
        stack_name: String,
        timeout: Duration,
        last_status: StackStatus,
    },
    #[error("Wait for stack '{0}' was cancelled")]
    Cancelled(String),
    #[error(transparent)]
    Query(#[from] AwsError),
}

/// Poll `stack_name` until its status is stable.
///
/// Returns the stable status, or an error if the stack settles in a failed
/// state, `timeout` elapses, `cancel` fires, or the query itself fails.
/// The first query is issued immediately.
pub async fn wait_for_stable_stack<Q>(
    query: &Q,
    stack_name: &str,
    poll_interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<StackStatus, WaitError>
where
    Q: StackStatusQuery + ?Sized,
{
    let started = Instant::now();
    let deadline = started
        .checked_add(timeout)
        .unwrap_or_else(|| far_future(started));
    let cancelled = || WaitError::Cancelled(stack_name.to_string());
    let timed_out = |last_status| WaitError::Timeout {
        stack_name: stack_name.to_string(),
        timeout,
        last_status,
    };

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        let status = query.stack_status(stack_name).await?;
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        match classify(&status) {
            Stability::Stable => return Ok(status),
            Stability::Failed => {
                return Err(WaitError::StackFailed {
                    stack_name: stack_name.to_string(),
                    status,
                })
            }
            Stability::InProgress => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(timed_out(status));
        }

        let wake_at = now
            .checked_add(poll_interval)
            .map_or(deadline, |next| next.min(deadline));
        tokio::select! {
            () = cancel.cancelled() => return Err(cancelled()),
            () = sleep_until(wake_at) => {}
        }

        if Instant::now() >= deadline {
            return Err(timed_out(status));
        }
    }
}

/// Stand-in deadline for timeouts too large to represent as an `Instant`.
fn far_future(from: Instant) -> Instant {
    // About 30 years.
    from.checked_add(Duration::from_secs(86_400 * 365 * 30)).unwrap_or(from)
}
