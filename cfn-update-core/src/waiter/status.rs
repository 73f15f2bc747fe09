//! Classification of CloudFormation stack statuses

use aws_sdk_cloudformation::types::StackStatus;

/// How a stack status affects a stability wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Settled in a state the caller can proceed from.
    Stable,
    /// Settled in a state that needs operator attention.
    Failed,
    /// An operation is still running.
    InProgress,
}

static STATUS_TABLE: &[(StackStatus, Stability)] = &[
    (StackStatus::CreateComplete, Stability::Stable),
    (StackStatus::UpdateComplete, Stability::Stable),
    (StackStatus::UpdateRollbackComplete, Stability::Stable),
    (StackStatus::RollbackComplete, Stability::Stable),
    (StackStatus::ImportComplete, Stability::Stable),
    (StackStatus::ImportRollbackComplete, Stability::Stable),
    (StackStatus::CreateFailed, Stability::Failed),
    (StackStatus::RollbackFailed, Stability::Failed),
    (StackStatus::UpdateFailed, Stability::Failed),
    (StackStatus::UpdateRollbackFailed, Stability::Failed),
    (StackStatus::DeleteFailed, Stability::Failed),
    (StackStatus::DeleteComplete, Stability::Failed),
    (StackStatus::ImportRollbackFailed, Stability::Failed),
    // Waits on a change set that will never execute by itself.
    (StackStatus::ReviewInProgress, Stability::Failed),
    (StackStatus::CreateInProgress, Stability::InProgress),
    (StackStatus::RollbackInProgress, Stability::InProgress),
    (StackStatus::DeleteInProgress, Stability::InProgress),
    (StackStatus::UpdateInProgress, Stability::InProgress),
    (StackStatus::UpdateCompleteCleanupInProgress, Stability::InProgress),
    (StackStatus::UpdateRollbackInProgress, Stability::InProgress),
    (
        StackStatus::UpdateRollbackCompleteCleanupInProgress,
        Stability::InProgress,
    ),
    (StackStatus::ImportInProgress, Stability::InProgress),
    (StackStatus::ImportRollbackInProgress, Stability::InProgress),
];

/// Classify a stack status.
///
/// Statuses the SDK does not model yet are treated as in progress when their
/// name ends in `_IN_PROGRESS` and as failed otherwise.
pub fn classify(status: &StackStatus) -> Stability {
    STATUS_TABLE
        .iter()
        .find(|(known, _)| known == status)
        .map_or_else(
            || {
                if status.as_str().ends_with("_IN_PROGRESS") {
                    Stability::InProgress
                } else {
                    Stability::Failed
                }
            },
            |(_, stability)| *stability,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_statuses() {
        assert_eq!(classify(&StackStatus::UpdateComplete), Stability::Stable);
        assert_eq!(
            classify(&StackStatus::UpdateRollbackComplete),
            Stability::Stable
        );
        assert_eq!(
            classify(&StackStatus::UpdateRollbackFailed),
            Stability::Failed
        );
        assert_eq!(classify(&StackStatus::DeleteComplete), Stability::Failed);
        assert_eq!(
            classify(&StackStatus::UpdateRollbackInProgress),
            Stability::InProgress
        );
        assert_eq!(
            classify(&StackStatus::UpdateCompleteCleanupInProgress),
            Stability::InProgress
        );
    }

    #[test]
    fn test_classify_unmodelled_statuses() {
        assert_eq!(
            classify(&StackStatus::from("MIGRATE_IN_PROGRESS")),
            Stability::InProgress
        );
        assert_eq!(
            classify(&StackStatus::from("MIGRATE_FAILED")),
            Stability::Failed
        );
    }

    #[test]
    fn test_every_table_entry_is_unique() {
        for (i, (status, _)) in STATUS_TABLE.iter().enumerate() {
            assert!(
                STATUS_TABLE[i + 1..].iter().all(|(other, _)| other != status),
                "{} listed twice",
                status.as_str()
            );
        }
    }
}
