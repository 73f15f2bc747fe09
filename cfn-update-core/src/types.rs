//! Shared data types for stack update planning and reporting

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Validated parameter overrides, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    pub(crate) fn new(parameters: BTreeMap<String, String>) -> Self {
        Self(parameters)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parameter as currently declared on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackParameter {
    pub key: String,
    pub value: Option<String>,
}

/// Point-in-time description of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSnapshot {
    pub stack_name: String,
    pub stack_id: Option<String>,
    pub status: String,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<String>,
    pub outputs: BTreeMap<String, String>,
}

/// What happens to one declared parameter during the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ParameterChange {
    /// Keep whatever value the stack already has.
    Keep { key: String },
    /// Replace the current value.
    Set {
        key: String,
        previous: Option<String>,
        value: String,
    },
}

impl ParameterChange {
    pub fn key(&self) -> &str {
        match self {
            Self::Keep { key } | Self::Set { key, .. } => key,
        }
    }
}

/// Result of planning an update: the stack as described plus a decision
/// for every parameter it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    pub stack: StackSnapshot,
    pub changes: Vec<ParameterChange>,
}

impl UpdatePlan {
    /// True when applying this plan would not change any parameter value.
    pub fn is_empty(&self) -> bool {
        !self
            .changes
            .iter()
            .any(|c| matches!(c, ParameterChange::Set { .. }))
    }
}

/// Timing for stack stability waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Overrides for AWS SDK configuration loading.
#[derive(Debug, Clone, Default)]
pub struct AwsOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Nothing to apply; the stack was left untouched.
    Unchanged { stack_name: String },
    Updated {
        stack_name: String,
        stack_id: Option<String>,
        final_status: String,
        outputs: BTreeMap<String, String>,
    },
}
