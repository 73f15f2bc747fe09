//! cfn-update Service Layer
//!
//! The service holds the CloudFormation client and provides the high-level
//! operations (plan, apply) used by the CLI.

use crate::aws::cfn_client::{AwsCfnClient, StackOperations};
use crate::aws::load_sdk_config;
use crate::error::CfnUpdateResult;
use crate::types::AwsOptions;
use aws_sdk_cloudformation::Client as CfnClient;

/// Main service struct that holds AWS clients and provides business logic operations
pub struct StackUpdateService {
    pub(crate) cfn_client: Box<dyn StackOperations>,
}

impl StackUpdateService {
    /// Create a new service instance with a CloudFormation client
    ///
    /// The configuration is loaded using the default credential provider chain,
    /// with the region and profile taken from `options` when set.
    pub async fn new(options: &AwsOptions) -> CfnUpdateResult<Self> {
        let config = load_sdk_config(options).await?;
        Ok(Self::with_client(AwsCfnClient::new(CfnClient::new(&config))))
    }

    pub(crate) fn with_client(client: impl StackOperations + 'static) -> Self {
        Self {
            cfn_client: Box::new(client),
        }
    }

    // plan() method implementation is in plan.rs
    // apply() method implementation is in apply.rs
}
