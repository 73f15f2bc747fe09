//! AWS SDK integration: CloudFormation client wrapper and SDK configuration.

pub(crate) mod cfn_client;

use crate::types::AwsOptions;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("CloudFormation error: {0}")]
    CloudFormationError(String),
    #[error("Stack '{0}' does not exist")]
    StackNotFound(String),
}

pub type AwsResult<T> = Result<T, AwsError>;

/// Load SDK configuration through the default provider chain, applying any
/// region or profile override.
pub(crate) async fn load_sdk_config(options: &AwsOptions) -> AwsResult<aws_config::SdkConfig> {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(profile) = &options.profile {
        loader = loader.profile_name(profile);
    }
    let config = loader.load().await;
    if config.region().is_none() {
        return Err(AwsError::ConfigError(
            "no AWS region configured for the current profile or environment".to_string(),
        ));
    }
    Ok(config)
}
