//! Connection between a Clumio account and an AWS account.

use super::{Validate, require_identifier, require_optional_identifier};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which AWS services the connection enables protection for.
///
/// Unknown service names are rejected rather than silently dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Services {
    #[serde(default)]
    pub ebs: bool,
    #[serde(default)]
    pub rds: bool,
    #[serde(default)]
    pub s3: bool,
    #[serde(default)]
    pub dynamodb: bool,
}

impl Services {
    pub fn all() -> Self {
        Self {
            ebs: true,
            rds: true,
            s3: true,
            dynamodb: true,
        }
    }
}

/// A `clumio_aws_connection` plus the data-plane module that installs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AwsConnection {
    /// Resource name for the connection.
    pub connection_name: String,
    /// Description of the AWS account connection.
    pub description: String,
    /// Services to enable, e.g. `{"ebs": true, "s3": true}`.
    #[serde(default)]
    pub services: Services,
    /// Alias of the Clumio provider to create the connection with.
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
    /// Alias of the AWS provider for the connected account.
    #[serde(default)]
    pub aws_provider_alias: Option<String>,
    /// Wait for data-plane resources to be created before completing.
    #[serde(default)]
    pub wait_for_data_plane_resources: bool,
    /// Wait for the initial ingestion to complete.
    #[serde(default)]
    pub wait_for_ingestion: bool,
}

impl Validate for AwsConnection {
    fn validate(&self) -> Result<()> {
        require_identifier("connection_name", &self.connection_name)?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )?;
        require_optional_identifier("aws_provider_alias", self.aws_provider_alias.as_deref())
    }
}
