//! Provider accounts: the Clumio control plane and the AWS accounts it protects.

use super::{Validate, require_optional_identifier, require_text};
use crate::error::{Result, SynthError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A Clumio account to configure a `clumio` provider block for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClumioAccount {
    /// Provider alias used to reference this account from resources. Not
    /// needed when there is only one Clumio account.
    #[serde(default)]
    pub alias: Option<String>,
    /// Resource name of the organizational unit this provider operates in.
    #[serde(default)]
    pub ou_name: Option<String>,
}

impl Validate for ClumioAccount {
    fn validate(&self) -> Result<()> {
        require_optional_identifier("alias", self.alias.as_deref())?;
        require_optional_identifier("ou_name", self.ou_name.as_deref())
    }
}

/// Role the AWS provider assumes for its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssumeRole {
    /// ARN of the role to assume.
    pub role_arn: String,
    /// Name of the session to create.
    #[serde(default)]
    pub session_name: Option<String>,
    /// External ID to include in the assume-role request.
    #[serde(default)]
    pub external_id: Option<String>,
}

impl Validate for AssumeRole {
    fn validate(&self) -> Result<()> {
        require_text("role_arn", &self.role_arn)
    }
}

/// An AWS account to configure an `aws` provider block for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AwsAccount {
    /// Provider alias used to reference this account from resources.
    #[serde(default)]
    pub alias: Option<String>,
    /// AWS region, e.g. `us-west-2`.
    #[serde(default)]
    pub region: Option<String>,
    /// Pre-configured AWS CLI profile to authenticate with.
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub assume_role: Option<AssumeRole>,
}

impl Validate for AwsAccount {
    fn validate(&self) -> Result<()> {
        require_optional_identifier("alias", self.alias.as_deref())?;
        self.assume_role
            .validate()
            .map_err(|e| e.within("assume_role"))
    }
}

/// Both account lists as accepted by `generate_providers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProviderAccounts {
    #[serde(default)]
    pub clumio_accounts: Vec<ClumioAccount>,
    #[serde(default)]
    pub aws_accounts: Vec<AwsAccount>,
}

impl ProviderAccounts {
    pub fn is_empty(&self) -> bool {
        self.clumio_accounts.is_empty() && self.aws_accounts.is_empty()
    }
}

impl Validate for ProviderAccounts {
    fn validate(&self) -> Result<()> {
        self.clumio_accounts
            .validate()
            .map_err(|e| e.within("clumio_accounts"))?;
        self.aws_accounts
            .validate()
            .map_err(|e| e.within("aws_accounts"))?;
        check_aliases(
            "clumio_accounts",
            self.clumio_accounts.iter().map(|a| a.alias.as_deref()),
        )?;
        check_aliases(
            "aws_accounts",
            self.aws_accounts.iter().map(|a| a.alias.as_deref()),
        )
    }
}

/// At most one unaliased account per provider, and no repeated aliases.
fn check_aliases<'a>(field: &str, aliases: impl Iterator<Item = Option<&'a str>>) -> Result<()> {
    let mut seen = HashSet::new();
    let mut unaliased = 0usize;
    for (i, alias) in aliases.enumerate() {
        match alias {
            None => {
                unaliased += 1;
                if unaliased > 1 {
                    return Err(SynthError::schema(
                        format!("{field}[{i}].alias"),
                        "more than one account without an alias; \
                         resources could not tell which provider to use",
                    ));
                }
            }
            Some(a) => {
                if !seen.insert(a) {
                    return Err(SynthError::schema(
                        format!("{field}[{i}].alias"),
                        format!("alias '{a}' is declared more than once"),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn accounts_with_distinct_aliases_are_valid() {
        let accounts: ProviderAccounts = decode(json!({
            "clumio_accounts": [{"alias": "clumio"}, {"alias": "test", "ou_name": "test_ou"}],
            "aws_accounts": [
                {"alias": "prod", "region": "us-east-1", "assume_role": {"role_arn": "arn"}},
                {"alias": "dev", "region": "us-east-1", "profile": "test"}
            ]
        }))
        .unwrap();
        assert_eq!(accounts.clumio_accounts.len(), 2);
        assert_eq!(
            accounts.aws_accounts[0].assume_role.as_ref().unwrap().role_arn,
            "arn"
        );
    }

    #[test]
    fn single_unaliased_account_is_valid() {
        let accounts: ProviderAccounts =
            decode(json!({"clumio_accounts": [{}], "aws_accounts": []})).unwrap();
        assert_eq!(accounts.clumio_accounts, vec![ClumioAccount::default()]);
    }

    #[test]
    fn two_unaliased_accounts_are_rejected() {
        let err = decode::<ProviderAccounts>(json!({"clumio_accounts": [{}, {}]})).unwrap_err();
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "clumio_accounts[1].alias"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_aliases_are_rejected() {
        let err = decode::<ProviderAccounts>(json!({
            "aws_accounts": [{"alias": "prod"}, {"alias": "prod"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("'prod' is declared more than once"));
    }

    #[test]
    fn blank_role_arn_is_rejected() {
        let err = decode::<ProviderAccounts>(json!({
            "aws_accounts": [{"assume_role": {"role_arn": " "}}]
        }))
        .unwrap_err();
        match err {
            SynthError::Schema { path, .. } => {
                assert_eq!(path, "aws_accounts[0].assume_role.role_arn")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
