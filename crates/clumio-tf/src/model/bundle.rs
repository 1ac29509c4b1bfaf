use super::{
    AwsAccount, AwsConnection, ClumioAccount, OrganizationalUnit, Policy, PolicyRule,
    ProtectionGroup, ProviderAccounts, ReportConfiguration, User, Validate,
};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything to compose into one Terraform document. Every list is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationBundle {
    #[serde(default)]
    pub clumio_accounts: Vec<ClumioAccount>,
    #[serde(default)]
    pub aws_accounts: Vec<AwsAccount>,
    #[serde(default)]
    pub organizational_units: Vec<OrganizationalUnit>,
    #[serde(default)]
    pub aws_connections: Vec<AwsConnection>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub protection_groups: Vec<ProtectionGroup>,
    #[serde(default)]
    pub policy_rules: Vec<PolicyRule>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub report_configurations: Vec<ReportConfiguration>,
}

impl GenerationBundle {
    /// The provider account lists, as `generate_providers` takes them.
    pub fn provider_accounts(&self) -> ProviderAccounts {
        ProviderAccounts {
            clumio_accounts: self.clumio_accounts.clone(),
            aws_accounts: self.aws_accounts.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clumio_accounts.is_empty()
            && self.aws_accounts.is_empty()
            && self.organizational_units.is_empty()
            && self.aws_connections.is_empty()
            && self.policies.is_empty()
            && self.protection_groups.is_empty()
            && self.policy_rules.is_empty()
            && self.users.is_empty()
            && self.report_configurations.is_empty()
    }
}

impl Validate for GenerationBundle {
    fn validate(&self) -> Result<()> {
        self.provider_accounts().validate()?;
        self.organizational_units
            .validate()
            .map_err(|e| e.within("organizational_units"))?;
        self.aws_connections
            .validate()
            .map_err(|e| e.within("aws_connections"))?;
        self.policies.validate().map_err(|e| e.within("policies"))?;
        self.protection_groups
            .validate()
            .map_err(|e| e.within("protection_groups"))?;
        self.policy_rules
            .validate()
            .map_err(|e| e.within("policy_rules"))?;
        self.users.validate().map_err(|e| e.within("users"))?;
        self.report_configurations
            .validate()
            .map_err(|e| e.within("report_configurations"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn every_list_is_optional() {
        let bundle: GenerationBundle = decode(json!({})).unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn nested_errors_name_the_section() {
        let err = decode::<GenerationBundle>(json!({
            "policies": [{
                "policy_name": "gold",
                "display_name": "Gold",
                "operations": [{"type": "aws_ebs_volume_backup", "slas": []}]
            }]
        }))
        .unwrap_err();
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "policies[0].operations[0].slas"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ambiguous_accounts_are_rejected() {
        let err = decode::<GenerationBundle>(json!({
            "aws_accounts": [{"region": "us-east-1"}, {"region": "us-west-2"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("aws_accounts[1].alias"));
    }
}
