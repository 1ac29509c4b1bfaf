//! Resource generators: validate an entity, build its context, render it.
//!
//! Every generator returns one self-contained block of Terraform (for
//! providers, one block per declared account) with surrounding whitespace
//! trimmed. Output depends only on the input.

use crate::error::{Result, SynthError};
use crate::model::{
    AwsConnection, OrganizationalUnit, Policy, PolicyRule, ProtectionGroup, ProviderAccounts,
    ReportConfiguration, User, Validate,
};
use crate::template::{self, ResourceContext};
use tracing::debug;

fn generate<E>(entity: &E, name: &str) -> Result<String>
where
    E: Validate,
    for<'a> ResourceContext: From<&'a E>,
{
    entity.validate()?;
    let context = ResourceContext::from(entity);
    let text = template::render_resource(&context)?.trim().to_string();
    debug!(kind = context.kind(), name, bytes = text.len(), "generated resource");
    Ok(text)
}

/// `terraform`, variable, and `provider` blocks for the given accounts.
pub fn providers(accounts: &ProviderAccounts) -> Result<String> {
    if accounts.is_empty() {
        return Err(SynthError::schema(
            "",
            "at least one Clumio or AWS account is required",
        ));
    }
    generate(accounts, "providers")
}

pub fn aws_connection(connection: &AwsConnection) -> Result<String> {
    generate(connection, &connection.connection_name)
}

pub fn policy(policy: &Policy) -> Result<String> {
    generate(policy, &policy.policy_name)
}

pub fn protection_group(group: &ProtectionGroup) -> Result<String> {
    generate(group, &group.group_name)
}

pub fn organizational_unit(ou: &OrganizationalUnit) -> Result<String> {
    generate(ou, &ou.ou_name)
}

pub fn policy_rule(rule: &PolicyRule) -> Result<String> {
    generate(rule, &rule.rule_name)
}

/// The user plus a `clumio_role` lookup for each distinct role it is granted.
pub fn user(user: &User) -> Result<String> {
    generate(user, &user.user_name)
}

pub fn report_configuration(report: &ReportConfiguration) -> Result<String> {
    generate(report, &report.config_name)
}
