//! The synthesis operations, one [`Tool`] per operation.
//!
//! | Tool | Name | Output |
//! |------|------|--------|
//! | [`GenerateProviders`] | `generate_providers` | HCL |
//! | [`GenerateAwsConnection`] | `generate_aws_connection` | HCL |
//! | [`GeneratePolicy`] | `generate_policy` | HCL |
//! | [`GenerateProtectionGroup`] | `generate_protection_group` | HCL |
//! | [`GenerateOrganizationalUnit`] | `generate_organizational_unit` | HCL |
//! | [`GeneratePolicyRule`] | `generate_policy_rule` | HCL |
//! | [`GenerateUserAssignment`] | `generate_user_assignment` | HCL |
//! | [`GenerateReportConfiguration`] | `generate_report_configuration` | HCL |
//! | [`GenerateCompleteSolution`] | `generate_complete_solution` | HCL document |
//! | [`ValidateConfiguration`] | `validate_configuration` | JSON diagnostics |
//! | [`CheckBundleReferences`] | `check_bundle_references` | JSON report |
//! | [`GetExampleScenarios`] | `get_example_scenarios` | JSON catalogue |

use super::core::{Tool, ToolDef, parse_tool_args};
use super::scenarios::CATALOGUE;
use super::spec::ToolSpec;
use crate::compose::{self, ComposeOptions};
use crate::error::{Result, SynthError};
use crate::generate;
use crate::model::{
    AwsConnection, GenerationBundle, OrganizationalUnit, Policy, PolicyRule, ProtectionGroup,
    ProviderAccounts, ReportConfiguration, User,
};
use crate::references;
use crate::validate;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Helpers ─────────────────────────────────────────────────────────

/// Decode `arguments` as `T` and run `op` on it, reporting failures as
/// `Error:` strings.
fn respond<T: DeserializeOwned>(arguments: &str, op: impl FnOnce(&T) -> Result<String>) -> String {
    let outcome = serde_json::from_str::<T>(arguments)
        .map_err(SynthError::from)
        .and_then(|args| op(&args));
    match outcome {
        Ok(text) => text,
        Err(e) => format!("Error: {e}"),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {e}"))
}

// ── GenerateProviders ───────────────────────────────────────────────

pub struct GenerateProviders;

impl Tool for GenerateProviders {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_PROVIDERS)
            .purpose("Generate the terraform, variable, and provider blocks for Clumio and AWS accounts")
            .when_to_use(
                "When starting a configuration, or when accounts are added; every other \
                 resource needs a provider to be applied with",
            )
            .when_not_to_use(
                "When generating a whole configuration at once; use generate_complete_solution, \
                 which renders providers itself",
            )
            .parameters_for::<ProviderAccounts>()
            .example(
                r#"{"clumio_accounts": [{}], "aws_accounts": [{"region": "us-east-1"}]}"#,
                "terraform block, clumio_api_token variable, one clumio and one aws provider",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::providers)
    }
}

// ── GenerateAwsConnection ───────────────────────────────────────────

pub struct GenerateAwsConnection;

impl Tool for GenerateAwsConnection {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_AWS_CONNECTION)
            .purpose("Generate a Clumio connection to an AWS account with its data-plane module")
            .when_to_use("When an AWS account should be registered with Clumio for protection")
            .when_not_to_use(
                "When only the AWS provider itself is needed; use generate_providers",
            )
            .parameters_for::<AwsConnection>()
            .example(
                r#"{"connection_name": "prod", "description": "Production", "services": {"ebs": true, "s3": true}}"#,
                "clumio_aws_connection.prod plus module \"clumio_protect_prod\"",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::aws_connection)
    }
}

// ── GeneratePolicy ──────────────────────────────────────────────────

pub struct GeneratePolicy;

impl Tool for GeneratePolicy {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_POLICY)
            .purpose("Generate a Clumio backup policy with its operations and SLAs")
            .when_to_use("When defining retention, RPO, and backup windows for a kind of asset")
            .when_not_to_use(
                "When choosing which assets a policy protects; use generate_protection_group \
                 or generate_policy_rule",
            )
            .parameters_for::<Policy>()
            .example(
                r#"{"policy_name": "gold", "display_name": "Gold", "operations": [{"type": "aws_ebs_volume_backup", "slas": [...]}]}"#,
                "resource \"clumio_policy\" \"gold\" with one operations block",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::policy)
    }
}

// ── GenerateProtectionGroup ─────────────────────────────────────────

pub struct GenerateProtectionGroup;

impl Tool for GenerateProtectionGroup {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_PROTECTION_GROUP)
            .purpose("Generate an S3 protection group and assign a policy to it")
            .when_to_use("When S3 buckets matching a rule should be protected by a policy")
            .when_not_to_use(
                "When protecting EBS, EC2, RDS, or DynamoDB assets by tag; use generate_policy_rule",
            )
            .parameters_for::<ProtectionGroup>()
            .example(
                r#"{"group_name": "logs", "display_name": "Logs", "policy_name": "gold", "description": "", "bucket_rule": {"aws_tag": {"$eq": {"key": "env", "value": "prod"}}}}"#,
                "clumio_protection_group.logs and clumio_policy_assignment.logs_assignment",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::protection_group)
    }
}

// ── GenerateOrganizationalUnit ──────────────────────────────────────

pub struct GenerateOrganizationalUnit;

impl Tool for GenerateOrganizationalUnit {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_ORGANIZATIONAL_UNIT)
            .purpose("Generate a Clumio organizational unit")
            .when_to_use("When resources or users should be scoped to part of the organization")
            .when_not_to_use(
                "When only a provider should operate inside an existing unit; set ou_name on \
                 the Clumio account in generate_providers",
            )
            .parameters_for::<OrganizationalUnit>()
            .example(
                r#"{"ou_name": "eng", "display_name": "Engineering", "description": "", "parent_name": "root"}"#,
                "clumio_organizational_unit.eng with parent_id from clumio_organizational_unit.root",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::organizational_unit)
    }
}

// ── GeneratePolicyRule ──────────────────────────────────────────────

pub struct GeneratePolicyRule;

impl Tool for GeneratePolicyRule {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_POLICY_RULE)
            .purpose("Generate a policy rule that applies a policy to assets matching a condition")
            .when_to_use("When assets should be protected by tag, account, region, or entity type")
            .when_not_to_use("When protecting S3 buckets; use generate_protection_group")
            .parameters_for::<PolicyRule>()
            .example(
                r#"{"rule_name": "prod", "display_name": "Prod", "policy_name": "gold", "condition_expression": {"entity_type": {"$eq": "aws_ebs_volume"}}}"#,
                "clumio_policy_rule.prod referencing clumio_policy.gold",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::policy_rule)
    }
}

// ── GenerateUserAssignment ──────────────────────────────────────────

pub struct GenerateUserAssignment;

impl Tool for GenerateUserAssignment {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_USER_ASSIGNMENT)
            .purpose("Generate a Clumio user with role assignments")
            .when_to_use("When granting a person access to Clumio")
            .when_not_to_use("When creating the organizational units themselves; use generate_organizational_unit")
            .parameters_for::<User>()
            .example(
                r#"{"user_name": "jane", "email": "jane@example.com", "full_name": "Jane Doe", "access_control_configuration": [{"role_name": "Super Admin"}]}"#,
                "data \"clumio_role\" lookup followed by clumio_user.jane",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::user)
    }
}

// ── GenerateReportConfiguration ─────────────────────────────────────

pub struct GenerateReportConfiguration;

impl Tool for GenerateReportConfiguration {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_REPORT_CONFIGURATION)
            .purpose("Generate a scheduled compliance report configuration")
            .when_to_use("When stakeholders should receive regular backup compliance reports")
            .when_not_to_use("When checking generated Terraform; use validate_configuration")
            .parameters_for::<ReportConfiguration>()
            .example(
                r#"{"config_name": "weekly", "config_display_name": "Weekly", "email_list": ["ops@example.com"], "controls": {...}}"#,
                "clumio_report_configuration.weekly",
            )
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        respond(arguments, generate::report_configuration)
    }
}

// ── GenerateCompleteSolution ────────────────────────────────────────

/// Compose a whole bundle, optionally refusing broken references.
pub struct GenerateCompleteSolution {
    strict_references: bool,
}

impl GenerateCompleteSolution {
    pub fn new(strict_references: bool) -> Self {
        Self { strict_references }
    }
}

impl Tool for GenerateCompleteSolution {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GENERATE_COMPLETE_SOLUTION)
            .purpose("Generate one ordered Terraform document from a bundle of resources")
            .when_to_use(
                "When producing a complete configuration: providers, organizational units, \
                 connections, policies, protection groups, rules, users, and reports",
            )
            .when_not_to_use("When only one resource is needed; use its generate_* tool")
            .parameters_for::<GenerationBundle>()
            .example(
                r#"{"aws_connections": [...], "policies": [...], "protection_groups": [...]}"#,
                "banner-separated sections in dependency order",
            )
            .output_format("Terraform HCL document; empty when the bundle is empty")
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        let options = ComposeOptions {
            strict_references: self.strict_references,
        };
        respond(arguments, |bundle: &GenerationBundle| {
            compose::compose_with(bundle, options)
        })
    }
}

// ── ValidateConfiguration ───────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
pub struct ValidateConfigurationArgs {
    /// Terraform configuration text to check.
    pub config_text: String,
}

pub struct ValidateConfiguration;

impl Tool for ValidateConfiguration {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::VALIDATE_CONFIGURATION)
            .purpose("Check Terraform text for missing providers and unsafe token handling")
            .when_to_use("After generating or editing a configuration, before applying it")
            .when_not_to_use(
                "When checking that resources in a bundle refer to each other correctly; \
                 use check_bundle_references",
            )
            .parameters_for::<ValidateConfigurationArgs>()
            .example(
                r#"{"config_text": "provider \"clumio\" {}"}"#,
                r#"{"is_valid": true, "errors": [], ...}"#,
            )
            .output_format("JSON object with is_valid, errors, warnings, recommendations")
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        match parse_tool_args::<ValidateConfigurationArgs>(arguments) {
            Ok(args) => to_json(&validate::validate(&args.config_text)),
            Err(e) => e,
        }
    }
}

// ── CheckBundleReferences ───────────────────────────────────────────

pub struct CheckBundleReferences;

impl Tool for CheckBundleReferences {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::CHECK_BUNDLE_REFERENCES)
            .purpose("Report dangling names, duplicates, cycles, and undeclared provider aliases in a bundle")
            .when_to_use("Before composing a bundle assembled from several sources")
            .when_not_to_use("When checking finished Terraform text; use validate_configuration")
            .parameters_for::<GenerationBundle>()
            .example(
                r#"{"protection_groups": [{"policy_name": "missing", ...}]}"#,
                r#"{"is_valid": false, "errors": ["protection group 'g' references unknown policy 'missing'"], ...}"#,
            )
            .output_format("JSON object with is_valid, errors, warnings")
            .to_tool_def()
    }

    fn execute(&self, arguments: &str) -> String {
        match parse_tool_args::<GenerationBundle>(arguments) {
            Ok(bundle) => to_json(&references::check_references(&bundle)),
            Err(e) => e,
        }
    }
}

// ── GetExampleScenarios ─────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
pub struct NoArgs {}

pub struct GetExampleScenarios;

impl Tool for GetExampleScenarios {
    fn definition(&self) -> ToolDef {
        ToolSpec::builder(super::GET_EXAMPLE_SCENARIOS)
            .purpose("List example use cases for these tools")
            .when_to_use("When deciding how to approach a backup configuration request")
            .parameters_for::<NoArgs>()
            .output_format("JSON object with scenarios and integration_examples")
            .to_tool_def()
    }

    fn execute(&self, _arguments: &str) -> String {
        to_json(&CATALOGUE)
    }
}
