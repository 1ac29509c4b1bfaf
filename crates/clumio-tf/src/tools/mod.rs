//! The operation surface: every synthesis operation as a [`Tool`].
//!
//! - [`core`]: [`Tool`] trait, [`ToolSet`] dispatcher, definitions and
//!   argument helpers.
//! - [`spec`]: [`ToolSpec`](spec::ToolSpec) builder for descriptions with
//!   `when_to_use` / `when_not_to_use` guidance.
//! - [`synth`]: the operations themselves. Register them all with
//!   [`SynthToolsExt::with_synth_tools`].
//! - [`scenarios`]: the example scenario catalogue.

pub mod core;
pub mod scenarios;
pub mod spec;
pub mod synth;

pub use self::core::{
    DEFAULT_MAX_RESULT_BYTES, FunctionDef, Tool, ToolDef, ToolSet, json_schema_for, limit_result,
    parse_tool_args, validate_tool_arguments,
};
pub use synth::{
    CheckBundleReferences, GenerateAwsConnection, GenerateCompleteSolution,
    GenerateOrganizationalUnit, GeneratePolicy, GeneratePolicyRule, GenerateProtectionGroup,
    GenerateProviders, GenerateReportConfiguration, GenerateUserAssignment, GetExampleScenarios,
    ValidateConfiguration,
};

// ── Tool name constants ─────────────────────────────────────────────

pub const GENERATE_PROVIDERS: &str = "generate_providers";
pub const GENERATE_AWS_CONNECTION: &str = "generate_aws_connection";
pub const GENERATE_POLICY: &str = "generate_policy";
pub const GENERATE_PROTECTION_GROUP: &str = "generate_protection_group";
pub const GENERATE_ORGANIZATIONAL_UNIT: &str = "generate_organizational_unit";
pub const GENERATE_POLICY_RULE: &str = "generate_policy_rule";
pub const GENERATE_USER_ASSIGNMENT: &str = "generate_user_assignment";
pub const GENERATE_REPORT_CONFIGURATION: &str = "generate_report_configuration";
pub const GENERATE_COMPLETE_SOLUTION: &str = "generate_complete_solution";
pub const VALIDATE_CONFIGURATION: &str = "validate_configuration";
pub const CHECK_BUNDLE_REFERENCES: &str = "check_bundle_references";
pub const GET_EXAMPLE_SCENARIOS: &str = "get_example_scenarios";

// ── Extension trait ─────────────────────────────────────────────────

/// Extension trait for registering the synthesis operations on a [`ToolSet`].
///
/// ```ignore
/// let tools = ToolSet::new()
///     .with_arg_validation(true)
///     .with_synth_tools(false);
/// ```
pub trait SynthToolsExt {
    fn with_synth_tools(self, strict_references: bool) -> Self;
}

impl SynthToolsExt for ToolSet {
    fn with_synth_tools(self, strict_references: bool) -> Self {
        self.with(GenerateProviders)
            .with(GenerateAwsConnection)
            .with(GeneratePolicy)
            .with(GenerateProtectionGroup)
            .with(GenerateOrganizationalUnit)
            .with(GeneratePolicyRule)
            .with(GenerateUserAssignment)
            .with(GenerateReportConfiguration)
            .with(GenerateCompleteSolution::new(strict_references))
            .with(ValidateConfiguration)
            .with(CheckBundleReferences)
            .with(GetExampleScenarios)
    }
}
