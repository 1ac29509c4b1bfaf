//! Synthesis configuration with sensible defaults.
//!
//! [`SynthConfig`] captures the few switches the operation surface has and
//! turns them into a registered [`ToolSet`] via
//! [`build_tool_set`](SynthConfig::build_tool_set).

use crate::tools::{DEFAULT_MAX_RESULT_BYTES, SynthToolsExt, ToolSet};

#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Validate arguments against each operation's JSON Schema before
    /// running it. Default: `true`.
    pub validate_args: bool,
    /// Largest result returned by the tool set. Default: `200_000`.
    pub max_result_bytes: usize,
    /// Refuse to compose bundles with broken references. Default: `false`.
    pub strict_references: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            validate_args: true,
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
            strict_references: false,
        }
    }
}

impl SynthConfig {
    pub fn with_validate_args(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    pub fn with_max_result_bytes(mut self, max: usize) -> Self {
        self.max_result_bytes = max;
        self
    }

    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// Build a [`ToolSet`] with every synthesis operation registered.
    pub fn build_tool_set(&self) -> ToolSet {
        ToolSet::new()
            .with_max_result_bytes(self.max_result_bytes)
            .with_arg_validation(self.validate_args)
            .with_synth_tools(self.strict_references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SynthConfig::default();
        assert!(config.validate_args);
        assert_eq!(config.max_result_bytes, 200_000);
        assert!(!config.strict_references);
    }

    #[test]
    fn build_tool_set_registers_every_operation() {
        let tools = SynthConfig::default().build_tool_set();
        let names: Vec<String> = tools
            .definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "check_bundle_references",
                "generate_aws_connection",
                "generate_complete_solution",
                "generate_organizational_unit",
                "generate_policy",
                "generate_policy_rule",
                "generate_protection_group",
                "generate_providers",
                "generate_report_configuration",
                "generate_user_assignment",
                "get_example_scenarios",
                "validate_configuration",
            ]
        );
    }

    #[test]
    fn builders_override_defaults() {
        let config = SynthConfig::default()
            .with_validate_args(false)
            .with_max_result_bytes(10)
            .with_strict_references(true);
        assert!(!config.validate_args);
        assert_eq!(config.max_result_bytes, 10);
        assert!(config.strict_references);

        let out = config.build_tool_set().execute("get_example_scenarios", "{}");
        assert!(out.starts_with("Error: result of"), "{out}");
    }
}
