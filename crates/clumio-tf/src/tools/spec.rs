//! Structured tool descriptions with usage guidance.
//!
//! `ToolSpec` turns purpose, when to use, when not to use, and examples into
//! the description text every operation exports with its definition.

use super::core::{ToolDef, json_schema_for};

/// A structured tool specification.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    /// One-sentence imperative purpose: "Generate a Clumio backup policy".
    pub purpose: String,
    pub when_to_use: String,
    /// When this tool should NOT be used, usually naming the tool to use instead.
    pub when_not_to_use: String,
    pub parameters: serde_json::Value,
    pub examples: Vec<UsageExample>,
    pub output_format: String,
}

/// A usage example for a tool.
#[derive(Debug, Clone)]
pub struct UsageExample {
    pub input: String,
    pub output: String,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            purpose: String::new(),
            when_to_use: String::new(),
            when_not_to_use: String::new(),
            parameters: None,
            examples: Vec::new(),
            output_format: None,
        }
    }

    /// The multi-line description sent with the definition. Empty guidance
    /// fields are left out.
    pub fn to_description(&self) -> String {
        let mut desc = format!("{}.", self.purpose);
        if !self.when_to_use.is_empty() {
            desc.push_str(&format!("\nWhen to use: {}", self.when_to_use));
        }
        if !self.when_not_to_use.is_empty() {
            desc.push_str(&format!("\nWhen NOT to use: {}", self.when_not_to_use));
        }

        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for ex in &self.examples {
                desc.push_str(&format!("\n  - Input: {} → {}", ex.input, ex.output));
            }
        }

        if !self.output_format.is_empty() {
            desc.push_str(&format!("\nOutput format: {}", self.output_format));
        }
        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

pub struct ToolSpecBuilder {
    name: String,
    purpose: String,
    when_to_use: String,
    when_not_to_use: String,
    parameters: Option<serde_json::Value>,
    examples: Vec<UsageExample>,
    output_format: Option<String>,
}

impl ToolSpecBuilder {
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.when_to_use = when.into();
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.when_not_to_use = when_not.into();
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.parameters = Some(params);
        self
    }

    /// Derive the parameter schema from the argument type, so the schema and
    /// deserialization can never diverge.
    pub fn parameters_for<T: schemars::JsonSchema>(self) -> Self {
        self.parameters(json_schema_for::<T>())
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.examples.push(UsageExample {
            input: input.into(),
            output: output.into(),
        });
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.build().to_tool_def()
    }

    /// Build the spec. Without parameters the tool takes an empty object.
    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            purpose: self.purpose,
            when_to_use: self.when_to_use,
            when_not_to_use: self.when_not_to_use,
            parameters: self
                .parameters
                .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}})),
            examples: self.examples,
            output_format: self.output_format.unwrap_or_else(|| "Terraform HCL text".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tool_spec() {
        let spec = ToolSpec::builder("generate_policy")
            .purpose("Generate a Clumio backup policy")
            .when_to_use("When a policy with SLAs is needed")
            .when_not_to_use("When assigning a policy to buckets; use generate_protection_group")
            .parameters(serde_json::json!({
                "type": "object",
                "properties": {"policy_name": {"type": "string"}},
                "required": ["policy_name"]
            }))
            .example("policy_name=gold", "resource \"clumio_policy\" \"gold\" { ... }")
            .build();

        assert_eq!(spec.name, "generate_policy");
        let desc = spec.to_description();
        assert!(desc.starts_with("Generate a Clumio backup policy."));
        assert!(desc.contains("When NOT to use:"));
        assert!(desc.contains("generate_protection_group"));
        assert!(desc.contains("Input: policy_name=gold"));
        assert!(desc.ends_with("Output format: Terraform HCL text"));
    }

    #[test]
    fn builder_to_tool_def_shortcut() {
        let def = ToolSpec::builder("shortcut_tool")
            .purpose("A tool built via the shortcut")
            .when_to_use("When testing the shortcut")
            .when_not_to_use("Never")
            .output_format("JSON")
            .to_tool_def();

        assert_eq!(def.function.name, "shortcut_tool");
        assert!(def.function.description.contains("A tool built via the shortcut"));
        assert!(def.function.description.contains("Output format: JSON"));
        assert_eq!(def.function.parameters["type"], "object");
    }

    #[test]
    fn empty_guidance_is_omitted() {
        let desc = ToolSpec::builder("bare").purpose("Do a thing").build().to_description();
        assert!(!desc.contains("When to use"));
        assert!(!desc.contains("When NOT to use"));
        assert!(!desc.contains("Examples"));
    }
}
