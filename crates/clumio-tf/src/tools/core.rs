//! Operation abstraction for the synthesis surface.
//!
//! The [`Tool`] trait defines what every operation provides: a static
//! definition (name, description, JSON Schema of its arguments) and an
//! `execute` method from raw JSON arguments to a result string. Tools are
//! collected into a [`ToolSet`] which handles dispatch, argument validation,
//! definition export, and the result size limit.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Maximum size (in bytes) of a tool result.
pub const DEFAULT_MAX_RESULT_BYTES: usize = 200_000;

const ARGS_PREVIEW_CHARS: usize = 120;
const RESULT_PREVIEW_CHARS: usize = 300;

// ── Definitions ────────────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Tool definition in the function-calling format.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Generate the JSON Schema of an argument type as a `serde_json::Value`.
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Tool trait ─────────────────────────────────────────────────────

/// One operation of the synthesis surface.
///
/// Failures are returned as `"Error: ..."` strings rather than panics; the
/// caller receives the string as the operation's result either way.
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDef;

    /// Run the operation on a raw JSON arguments string.
    fn execute(&self, arguments: &str) -> String;

    fn name(&self) -> String {
        self.definition().function.name
    }
}

// ── ToolSet ────────────────────────────────────────────────────────

/// A collection of tools that can be dispatched by name.
///
/// ```ignore
/// let tools = ToolSet::new()
///     .with_arg_validation(true)
///     .with_synth_tools(false);
///
/// let text = tools.execute("generate_policy", r#"{"policy_name": "gold", ...}"#);
/// ```
pub struct ToolSet {
    tools: HashMap<String, Box<dyn Tool>>,
    max_result_bytes: usize,
    /// Whether to validate tool arguments against JSON Schema before execution.
    validate_args: bool,
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolSet")
            .field("tools", &names)
            .field("max_result_bytes", &self.max_result_bytes)
            .field("validate_args", &self.validate_args)
            .finish()
    }
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
            validate_args: false,
        }
    }

    /// Set the largest result, in bytes, returned to the caller.
    pub fn with_max_result_bytes(mut self, max: usize) -> Self {
        self.max_result_bytes = max;
        self
    }

    /// Enable JSON Schema argument validation before tool execution.
    pub fn with_arg_validation(mut self, enabled: bool) -> Self {
        self.validate_args = enabled;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    /// Register a tool (builder pattern).
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Register `tool` only when `condition` holds, keeping the builder chain.
    pub fn with_if(self, condition: bool, tool: impl Tool + 'static) -> Self {
        if condition { self.with(tool) } else { self }
    }

    /// Definitions of every registered tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        let mut defs: Vec<ToolDef> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        defs
    }

    pub fn definition(&self, name: &str) -> Option<ToolDef> {
        self.tools.get(name).map(|t| t.definition())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call by name.
    ///
    /// With argument validation enabled, arguments that do not match the
    /// tool's schema are rejected before the tool runs. A result larger than
    /// the configured limit is replaced by an error. Rejections and failed
    /// calls are logged at WARN.
    pub fn execute(&self, name: &str, arguments: &str) -> String {
        let Some(tool) = self.tools.get(name) else {
            return format!("Error: unknown tool '{name}'");
        };

        if self.validate_args
            && let Some(error) = validate_tool_arguments(tool.as_ref(), arguments)
        {
            warn!("[tool] {name} rejected arguments");
            return error;
        }

        log_tool_call(name, arguments);
        let start = Instant::now();
        let result = tool.execute(arguments);
        if result.starts_with("Error:") {
            warn!(
                "[tool] {name} failed: {}",
                result.lines().next().unwrap_or_default()
            );
        }

        debug!(
            "Tool {name} completed in {:.0}ms ({} bytes)",
            start.elapsed().as_secs_f64() * 1000.0,
            result.len()
        );
        trace!(
            "Tool {name} result preview: {}",
            result.chars().take(RESULT_PREVIEW_CHARS).collect::<String>()
        );

        limit_result(result, self.max_result_bytes)
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Validate tool arguments against the tool's declared JSON Schema.
///
/// Returns `None` if valid, or `Some(error_string)` listing every violation.
pub fn validate_tool_arguments(tool: &dyn Tool, arguments: &str) -> Option<String> {
    let args_value: serde_json::Value = match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            return Some(format!(
                "Error: invalid JSON arguments for tool '{}': {e}",
                tool.name()
            ));
        }
    };

    let schema = tool.definition().function.parameters;
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            warn!("[tool] {} has an unusable argument schema: {e}", tool.name());
            return None;
        }
    };

    let errors: Vec<String> = validator
        .iter_errors(&args_value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(format!(
            "Error: argument validation failed for tool '{}':\n{}",
            tool.name(),
            errors.join("\n")
        ))
    }
}

/// Log a tool call at INFO level with a truncated preview of arguments.
pub fn log_tool_call(name: &str, arguments: &str) {
    let args_preview: String = arguments.chars().take(ARGS_PREVIEW_CHARS).collect();
    info!(
        "[tool] {}({args_preview}{})",
        name,
        if args_preview.len() < arguments.len() { "..." } else { "" }
    );
    debug!("[tool] {name} full args ({} bytes)", arguments.len());
    trace!("[tool] {name} arguments: {arguments}");
}

/// Pass `result` through when it fits in `max` bytes, otherwise replace it
/// with an error naming both sizes.
pub fn limit_result(result: String, max: usize) -> String {
    if result.len() > max {
        warn!("[tool] result of {} bytes exceeds the limit of {max}", result.len());
        format!(
            "Error: result of {} bytes exceeds the {max}-byte limit",
            result.len()
        )
    } else {
        result
    }
}

/// Parse raw JSON arguments into a typed struct, formatting failures for the
/// caller.
pub fn parse_tool_args<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, String> {
    serde_json::from_str(arguments).map_err(|e| format!("Error: invalid tool arguments: {e}"))
}
