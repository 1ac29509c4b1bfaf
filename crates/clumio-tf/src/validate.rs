//! Static checks over generated Terraform text.
//!
//! The validator does not parse HCL. It looks for the textual markers of a
//! few structural and security problems and reports them as diagnostics;
//! it never rejects or alters the input.

use serde::Serialize;
use tracing::debug;

pub const MISSING_CLUMIO_PROVIDER: &str = "Missing Clumio provider configuration";
pub const MISSING_AWS_PROVIDER: &str = "AWS resources found but no AWS provider configured";
pub const TOKEN_NOT_SENSITIVE: &str = "Clumio API token should be marked as sensitive";
pub const HARDCODED_TOKEN: &str = "Hardcoded Clumio API token detected; use a variable reference";
pub const ADD_REQUIRED_VERSION: &str =
    "Consider adding a required_version constraint to the terraform block";
pub const REVIEW_BACKUP_WINDOWS: &str = "Review backup windows to avoid overlap with peak hours";
pub const REVIEW_RETENTION: &str = "Ensure retention periods align with compliance requirements";

const TOKEN_FIELD: &str = "clumio_api_token";

/// Findings for one document, each list in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Split `line` into a trimmed `key = value` pair.
fn assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn has_assignment(text: &str, key: &str, value: &str) -> bool {
    text.lines()
        .filter_map(assignment)
        .any(|(k, v)| k == key && v == value)
}

/// A line assigning the API token something other than a `var.` reference.
fn has_hardcoded_token(text: &str) -> bool {
    text.lines()
        .filter_map(assignment)
        .any(|(k, v)| k == TOKEN_FIELD && !v.starts_with("var."))
}

fn has_terraform_block(text: &str) -> bool {
    text.lines().any(|line| {
        line.trim_start()
            .strip_prefix("terraform")
            .is_some_and(|rest| rest.trim_start().starts_with('{'))
    })
}

/// Check `text` and report what was found.
pub fn validate(text: &str) -> Diagnostics {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    if !text.contains("provider \"clumio\"") {
        errors.push(MISSING_CLUMIO_PROVIDER.to_string());
    }

    let mentions_aws = ["resource \"aws_", "data \"aws_", "clumio_aws_connection"]
        .iter()
        .any(|marker| text.contains(marker));
    if mentions_aws && !text.contains("provider \"aws\"") {
        warnings.push(MISSING_AWS_PROVIDER.to_string());
    }

    if text.contains(TOKEN_FIELD) && !has_assignment(text, "sensitive", "true") {
        warnings.push(TOKEN_NOT_SENSITIVE.to_string());
    }

    if has_hardcoded_token(text) {
        errors.push(HARDCODED_TOKEN.to_string());
    }

    if has_terraform_block(text) && !text.contains("required_version") {
        recommendations.push(ADD_REQUIRED_VERSION.to_string());
    }

    if text.contains("backup_window") {
        recommendations.push(REVIEW_BACKUP_WINDOWS.to_string());
    }

    if text.contains("retention") {
        recommendations.push(REVIEW_RETENTION.to_string());
    }

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        recommendations = recommendations.len(),
        "validated configuration"
    );
    Diagnostics {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        recommendations,
    }
}
