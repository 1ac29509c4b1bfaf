//! HCL literal formatting used when building template contexts.
//!
//! Templates never quote or escape anything themselves; every value they
//! interpolate has already been turned into a valid HCL expression here.

/// Quote a string as an HCL string literal.
///
/// `${...}` interpolation sequences are left intact so callers can reference
/// other resources (`"${clumio_aws_connection.prod.aws_region}"`).
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Format a list of strings as an HCL tuple of string literals.
pub fn list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

/// JSON value as an HCL expression, for use inside `jsonencode(...)`.
///
/// As with [`quote`], `${...}` sequences in string values pass through, so
/// operands may reference attributes of other resources.
pub fn json(value: &serde_json::Value) -> String {
    value.to_string()
}

/// `<resource_type>.<name>.id` reference expression.
pub fn id_ref(resource_type: &str, name: &str) -> String {
    format!("{resource_type}.{name}.id")
}

/// Reference expression for a provider alias, e.g. `clumio.global`.
pub fn provider_ref(provider: &str, alias: Option<&str>) -> Option<String> {
    alias.map(|a| format!("{provider}.{a}"))
}

/// Whether `name` is usable as a Terraform resource or alias identifier.
///
/// Identifiers start with a letter or underscore and continue with letters,
/// digits, underscores, or dashes.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Lowercase `snake_case` slug of arbitrary text, for derived identifiers.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
