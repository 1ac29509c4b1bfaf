//! Error taxonomy for configuration synthesis.
//!
//! Generators and the composer return [`SynthError`]; the validator and the
//! reference checker never fail and report through their own diagnostic
//! structs instead.

/// Errors raised while turning typed resource descriptions into Terraform text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    /// Input failed typed validation. Nothing was rendered.
    #[error("schema error{}: {message}", at_path(.path))]
    Schema { path: String, message: String },

    /// No template is registered under the requested identifier.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template exists but could not be rendered with the given context.
    #[error("render error in template '{template}': {message}")]
    Render { template: String, message: String },

    /// Strict reference checking found dangling or cyclic references.
    #[error("reference check failed:\n  - {}", .0.join("\n  - "))]
    References(Vec<String>),
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}

impl SynthError {
    /// Schema error at a dotted input location (empty for the top level).
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        SynthError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Prefix the location of a schema error with the field that contained it.
    ///
    /// Other variants pass through untouched.
    pub fn within(self, parent: &str) -> Self {
        match self {
            SynthError::Schema { path, message } => {
                let path = match (parent.is_empty(), path.is_empty()) {
                    (true, _) => path,
                    (false, true) => parent.to_string(),
                    (false, false) if path.starts_with('[') => format!("{parent}{path}"),
                    (false, false) => format!("{parent}.{path}"),
                };
                SynthError::Schema { path, message }
            }
            other => other,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, SynthError::Schema { .. })
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::schema("", e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_display_includes_path() {
        let err = SynthError::schema("operations[0].slas", "must not be empty");
        assert_eq!(
            err.to_string(),
            "schema error at operations[0].slas: must not be empty"
        );
    }

    #[test]
    fn schema_display_without_path() {
        let err = SynthError::schema("", "missing field `policy_name`");
        assert_eq!(err.to_string(), "schema error: missing field `policy_name`");
    }

    #[test]
    fn within_nests_paths() {
        let err = SynthError::schema("slas", "must not be empty")
            .within("[2]")
            .within("operations");
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "operations[2].slas"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn within_leaves_other_variants() {
        let err = SynthError::TemplateNotFound("x.tf.j2".into()).within("policy");
        assert_eq!(err, SynthError::TemplateNotFound("x.tf.j2".into()));
    }

    #[test]
    fn references_lists_each_problem() {
        let err = SynthError::References(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "reference check failed:\n  - a\n  - b");
    }
}
