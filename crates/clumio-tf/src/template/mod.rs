//! Template resolver: renders a named template with a serializable context.
//!
//! Templates are embedded at compile time and registered once into a shared
//! [`TemplateStore`]; rendering only reads from it. Undefined variables are
//! errors rather than empty strings.

pub mod context;

pub use context::ResourceContext;

use crate::error::{Result, SynthError};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::trace;

/// Embedded template sources, keyed by template id.
const TEMPLATES: &[(&str, &str)] = &[
    ("provider.tf.j2", include_str!("templates/provider.tf.j2")),
    ("aws_connection.tf.j2", include_str!("templates/aws_connection.tf.j2")),
    ("policy.tf.j2", include_str!("templates/policy.tf.j2")),
    ("protection_group.tf.j2", include_str!("templates/protection_group.tf.j2")),
    ("organizational_unit.tf.j2", include_str!("templates/organizational_unit.tf.j2")),
    ("policy_rule.tf.j2", include_str!("templates/policy_rule.tf.j2")),
    ("user.tf.j2", include_str!("templates/user.tf.j2")),
    ("report_configuration.tf.j2", include_str!("templates/report_configuration.tf.j2")),
];

/// A frozen set of compiled templates.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl TemplateStore {
    /// Compile a store from `(id, source)` pairs.
    pub fn from_sources(sources: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        for &(id, source) in sources {
            env.add_template(id, source)
                .map_err(|e| render_error(id, &e))?;
        }
        Ok(Self { env })
    }

    /// The process-wide store of embedded templates, compiled on first use.
    pub fn global() -> &'static TemplateStore {
        static STORE: OnceLock<TemplateStore> = OnceLock::new();
        STORE.get_or_init(|| {
            // Embedded assets are covered by `embedded_templates_compile`.
            match TemplateStore::from_sources(TEMPLATES) {
                Ok(store) => store,
                Err(e) => panic!("embedded templates failed to compile: {e}"),
            }
        })
    }

    /// Ids of every registered template, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.env.templates().map(|(id, _)| id).collect();
        ids.sort_unstable();
        ids
    }

    /// Render `id` with `context`.
    pub fn render<S: Serialize>(&self, id: &str, context: &S) -> Result<String> {
        let template = self.env.get_template(id).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => SynthError::TemplateNotFound(id.to_string()),
            _ => render_error(id, &e),
        })?;
        let text = template.render(context).map_err(|e| render_error(id, &e))?;
        trace!(template = id, bytes = text.len(), "rendered template");
        Ok(text)
    }
}

fn render_error(id: &str, e: &minijinja::Error) -> SynthError {
    SynthError::Render {
        template: id.to_string(),
        message: e.to_string(),
    }
}

/// Render `id` from the embedded store.
pub fn render<S: Serialize>(id: &str, context: &S) -> Result<String> {
    TemplateStore::global().render(id, context)
}

/// Render a resource context with the template for its kind.
pub fn render_resource(context: &ResourceContext) -> Result<String> {
    render(context.template_id(), context)
}
