//! Composer: renders a whole [`GenerationBundle`] into one ordered document.
//!
//! Sections follow the reference order of the resources: providers,
//! organizational units, AWS connections, policies, protection groups, policy
//! rules, users, compliance reports. Empty sections are left out entirely.

use crate::error::{Result, SynthError};
use crate::generate;
use crate::model::{GenerationBundle, Validate};
use crate::references;
use tracing::{debug, info};

const BANNER_WIDTH: usize = 60;

/// Section titles in document order.
pub const SECTION_TITLES: [&str; 8] = [
    "Providers",
    "Organizational Units",
    "AWS Connections",
    "Policies",
    "Protection Groups",
    "Policy Rules",
    "Users",
    "Compliance Reports",
];

/// Options for [`compose_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeOptions {
    /// Fail with [`SynthError::References`] when the bundle has dangling or
    /// cyclic references.
    pub strict_references: bool,
}

/// Three-line comment banner introducing a section.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("# {rule}\n# {title}\n# {rule}")
}

fn section<T>(
    title: &str,
    items: &[T],
    render: impl Fn(&T) -> Result<String>,
) -> Result<Option<String>> {
    if items.is_empty() {
        debug!(section = title, "skipping empty section");
        return Ok(None);
    }
    let blocks = items.iter().map(render).collect::<Result<Vec<_>>>()?;
    debug!(section = title, items = blocks.len(), "composed section");
    Ok(Some(format!("{}\n{}", banner(title), blocks.join("\n\n"))))
}

/// Compose `bundle` without reference checking.
pub fn compose(bundle: &GenerationBundle) -> Result<String> {
    compose_with(bundle, ComposeOptions::default())
}

/// Compose `bundle`, optionally refusing bundles with broken references.
///
/// The whole bundle is validated before anything is rendered, so an error
/// never leaves a partial document.
pub fn compose_with(bundle: &GenerationBundle, options: ComposeOptions) -> Result<String> {
    bundle.validate()?;
    if options.strict_references {
        let report = references::check_references(bundle);
        if !report.is_valid {
            return Err(SynthError::References(report.errors));
        }
    }

    let [
        providers_title,
        ous_title,
        connections_title,
        policies_title,
        groups_title,
        rules_title,
        users_title,
        reports_title,
    ] = SECTION_TITLES;

    let accounts = bundle.provider_accounts();
    let providers = if accounts.is_empty() {
        debug!(section = providers_title, "skipping empty section");
        None
    } else {
        Some(format!(
            "{}\n{}",
            banner(providers_title),
            generate::providers(&accounts)?
        ))
    };

    let sections: Vec<String> = [
        providers,
        section(ous_title, &bundle.organizational_units, generate::organizational_unit)?,
        section(connections_title, &bundle.aws_connections, generate::aws_connection)?,
        section(policies_title, &bundle.policies, generate::policy)?,
        section(groups_title, &bundle.protection_groups, generate::protection_group)?,
        section(rules_title, &bundle.policy_rules, generate::policy_rule)?,
        section(users_title, &bundle.users, generate::user)?,
        section(reports_title, &bundle.report_configurations, generate::report_configuration)?,
    ]
    .into_iter()
    .flatten()
    .collect();

    info!(sections = sections.len(), "composed document");
    if sections.is_empty() {
        return Ok(String::new());
    }
    let mut document = sections.join("\n\n");
    document.push('\n');
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    fn bundle(value: serde_json::Value) -> GenerationBundle {
        decode(value).unwrap()
    }

    fn policy_json(name: &str) -> serde_json::Value {
        json!({
            "policy_name": name,
            "display_name": name,
            "operations": [{
                "type": "aws_ebs_volume_backup",
                "slas": [{"retention_duration": {"unit": "days", "value": 7},
                          "rpo_frequency": {"unit": "days", "value": 1}}]
            }]
        })
    }

    #[test]
    fn banner_shape() {
        let b = banner("Policies");
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("# {}", "=".repeat(60)));
        assert_eq!(lines[1], "# Policies");
        assert_eq!(lines[2], lines[0]);
    }

    #[test]
    fn empty_bundle_is_empty_document() {
        assert_eq!(compose(&GenerationBundle::default()).unwrap(), "");
    }

    #[test]
    fn single_section_layout() {
        let doc = compose(&bundle(json!({"policies": [policy_json("a"), policy_json("b")]})))
            .unwrap();
        assert!(doc.starts_with(&banner("Policies")));
        assert!(doc.contains(&format!("{}\nresource \"clumio_policy\" \"a\"", banner("Policies"))));
        assert!(doc.contains("}\n\nresource \"clumio_policy\" \"b\""));
        assert!(doc.ends_with("}\n"));
        assert!(!doc.ends_with("\n\n"));
        assert!(!doc.contains("# Providers"));
    }

    #[test]
    fn sections_are_separated_by_one_blank_line() {
        let doc = compose(&bundle(json!({
            "clumio_accounts": [{}],
            "policies": [policy_json("gold")]
        })))
        .unwrap();
        assert!(doc.contains(&format!("}}\n\n{}", banner("Policies"))));
        assert!(!doc.contains("\n\n\n"));
    }

    #[test]
    fn providers_render_once_for_aws_only() {
        let doc = compose(&bundle(json!({"aws_accounts": [{"alias": "a"}, {"alias": "b"}]})))
            .unwrap();
        assert_eq!(doc.matches("# Providers").count(), 1);
        assert_eq!(doc.matches("terraform {").count(), 1);
        assert_eq!(doc.matches("provider \"aws\"").count(), 2);
    }

    #[test]
    fn invalid_item_fails_whole_document() {
        let mut b = bundle(json!({"policies": [policy_json("ok"), policy_json("bad")]}));
        b.policies[1].operations[0].slas.clear();
        match compose(&b).unwrap_err() {
            SynthError::Schema { path, .. } => assert_eq!(path, "policies[1].operations[0].slas"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dangling_references_are_allowed_unless_strict() {
        let b = bundle(json!({
            "protection_groups": [{
                "group_name": "g",
                "display_name": "G",
                "policy_name": "missing",
                "description": "",
                "bucket_rule": {"aws_region": {"$eq": "us-east-1"}}
            }]
        }));
        assert!(compose(&b).unwrap().contains("clumio_policy.missing.id"));
        let err = compose_with(&b, ComposeOptions { strict_references: true }).unwrap_err();
        match err {
            SynthError::References(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("missing"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
