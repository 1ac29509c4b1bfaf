//! The operation surface end to end: a `ToolSet` built from `SynthConfig`
//! driven with JSON arguments.

use clumio_tf::config::SynthConfig;
use clumio_tf::tools::{self, ToolSet};
use serde_json::{Value, json};

fn tool_set() -> ToolSet {
    SynthConfig::default().build_tool_set()
}

fn scenario_bundle() -> Value {
    json!({
        "aws_connections": [{
            "connection_name": "prod",
            "description": "Production account",
            "services": {"ebs": true, "rds": true, "s3": true, "dynamodb": true}
        }],
        "policies": [{
            "policy_name": "ebs_daily",
            "display_name": "EBS daily",
            "operations": [{
                "type": "aws_ebs_volume_backup",
                "slas": [{
                    "retention_duration": {"unit": "days", "value": 7},
                    "rpo_frequency": {"unit": "days", "value": 1}
                }]
            }]
        }],
        "protection_groups": [{
            "group_name": "critical_buckets",
            "display_name": "Critical buckets",
            "policy_name": "ebs_daily",
            "description": "Buckets holding critical data",
            "bucket_rule": {"aws_tag": {"$eq": {"key": "critical", "value": "true"}}}
        }]
    })
}

/// Text of the top-level block opened by `header`, through its closing brace.
fn block<'a>(doc: &'a str, header: &str) -> &'a str {
    let start = doc.find(header).unwrap();
    let end = doc[start..].find("\n}").unwrap() + start + 2;
    &doc[start..end]
}

#[test]
fn end_to_end_scenario() {
    let doc = tool_set().execute(tools::GENERATE_COMPLETE_SOLUTION, &scenario_bundle().to_string());
    assert!(!doc.starts_with("Error:"), "{doc}");

    let connection = doc.find("resource \"clumio_aws_connection\" \"prod\"").unwrap();
    let policies_banner = doc.find("# Policies").unwrap();
    let policy = doc.find("resource \"clumio_policy\" \"ebs_daily\"").unwrap();
    let groups_banner = doc.find("# Protection Groups").unwrap();
    let group = doc
        .find("resource \"clumio_protection_group\" \"critical_buckets\"")
        .unwrap();
    assert!(connection < policies_banner);
    assert!(policies_banner < policy);
    assert!(policy < groups_banner);
    assert!(groups_banner < group);

    for header in [
        "resource \"clumio_aws_connection\" \"prod\"",
        "resource \"clumio_policy\" \"ebs_daily\"",
        "resource \"clumio_protection_group\" \"critical_buckets\"",
    ] {
        let text = block(&doc, header);
        assert!(text.ends_with("\n}"));
        assert!(text.lines().count() > 2, "{text}");
        assert_eq!(text.matches('{').count(), text.matches('}').count(), "{text}");
    }

    let module = block(&doc, "module \"clumio_protect_prod\"");
    for service in ["ebs", "rds", "s3", "dynamodb"] {
        assert!(module.contains(&format!("is_{service}_enabled = true")));
    }
    assert!(block(&doc, "resource \"clumio_policy\" \"ebs_daily\"").contains("value = 7"));
    assert!(doc.contains("policy_id = clumio_policy.ebs_daily.id"));
}

#[test]
fn bucket_rule_can_reference_the_connection() {
    let out = tool_set().execute(
        tools::GENERATE_PROTECTION_GROUP,
        &json!({
            "group_name": "prod_buckets",
            "display_name": "Production buckets",
            "policy_name": "ebs_daily",
            "description": "Buckets in the production account",
            "bucket_rule": {
                "aws_account_native_id": {"$eq": "${clumio_aws_connection.prod_account.account_native_id}"},
                "aws_region": {"$eq": "${clumio_aws_connection.prod_account.aws_region}"}
            }
        })
        .to_string(),
    );
    assert!(!out.starts_with("Error:"), "{out}");
    let rule = out.lines().find(|l| l.contains("bucket_rule = jsonencode(")).unwrap();
    assert!(rule.contains(r#""$eq":"${clumio_aws_connection.prod_account.account_native_id}""#));
    assert!(rule.contains(r#""$eq":"${clumio_aws_connection.prod_account.aws_region}""#));
    assert!(!rule.contains("$${"), "{rule}");
}

#[test]
fn every_operation_is_registered_with_a_schema() {
    let defs = tool_set().definitions();
    assert_eq!(defs.len(), 12);
    for def in &defs {
        assert_eq!(def.function.parameters["type"], "object", "{}", def.function.name);
        assert!(def.function.description.contains('.'));
    }
}

#[test]
fn unknown_tool() {
    assert_eq!(tool_set().execute("generate_bucket", "{}"), "Error: unknown tool 'generate_bucket'");
}

#[test]
fn argument_schema_rejects_unknown_operation_type() {
    let args = json!({
        "policy_name": "p",
        "display_name": "P",
        "operations": [{"type": "aws_tape_backup", "slas": []}]
    })
    .to_string();

    let validated = tool_set().execute(tools::GENERATE_POLICY, &args);
    assert!(
        validated.starts_with("Error: argument validation failed for tool 'generate_policy'"),
        "{validated}"
    );

    let unvalidated = SynthConfig::default()
        .with_validate_args(false)
        .build_tool_set()
        .execute(tools::GENERATE_POLICY, &args);
    assert!(unvalidated.starts_with("Error: schema error"), "{unvalidated}");
    assert!(unvalidated.contains("aws_tape_backup"));
}

#[test]
fn unknown_service_key_is_rejected() {
    let args = json!({
        "connection_name": "c",
        "description": "d",
        "services": {"ebs": true, "ec2": true}
    })
    .to_string();
    assert!(tool_set().execute(tools::GENERATE_AWS_CONNECTION, &args).starts_with("Error:"));
    let unvalidated = SynthConfig::default()
        .with_validate_args(false)
        .build_tool_set()
        .execute(tools::GENERATE_AWS_CONNECTION, &args);
    assert!(unvalidated.contains("ec2"), "{unvalidated}");
}

#[test]
fn strict_references_refuse_dangling_policy() {
    let mut bundle = scenario_bundle();
    bundle["protection_groups"][0]["policy_name"] = json!("missing");
    let args = bundle.to_string();

    let lenient = tool_set().execute(tools::GENERATE_COMPLETE_SOLUTION, &args);
    assert!(lenient.contains("policy_id = clumio_policy.missing.id"));

    let strict = SynthConfig::default()
        .with_strict_references(true)
        .build_tool_set()
        .execute(tools::GENERATE_COMPLETE_SOLUTION, &args);
    assert_eq!(
        strict,
        "Error: reference check failed:\n  - protection group 'critical_buckets' \
         references unknown policy 'missing'"
    );
}

#[test]
fn reference_report_as_json() {
    let mut bundle = scenario_bundle();
    bundle["protection_groups"][0]["policy_name"] = json!("missing");
    let out = tool_set().execute(tools::CHECK_BUNDLE_REFERENCES, &bundle.to_string());
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["is_valid"], false);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);

    let clean = tool_set().execute(tools::CHECK_BUNDLE_REFERENCES, &scenario_bundle().to_string());
    let report: Value = serde_json::from_str(&clean).unwrap();
    assert_eq!(report["is_valid"], true);
}

#[test]
fn validate_configuration_on_generated_providers() {
    let set = tool_set();
    let providers = set.execute(
        tools::GENERATE_PROVIDERS,
        &json!({"clumio_accounts": [{}]}).to_string(),
    );
    assert!(providers.contains("provider \"clumio\""), "{providers}");

    let out = set.execute(
        tools::VALIDATE_CONFIGURATION,
        &json!({"config_text": providers}).to_string(),
    );
    let diagnostics: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(diagnostics["is_valid"], true);
    assert_eq!(diagnostics["errors"], json!([]));
    assert_eq!(diagnostics["warnings"], json!([]));
}

#[test]
fn duplicate_unaliased_accounts_are_rejected() {
    let out = tool_set().execute(
        tools::GENERATE_PROVIDERS,
        &json!({"aws_accounts": [{"region": "us-east-1"}, {"region": "us-west-2"}]}).to_string(),
    );
    assert!(out.starts_with("Error: schema error at aws_accounts[1].alias"), "{out}");
}

#[test]
fn empty_bundle_composes_to_empty_text() {
    assert_eq!(tool_set().execute(tools::GENERATE_COMPLETE_SOLUTION, "{}"), "");
}

#[test]
fn example_scenarios() {
    let out = tool_set().execute(tools::GET_EXAMPLE_SCENARIOS, "{}");
    let catalogue: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(catalogue["scenarios"].as_array().unwrap().len(), 5);
    assert!(catalogue["integration_examples"]["with_chatops"].is_string());
}
