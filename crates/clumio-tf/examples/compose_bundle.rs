//! Compose a small bundle into a Terraform document and check it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example compose_bundle > main.tf
//! ```

use clumio_tf::model::{ConditionField, ConditionTree, Operator, Services};
use clumio_tf::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    let mut bundle: GenerationBundle = decode(json!({
        "clumio_accounts": [{}],
        "aws_accounts": [{"region": "us-west-2"}],
        "aws_connections": [{
            "connection_name": "prod",
            "description": "Production account"
        }],
        "policies": [{
            "policy_name": "daily",
            "display_name": "Daily backups",
            "operations": [{
                "type": "aws_ebs_volume_backup",
                "slas": [{
                    "retention_duration": {"unit": "days", "value": 30},
                    "rpo_frequency": {"unit": "days", "value": 1}
                }]
            }]
        }],
        "protection_groups": [{
            "group_name": "prod_buckets",
            "display_name": "Production buckets",
            "policy_name": "daily",
            "description": "Buckets tagged env=prod",
            "bucket_rule": {"aws_tag": {"$eq": {"key": "env", "value": "prod"}}}
        }]
    }))?;

    // Protect every service, and only buckets in the connected account.
    bundle.aws_connections[0].services = Services::all();
    let in_account = ConditionTree::field(
        ConditionField::AwsAccountNativeId,
        Operator::Eq,
        json!("${clumio_aws_connection.prod.account_native_id}"),
    );
    bundle.protection_groups[0]
        .bucket_rule
        .clauses
        .extend(in_account.clauses);

    let report = check_references(&bundle);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let document = compose_with(&bundle, ComposeOptions { strict_references: true })?;
    print!("{document}");

    let diagnostics = validate(&document);
    for recommendation in &diagnostics.recommendations {
        eprintln!("recommendation: {recommendation}");
    }
    Ok(())
}
