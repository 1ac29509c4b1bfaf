//! S3 protection groups and the policy assignment that protects them.

use super::{
    ConditionTree, DEFAULT_STORAGE_CLASSES, RuleScope, Validate, require_identifier,
    require_non_empty, require_optional_identifier, require_text,
};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_storage_classes() -> Vec<String> {
    DEFAULT_STORAGE_CLASSES.iter().map(|s| s.to_string()).collect()
}

/// A `clumio_protection_group` plus its `clumio_policy_assignment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProtectionGroup {
    /// Resource name for the group.
    pub group_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Resource name of the policy assigned to the group.
    pub policy_name: String,
    pub description: String,
    /// Bucket selection rule, e.g.
    /// `{"aws_tag": {"$eq": {"key": "Environment", "value": "Production"}}}`.
    /// Fields: `aws_tag` (`$eq $not_eq $contains $not_contains $all $not_all
    /// $in $not_in`), `aws_account_native_id` and `aws_region` (`$eq $in`).
    pub bucket_rule: ConditionTree,
    /// S3 storage classes to protect. Defaults to the five standard classes.
    #[serde(default = "default_storage_classes")]
    pub storage_classes: Vec<String>,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for ProtectionGroup {
    fn validate(&self) -> Result<()> {
        require_identifier("group_name", &self.group_name)?;
        require_text("display_name", &self.display_name)?;
        require_identifier("policy_name", &self.policy_name)?;
        self.bucket_rule
            .check(RuleScope::Bucket)
            .map_err(|e| e.within("bucket_rule"))?;
        require_non_empty("storage_classes", &self.storage_classes)?;
        for (i, class) in self.storage_classes.iter().enumerate() {
            require_text(&format!("storage_classes[{i}]"), class)?;
        }
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use crate::model::decode;
    use serde_json::json;

    fn group(extra: serde_json::Value) -> serde_json::Value {
        let mut base = json!({
            "group_name": "prod_buckets",
            "display_name": "Production Buckets",
            "policy_name": "gold",
            "description": "Buckets tagged for production",
            "bucket_rule": {"aws_tag": {"$eq": {"key": "Environment", "value": "Production"}}}
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        base
    }

    #[test]
    fn storage_classes_default_in_order() {
        let g: ProtectionGroup = decode(group(json!({}))).unwrap();
        assert_eq!(g.storage_classes, DEFAULT_STORAGE_CLASSES);
    }

    #[test]
    fn explicit_storage_classes_are_kept() {
        let g: ProtectionGroup =
            decode(group(json!({"storage_classes": ["S3 Standard"]}))).unwrap();
        assert_eq!(g.storage_classes, vec!["S3 Standard"]);
    }

    #[test]
    fn empty_storage_classes_are_rejected() {
        assert!(decode::<ProtectionGroup>(group(json!({"storage_classes": []}))).is_err());
    }

    #[test]
    fn entity_type_is_not_a_bucket_field() {
        let err = decode::<ProtectionGroup>(group(json!({
            "bucket_rule": {"entity_type": {"$eq": "aws_ebs_volume"}}
        })))
        .unwrap_err();
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "bucket_rule.entity_type.$eq"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
