use super::{
    ConditionTree, RuleScope, Validate, require_identifier, require_optional_identifier,
    require_text,
};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A `clumio_policy_rule` applying a policy to matching AWS entities.
///
/// Rules can only be managed by the global admin or by admins of immediate
/// child OUs, so the provider alias should point at one of those scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyRule {
    /// Resource name for the rule.
    pub rule_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Resource name of the policy to apply.
    pub policy_name: String,
    /// Entity selection, e.g. `{"entity_type": {"$eq": "aws_ebs_volume"}}`.
    /// Fields: `entity_type` (`$eq $in`), `aws_tag` (`$eq $contains $all
    /// $in`), `aws_account_native_id` and `aws_region` (`$eq $in`).
    pub condition_expression: ConditionTree,
    /// Resource name of the rule this one is ordered before.
    #[serde(default)]
    pub before_rule_name: Option<String>,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for PolicyRule {
    fn validate(&self) -> Result<()> {
        require_identifier("rule_name", &self.rule_name)?;
        require_text("display_name", &self.display_name)?;
        require_identifier("policy_name", &self.policy_name)?;
        self.condition_expression
            .check(RuleScope::Entity)
            .map_err(|e| e.within("condition_expression"))?;
        require_optional_identifier("before_rule_name", self.before_rule_name.as_deref())?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}
