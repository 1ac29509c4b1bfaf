//! Typed rendering contexts, one per resource kind.
//!
//! A context holds exactly what its template interpolates, with every value
//! already formatted as an HCL expression by [`crate::hcl`]. Optional values
//! serialize as `none` so templates can test them with `{% if %}` under strict
//! undefined checking.

use crate::hcl;
use crate::model::{
    AccessControlConfiguration, AssetFilter, AwsAccount, AwsConnection, ClumioAccount,
    CommonFilter, Operation, OrganizationalUnit, Policy, PolicyRule, ProtectionGroup,
    ProviderAccounts, ReportConfiguration, Role, TimeUnit, User,
};
use serde::Serialize;

const CLUMIO_OU: &str = "clumio_organizational_unit";

fn quote_opt(value: Option<&str>) -> Option<String> {
    value.map(hcl::quote)
}

fn clumio_provider(alias: Option<&str>) -> Option<String> {
    hcl::provider_ref("clumio", alias)
}

// ── Providers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClumioProviderContext {
    pub alias: Option<String>,
    pub ou_context: Option<String>,
}

impl From<&ClumioAccount> for ClumioProviderContext {
    fn from(account: &ClumioAccount) -> Self {
        Self {
            alias: quote_opt(account.alias.as_deref()),
            ou_context: account.ou_name.as_deref().map(|ou| hcl::id_ref(CLUMIO_OU, ou)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssumeRoleContext {
    pub role_arn: String,
    pub session_name: Option<String>,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwsProviderContext {
    pub alias: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub assume_role: Option<AssumeRoleContext>,
}

impl From<&AwsAccount> for AwsProviderContext {
    fn from(account: &AwsAccount) -> Self {
        Self {
            alias: quote_opt(account.alias.as_deref()),
            region: quote_opt(account.region.as_deref()),
            profile: quote_opt(account.profile.as_deref()),
            assume_role: account.assume_role.as_ref().map(|r| AssumeRoleContext {
                role_arn: hcl::quote(&r.role_arn),
                session_name: quote_opt(r.session_name.as_deref()),
                external_id: quote_opt(r.external_id.as_deref()),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvidersContext {
    pub clumio: Vec<ClumioProviderContext>,
    pub aws: Vec<AwsProviderContext>,
}

impl From<&ProviderAccounts> for ProvidersContext {
    fn from(accounts: &ProviderAccounts) -> Self {
        Self {
            clumio: accounts.clumio_accounts.iter().map(Into::into).collect(),
            aws: accounts.aws_accounts.iter().map(Into::into).collect(),
        }
    }
}

// ── AWS connection ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionContext {
    pub name: String,
    pub description: String,
    pub clumio_provider: Option<String>,
    pub aws_provider: Option<String>,
    pub is_ebs_enabled: bool,
    pub is_rds_enabled: bool,
    pub is_s3_enabled: bool,
    pub is_dynamodb_enabled: bool,
    pub wait_for_data_plane_resources: bool,
    pub wait_for_ingestion: bool,
}

impl From<&AwsConnection> for ConnectionContext {
    fn from(conn: &AwsConnection) -> Self {
        Self {
            name: conn.connection_name.clone(),
            description: hcl::quote(&conn.description),
            clumio_provider: clumio_provider(conn.clumio_provider_alias.as_deref()),
            aws_provider: hcl::provider_ref("aws", conn.aws_provider_alias.as_deref()),
            is_ebs_enabled: conn.services.ebs,
            is_rds_enabled: conn.services.rds,
            is_s3_enabled: conn.services.s3,
            is_dynamodb_enabled: conn.services.dynamodb,
            wait_for_data_plane_resources: conn.wait_for_data_plane_resources,
            wait_for_ingestion: conn.wait_for_ingestion,
        }
    }
}

// ── Policy ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationContext {
    pub unit: String,
    pub value: i64,
}

impl From<&TimeUnit> for DurationContext {
    fn from(t: &TimeUnit) -> Self {
        Self {
            unit: hcl::quote(t.unit.as_str()),
            value: t.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaContext {
    pub retention_duration: DurationContext,
    pub rpo_frequency: DurationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowContext {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingContext {
    pub key: String,
    pub value: String,
}

/// One `<operation type> { ... }` block inside `advanced_settings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsGroupContext {
    pub name: String,
    pub settings: Vec<SettingContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationContext {
    pub operation_type: String,
    pub action_setting: String,
    pub backup_aws_region: Option<String>,
    pub timezone: Option<String>,
    pub backup_window: Option<WindowContext>,
    pub slas: Vec<SlaContext>,
    pub advanced_settings: Vec<SettingsGroupContext>,
}

impl From<&Operation> for OperationContext {
    fn from(op: &Operation) -> Self {
        let advanced_settings = op
            .effective_advanced_settings()
            .map(|s| s.to_block())
            .unwrap_or_default()
            .into_iter()
            .map(|(name, entries)| SettingsGroupContext {
                name: name.to_string(),
                settings: entries
                    .into_iter()
                    .map(|(key, value)| SettingContext {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            operation_type: hcl::quote(op.operation_type.as_str()),
            action_setting: hcl::quote(op.action_setting.as_str()),
            backup_aws_region: quote_opt(op.backup_aws_region.as_deref()),
            timezone: quote_opt(op.timezone.as_deref()),
            backup_window: op.backup_window_tz.as_ref().map(|w| WindowContext {
                start_time: hcl::quote(&w.start_time),
                end_time: hcl::quote(&w.end_time),
            }),
            slas: op
                .slas
                .iter()
                .map(|sla| SlaContext {
                    retention_duration: (&sla.retention_duration).into(),
                    rpo_frequency: (&sla.rpo_frequency).into(),
                })
                .collect(),
            advanced_settings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyContext {
    pub name: String,
    pub display_name: String,
    pub provider: Option<String>,
    pub operations: Vec<OperationContext>,
}

impl From<&Policy> for PolicyContext {
    fn from(policy: &Policy) -> Self {
        Self {
            name: policy.policy_name.clone(),
            display_name: hcl::quote(&policy.display_name),
            provider: clumio_provider(policy.clumio_provider_alias.as_deref()),
            operations: policy.operations.iter().map(Into::into).collect(),
        }
    }
}

// ── Protection group ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectionGroupContext {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub provider: Option<String>,
    pub bucket_rule: String,
    pub storage_classes: String,
    pub policy_id: String,
}

impl From<&ProtectionGroup> for ProtectionGroupContext {
    fn from(group: &ProtectionGroup) -> Self {
        Self {
            name: group.group_name.clone(),
            display_name: hcl::quote(&group.display_name),
            description: hcl::quote(&group.description),
            provider: clumio_provider(group.clumio_provider_alias.as_deref()),
            bucket_rule: hcl::json(&group.bucket_rule.to_json()),
            storage_classes: hcl::list(&group.storage_classes),
            policy_id: hcl::id_ref("clumio_policy", &group.policy_name),
        }
    }
}

// ── Organizational unit ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationalUnitContext {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub provider: Option<String>,
    pub parent_id: Option<String>,
}

impl From<&OrganizationalUnit> for OrganizationalUnitContext {
    fn from(ou: &OrganizationalUnit) -> Self {
        Self {
            name: ou.ou_name.clone(),
            display_name: hcl::quote(&ou.display_name),
            description: hcl::quote(&ou.description),
            provider: clumio_provider(ou.clumio_provider_alias.as_deref()),
            parent_id: ou.parent_name.as_deref().map(|p| hcl::id_ref(CLUMIO_OU, p)),
        }
    }
}

// ── Policy rule ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRuleContext {
    pub name: String,
    pub display_name: String,
    pub provider: Option<String>,
    pub policy_id: String,
    pub condition: String,
    pub before_rule_id: Option<String>,
}

impl From<&PolicyRule> for PolicyRuleContext {
    fn from(rule: &PolicyRule) -> Self {
        Self {
            name: rule.rule_name.clone(),
            display_name: hcl::quote(&rule.display_name),
            provider: clumio_provider(rule.clumio_provider_alias.as_deref()),
            policy_id: hcl::id_ref("clumio_policy", &rule.policy_name),
            condition: hcl::json(&rule.condition_expression.to_json()),
            before_rule_id: rule
                .before_rule_name
                .as_deref()
                .map(|b| hcl::id_ref("clumio_policy_rule", b)),
        }
    }
}

// ── User ───────────────────────────────────────────────────────────

/// A `clumio_role` data source looked up by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleLookupContext {
    pub data_name: String,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessControlContext {
    pub role_id: String,
    pub organizational_unit_ids: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContext {
    pub name: String,
    pub email: String,
    pub full_name: String,
    pub provider: Option<String>,
    /// One lookup per distinct role, in first-use order.
    pub roles: Vec<RoleLookupContext>,
    /// Assignments in caller order.
    pub access_control: Vec<AccessControlContext>,
}

fn role_data_name(user: &str, role: Role) -> String {
    format!("{user}_{}", hcl::slug(role.as_str()))
}

impl From<&User> for UserContext {
    fn from(user: &User) -> Self {
        let mut roles: Vec<RoleLookupContext> = Vec::new();
        let mut seen: Vec<Role> = Vec::new();
        for acl in &user.access_control_configuration {
            if !seen.contains(&acl.role_name) {
                seen.push(acl.role_name);
                roles.push(RoleLookupContext {
                    data_name: role_data_name(&user.user_name, acl.role_name),
                    role_name: hcl::quote(acl.role_name.as_str()),
                });
            }
        }
        let access_control = user
            .access_control_configuration
            .iter()
            .map(|acl: &AccessControlConfiguration| AccessControlContext {
                role_id: format!(
                    "data.clumio_role.{}.id",
                    role_data_name(&user.user_name, acl.role_name)
                ),
                organizational_unit_ids: hcl::list(&acl.organizational_unit_ids),
            })
            .collect();
        Self {
            name: user.user_name.clone(),
            email: hcl::quote(&user.email),
            full_name: hcl::quote(&user.full_name),
            provider: clumio_provider(user.clumio_provider_alias.as_deref()),
            roles,
            access_control,
        }
    }
}

// ── Report configuration ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupContext {
    pub id: Option<String>,
    pub region: Option<String>,
    pub asset_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagContext {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFilterContext {
    pub groups: Vec<GroupContext>,
    pub tag_op_mode: Option<String>,
    pub tags: Vec<TagContext>,
}

impl From<&AssetFilter> for AssetFilterContext {
    fn from(filter: &AssetFilter) -> Self {
        Self {
            groups: filter
                .groups
                .iter()
                .map(|g| GroupContext {
                    id: quote_opt(g.group_id.as_deref()),
                    region: quote_opt(g.region.as_deref()),
                    asset_type: hcl::quote("aws"),
                })
                .collect(),
            tag_op_mode: filter.tag_op_mode.map(|m| hcl::quote(m.as_str())),
            tags: filter
                .tags
                .iter()
                .map(|t| TagContext {
                    key: hcl::quote(&t.key),
                    value: hcl::quote(&t.value),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonFilterContext {
    pub asset_types: String,
    pub data_sources: String,
    pub organizational_units: String,
}

impl From<&CommonFilter> for CommonFilterContext {
    fn from(filter: &CommonFilter) -> Self {
        let asset_types: Vec<&str> = filter.asset_types.iter().map(|t| t.as_str()).collect();
        Self {
            asset_types: hcl::list(&asset_types),
            data_sources: hcl::list(&filter.data_sources),
            organizational_units: hcl::list(&filter.organizational_units),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleContext {
    pub day_of_month: i32,
    pub day_of_week: String,
    pub frequency: String,
    pub start_time: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportContext {
    pub name: String,
    pub display_name: String,
    pub provider: Option<String>,
    pub email_list: String,
    pub look_back_period: DurationContext,
    pub backup_minimum_retention: DurationContext,
    pub window_size: DurationContext,
    pub ignore_deactivated_policy: bool,
    pub policy_minimum_retention: DurationContext,
    pub policy_minimum_rpo: DurationContext,
    pub asset_filter: Option<AssetFilterContext>,
    pub common_filter: Option<CommonFilterContext>,
    pub schedule: ScheduleContext,
}

impl From<&ReportConfiguration> for ReportContext {
    fn from(report: &ReportConfiguration) -> Self {
        let controls = &report.controls;
        let schedule = &report.schedule;
        Self {
            name: report.config_name.clone(),
            display_name: hcl::quote(&report.config_display_name),
            provider: clumio_provider(report.clumio_provider_alias.as_deref()),
            email_list: hcl::list(&report.email_list),
            look_back_period: (&controls.asset_backup.look_back_period).into(),
            backup_minimum_retention: (&controls.asset_backup.minimum_retention_duration).into(),
            window_size: (&controls.asset_backup.window_size).into(),
            ignore_deactivated_policy: controls.asset_protection.should_ignore_deactivated_policy,
            policy_minimum_retention: (&controls.policy.minimum_retention_duration).into(),
            policy_minimum_rpo: (&controls.policy.minimum_rpo_frequency).into(),
            asset_filter: report.filters.asset.as_ref().map(Into::into),
            common_filter: report.filters.common.as_ref().map(Into::into),
            schedule: ScheduleContext {
                day_of_month: schedule.day_of_month,
                day_of_week: hcl::quote(schedule.day_of_week.as_str()),
                frequency: hcl::quote(schedule.frequency.as_str()),
                start_time: hcl::quote(&schedule.start_time),
                timezone: hcl::quote(&schedule.timezone),
            },
        }
    }
}

// ── Dispatch ───────────────────────────────────────────────────────

/// A rendering context for any resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceContext {
    Providers(ProvidersContext),
    Connection(ConnectionContext),
    Policy(PolicyContext),
    ProtectionGroup(ProtectionGroupContext),
    OrganizationalUnit(OrganizationalUnitContext),
    PolicyRule(PolicyRuleContext),
    User(UserContext),
    Report(ReportContext),
}

impl ResourceContext {
    /// Template that renders this context.
    pub fn template_id(&self) -> &'static str {
        match self {
            ResourceContext::Providers(_) => "provider.tf.j2",
            ResourceContext::Connection(_) => "aws_connection.tf.j2",
            ResourceContext::Policy(_) => "policy.tf.j2",
            ResourceContext::ProtectionGroup(_) => "protection_group.tf.j2",
            ResourceContext::OrganizationalUnit(_) => "organizational_unit.tf.j2",
            ResourceContext::PolicyRule(_) => "policy_rule.tf.j2",
            ResourceContext::User(_) => "user.tf.j2",
            ResourceContext::Report(_) => "report_configuration.tf.j2",
        }
    }

    /// Resource kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceContext::Providers(_) => "providers",
            ResourceContext::Connection(_) => "aws_connection",
            ResourceContext::Policy(_) => "policy",
            ResourceContext::ProtectionGroup(_) => "protection_group",
            ResourceContext::OrganizationalUnit(_) => "organizational_unit",
            ResourceContext::PolicyRule(_) => "policy_rule",
            ResourceContext::User(_) => "user",
            ResourceContext::Report(_) => "report_configuration",
        }
    }
}

macro_rules! resource_context_from {
    ($($entity:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<&$entity> for ResourceContext {
                fn from(entity: &$entity) -> Self {
                    ResourceContext::$variant(entity.into())
                }
            }
        )*
    };
}

resource_context_from! {
    ProviderAccounts => Providers,
    AwsConnection => Connection,
    Policy => Policy,
    ProtectionGroup => ProtectionGroup,
    OrganizationalUnit => OrganizationalUnit,
    PolicyRule => PolicyRule,
    User => User,
    ReportConfiguration => Report,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn user_roles_are_looked_up_once_in_first_use_order() {
        let user: User = decode(json!({
            "user_name": "jane",
            "email": "jane@example.com",
            "full_name": "Jane Doe",
            "access_control_configuration": [
                {"role_name": "Organizational Unit Admin", "organizational_unit_ids": ["a"]},
                {"role_name": "Super Admin"},
                {"role_name": "Organizational Unit Admin", "organizational_unit_ids": ["b"]}
            ]
        }))
        .unwrap();
        let ctx = UserContext::from(&user);
        let names: Vec<&str> = ctx.roles.iter().map(|r| r.data_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["jane_organizational_unit_admin", "jane_super_admin"]
        );
        assert_eq!(ctx.access_control.len(), 3);
        assert_eq!(ctx.access_control[2].organizational_unit_ids, r#"["b"]"#);
    }

    #[test]
    fn operation_context_carries_default_tier() {
        let op: Operation = decode(json!({
            "type": "protection_group_backup",
            "slas": [{
                "retention_duration": {"unit": "months", "value": 3},
                "rpo_frequency": {"unit": "days", "value": 1}
            }]
        }))
        .unwrap();
        let ctx = OperationContext::from(&op);
        assert_eq!(ctx.advanced_settings.len(), 1);
        assert_eq!(ctx.advanced_settings[0].name, "protection_group_backup");
        assert_eq!(ctx.advanced_settings[0].settings[0].value, r#""standard""#);
        assert_eq!(ctx.slas[0].retention_duration.unit, r#""months""#);
    }

    #[test]
    fn template_ids_per_kind() {
        let ou: OrganizationalUnit = decode(json!({
            "ou_name": "eng",
            "display_name": "Engineering",
            "description": "",
            "parent_name": "root_ou"
        }))
        .unwrap();
        let ctx = ResourceContext::from(&ou);
        assert_eq!(ctx.template_id(), "organizational_unit.tf.j2");
        match ctx {
            ResourceContext::OrganizationalUnit(c) => {
                assert_eq!(c.parent_id.as_deref(), Some("clumio_organizational_unit.root_ou.id"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
