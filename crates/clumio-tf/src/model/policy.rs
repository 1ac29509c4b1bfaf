//! Backup policies: operations, SLA tiers, windows, and advanced settings.

use super::{
    TimeUnit, Validate, require_clock, require_identifier, require_non_empty,
    require_optional_identifier, require_text,
};
use crate::error::{Result, SynthError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Kind of backup or snapshot a policy operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    AwsEbsVolumeBackup,
    AwsEbsVolumeSnapshot,
    AwsEc2InstanceBackup,
    AwsEc2InstanceSnapshot,
    AwsRdsResourceAwsSnapshot,
    AwsRdsResourceRollingBackup,
    AwsRdsResourceGranularBackup,
    AwsDynamodbTableBackup,
    AwsDynamodbTableSnapshot,
    AwsDynamodbTablePitr,
    ProtectionGroupBackup,
    AwsS3ContinuousBackup,
    AwsS3Backtrack,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::AwsEbsVolumeBackup => "aws_ebs_volume_backup",
            OperationType::AwsEbsVolumeSnapshot => "aws_ebs_volume_snapshot",
            OperationType::AwsEc2InstanceBackup => "aws_ec2_instance_backup",
            OperationType::AwsEc2InstanceSnapshot => "aws_ec2_instance_snapshot",
            OperationType::AwsRdsResourceAwsSnapshot => "aws_rds_resource_aws_snapshot",
            OperationType::AwsRdsResourceRollingBackup => "aws_rds_resource_rolling_backup",
            OperationType::AwsRdsResourceGranularBackup => "aws_rds_resource_granular_backup",
            OperationType::AwsDynamodbTableBackup => "aws_dynamodb_table_backup",
            OperationType::AwsDynamodbTableSnapshot => "aws_dynamodb_table_snapshot",
            OperationType::AwsDynamodbTablePitr => "aws_dynamodb_table_pitr",
            OperationType::ProtectionGroupBackup => "protection_group_backup",
            OperationType::AwsS3ContinuousBackup => "aws_s3_continuous_backup",
            OperationType::AwsS3Backtrack => "aws_s3_backtrack",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an operation runs once its SLA is due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionSetting {
    #[default]
    Immediate,
    Window,
}

impl ActionSetting {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionSetting::Immediate => "immediate",
            ActionSetting::Window => "window",
        }
    }
}

/// One retention/frequency tier of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sla {
    pub retention_duration: TimeUnit,
    pub rpo_frequency: TimeUnit,
}

fn default_window_start() -> String {
    "20:00".to_string()
}

fn default_window_end() -> String {
    "08:00".to_string()
}

/// Customized backup window, in the operation's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BackupWindow {
    /// Window start, `HH:MM`. Defaults to `20:00`.
    #[serde(default = "default_window_start")]
    pub start_time: String,
    /// Window end, `HH:MM`. Defaults to `08:00`.
    #[serde(default = "default_window_end")]
    pub end_time: String,
}

impl Default for BackupWindow {
    fn default() -> Self {
        Self {
            start_time: default_window_start(),
            end_time: default_window_end(),
        }
    }
}

impl Validate for BackupWindow {
    fn validate(&self) -> Result<()> {
        require_clock("start_time", &self.start_time)?;
        require_clock("end_time", &self.end_time)
    }
}

// ── Advanced settings ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackupTier {
    Standard,
    Lite,
    Cold,
    Frozen,
}

impl BackupTier {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupTier::Standard => "standard",
            BackupTier::Lite => "lite",
            BackupTier::Cold => "cold",
            BackupTier::Frozen => "frozen",
        }
    }
}

/// How point-in-time-recovery configuration changes are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    Immediate,
    MaintenanceWindow,
}

impl ApplyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplyMode::Immediate => "immediate",
            ApplyMode::MaintenanceWindow => "maintenance_window",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TierSettings {
    #[serde(default)]
    pub backup_tier: Option<BackupTier>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ContinuousBackupSettings {
    #[serde(default)]
    pub disable_eventbridge_notification: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PitrSettings {
    #[serde(default)]
    pub apply: Option<ApplyMode>,
}

/// Operation-specific settings, keyed by the operation type they apply to.
///
/// On the wire this is a single-key map such as
/// `{"aws_ebs_volume_backup": {"backup_tier": "standard"}}`. Settings keyed by
/// a type other than the enclosing operation's are rejected at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedSettings {
    AwsEbsVolumeBackup(TierSettings),
    AwsEc2InstanceBackup(TierSettings),
    AwsRdsResourceGranularBackup(TierSettings),
    ProtectionGroupBackup(TierSettings),
    AwsS3ContinuousBackup(ContinuousBackupSettings),
    AwsDynamodbTablePitr(PitrSettings),
}

/// Nested `operation type -> setting -> value` map of populated settings.
pub type SettingsBlock = BTreeMap<&'static str, BTreeMap<&'static str, Value>>;

impl AdvancedSettings {
    /// Operation type these settings belong to.
    pub fn operation_type(&self) -> OperationType {
        match self {
            AdvancedSettings::AwsEbsVolumeBackup(_) => OperationType::AwsEbsVolumeBackup,
            AdvancedSettings::AwsEc2InstanceBackup(_) => OperationType::AwsEc2InstanceBackup,
            AdvancedSettings::AwsRdsResourceGranularBackup(_) => {
                OperationType::AwsRdsResourceGranularBackup
            }
            AdvancedSettings::ProtectionGroupBackup(_) => OperationType::ProtectionGroupBackup,
            AdvancedSettings::AwsS3ContinuousBackup(_) => OperationType::AwsS3ContinuousBackup,
            AdvancedSettings::AwsDynamodbTablePitr(_) => OperationType::AwsDynamodbTablePitr,
        }
    }

    /// Settings applied when an operation of this type supplies none.
    ///
    /// Tiered backup types run on the standard tier; other types have no
    /// implicit settings.
    pub fn default_for(operation_type: OperationType) -> Option<Self> {
        let standard = TierSettings {
            backup_tier: Some(BackupTier::Standard),
        };
        match operation_type {
            OperationType::AwsEbsVolumeBackup => Some(AdvancedSettings::AwsEbsVolumeBackup(standard)),
            OperationType::AwsEc2InstanceBackup => {
                Some(AdvancedSettings::AwsEc2InstanceBackup(standard))
            }
            OperationType::AwsRdsResourceGranularBackup => {
                Some(AdvancedSettings::AwsRdsResourceGranularBackup(standard))
            }
            OperationType::ProtectionGroupBackup => {
                Some(AdvancedSettings::ProtectionGroupBackup(standard))
            }
            _ => None,
        }
    }

    /// Flatten into the nested block the policy template renders.
    ///
    /// Only populated settings appear; settings with nothing populated yield
    /// an empty map.
    pub fn to_block(&self) -> SettingsBlock {
        let mut inner: BTreeMap<&'static str, Value> = BTreeMap::new();
        match self {
            AdvancedSettings::AwsEbsVolumeBackup(s)
            | AdvancedSettings::AwsEc2InstanceBackup(s)
            | AdvancedSettings::AwsRdsResourceGranularBackup(s)
            | AdvancedSettings::ProtectionGroupBackup(s) => {
                if let Some(tier) = s.backup_tier {
                    inner.insert("backup_tier", Value::from(tier.as_str()));
                }
            }
            AdvancedSettings::AwsS3ContinuousBackup(s) => {
                if let Some(flag) = s.disable_eventbridge_notification {
                    inner.insert("disable_eventbridge_notification", Value::from(flag));
                }
            }
            AdvancedSettings::AwsDynamodbTablePitr(s) => {
                if let Some(apply) = s.apply {
                    inner.insert("apply", Value::from(apply.as_str()));
                }
            }
        }

        let mut block = SettingsBlock::new();
        if !inner.is_empty() {
            block.insert(self.operation_type().as_str(), inner);
        }
        block
    }
}

// ── Operation & Policy ─────────────────────────────────────────────

/// One operation of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Operation {
    /// Operation type. Determines which advanced settings apply.
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    #[serde(default)]
    pub action_setting: ActionSetting,
    /// Retention/frequency tiers, rendered in the given order.
    pub slas: Vec<Sla>,
    #[serde(default)]
    pub advanced_settings: Option<AdvancedSettings>,
    /// Region the backup is stored in. Defaults to in-region.
    #[serde(default)]
    pub backup_aws_region: Option<String>,
    #[serde(default)]
    pub backup_window_tz: Option<BackupWindow>,
    /// IANA timezone the backup window is expressed in.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Operation {
    pub fn new(operation_type: OperationType, slas: Vec<Sla>) -> Self {
        Self {
            operation_type,
            action_setting: ActionSetting::default(),
            slas,
            advanced_settings: None,
            backup_aws_region: None,
            backup_window_tz: None,
            timezone: None,
        }
    }

    /// Caller-supplied settings, or the type's implicit defaults when none
    /// were given or none of the given ones are populated.
    pub fn effective_advanced_settings(&self) -> Option<AdvancedSettings> {
        self.advanced_settings
            .filter(|s| !s.to_block().is_empty())
            .or_else(|| AdvancedSettings::default_for(self.operation_type))
    }
}

impl Validate for Operation {
    fn validate(&self) -> Result<()> {
        require_non_empty("slas", &self.slas)?;
        if let Some(settings) = &self.advanced_settings
            && settings.operation_type() != self.operation_type
        {
            return Err(SynthError::schema(
                "advanced_settings",
                format!(
                    "settings for '{}' do not apply to an operation of type '{}'",
                    settings.operation_type(),
                    self.operation_type
                ),
            ));
        }
        self.backup_window_tz
            .validate()
            .map_err(|e| e.within("backup_window_tz"))?;
        if let Some(tz) = &self.timezone {
            require_text("timezone", tz)?;
        }
        if let Some(region) = &self.backup_aws_region {
            require_text("backup_aws_region", region)?;
        }
        if self.backup_window_tz.is_some() != self.timezone.is_some() {
            warn!(
                operation = %self.operation_type,
                "backup window and timezone should be supplied together"
            );
        }
        Ok(())
    }
}

/// A `clumio_policy` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    /// Resource name for the policy.
    pub policy_name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Operations in the order they should appear.
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for Policy {
    fn validate(&self) -> Result<()> {
        require_identifier("policy_name", &self.policy_name)?;
        require_text("display_name", &self.display_name)?;
        require_non_empty("operations", &self.operations)?;
        self.operations
            .validate()
            .map_err(|e| e.within("operations"))?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    fn ebs_operation() -> Value {
        json!({
            "type": "aws_ebs_volume_backup",
            "slas": [{
                "retention_duration": {"unit": "days", "value": 7},
                "rpo_frequency": {"unit": "days", "value": 1}
            }]
        })
    }

    #[test]
    fn operation_defaults() {
        let op: Operation = decode(ebs_operation()).unwrap();
        assert_eq!(op.action_setting, ActionSetting::Immediate);
        assert_eq!(op.slas.len(), 1);
        assert_eq!(op.advanced_settings, None);
    }

    #[test]
    fn unknown_operation_type_is_schema_error() {
        let err = decode::<Operation>(json!({
            "type": "aws_ebs_volume_teleport",
            "slas": []
        }))
        .unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn empty_slas_are_rejected() {
        let err = decode::<Operation>(json!({"type": "aws_s3_backtrack", "slas": []})).unwrap_err();
        assert!(err.to_string().contains("slas"));
    }

    #[test]
    fn mismatched_advanced_settings_are_rejected() {
        let mut op = ebs_operation();
        op["advanced_settings"] = json!({"aws_ec2_instance_backup": {"backup_tier": "lite"}});
        let err = decode::<Operation>(op).unwrap_err();
        assert!(err.to_string().contains("do not apply"));
    }

    #[test]
    fn matching_advanced_settings_are_kept() {
        let mut op = ebs_operation();
        op["advanced_settings"] = json!({"aws_ebs_volume_backup": {"backup_tier": "lite"}});
        let op: Operation = decode(op).unwrap();
        assert_eq!(
            op.effective_advanced_settings(),
            Some(AdvancedSettings::AwsEbsVolumeBackup(TierSettings {
                backup_tier: Some(BackupTier::Lite)
            }))
        );
    }

    #[test]
    fn unknown_setting_field_is_rejected() {
        let mut op = ebs_operation();
        op["advanced_settings"] = json!({"aws_ebs_volume_backup": {"apply": "immediate"}});
        assert!(decode::<Operation>(op).is_err());
    }

    #[test]
    fn tiered_types_default_to_standard() {
        let op: Operation = decode(ebs_operation()).unwrap();
        let block = op.effective_advanced_settings().unwrap().to_block();
        assert_eq!(block["aws_ebs_volume_backup"]["backup_tier"], json!("standard"));

        let snapshot = Operation::new(OperationType::AwsEbsVolumeSnapshot, vec![]);
        assert_eq!(snapshot.effective_advanced_settings(), None);
    }

    #[test]
    fn unpopulated_settings_use_type_defaults() {
        let mut op = ebs_operation();
        op["advanced_settings"] = json!({"aws_ebs_volume_backup": {}});
        let op: Operation = decode(op).unwrap();
        assert_eq!(
            op.effective_advanced_settings(),
            AdvancedSettings::default_for(OperationType::AwsEbsVolumeBackup)
        );

        let mut s3 = Operation::new(OperationType::AwsS3ContinuousBackup, vec![]);
        s3.advanced_settings = Some(AdvancedSettings::AwsS3ContinuousBackup(
            ContinuousBackupSettings::default(),
        ));
        assert_eq!(s3.effective_advanced_settings(), None);
    }

    #[test]
    fn settings_block_emits_only_populated_fields() {
        let empty = AdvancedSettings::AwsS3ContinuousBackup(ContinuousBackupSettings::default());
        assert!(empty.to_block().is_empty());

        let pitr = AdvancedSettings::AwsDynamodbTablePitr(PitrSettings {
            apply: Some(ApplyMode::MaintenanceWindow),
        });
        let block = pitr.to_block();
        assert_eq!(block.len(), 1);
        assert_eq!(
            block["aws_dynamodb_table_pitr"]["apply"],
            json!("maintenance_window")
        );
    }

    #[test]
    fn backup_window_defaults_and_validation() {
        let mut op = ebs_operation();
        op["backup_window_tz"] = json!({"start_time": "02:00"});
        op["timezone"] = json!("America/Los_Angeles");
        let parsed: Operation = decode(op.clone()).unwrap();
        let window = parsed.backup_window_tz.unwrap();
        assert_eq!(window.start_time, "02:00");
        assert_eq!(window.end_time, "08:00");

        op["backup_window_tz"] = json!({"start_time": "25:00"});
        let err = decode::<Operation>(op).unwrap_err();
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "backup_window_tz.start_time"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn policy_requires_operations() {
        let err = decode::<Policy>(json!({
            "policy_name": "p",
            "display_name": "P",
            "operations": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("operations"));
    }

    #[test]
    fn policy_error_paths_point_into_operations() {
        let err = decode::<Policy>(json!({
            "policy_name": "p",
            "display_name": "P",
            "operations": [ebs_operation(), {"type": "aws_s3_backtrack", "slas": []}]
        }))
        .unwrap_err();
        match err {
            SynthError::Schema { path, .. } => assert_eq!(path, "operations[1].slas"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
