//! Compliance report configurations: controls, filters, and schedule.

use super::{
    DEFAULT_DATA_SOURCE, TimeUnit, Validate, require_clock, require_identifier,
    require_optional_identifier, require_text,
};
use crate::error::{Result, SynthError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Controls ───────────────────────────────────────────────────────

/// Assets must have at least one backup in each window of the look-back
/// period, retained for at least the minimum duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetBackupControl {
    pub look_back_period: TimeUnit,
    pub minimum_retention_duration: TimeUnit,
    pub window_size: TimeUnit,
}

/// All assets must be protected by a policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetProtectionControl {
    #[serde(default)]
    pub should_ignore_deactivated_policy: bool,
}

/// Policies must meet a minimum retention and backup frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyControl {
    pub minimum_retention_duration: TimeUnit,
    pub minimum_rpo_frequency: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceControl {
    pub asset_backup: AssetBackupControl,
    pub asset_protection: AssetProtectionControl,
    pub policy: PolicyControl,
}

// ── Filters ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetGroupType {
    #[default]
    Aws,
}

/// An asset group to filter on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetGroup {
    #[serde(default)]
    pub group_id: Option<String>,
    /// Only supported for AWS asset groups.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub asset_type: AssetGroupType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TagOpMode {
    And,
    Or,
    Equal,
}

impl TagOpMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TagOpMode::And => "and",
            TagOpMode::Or => "or",
            TagOpMode::Equal => "equal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Filter applied to the asset backup and asset protection controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetFilter {
    #[serde(default)]
    pub groups: Vec<AssetGroup>,
    /// How `tags` are combined. AWS assets only.
    #[serde(default)]
    pub tag_op_mode: Option<TagOpMode>,
    /// AWS assets only.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Validate for AssetFilter {
    fn validate(&self) -> Result<()> {
        for (i, tag) in self.tags.iter().enumerate() {
            require_text(&format!("tags[{i}].key"), &tag.key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommonFilterAssetType {
    AwsEc2Instance,
    AwsEbsVolume,
    AwsRds,
    AwsS3Bucket,
    AwsDynamodbTable,
}

impl CommonFilterAssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommonFilterAssetType::AwsEc2Instance => "aws_ec2_instance",
            CommonFilterAssetType::AwsEbsVolume => "aws_ebs_volume",
            CommonFilterAssetType::AwsRds => "aws_rds",
            CommonFilterAssetType::AwsS3Bucket => "aws_s3_bucket",
            CommonFilterAssetType::AwsDynamodbTable => "aws_dynamodb_table",
        }
    }
}

fn default_data_sources() -> Vec<String> {
    vec![DEFAULT_DATA_SOURCE.to_string()]
}

/// Filter applied to every control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommonFilter {
    #[serde(default)]
    pub asset_types: Vec<CommonFilterAssetType>,
    /// Only `aws` is supported.
    #[serde(default = "default_data_sources")]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub organizational_units: Vec<String>,
}

impl Default for CommonFilter {
    fn default() -> Self {
        Self {
            asset_types: Vec::new(),
            data_sources: default_data_sources(),
            organizational_units: Vec::new(),
        }
    }
}

impl Validate for CommonFilter {
    fn validate(&self) -> Result<()> {
        for (i, source) in self.data_sources.iter().enumerate() {
            if source != DEFAULT_DATA_SOURCE {
                return Err(SynthError::schema(
                    format!("data_sources[{i}]"),
                    format!("unsupported data source '{source}' (expected '{DEFAULT_DATA_SOURCE}')"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceFilter {
    #[serde(default)]
    pub asset: Option<AssetFilter>,
    #[serde(default)]
    pub common: Option<CommonFilter>,
}

impl Validate for ComplianceFilter {
    fn validate(&self) -> Result<()> {
        self.asset.validate().map_err(|e| e.within("asset"))?;
        self.common.validate().map_err(|e| e.within("common"))
    }
}

// ── Schedule ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ReportFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFrequency::Daily => "daily",
            ReportFrequency::Weekly => "weekly",
            ReportFrequency::Monthly => "monthly",
        }
    }
}

/// Last day of the month, for [`Schedule::day_of_month`].
pub const LAST_DAY_OF_MONTH: i32 = -1;

fn default_day_of_month() -> i32 {
    1
}

fn default_start_time() -> String {
    "00:00".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// When the report runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Schedule {
    /// Day of the month for monthly reports: 1-28, or -1 for the last day.
    #[serde(default = "default_day_of_month")]
    pub day_of_month: i32,
    /// Day of the week for weekly reports.
    #[serde(default)]
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub frequency: ReportFrequency,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    /// IANA timezone the report is generated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            day_of_month: default_day_of_month(),
            day_of_week: DayOfWeek::default(),
            frequency: ReportFrequency::default(),
            start_time: default_start_time(),
            timezone: default_timezone(),
        }
    }
}

impl Validate for Schedule {
    fn validate(&self) -> Result<()> {
        if !(self.day_of_month == LAST_DAY_OF_MONTH || (1..=28).contains(&self.day_of_month)) {
            return Err(SynthError::schema(
                "day_of_month",
                format!(
                    "{} is out of range (1-28, or -1 for the last day)",
                    self.day_of_month
                ),
            ));
        }
        require_clock("start_time", &self.start_time)?;
        require_text("timezone", &self.timezone)
    }
}

// ── Report configuration ───────────────────────────────────────────

/// A `clumio_report_configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfiguration {
    /// Resource name for the report configuration.
    pub config_name: String,
    /// User-friendly display name.
    pub config_display_name: String,
    /// Addresses notified when the report runs.
    #[serde(default)]
    pub email_list: Vec<String>,
    pub controls: ComplianceControl,
    #[serde(default)]
    pub filters: ComplianceFilter,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for ReportConfiguration {
    fn validate(&self) -> Result<()> {
        require_identifier("config_name", &self.config_name)?;
        require_text("config_display_name", &self.config_display_name)?;
        for (i, email) in self.email_list.iter().enumerate() {
            require_text(&format!("email_list[{i}]"), email)?;
        }
        self.filters.validate().map_err(|e| e.within("filters"))?;
        self.schedule.validate().map_err(|e| e.within("schedule"))?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}
