//! Typed domain model for Clumio Terraform resources.
//!
//! Every entity is deserialized from caller-supplied JSON and then validated
//! as a whole through [`Validate`]. [`decode`] and [`decode_str`] combine the
//! two steps so callers either get a fully valid value or a
//! [`SynthError::Schema`] naming the offending field; there is no partially
//! constructed state.
//!
//! Serde defaults carry the declared defaults (storage classes, schedule
//! fields, access-control OU ids), so defaulting always happens before
//! validation.

pub mod account;
pub mod bundle;
pub mod condition;
pub mod connection;
pub mod organizational_unit;
pub mod policy;
pub mod policy_rule;
pub mod protection_group;
pub mod report;
pub mod time;
pub mod user;

pub use account::{AssumeRole, AwsAccount, ClumioAccount, ProviderAccounts};
pub use bundle::GenerationBundle;
pub use condition::{
    Clause, ConditionField, ConditionTree, ENTITY_TYPES, Operator, Predicate, RuleScope,
};
pub use connection::{AwsConnection, Services};
pub use organizational_unit::OrganizationalUnit;
pub use policy::{
    ActionSetting, AdvancedSettings, ApplyMode, BackupTier, BackupWindow,
    ContinuousBackupSettings, Operation, OperationType, PitrSettings, Policy, SettingsBlock, Sla,
    TierSettings,
};
pub use policy_rule::PolicyRule;
pub use protection_group::ProtectionGroup;
pub use report::{
    AssetBackupControl, AssetFilter, AssetGroup, AssetGroupType, AssetProtectionControl,
    CommonFilter, CommonFilterAssetType, ComplianceControl, ComplianceFilter, DayOfWeek,
    LAST_DAY_OF_MONTH, PolicyControl, ReportConfiguration, ReportFrequency, Schedule, Tag,
    TagOpMode,
};
pub use time::{TimeUnit, Unit};
pub use user::{AccessControlConfiguration, Role, User};

use crate::error::{Result, SynthError};
use crate::hcl;
use serde::de::DeserializeOwned;

/// Storage classes a protection group covers when the caller names none.
pub const DEFAULT_STORAGE_CLASSES: [&str; 5] = [
    "S3 Standard",
    "S3 Standard-IA",
    "S3 Intelligent-Tiering",
    "S3 One Zone-IA",
    "S3 Reduced Redundancy",
];

/// Organizational unit id that stands for the global (root) scope.
pub const GLOBAL_OU_ID: &str = "00000000-0000-0000-0000-000000000000";

/// The only data source compliance reports currently evaluate.
pub const DEFAULT_DATA_SOURCE: &str = "aws";

/// Whole-entity validation run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<()> {
        for (i, item) in self.iter().enumerate() {
            item.validate().map_err(|e| e.within(&format!("[{i}]")))?;
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<()> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }
}

/// Deserialize and validate an entity from a JSON value.
pub fn decode<T: DeserializeOwned + Validate>(value: serde_json::Value) -> Result<T> {
    let entity: T = serde_json::from_value(value)?;
    entity.validate()?;
    Ok(entity)
}

/// Deserialize and validate an entity from JSON text.
pub fn decode_str<T: DeserializeOwned + Validate>(json: &str) -> Result<T> {
    let entity: T = serde_json::from_str(json)?;
    entity.validate()?;
    Ok(entity)
}

// ── Field checks shared by the entity validators ───────────────────

pub(crate) fn require_identifier(field: &str, value: &str) -> Result<()> {
    if hcl::is_identifier(value) {
        Ok(())
    } else {
        Err(SynthError::schema(
            field,
            format!(
                "'{value}' is not a valid resource name \
                 (letters, digits, '_' or '-', starting with a letter or '_')"
            ),
        ))
    }
}

pub(crate) fn require_optional_identifier(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) => require_identifier(field, v),
        None => Ok(()),
    }
}

pub(crate) fn require_non_empty<T>(field: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        Err(SynthError::schema(field, "must contain at least one entry"))
    } else {
        Ok(())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(SynthError::schema(field, "must not be blank"))
    } else {
        Ok(())
    }
}

/// Check a 24-hour `HH:MM` wall-clock string.
pub(crate) fn require_clock(field: &str, value: &str) -> Result<()> {
    let valid = match value.split_once(':') {
        Some((h, m)) if h.len() == 2 && m.len() == 2 => {
            matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SynthError::schema(
            field,
            format!("'{value}' is not a valid HH:MM time"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accepts_valid_times() {
        for t in ["00:00", "08:30", "23:59"] {
            assert!(require_clock("t", t).is_ok(), "{t}");
        }
    }

    #[test]
    fn clock_rejects_malformed_times() {
        for t in ["24:00", "12:60", "8:30", "0830", "ab:cd", ""] {
            assert!(require_clock("t", t).is_err(), "{t}");
        }
    }

    struct Named(&'static str);

    impl Validate for Named {
        fn validate(&self) -> Result<()> {
            require_identifier("name", self.0)
        }
    }

    #[test]
    fn vec_validation_reports_index() {
        let items = vec![Named("ok"), Named("not ok")];
        match items.validate().unwrap_err() {
            SynthError::Schema { path, .. } => assert_eq!(path, "[1].name"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_sequences_are_rejected() {
        let err = require_non_empty::<u8>("operations", &[]).unwrap_err();
        assert!(err.to_string().contains("operations"));
    }

    #[test]
    fn decode_maps_serde_errors_to_schema() {
        let err = decode::<TimeUnit>(serde_json::json!({"value": 1, "unit": "fortnights"}))
            .unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("fortnights"));
    }
}
