//! Users and their role assignments.

use super::{
    GLOBAL_OU_ID, Validate, require_identifier, require_non_empty, require_optional_identifier,
    require_text,
};
use crate::error::{Result, SynthError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Role {
    #[serde(rename = "Super Admin")]
    SuperAdmin,
    #[serde(rename = "Organizational Unit Admin")]
    OrganizationalUnitAdmin,
    #[serde(rename = "Helpdesk Admin")]
    HelpdeskAdmin,
}

impl Role {
    /// Role name as Clumio knows it.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::OrganizationalUnitAdmin => "Organizational Unit Admin",
            Role::HelpdeskAdmin => "Helpdesk Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_ou_ids() -> Vec<String> {
    vec![GLOBAL_OU_ID.to_string()]
}

/// One role granted over a set of organizational units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AccessControlConfiguration {
    /// Role assigned to the user.
    pub role_name: Role,
    /// OU ids the role applies to. Defaults to the global OU
    /// (`00000000-0000-0000-0000-000000000000`).
    #[serde(default = "default_ou_ids")]
    pub organizational_unit_ids: Vec<String>,
}

impl Validate for AccessControlConfiguration {
    fn validate(&self) -> Result<()> {
        require_non_empty("organizational_unit_ids", &self.organizational_unit_ids)?;
        for (i, id) in self.organizational_unit_ids.iter().enumerate() {
            require_text(&format!("organizational_unit_ids[{i}]"), id)?;
        }
        Ok(())
    }
}

/// A `clumio_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    /// Resource name for the user.
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    /// Role assignments, rendered in the given order.
    pub access_control_configuration: Vec<AccessControlConfiguration>,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for User {
    fn validate(&self) -> Result<()> {
        require_identifier("user_name", &self.user_name)?;
        if !looks_like_email(&self.email) {
            return Err(SynthError::schema(
                "email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        require_text("full_name", &self.full_name)?;
        require_non_empty(
            "access_control_configuration",
            &self.access_control_configuration,
        )?;
        self.access_control_configuration
            .validate()
            .map_err(|e| e.within("access_control_configuration"))?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn ou_ids_default_to_global() {
        let user: User = decode(json!({
            "user_name": "jane",
            "email": "jane@example.com",
            "full_name": "Jane Doe",
            "access_control_configuration": [
                {"role_name": "Helpdesk Admin"},
                {"role_name": "Organizational Unit Admin", "organizational_unit_ids": ["ou-1"]}
            ]
        }))
        .unwrap();
        let acl = &user.access_control_configuration;
        assert_eq!(acl[0].role_name, Role::HelpdeskAdmin);
        assert_eq!(acl[0].organizational_unit_ids, vec![GLOBAL_OU_ID]);
        assert_eq!(acl[1].organizational_unit_ids, vec!["ou-1"]);
    }

    #[test]
    fn role_is_required_and_enumerated() {
        let missing = decode::<AccessControlConfiguration>(json!({}));
        assert!(missing.unwrap_err().to_string().contains("role_name"));
        let unknown = decode::<AccessControlConfiguration>(json!({"role_name": "Root"}));
        assert!(unknown.is_err());
    }

    #[test]
    fn user_needs_at_least_one_assignment() {
        let err = decode::<User>(json!({
            "user_name": "jane",
            "email": "jane@example.com",
            "full_name": "Jane Doe",
            "access_control_configuration": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("access_control_configuration"));
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("not-an-email"));
        assert!(!looks_like_email("@b.io"));
        assert!(!looks_like_email("a b@c.io"));
    }
}
