use super::{Validate, require_identifier, require_optional_identifier, require_text};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A `clumio_organizational_unit`.
///
/// The parent is referenced by resource name. Units created under a parent
/// must use the provider configured for that parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrganizationalUnit {
    /// Resource name for the OU.
    pub ou_name: String,
    /// Human-readable name.
    pub display_name: String,
    pub description: String,
    /// Resource name of the parent OU. Root level when absent.
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub clumio_provider_alias: Option<String>,
}

impl Validate for OrganizationalUnit {
    fn validate(&self) -> Result<()> {
        require_identifier("ou_name", &self.ou_name)?;
        require_text("display_name", &self.display_name)?;
        require_optional_identifier("parent_name", self.parent_name.as_deref())?;
        require_optional_identifier(
            "clumio_provider_alias",
            self.clumio_provider_alias.as_deref(),
        )
    }
}
