//! Convenience re-exports for common `clumio-tf` types.
//!
//! ```ignore
//! use clumio_tf::prelude::*;
//! ```

// ── Engine ──────────────────────────────────────────────────────────
pub use crate::compose::{ComposeOptions, compose, compose_with};
pub use crate::error::{Result, SynthError};
pub use crate::references::{ReferenceReport, check_references};
pub use crate::validate::{Diagnostics, validate};

// ── Model ───────────────────────────────────────────────────────────
pub use crate::model::{
    AwsAccount, AwsConnection, ClumioAccount, GenerationBundle, OrganizationalUnit, Policy,
    PolicyRule, ProtectionGroup, ProviderAccounts, ReportConfiguration, User, Validate, decode,
    decode_str,
};

// ── Tools ───────────────────────────────────────────────────────────
pub use crate::config::SynthConfig;
pub use crate::tools::spec::ToolSpec;
pub use crate::tools::{SynthToolsExt, Tool, ToolDef, ToolSet, parse_tool_args};
