//! Terraform configuration synthesis for Clumio backup-as-a-service.
//!
//! `clumio-tf` turns typed descriptions of Clumio resources (provider
//! accounts, AWS connections, backup policies, protection groups,
//! organizational units, policy rules, users, compliance reports) into
//! Terraform HCL text, composes whole bundles into one ordered document, and
//! runs static checks over the result.
//!
//! ```ignore
//! use clumio_tf::prelude::*;
//!
//! let bundle: GenerationBundle = decode_str(&std::fs::read_to_string("bundle.json")?)?;
//! let document = compose(&bundle)?;
//! let diagnostics = validate(&document);
//! assert!(diagnostics.is_valid);
//! ```
//!
//! Every operation is also available as a [`Tool`](tools::Tool) on a
//! [`ToolSet`](tools::ToolSet), taking JSON arguments and returning text:
//!
//! ```ignore
//! let tools = SynthConfig::default().build_tool_set();
//! let text = tools.execute("validate_configuration", r#"{"config_text": ""}"#);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Resource types, condition trees, the [`GenerationBundle`](model::GenerationBundle), validation |
//! | [`template`] | Embedded templates and the typed contexts they render |
//! | [`generate`] | One generator per resource kind |
//! | [`compose`] | Whole-bundle documents with section banners |
//! | [`validate`] | Textual checks over finished configurations |
//! | [`references`] | Name, alias, and cycle checks across a bundle |
//! | [`tools`] | The operation surface |
//! | [`config`] | [`SynthConfig`](config::SynthConfig) |

pub mod compose;
pub mod config;
pub mod error;
pub mod generate;
pub mod hcl;
pub mod model;
pub mod prelude;
pub mod references;
pub mod template;
pub mod tools;
pub mod validate;

pub use error::{Result, SynthError};

// Re-export schemars for downstream crates deriving argument schemas.
pub use schemars;
