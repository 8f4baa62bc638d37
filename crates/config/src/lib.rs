//! Configuration loading, validation, and env substitution.
//!
//! Config files: `reprise.toml`, `reprise.yaml`, or `reprise.json`,
//! searched in `./` then `~/.config/reprise/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{RepeaterConfig, RepriseConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_file},
};
