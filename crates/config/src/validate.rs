//! Configuration validation.
//!
//! Checks the repeater parameters for degenerate values and flags
//! unknown/misspelled fields that typed parsing would silently drop.

use std::path::{Path, PathBuf};

use crate::{Result, loader, schema::RepriseConfig};
use reprise_repeater::{EscalationFactor, FactorError};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "range", "unknown-field"
    pub category: &'static str,
    /// Dotted path, e.g. "repeater.escalation_factor"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Validate a parsed config.
pub fn validate(config: &RepriseConfig, config_path: Option<PathBuf>) -> ValidationResult {
    let mut diagnostics = Vec::new();
    check_factor(config.repeater.escalation_factor, &mut diagnostics);
    ValidationResult {
        diagnostics,
        config_path,
    }
}

/// Load and validate a config file: unknown-field detection on the untyped
/// value, then semantic checks on the typed config.
pub fn validate_file(path: &Path) -> Result<ValidationResult> {
    let mut diagnostics = Vec::new();

    let value = loader::load_config_value(path)?;
    check_unknown_fields(&value, &mut diagnostics);

    let config = loader::load_config(path)?;
    check_factor(config.repeater.escalation_factor, &mut diagnostics);

    Ok(ValidationResult {
        diagnostics,
        config_path: Some(path.to_path_buf()),
    })
}

fn check_factor(factor: f64, out: &mut Vec<Diagnostic>) {
    match EscalationFactor::new(factor) {
        Err(FactorError::NonConvergent(v)) => out.push(Diagnostic {
            severity: Severity::Error,
            category: "range",
            path: "repeater.escalation_factor".into(),
            message: format!(
                "must be greater than 1 (got {v}); the echo probability would never grow, \
                 and startup will fall back to the default"
            ),
        }),
        Err(FactorError::NotFinite(v)) => out.push(Diagnostic {
            severity: Severity::Error,
            category: "range",
            path: "repeater.escalation_factor".into(),
            message: format!("must be a finite number (got {v})"),
        }),
        Ok(f) if f.get() > 2.0 => out.push(Diagnostic {
            severity: Severity::Warning,
            category: "range",
            path: "repeater.escalation_factor".into(),
            message: format!(
                "{f} echoes very eagerly; values in (1.0, 2.0] are recommended"
            ),
        }),
        Ok(_) => {},
    }
}

/// Known tables and their keys.
const KNOWN_KEYS: &[(&str, &[&str])] = &[("repeater", &["escalation_factor"])];

fn check_unknown_fields(value: &serde_json::Value, out: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };

    for (table, entry) in root {
        let Some(known) = KNOWN_KEYS
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, keys)| keys)
        else {
            out.push(unknown_field(table.clone()));
            continue;
        };

        if let Some(fields) = entry.as_object() {
            for key in fields.keys() {
                if !known.contains(&key.as_str()) {
                    out.push(unknown_field(format!("{table}.{key}")));
                }
            }
        }
    }
}

fn unknown_field(path: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warning,
        category: "unknown-field",
        message: format!("unknown field `{path}` is ignored"),
        path,
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::schema::RepeaterConfig};

    fn config_with_factor(escalation_factor: f64) -> RepriseConfig {
        RepriseConfig {
            repeater: RepeaterConfig { escalation_factor },
        }
    }

    #[test]
    fn default_config_is_clean() {
        let result = validate(&RepriseConfig::default(), None);
        assert!(result.diagnostics.is_empty());
        assert!(!result.has_errors());
    }

    #[test]
    fn non_convergent_factor_is_an_error() {
        let result = validate(&config_with_factor(1.0), None);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "repeater.escalation_factor");
        assert_eq!(result.diagnostics[0].category, "range");
    }

    #[test]
    fn non_finite_factor_is_an_error() {
        assert!(validate(&config_with_factor(f64::NAN), None).has_errors());
    }

    #[test]
    fn aggressive_factor_is_a_warning() {
        let result = validate(&config_with_factor(2.5), None);
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
    }

    #[test]
    fn unknown_fields_are_flagged() {
        let value = serde_json::json!({
            "repeater": { "escalation_factor": 1.6, "escalation_facter": 1.6 },
            "repeeter": {},
        });

        let mut diagnostics = Vec::new();
        check_unknown_fields(&value, &mut diagnostics);

        let paths: Vec<_> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"repeater.escalation_facter"));
        assert!(paths.contains(&"repeeter"));
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn validate_file_combines_both_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reprise.toml");
        std::fs::write(&path, "[repeater]\nescalation_factor = 0.5\nextra = 1\n").unwrap();

        let result = validate_file(&path).unwrap();
        assert!(result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
    }
}
