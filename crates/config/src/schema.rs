//! Config schema types.

use serde::{Deserialize, Serialize};

use reprise_repeater::{DEFAULT_ESCALATION_FACTOR, EscalationFactor};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepriseConfig {
    pub repeater: RepeaterConfig,
}

/// Repetition engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeaterConfig {
    /// Escalation factor `a`. Set it slightly above 1 — 1.6 recommended, not
    /// above 2 — the higher, the sooner a streak gets echoed. Values at or
    /// below 1 fail validation and are clamped back to the default at
    /// startup.
    pub escalation_factor: f64,
}

impl Default for RepeaterConfig {
    fn default() -> Self {
        Self {
            escalation_factor: DEFAULT_ESCALATION_FACTOR,
        }
    }
}

impl RepeaterConfig {
    /// The factor the engine will actually run with: the configured value if
    /// valid, otherwise the default (with a warning).
    #[must_use]
    pub fn effective_factor(&self) -> EscalationFactor {
        EscalationFactor::clamped(self.escalation_factor)
    }
}
