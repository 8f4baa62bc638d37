//! Escalation factor validation and the probability recurrence.

use {thiserror::Error, tracing::warn};

/// Default escalation factor. Values slightly above 1 work best; anything
/// above 2 makes the bot echo almost immediately.
pub const DEFAULT_ESCALATION_FACTOR: f64 = 1.6;

/// Validated escalation factor `a`, always finite and strictly greater than 1.
///
/// Per failed trial the echo probability moves by `p' = 1 - (1 - p) / a`,
/// which for `a > 1` strictly increases toward 1 without reaching it. Factors
/// at or below 1 leave the sequence stuck or shrinking; there is no
/// construction path that admits one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationFactor(f64);

/// Rejected escalation factor values.
#[derive(Debug, Error, PartialEq)]
pub enum FactorError {
    #[error("escalation factor must be greater than 1, got {0}")]
    NonConvergent(f64),

    #[error("escalation factor must be finite, got {0}")]
    NotFinite(f64),
}

impl EscalationFactor {
    pub const DEFAULT: Self = Self(DEFAULT_ESCALATION_FACTOR);

    /// Validate `value` as an escalation factor.
    pub fn new(value: f64) -> Result<Self, FactorError> {
        if !value.is_finite() {
            return Err(FactorError::NotFinite(value));
        }
        if value <= 1.0 {
            return Err(FactorError::NonConvergent(value));
        }
        Ok(Self(value))
    }

    /// Like [`EscalationFactor::new`], but substitutes the default for an
    /// invalid value instead of failing, with a warning. Used at startup when
    /// a bad config value should not keep the process down.
    pub fn clamped(value: f64) -> Self {
        match Self::new(value) {
            Ok(factor) => factor,
            Err(err) => {
                warn!(
                    value,
                    %err,
                    default = DEFAULT_ESCALATION_FACTOR,
                    "invalid escalation factor, using default"
                );
                Self::DEFAULT
            },
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// One escalation step: `p' = 1 - (1 - p) / a`.
    #[must_use]
    pub fn escalate(self, probability: f64) -> f64 {
        1.0 - (1.0 - probability) / self.0
    }

    /// Closed form of the recurrence started at 0: the probability after
    /// `trials` consecutive failed trials is `1 - 1 / a^trials`.
    #[must_use]
    pub fn streak_probability(self, trials: u32) -> f64 {
        1.0 - self.0.powf(-f64::from(trials))
    }
}

impl Default for EscalationFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for EscalationFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<f64> for EscalationFactor {
    type Error = FactorError;

    fn try_from(value: f64) -> Result<Self, FactorError> {
        Self::new(value)
    }
}
