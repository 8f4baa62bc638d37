//! Per-channel streak state and the observation step.

use crate::factor::EscalationFactor;

/// Decision produced by one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Stay silent.
    Silent,
    /// Send the duplicated content back into the channel.
    Echo(String),
}

impl Action {
    #[must_use]
    pub fn is_echo(&self) -> bool {
        matches!(self, Self::Echo(_))
    }
}

/// State of one channel's current duplicate streak.
///
/// Three fields drive every decision: the most recently observed content, an
/// `armed` flag set once the current streak has been echoed, and the echo
/// probability for the next duplicate. Arming always resets the probability,
/// so `armed` implies `probability == 0`; the probability itself stays in
/// `[0, 1)` for any number of escalations.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStreakState {
    last_content: String,
    armed: bool,
    probability: f64,
}

impl ChannelStreakState {
    /// State right after the first message seen in a channel. The first
    /// observation itself never echoes.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            last_content: content.into(),
            armed: false,
            probability: 0.0,
        }
    }

    /// Observe the next message in this channel and decide whether to echo it.
    ///
    /// `draw` supplies a uniform sample in `[0, 1)` and is invoked only when
    /// an unarmed duplicate trial actually runs; mismatches and armed streaks
    /// consume no randomness.
    pub fn observe(
        &mut self,
        content: &str,
        factor: EscalationFactor,
        draw: impl FnOnce() -> f64,
    ) -> Action {
        if self.last_content != content {
            // Streak broken: new content starts a fresh streak.
            *self = Self::new(content);
            return Action::Silent;
        }

        if self.armed {
            // Already echoed this streak; stay silent until it breaks.
            return Action::Silent;
        }

        if draw() < self.probability {
            self.armed = true;
            self.probability = 0.0;
            return Action::Echo(content.to_string());
        }

        self.probability = factor.escalate(self.probability);
        Action::Silent
    }

    #[must_use]
    pub fn last_content(&self) -> &str {
        &self.last_content
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}
