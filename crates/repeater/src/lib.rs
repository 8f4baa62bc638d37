//! Adaptive message-repetition engine.
//!
//! Watches each channel for runs of identical messages and decides, with an
//! escalating probability, whether to echo the repeated content back once per
//! run. Each failed trial moves the echo probability by `p' = 1 - (1 - p) / a`
//! for a configured factor `a > 1`, so a sustained streak is echoed with
//! near-certainty eventually but never deterministically early on.
//!
//! The engine performs no I/O; callers act on the returned [`Action`].

pub mod engine;
pub mod factor;
pub mod sampler;
pub mod state;

pub use {
    engine::RepeatEngine,
    factor::{DEFAULT_ESCALATION_FACTOR, EscalationFactor, FactorError},
    sampler::{Sampler, SequenceSampler, ThreadRngSampler},
    state::{Action, ChannelStreakState},
};
