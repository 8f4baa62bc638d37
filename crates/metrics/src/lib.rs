//! Metric names for the repetition engine, recorded via the `metrics` facade.
//!
//! The exporter is the embedding application's concern; this crate only
//! centralizes names and labels so dashboards and code agree on them.
//!
//! ```rust,ignore
//! use reprise_metrics::{counter, labels, repeater};
//!
//! counter!(repeater::ECHOES_SENT_TOTAL, labels::CHANNEL => channel_id).increment(1);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
