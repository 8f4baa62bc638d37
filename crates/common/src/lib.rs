//! Shared types and error plumbing used across all reprise crates.

pub mod error;
pub mod types;

pub use {error::FromMessage, types::InboundMessage};
