//! Transport seam for the repetition engine.
//!
//! The message-delivery transport lives outside this repository; what it must
//! provide is narrow: inbound messages in per-channel arrival order (see
//! [`reprise_common::InboundMessage`]) and an outbound send capability, the
//! [`ChannelOutbound`] trait defined here.

pub mod error;
pub mod outbound;

pub use {
    error::{Error, Result},
    outbound::ChannelOutbound,
};
