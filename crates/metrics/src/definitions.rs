//! Metric name and label definitions.

/// Repetition engine metrics
pub mod repeater {
    /// Total number of inbound messages observed
    pub const MESSAGES_OBSERVED_TOTAL: &str = "reprise_repeater_messages_observed_total";
    /// Total number of echoes delivered back into a channel
    pub const ECHOES_SENT_TOTAL: &str = "reprise_repeater_echoes_sent_total";
    /// Total number of echo deliveries that failed
    pub const ECHO_FAILURES_TOTAL: &str = "reprise_repeater_echo_failures_total";
    /// Number of channels with live per-channel workers
    pub const CHANNELS_ACTIVE: &str = "reprise_repeater_channels_active";
}

/// Common label keys
pub mod labels {
    /// Channel identifier
    pub const CHANNEL: &str = "channel";
}
