use serde::{Deserialize, Serialize};

/// A single inbound chat message as delivered by the transport.
///
/// The transport guarantees per-channel arrival order; no further
/// normalization is applied to `content` here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque, stable identity of the conversation channel.
    #[serde(alias = "channel")]
    pub channel_id: String,
    /// Exact text of the message.
    pub content: String,
}

impl InboundMessage {
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_channel_alias() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"channel": "g1", "content": "hi"}"#).unwrap();
        assert_eq!(msg.channel_id, "g1");
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn deserializes_full_field_name() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"channel_id": "g1", "content": "hi"}"#).unwrap();
        assert_eq!(msg, InboundMessage::new("g1", "hi"));
    }
}
