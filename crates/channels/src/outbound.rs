use async_trait::async_trait;

use crate::Result;

/// Send messages back into a channel.
///
/// Implementations wrap a concrete transport (a chat platform client, a test
/// recorder, the CLI's stdout binding). Delivery is best-effort from the
/// engine's point of view: a returned error is logged by the caller and the
/// send is not retried.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<()>;
}
