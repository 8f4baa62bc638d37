//! Line-delimited JSON transport over stdin/stdout.
//!
//! Inbound: one `{"channel": "...", "content": "..."}` object per line on
//! stdin, in arrival order. Outbound: every echo is printed in the same shape
//! on stdout. Logs go to stderr so stdout stays machine-readable.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::{info, warn},
};

use {
    reprise_channels::{ChannelOutbound, Result as ChannelResult},
    reprise_common::InboundMessage,
    reprise_repeater::EscalationFactor,
    reprise_routing::RepeatDispatcher,
};

/// Writes echoes to stdout as JSON lines.
struct StdoutOutbound;

#[async_trait]
impl ChannelOutbound for StdoutOutbound {
    async fn send_text(&self, channel_id: &str, text: &str) -> ChannelResult<()> {
        let line = serde_json::json!({ "channel": channel_id, "content": text });
        println!("{line}");
        Ok(())
    }
}

/// Drive the dispatcher from stdin until EOF.
pub async fn run(factor: EscalationFactor) -> anyhow::Result<()> {
    info!(%factor, "repetition engine listening on stdin");

    let mut dispatcher = RepeatDispatcher::new(factor, Arc::new(StdoutOutbound));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let msg: InboundMessage = match serde_json::from_str(line) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %err, "skipping malformed event");
                continue;
            },
        };

        if let Err(err) = dispatcher.dispatch(msg).await {
            warn!(error = %err, "dropped event");
        }
    }

    info!("stdin closed, draining channel workers");
    dispatcher.close().await;
    Ok(())
}
