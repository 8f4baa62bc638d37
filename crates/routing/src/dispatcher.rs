use std::{collections::HashMap, sync::Arc};

use {
    tokio::{sync::mpsc, task::JoinHandle},
    tracing::{debug, warn},
};

use {
    reprise_channels::{ChannelOutbound, Error, Result, error::Context},
    reprise_common::InboundMessage,
    reprise_repeater::{Action, ChannelStreakState, EscalationFactor, Sampler, ThreadRngSampler},
};

#[cfg(feature = "metrics")]
use reprise_metrics::{counter, gauge, labels, repeater as repeater_metrics};

/// Buffered messages per channel before `dispatch` applies backpressure.
const WORKER_QUEUE_DEPTH: usize = 64;

/// Builds the sampler a new channel worker will draw from. The default
/// factory hands every worker the thread-local RNG; tests substitute scripted
/// samplers per channel.
pub type SamplerFactory = dyn Fn(&str) -> Box<dyn Sampler + Send> + Send + Sync;

/// Fans inbound messages out to one worker task per channel.
///
/// Workers are spawned lazily on a channel's first message and live until
/// [`RepeatDispatcher::close`]; like the engine's state map, the worker map
/// is never pruned.
pub struct RepeatDispatcher {
    factor: EscalationFactor,
    outbound: Arc<dyn ChannelOutbound>,
    sampler_factory: Arc<SamplerFactory>,
    workers: HashMap<String, ChannelWorker>,
}

struct ChannelWorker {
    queue: mpsc::Sender<String>,
    handle: JoinHandle<()>,
}

impl RepeatDispatcher {
    pub fn new(factor: EscalationFactor, outbound: Arc<dyn ChannelOutbound>) -> Self {
        Self::with_sampler_factory(
            factor,
            outbound,
            Arc::new(|_| -> Box<dyn Sampler + Send> { Box::new(ThreadRngSampler) }),
        )
    }

    /// Like [`RepeatDispatcher::new`], but with per-channel samplers built by
    /// `sampler_factory` (keyed by channel id).
    pub fn with_sampler_factory(
        factor: EscalationFactor,
        outbound: Arc<dyn ChannelOutbound>,
        sampler_factory: Arc<SamplerFactory>,
    ) -> Self {
        Self {
            factor,
            outbound,
            sampler_factory,
            workers: HashMap::new(),
        }
    }

    /// Feed one inbound message to its channel's worker, spawning the worker
    /// on the channel's first message.
    ///
    /// Backpressure: awaits while the channel's queue is full, so a caller
    /// that processes one transport event at a time cannot outrun a slow
    /// outbound.
    pub async fn dispatch(&mut self, msg: InboundMessage) -> Result<()> {
        let InboundMessage {
            channel_id,
            content,
        } = msg;

        if channel_id.is_empty() {
            return Err(Error::invalid_input("channel id must be non-empty"));
        }

        #[cfg(feature = "metrics")]
        counter!(
            repeater_metrics::MESSAGES_OBSERVED_TOTAL,
            labels::CHANNEL => channel_id.clone()
        )
        .increment(1);

        let Self {
            factor,
            outbound,
            sampler_factory,
            workers,
        } = self;

        let worker = workers.entry(channel_id.clone()).or_insert_with(|| {
            debug!(channel = %channel_id, "spawning channel worker");
            spawn_channel_worker(
                channel_id.clone(),
                *factor,
                (sampler_factory.as_ref())(&channel_id),
                Arc::clone(outbound),
            )
        });

        let delivered = worker.queue.send(content).await;

        #[cfg(feature = "metrics")]
        gauge!(repeater_metrics::CHANNELS_ACTIVE).set(workers.len() as f64);

        delivered.with_context(|| format!("worker queue for channel {channel_id} is closed"))
    }

    /// Number of channels with a live worker.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop all workers after letting them drain their queues.
    pub async fn close(self) {
        for (channel_id, worker) in self.workers {
            drop(worker.queue);
            if let Err(err) = worker.handle.await {
                warn!(channel = %channel_id, error = %err, "channel worker aborted");
            }
        }
    }
}

fn spawn_channel_worker(
    channel_id: String,
    factor: EscalationFactor,
    sampler: Box<dyn Sampler + Send>,
    outbound: Arc<dyn ChannelOutbound>,
) -> ChannelWorker {
    let (queue, rx) = mpsc::channel(WORKER_QUEUE_DEPTH);
    let handle = tokio::spawn(run_channel_worker(channel_id, factor, sampler, outbound, rx));
    ChannelWorker { queue, handle }
}

/// Sequential loop owning one channel's streak state; runs until the
/// dispatcher drops the queue sender.
///
/// The streak arms before delivery is attempted, so a failed send leaves the
/// engine believing it already echoed: the echo is logged as lost and neither
/// retried nor re-armed. Deferring the transition until delivery confirms
/// would take a two-phase update here; the arm-first behavior is kept.
async fn run_channel_worker(
    channel_id: String,
    factor: EscalationFactor,
    mut sampler: Box<dyn Sampler + Send>,
    outbound: Arc<dyn ChannelOutbound>,
    mut queue: mpsc::Receiver<String>,
) {
    let mut state: Option<ChannelStreakState> = None;

    while let Some(content) = queue.recv().await {
        let action = match state {
            // First message for this channel: install state, stay silent.
            None => {
                state = Some(ChannelStreakState::new(content));
                Action::Silent
            },
            Some(ref mut streak) => streak.observe(&content, factor, || sampler.sample()),
        };

        let Action::Echo(text) = action else {
            continue;
        };

        debug!(channel = %channel_id, "echoing repeated message");
        match outbound.send_text(&channel_id, &text).await {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                counter!(
                    repeater_metrics::ECHOES_SENT_TOTAL,
                    labels::CHANNEL => channel_id.clone()
                )
                .increment(1);
            },
            Err(err) => {
                warn!(channel = %channel_id, error = %err, "echo delivery failed, not retrying");
                #[cfg(feature = "metrics")]
                counter!(
                    repeater_metrics::ECHO_FAILURES_TOTAL,
                    labels::CHANNEL => channel_id.clone()
                )
                .increment(1);
            },
        }
    }

    debug!(channel = %channel_id, "channel worker stopped");
}
