//! Map-owning engine: one [`ChannelStreakState`] per channel, created lazily.

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    factor::EscalationFactor,
    sampler::{Sampler, ThreadRngSampler},
    state::{Action, ChannelStreakState},
};

/// The repetition policy engine.
///
/// Owns one state record per channel that has ever produced a message.
/// Records are created lazily on first observation and kept for the engine's
/// lifetime; the map grows with the number of distinct channels and is never
/// pruned. Bounding it would silently reset streaks mid-conversation, so the
/// unbounded growth is kept and left to the owner to manage.
///
/// Callers must feed each channel's messages in arrival order. Concurrent
/// transports should not share one engine behind a lock; `reprise-routing`
/// instead runs the per-channel [`ChannelStreakState`] step inside one worker
/// task per channel.
pub struct RepeatEngine<S = ThreadRngSampler> {
    factor: EscalationFactor,
    sampler: S,
    channels: HashMap<String, ChannelStreakState>,
}

impl RepeatEngine<ThreadRngSampler> {
    pub fn new(factor: EscalationFactor) -> Self {
        Self::with_sampler(factor, ThreadRngSampler)
    }
}

impl<S: Sampler> RepeatEngine<S> {
    pub fn with_sampler(factor: EscalationFactor, sampler: S) -> Self {
        Self {
            factor,
            sampler,
            channels: HashMap::new(),
        }
    }

    /// Observe one inbound message and decide whether to echo it.
    ///
    /// The first message of a previously-unknown channel only installs its
    /// state and is always silent. A uniform draw is consumed exactly when an
    /// unarmed duplicate trial runs.
    pub fn observe(&mut self, channel_id: &str, content: &str) -> Action {
        let Self {
            factor,
            sampler,
            channels,
        } = self;

        match channels.entry(channel_id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(ChannelStreakState::new(content));
                Action::Silent
            },
            Entry::Occupied(slot) => {
                slot.into_mut()
                    .observe(content, *factor, || sampler.sample())
            },
        }
    }

    /// Current streak state for a channel, if one has been observed.
    #[must_use]
    pub fn channel(&self, channel_id: &str) -> Option<&ChannelStreakState> {
        self.channels.get(channel_id)
    }

    /// Number of channels observed so far.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn factor(&self) -> EscalationFactor {
        self.factor
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::sampler::SequenceSampler,
    };

    fn engine(draws: &[f64]) -> RepeatEngine<SequenceSampler> {
        RepeatEngine::with_sampler(
            EscalationFactor::DEFAULT,
            SequenceSampler::new(draws.iter().copied()),
        )
    }

    #[test]
    fn first_observation_is_always_silent() {
        // Even a draw that would pass any positive probability is not
        // consumed on the first message of an unknown channel.
        let mut engine = engine(&[0.0]);
        assert_eq!(engine.observe("g1", "hi"), Action::Silent);
        assert_eq!(engine.sampler.remaining(), 1);
        assert_eq!(engine.channel_count(), 1);
    }

    #[test]
    fn failed_trials_follow_the_documented_sequence() {
        // All draws fail, so the probability walks the exact recurrence
        // values independent of which draws arrive.
        let mut engine = engine(&[0.99, 0.99, 0.99, 0.99]);
        engine.observe("g1", "hi");

        let mut expected = 0.0;
        for documented in [0.375, 0.609375, 0.755859375, 0.84741211] {
            assert_eq!(engine.observe("g1", "hi"), Action::Silent);
            expected = EscalationFactor::DEFAULT.escalate(expected);
            let p = engine.channel("g1").map(ChannelStreakState::probability);
            assert_eq!(p, Some(expected));
            assert!((expected - documented).abs() < 1e-6);
        }
    }

    #[test]
    fn worked_example_echoes_on_the_fourth_message() {
        // Channel "g1", a = 1.6, "hi" four times, draws [0.9, 0.5, 0.1]:
        // message 2 fails (0.9 >= 0), message 3 fails (0.5 >= 0.375),
        // message 4 passes (0.1 < 0.609375) and echoes.
        let mut engine = engine(&[0.9, 0.5, 0.1]);
        assert_eq!(engine.observe("g1", "hi"), Action::Silent);
        assert_eq!(engine.observe("g1", "hi"), Action::Silent);
        assert_eq!(engine.observe("g1", "hi"), Action::Silent);
        assert_eq!(engine.observe("g1", "hi"), Action::Echo("hi".into()));

        let state = engine.channel("g1").unwrap();
        assert!(state.is_armed());
        assert_eq!(state.probability(), 0.0);
    }

    #[test]
    fn at_most_one_echo_per_streak() {
        // Draws of 0 pass the first trial with positive probability, so the
        // echo lands on message 3; everything after stays silent.
        let mut engine = engine(&[0.0; 20]);
        let mut echoes = 0;
        for _ in 0..12 {
            if engine.observe("g1", "x").is_echo() {
                echoes += 1;
            }
        }
        assert_eq!(echoes, 1);
    }

    #[test]
    fn streak_break_rearms_the_channel() {
        let mut engine = engine(&[0.0; 20]);
        for _ in 0..3 {
            engine.observe("g1", "x");
        }
        assert!(engine.channel("g1").unwrap().is_armed());

        // A different message breaks the streak and resets the state.
        engine.observe("g1", "y");
        let state = engine.channel("g1").unwrap();
        assert!(!state.is_armed());
        assert_eq!(state.probability(), 0.0);
        assert_eq!(state.last_content(), "y");

        // The next streak escalates and echoes again from scratch.
        let mut echoes = 0;
        for _ in 0..5 {
            if engine.observe("g1", "y").is_echo() {
                echoes += 1;
            }
        }
        assert_eq!(echoes, 1);
    }

    #[test]
    fn channels_are_independent_under_interleaving() {
        // Interleave two channels; each channel's trials consume its own
        // subsequence of draws (a then b, alternating).
        let a_draws = [0.9, 0.5, 0.1];
        let b_draws = [0.8, 0.7, 0.6];
        let interleaved = [0.9, 0.8, 0.5, 0.7, 0.1, 0.6];

        let mut engine = engine(&interleaved);
        engine.observe("a", "dup");
        engine.observe("b", "dup");
        let mut a_actions = Vec::new();
        let mut b_actions = Vec::new();
        for _ in 0..3 {
            a_actions.push(engine.observe("a", "dup"));
            b_actions.push(engine.observe("b", "dup"));
        }

        // Replay each channel in isolation with its own draw subsequence.
        for (draws, actions, id) in [
            (a_draws, &a_actions, "a"),
            (b_draws, &b_actions, "b"),
        ] {
            let mut isolated = self::engine(&draws);
            isolated.observe(id, "dup");
            for expected in actions {
                assert_eq!(&isolated.observe(id, "dup"), expected);
            }
            assert_eq!(
                isolated.channel(id).unwrap(),
                engine.channel(id).unwrap()
            );
        }
    }

    #[test]
    fn arming_implies_zero_probability() {
        let mut engine = engine(&[0.0; 8]);
        for _ in 0..8 {
            engine.observe("g1", "x");
            let state = engine.channel("g1").unwrap();
            if state.is_armed() {
                assert_eq!(state.probability(), 0.0);
            }
            assert!(state.probability() < 1.0);
            assert!(state.probability() >= 0.0);
        }
    }

    #[test]
    fn distinct_channels_get_distinct_records() {
        let mut engine = engine(&[]);
        engine.observe("g1", "hi");
        engine.observe("g2", "hi");
        assert_eq!(engine.channel_count(), 2);
        assert!(engine.channel("g3").is_none());
    }
}
