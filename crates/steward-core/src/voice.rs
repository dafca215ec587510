//! Voice session tracking and log-record chaining.
//!
//! Per-user state machine over presence transitions. At most one session
//! entry exists per user at any time; a log chain never exists without its
//! session. Session time is accounted incrementally at each transition, so
//! each published record can report the segment just completed plus a
//! running total, and a session cut short by process exit does not lose
//! already-accounted switch time.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::types::{ChannelId, RecordId, UserId};

/// Classified presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition {
    /// none -> channel
    Join(ChannelId),
    /// channel -> different channel
    Switch(ChannelId),
    /// channel -> none
    Leave,
    /// before == after (including both none); a no-op for the engine.
    Stay,
}

impl VoiceTransition {
    pub fn classify(before: Option<ChannelId>, after: Option<ChannelId>) -> Self {
        match (before, after) {
            (None, Some(channel)) => Self::Join(channel),
            (Some(b), Some(a)) if b != a => Self::Switch(a),
            (Some(_), None) => Self::Leave,
            _ => Self::Stay,
        }
    }
}

/// An active voice session.
#[derive(Debug, Clone, Copy)]
pub struct VoiceSession {
    /// Channel the user is currently in.
    pub channel: ChannelId,
    /// When the user entered the current channel (reset on every switch).
    pub entered_at: DateTime<Utc>,
    /// Whether the engagement sweep already fired for this session
    /// (only consulted in fire-once mode).
    pub encouraged: bool,
}

/// Reference to the most recent record in a session's log chain. The
/// precedence rule is explicit here: a transfer record supersedes the join
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRef {
    None,
    Join(RecordId),
    Transfer(RecordId),
}

impl ChainRef {
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::None => None,
            Self::Join(id) | Self::Transfer(id) => Some(*id),
        }
    }
}

/// Published-record bookkeeping for one continuous session.
///
/// Created only when the join record publishes successfully; a session can
/// therefore exist without a chain, in which case later records simply
/// carry no back-reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogChain {
    join: Option<RecordId>,
    transfer: Option<RecordId>,
    total_seconds: u64,
}

impl LogChain {
    /// The most recent published record of this chain: the last transfer if
    /// any, else the join.
    pub fn most_recent(&self) -> ChainRef {
        match (self.transfer, self.join) {
            (Some(id), _) => ChainRef::Transfer(id),
            (None, Some(id)) => ChainRef::Join(id),
            (None, None) => ChainRef::None,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }
}

/// Completed segment produced by a channel switch.
#[derive(Debug, Clone, Copy)]
pub struct SwitchSegment {
    /// Channel the user left.
    pub from: ChannelId,
    /// Seconds spent in it.
    pub elapsed_seconds: u64,
    /// Chain reference resolved before the switch record is published.
    pub prior: ChainRef,
}

/// Final accounting produced by a leave.
#[derive(Debug, Clone, Copy)]
pub struct LeaveSummary {
    /// Channel the user left.
    pub channel: ChannelId,
    /// Seconds of the final segment.
    pub elapsed_seconds: u64,
    /// Accumulated switch segments plus the final segment.
    pub total_seconds: u64,
    /// Chain reference resolved before the leave record is published.
    pub prior: ChainRef,
}

/// Owner of the session and log-chain maps.
#[derive(Debug, Default)]
pub struct VoiceTracker {
    sessions: HashMap<UserId, VoiceSession>,
    chains: HashMap<UserId, LogChain>,
}

fn elapsed_seconds(entered_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - entered_at).num_seconds().max(0) as u64
}

impl VoiceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for a none -> channel transition. Any stale session
    /// or chain for the user is discarded, preserving the one-entry-per-user
    /// invariant.
    pub fn begin(&mut self, user: UserId, channel: ChannelId, now: DateTime<Utc>) {
        self.sessions.insert(
            user,
            VoiceSession {
                channel,
                entered_at: now,
                encouraged: false,
            },
        );
        self.chains.remove(&user);
    }

    /// Attach the join record id after the join notification published.
    /// No-op if the session disappeared in the meantime.
    pub fn attach_join_record(&mut self, user: UserId, record: RecordId) {
        if self.sessions.contains_key(&user) {
            self.chains.insert(
                user,
                LogChain {
                    join: Some(record),
                    transfer: None,
                    total_seconds: 0,
                },
            );
        }
    }

    /// Handle a channel -> channel transition: close the current segment and
    /// re-enter on the new channel. Returns `None` if the user has no
    /// session (nothing to account).
    pub fn switch(
        &mut self,
        user: UserId,
        channel: ChannelId,
        now: DateTime<Utc>,
    ) -> Option<SwitchSegment> {
        let session = self.sessions.get_mut(&user)?;
        let from = session.channel;
        let elapsed = elapsed_seconds(session.entered_at, now);
        session.channel = channel;
        session.entered_at = now;

        let prior = self
            .chains
            .get(&user)
            .map(LogChain::most_recent)
            .unwrap_or(ChainRef::None);

        Some(SwitchSegment {
            from,
            elapsed_seconds: elapsed,
            prior,
        })
    }

    /// Record a successfully published switch record: overwrite the transfer
    /// id and accumulate the closed segment. No-op without a chain (the join
    /// record never published).
    pub fn record_transfer(&mut self, user: UserId, record: RecordId, elapsed_seconds: u64) {
        if let Some(chain) = self.chains.get_mut(&user) {
            chain.transfer = Some(record);
            chain.total_seconds += elapsed_seconds;
        }
    }

    /// Handle a channel -> none transition: compute the final accounting and
    /// delete both the session and the chain unconditionally. Returns `None`
    /// if the user has no session.
    pub fn leave(&mut self, user: UserId, now: DateTime<Utc>) -> Option<LeaveSummary> {
        let session = self.sessions.remove(&user)?;
        let chain = self.chains.remove(&user).unwrap_or_default();

        let elapsed = elapsed_seconds(session.entered_at, now);
        Some(LeaveSummary {
            channel: session.channel,
            elapsed_seconds: elapsed,
            total_seconds: chain.total_seconds() + elapsed,
            prior: chain.most_recent(),
        })
    }

    /// Current session for a user, if any.
    pub fn session(&self, user: UserId) -> Option<&VoiceSession> {
        self.sessions.get(&user)
    }

    /// Snapshot of all active sessions, for the engagement sweep.
    pub fn sessions(&self) -> Vec<(UserId, VoiceSession)> {
        self.sessions.iter().map(|(u, s)| (*u, *s)).collect()
    }

    /// Mark a session as already encouraged (fire-once mode).
    pub fn mark_encouraged(&mut self, user: UserId) {
        if let Some(session) = self.sessions.get_mut(&user) {
            session.encouraged = true;
        }
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether a log chain exists for the user.
    pub fn has_chain(&self, user: UserId) -> bool {
        self.chains.contains_key(&user)
    }
}
