//! Engine observability hook.
//!
//! The engine reports what it decided through [`EngineObserver`] instead of
//! writing log lines itself. The binary plugs in [`TracingObserver`]; tests
//! record the events and assert on them.

use std::path::PathBuf;

use super::mode::Mode;
use super::policy::NicknameIntent;
use super::presence::{ChannelId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PoolLoaded { count: usize },
    /// The pool file was read but held no usable names.
    PoolEmpty { path: PathBuf },
    PoolSourceMissing { path: PathBuf },
    PoolLoadFailed { path: PathBuf, error: String },
    ModeChanged { previous: Mode, current: Mode },
    BotIgnored { member_id: MemberId },
    Joined { member_id: MemberId, channel_id: ChannelId, mode: Mode },
    Left { member_id: MemberId, channel_id: ChannelId },
    Moved { member_id: MemberId, from: ChannelId, to: ChannelId },
    /// A leave arrived after the member had already rejoined voice.
    LeaveSuperseded { member_id: MemberId, channel_id: ChannelId },
    /// Random mode with an empty pool.
    PoolUnavailable { member_id: MemberId },
    AllNamesInUse { member_id: MemberId },
    SnapshotFailed { member_id: MemberId, error: String },
    IntentProduced(NicknameIntent),
}

pub trait EngineObserver {
    fn observe(&self, event: &EngineEvent);
}

/// Forwards engine events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn observe(&self, event: &EngineEvent) {
        match event {
            EngineEvent::PoolLoaded { count } => {
                tracing::info!(count, "loaded nickname pool");
            }
            EngineEvent::PoolEmpty { path } => {
                tracing::warn!(
                    path = %path.display(),
                    "nickname pool is empty; random mode has nothing to assign"
                );
            }
            EngineEvent::PoolSourceMissing { path } => {
                tracing::warn!(
                    path = %path.display(),
                    "nickname file not found, using an empty pool"
                );
            }
            EngineEvent::PoolLoadFailed { path, error } => {
                tracing::error!(path = %path.display(), %error, "failed to load nickname pool");
            }
            EngineEvent::ModeChanged { previous, current } => {
                tracing::info!(%previous, %current, "assignment mode changed");
            }
            EngineEvent::BotIgnored { member_id } => {
                tracing::debug!(member_id, "ignoring voice update from bot");
            }
            EngineEvent::Joined {
                member_id,
                channel_id,
                mode,
            } => {
                tracing::info!(member_id, channel_id, %mode, "member joined voice");
            }
            EngineEvent::Left {
                member_id,
                channel_id,
            } => {
                tracing::info!(member_id, channel_id, "member left voice");
            }
            EngineEvent::Moved { member_id, from, to } => {
                tracing::info!(member_id, from, to, "member moved between voice channels");
            }
            EngineEvent::LeaveSuperseded {
                member_id,
                channel_id,
            } => {
                tracing::info!(member_id, channel_id, "member is back in voice, skipping reset");
            }
            EngineEvent::PoolUnavailable { member_id } => {
                tracing::warn!(member_id, "no nicknames available in the pool");
            }
            EngineEvent::AllNamesInUse { member_id } => {
                tracing::warn!(member_id, "every pool nickname is already in use");
            }
            EngineEvent::SnapshotFailed { member_id, error } => {
                tracing::error!(member_id, %error, "could not fetch member nicknames");
            }
            EngineEvent::IntentProduced(intent) => {
                tracing::debug!(
                    member_id = intent.member_id,
                    nickname = %intent.nickname,
                    reason = intent.reason.describe(),
                    "nickname change requested"
                );
            }
        }
    }
}
