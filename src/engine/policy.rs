//! Presence policy: turns a voice transition into at most one nickname
//! change.
//!
//! Joins pick a nickname according to the current [`Mode`]. A full leave
//! resets the member to the idle nickname, unless the live state shows the
//! member already back in voice. Moves never touch the nickname.

use std::collections::HashSet;

use super::error::SnapshotError;
use super::mode::Mode;
use super::observer::{EngineEvent, EngineObserver};
use super::pool::NamePool;
use super::presence::{ChannelId, MemberId, Transition, VoiceUpdate};
use super::selector::{select_from_display_name, select_random};

/// Live view of the community, queried at decision time.
pub trait MemberDirectory {
    /// Current nicknames of every member except `excluding`. Members without
    /// a nickname contribute nothing.
    async fn other_nicknames(&self, excluding: MemberId) -> Result<HashSet<String>, SnapshotError>;

    /// The voice channel the member is in right now, if any.
    async fn voice_channel(&self, member_id: MemberId) -> Option<ChannelId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentReason {
    Joined(Mode),
    Left,
}

impl IntentReason {
    pub fn describe(self) -> &'static str {
        match self {
            IntentReason::Joined(Mode::Random) => "joined voice (random mode)",
            IntentReason::Joined(Mode::Name) => "joined voice (name mode)",
            IntentReason::Left => "left voice",
        }
    }
}

/// A requested nickname change. Handed straight to the setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameIntent {
    pub member_id: MemberId,
    pub nickname: String,
    pub reason: IntentReason,
}

#[derive(Debug, Clone)]
pub struct PresencePolicy {
    name_prefix: String,
    idle_nickname: String,
}

impl PresencePolicy {
    pub fn new(name_prefix: impl Into<String>, idle_nickname: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            idle_nickname: idle_nickname.into(),
        }
    }

    /// Decide what, if anything, to do about `update`.
    pub async fn decide<D, O>(
        &self,
        update: &VoiceUpdate,
        mode: Mode,
        pool: &NamePool,
        directory: &D,
        observer: &O,
    ) -> Option<NicknameIntent>
    where
        D: MemberDirectory,
        O: EngineObserver,
    {
        let member_id = update.member_id;
        let transition = update.transition();
        if transition == Transition::None {
            return None;
        }
        if update.is_bot {
            observer.observe(&EngineEvent::BotIgnored { member_id });
            return None;
        }

        let intent = match transition {
            Transition::Join { channel } => {
                observer.observe(&EngineEvent::Joined {
                    member_id,
                    channel_id: channel,
                    mode,
                });
                self.on_join(update, mode, pool, directory, observer).await
            }
            Transition::Leave { channel } => {
                observer.observe(&EngineEvent::Left {
                    member_id,
                    channel_id: channel,
                });
                self.on_leave(member_id, channel, directory, observer).await
            }
            Transition::Move { from, to } => {
                observer.observe(&EngineEvent::Moved { member_id, from, to });
                None
            }
            Transition::None => None,
        }?;

        observer.observe(&EngineEvent::IntentProduced(intent.clone()));
        Some(intent)
    }

    async fn on_join<D, O>(
        &self,
        update: &VoiceUpdate,
        mode: Mode,
        pool: &NamePool,
        directory: &D,
        observer: &O,
    ) -> Option<NicknameIntent>
    where
        D: MemberDirectory,
        O: EngineObserver,
    {
        let member_id = update.member_id;
        let nickname = match mode {
            Mode::Random => {
                if pool.is_empty() {
                    observer.observe(&EngineEvent::PoolUnavailable { member_id });
                    return None;
                }
                let in_use = match directory.other_nicknames(member_id).await {
                    Ok(names) => names,
                    Err(e) => {
                        observer.observe(&EngineEvent::SnapshotFailed {
                            member_id,
                            error: e.to_string(),
                        });
                        return None;
                    }
                };
                match select_random(pool.all(), &in_use, &mut rand::rng()) {
                    Ok(name) => name.to_string(),
                    Err(_) => {
                        observer.observe(&EngineEvent::AllNamesInUse { member_id });
                        return None;
                    }
                }
            }
            Mode::Name => select_from_display_name(&update.display_name, &self.name_prefix),
        };

        Some(NicknameIntent {
            member_id,
            nickname,
            reason: IntentReason::Joined(mode),
        })
    }

    async fn on_leave<D, O>(
        &self,
        member_id: MemberId,
        channel: ChannelId,
        directory: &D,
        observer: &O,
    ) -> Option<NicknameIntent>
    where
        D: MemberDirectory,
        O: EngineObserver,
    {
        if directory.voice_channel(member_id).await.is_some() {
            observer.observe(&EngineEvent::LeaveSuperseded {
                member_id,
                channel_id: channel,
            });
            return None;
        }
        Some(NicknameIntent {
            member_id,
            nickname: self.idle_nickname.clone(),
            reason: IntentReason::Left,
        })
    }
}
