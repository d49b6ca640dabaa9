//! Live member cache for the community.
//!
//! The gateway bridge writes presence and nickname changes here as they
//! arrive; the engine reads it at decision time. Because the bridge runs ahead
//! of the event loop, the roster can already reflect events the engine has
//! not processed yet.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{NicknameOutcome, NicknameSetter, SetNicknameError};
use crate::engine::error::SnapshotError;
use crate::engine::policy::MemberDirectory;
use crate::engine::presence::{ChannelId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: MemberId,
    pub display_name: String,
    pub nickname: Option<String>,
    pub voice_channel: Option<ChannelId>,
    pub is_bot: bool,
    pub is_admin: bool,
    /// False for the owner and members ranked above the agent.
    pub manageable: bool,
}

impl MemberRecord {
    pub fn new(id: MemberId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            nickname: None,
            voice_channel: None,
            is_bot: false,
            is_admin: false,
            manageable: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Roster {
    members: HashMap<MemberId, MemberRecord>,
    /// Whether the agent holds the manage-nicknames permission.
    manage_nicknames: bool,
}

impl Roster {
    pub fn new(manage_nicknames: bool) -> Self {
        Self {
            members: HashMap::new(),
            manage_nicknames,
        }
    }

    /// Insert or refresh a member. Voice state survives a refresh, and so
    /// does the nickname unless the update carries one.
    pub fn upsert(&mut self, mut member: MemberRecord) {
        if let Some(existing) = self.members.get(&member.id) {
            member.voice_channel = existing.voice_channel;
            if member.nickname.is_none() {
                member.nickname = existing.nickname.clone();
            }
        }
        self.members.insert(member.id, member);
    }

    pub fn get(&self, id: MemberId) -> Option<&MemberRecord> {
        self.members.get(&id)
    }

    /// Move a member to `channel`. Returns false for unknown members.
    pub fn set_voice(&mut self, id: MemberId, channel: Option<ChannelId>) -> bool {
        match self.members.get_mut(&id) {
            Some(member) => {
                member.voice_channel = channel;
                true
            }
            None => false,
        }
    }

    /// Record a nickname change made outside the engine.
    pub fn set_nickname(&mut self, id: MemberId, nickname: Option<String>) -> bool {
        match self.members.get_mut(&id) {
            Some(member) => {
                member.nickname = nickname;
                true
            }
            None => false,
        }
    }

    pub fn set_manage_nicknames(&mut self, allowed: bool) {
        self.manage_nicknames = allowed;
    }
}

/// Shared handle to the roster.
#[derive(Debug, Clone)]
pub struct Community {
    inner: Arc<RwLock<Roster>>,
}

impl Community {
    pub fn new(manage_nicknames: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Roster::new(manage_nicknames))),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Roster> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Roster> {
        self.inner.write().await
    }
}

impl MemberDirectory for Community {
    async fn other_nicknames(&self, excluding: MemberId) -> Result<HashSet<String>, SnapshotError> {
        let roster = self.read().await;
        Ok(roster
            .members
            .values()
            .filter(|m| m.id != excluding)
            .filter_map(|m| m.nickname.clone())
            .collect())
    }

    async fn voice_channel(&self, member_id: MemberId) -> Option<ChannelId> {
        self.read().await.get(member_id)?.voice_channel
    }
}

impl NicknameSetter for Community {
    async fn set_nickname(
        &self,
        member_id: MemberId,
        nickname: &str,
        reason: &str,
    ) -> Result<NicknameOutcome, SetNicknameError> {
        let mut roster = self.write().await;
        let manage_nicknames = roster.manage_nicknames;
        let member = roster
            .members
            .get_mut(&member_id)
            .ok_or(SetNicknameError::UnknownMember(member_id))?;

        if member.is_bot || member.nickname.as_deref() == Some(nickname) {
            return Ok(NicknameOutcome::Unchanged);
        }
        if !manage_nicknames {
            return Err(SetNicknameError::PermissionDenied);
        }
        if !member.manageable {
            return Err(SetNicknameError::Unmanageable(member_id));
        }

        tracing::debug!(member_id, nickname, reason, "applying nickname");
        let previous = member.nickname.replace(nickname.to_string());
        Ok(NicknameOutcome::Changed { previous })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn community() -> Community {
        let community = Community::new(true);
        {
            let mut roster = community.write().await;
            let mut alice = MemberRecord::new(1, "alice");
            alice.nickname = Some("Alice".into());
            roster.upsert(alice);
            roster.upsert(MemberRecord::new(2, "bob"));
            let mut owner = MemberRecord::new(3, "owner");
            owner.manageable = false;
            owner.nickname = Some("Boss".into());
            roster.upsert(owner);
            let mut bot = MemberRecord::new(4, "helper");
            bot.is_bot = true;
            roster.upsert(bot);
        }
        community
    }

    #[tokio::test]
    async fn test_snapshot_excludes_self_and_unnamed() {
        let c = community().await;
        let names = c.other_nicknames(1).await.unwrap();
        assert_eq!(names, HashSet::from(["Boss".to_string()]));
        let names = c.other_nicknames(2).await.unwrap();
        assert_eq!(names, HashSet::from(["Alice".to_string(), "Boss".to_string()]));
    }

    #[tokio::test]
    async fn test_voice_channel_lookup() {
        let c = community().await;
        assert_eq!(c.voice_channel(2).await, None);
        assert!(c.write().await.set_voice(2, Some(9)));
        assert_eq!(c.voice_channel(2).await, Some(9));
        assert_eq!(c.voice_channel(99).await, None);
        assert!(!c.write().await.set_voice(99, Some(9)));
    }

    #[tokio::test]
    async fn test_set_nickname_changes_and_reports_previous() {
        let c = community().await;
        let outcome = c.set_nickname(1, "Carol", "test").await.unwrap();
        assert_eq!(
            outcome,
            NicknameOutcome::Changed {
                previous: Some("Alice".into())
            }
        );
        assert_eq!(c.read().await.get(1).unwrap().nickname.as_deref(), Some("Carol"));
    }

    #[tokio::test]
    async fn test_set_same_nickname_is_noop() {
        let c = community().await;
        assert_eq!(
            c.set_nickname(1, "Alice", "test").await,
            Ok(NicknameOutcome::Unchanged)
        );
        // No-op wins over a missing permission.
        c.write().await.set_manage_nicknames(false);
        assert_eq!(
            c.set_nickname(1, "Alice", "test").await,
            Ok(NicknameOutcome::Unchanged)
        );
    }

    #[tokio::test]
    async fn test_bots_are_never_renamed() {
        let c = community().await;
        assert_eq!(
            c.set_nickname(4, "Robo", "test").await,
            Ok(NicknameOutcome::Unchanged)
        );
        assert_eq!(c.read().await.get(4).unwrap().nickname, None);
    }

    #[tokio::test]
    async fn test_permission_and_hierarchy_failures() {
        let c = community().await;
        assert_eq!(
            c.set_nickname(3, "Minion", "test").await,
            Err(SetNicknameError::Unmanageable(3))
        );
        assert_eq!(
            c.set_nickname(42, "Ghost", "test").await,
            Err(SetNicknameError::UnknownMember(42))
        );
        c.write().await.set_manage_nicknames(false);
        assert_eq!(
            c.set_nickname(2, "Bobby", "test").await,
            Err(SetNicknameError::PermissionDenied)
        );
        assert_eq!(c.read().await.get(2).unwrap().nickname, None);
    }

    #[tokio::test]
    async fn test_upsert_keeps_voice_and_nickname() {
        let c = community().await;
        c.write().await.set_voice(1, Some(5));
        c.write().await.upsert(MemberRecord::new(1, "alice2"));
        let roster = c.read().await;
        let alice = roster.get(1).unwrap();
        assert_eq!(alice.display_name, "alice2");
        assert_eq!(alice.voice_channel, Some(5));
        assert_eq!(alice.nickname.as_deref(), Some("Alice"));
    }
}
