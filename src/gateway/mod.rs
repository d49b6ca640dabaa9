//! Community-side collaborators: the live member roster, the nickname setter
//! and the line bridge that feeds gateway events into the app.

pub mod bridge;
pub mod length;
pub mod roster;

use crate::engine::presence::MemberId;
use thiserror::Error;

/// Why a nickname change was refused by the community.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetNicknameError {
    #[error("missing the manage-nicknames permission")]
    PermissionDenied,
    #[error("member {0} is the owner or holds a higher role")]
    Unmanageable(MemberId),
    #[error("member {0} is not in the community")]
    UnknownMember(MemberId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicknameOutcome {
    /// The nickname was replaced. Carries the old nickname, if there was one.
    Changed { previous: Option<String> },
    /// Nothing to do: the member already had that nickname, or is a bot.
    Unchanged,
}

/// Applies nickname changes on the platform.
pub trait NicknameSetter {
    async fn set_nickname(
        &self,
        member_id: MemberId,
        nickname: &str,
        reason: &str,
    ) -> Result<NicknameOutcome, SetNicknameError>;
}
