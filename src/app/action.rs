use crate::engine::policy::NicknameIntent;
use crate::engine::presence::MemberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetNickname(NicknameIntent),
    Reply { to: MemberId, text: String },
}
