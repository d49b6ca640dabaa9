//! Voice-presence updates and their classification.

pub type MemberId = u64;
pub type ChannelId = u64;

/// A member's voice state changed. Built once at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceUpdate {
    pub member_id: MemberId,
    pub previous: Option<ChannelId>,
    pub current: Option<ChannelId>,
    pub display_name: String,
    pub is_bot: bool,
}

impl VoiceUpdate {
    pub fn transition(&self) -> Transition {
        Transition::classify(self.previous, self.current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered voice from nowhere.
    Join { channel: ChannelId },
    /// Left voice entirely.
    Leave { channel: ChannelId },
    /// Switched channels without leaving voice.
    Move { from: ChannelId, to: ChannelId },
    /// Nothing changed (mute, deafen, duplicate delivery).
    None,
}

impl Transition {
    pub fn classify(previous: Option<ChannelId>, current: Option<ChannelId>) -> Self {
        match (previous, current) {
            (None, Some(channel)) => Transition::Join { channel },
            (Some(channel), None) => Transition::Leave { channel },
            (Some(from), Some(to)) if from != to => Transition::Move { from, to },
            _ => Transition::None,
        }
    }
}
