use crate::engine::presence::{MemberId, VoiceUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A member's voice channel changed
    Voice(VoiceUpdate),

    /// A chat message was posted in the community
    Message {
        author_id: MemberId,
        author_name: String,
        is_bot: bool,
        is_admin: bool,
        content: String,
    },

    /// Input closed or the process was asked to stop
    Shutdown,
}
