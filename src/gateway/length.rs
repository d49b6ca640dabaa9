//! Nickname length ceiling.
//!
//! The platform rejects nicknames over its limit. By default an over-length
//! nickname is only reported; `truncate` cuts it to the limit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverLength {
    #[default]
    Warn,
    Truncate,
}

/// Length as the platform counts it: UTF-16 code units, so a character
/// outside the Basic Multilingual Plane (most emoji) counts as two.
pub fn nickname_len(nickname: &str) -> usize {
    nickname.encode_utf16().count()
}

/// Apply the length policy. Truncation never splits a character.
pub fn enforce_limit(nickname: &str, max_length: usize, policy: OverLength) -> String {
    let len = nickname_len(nickname);
    if len <= max_length {
        return nickname.to_string();
    }
    match policy {
        OverLength::Warn => {
            tracing::warn!(nickname, len, max_length, "nickname exceeds the length limit");
            nickname.to_string()
        }
        OverLength::Truncate => {
            tracing::warn!(nickname, len, max_length, "truncating over-length nickname");
            let mut used = 0;
            nickname
                .chars()
                .take_while(|c| {
                    used += c.len_utf16();
                    used <= max_length
                })
                .collect()
        }
    }
}
