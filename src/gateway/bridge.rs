//! Line-oriented gateway bridge.
//!
//! Reads gateway events from stdin, one per line, updates the [`Community`]
//! roster and forwards the resulting [`AppEvent`]s to the event loop:
//!
//! ```text
//! member <id> <display name...> [bot] [admin] [owner] [nick=<nick>]
//! voice <id> <from|-> <to|->
//! nick <id> <nick|->
//! say <id> <text...>
//! perm on|off
//! quit
//! ```
//!
//! The roster is updated before the event is queued, the same way a platform
//! gateway refreshes its member cache before dispatching handlers.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::roster::{Community, MemberRecord};
use crate::app::event::AppEvent;
use crate::engine::presence::{ChannelId, MemberId, VoiceUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayLine {
    Member(MemberRecord),
    Voice {
        id: MemberId,
        from: Option<ChannelId>,
        to: Option<ChannelId>,
    },
    Nick {
        id: MemberId,
        nickname: Option<String>,
    },
    Say {
        id: MemberId,
        text: String,
    },
    Permission {
        manage_nicknames: bool,
    },
    Quit,
}

/// Parse one bridge line. Returns `None` for malformed or unknown lines.
pub fn parse_line(input: &str) -> Option<GatewayLine> {
    let input = input.trim();
    let mut parts = input.split_whitespace();
    let kind = parts.next()?.to_lowercase();

    match kind.as_str() {
        "member" => {
            let id = parts.next()?.parse().ok()?;
            // The display name runs up to the first flag and may contain spaces.
            let tokens: Vec<&str> = parts.collect();
            let name_len = tokens
                .iter()
                .position(|t| is_member_flag(t))
                .unwrap_or(tokens.len());
            if name_len == 0 {
                return None;
            }
            let mut member = MemberRecord::new(id, tokens[..name_len].join(" "));
            for &flag in &tokens[name_len..] {
                match flag {
                    "bot" => member.is_bot = true,
                    "admin" => member.is_admin = true,
                    "owner" => {
                        member.is_admin = true;
                        member.manageable = false;
                    }
                    _ => {
                        let nick = flag.strip_prefix("nick=")?;
                        member.nickname = Some(nick.to_string());
                    }
                }
            }
            Some(GatewayLine::Member(member))
        }
        "voice" => {
            let id = parts.next()?.parse().ok()?;
            let from = parse_channel(parts.next()?)?;
            let to = parse_channel(parts.next()?)?;
            Some(GatewayLine::Voice { id, from, to })
        }
        "nick" => {
            let id = parts.next()?.parse().ok()?;
            let nickname = match parts.next()? {
                "-" => None,
                nick => Some(nick.to_string()),
            };
            Some(GatewayLine::Nick { id, nickname })
        }
        "say" => {
            // Keep the message text verbatim after the member id.
            let rest = input[3..].trim_start();
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let id = id.parse().ok()?;
            Some(GatewayLine::Say {
                id,
                text: text.trim_start().to_string(),
            })
        }
        "perm" => match parts.next()? {
            "on" => Some(GatewayLine::Permission {
                manage_nicknames: true,
            }),
            "off" => Some(GatewayLine::Permission {
                manage_nicknames: false,
            }),
            _ => None,
        },
        "quit" => Some(GatewayLine::Quit),
        _ => None,
    }
}

fn is_member_flag(token: &str) -> bool {
    matches!(token, "bot" | "admin" | "owner") || token.starts_with("nick=")
}

fn parse_channel(token: &str) -> Option<Option<ChannelId>> {
    if token == "-" {
        return Some(None);
    }
    token.parse().ok().map(Some)
}

/// Apply a parsed line to the roster and return the event to dispatch, if
/// any.
pub async fn apply_line(community: &Community, line: GatewayLine) -> Option<AppEvent> {
    match line {
        GatewayLine::Member(member) => {
            community.write().await.upsert(member);
            None
        }
        GatewayLine::Voice { id, from, to } => {
            let mut roster = community.write().await;
            if !roster.set_voice(id, to) {
                tracing::warn!(member_id = id, "voice update for unknown member");
                return None;
            }
            let member = roster.get(id)?;
            Some(AppEvent::Voice(VoiceUpdate {
                member_id: id,
                previous: from,
                current: to,
                display_name: member.display_name.clone(),
                is_bot: member.is_bot,
            }))
        }
        GatewayLine::Nick { id, nickname } => {
            if !community.write().await.set_nickname(id, nickname) {
                tracing::warn!(member_id = id, "nickname update for unknown member");
            }
            None
        }
        GatewayLine::Say { id, text } => {
            let roster = community.read().await;
            let Some(member) = roster.get(id) else {
                tracing::warn!(member_id = id, "message from unknown member");
                return None;
            };
            Some(AppEvent::Message {
                author_id: id,
                author_name: member.display_name.clone(),
                is_bot: member.is_bot,
                is_admin: member.is_admin,
                content: text,
            })
        }
        GatewayLine::Permission { manage_nicknames } => {
            community.write().await.set_manage_nicknames(manage_nicknames);
            None
        }
        GatewayLine::Quit => Some(AppEvent::Shutdown),
    }
}

/// Spawn the stdin reader. End of input is forwarded as
/// [`AppEvent::Shutdown`].
pub fn spawn_stdin_bridge(
    community: Community,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let Some(parsed) = parse_line(&line) else {
                        tracing::warn!(line = %line, "unrecognized gateway line");
                        continue;
                    };
                    if let Some(event) = apply_line(&community, parsed).await {
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    let _ = event_tx.send(AppEvent::Shutdown);
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "gateway input failed");
                    let _ = event_tx.send(AppEvent::Shutdown);
                    break;
                }
            }
        }
    })
}

/// Deliver a command reply to the member. A closed stdout is logged, not
/// fatal.
pub fn write_reply(to: MemberId, text: &str) {
    let stdout = std::io::stdout();
    if let Err(e) = write_reply_to(&mut stdout.lock(), to, text) {
        tracing::warn!(member_id = to, error = %e, "failed to deliver reply");
    }
}

fn write_reply_to<W: Write>(out: &mut W, to: MemberId, text: &str) -> std::io::Result<()> {
    for line in text.lines() {
        writeln!(out, "reply {} {}", to, line)?;
    }
    out.flush()
}
