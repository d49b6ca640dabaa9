use crate::app::action::Action;
use crate::app::commands::{self, ParsedCommand};
use crate::app::event::AppEvent;
use crate::config::CommandConfig;
use crate::engine::error::AlreadySet;
use crate::engine::mode::Mode;
use crate::engine::observer::EngineObserver;
use crate::engine::policy::MemberDirectory;
use crate::engine::presence::MemberId;
use crate::engine::Engine;

pub async fn handle_event<O, D>(
    engine: &mut Engine<O>,
    commands: &CommandConfig,
    directory: &D,
    event: AppEvent,
) -> Vec<Action>
where
    O: EngineObserver,
    D: MemberDirectory,
{
    match event {
        AppEvent::Voice(update) => engine
            .on_voice_update(&update, directory)
            .await
            .map(Action::SetNickname)
            .into_iter()
            .collect(),
        AppEvent::Message {
            author_id,
            author_name,
            is_bot,
            is_admin,
            content,
        } => {
            if is_bot {
                return vec![];
            }
            match commands::parse_command(&content, commands) {
                Some(ParsedCommand::SetMode { token }) => handle_setmode(
                    engine,
                    commands,
                    author_id,
                    &author_name,
                    is_admin,
                    token.as_deref(),
                ),
                None => vec![],
            }
        }
        AppEvent::Shutdown => vec![],
    }
}

fn handle_setmode<O: EngineObserver>(
    engine: &mut Engine<O>,
    commands: &CommandConfig,
    author_id: MemberId,
    author_name: &str,
    is_admin: bool,
    token: Option<&str>,
) -> Vec<Action> {
    let reply = |text: String| vec![Action::Reply { to: author_id, text }];

    if !is_admin {
        tracing::warn!(
            author = author_name,
            "mode change refused: administrator permission required"
        );
        return reply("You do not have permission to run this command.".to_string());
    }

    let Some(token) = token else {
        return reply(commands::setmode_help(commands, engine.mode()));
    };

    let Some(requested) = Mode::from_token(token) else {
        return reply(format!(
            "Invalid mode `{}`.\n{}",
            token,
            commands::setmode_usage(commands)
        ));
    };

    match engine.set_mode(requested) {
        Ok(change) => {
            tracing::info!(
                author = author_name,
                previous = %change.previous,
                current = %change.current,
                "mode changed by command"
            );
            reply(format!("Mode set to **{}**.", change.current))
        }
        Err(AlreadySet(mode)) => reply(format!("Mode is already **{}**.", mode)),
    }
}
