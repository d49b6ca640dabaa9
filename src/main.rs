mod app;
mod config;
mod engine;
mod gateway;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::engine::observer::{EngineObserver, TracingObserver};
use crate::engine::policy::PresencePolicy;
use crate::engine::pool::NamePool;
use crate::engine::Engine;
use crate::gateway::roster::Community;
use crate::gateway::{bridge, length, NicknameOutcome, NicknameSetter};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config()?;

    // Logs go to stderr; stdout carries command replies.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let community = Community::new(cfg.community.manage_nicknames);
    let mut engine = Engine::new(
        NamePool::new(&cfg.nickname.pool_path),
        PresencePolicy::new(&cfg.nickname.name_prefix, &cfg.nickname.idle_nickname),
        TracingObserver,
    );

    tracing::info!(
        mode = %engine.mode(),
        pool = %engine.pool().source().display(),
        command = %format!("{}{}", cfg.command.prefix, cfg.command.setmode),
        "vcnick ready"
    );
    engine.reload_pool();

    bridge::spawn_stdin_bridge(community.clone(), event_tx.clone());

    // Shut down cleanly on Ctrl-C or SIGTERM
    let signal_tx = event_tx.clone();
    let shutdown = shutdown_signal();
    tokio::spawn(async move {
        shutdown.await;
        let _ = signal_tx.send(AppEvent::Shutdown);
    });
    drop(event_tx);

    run_app(&cfg, &mut engine, &community, &mut event_rx).await;

    tracing::info!("shutting down");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. The SIGTERM handler is installed before
/// this returns, so a signal sent right after the call is not lost.
#[cfg(unix)]
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    use tokio::signal::unix::{signal, SignalKind};

    let term = signal(SignalKind::terminate());
    async move {
        let mut term = match term {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!(error = %e, "could not listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
}

#[cfg(not(unix))]
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    async {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Main event loop. Each event is handled to completion before the next one
/// is received.
async fn run_app<O: EngineObserver>(
    cfg: &config::AppConfig,
    engine: &mut Engine<O>,
    community: &Community,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) {
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };
        if event == AppEvent::Shutdown {
            break;
        }

        let actions = handler::handle_event(engine, &cfg.command, community, event).await;

        for action in actions {
            apply_action(cfg, community, action).await;
        }
    }
}

async fn apply_action(cfg: &config::AppConfig, community: &Community, action: Action) {
    match action {
        Action::SetNickname(intent) => {
            let nickname = length::enforce_limit(
                &intent.nickname,
                cfg.nickname.max_length,
                cfg.nickname.over_length,
            );
            let member_id = intent.member_id;
            match community
                .set_nickname(member_id, &nickname, intent.reason.describe())
                .await
            {
                Ok(NicknameOutcome::Changed { previous }) => {
                    tracing::info!(
                        member_id,
                        from = previous.as_deref().unwrap_or("(none)"),
                        to = %nickname,
                        reason = intent.reason.describe(),
                        "nickname changed"
                    );
                }
                Ok(NicknameOutcome::Unchanged) => {
                    tracing::debug!(member_id, nickname = %nickname, "nickname already set");
                }
                Err(e) => {
                    tracing::warn!(
                        member_id,
                        nickname = %nickname,
                        error = %e,
                        "nickname change failed"
                    );
                }
            }
        }
        Action::Reply { to, text } => bridge::write_reply(to, &text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mode::Mode;
    use crate::engine::observer::testing::RecordingObserver;
    use crate::engine::observer::EngineEvent;

    async fn feed(community: &Community, tx: &mpsc::UnboundedSender<AppEvent>, lines: &[&str]) {
        for line in lines {
            let parsed = bridge::parse_line(line).unwrap();
            if let Some(event) = bridge::apply_line(community, parsed).await {
                tx.send(event).unwrap();
            }
        }
    }

    fn engine(names: &[&str]) -> Engine<RecordingObserver> {
        Engine::new(
            NamePool::from_names(names.iter().copied()),
            PresencePolicy::new("風吹けば", "風吹けば名無し"),
            RecordingObserver::default(),
        )
    }

    async fn nickname(community: &Community, id: u64) -> Option<String> {
        community.read().await.get(id).unwrap().nickname.clone()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sigterm_resolves_shutdown_signal() {
        let shutdown = shutdown_signal();
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
        let waited = tokio::time::timeout(std::time::Duration::from_secs(5), shutdown).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_random_joins_do_not_collide() {
        let cfg = config::AppConfig::default();
        let community = Community::new(true);
        let mut engine = engine(&["Alice", "Bob"]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        feed(&community, &tx, &["member 1 one", "member 2 two", "member 3 three"]).await;
        // Handle each join before the next arrives.
        feed(&community, &tx, &["voice 1 - 10"]).await;
        tx.send(AppEvent::Shutdown).unwrap();
        run_app(&cfg, &mut engine, &community, &mut rx).await;
        feed(&community, &tx, &["voice 2 - 10", "quit"]).await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;
        feed(&community, &tx, &["voice 3 - 10", "quit"]).await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;

        let first = nickname(&community, 1).await.unwrap();
        let second = nickname(&community, 2).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(nickname(&community, 3).await, None);
        assert!(engine
            .observer()
            .contains(&EngineEvent::AllNamesInUse { member_id: 3 }));
    }

    #[tokio::test]
    async fn test_leave_resets_unless_rejoined() {
        let cfg = config::AppConfig::default();
        let community = Community::new(true);
        let mut engine = engine(&["Alice"]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        feed(&community, &tx, &["member 1 Taro", "member 2 Hanako"]).await;
        // Member 1 leaves and rejoins before the leave is processed.
        feed(
            &community,
            &tx,
            &[
                "voice 1 - 10",
                "voice 1 10 -",
                "voice 1 - 20",
                "voice 2 - 10",
                "voice 2 10 -",
                "quit",
            ],
        )
        .await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;

        assert!(engine.observer().contains(&EngineEvent::LeaveSuperseded {
            member_id: 1,
            channel_id: 10
        }));
        assert_eq!(nickname(&community, 2).await.as_deref(), Some("風吹けば名無し"));
    }

    #[tokio::test]
    async fn test_setmode_command_then_name_join() {
        let mut cfg = config::AppConfig::default();
        cfg.nickname.max_length = 6;
        cfg.nickname.over_length = length::OverLength::Truncate;
        let community = Community::new(true);
        let mut engine = engine(&[]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        feed(
            &community,
            &tx,
            &[
                "member 7 Admin admin",
                "member 3 Taro",
                "say 7 !setmode name",
                "voice 3 - 10",
                "quit",
            ],
        )
        .await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;

        assert_eq!(engine.mode(), Mode::Name);
        assert_eq!(nickname(&community, 3).await.as_deref(), Some("風吹けばTa"));
    }

    #[tokio::test]
    async fn test_denied_change_is_dropped() {
        let cfg = config::AppConfig::default();
        let community = Community::new(false);
        let mut engine = engine(&["Alice"]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        feed(&community, &tx, &["member 1 Taro", "voice 1 - 10", "quit"]).await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;
        assert_eq!(nickname(&community, 1).await, None);

        // The next join goes through once the permission is granted.
        feed(&community, &tx, &["perm on", "voice 1 10 -", "voice 1 - 10", "quit"]).await;
        run_app(&cfg, &mut engine, &community, &mut rx).await;
        assert_eq!(nickname(&community, 1).await.as_deref(), Some("Alice"));
    }
}
