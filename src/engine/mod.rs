//! Nickname assignment engine: mode state, name pool, selection and the
//! presence policy, bundled behind [`Engine`].

pub mod error;
pub mod mode;
pub mod observer;
pub mod policy;
pub mod pool;
pub mod presence;
pub mod selector;

use self::error::AlreadySet;
use self::mode::{Mode, ModeChange, ModeController};
use self::observer::{EngineEvent, EngineObserver};
use self::policy::{MemberDirectory, NicknameIntent, PresencePolicy};
use self::pool::{LoadStatus, NamePool};
use self::presence::VoiceUpdate;

/// One engine per community. Owns the mode and the pool; the command handler
/// and the presence handler both go through it.
pub struct Engine<O> {
    mode: ModeController,
    pool: NamePool,
    policy: PresencePolicy,
    observer: O,
}

impl<O: EngineObserver> Engine<O> {
    pub fn new(pool: NamePool, policy: PresencePolicy, observer: O) -> Self {
        Self {
            mode: ModeController::default(),
            pool,
            policy,
            observer,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn pool(&self) -> &NamePool {
        &self.pool
    }

    #[cfg(test)]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Switch modes. Entering random mode re-reads the pool file so edits
    /// made while in name mode take effect.
    pub fn set_mode(&mut self, requested: Mode) -> Result<ModeChange, AlreadySet> {
        let change = self.mode.set_mode(requested)?;
        self.observer.observe(&EngineEvent::ModeChanged {
            previous: change.previous,
            current: change.current,
        });
        if change.current == Mode::Random {
            self.reload_pool();
        }
        Ok(change)
    }

    /// Reload the pool from its source and report the outcome. Returns the
    /// number of names now available.
    pub fn reload_pool(&mut self) -> usize {
        let path = self.pool.source().to_path_buf();
        let event = match self.pool.load() {
            Ok(LoadStatus::Loaded(0)) => EngineEvent::PoolEmpty { path },
            Ok(LoadStatus::Loaded(count)) => EngineEvent::PoolLoaded { count },
            Ok(LoadStatus::SourceMissing) => EngineEvent::PoolSourceMissing { path },
            Err(e) => EngineEvent::PoolLoadFailed {
                path,
                error: e.to_string(),
            },
        };
        self.observer.observe(&event);
        self.pool.len()
    }

    /// Run the presence policy for one voice update.
    pub async fn on_voice_update<D: MemberDirectory>(
        &self,
        update: &VoiceUpdate,
        directory: &D,
    ) -> Option<NicknameIntent> {
        self.policy
            .decide(update, self.mode.mode(), &self.pool, directory, &self.observer)
            .await
    }
}
