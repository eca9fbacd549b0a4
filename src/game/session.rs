//! Worker-wide session: preferences, dice, config and the mounted screen.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the module alive, so the session persists across
//! `handle_request` calls for the whole page visit. Only one screen is
//! mounted at a time; mounting another tears the old one down first, which
//! cancels any step it still had scheduled.

use std::cell::RefCell;

use crate::game::config::SessionConfig;
use crate::game::counting::CountingGame;
use crate::game::dice::{OutcomeSource, SeededDice};
use crate::game::feeding::FeedingGame;
use crate::game::jumping::JumpGame;
use crate::game::notify::{Cue, Notifier};
use crate::game::prefs::{BridgeStorage, PreferenceStore, STORAGE_KEY};

/// Which screen currently owns the page.
#[derive(Debug, Clone)]
pub enum Screen {
    Home,
    Counting(CountingGame),
    Jumping(JumpGame),
    Feeding(FeedingGame),
    NotFound,
}

impl Screen {
    fn teardown(&mut self) {
        match self {
            Screen::Counting(g) => g.teardown(),
            Screen::Jumping(g) => g.teardown(),
            Screen::Feeding(g) => g.teardown(),
            Screen::Home | Screen::NotFound => {}
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Counting(_) => "count",
            Screen::Jumping(_) => "jump",
            Screen::Feeding(_) => "feed",
            Screen::NotFound => "not-found",
        }
    }
}

pub struct Session {
    pub config: SessionConfig,
    pub dice: Box<dyn OutcomeSource>,
    pub prefs: PreferenceStore<BridgeStorage>,
    pub screen: Screen,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            dice: Box::new(SeededDice::new(config.seed)),
            prefs: PreferenceStore::open(BridgeStorage::default()),
            screen: Screen::Home,
            config,
        }
    }

    /// Replace the mounted screen, cancelling whatever the old one scheduled.
    pub fn mount(&mut self, screen: Screen) {
        self.screen.teardown();
        tracing::debug!(from = self.screen.name(), to = screen.name(), "mount");
        self.screen = screen;
    }

    pub fn fresh_counting(&self) -> CountingGame {
        CountingGame::new(self.config.timing())
    }

    pub fn fresh_jumping(&self) -> JumpGame {
        JumpGame::new(self.config.jump_target, self.config.timing())
    }

    pub fn fresh_feeding(&self) -> FeedingGame {
        FeedingGame::new(self.config.timing())
    }

    /// A notifier honouring the current sfx toggle.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.prefs.settings().sfx)
    }

    /// Record a badge; a newly earned one gets a cheer.
    pub fn award_badge(&mut self, badge: &str, notifier: &mut Notifier) {
        if self.prefs.add_badge(badge) {
            tracing::debug!(badge, "badge earned");
            notifier.cue(Cue::Cheer);
        }
    }

    /// Move any queued preference write into the response effects.
    pub fn flush_storage(&mut self, notifier: &mut Notifier) {
        if let Some(blob) = self.prefs.storage_mut().take_outbox() {
            notifier.store(STORAGE_KEY, blob);
        }
    }

    /// Rebuild the preference store from a blob the page kept in localStorage.
    pub fn restore_prefs(&mut self, blob: &str) {
        self.prefs = PreferenceStore::open(BridgeStorage::seeded(blob));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

/// Execute a closure with read access to the session.
pub fn with_session<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the session.
pub fn with_session_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Session) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

pub fn replace_session(session: Session) {
    SESSION.with(|s| {
        *s.borrow_mut() = session;
    });
}

/// Back to a fresh default session (used by tests).
pub fn reset_session() {
    replace_session(Session::default());
}

/// Reconfigure the session from the page's JSON config: new dice, new
/// pacing, back to the menu. Preferences already loaded are kept. Bad JSON
/// still applies the defaults, and the error is handed back for logging.
pub fn init_session(config_json: &str) -> Result<(), String> {
    let (config, outcome) = match SessionConfig::from_json(config_json) {
        Ok(c) => (c, Ok(())),
        Err(e) => {
            tracing::warn!("{}", e);
            (SessionConfig::default(), Err(e))
        }
    };
    with_session_mut(|s| {
        s.mount(Screen::Home);
        s.dice = Box::new(SeededDice::new(config.seed));
        s.config = config;
    });
    outcome
}
