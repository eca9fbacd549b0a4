//! Game module — the three mini-game state machines plus the pieces they
//! share: dice, deferred steps, audio/speech effects and the persisted
//! preference store. Everything lives in WASM memory for the lifetime of
//! the Web Worker (see [`session`]).

pub mod config;
pub mod counting;
pub mod dice;
pub mod feeding;
pub mod jumping;
pub mod notify;
pub mod prefs;
pub mod session;
pub mod timeline;

/// What an input or a resumed step did to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Not valid in the current phase (or a stale ticket). Nothing changed.
    Ignored,
    /// State moved forward.
    Advanced,
    /// The round just reached its celebratory end.
    Completed,
}
