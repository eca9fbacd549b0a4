//! Preference/progress store — avatar, badges and audio settings.
//!
//! The whole [`PreferenceState`] is persisted as one record: JSON, encoded
//! URL-safe base64 (no padding), under [`STORAGE_KEY`]. Storage goes through a
//! [`PrefStorage`] adapter so the browser bridge and tests share one code path.
//!
//! ## Failure model
//!
//! - **Load:** absent, undecodable or incompatible record → defaults.
//! - **Save:** first failure is logged and the store goes in-memory-only for
//!   the rest of the session. The state change itself is kept.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// localStorage key the record lives under.
pub const STORAGE_KEY: &str = "funland-storage";

/// The four selectable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Avatar {
    #[default]
    Dino,
    Mimi,
    Hugo,
    Pip,
}

impl Avatar {
    pub const ALL: [Avatar; 4] = [Avatar::Dino, Avatar::Mimi, Avatar::Hugo, Avatar::Pip];

    pub fn id(self) -> &'static str {
        match self {
            Avatar::Dino => "dino",
            Avatar::Mimi => "mimi",
            Avatar::Hugo => "hugo",
            Avatar::Pip => "pip",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Avatar::Dino => "Dino",
            Avatar::Mimi => "Mimi",
            Avatar::Hugo => "Hugo",
            Avatar::Pip => "Pip",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Avatar::Dino => "\u{1F996}", // 🦖
            Avatar::Mimi => "\u{1F430}", // 🐰
            Avatar::Hugo => "\u{1F43B}", // 🐻
            Avatar::Pip => "\u{1F426}",  // 🐦
        }
    }

    /// Tailwind background/border classes for the avatar bubble.
    pub fn color_classes(self) -> &'static str {
        match self {
            Avatar::Dino => "bg-green-100 border-green-400",
            Avatar::Mimi => "bg-pink-100 border-pink-400",
            Avatar::Hugo => "bg-blue-100 border-blue-400",
            Avatar::Pip => "bg-yellow-100 border-yellow-400",
        }
    }

    pub fn parse(id: &str) -> Option<Avatar> {
        Avatar::ALL.into_iter().find(|a| a.id() == id)
    }
}

/// Reserved for dice-count scaling (easy = one die, hard = two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub fn parse(level: &str) -> Option<Difficulty> {
        match level {
            "easy" => Some(Difficulty::Easy),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub music: bool,
    pub sfx: bool,
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: true,
            sfx: true,
            difficulty: Difficulty::Easy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    pub selected_avatar: Avatar,
    pub badges: BTreeSet<String>,
    pub settings: Settings,
}

impl PreferenceState {
    pub fn encode(&self) -> Result<String, StorageError> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(blob: &str) -> Result<Self, StorageError> {
        let bytes = URL_SAFE_NO_PAD.decode(blob.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("base64 decode error: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("invalid preference record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Durable key-value slot holding the encoded record.
pub trait PrefStorage {
    fn load(&mut self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, blob: &str) -> Result<(), StorageError>;
}

/// In-process storage. Can be told to fail, to exercise the degrade path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub blob: Option<String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MemoryStorage {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            ..Self::default()
        }
    }
}

impl PrefStorage for MemoryStorage {
    fn load(&mut self) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.blob = Some(blob.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Browser storage seen from the worker. Reads come from the blob the page
/// restored at boot; writes wait in an outbox until the route layer turns
/// them into a `localStorage.setItem` effect.
#[derive(Debug, Clone, Default)]
pub struct BridgeStorage {
    seeded: Option<String>,
    outbox: Option<String>,
}

impl BridgeStorage {
    pub fn seeded(blob: impl Into<String>) -> Self {
        let blob = blob.into();
        Self {
            seeded: (!blob.is_empty()).then_some(blob),
            outbox: None,
        }
    }

    /// Take the newest unsent write. Older unsent writes are superseded.
    pub fn take_outbox(&mut self) -> Option<String> {
        self.outbox.take()
    }
}

impl PrefStorage for BridgeStorage {
    fn load(&mut self) -> Result<Option<String>, StorageError> {
        Ok(self.seeded.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        self.outbox = Some(blob.to_string());
        Ok(())
    }
}

/// Owned store with action-style mutations.
#[derive(Debug)]
pub struct PreferenceStore<S: PrefStorage> {
    state: PreferenceState,
    storage: S,
    in_memory_only: bool,
}

impl<S: PrefStorage> PreferenceStore<S> {
    /// Open the store, restoring whatever the adapter holds.
    pub fn open(mut storage: S) -> Self {
        let state = match storage.load() {
            Ok(Some(blob)) => PreferenceState::decode(&blob).unwrap_or_else(|e| {
                tracing::warn!("discarding stored preferences: {}", e);
                PreferenceState::default()
            }),
            Ok(None) => PreferenceState::default(),
            Err(e) => {
                tracing::warn!("preference storage unreadable, using defaults: {}", e);
                PreferenceState::default()
            }
        };
        Self {
            state,
            storage,
            in_memory_only: false,
        }
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn avatar(&self) -> Avatar {
        self.state.selected_avatar
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// True once a write has failed and persistence was abandoned.
    pub fn is_in_memory_only(&self) -> bool {
        self.in_memory_only
    }

    pub fn set_avatar(&mut self, avatar: Avatar) {
        self.state.selected_avatar = avatar;
        self.persist();
    }

    /// Insert a badge. Returns false (and writes nothing) if already earned.
    pub fn add_badge(&mut self, badge: &str) -> bool {
        if !self.state.badges.insert(badge.to_string()) {
            return false;
        }
        self.persist();
        true
    }

    pub fn toggle_music(&mut self) -> bool {
        self.state.settings.music = !self.state.settings.music;
        self.persist();
        self.state.settings.music
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.state.settings.sfx = !self.state.settings.sfx;
        self.persist();
        self.state.settings.sfx
    }

    pub fn set_difficulty(&mut self, level: Difficulty) {
        self.state.settings.difficulty = level;
        self.persist();
    }

    fn persist(&mut self) {
        if self.in_memory_only {
            return;
        }
        let result = self
            .state
            .encode()
            .and_then(|blob| self.storage.save(&blob));
        if let Err(e) = result {
            tracing::warn!("preference write failed, continuing in memory: {}", e);
            self.in_memory_only = true;
        }
    }
}
