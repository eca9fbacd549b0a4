//! Session configuration passed in by the host page at boot.
//!
//! ```json
//! { "seed": 1718000000000, "jump_target": 12, "roll_delay_ms": 1000 }
//! ```
//!
//! Every field is optional. Numbers are read wide and then clamped, so an
//! out-of-range target or a negative delay is pulled into range rather than
//! rejected. Unparseable JSON (or a non-numeric field) yields the defaults.

use serde::Deserialize;

use crate::game::jumping::DEFAULT_TARGET;

/// Highest number-line target the jump board can draw.
pub const MAX_JUMP_TARGET: u8 = 30;

/// Longest delay the page will be asked to wait.
pub const MAX_DELAY_MS: u32 = 10_000;

/// Animation delays shared by the three games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Dice tumble before the outcome is revealed.
    pub roll_ms: u32,
    /// Pause before each hop on the number line.
    pub hop_ms: u32,
    /// Pause between the last tap and the celebration.
    pub settle_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            roll_ms: 1000,
            hop_ms: 600,
            settle_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// PRNG seed. The page passes something fresh (e.g. `Date.now()`).
    pub seed: u64,
    pub jump_target: u8,
    pub roll_delay_ms: u32,
    pub hop_delay_ms: u32,
    pub settle_delay_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            seed: 0x5EED,
            jump_target: DEFAULT_TARGET,
            roll_delay_ms: timing.roll_ms,
            hop_delay_ms: timing.hop_ms,
            settle_delay_ms: timing.settle_ms,
        }
    }
}

/// What the page actually sends, before clamping.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    seed: u64,
    jump_target: i64,
    roll_delay_ms: i64,
    hop_delay_ms: i64,
    settle_delay_ms: i64,
}

impl Default for RawConfig {
    fn default() -> Self {
        let d = SessionConfig::default();
        Self {
            seed: d.seed,
            jump_target: d.jump_target.into(),
            roll_delay_ms: d.roll_delay_ms.into(),
            hop_delay_ms: d.hop_delay_ms.into(),
            settle_delay_ms: d.settle_delay_ms.into(),
        }
    }
}

fn clamp_delay(ms: i64) -> u32 {
    // Bounded by MAX_DELAY_MS, so the cast cannot truncate.
    ms.clamp(0, i64::from(MAX_DELAY_MS)) as u32
}

impl From<RawConfig> for SessionConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            seed: raw.seed,
            jump_target: raw.jump_target.clamp(1, i64::from(MAX_JUMP_TARGET)) as u8,
            roll_delay_ms: clamp_delay(raw.roll_delay_ms),
            hop_delay_ms: clamp_delay(raw.hop_delay_ms),
            settle_delay_ms: clamp_delay(raw.settle_delay_ms),
        }
    }
}

impl SessionConfig {
    /// Parse and clamp. Errors are reported so the caller can log them.
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| format!("Invalid session config JSON: {}", e))?;
        Ok(raw.into())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            roll_ms: self.roll_delay_ms,
            hop_ms: self.hop_delay_ms,
            settle_ms: self.settle_delay_ms,
        }
    }
}
