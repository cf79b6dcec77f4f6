//! Word Blast - falling-word arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, clicks, puzzle progress)
//! - `settings`: Data-driven tunables and per-theme presets
//! - `theme`: Cosmetic skins consumed by the presentation layer
//! - `corpus`: Per-language decoy word lists
//! - `session`: Caller-side run management (challenge queue, lives)

pub mod corpus;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;
pub mod theme;

pub use corpus::DecoyCorpus;
pub use error::{ConfigError, SettingsError};
pub use session::{RunOutcome, Session, SessionStats, load_challenges};
pub use settings::{Difficulty, Settings};
pub use sim::{Challenge, Engine, GameEvent, Snapshot, TickInput};
pub use theme::{ThemeId, ThemeSkin};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest delta a single tick will integrate (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field defaults
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 800.0;
    /// Entities leave the field once this far below the bottom edge
    pub const EXIT_MARGIN: f32 = 60.0;

    /// Entity footprint used for placement
    pub const ENTITY_WIDTH: f32 = 160.0;
    /// Minimum spawn distance between entity centers
    pub const MIN_SEPARATION: f32 = 120.0;
    /// Placement retries before settling for an overlapping position
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;
    /// Spawn height above the visible field
    pub const SPAWN_HEADROOM: f32 = 80.0;

    /// Fall speed range (units/s)
    pub const FALL_SPEED_MIN: f32 = 45.0;
    pub const FALL_SPEED_MAX: f32 = 80.0;

    /// Seconds a clicked entity stays visible for feedback before removal
    pub const CLICK_FEEDBACK_SECS: f32 = 0.2;

    /// On-screen population defaults
    pub const MAX_ACTIVE_ENTITIES: usize = 12;
    pub const MIN_REQUIRED_ON_SCREEN: usize = 3;
    pub const SPAWN_BATCH: usize = 2;
    pub const INITIAL_BATCH: usize = 6;

    /// Decoy counts per difficulty tier
    pub const DECOYS_BEGINNER: usize = 4;
    pub const DECOYS_INTERMEDIATE: usize = 6;
    pub const DECOYS_ADVANCED: usize = 8;

    /// Lives at the start of a session
    pub const STARTING_LIVES: u8 = 3;
}

/// Canonical form used when comparing tokens (clicks are case-insensitive)
#[inline]
pub fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Case-insensitive token equality
#[inline]
pub fn tokens_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
