//! Engine tunables and per-theme presets
//!
//! Every number the simulation uses comes from here, so a theme variant is a
//! different `Settings` value rather than a different engine. Stored as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::theme::ThemeId;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" | "easy" => Some(Difficulty::Beginner),
            "intermediate" | "medium" => Some(Difficulty::Intermediate),
            "advanced" | "hard" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Footprint used to keep spawns inside the side walls
    pub entity_width: f32,
    /// How far below the bottom edge an entity travels before it exits
    pub exit_margin: f32,

    // === Placement ===
    pub min_separation: f32,
    pub max_placement_attempts: u32,

    // === Motion ===
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    /// Maximum horizontal drift speed (0 = straight down)
    pub drift_max: f32,
    /// Maximum spin in radians/sec (0 = no rotation)
    pub rotation_speed_max: f32,
    pub scale_min: f32,
    pub scale_max: f32,

    // === Population ===
    /// On-screen entity cap
    pub max_active: usize,
    /// Uncollected required tokens kept on screen whenever possible
    pub min_required_on_screen: usize,
    /// Spawns per maintenance pass
    pub spawn_batch: usize,
    /// Spawns on the first pass after a challenge loads
    pub initial_batch: usize,
    /// Cooldown between density spawns (forward-progress spawns ignore it)
    pub spawn_interval_secs: f32,
    /// Chance that a density spawn picks a needed token over a decoy
    pub required_ratio: f32,

    // === Word pool ===
    pub decoys_beginner: usize,
    pub decoys_intermediate: usize,
    pub decoys_advanced: usize,
    /// Theme-requested pool size, replaces the per-difficulty count
    pub decoy_count_override: Option<usize>,

    // === Rules ===
    /// Required tokens must be collected in sentence order
    pub enforce_sequence: bool,
    /// Seconds a clicked entity lingers before removal
    pub click_feedback_secs: f32,

    // === Autoplay ===
    /// Chance the autoplayer clicks a decoy instead of the needed token
    pub autoplay_mistake_rate: f32,
    /// Seconds between autoplayer clicks
    pub autoplay_click_interval_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            entity_width: ENTITY_WIDTH,
            exit_margin: EXIT_MARGIN,

            min_separation: MIN_SEPARATION,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            fall_speed_min: FALL_SPEED_MIN,
            fall_speed_max: FALL_SPEED_MAX,
            drift_max: 0.0,
            rotation_speed_max: 0.0,
            scale_min: 0.9,
            scale_max: 1.1,

            max_active: MAX_ACTIVE_ENTITIES,
            min_required_on_screen: MIN_REQUIRED_ON_SCREEN,
            spawn_batch: SPAWN_BATCH,
            initial_batch: INITIAL_BATCH,
            spawn_interval_secs: 0.4,
            required_ratio: 0.25,

            decoys_beginner: DECOYS_BEGINNER,
            decoys_intermediate: DECOYS_INTERMEDIATE,
            decoys_advanced: DECOYS_ADVANCED,
            decoy_count_override: None,

            enforce_sequence: true,
            click_feedback_secs: CLICK_FEEDBACK_SECS,

            autoplay_mistake_rate: 0.1,
            autoplay_click_interval_secs: 0.6,
        }
    }
}

impl Settings {
    /// Gameplay preset for a theme
    pub fn for_theme(theme: ThemeId) -> Self {
        let mut settings = Self::default();
        match theme {
            ThemeId::Classic => {}
            ThemeId::LavaTemple => {
                // Long sentences need a deep pool to stay interesting
                settings.decoy_count_override = Some(20);
                settings.min_separation = 140.0;
                settings.fall_speed_min = 36.0;
                settings.fall_speed_max = 60.0;
            }
            ThemeId::PirateAdventure => {
                settings.max_active = 15;
                settings.min_required_on_screen = 4;
                settings.enforce_sequence = false;
                settings.fall_speed_min = 48.0;
                settings.fall_speed_max = 78.0;
                settings.initial_batch = 9;
            }
            ThemeId::SpaceExplorer => {
                settings.drift_max = 25.0;
                settings.rotation_speed_max = 1.2;
                settings.scale_min = 0.8;
                settings.scale_max = 1.2;
            }
            ThemeId::TokyoNights => {
                settings.max_active = 8;
                settings.spawn_batch = 1;
                settings.initial_batch = 5;
                settings.spawn_interval_secs = 0.6;
            }
        }
        settings
    }

    /// Decoys requested for a difficulty tier
    pub fn decoy_count(&self, difficulty: Difficulty) -> usize {
        if let Some(count) = self.decoy_count_override {
            return count;
        }
        match difficulty {
            Difficulty::Beginner => self.decoys_beginner,
            Difficulty::Intermediate => self.decoys_intermediate,
            Difficulty::Advanced => self.decoys_advanced,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("entity_width", self.entity_width)?;
        positive("min_separation", self.min_separation)?;
        non_negative("exit_margin", self.exit_margin)?;
        symmetric_range("drift_max", self.drift_max)?;
        symmetric_range("rotation_speed_max", self.rotation_speed_max)?;
        non_negative("spawn_interval_secs", self.spawn_interval_secs)?;
        non_negative("click_feedback_secs", self.click_feedback_secs)?;
        non_negative("autoplay_click_interval_secs", self.autoplay_click_interval_secs)?;

        if self.entity_width > self.field_width {
            return Err(ConfigError::EntityWiderThanField {
                entity_width: self.entity_width,
                field_width: self.field_width,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::ZeroPlacementAttempts);
        }
        finite_range("fall_speed_min", self.fall_speed_min, "fall_speed_max", self.fall_speed_max)?;
        finite_range("scale_min", self.scale_min, "scale_max", self.scale_max)?;
        if !(self.fall_speed_min > 0.0 && self.fall_speed_min <= self.fall_speed_max) {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.fall_speed_min,
                max: self.fall_speed_max,
            });
        }
        if !(self.scale_min > 0.0 && self.scale_min <= self.scale_max) {
            return Err(ConfigError::InvalidScaleRange {
                min: self.scale_min,
                max: self.scale_max,
            });
        }
        if self.max_active == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.min_required_on_screen > self.max_active {
            return Err(ConfigError::FloorExceedsCapacity {
                floor: self.min_required_on_screen,
                capacity: self.max_active,
            });
        }
        if self.spawn_batch == 0 || self.initial_batch == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        for ratio in [self.required_ratio, self.autoplay_mistake_rate] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::InvalidRatio(ratio));
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Bound of a `-value..=value` range; its width must stay finite too
fn symmetric_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(name, value)?;
    if (2.0 * value).is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Both ends and the width of a sampled `min..=max` range must be finite
fn finite_range(
    min_name: &'static str,
    min: f32,
    max_name: &'static str,
    max: f32,
) -> Result<(), ConfigError> {
    finite(min_name, min)?;
    finite(max_name, max)?;
    if (max - min).is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name: max_name, value: max })
    }
}
