//! Game state and core simulation types
//!
//! Everything the presentation layer reads (snapshots) or reacts to (events)
//! is defined here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lifecycle::Entity;
use super::progress::ProgressState;
use crate::settings::Settings;
use crate::theme::ThemeId;
use crate::tokens_match;

/// Entity identifier, unique for the lifetime of an engine
pub type EntityId = u32;

/// One sentence puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(default)]
    pub id: String,
    /// Display string shown to the player (usually the English sentence)
    #[serde(default, alias = "english")]
    pub prompt: String,
    /// Tokens to collect, in sentence order
    #[serde(alias = "words")]
    pub required_tokens: Vec<String>,
    /// Target-language tag selecting the decoy corpus
    #[serde(default, alias = "targetLanguage")]
    pub language: String,
}

impl Challenge {
    pub fn new<I, S>(id: &str, prompt: &str, tokens: I, language: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            required_tokens: tokens.into_iter().map(Into::into).collect(),
            language: language.to_string(),
        }
    }

    /// A challenge needs at least one non-blank token to be playable
    pub fn is_playable(&self) -> bool {
        !self.required_tokens.is_empty() && self.required_tokens.iter().all(|t| !t.trim().is_empty())
    }

    /// Membership test used to fix `Entity::is_required` at spawn time
    pub fn requires(&self, token: &str) -> bool {
        self.required_tokens.iter().any(|t| tokens_match(t, token))
    }
}

/// Play field geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    /// Entity footprint, keeps entities inside the side walls
    pub entity_width: f32,
    /// Distance below the bottom edge at which entities exit
    pub exit_margin: f32,
}

impl Field {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.field_width,
            height: settings.field_height,
            entity_width: settings.entity_width,
            exit_margin: settings.exit_margin,
        }
    }

    /// Horizontal range an entity center may occupy
    pub fn x_range(&self) -> (f32, f32) {
        let half = self.entity_width / 2.0;
        let (lo, hi) = (half, self.width - half);
        if hi < lo {
            (self.width / 2.0, self.width / 2.0)
        } else {
            (lo, hi)
        }
    }

    /// Entities whose y passes this have left the field
    pub fn exit_y(&self) -> f32 {
        self.height + self.exit_margin
    }

    /// Whether a point is inside the visible area
    pub fn is_visible(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

/// Per-challenge state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No challenge loaded
    Idle,
    /// Pool generated, initial batch spawns on the next tick
    Loading,
    /// Tick/spawn/click loop running
    Active,
    /// Every required token collected; waiting for the next challenge
    Complete,
}

/// Classification of a resolved click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    /// The token the puzzle expects next
    CorrectInSequence,
    /// A still-needed token, clicked ahead of its turn
    CorrectOutOfSequence,
    /// A decoy, or a token that is no longer needed
    Incorrect,
}

/// Progress counters attached to every event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounters {
    pub collected: usize,
    pub required: usize,
}

/// Discrete events for the scoring/analytics/audio collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    CorrectInSequence {
        entity: EntityId,
        token: String,
        progress: ProgressCounters,
    },
    CorrectOutOfSequence {
        entity: EntityId,
        token: String,
        /// What the puzzle wanted instead
        expected: Option<String>,
        progress: ProgressCounters,
    },
    Incorrect {
        entity: EntityId,
        token: String,
        progress: ProgressCounters,
    },
    /// A required, uncollected token fell off the field
    Miss {
        entity: EntityId,
        token: String,
        progress: ProgressCounters,
    },
    ChallengeComplete {
        challenge_id: String,
        /// Last token collected
        token: String,
        progress: ProgressCounters,
    },
}

impl GameEvent {
    pub fn token(&self) -> &str {
        match self {
            GameEvent::CorrectInSequence { token, .. }
            | GameEvent::CorrectOutOfSequence { token, .. }
            | GameEvent::Incorrect { token, .. }
            | GameEvent::Miss { token, .. }
            | GameEvent::ChallengeComplete { token, .. } => token,
        }
    }

    pub fn progress(&self) -> ProgressCounters {
        match self {
            GameEvent::CorrectInSequence { progress, .. }
            | GameEvent::CorrectOutOfSequence { progress, .. }
            | GameEvent::Incorrect { progress, .. }
            | GameEvent::Miss { progress, .. }
            | GameEvent::ChallengeComplete { progress, .. } => *progress,
        }
    }
}

/// Read-only view of the engine for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub theme: ThemeId,
    /// Seconds of simulated (unpaused) time
    pub clock: f32,
    pub challenge_id: Option<String>,
    pub prompt: Option<String>,
    pub progress: ProgressState,
    /// Live entities in id order
    pub entities: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_parses_content_api_shape() {
        let json = r#"{
            "id": "c1",
            "english": "How are you?",
            "words": ["¿Cómo", "estás?"],
            "targetLanguage": "spanish"
        }"#;
        let challenge: Challenge = serde_json::from_str(json).unwrap();
        assert_eq!(challenge.prompt, "How are you?");
        assert_eq!(challenge.required_tokens, vec!["¿Cómo", "estás?"]);
        assert_eq!(challenge.language, "spanish");
        assert!(challenge.requires("¿cómo"));
    }

    #[test]
    fn test_blank_tokens_are_not_playable() {
        assert!(!Challenge::new("x", "", Vec::<String>::new(), "es").is_playable());
        assert!(!Challenge::new("x", "", ["hola", " "], "es").is_playable());
        assert!(Challenge::new("x", "", ["hola"], "es").is_playable());
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = GameEvent::Miss {
            entity: 7,
            token: "gato".to_string(),
            progress: ProgressCounters { collected: 1, required: 3 },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "miss");
        assert_eq!(json["progress"]["required"], 3);
        assert_eq!(event.token(), "gato");
    }

    #[test]
    fn test_field_x_range_respects_entity_width() {
        let field = Field::from_settings(&Settings::default());
        let (lo, hi) = field.x_range();
        assert_eq!(lo, field.entity_width / 2.0);
        assert_eq!(hi, field.width - field.entity_width / 2.0);
        assert!(field.exit_y() > field.height);
    }
}
