//! Theme skins
//!
//! A skin is a cosmetic value object. The presentation layer reads it next to
//! the engine snapshot to decide how entities look; the engine never reads it.
//! Gameplay differences between themes live in `Settings::for_theme`.

use serde::{Deserialize, Serialize};

/// The five Word Blast themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeId {
    #[default]
    Classic,
    #[serde(alias = "temple")]
    LavaTemple,
    #[serde(alias = "pirate")]
    PirateAdventure,
    #[serde(alias = "space")]
    SpaceExplorer,
    #[serde(alias = "tokyo")]
    TokyoNights,
}

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Classic,
        ThemeId::LavaTemple,
        ThemeId::PirateAdventure,
        ThemeId::SpaceExplorer,
        ThemeId::TokyoNights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Classic => "classic",
            ThemeId::LavaTemple => "temple",
            ThemeId::PirateAdventure => "pirate",
            ThemeId::SpaceExplorer => "space",
            ThemeId::TokyoNights => "tokyo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(ThemeId::Classic),
            "temple" | "lava" | "lava_temple" | "lava-temple" => Some(ThemeId::LavaTemple),
            "pirate" | "pirate_adventure" | "pirate-adventure" => Some(ThemeId::PirateAdventure),
            "space" | "space_explorer" | "space-explorer" => Some(ThemeId::SpaceExplorer),
            "tokyo" | "tokyo_nights" | "tokyo-nights" => Some(ThemeId::TokyoNights),
            _ => None,
        }
    }

    /// Full cosmetic description of this theme
    pub fn skin(&self) -> ThemeSkin {
        ThemeSkin::for_theme(*self)
    }
}

/// Theme colors as CSS hex strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

/// What a theme looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSkin {
    pub id: ThemeId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub palette: Palette,
    /// Colors sampled by particle bursts on correct/incorrect feedback
    pub particle_palette: &'static [&'static str],
    /// Sprite family drawn behind each token
    pub entity_sprite: &'static str,
    /// Looping background video/image
    pub background_asset: &'static str,
}

impl ThemeSkin {
    pub fn for_theme(id: ThemeId) -> Self {
        match id {
            ThemeId::Classic => Self {
                id,
                display_name: "Classic",
                description: "Traditional falling gems",
                palette: Palette {
                    primary: "#3B82F6",
                    secondary: "#1E40AF",
                    accent: "#06B6D4",
                    background: "#1E293B",
                },
                particle_palette: &["#3B82F6", "#06B6D4", "#FFFFFF"],
                entity_sprite: "gem",
                background_asset: "/images/themes/classic-bg.jpg",
            },
            ThemeId::LavaTemple => Self {
                id,
                display_name: "Lava Temple",
                description: "Ancient stone tablets in a fiery temple",
                palette: Palette {
                    primary: "#FF6B35",
                    secondary: "#F7931E",
                    accent: "#FFD700",
                    background: "#8B4513",
                },
                particle_palette: &["#FF6B35", "#F7931E", "#FFD700", "#8B0000"],
                entity_sprite: "stone_tablet",
                background_asset: "/videos/themes/lava-temple.mp4",
            },
            ThemeId::PirateAdventure => Self {
                id,
                display_name: "Pirate Adventure",
                description: "Cannon battles on the high seas",
                palette: Palette {
                    primary: "#D97706",
                    secondary: "#92400E",
                    accent: "#FCD34D",
                    background: "#1E40AF",
                },
                particle_palette: &["#FCD34D", "#D97706", "#FFFFFF", "#1E40AF"],
                entity_sprite: "pirate_ship",
                background_asset: "/videos/themes/pirate-ocean.mp4",
            },
            ThemeId::SpaceExplorer => Self {
                id,
                display_name: "Space Explorer",
                description: "Laser battles with cosmic comets",
                palette: Palette {
                    primary: "#06B6D4",
                    secondary: "#3B82F6",
                    accent: "#10B981",
                    background: "#000011",
                },
                particle_palette: &["#06B6D4", "#10B981", "#A855F7"],
                entity_sprite: "comet",
                background_asset: "/videos/themes/space-explorer.mp4",
            },
            ThemeId::TokyoNights => Self {
                id,
                display_name: "Tokyo Nights",
                description: "Cyberpunk data packets in neon city",
                palette: Palette {
                    primary: "#EC4899",
                    secondary: "#8B5CF6",
                    accent: "#06B6D4",
                    background: "#1A0A2A",
                },
                particle_palette: &["#EC4899", "#8B5CF6", "#06B6D4"],
                entity_sprite: "data_packet",
                background_asset: "/videos/themes/tokyo-nights.mp4",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_short_and_long_names() {
        assert_eq!(ThemeId::parse("temple"), Some(ThemeId::LavaTemple));
        assert_eq!(ThemeId::parse("Pirate-Adventure"), Some(ThemeId::PirateAdventure));
        assert_eq!(ThemeId::parse("nope"), None);
        for id in ThemeId::ALL {
            assert_eq!(ThemeId::parse(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_every_theme_has_a_distinct_skin() {
        let names: Vec<_> = ThemeId::ALL.iter().map(|id| id.skin().display_name).collect();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
