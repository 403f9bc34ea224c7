//! Business themes
//!
//! Static data embedded at build time. A session copies its theme once at start and
//! treats it as read-only.

use serde::{Deserialize, Serialize};

const BUILTIN_THEMES: &str = include_str!("../assets/themes.json");

/// Character sprite sheet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Image path relative to the page
    pub src: String,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Update ticks per animation frame
    pub frame_speed: u32,
    /// Integer upscale applied when drawing
    pub scale: u32,
    /// `[column, row]` cells of the walk cycle
    pub frames: Vec<[u32; 2]>,
}

impl SpriteSheet {
    /// On-screen size of one frame
    pub fn draw_size(&self) -> (f32, f32) {
        (
            (self.frame_width * self.scale) as f32,
            (self.frame_height * self.scale) as f32,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub sky_top: String,
    pub sky_bottom: String,
    pub road_color: String,
    pub ground_color: String,
    /// Starting revenue per month
    pub revenue: u64,
    pub character: SpriteSheet,
    /// Roadside glyphs
    pub decorations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub themes: Vec<Theme>,
}

impl ThemeCatalog {
    /// The four themes shipped with the game
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_THEMES)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
