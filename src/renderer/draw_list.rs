//! Backend-agnostic draw commands
//!
//! The simulation appends commands back-to-front; a backend replays them in order.

use glam::Vec2;

use super::assets::AssetId;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

/// Text or glyph rendering parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub baseline: Baseline,
    pub fill: &'static str,
    /// Outline colour and width
    pub stroke: Option<(&'static str, f32)>,
    pub alpha: f32,
}

impl TextStyle {
    /// Plain centred glyph (emoji) of the given pixel size
    pub fn glyph(size: f32, baseline: Baseline) -> Self {
        Self {
            size,
            bold: false,
            align: TextAlign::Center,
            baseline,
            fill: colors::TEXT,
            stroke: None,
            alpha: 1.0,
        }
    }

    /// CSS font shorthand
    pub fn font(&self) -> String {
        if self.bold {
            format!("bold {}px Arial", self.size.floor())
        } else {
            format!("{}px Arial", self.size.floor())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Vertical gradient filling `rect`
    Gradient {
        rect: Rect,
        top: String,
        bottom: String,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: String,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: &'static str,
    },
    Image {
        asset: AssetId,
        dest: Rect,
    },
    /// One cell of a sprite sheet
    SpriteFrame {
        asset: AssetId,
        src: Rect,
        dest: Rect,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
    },
}

/// Reusable command buffer, cleared at the start of every frame
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            cmds: Vec::with_capacity(128),
        }
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, style: TextStyle) {
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            pos,
            style,
        });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Text commands only, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Image assets referenced, in draw order
    pub fn images(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Image { asset, .. } | DrawCmd::SpriteFrame { asset, .. } => Some(*asset),
            _ => None,
        })
    }
}

/// Colours for scene elements
pub mod colors {
    pub const TEXT: &str = "#000000";
    pub const WHITE: &str = "#FFFFFF";
    pub const ROAD_EDGE: &str = "#FFFFFF";
    pub const CENTER_LINE: &str = "#FFD700";
    pub const COLLECT_TEXT: &str = "#00FF00";
    pub const SHADOW: &str = "rgba(0, 0, 0, 0.4)";
    pub const FALLBACK_BODY: &str = "#2C3E50";
    pub const FALLBACK_HEAD: &str = "#F39C12";
    pub const FALLBACK_GROUND: &str = "#4A4A4A";
}
