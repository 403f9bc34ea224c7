//! Perspective projection from road space to screen space
//!
//! World positions are `(lateral, distance)`: lateral is the sideways offset from the
//! road centre, distance is how far ahead of the player's plane the point lies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizon height as a fraction of the viewport height
pub const HORIZON_FRACTION: f32 = 0.4;
/// Road width at the player's plane as a fraction of the viewport width
pub const ROAD_WIDTH_FRACTION: f32 = 0.6;
/// Depth falloff constant: `scale = 1 / (1 + distance * DEPTH_FALLOFF)`
pub const DEPTH_FALLOFF: f32 = 2.0;

/// Canvas dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// A projected point with its perspective scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Projected {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen-space vanishing point of the road
    pub fn vanishing_point(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height * HORIZON_FRACTION)
    }

    /// Horizon line y coordinate
    pub fn horizon_y(&self) -> f32 {
        self.height * HORIZON_FRACTION
    }

    /// Road width at the player's plane
    pub fn road_width(&self) -> f32 {
        self.width * ROAD_WIDTH_FRACTION
    }

    /// Map a road-space position to the screen
    #[inline]
    pub fn project(&self, lateral: f32, distance: f32) -> Projected {
        let scale = perspective_scale(distance);
        let vanishing = self.vanishing_point();
        let road_width_at = self.road_width() * scale;

        Projected {
            x: vanishing.x + lateral * road_width_at / 3.0,
            y: vanishing.y + (self.height - vanishing.y) * scale,
            scale,
        }
    }

    /// True when `x` lies within the viewport widened by `margin` on both sides
    pub fn contains_x(&self, x: f32, margin: f32) -> bool {
        x >= -margin && x <= self.width + margin
    }
}

/// Perspective shrink factor for a forward distance
#[inline]
pub fn perspective_scale(distance: f32) -> f32 {
    1.0 / (1.0 + distance * DEPTH_FALLOFF)
}
