//! Roadside scenery
//!
//! Theme glyphs scattered across three lateral bands. Purely cosmetic: decorations never
//! interact with cards, money or the player.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::Pool;
use super::projection::Viewport;
use crate::renderer::{Baseline, DrawList, TextStyle};
use crate::tuning::Tuning;

/// Glyph size in pixels at scale 1.0 and size 1.0
pub const DECORATION_BASE_SIZE: f32 = 120.0;
/// Glyphs at or below this pixel size are skipped
pub const MIN_DECORATION_PIXELS: f32 = 12.0;
/// Decorations are drawn between these distances (inclusive)
pub const DECORATION_VISIBLE_RANGE: (f32, f32) = (0.0, 6.0);
/// Beyond this distance, a decoration projected off screen is culled
pub const OFFSCREEN_CULL_DISTANCE: f32 = 0.3;
/// Horizontal slack before an off-screen decoration is culled
pub const OFFSCREEN_CULL_MARGIN: f32 = 200.0;
/// Horizontal slack before a decoration is skipped when drawing
pub const DRAW_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecorationBand {
    /// Close to the road, large
    #[default]
    Roadside,
    /// Mid-field
    Landscape,
    /// Far out, small
    Horizon,
}

impl DecorationBand {
    /// Pick a band: roadside 50%, landscape 30%, horizon 20%
    pub fn pick(roll: f32) -> Self {
        if roll < 0.5 {
            DecorationBand::Roadside
        } else if roll < 0.8 {
            DecorationBand::Landscape
        } else {
            DecorationBand::Horizon
        }
    }

    /// Range of |lateral| for this band
    pub fn lateral_range(&self) -> (f32, f32) {
        match self {
            DecorationBand::Roadside => (1.0, 3.0),
            DecorationBand::Landscape => (2.0, 5.0),
            DecorationBand::Horizon => (3.0, 8.0),
        }
    }

    /// Range of the size multiplier for this band
    pub fn size_range(&self) -> (f32, f32) {
        match self {
            DecorationBand::Roadside => (0.8, 1.4),
            DecorationBand::Landscape => (0.6, 1.0),
            DecorationBand::Horizon => (0.4, 0.7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decoration {
    pub glyph: String,
    pub lateral: f32,
    pub distance: f32,
    pub size: f32,
    pub bob_phase: f32,
    pub band: DecorationBand,
}

#[derive(Debug, Clone)]
pub struct DecorationSystem {
    active: Vec<Decoration>,
    pool: Pool<Decoration>,
    cap: usize,
    spawn_rate: f32,
    bobbing: bool,
}

impl DecorationSystem {
    pub fn new(cap: usize, spawn_rate: f32, tuning: &Tuning) -> Self {
        Self {
            active: Vec::with_capacity(cap),
            pool: Pool::new(tuning.decoration_pool_capacity),
            cap,
            spawn_rate,
            bobbing: true,
        }
    }

    pub fn active(&self) -> &[Decoration] {
        &self.active
    }

    pub fn pool(&self) -> &Pool<Decoration> {
        &self.pool
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    /// Change the device budget; takes effect on the next spawn
    pub fn set_budget(&mut self, cap: usize, spawn_rate: f32) {
        self.cap = cap;
        self.spawn_rate = spawn_rate.clamp(0.0, 1.0);
    }

    /// Disable the idle bob (reduced motion)
    pub fn set_bobbing(&mut self, enabled: bool) {
        self.bobbing = enabled;
    }

    /// Fill the scene up to the cap at random distances 1-5
    pub fn populate<R: Rng + ?Sized>(&mut self, glyphs: &[String], rng: &mut R) {
        self.reset();
        for _ in 0..self.cap {
            let distance = rng.random_range(1.0..5.0);
            self.spawn(distance, glyphs, rng);
        }
        log::debug!("Populated {} decorations", self.active.len());
    }

    /// Spawn one decoration; no-op without glyphs or when at the cap
    pub fn spawn<R: Rng + ?Sized>(&mut self, distance: f32, glyphs: &[String], rng: &mut R) -> bool {
        if glyphs.is_empty() || self.active.len() >= self.cap {
            return false;
        }

        let glyph = &glyphs[rng.random_range(0..glyphs.len())];
        let side = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        let band = DecorationBand::pick(rng.random());
        let (lat_min, lat_max) = band.lateral_range();
        let (size_min, size_max) = band.size_range();
        let lateral = rng.random_range(lat_min..lat_max) * side;
        let size = rng.random_range(size_min..size_max);
        let bob_phase = rng.random_range(0.0..TAU);

        let mut decoration = self.pool.acquire();
        decoration.glyph.clear();
        decoration.glyph.push_str(glyph);
        decoration.lateral = lateral;
        decoration.distance = distance;
        decoration.size = size;
        decoration.bob_phase = bob_phase;
        decoration.band = band;
        self.active.push(decoration);
        true
    }

    /// Advance, cull, then maybe spawn one more far away
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        viewport: &Viewport,
        glyphs: &[String],
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for i in (0..self.active.len()).rev() {
            let decoration = &mut self.active[i];
            decoration.distance -= tuning.entity_speed * delta;
            decoration.bob_phase += tuning.decoration_bob_speed * delta;

            let behind = decoration.distance <= tuning.decoration_cull_distance;
            let off_screen = decoration.distance > OFFSCREEN_CULL_DISTANCE && {
                let p = viewport.project(decoration.lateral, decoration.distance);
                !viewport.contains_x(p.x, OFFSCREEN_CULL_MARGIN)
            };

            if behind || off_screen {
                let decoration = self.active.remove(i);
                self.pool.release(decoration);
            }
        }

        if rng.random::<f32>() < self.spawn_rate {
            let distance = rng.random_range(4.0..6.0);
            self.spawn(distance, glyphs, rng);
        }
    }

    pub fn draw(&self, viewport: &Viewport, list: &mut DrawList) {
        let (near, far) = DECORATION_VISIBLE_RANGE;
        let mut visible: Vec<&Decoration> = self
            .active
            .iter()
            .filter(|d| d.distance >= near && d.distance <= far)
            .collect();
        // Far to near so closer glyphs overlap
        visible.sort_by(|a, b| b.distance.total_cmp(&a.distance));

        for decoration in visible {
            let p = viewport.project(decoration.lateral, decoration.distance);
            if !viewport.contains_x(p.x, DRAW_MARGIN) {
                continue;
            }
            let size = (DECORATION_BASE_SIZE * p.scale * decoration.size).floor();
            if size <= MIN_DECORATION_PIXELS {
                continue;
            }

            let bob = if self.bobbing {
                decoration.bob_phase.sin() * 2.0 * p.scale
            } else {
                0.0
            };
            let mut style = TextStyle::glyph(size, Baseline::Bottom);
            style.alpha = (p.scale * 2.5).clamp(0.5, 1.0);
            list.text(
                decoration.glyph.as_str(),
                Vec2::new(p.x.floor(), (p.y + bob).floor()),
                style,
            );
        }
    }

    pub fn reset(&mut self) {
        for decoration in self.active.drain(..) {
            self.pool.release(decoration);
        }
    }
}
