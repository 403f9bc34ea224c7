//! Frame driver
//!
//! Sits between the host's animation callback and the simulation: drops callbacks that
//! arrive faster than the target frame rate, turns elapsed time into a delta multiplier,
//! applies buffered input, ticks, then rebuilds the draw list.

use glam::Vec2;

use crate::consts::{FPS_WINDOW, MAX_DELTA_MULTIPLIER, NOMINAL_FRAME_MS};
use crate::renderer::{AssetReadiness, DrawList, draw_world};
use crate::settings::Settings;
use crate::sim::{GameEvent, Session, TickInput, Viewport, apply_input, tick};

/// Two touches closer together than this toggle pause instead of tapping
pub const DOUBLE_TAP_MS: f64 = 300.0;

/// Frame-rate limiter and FPS counter
#[derive(Debug, Clone)]
pub struct FrameClock {
    target_fps: u32,
    last_frame: Option<f64>,
    /// Ring of processed frame times; `None` until the slot is first written
    frame_times: [Option<f64>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps: target_fps.max(1),
            last_frame: None,
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    /// Shortest gap between processed frames, with 1 ms of slack for timer jitter
    pub fn min_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64 - 1.0
    }

    /// Rolling average over the last processed frames
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Forget the last frame time, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.last_frame = None;
    }

    /// Decide whether the callback at `now_ms` is processed.
    ///
    /// Returns the delta multiplier (elapsed time in nominal 60 fps frames, capped) or
    /// `None` when the frame is skipped.
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        let Some(last) = self.last_frame else {
            self.last_frame = Some(now_ms);
            self.record(now_ms);
            return Some(1.0);
        };

        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            // Host clock went backwards; resynchronise without moving
            self.last_frame = Some(now_ms);
            return None;
        }
        if elapsed < self.min_interval_ms() {
            return None;
        }

        self.last_frame = Some(now_ms);
        self.record(now_ms);
        Some(((elapsed / NOMINAL_FRAME_MS) as f32).min(MAX_DELTA_MULTIPLIER))
    }

    fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = Some(now_ms);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // The slot we will overwrite next holds the oldest sample
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

/// Owns the session and everything needed to turn host callbacks into frames
pub struct FrameDriver {
    session: Session,
    clock: FrameClock,
    input: TickInput,
    draw_list: DrawList,
    last_touch_ms: Option<f64>,
}

impl FrameDriver {
    pub fn new(session: Session, settings: &Settings) -> Self {
        Self {
            session,
            clock: FrameClock::new(settings.quality.target_fps()),
            input: TickInput::default(),
            draw_list: DrawList::new(),
            last_touch_ms: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for out-of-band operations (start, choose, restart, menu)
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.clock.set_target_fps(settings.quality.target_fps());
        self.session.apply_settings(settings);
    }

    /// Restart frame timing after the host stopped calling back (hidden tab)
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.set_viewport(Viewport::new(width, height));
    }

    pub fn queue_tap(&mut self, x: f32, y: f32) {
        self.input.taps.push(Vec2::new(x, y));
    }

    /// Touch press at host time `now_ms`; a quick second touch toggles pause
    pub fn queue_touch(&mut self, x: f32, y: f32, now_ms: f64) {
        match self.last_touch_ms {
            Some(last) if now_ms - last >= 0.0 && now_ms - last < DOUBLE_TAP_MS => {
                self.last_touch_ms = None;
                self.queue_pause_toggle();
            }
            _ => {
                self.last_touch_ms = Some(now_ms);
                self.queue_tap(x, y);
            }
        }
    }

    pub fn queue_pause_toggle(&mut self) {
        self.input.pause = !self.input.pause;
    }

    pub fn queue_test_money(&mut self) {
        self.input.spawn_test_money = true;
    }

    pub fn queue_money_line(&mut self) {
        self.input.spawn_money_line = true;
    }

    /// Process one host animation callback. Returns `false` when the frame was skipped.
    pub fn frame(&mut self, now_ms: f64, assets: &dyn AssetReadiness) -> bool {
        let Some(delta) = self.clock.advance(now_ms) else {
            return false;
        };

        let viewport = *self.session.viewport();
        apply_input(&mut self.session, &self.input, &viewport);
        self.input.clear();

        tick(&mut self.session, delta);

        self.draw_list.clear();
        draw_world(&self.session, assets, &mut self.draw_list);
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }
}
