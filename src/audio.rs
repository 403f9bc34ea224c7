//! Audio
//!
//! Short effects are synthesised with Web Audio oscillators; the background loop is a
//! plain media element. Settings and event mapping are platform independent.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, Outcome};

/// Background loop location relative to the page
pub const MUSIC_SRC: &str = "audio/bg.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ran into a decision card
    CardHit,
    /// Picked up a bill
    CashCollect,
    /// Month closed and revenue paid
    MonthEnd,
    /// Reached the cash target
    Victory,
    /// Ran out of months
    TimeUp,
}

impl SoundEffect {
    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CardHit { .. } => Some(SoundEffect::CardHit),
            GameEvent::MoneyCollected { .. } => Some(SoundEffect::CashCollect),
            GameEvent::MonthEnded { .. } => Some(SoundEffect::MonthEnd),
            GameEvent::GameEnded(Outcome::Victory) => Some(SoundEffect::Victory),
            GameEvent::GameEnded(Outcome::TimeUp) => Some(SoundEffect::TimeUp),
            _ => None,
        }
    }
}

/// Player audio preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
    /// Effects volume (0.0 - 1.0)
    pub sound_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            sound_volume: 0.5,
            music_volume: 0.2,
        }
    }
}

impl AudioSettings {
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        log::info!("Sound effects: {}", on_off(self.sound_enabled));
        self.sound_enabled
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        log::info!("Background music: {}", on_off(self.music_enabled));
        self.music_enabled
    }

    /// Set effects volume (0.0 - 1.0)
    pub fn set_sound_volume(&mut self, vol: f32) {
        self.sound_volume = clamp_volume(vol);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = clamp_volume(vol);
    }

    /// Volume effects actually play at
    pub fn effective_sound_volume(&self) -> f32 {
        if self.sound_enabled {
            self.sound_volume
        } else {
            0.0
        }
    }

    /// Volume the loop actually plays at
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            self.music_volume
        } else {
            0.0
        }
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioSettings, MUSIC_SRC, SoundEffect};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        settings: AudioSettings,
    }

    impl AudioManager {
        pub fn new(settings: AudioSettings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - effects disabled");
            }
            let music = HtmlAudioElement::new_with_src(MUSIC_SRC).ok();
            if let Some(music) = &music {
                music.set_loop(true);
            } else {
                log::warn!("Failed to create background music element");
            }
            let manager = Self {
                ctx,
                music,
                settings,
            };
            manager.apply_music_volume();
            manager
        }

        pub fn settings(&self) -> &AudioSettings {
            &self.settings
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn toggle_sound(&mut self) -> bool {
            self.settings.toggle_sound()
        }

        /// Toggle music; turning it back on restarts the loop only when `playing`
        pub fn toggle_music(&mut self, playing: bool) -> bool {
            let on = self.settings.toggle_music();
            self.apply_music_volume();
            if !on {
                self.stop_music();
            } else if playing {
                self.start_music();
            }
            on
        }

        fn apply_music_volume(&self) {
            if let Some(music) = &self.music {
                music.set_volume(self.settings.effective_music_volume() as f64);
            }
        }

        /// Start the loop from the beginning if it is not already playing
        pub fn start_music(&self) {
            if !self.settings.music_enabled {
                return;
            }
            let Some(music) = &self.music else { return };
            if music.paused() {
                music.set_current_time(0.0);
                if music.play().is_err() {
                    log::warn!("Background music failed to start");
                }
            }
        }

        pub fn stop_music(&self) {
            let Some(music) = &self.music else { return };
            if !music.paused() {
                let _ = music.pause();
                music.set_current_time(0.0);
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.settings.effective_sound_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::CardHit => self.play_card(ctx, vol),
                SoundEffect::CashCollect => self.play_cash(ctx, vol),
                SoundEffect::MonthEnd => self.play_month_end(ctx, vol),
                SoundEffect::Victory => self.play_victory(ctx, vol),
                SoundEffect::TimeUp => self.play_time_up(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single decaying note starting `delay` seconds from now
        fn note(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            gain_level: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(gain_level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Card - paper flip swoosh
        fn play_card(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Cash - register ding
        fn play_cash(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [900.0, 1200.0].iter().enumerate() {
                self.note(ctx, *freq, OscillatorType::Sine, vol * 0.3, i as f64 * 0.07, 0.18);
            }
        }

        /// Month end - rising triad
        fn play_month_end(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0].iter().enumerate() {
                self.note(ctx, *freq, OscillatorType::Triangle, vol * 0.3, i as f64 * 0.1, 0.3);
            }
        }

        /// Victory - celebratory run
        fn play_victory(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                self.note(ctx, *freq, OscillatorType::Triangle, vol * 0.25, i as f64 * 0.08, 0.25);
            }
        }

        /// Time up - sad descending
        fn play_time_up(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                self.note(ctx, *freq, OscillatorType::Sine, vol * 0.3, i as f64 * 0.2, 0.3);
            }
        }
    }
}
