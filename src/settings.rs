//! Game settings and preferences
//!
//! Held in memory for the lifetime of the page. On the web they are seeded from the URL
//! query string and the user agent.

use serde::{Deserialize, Serialize};

use crate::audio::AudioSettings;

/// User-agent fragments that mark a constrained (mobile) device
const MOBILE_AGENTS: [&str; 8] = [
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "mobile" => Some(QualityPreset::Low),
            "high" | "desktop" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Low on phones and tablets, high everywhere else
    pub fn detect(user_agent: &str) -> Self {
        if MOBILE_AGENTS.iter().any(|a| user_agent.contains(a)) {
            QualityPreset::Low
        } else {
            QualityPreset::High
        }
    }

    /// Maximum live decorations
    pub fn max_decorations(&self) -> usize {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::High => 20,
        }
    }

    /// Per-tick chance of spawning a decoration
    pub fn decoration_spawn_rate(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.015,
            QualityPreset::High => 0.025,
        }
    }

    /// Frame-rate cap
    pub fn target_fps(&self) -> u32 {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::High => crate::consts::DEFAULT_TARGET_FPS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    pub audio: AudioSettings,

    // === Accessibility ===
    /// Reduced motion (no decoration bobbing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            show_fps: false,
            audio: AudioSettings::default(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Device defaults, then overrides from a `?key=value&...` query string.
    ///
    /// Recognised keys: `quality`, `fps`, `sound`, `music`, `motion`. Unknown keys and
    /// unparseable values are ignored.
    pub fn from_query(query: &str, user_agent: &str) -> Self {
        let mut settings = Self::from_preset(QualityPreset::detect(user_agent));

        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let Ok(value) = urlencoding::decode(value) else {
                log::debug!("Ignoring undecodable value for '{}'", key);
                continue;
            };
            let value = value.as_ref();
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::from_str(value) {
                        settings.quality = preset;
                    }
                }
                "fps" => {
                    if let Some(on) = parse_flag(value) {
                        settings.show_fps = on;
                    }
                }
                "sound" => {
                    if let Some(on) = parse_flag(value) {
                        settings.audio.sound_enabled = on;
                    }
                }
                "music" => {
                    if let Some(on) = parse_flag(value) {
                        settings.audio.music_enabled = on;
                    }
                }
                "motion" => {
                    if let Some(on) = parse_flag(value) {
                        settings.reduced_motion = !on;
                    }
                }
                _ => log::debug!("Ignoring unknown setting '{}'", key),
            }
        }
        settings
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "on" | "true" => Some(true),
        "0" | "off" | "false" => Some(false),
        _ => None,
    }
}
