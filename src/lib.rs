//! Revenue Road - a pseudo-3D endless-runner business simulation
//!
//! Core modules:
//! - `sim`: Simulation context, entity subsystems and the game state machine
//! - `driver`: Frame-rate limited update/draw loop
//! - `renderer`: Back-to-front draw list and the Canvas 2D backend
//! - `theme`: Business themes (static data)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player/device preferences
//! - `ui`: HUD and modal text formatting
//! - `audio`: Sound effect settings and the Web Audio player

pub mod audio;
pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod theme;
pub mod tuning;
pub mod ui;

pub use driver::{FrameClock, FrameDriver};
pub use settings::{QualityPreset, Settings};
pub use theme::{Theme, ThemeCatalog};
pub use tuning::Tuning;

/// Frame timing constants
pub mod consts {
    /// Nominal frame length the motion constants are expressed in (60 fps)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta multiplier applied in one step (long stalls are not replayed)
    pub const MAX_DELTA_MULTIPLIER: f32 = 4.0;
    /// Default frame-rate cap
    pub const DEFAULT_TARGET_FPS: u32 = 60;
    /// Number of processed frames the FPS counter averages over
    pub const FPS_WINDOW: usize = 60;
}
