//! Simulation module
//!
//! All gameplay logic lives here. It has no platform dependencies:
//! - Motion is scaled by a delta multiplier in nominal 60 fps frames
//! - Deferred work runs on the session's own clock
//! - Randomness comes from the session's seeded RNG
//! - Drawing only appends to a backend-agnostic draw list

pub mod card;
pub mod decision;
pub mod decoration;
pub mod money;
pub mod player;
pub mod pool;
pub mod projection;
pub mod session;
pub mod state;
pub mod tick;
pub mod timer;

pub use card::{Card, CardHit, CardKind, CardSystem};
pub use decision::{DECISIONS, Decision, DecisionEffect, DecisionId, DecisionOption};
pub use decoration::{Decoration, DecorationBand, DecorationSystem};
pub use money::{CollectionEffect, MoneyPickup, MoneySystem};
pub use player::Player;
pub use pool::Pool;
pub use projection::{Projected, Viewport, perspective_scale};
pub use session::Session;
pub use state::{GameEvent, GamePhase, GameState, MENU_REVENUE, Outcome};
pub use tick::{TickInput, apply_input, tick};
pub use timer::{ScheduledEvent, TimerQueue};
