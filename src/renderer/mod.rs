//! Rendering module
//!
//! The simulation fills a [`DrawList`] back to front; the Canvas 2D backend replays it.

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw_list;
pub mod scene;

pub use assets::{AssetId, AssetReadiness, AssetState, StaticAssets};
#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasBackend, ImageAssets};
pub use draw_list::{Baseline, DrawCmd, DrawList, Rect, TextAlign, TextStyle, colors};
pub use scene::draw_world;
