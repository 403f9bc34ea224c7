//! Canvas 2D backend
//!
//! Replays a [`DrawList`] onto a 2D context and tracks image loading.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::assets::{AssetId, AssetReadiness, AssetState};
use super::draw_list::{Baseline, DrawCmd, DrawList, TextAlign};
use crate::sim::Viewport;

/// Image handles with per-frame readiness polling
#[derive(Default)]
pub struct ImageAssets {
    images: HashMap<AssetId, HtmlImageElement>,
    states: HashMap<AssetId, AssetState>,
}

impl ImageAssets {
    /// Start loading every fixed-path asset
    pub fn load_fixed() -> Self {
        let mut assets = Self::default();
        for id in AssetId::fixed() {
            if let Some(path) = id.path() {
                assets.load(id, &path);
            }
        }
        assets
    }

    /// Begin (or restart) loading `id` from `src`
    pub fn load(&mut self, id: AssetId, src: &str) {
        let Ok(img) = HtmlImageElement::new() else {
            log::warn!("Could not create image element for {:?}", id);
            return;
        };
        img.set_src(src);
        self.images.insert(id, img);
        self.states.insert(id, AssetState::Pending);
    }

    /// Refresh load states; call once per frame before drawing
    pub fn poll(&mut self) {
        for (id, img) in &self.images {
            let next = if !img.complete() {
                AssetState::Pending
            } else if img.natural_width() > 0 {
                AssetState::Ready
            } else {
                AssetState::Failed
            };
            let prev = self.states.insert(*id, next);
            if prev != Some(next) {
                match next {
                    AssetState::Ready => log::debug!("Image {:?} loaded", id),
                    AssetState::Failed => {
                        log::warn!("Image {:?} failed to load, using fallback", id)
                    }
                    AssetState::Pending => {}
                }
            }
        }
    }

    pub fn state(&self, id: AssetId) -> AssetState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    fn image(&self, id: AssetId) -> Option<&HtmlImageElement> {
        self.images.get(&id)
    }
}

impl AssetReadiness for ImageAssets {
    fn is_ready(&self, id: AssetId) -> bool {
        self.state(id) == AssetState::Ready
    }
}

pub struct CanvasBackend {
    ctx: CanvasRenderingContext2d,
}

impl CanvasBackend {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Keep sprite pixels crisp after a resize resets context state
    pub fn configure(&self) {
        self.ctx.set_image_smoothing_enabled(false);
    }

    /// Clear and replay the whole list
    pub fn render(&self, list: &DrawList, assets: &ImageAssets, viewport: &Viewport) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        for cmd in list.commands() {
            match cmd {
                DrawCmd::Gradient { rect, top, bottom } => {
                    let gradient = ctx.create_linear_gradient(
                        0.0,
                        rect.y as f64,
                        0.0,
                        (rect.y + rect.h) as f64,
                    );
                    let _ = gradient.add_color_stop(0.0, top);
                    let _ = gradient.add_color_stop(1.0, bottom);
                    ctx.set_fill_style_canvas_gradient(&gradient);
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::FillRect { rect, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::FillPolygon { points, color } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCmd::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCmd::Image { asset, dest } => {
                    if let Some(img) = assets.image(*asset) {
                        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            img,
                            dest.x as f64,
                            dest.y as f64,
                            dest.w as f64,
                            dest.h as f64,
                        );
                    }
                }
                DrawCmd::SpriteFrame { asset, src, dest } => {
                    if let Some(img) = assets.image(*asset) {
                        let _ = ctx
                            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                                img,
                                src.x as f64,
                                src.y as f64,
                                src.w as f64,
                                src.h as f64,
                                dest.x as f64,
                                dest.y as f64,
                                dest.w as f64,
                                dest.h as f64,
                            );
                    }
                }
                DrawCmd::Text { text, pos, style } => {
                    ctx.save();
                    ctx.set_global_alpha(style.alpha as f64);
                    ctx.set_font(&style.font());
                    ctx.set_text_align(match style.align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                        TextAlign::Right => "right",
                    });
                    ctx.set_text_baseline(match style.baseline {
                        Baseline::Top => "top",
                        Baseline::Middle => "middle",
                        Baseline::Bottom => "bottom",
                    });
                    if let Some((stroke, width)) = style.stroke {
                        ctx.set_stroke_style_str(stroke);
                        ctx.set_line_width(width as f64);
                        let _ = ctx.stroke_text(text, pos.x as f64, pos.y as f64);
                    }
                    ctx.set_fill_style_str(style.fill);
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                    ctx.restore();
                }
            }
        }
    }
}
