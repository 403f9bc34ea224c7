//! The runner at the player's plane

use serde::{Deserialize, Serialize};

use super::projection::Viewport;
use crate::renderer::{AssetId, AssetReadiness, DrawCmd, DrawList, Rect, colors};
use crate::theme::SpriteSheet;

/// Walk cycle used when a theme does not define one
pub const DEFAULT_FRAMES: [[u32; 2]; 4] = [[1, 2], [0, 2], [3, 2], [0, 2]];

/// Sprite animation cursor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    frame: usize,
    counter: u32,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// One update tick; steps the walk cycle every `frame_speed` ticks
    pub fn animate(&mut self, sheet: &SpriteSheet) {
        let frames = frame_count(sheet);
        self.counter += 1;
        if self.counter >= sheet.frame_speed.max(1) {
            self.counter = 0;
            self.frame = (self.frame + 1) % frames;
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.counter = 0;
    }

    pub fn draw(
        &self,
        sheet: Option<&SpriteSheet>,
        viewport: &Viewport,
        assets: &dyn AssetReadiness,
        list: &mut DrawList,
    ) {
        let base = viewport.project(0.0, 0.0);
        let (x, y) = (base.x, base.y);
        let (w, h) = sheet.map(SpriteSheet::draw_size).unwrap_or((320.0, 320.0));

        list.push(DrawCmd::FillRect {
            rect: Rect::new((x - w / 2.0).floor(), (y + 20.0).floor(), w, 40.0),
            color: colors::SHADOW.to_string(),
        });

        match sheet {
            Some(sheet) if assets.is_ready(AssetId::Character) => {
                let [col, row] = cell(sheet, self.frame);
                let (fw, fh) = (sheet.frame_width as f32, sheet.frame_height as f32);
                list.push(DrawCmd::SpriteFrame {
                    asset: AssetId::Character,
                    src: Rect::new(col as f32 * fw, row as f32 * fh, fw, fh),
                    dest: Rect::new((x - w / 2.0).floor(), (y - h).floor(), w, h),
                });
            }
            _ => {
                list.push(DrawCmd::FillRect {
                    rect: Rect::new((x - w / 2.0).floor(), (y - h).floor(), w, h),
                    color: colors::FALLBACK_BODY.to_string(),
                });
                list.push(DrawCmd::FillRect {
                    rect: Rect::new((x - w / 3.0).floor(), (y - h * 1.2).floor(), w * 0.66, h * 0.4),
                    color: colors::FALLBACK_HEAD.to_string(),
                });
            }
        }
    }
}

fn frame_count(sheet: &SpriteSheet) -> usize {
    if sheet.frames.is_empty() {
        DEFAULT_FRAMES.len()
    } else {
        sheet.frames.len()
    }
}

fn cell(sheet: &SpriteSheet, frame: usize) -> [u32; 2] {
    if sheet.frames.is_empty() {
        DEFAULT_FRAMES[frame % DEFAULT_FRAMES.len()]
    } else {
        sheet.frames[frame % sheet.frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::StaticAssets;

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            src: "images/hero.png".to_string(),
            frame_width: 32,
            frame_height: 32,
            frame_speed: 8,
            scale: 10,
            frames: DEFAULT_FRAMES.to_vec(),
        }
    }

    #[test]
    fn test_walk_cycle_wraps() {
        let sheet = sheet();
        let mut player = Player::new();
        for _ in 0..7 {
            player.animate(&sheet);
        }
        assert_eq!(player.frame(), 0);
        player.animate(&sheet);
        assert_eq!(player.frame(), 1);

        for _ in 0..24 {
            player.animate(&sheet);
        }
        assert_eq!(player.frame(), 0);
    }

    #[test]
    fn test_sprite_frame_source_rect() {
        let sheet = sheet();
        let player = Player::new();
        let vp = Viewport::new(800.0, 600.0);
        let mut list = DrawList::new();
        player.draw(Some(&sheet), &vp, &StaticAssets::all(), &mut list);

        let src = list.commands().iter().find_map(|c| match c {
            DrawCmd::SpriteFrame { src, .. } => Some(*src),
            _ => None,
        });
        // First frame is column 1, row 2
        assert_eq!(src, Some(Rect::new(32.0, 64.0, 32.0, 32.0)));
    }

    #[test]
    fn test_fallback_figure_when_sheet_pending() {
        let sheet = sheet();
        let player = Player::new();
        let mut list = DrawList::new();
        player.draw(Some(&sheet), &Viewport::default(), &StaticAssets::none(), &mut list);

        // Shadow, body, head
        assert_eq!(list.len(), 3);
        assert_eq!(list.images().count(), 0);
    }
}
