//! Whole-frame scene composition

use glam::Vec2;

use super::assets::AssetReadiness;
use super::draw_list::{DrawCmd, DrawList, Rect, colors};
use crate::sim::{Session, Viewport};
use crate::theme::Theme;

/// Half-width of the road where it meets the horizon
const ROAD_TOP_HALF_WIDTH: f32 = 30.0;
const ROAD_LINE_WIDTH: f32 = 4.0;
const DASH_COUNT: usize = 10;
const DASH_SPACING: f32 = 0.3;
const DASH_LENGTH: f32 = 0.15;
/// Dashes live between the player and this distance
const DASH_RANGE: f32 = 1.5;

/// Append the whole world, back to front. Nothing is drawn before a theme is chosen.
pub fn draw_world(session: &Session, assets: &dyn AssetReadiness, list: &mut DrawList) {
    let Some(theme) = session.state().theme.as_ref() else {
        return;
    };
    let viewport = session.viewport();

    draw_sky(theme, viewport, list);
    draw_ground(theme, viewport, list);
    session.decorations().draw(viewport, list);
    draw_road(theme, viewport, session.state().road_offset, list);
    session.money().draw(viewport, assets, list);
    session.cards().draw(viewport, assets, list);
    session
        .player()
        .draw(Some(&theme.character), viewport, assets, list);
}

fn draw_sky(theme: &Theme, viewport: &Viewport, list: &mut DrawList) {
    list.push(DrawCmd::Gradient {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.horizon_y()),
        top: theme.sky_top.clone(),
        bottom: theme.sky_bottom.clone(),
    });
}

fn draw_ground(theme: &Theme, viewport: &Viewport, list: &mut DrawList) {
    let horizon = viewport.horizon_y();
    let color = if theme.ground_color.is_empty() {
        colors::FALLBACK_GROUND.to_string()
    } else {
        theme.ground_color.clone()
    };
    list.push(DrawCmd::FillRect {
        rect: Rect::new(0.0, horizon, viewport.width, viewport.height - horizon),
        color,
    });
}

fn draw_road(theme: &Theme, viewport: &Viewport, road_offset: f32, list: &mut DrawList) {
    let vanishing = viewport.vanishing_point();
    let half = viewport.road_width() / 2.0;
    let center = viewport.width / 2.0;

    let top_left = Vec2::new(vanishing.x - ROAD_TOP_HALF_WIDTH, vanishing.y);
    let top_right = Vec2::new(vanishing.x + ROAD_TOP_HALF_WIDTH, vanishing.y);
    let bottom_right = Vec2::new(center + half, viewport.height);
    let bottom_left = Vec2::new(center - half, viewport.height);

    list.push(DrawCmd::FillPolygon {
        points: vec![top_left, top_right, bottom_right, bottom_left],
        color: theme.road_color.clone(),
    });
    list.push(DrawCmd::Line {
        from: top_left,
        to: bottom_left,
        width: ROAD_LINE_WIDTH,
        color: colors::ROAD_EDGE,
    });
    list.push(DrawCmd::Line {
        from: top_right,
        to: bottom_right,
        width: ROAD_LINE_WIDTH,
        color: colors::ROAD_EDGE,
    });

    for distance in dash_distances(road_offset) {
        let start = viewport.project(0.0, distance);
        let end = viewport.project(0.0, (distance - DASH_LENGTH).max(0.0));
        list.push(DrawCmd::Line {
            from: start.pos(),
            to: end.pos(),
            width: ROAD_LINE_WIDTH,
            color: colors::CENTER_LINE,
        });
    }
}

/// Far ends of the visible centre dashes; they slide toward the player as the road scrolls
pub fn dash_distances(road_offset: f32) -> impl Iterator<Item = f32> {
    (0..DASH_COUNT).filter_map(move |i| {
        let d = DASH_RANGE - (road_offset * 4.0 + i as f32 * DASH_SPACING).rem_euclid(2.0);
        (0.0..=DASH_RANGE).contains(&d).then_some(d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::StaticAssets;
    use crate::settings::Settings;
    use crate::theme::ThemeCatalog;
    use crate::tuning::Tuning;

    fn session() -> Session {
        let mut session = Session::new(3, Tuning::default(), &Settings::default());
        session.set_viewport(Viewport::new(800.0, 600.0));
        session
    }

    #[test]
    fn test_menu_draws_nothing() {
        let mut list = DrawList::new();
        draw_world(&session(), &StaticAssets::none(), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_sky_first_player_last() {
        let mut s = session();
        let theme = ThemeCatalog::builtin()
            .expect("themes")
            .get("tech")
            .cloned()
            .expect("tech");
        s.start(theme);

        let mut list = DrawList::new();
        draw_world(&s, &StaticAssets::all(), &mut list);
        let cmds = list.commands();
        assert!(matches!(cmds.first(), Some(DrawCmd::Gradient { top, .. }) if top == "#4A90E2"));
        assert!(matches!(cmds.last(), Some(DrawCmd::SpriteFrame { .. })));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::FillPolygon { .. })));
    }

    #[test]
    fn test_dashes_stay_in_range() {
        for step in 0..100 {
            let offset = step as f32 / 100.0;
            let dashes: Vec<f32> = dash_distances(offset).collect();
            assert!(!dashes.is_empty());
            assert!(dashes.iter().all(|d| (0.0..=1.5).contains(d)));
        }
        // At rest one dash (at 1.8 -> -0.3) falls outside the range
        assert!((8..=9).contains(&dash_distances(0.0).count()));
    }
}
