//! Per-frame simulation step
//!
//! Advances the session by one delta-scaled frame: sim clock, due timers, road, scenery,
//! the live card and cash pickups, in that order.

use glam::Vec2;

use super::projection::Viewport;
use super::session::Session;
use crate::consts::NOMINAL_FRAME_MS;

/// Input collected between frames, applied once before the next tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer presses in canvas coordinates
    pub taps: Vec<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Debug: single test bill
    pub spawn_test_money: bool,
    /// Debug: row of bills
    pub spawn_money_line: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty() && !self.pause && !self.spawn_test_money && !self.spawn_money_line
    }

    /// Clear one-shot inputs after processing
    pub fn clear(&mut self) {
        self.taps.clear();
        self.pause = false;
        self.spawn_test_money = false;
        self.spawn_money_line = false;
    }
}

/// Feed buffered input to the session
pub fn apply_input(session: &mut Session, input: &TickInput, viewport: &Viewport) {
    if input.pause {
        session.on_pause_toggle();
    }
    for tap in &input.taps {
        session.on_tap(tap.x, tap.y, viewport);
    }
    if input.spawn_test_money {
        session.spawn_test_money();
    }
    if input.spawn_money_line {
        session.spawn_money_line(5);
    }
}

/// Advance the session by `delta` nominal frames.
///
/// Does nothing unless the run is in progress and unpaused, so the sim clock and every
/// pending timer freeze in the menu, in a popup, while paused and after the run ended.
pub fn tick(session: &mut Session, delta: f32) {
    if !session.state.is_running() || delta <= 0.0 {
        return;
    }

    session.clock_ms += delta as f64 * NOMINAL_FRAME_MS;
    for event in session.timers.take_due(session.clock_ms, session.generation) {
        session.fire(event);
    }

    session.state.advance_road(session.tuning.road_speed, delta);

    if let Some(theme) = &session.state.theme {
        session.player.animate(&theme.character);
    }

    let glyphs: &[String] = session
        .state
        .theme
        .as_ref()
        .map(|t| t.decorations.as_slice())
        .unwrap_or(&[]);
    session.decorations.update(
        delta,
        &session.viewport,
        glyphs,
        &session.tuning,
        &mut session.rng,
    );

    if let Some(hit) = session.cards.update(&session.state, delta, &session.tuning) {
        session.handle_card_hit(hit.kind);
    }

    // A hit this frame opened a popup, which stops the money too
    session.money.update(
        &mut session.state,
        delta,
        &session.tuning,
        &mut session.events,
    );

    if session.banner_until_ms.is_some() && !session.banner_active() {
        session.banner_until_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{GameEvent, GamePhase, Outcome};
    use crate::theme::ThemeCatalog;
    use crate::tuning::Tuning;

    fn started(seed: u64) -> Session {
        let mut session = Session::new(seed, Tuning::default(), &Settings::default());
        let theme = ThemeCatalog::builtin()
            .expect("themes")
            .get("tech")
            .cloned()
            .expect("tech");
        session.start(theme);
        session.drain_events();
        session
    }

    /// Tick until a popup opens or the run ends
    fn run_until_stopped(session: &mut Session, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            tick(session, 1.0);
            if !session.state().is_running() {
                return frame + 1;
            }
        }
        max_frames
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut session = Session::new(1, Tuning::default(), &Settings::default());
        tick(&mut session, 1.0);
        assert_eq!(session.clock_ms(), 0.0);
        assert_eq!(session.state().road_offset, 0.0);
    }

    #[test]
    fn test_card_hit_fires_exactly_once() {
        let mut session = started(7);
        // First card starts at 6.0: (6.0 - 0.2) / 0.025 = 232 frames
        let frames = run_until_stopped(&mut session, 1000);
        assert!((231..=233).contains(&frames), "hit after {} frames", frames);

        for _ in 0..200 {
            tick(&mut session, 1.0);
        }
        let hits = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::CardHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(session.state().cards_this_month, 1);
        assert!(session.state().pending_decision().is_some());
    }

    #[test]
    fn test_two_cards_make_one_month() {
        let mut session = started(8);
        run_until_stopped(&mut session, 1000);
        session.choose(0);
        let cash_before = session.state().cash;
        let revenue = session.state().revenue_per_month;
        run_until_stopped(&mut session, 2000);

        assert_eq!(session.state().month, 2);
        assert_eq!(session.state().cards_this_month, 0);
        assert_eq!(session.state().cash, cash_before + revenue);
        let month_ends = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MonthEnded { .. }))
            .count();
        assert_eq!(month_ends, 1);
    }

    #[test]
    fn test_respawn_waits_for_delay() {
        let mut session = started(9);
        run_until_stopped(&mut session, 1000);
        session.choose(1);
        assert!(!session.cards().has_card());

        // 1000 ms is 60 nominal frames
        for _ in 0..59 {
            tick(&mut session, 1.0);
        }
        assert!(!session.cards().has_card());
        tick(&mut session, 1.0);
        tick(&mut session, 1.0);
        assert_eq!(session.cards().live().map(|c| c.distance > 3.0), Some(true));
    }

    #[test]
    fn test_revenue_wave_collected_after_month_end() {
        let mut session = started(10);
        run_until_stopped(&mut session, 1000);
        session.choose(0);
        run_until_stopped(&mut session, 2000);
        let cash_at_month_end = session.state().cash;
        assert!(session.banner_active());
        session.choose(0);

        // Let the whole wave arrive and be collected; stop if another card pops up
        let mut collected = 0;
        for _ in 0..1200 {
            tick(&mut session, 1.0);
            collected += session
                .drain_events()
                .into_iter()
                .filter(|e| matches!(e, GameEvent::MoneyCollected { .. }))
                .count();
            if session.state().pending_decision().is_some() {
                session.choose(0);
            }
            if session.state().is_ended() {
                break;
            }
        }
        assert!(collected >= 3, "collected {} bills", collected);
        assert!(session.state().cash > cash_at_month_end);
    }

    #[test]
    fn test_victory_freezes_the_run() {
        let mut session = started(11);
        session.state.cash = 990;
        session.state.cards_this_month = 1;
        run_until_stopped(&mut session, 1000);

        assert_eq!(session.state().outcome(), Some(Outcome::Victory));
        let clock = session.clock_ms();
        let offset = session.state().road_offset;
        let cash = session.state().cash;
        let month = session.state().month;
        for _ in 0..100 {
            tick(&mut session, 1.0);
        }
        assert_eq!(session.clock_ms(), clock);
        assert_eq!(session.state().road_offset, offset);
        assert_eq!(session.state().cash, cash);
        assert_eq!(session.state().month, month);
        // Ended ignores pause
        session.on_pause_toggle();
        assert!(!session.state().is_paused());
    }

    #[test]
    fn test_pause_freezes_distances() {
        let mut session = started(12);
        session.spawn_money_line(3);
        for _ in 0..10 {
            tick(&mut session, 1.0);
        }

        session.set_paused(true);
        let card = session.cards().live().map(|c| c.distance);
        let money: Vec<f32> = session.money().active().iter().map(|m| m.distance).collect();
        let scenery: Vec<f32> = session
            .decorations()
            .active()
            .iter()
            .map(|d| d.distance)
            .collect();
        for _ in 0..100 {
            tick(&mut session, 1.0);
        }
        assert_eq!(session.cards().live().map(|c| c.distance), card);
        let money_after: Vec<f32> = session.money().active().iter().map(|m| m.distance).collect();
        assert_eq!(money_after, money);
        let scenery_after: Vec<f32> = session
            .decorations()
            .active()
            .iter()
            .map(|d| d.distance)
            .collect();
        assert_eq!(scenery_after, scenery);

        // Resume exactly where we left off
        session.set_paused(false);
        tick(&mut session, 1.0);
        let expected = card.map(|d| d - 0.025);
        let actual = session.cards().live().map(|c| c.distance);
        assert!((actual.unwrap_or(0.0) - expected.unwrap_or(0.0)).abs() < 1e-5);
    }

    #[test]
    fn test_stale_timers_do_not_fire_after_restart() {
        let mut session = started(13);
        run_until_stopped(&mut session, 1000);
        session.choose(0);
        assert_eq!(session.timers().len(), 1);

        session.restart();
        // Fresh run: first card at 6.0, and the old respawn must not replace it
        for _ in 0..120 {
            tick(&mut session, 1.0);
        }
        let card = session.cards().live().expect("card");
        assert!((card.distance - (6.0 - 120.0 * 0.025)).abs() < 1e-3);
        assert!(session.timers().is_empty());
    }

    #[test]
    fn test_stale_bills_do_not_spawn_after_menu() {
        let mut session = started(14);
        run_until_stopped(&mut session, 1000);
        session.choose(0);
        run_until_stopped(&mut session, 2000);
        assert!(session.timers().len() >= 3);

        session.return_to_menu();
        let theme = ThemeCatalog::builtin()
            .expect("themes")
            .get("retail")
            .cloned()
            .expect("retail");
        session.start(theme);
        for _ in 0..200 {
            tick(&mut session, 1.0);
        }
        assert!(session.money().active().is_empty());
        assert_eq!(session.state().cash, 0);
    }

    #[test]
    fn test_cash_never_decreases_during_a_run() {
        let mut session = started(15);
        let mut last = 0;
        for frame in 0..20_000 {
            tick(&mut session, 1.5);
            if session.state().pending_decision().is_some() {
                session.choose(frame % 2);
            }
            if frame % 500 == 0 {
                session.spawn_test_money();
            }
            assert!(session.state().cash >= last);
            last = session.state().cash;
            if session.state().is_ended() {
                break;
            }
        }
        assert!(session.state().is_ended(), "a run always terminates");
    }

    #[test]
    fn test_determinism() {
        let mut a = started(99);
        let mut b = started(99);
        for frame in 0..3000 {
            tick(&mut a, 1.0);
            tick(&mut b, 1.0);
            if a.state().pending_decision().is_some() {
                a.choose(frame % 2);
                b.choose(frame % 2);
            }
        }
        assert_eq!(a.state().cash, b.state().cash);
        assert_eq!(a.state().month, b.state().month);
        assert_eq!(a.decorations().active(), b.decorations().active());
    }

    #[test]
    fn test_input_buffer() {
        let mut session = started(16);
        let vp = Viewport::default();
        let mut input = TickInput {
            pause: true,
            ..Default::default()
        };
        apply_input(&mut session, &input, &vp);
        assert!(session.state().is_paused());
        input.clear();
        assert!(input.is_empty());

        input.spawn_test_money = true;
        apply_input(&mut session, &input, &vp);
        assert_eq!(session.money().active().len(), 1);
        assert_eq!(session.state().phase, GamePhase::Running);
    }
}
