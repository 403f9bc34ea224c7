//! Cash pickups
//!
//! Pickups come from a bounded pool, approach the player and are credited when they reach
//! the collection plane. Pickups that slip behind the player are lost.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::pool::Pool;
use super::projection::Viewport;
use super::state::{GameEvent, GameState};
use super::timer::{ScheduledEvent, TimerQueue};
use crate::renderer::{
    AssetId, AssetReadiness, Baseline, DrawCmd, DrawList, Rect, TextAlign, TextStyle, colors,
};
use crate::tuning::Tuning;

/// Pickup size in pixels at scale 1.0
pub const MONEY_BASE_SIZE: f32 = 300.0;
/// Pickups are drawn only between these distances (exclusive)
pub const MONEY_VISIBLE_RANGE: (f32, f32) = (0.0, 7.0);
/// Horizontal slack beyond the viewport before a pickup is skipped
pub const MONEY_SCREEN_MARGIN: f32 = 100.0;
/// Value labels only above this scale
pub const LABEL_MIN_SCALE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoneyPickup {
    pub distance: f32,
    pub value: u64,
    pub lateral: f32,
    pub collected: bool,
}

impl MoneyPickup {
    /// Overwrite every field of a pooled record
    fn respawn(&mut self, distance: f32, value: u64, lateral: f32) {
        *self = MoneyPickup {
            distance,
            value,
            lateral,
            collected: false,
        };
    }
}

/// Floating "+$value" shown after a collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionEffect {
    pub lateral: f32,
    pub distance: f32,
    /// Remaining lifetime in nominal frames
    pub timer: f32,
    /// Initial lifetime, for fading
    pub lifetime: f32,
    pub value: u64,
}

#[derive(Debug, Clone)]
pub struct MoneySystem {
    active: Vec<MoneyPickup>,
    pool: Pool<MoneyPickup>,
    effect: Option<CollectionEffect>,
}

impl MoneySystem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            active: Vec::with_capacity(tuning.money_pool_capacity),
            pool: Pool::new(tuning.money_pool_capacity),
            effect: None,
        }
    }

    pub fn active(&self) -> &[MoneyPickup] {
        &self.active
    }

    pub fn pool(&self) -> &Pool<MoneyPickup> {
        &self.pool
    }

    pub fn effect(&self) -> Option<&CollectionEffect> {
        self.effect.as_ref()
    }

    pub fn spawn(&mut self, distance: f32, value: u64, lateral: f32) {
        let mut money = self.pool.acquire();
        money.respawn(distance, value, lateral);
        self.active.push(money);
        log::debug!(
            "Money spawned: ${} at {} ({} active)",
            value,
            distance,
            self.active.len()
        );
    }

    /// A single $50 bill a short way ahead
    pub fn spawn_test_money(&mut self) {
        self.spawn(4.0, 50, 0.0);
    }

    /// Evenly spaced $25 bills
    pub fn spawn_line(&mut self, count: u32, start: f32, spacing: f32) {
        for i in 0..count {
            self.spawn(start + i as f32 * spacing, 25, 0.0);
        }
    }

    /// Is `distance` clear of the live card and every active pickup?
    pub fn has_space_for_money(&self, distance: f32, card: Option<&Card>, tuning: &Tuning) -> bool {
        if card.is_some_and(|c| (c.distance - distance).abs() < tuning.bill_card_clearance) {
            return false;
        }
        !self
            .active
            .iter()
            .any(|m| (m.distance - distance).abs() < tuning.bill_money_clearance)
    }

    /// Split a month's revenue into 3-5 bills released on a stagger.
    ///
    /// Returns the number of bills scheduled.
    pub fn spawn_monthly_revenue<R: Rng + ?Sized>(
        &self,
        total: u64,
        timers: &mut TimerQueue,
        now_ms: f64,
        generation: u64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> u32 {
        // Tuning built in code skips sanitising; keep at least one bill
        let min = tuning.min_revenue_bills.max(1);
        let count = rng.random_range(min..=tuning.max_revenue_bills.max(min));
        let value = total / count as u64;
        for index in 0..count {
            timers.schedule(
                now_ms,
                index as f64 * tuning.bill_stagger_ms,
                generation,
                ScheduledEvent::RevenueBill { index, value },
            );
        }
        log::debug!("Monthly revenue ${} split into {} bills of ${}", total, count, value);
        count
    }

    /// Spawn bill `index` of a revenue wave, nudged back until it has room
    pub fn place_revenue_bill(
        &mut self,
        index: u32,
        value: u64,
        card: Option<&Card>,
        tuning: &Tuning,
    ) -> f32 {
        let mut distance = tuning.bill_first_distance + index as f32 * tuning.bill_spacing;
        while distance < tuning.bill_max_distance && !self.has_space_for_money(distance, card, tuning)
        {
            distance += tuning.spawn_step;
        }
        self.spawn(distance, value, 0.0);
        distance
    }

    /// Advance pickups, credit the ones that reach the player and recycle the rest
    pub fn update(
        &mut self,
        state: &mut GameState,
        delta: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !state.is_running() {
            return;
        }

        // Reverse so removal keeps the unvisited prefix stable
        for i in (0..self.active.len()).rev() {
            if self.active[i].collected {
                let money = self.active.remove(i);
                self.pool.release(money);
                continue;
            }

            let money = &mut self.active[i];
            money.distance -= tuning.entity_speed * delta;

            if money.distance <= tuning.money_collect_distance {
                money.collected = true;
                state.cash = state.cash.saturating_add(money.value);
                self.effect = Some(CollectionEffect {
                    lateral: money.lateral,
                    distance: money.distance,
                    timer: tuning.collection_effect_frames,
                    lifetime: tuning.collection_effect_frames,
                    value: money.value,
                });
                events.push(GameEvent::MoneyCollected {
                    value: money.value,
                    cash: state.cash,
                });
                log::debug!("Collected ${}! Total cash: ${}", money.value, state.cash);

                let money = self.active.remove(i);
                self.pool.release(money);
            } else if money.distance < tuning.money_cull_distance {
                let money = self.active.remove(i);
                self.pool.release(money);
            }
        }

        if let Some(effect) = self.effect.as_mut() {
            effect.timer -= delta;
            if effect.timer <= 0.0 {
                self.effect = None;
            }
        }
    }

    pub fn draw(&self, viewport: &Viewport, assets: &dyn AssetReadiness, list: &mut DrawList) {
        let (near, far) = MONEY_VISIBLE_RANGE;
        for money in &self.active {
            if money.collected || money.distance <= near || money.distance >= far {
                continue;
            }
            let p = viewport.project(money.lateral, money.distance);
            if !viewport.contains_x(p.x, MONEY_SCREEN_MARGIN) {
                continue;
            }

            let size = (MONEY_BASE_SIZE * p.scale).floor();
            if size <= 10.0 {
                continue;
            }

            if assets.is_ready(AssetId::Cash) {
                list.push(DrawCmd::Image {
                    asset: AssetId::Cash,
                    dest: Rect::new(p.x - size / 2.0, p.y - size / 2.0, size, size),
                });
            } else {
                list.text("💰", p.pos(), TextStyle::glyph(size, Baseline::Middle));
            }

            if p.scale > LABEL_MIN_SCALE {
                let style = TextStyle {
                    size: (14.0 * p.scale).floor(),
                    bold: true,
                    align: TextAlign::Center,
                    baseline: Baseline::Top,
                    fill: colors::WHITE,
                    stroke: Some((colors::TEXT, 2.0)),
                    alpha: 1.0,
                };
                list.text(
                    format!("${}", money.value),
                    Vec2::new(p.x, p.y + size / 2.0 + 5.0),
                    style,
                );
            }
        }

        if let Some(effect) = &self.effect {
            let frames = effect.lifetime.max(1.0);
            let p = viewport.project(effect.lateral, effect.distance.max(0.0));
            let rise = (frames - effect.timer).max(0.0) * 2.0;
            let style = TextStyle {
                size: 28.0,
                bold: true,
                align: TextAlign::Center,
                baseline: Baseline::Middle,
                fill: colors::COLLECT_TEXT,
                stroke: None,
                alpha: (effect.timer / frames).clamp(0.0, 1.0),
            };
            list.text(format!("+${}", effect.value), Vec2::new(p.x, p.y - rise), style);
        }
    }

    /// Return every active pickup to the pool and drop the effect
    pub fn reset(&mut self) {
        for money in self.active.drain(..) {
            self.pool.release(money);
        }
        self.effect = None;
        log::debug!("Money system reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::StaticAssets;
    use crate::sim::card::CardKind;
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running() -> GameState {
        let mut state = GameState::new(&Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_collect_at_threshold_in_one_tick() {
        let tuning = Tuning::default();
        let mut state = running();
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        money.spawn(0.3, 50, 0.0);
        money.update(&mut state, 1.0, &tuning, &mut events);

        assert_eq!(state.cash, 50);
        assert!(money.active().is_empty());
        assert_eq!(money.pool().pooled(), 1);
        assert_eq!(
            events,
            vec![GameEvent::MoneyCollected { value: 50, cash: 50 }]
        );
        assert_eq!(money.effect().map(|e| e.value), Some(50));
    }

    #[test]
    fn test_anything_past_the_plane_is_collected() {
        let tuning = Tuning::default();
        let mut state = running();
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        // A large delta carries the bill well past the plane in one step
        money.spawn(1.0, 80, 0.0);
        money.update(&mut state, 40.0, &tuning, &mut events);

        assert_eq!(state.cash, 80);
        assert!(money.active().is_empty());
    }

    #[test]
    fn test_collected_flag_released_on_sweep() {
        let tuning = Tuning::default();
        let mut state = running();
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        money.spawn(5.0, 10, 0.0);
        money.active[0].collected = true;
        money.update(&mut state, 1.0, &tuning, &mut events);
        assert!(money.active().is_empty());
        assert_eq!(state.cash, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_effect_expires() {
        let tuning = Tuning::default();
        let mut state = running();
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        money.spawn(0.1, 5, 0.0);
        money.update(&mut state, 1.0, &tuning, &mut events);
        assert!(money.effect().is_some());
        for _ in 0..30 {
            money.update(&mut state, 1.0, &tuning, &mut events);
        }
        assert!(money.effect().is_none());
    }

    #[test]
    fn test_newest_collection_overwrites_effect() {
        let tuning = Tuning::default();
        let mut state = running();
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        money.spawn(0.1, 5, 0.0);
        money.update(&mut state, 1.0, &tuning, &mut events);
        money.spawn(0.1, 7, 0.0);
        money.update(&mut state, 1.0, &tuning, &mut events);
        assert_eq!(money.effect().map(|e| e.value), Some(7));
        assert_eq!(state.cash, 12);
    }

    #[test]
    fn test_paused_state_freezes_pickups() {
        let tuning = Tuning::default();
        let mut state = running();
        state.paused = true;
        let mut money = MoneySystem::new(&tuning);
        let mut events = Vec::new();

        money.spawn(2.0, 5, 0.0);
        money.update(&mut state, 1.0, &tuning, &mut events);
        assert_eq!(money.active()[0].distance, 2.0);
    }

    #[test]
    fn test_reset_returns_everything_to_pool() {
        let tuning = Tuning::default();
        let mut money = MoneySystem::new(&tuning);
        money.spawn_line(5, 3.0, 1.2);
        assert_eq!(money.active().len(), 5);

        money.reset();
        assert!(money.active().is_empty());
        assert_eq!(money.pool().pooled(), 5);
        assert!(money.effect().is_none());

        // Recycled records come back fully re-initialised
        money.spawn_test_money();
        assert_eq!(
            money.active()[0],
            MoneyPickup {
                distance: 4.0,
                value: 50,
                lateral: 0.0,
                collected: false
            }
        );
        assert_eq!(money.pool().created(), 5);
    }

    #[test]
    fn test_revenue_wave_split_and_staggered() {
        let tuning = Tuning::default();
        let money = MoneySystem::new(&tuning);
        let mut timers = TimerQueue::new();
        let mut rng = Pcg32::seed_from_u64(11);

        let count = money.spawn_monthly_revenue(150, &mut timers, 0.0, 1, &tuning, &mut rng);
        assert!((3..=5).contains(&count));
        assert_eq!(timers.len(), count as usize);

        let first = timers.take_due(0.0, 1);
        assert_eq!(
            first,
            vec![ScheduledEvent::RevenueBill {
                index: 0,
                value: 150 / count as u64
            }]
        );
        let rest = timers.take_due(600.0 * (count - 1) as f64, 1);
        assert_eq!(rest.len(), count as usize - 1);
    }

    #[test]
    fn test_zero_bill_tuning_pays_one_bill() {
        let tuning = Tuning {
            min_revenue_bills: 0,
            max_revenue_bills: 0,
            ..Tuning::default()
        };
        let money = MoneySystem::new(&tuning);
        let mut timers = TimerQueue::new();
        let mut rng = Pcg32::seed_from_u64(5);

        let count = money.spawn_monthly_revenue(120, &mut timers, 0.0, 1, &tuning, &mut rng);
        assert_eq!(count, 1);
        assert_eq!(
            timers.take_due(0.0, 1),
            vec![ScheduledEvent::RevenueBill {
                index: 0,
                value: 120
            }]
        );
    }

    #[test]
    fn test_bill_placement_avoids_card_and_money() {
        let tuning = Tuning::default();
        let mut money = MoneySystem::new(&tuning);
        let card = Card {
            distance: 3.5,
            kind: CardKind::Card1,
            lateral: 0.0,
        };

        // Card at 3.5 blocks up to 5.5 (exclusive)
        let d0 = money.place_revenue_bill(0, 30, Some(&card), &tuning);
        assert_eq!(d0, 5.5);

        // Bill 1 wants 5.0: blocked by the card (1.5) and bill 0 (0.5); 6.0 is still
        // within 1.2 of bill 0, so 7.0 is the first free slot
        let d1 = money.place_revenue_bill(1, 30, Some(&card), &tuning);
        assert_eq!(d1, 7.0);
    }

    #[test]
    fn test_bill_placement_capped() {
        let tuning = Tuning::default();
        let mut money = MoneySystem::new(&tuning);
        money.spawn_line(20, 3.0, 0.5);
        let d = money.place_revenue_bill(0, 30, None, &tuning);
        assert_eq!(d, 10.0);
    }

    #[test]
    fn test_draw_label_only_when_close() {
        let tuning = Tuning::default();
        let vp = Viewport::new(800.0, 600.0);
        let mut money = MoneySystem::new(&tuning);

        // scale 1 / (1 + 2 * 0.5) = 0.5 -> labelled
        money.spawn(0.5, 40, 0.0);
        // scale 1 / (1 + 2 * 3) ~= 0.14 -> no label
        money.spawn(3.0, 60, 0.0);
        // outside the visible window
        money.spawn(8.0, 70, 0.0);

        let mut list = DrawList::new();
        money.draw(&vp, &StaticAssets::none(), &mut list);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts, vec!["💰", "$40", "💰"]);

        list.clear();
        money.draw(&vp, &StaticAssets::all(), &mut list);
        assert_eq!(list.images().count(), 2);
    }

    #[test]
    fn test_draw_skips_far_off_screen() {
        let tuning = Tuning::default();
        let vp = Viewport::new(800.0, 600.0);
        let mut money = MoneySystem::new(&tuning);
        money.spawn(0.5, 40, 50.0);

        let mut list = DrawList::new();
        money.draw(&vp, &StaticAssets::none(), &mut list);
        assert!(list.is_empty());
    }
}
