//! Decision cards
//!
//! A single card slot: a card approaches the player, and when it reaches the hit plane it
//! is cleared and reported as a hit. Respawning is driven by the session after the
//! decision popup closes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::money::MoneyPickup;
use super::projection::Viewport;
use super::state::GameState;
use crate::renderer::{AssetId, AssetReadiness, Baseline, DrawCmd, DrawList, Rect, TextStyle};
use crate::tuning::Tuning;

/// Card width in pixels at scale 1.0
pub const CARD_BASE_SIZE: f32 = 300.0;
/// Card height relative to its width
pub const CARD_ASPECT: f32 = 1.4;
/// Cards smaller than this are not drawn
pub const MIN_CARD_PIXELS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Card1,
    Card2,
    Card3,
    Card4,
}

impl CardKind {
    pub const ALL: [CardKind; 4] = [
        CardKind::Card1,
        CardKind::Card2,
        CardKind::Card3,
        CardKind::Card4,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CardKind::Card1 => "card1",
            CardKind::Card2 => "card2",
            CardKind::Card3 => "card3",
            CardKind::Card4 => "card4",
        }
    }

    /// Uniform pick from the configured set
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// The live card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub distance: f32,
    pub kind: CardKind,
    pub lateral: f32,
}

impl Card {
    /// On-screen rectangle, or `None` once the card is behind the hit plane
    pub fn bounds(&self, viewport: &Viewport) -> Option<Rect> {
        if self.distance <= 0.0 {
            return None;
        }
        let p = viewport.project(self.lateral, self.distance);
        let size = (CARD_BASE_SIZE * p.scale).floor();
        Some(Rect::new(p.x - size / 2.0, p.y - size, size, size * CARD_ASPECT))
    }
}

/// A card reached the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHit {
    pub kind: CardKind,
}

#[derive(Debug, Clone)]
pub struct CardSystem {
    live: Option<Card>,
    /// The next spawn is the first of the session
    first_spawn: bool,
}

impl Default for CardSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSystem {
    pub fn new() -> Self {
        Self {
            live: None,
            first_spawn: true,
        }
    }

    pub fn live(&self) -> Option<&Card> {
        self.live.as_ref()
    }

    pub fn has_card(&self) -> bool {
        self.live.is_some()
    }

    /// Spawn a card ahead of the player, pushed back until it clears nearby money
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: Option<CardKind>,
        money: &[MoneyPickup],
        tuning: &Tuning,
        rng: &mut R,
    ) -> Card {
        let mut distance = if self.first_spawn {
            tuning.first_card_distance
        } else {
            tuning.card_distance
        };
        self.first_spawn = false;

        while distance < tuning.card_max_distance
            && money
                .iter()
                .any(|m| (m.distance - distance).abs() < tuning.card_money_clearance)
        {
            distance += tuning.spawn_step;
        }

        let kind = kind.unwrap_or_else(|| CardKind::random(rng));
        let card = Card {
            distance,
            kind,
            lateral: 0.0,
        };
        self.live = Some(card);
        log::debug!("Card {} spawned at distance {}", kind.name(), distance);
        card
    }

    /// Place a card at an exact distance (no clearance check)
    pub fn spawn_at<R: Rng + ?Sized>(
        &mut self,
        distance: f32,
        kind: Option<CardKind>,
        rng: &mut R,
    ) -> Card {
        let card = Card {
            distance,
            kind: kind.unwrap_or_else(|| CardKind::random(rng)),
            lateral: 0.0,
        };
        self.first_spawn = false;
        self.live = Some(card);
        card
    }

    /// Advance the live card; returns the hit when it crosses the hit plane
    pub fn update(&mut self, state: &GameState, delta: f32, tuning: &Tuning) -> Option<CardHit> {
        if !state.is_running() {
            return None;
        }
        let card = self.live.as_mut()?;
        card.distance -= tuning.entity_speed * delta;

        if card.distance <= tuning.card_hit_distance {
            let hit = CardHit { kind: card.kind };
            self.live = None;
            return Some(hit);
        }
        None
    }

    /// Does the screen point fall on the live card?
    pub fn hit_test(&self, point: Vec2, viewport: &Viewport) -> bool {
        self.live
            .and_then(|c| c.bounds(viewport))
            .is_some_and(|r| r.contains(point))
    }

    /// Remove the live card (tap collision)
    pub fn take(&mut self) -> Option<Card> {
        self.live.take()
    }

    pub fn draw(&self, viewport: &Viewport, assets: &dyn AssetReadiness, list: &mut DrawList) {
        let Some(card) = self.live else { return };
        let Some(dest) = card.bounds(viewport) else {
            return;
        };
        if dest.w <= MIN_CARD_PIXELS {
            return;
        }

        let face = AssetId::CardFace(card.kind);
        if assets.is_ready(face) {
            list.push(DrawCmd::Image { asset: face, dest });
        } else if assets.is_ready(AssetId::CardGeneric) {
            list.push(DrawCmd::Image {
                asset: AssetId::CardGeneric,
                dest,
            });
        } else {
            let anchor = Vec2::new(dest.x + dest.w / 2.0, dest.y + dest.w);
            list.text("🃏", anchor, TextStyle::glyph(dest.w, Baseline::Bottom));
        }
    }

    /// Clear the card and the first-spawn flag
    pub fn reset(&mut self) {
        self.live = None;
        self.first_spawn = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::StaticAssets;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> GameState {
        let mut state = GameState::new(&Tuning::default());
        state.phase = super::super::state::GamePhase::Running;
        state
    }

    fn money_at(distance: f32) -> MoneyPickup {
        MoneyPickup {
            distance,
            value: 10,
            lateral: 0.0,
            collected: false,
        }
    }

    #[test]
    fn test_first_spawn_is_farther() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut cards = CardSystem::new();

        let first = cards.spawn(Some(CardKind::Card1), &[], &tuning, &mut rng);
        assert_eq!(first.distance, 6.0);
        let second = cards.spawn(None, &[], &tuning, &mut rng);
        assert_eq!(second.distance, 3.5);

        cards.reset();
        assert!(!cards.has_card());
        let again = cards.spawn(None, &[], &tuning, &mut rng);
        assert_eq!(again.distance, 6.0);
    }

    #[test]
    fn test_spawn_clears_nearby_money() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut cards = CardSystem::new();
        cards.spawn(None, &[], &tuning, &mut rng);

        // Money at 4.0 blocks 3.5..5.5 (exclusive), so the card lands at 6.0
        let card = cards.spawn(None, &[money_at(4.0)], &tuning, &mut rng);
        assert_eq!(card.distance, 6.0);
    }

    #[test]
    fn test_spawn_distance_capped() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cards = CardSystem::new();
        cards.spawn(None, &[], &tuning, &mut rng);

        let wall: Vec<MoneyPickup> = (0..30).map(|i| money_at(i as f32 * 0.5)).collect();
        let card = cards.spawn(None, &wall, &tuning, &mut rng);
        assert_eq!(card.distance, 12.0);
    }

    #[test]
    fn test_hit_fires_once_and_clears() {
        let tuning = Tuning::default();
        let state = running_state();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut cards = CardSystem::new();
        cards.spawn(Some(CardKind::Card1), &[], &tuning, &mut rng);

        let mut hits = Vec::new();
        for _ in 0..400 {
            if let Some(hit) = cards.update(&state, 1.0, &tuning) {
                hits.push(hit);
            }
        }
        assert_eq!(hits, vec![CardHit { kind: CardKind::Card1 }]);
        assert!(!cards.has_card());
    }

    #[test]
    fn test_update_ignored_when_not_running() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut cards = CardSystem::new();
        cards.spawn_at(1.0, Some(CardKind::Card2), &mut rng);
        assert!(cards.update(&state, 100.0, &tuning).is_none());
        assert_eq!(cards.live().map(|c| c.distance), Some(1.0));
    }

    #[test]
    fn test_hit_test_uses_projected_bounds() {
        let mut rng = Pcg32::seed_from_u64(6);
        let vp = Viewport::new(800.0, 600.0);
        let mut cards = CardSystem::new();
        cards.spawn_at(1.0, Some(CardKind::Card3), &mut rng);

        let p = vp.project(0.0, 1.0);
        assert!(cards.hit_test(Vec2::new(p.x, p.y - 10.0), &vp));
        assert!(!cards.hit_test(Vec2::new(5.0, 5.0), &vp));
    }

    #[test]
    fn test_draw_fallback_chain() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut cards = CardSystem::new();
        cards.spawn_at(1.0, Some(CardKind::Card2), &mut rng);

        let mut list = DrawList::new();
        cards.draw(&vp, &StaticAssets::all(), &mut list);
        assert_eq!(
            list.images().collect::<Vec<_>>(),
            vec![AssetId::CardFace(CardKind::Card2)]
        );

        list.clear();
        cards.draw(&vp, &StaticAssets::none().with(AssetId::CardGeneric), &mut list);
        assert_eq!(list.images().collect::<Vec<_>>(), vec![AssetId::CardGeneric]);

        list.clear();
        cards.draw(&vp, &StaticAssets::none(), &mut list);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["🃏"]);
    }

    #[test]
    fn test_tiny_card_not_drawn() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut cards = CardSystem::new();
        // 300 / (1 + 2 * 20) ~= 7px
        cards.spawn_at(20.0, None, &mut rng);
        let mut list = DrawList::new();
        cards.draw(&vp, &StaticAssets::all(), &mut list);
        assert!(list.is_empty());
    }
}
