//! Simulation context
//!
//! One `Session` owns everything a run needs: the authoritative state, the entity
//! subsystems, the timer queue, the RNG and the event outbox. The host creates it once
//! and drives it through [`super::tick`] plus the input operations below.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::card::{CardKind, CardSystem};
use super::decision::{DecisionEffect, DecisionId};
use super::decoration::DecorationSystem;
use super::money::MoneySystem;
use super::player::Player;
use super::projection::Viewport;
use super::state::{GameEvent, GamePhase, GameState, Outcome};
use super::timer::{ScheduledEvent, TimerQueue};
use crate::settings::Settings;
use crate::theme::Theme;
use crate::tuning::Tuning;

pub struct Session {
    pub(super) state: GameState,
    pub(super) cards: CardSystem,
    pub(super) money: MoneySystem,
    pub(super) decorations: DecorationSystem,
    pub(super) player: Player,
    pub(super) timers: TimerQueue,
    pub(super) rng: Pcg32,
    pub(super) tuning: Tuning,
    /// Bumped on start, restart and return to menu; stale timers are dropped
    pub(super) generation: u64,
    /// Simulation time; only advances while ticking
    pub(super) clock_ms: f64,
    /// Sim time until which the "money incoming" banner shows
    pub(super) banner_until_ms: Option<f64>,
    pub(super) viewport: Viewport,
    pub(super) events: Vec<GameEvent>,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings) -> Self {
        let mut decorations = DecorationSystem::new(
            settings.quality.max_decorations(),
            settings.quality.decoration_spawn_rate(),
            &tuning,
        );
        decorations.set_bobbing(!settings.reduced_motion);

        Self {
            state: GameState::new(&tuning),
            cards: CardSystem::new(),
            money: MoneySystem::new(&tuning),
            decorations,
            player: Player::new(),
            timers: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            generation: 0,
            clock_ms: 0.0,
            banner_until_ms: None,
            viewport: Viewport::default(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cards(&self) -> &CardSystem {
        &self.cards
    }

    pub fn money(&self) -> &MoneySystem {
        &self.money
    }

    pub fn decorations(&self) -> &DecorationSystem {
        &self.decorations
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Apply a new quality budget or motion preference mid-run
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.decorations.set_budget(
            settings.quality.max_decorations(),
            settings.quality.decoration_spawn_rate(),
        );
        self.decorations.set_bobbing(!settings.reduced_motion);
    }

    /// The "money incoming" banner is up
    pub fn banner_active(&self) -> bool {
        self.banner_until_ms.is_some_and(|until| self.clock_ms < until)
    }

    /// Begin a fresh run with `theme`
    pub fn start(&mut self, theme: Theme) {
        self.generation += 1;
        self.reset_world();

        log::info!(
            "Starting {} (revenue ${}/month, generation {})",
            theme.name,
            theme.revenue,
            self.generation
        );
        let glyphs = theme.decorations.clone();
        self.events.push(GameEvent::SessionStarted {
            theme: theme.id.clone(),
        });
        self.state = GameState::for_theme(theme, &self.tuning);

        self.decorations.populate(&glyphs, &mut self.rng);
        self.cards
            .spawn(None, self.money.active(), &self.tuning, &mut self.rng);
    }

    /// Same theme, fresh run. No-op before a theme was chosen.
    pub fn restart(&mut self) {
        let Some(theme) = self.state.theme.clone() else {
            log::warn!("Restart requested with no business selected");
            return;
        };
        self.start(theme);
    }

    pub fn return_to_menu(&mut self) {
        self.generation += 1;
        self.reset_world();
        self.state = GameState::new(&self.tuning);
        self.events.push(GameEvent::ReturnedToMenu);
        log::info!("Returned to business selection");
    }

    fn reset_world(&mut self) {
        self.cards.reset();
        self.money.reset();
        self.decorations.reset();
        self.player.reset();
        self.banner_until_ms = None;
    }

    /// Resolve the open decision. Returns the applied effect, or `None` without a popup.
    pub fn choose(&mut self, option: usize) -> Option<DecisionEffect> {
        let id = self.state.pending_decision()?;
        let effect = id.effect(option);
        match effect {
            DecisionEffect::Revenue(amount) => {
                self.state.revenue_per_month = self.state.revenue_per_month.saturating_add(amount)
            }
            DecisionEffect::Cash(amount) => {
                self.state.cash = self.state.cash.saturating_add(amount)
            }
        }
        self.state.phase = GamePhase::Running;
        self.timers.schedule(
            self.clock_ms,
            self.tuning.card_respawn_delay_ms,
            self.generation,
            ScheduledEvent::SpawnCard,
        );
        self.events.push(GameEvent::DecisionApplied { effect });
        log::info!("Chose '{}'", id.get().options[option.min(1)].label);
        Some(effect)
    }

    /// Pointer press at a screen position. Tapping the live card hits it.
    pub fn on_tap(&mut self, x: f32, y: f32, viewport: &Viewport) -> bool {
        if !self.state.is_running() {
            return false;
        }
        if !self.cards.hit_test(glam::Vec2::new(x, y), viewport) {
            return false;
        }
        match self.cards.take() {
            Some(card) => {
                self.handle_card_hit(card.kind);
                true
            }
            None => false,
        }
    }

    pub fn on_pause_toggle(&mut self) {
        let paused = !self.state.paused;
        self.set_paused(paused);
    }

    /// Pause or resume. Ignored in the menu and once the run has ended.
    pub fn set_paused(&mut self, paused: bool) {
        if !matches!(self.state.phase, GamePhase::Running | GamePhase::InPopup(_)) {
            return;
        }
        if self.state.paused != paused {
            self.state.paused = paused;
            self.events.push(GameEvent::PauseChanged(paused));
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
    }

    /// Take everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Debug: one bill a short way ahead
    pub fn spawn_test_money(&mut self) {
        if self.state.phase != GamePhase::Menu {
            self.money.spawn_test_money();
        }
    }

    /// Debug: a row of bills
    pub fn spawn_money_line(&mut self, count: u32) {
        if self.state.phase != GamePhase::Menu {
            self.money.spawn_line(count, 3.0, 1.2);
        }
    }

    pub(super) fn handle_card_hit(&mut self, kind: CardKind) {
        self.state.cards_this_month += 1;
        let decision = DecisionId::random(&mut self.rng);
        self.state.phase = GamePhase::InPopup(decision);
        self.events.push(GameEvent::CardHit { kind });
        self.events.push(GameEvent::DecisionOffered(decision));
        log::info!(
            "Card hit! Cards this month: {}/{}",
            self.state.cards_this_month,
            self.state.cards_per_month
        );

        if self.state.cards_this_month >= self.state.cards_per_month {
            self.end_month();
        }
    }

    fn end_month(&mut self) {
        let payout = self.state.revenue_per_month;
        self.state.cash = self.state.cash.saturating_add(payout);
        self.state.month += 1;
        self.state.cards_this_month = 0;
        self.events.push(GameEvent::MonthEnded {
            month: self.state.month,
            payout,
        });
        log::info!(
            "Month {} ended! Collected ${}. Total cash: ${}",
            self.state.month - 1,
            payout,
            self.state.cash
        );

        let outcome = if self.state.cash >= self.state.target_cash {
            Some(Outcome::Victory)
        } else if self.state.month > self.state.max_months {
            Some(Outcome::TimeUp)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            // Terminal month: the pending decision is discarded and no wave is paid out
            self.state.phase = GamePhase::Ended(outcome);
            self.events.push(GameEvent::GameEnded(outcome));
            log::info!("Game over: {:?} with ${}", outcome, self.state.cash);
            return;
        }

        self.money.spawn_monthly_revenue(
            payout,
            &mut self.timers,
            self.clock_ms,
            self.generation,
            &self.tuning,
            &mut self.rng,
        );
        self.banner_until_ms = Some(self.clock_ms + self.tuning.revenue_banner_ms);
    }

    pub(super) fn fire(&mut self, event: ScheduledEvent) {
        match event {
            ScheduledEvent::SpawnCard => {
                if !self.cards.has_card() {
                    self.cards
                        .spawn(None, self.money.active(), &self.tuning, &mut self.rng);
                }
            }
            ScheduledEvent::RevenueBill { index, value } => {
                self.money
                    .place_revenue_bill(index, value, self.cards.live(), &self.tuning);
            }
        }
    }
}
