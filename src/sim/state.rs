//! Game state and core simulation types
//!
//! The authoritative, serializable part of a session. Entity subsystems, timers and the
//! RNG live on [`super::Session`].

use serde::{Deserialize, Serialize};

use super::card::CardKind;
use super::decision::{DecisionEffect, DecisionId};
use crate::theme::Theme;
use crate::tuning::Tuning;

/// Revenue shown before a theme has been picked
pub const MENU_REVENUE: u64 = 100;

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Cash reached the target
    Victory,
    /// Ran out of months
    TimeUp,
}

/// Current phase of gameplay. Pause is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Picking a business
    Menu,
    /// Driving; entities advance
    Running,
    /// A decision popup is open; drawing continues, updates do not
    InPopup(DecisionId),
    /// Run over until restart or return to menu
    Ended(Outcome),
}

/// Notifications for presentation and audio, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { theme: String },
    CardHit { kind: CardKind },
    DecisionOffered(DecisionId),
    DecisionApplied { effect: DecisionEffect },
    MoneyCollected { value: u64, cash: u64 },
    /// `month` is the month that just began
    MonthEnded { month: u32, payout: u64 },
    GameEnded(Outcome),
    PauseChanged(bool),
    ReturnedToMenu,
}

/// Complete game state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Selected business, fixed for the session
    pub theme: Option<Theme>,
    pub cash: u64,
    pub revenue_per_month: u64,
    /// 1-based month index
    pub month: u32,
    pub phase: GamePhase,
    pub paused: bool,
    /// Road dash scroll in [0, 1)
    pub road_offset: f32,
    pub cards_this_month: u32,
    pub cards_per_month: u32,
    pub target_cash: u64,
    pub max_months: u32,
}

impl GameState {
    /// Fresh menu state
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            theme: None,
            cash: 0,
            revenue_per_month: MENU_REVENUE,
            month: 1,
            phase: GamePhase::Menu,
            paused: false,
            road_offset: 0.0,
            cards_this_month: 0,
            cards_per_month: tuning.cards_per_month,
            target_cash: tuning.target_cash,
            max_months: tuning.max_months,
        }
    }

    /// Fresh running state for a theme
    pub fn for_theme(theme: Theme, tuning: &Tuning) -> Self {
        Self {
            revenue_per_month: theme.revenue,
            theme: Some(theme),
            phase: GamePhase::Running,
            ..Self::new(tuning)
        }
    }

    /// Entities advance this frame
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running && !self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Open decision, if any
    pub fn pending_decision(&self) -> Option<DecisionId> {
        match self.phase {
            GamePhase::InPopup(id) => Some(id),
            _ => None,
        }
    }

    /// Scroll the road dashes
    pub fn advance_road(&mut self, speed: f32, delta: f32) {
        self.road_offset = (self.road_offset + speed * delta).rem_euclid(1.0);
    }

    /// Progress toward the cash target, in whole percent
    pub fn progress_percent(&self) -> u32 {
        if self.target_cash == 0 {
            return 100;
        }
        ((self.cash as f64 / self.target_cash as f64) * 100.0).round() as u32
    }

    /// Months left including the current one
    pub fn months_left(&self) -> u32 {
        (self.max_months + 1).saturating_sub(self.month)
    }

    pub fn theme_name(&self) -> &str {
        self.theme.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeCatalog;

    #[test]
    fn test_menu_state() {
        let state = GameState::new(&Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(!state.is_running());
        assert_eq!(state.month, 1);
        assert_eq!(state.cards_per_month, 2);
        assert_eq!(state.target_cash, 1000);
    }

    #[test]
    fn test_theme_sets_revenue() {
        let catalog = ThemeCatalog::builtin().expect("themes");
        let theme = catalog.get("restaurant").cloned().expect("restaurant");
        let state = GameState::for_theme(theme, &Tuning::default());
        assert_eq!(state.revenue_per_month, 120);
        assert!(state.is_running());
        assert_eq!(state.theme_name(), "Restaurant Chain");
    }

    #[test]
    fn test_pause_blocks_running() {
        let mut state = GameState::new(&Tuning::default());
        state.phase = GamePhase::Running;
        state.paused = true;
        assert!(!state.is_running());
        assert!(state.is_paused());
    }

    #[test]
    fn test_road_offset_wraps() {
        let mut state = GameState::new(&Tuning::default());
        state.road_offset = 0.995;
        state.advance_road(0.01, 1.0);
        assert!(state.road_offset >= 0.0 && state.road_offset < 1.0);
        assert!((state.road_offset - 0.005).abs() < 1e-4);
    }

    #[test]
    fn test_progress_and_months_left() {
        let mut state = GameState::new(&Tuning::default());
        state.cash = 150;
        assert_eq!(state.progress_percent(), 15);
        assert_eq!(state.months_left(), 12);
        state.month = 13;
        assert_eq!(state.months_left(), 0);
    }
}
