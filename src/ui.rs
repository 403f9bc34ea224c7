//! HUD and modal content
//!
//! Pure formatting from the session; the host writes the strings into the DOM.

use crate::sim::{DecisionId, GameState, Outcome, Session};
use crate::theme::Theme;

/// Status line colours
pub mod status_colors {
    pub const GOAL: &str = "#4CAF50";
    pub const ONE_MORE: &str = "#FF9800";
    pub const COMPLETE: &str = "#2196F3";
    pub const BANNER: &str = "#4CAF50";
}

pub const BANNER_TEXT: &str = "💰 Money incoming! Collect the cash bills!";

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub business: String,
    pub cash: String,
    pub month: String,
    pub revenue: String,
    pub card_progress: String,
    pub status: String,
    pub status_color: &'static str,
    /// The status line is the revenue banner
    pub banner: bool,
    pub fps: Option<String>,
}

impl HudSnapshot {
    pub fn from_session(session: &Session, fps: Option<u32>) -> Self {
        let state = session.state();
        let (status, status_color) = if session.banner_active() {
            (BANNER_TEXT.to_string(), status_colors::BANNER)
        } else {
            status_line(state)
        };

        Self {
            business: state.theme_name().to_string(),
            cash: state.cash.to_string(),
            month: state.month.to_string(),
            revenue: state.revenue_per_month.to_string(),
            card_progress: format!(
                "Card {} of {}",
                state.cards_this_month, state.cards_per_month
            ),
            status,
            status_color,
            banner: session.banner_active(),
            fps: fps.map(|f| f.to_string()),
        }
    }
}

/// Goal progress, or how far through the month the player is
pub fn status_line(state: &GameState) -> (String, &'static str) {
    match state.cards_this_month {
        0 => (
            format!(
                "Goal: ${} ({}%) | {} months left",
                state.target_cash,
                state.progress_percent(),
                state.months_left()
            ),
            status_colors::GOAL,
        ),
        1 => (
            "One more card to complete month!".to_string(),
            status_colors::ONE_MORE,
        ),
        _ => (
            "Month complete! Collecting revenue...".to_string(),
            status_colors::COMPLETE,
        ),
    }
}

/// What a modal button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Pick decision option N
    Choose(usize),
    Restart,
    ChooseBusiness,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalButton {
    pub label: String,
    pub color: &'static str,
    pub action: ModalAction,
}

/// Popup content: a heading, body lines and buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSpec {
    pub title: String,
    pub title_color: Option<&'static str>,
    pub lines: Vec<String>,
    pub buttons: Vec<ModalButton>,
}

impl ModalSpec {
    /// The modal the current phase calls for, if any
    pub fn for_state(state: &GameState) -> Option<Self> {
        if let Some(id) = state.pending_decision() {
            return Some(Self::decision(id));
        }
        state.outcome().map(|outcome| Self::outcome(outcome, state))
    }

    pub fn decision(id: DecisionId) -> Self {
        let decision = id.get();
        Self {
            title: decision.title.to_string(),
            title_color: None,
            lines: vec![decision.description.to_string()],
            buttons: vec![
                ModalButton {
                    label: decision.options[0].label.to_string(),
                    color: "#4CAF50",
                    action: ModalAction::Choose(0),
                },
                ModalButton {
                    label: decision.options[1].label.to_string(),
                    color: "#2196F3",
                    action: ModalAction::Choose(1),
                },
            ],
        }
    }

    pub fn outcome(outcome: Outcome, state: &GameState) -> Self {
        match outcome {
            Outcome::Victory => Self {
                title: "🎉 VICTORY! 🎉".to_string(),
                title_color: Some("#4CAF50"),
                lines: vec![
                    "Congratulations! You've built a successful business!".to_string(),
                    format!("Final Cash: ${}", state.cash),
                    format!("Months Played: {}", state.month.saturating_sub(1)),
                    format!("Business: {}", state.theme_name()),
                ],
                buttons: end_buttons("🎮 Play Again", "#4CAF50"),
            },
            Outcome::TimeUp => Self {
                title: "💼 TIME'S UP! 💼".to_string(),
                title_color: Some("#e74c3c"),
                lines: vec![
                    "You ran out of time to reach your goal!".to_string(),
                    format!("Final Cash: ${}", state.cash),
                    format!("Target: ${}", state.target_cash),
                    format!("Months Played: {}", state.max_months),
                    "Try a different strategy next time!".to_string(),
                ],
                buttons: end_buttons("🎮 Try Again", "#e74c3c"),
            },
        }
    }
}

fn end_buttons(restart_label: &str, restart_color: &'static str) -> Vec<ModalButton> {
    vec![
        ModalButton {
            label: restart_label.to_string(),
            color: restart_color,
            action: ModalAction::Restart,
        },
        ModalButton {
            label: "🏢 Choose Business".to_string(),
            color: "#2196F3",
            action: ModalAction::ChooseBusiness,
        },
    ]
}

/// Markup for one entry of the business picker; `data-theme` carries the theme id
pub fn business_card_html(theme: &Theme) -> String {
    format!(
        r#"<div class="business-card" data-theme="{}">
    <div class="business-icon">{}</div>
    <div class="business-name">{}</div>
    <div class="business-desc">{}</div>
    <div class="business-revenue">${}/month</div>
</div>"#,
        theme.id, theme.icon, theme.name, theme.description, theme.revenue
    )
}

/// Body lines as paragraphs
pub fn lines_html(lines: &[String]) -> String {
    lines.iter().map(|line| format!("<p>{}</p>", line)).collect()
}
