//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be re-tuned from JSON without
//! touching the simulation. Distances are road units, speeds are road units per nominal
//! (60 fps) frame, delays are milliseconds of simulation time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Motion ===
    /// How far cards, money and decorations approach per nominal frame
    pub entity_speed: f32,
    /// Road dash scroll per nominal frame (offset wraps at 1.0)
    pub road_speed: f32,

    // === Cards ===
    /// A card at or below this distance has been hit
    pub card_hit_distance: f32,
    /// Spawn distance of the first card of a session
    pub first_card_distance: f32,
    /// Spawn distance of every later card
    pub card_distance: f32,
    /// Minimum gap between a new card and any money pickup
    pub card_money_clearance: f32,
    /// Step used when pushing a spawn back to clear other entities
    pub spawn_step: f32,
    /// Cards are never pushed beyond this distance
    pub card_max_distance: f32,
    /// Delay between closing a decision popup and the next card
    pub card_respawn_delay_ms: f64,

    // === Money ===
    pub money_collect_distance: f32,
    /// Uncollected money behind this distance is lost
    pub money_cull_distance: f32,
    pub money_pool_capacity: usize,
    pub min_revenue_bills: u32,
    pub max_revenue_bills: u32,
    /// Delay between consecutive revenue bills
    pub bill_stagger_ms: f64,
    pub bill_first_distance: f32,
    pub bill_spacing: f32,
    pub bill_max_distance: f32,
    pub bill_card_clearance: f32,
    pub bill_money_clearance: f32,
    /// Lifetime of the "+$value" effect in nominal frames
    pub collection_effect_frames: f32,

    // === Decorations ===
    pub decoration_pool_capacity: usize,
    pub decoration_cull_distance: f32,
    pub decoration_bob_speed: f32,

    // === Month cycle ===
    pub cards_per_month: u32,
    pub target_cash: u64,
    pub max_months: u32,
    /// How long the "money incoming" banner stays up after a month-end
    pub revenue_banner_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            entity_speed: 0.025,
            road_speed: 0.01,

            card_hit_distance: 0.2,
            first_card_distance: 6.0,
            card_distance: 3.5,
            card_money_clearance: 2.0,
            spawn_step: 0.5,
            card_max_distance: 12.0,
            card_respawn_delay_ms: 1000.0,

            money_collect_distance: 0.3,
            money_cull_distance: -2.0,
            money_pool_capacity: 20,
            min_revenue_bills: 3,
            max_revenue_bills: 5,
            bill_stagger_ms: 600.0,
            bill_first_distance: 3.5,
            bill_spacing: 1.5,
            bill_max_distance: 10.0,
            bill_card_clearance: 2.0,
            bill_money_clearance: 1.2,
            collection_effect_frames: 30.0,

            decoration_pool_capacity: 32,
            decoration_cull_distance: -0.5,
            decoration_bob_speed: 0.015,

            cards_per_month: 2,
            target_cash: 1000,
            max_months: 12,
            revenue_banner_ms: 5000.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Clamp values the state machine relies on
    fn sanitize(&mut self) {
        self.cards_per_month = self.cards_per_month.max(1);
        self.min_revenue_bills = self.min_revenue_bills.max(1);
        self.max_revenue_bills = self.max_revenue_bills.max(self.min_revenue_bills);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "cards_per_month": 3, "target_cash": 500 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.cards_per_month, 3);
        assert_eq!(tuning.target_cash, 500);
        assert_eq!(tuning.max_months, 12);
        assert_eq!(tuning.entity_speed, 0.025);
    }

    #[test]
    fn test_sanitize_clamps_counts() {
        let tuning = Tuning::from_json(
            r#"{ "cards_per_month": 0, "min_revenue_bills": 4, "max_revenue_bills": 2 }"#,
        )
        .expect("valid tuning");
        assert_eq!(tuning.cards_per_month, 1);
        assert_eq!(tuning.max_revenue_bills, 4);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json("{ cards_per_month: ").is_err());
    }
}
