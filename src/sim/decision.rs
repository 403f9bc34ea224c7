//! Business decisions offered when a card is hit

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Numeric effect of picking an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionEffect {
    /// Added to revenue per month
    Revenue(u64),
    /// Added to cash immediately
    Cash(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOption {
    pub label: &'static str,
    pub effect: DecisionEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub title: &'static str,
    pub description: &'static str,
    pub options: [DecisionOption; 2],
}

pub const DECISIONS: [Decision; 3] = [
    Decision {
        title: "💼 Expand Operations?",
        description: "You can expand your business operations.",
        options: [
            DecisionOption {
                label: "📈 Expand (+$20 revenue)",
                effect: DecisionEffect::Revenue(20),
            },
            DecisionOption {
                label: "💰 Save Cash (+$50 cash)",
                effect: DecisionEffect::Cash(50),
            },
        ],
    },
    Decision {
        title: "🤝 Partnership Offer",
        description: "A partner wants to join your business.",
        options: [
            DecisionOption {
                label: "✅ Accept (+$30 revenue)",
                effect: DecisionEffect::Revenue(30),
            },
            DecisionOption {
                label: "❌ Decline (+$100 cash)",
                effect: DecisionEffect::Cash(100),
            },
        ],
    },
    Decision {
        title: "💡 New Technology",
        description: "Invest in new technology for your business?",
        options: [
            DecisionOption {
                label: "🚀 Invest (+$25 revenue)",
                effect: DecisionEffect::Revenue(25),
            },
            DecisionOption {
                label: "💵 Keep Cash (+$75 cash)",
                effect: DecisionEffect::Cash(75),
            },
        ],
    },
];

/// Index into [`DECISIONS`], stored in the serializable game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionId(pub usize);

impl DecisionId {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..DECISIONS.len()))
    }

    /// Out-of-range ids (e.g. from a hand-edited snapshot) wrap into the catalog
    pub fn get(&self) -> &'static Decision {
        &DECISIONS[self.0 % DECISIONS.len()]
    }

    /// Effect of option `choice`; anything past the first option picks the second
    pub fn effect(&self, choice: usize) -> DecisionEffect {
        self.get().options[choice.min(1)].effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_every_decision_pairs_revenue_with_cash() {
        for d in &DECISIONS {
            assert!(matches!(d.options[0].effect, DecisionEffect::Revenue(_)));
            assert!(matches!(d.options[1].effect, DecisionEffect::Cash(_)));
        }
    }

    #[test]
    fn test_random_ids_in_range() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..100 {
            assert!(DecisionId::random(&mut rng).0 < DECISIONS.len());
        }
        assert_eq!(DecisionId(4).get().title, DECISIONS[1].title);
        assert_eq!(DecisionId(1).effect(7), DecisionEffect::Cash(100));
    }
}
