//! Image asset identities and readiness
//!
//! Loading is asynchronous on the host; draw code polls readiness every frame and falls
//! back to cheaper glyph rendering while an image is pending or failed.

use std::collections::HashSet;

use crate::sim::card::CardKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    /// Type-specific card face
    CardFace(CardKind),
    /// Generic card used when a face is unavailable
    CardGeneric,
    Cash,
    /// Theme character sprite sheet
    Character,
}

impl AssetId {
    /// Page-relative image path; the character sheet comes from the theme
    pub fn path(&self) -> Option<String> {
        match self {
            AssetId::CardFace(kind) => Some(format!("images/cards/{}.png", kind.name())),
            AssetId::CardGeneric => Some("images/card.png".to_string()),
            AssetId::Cash => Some("images/cash.png".to_string()),
            AssetId::Character => None,
        }
    }

    /// Every asset with a fixed path
    pub fn fixed() -> impl Iterator<Item = AssetId> {
        CardKind::ALL
            .into_iter()
            .map(AssetId::CardFace)
            .chain([AssetId::CardGeneric, AssetId::Cash])
    }
}

/// Load state of a single asset handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Poll-able readiness consulted synchronously by draw code
pub trait AssetReadiness {
    fn is_ready(&self, id: AssetId) -> bool;
}

/// Fixed readiness table, used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    ready: HashSet<AssetId>,
    all: bool,
}

impl StaticAssets {
    /// Nothing loaded: every draw takes the glyph fallback
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything loaded
    pub fn all() -> Self {
        Self {
            ready: HashSet::new(),
            all: true,
        }
    }

    pub fn with(mut self, id: AssetId) -> Self {
        self.ready.insert(id);
        self
    }
}

impl AssetReadiness for StaticAssets {
    fn is_ready(&self, id: AssetId) -> bool {
        self.all || self.ready.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            AssetId::CardFace(CardKind::Card3).path().as_deref(),
            Some("images/cards/card3.png")
        );
        assert_eq!(AssetId::Character.path(), None);
        assert_eq!(AssetId::fixed().count(), 6);
    }

    #[test]
    fn test_static_readiness() {
        let assets = StaticAssets::none().with(AssetId::Cash);
        assert!(assets.is_ready(AssetId::Cash));
        assert!(!assets.is_ready(AssetId::CardGeneric));
        assert!(StaticAssets::all().is_ready(AssetId::Character));
    }
}
