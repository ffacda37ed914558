//! Food kinds, their tunables, and weighted kind selection

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Position;

/// An RGB color used by the renderer to paint a food cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The category of a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Regular,
    Special,
    Bonus,
}

impl FoodKind {
    /// Every kind, in cumulative-weight table order
    pub const ALL: [FoodKind; 3] = [FoodKind::Regular, FoodKind::Special, FoodKind::Bonus];

    pub fn name(&self) -> &'static str {
        match self {
            FoodKind::Regular => "regular",
            FoodKind::Special => "special",
            FoodKind::Bonus => "bonus",
        }
    }
}

/// Tunables attached to one food kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    /// Display color
    pub color: Rgb,
    /// Points awarded when eaten
    pub points: u32,
    /// Relative spawn weight; selection probability is weight / total weight
    pub weight: u32,
    /// Milliseconds after spawning at which an uneaten item is replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_ms: Option<u64>,
}

/// Per-kind configuration for all food kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTable {
    pub regular: FoodSpec,
    pub special: FoodSpec,
    pub bonus: FoodSpec,
}

impl Default for FoodTable {
    fn default() -> Self {
        Self {
            regular: FoodSpec {
                color: Rgb(255, 0, 0),
                points: 10,
                weight: 70,
                expiry_ms: None,
            },
            special: FoodSpec {
                color: Rgb(255, 215, 0),
                points: 25,
                weight: 20,
                expiry_ms: None,
            },
            bonus: FoodSpec {
                color: Rgb(128, 0, 128),
                points: 50,
                weight: 10,
                expiry_ms: Some(5000),
            },
        }
    }
}

impl FoodTable {
    pub fn spec(&self, kind: FoodKind) -> &FoodSpec {
        match kind {
            FoodKind::Regular => &self.regular,
            FoodKind::Special => &self.special,
            FoodKind::Bonus => &self.bonus,
        }
    }

    pub fn total_weight(&self) -> u32 {
        FoodKind::ALL.iter().map(|&kind| self.spec(kind).weight).sum()
    }

    /// Map a draw in `0..total_weight()` onto a kind via cumulative weights.
    ///
    /// Draws at or past the total fall back to the last kind with a non-zero
    /// weight, so callers never get a kind that cannot spawn.
    pub fn kind_for_draw(&self, draw: u32) -> FoodKind {
        let mut cumulative = 0;
        let mut last_spawnable = FoodKind::Regular;

        for kind in FoodKind::ALL {
            let weight = self.spec(kind).weight;
            if weight == 0 {
                continue;
            }
            cumulative += weight;
            last_spawnable = kind;
            if draw < cumulative {
                return kind;
            }
        }

        last_spawnable
    }

    /// Weighted random kind selection with a single uniform draw
    pub fn choose_kind<R: Rng>(&self, rng: &mut R) -> FoodKind {
        let total = self.total_weight();
        if total == 0 {
            return FoodKind::Regular;
        }
        self.kind_for_draw(rng.gen_range(0..total))
    }
}

/// The single active food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    /// Driver clock reading (ms) at spawn time
    pub spawned_at_ms: u64,
}

impl Food {
    pub fn new(position: Position, kind: FoodKind, spawned_at_ms: u64) -> Self {
        Self {
            position,
            kind,
            spawned_at_ms,
        }
    }

    /// True once strictly more than the kind's lifetime has passed.
    pub fn is_expired(&self, table: &FoodTable, now_ms: u64) -> bool {
        match table.spec(self.kind).expiry_ms {
            Some(expiry) => now_ms.saturating_sub(self.spawned_at_ms) > expiry,
            None => false,
        }
    }
}
