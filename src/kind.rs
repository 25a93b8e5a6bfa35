//! Creature kinds and the family they belong to.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad grouping deciding whether a kind can be hurt and whether it hunts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Hostile creatures with health that chase the player.
    Monster,
    /// Ambient wildlife; undamageable, flees when hit.
    Animal,
}

/// Every simulated creature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureKind {
    /// Monster that wanders with frequent turns.
    Goblin,
    /// Monster that walks and rests; the only kind that strikes.
    Skeleton,
    /// Monster that moves by hopping.
    Slime,
    /// Animal that runs in short bursts between nibbles.
    Rabbit,
    /// Animal that darts and freezes.
    Squirrel,
    /// Animal that walks and pecks, with occasional swoops.
    Bird,
    /// Animal that grazes for long spells.
    Deer,
    /// Animal that dashes between rests.
    Fox,
}

impl CreatureKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Goblin,
        Self::Skeleton,
        Self::Slime,
        Self::Rabbit,
        Self::Squirrel,
        Self::Bird,
        Self::Deer,
        Self::Fox,
    ];

    /// Monster kinds only.
    pub const MONSTERS: [Self; 3] = [Self::Goblin, Self::Skeleton, Self::Slime];

    /// Animal kinds only.
    pub const ANIMALS: [Self; 5] = [
        Self::Rabbit,
        Self::Squirrel,
        Self::Bird,
        Self::Deer,
        Self::Fox,
    ];

    /// Monster or animal.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Goblin | Self::Skeleton | Self::Slime => Family::Monster,
            Self::Rabbit | Self::Squirrel | Self::Bird | Self::Deer | Self::Fox => Family::Animal,
        }
    }

    /// `true` for monsters.
    #[must_use]
    pub const fn is_monster(self) -> bool {
        matches!(self.family(), Family::Monster)
    }

    /// Lowercase display name used in logs and entity names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Goblin => "goblin",
            Self::Skeleton => "skeleton",
            Self::Slime => "slime",
            Self::Rabbit => "rabbit",
            Self::Squirrel => "squirrel",
            Self::Bird => "bird",
            Self::Deer => "deer",
            Self::Fox => "fox",
        }
    }
}

impl fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
