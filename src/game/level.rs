//! Level Definitions
//!
//! Data-driven per-level configuration: spawn rosters and combat tuning
//! live in level records, not in per-level branches. The shipped campaign
//! has two levels; the format supports any count, and a set can be loaded
//! from JSON for tuning without a rebuild.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{from_int, to_fixed, Fixed};
use crate::game::state::EnemyKind;

/// One hostile spawn entry.
///
/// `y` is not stored: every hostile spawns feet-on-ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDef {
    /// Archetype to spawn
    pub kind: EnemyKind,
    /// Spawn x (left edge)
    pub x: Fixed,
    /// Hitbox width
    pub width: Fixed,
    /// Hitbox height
    pub height: Fixed,
    /// Chase speed, units/tick
    pub speed: Fixed,
    /// Starting health
    pub health: Fixed,
}

/// Rescuable-captive spawn entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDef {
    /// Spawn x (left edge)
    pub x: Fixed,
    /// Hitbox width
    pub width: Fixed,
    /// Hitbox height
    pub height: Fixed,
}

/// Per-level configuration record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Level id, 1-based and contiguous across the set
    pub id: u32,
    /// Display name for the HUD label
    pub name: String,
    /// Asset key the render sink resolves to the backdrop image
    pub background: String,
    /// Damage per tick per overlapping hostile
    pub contact_damage: Fixed,
    /// Collision buffer for the melee test. Larger = must be closer.
    pub attack_reach: Fixed,
    /// Damage per melee hit
    pub attack_damage: Fixed,
    /// Energy deducted per hostile hit
    pub attack_energy_cost: Fixed,
    /// Hostiles this level starts with, in spawn order
    pub spawns: Vec<SpawnDef>,
    /// The captive, on levels that have one
    pub npc: Option<NpcDef>,
}

/// Validation failures for a level set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The set has no levels at all.
    #[error("level set is empty")]
    Empty,

    /// Ids must run 1..=n in list order.
    #[error("level ids must run 1..=n in order (position {index} has id {found})")]
    OutOfOrderId {
        /// Zero-based position in the list
        index: usize,
        /// The id found there
        found: u32,
    },

    /// A hostile would spawn dead.
    #[error("level {level}: spawn {slot} must have positive health")]
    NonPositiveHealth {
        /// Level id
        level: u32,
        /// Spawn slot within the level
        slot: usize,
    },

    /// A hostile with a degenerate hitbox.
    #[error("level {level}: spawn {slot} must have positive width and height")]
    NonPositiveSize {
        /// Level id
        level: u32,
        /// Spawn slot within the level
        slot: usize,
    },

    /// A captive with a degenerate hitbox.
    #[error("level {level}: captive must have positive width and height")]
    NonPositiveNpcSize {
        /// Level id
        level: u32,
    },

    /// The JSON form did not parse.
    #[error("level JSON did not parse: {0}")]
    Parse(String),
}

/// Ordered, validated set of levels.
///
/// Construction goes through [`LevelSet::new`], so every set handed to
/// the simulation satisfies the id and spawn invariants.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LevelSet {
    levels: Vec<LevelDef>,
}

impl LevelSet {
    /// Validate and wrap a level list.
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }

        for (index, level) in levels.iter().enumerate() {
            if level.id != index as u32 + 1 {
                return Err(LevelError::OutOfOrderId {
                    index,
                    found: level.id,
                });
            }

            for (slot, spawn) in level.spawns.iter().enumerate() {
                if spawn.health <= 0 {
                    return Err(LevelError::NonPositiveHealth {
                        level: level.id,
                        slot,
                    });
                }
                if spawn.width <= 0 || spawn.height <= 0 {
                    return Err(LevelError::NonPositiveSize {
                        level: level.id,
                        slot,
                    });
                }
            }

            if let Some(npc) = &level.npc {
                if npc.width <= 0 || npc.height <= 0 {
                    return Err(LevelError::NonPositiveNpcSize { level: level.id });
                }
            }
        }

        Ok(Self { levels })
    }

    /// Load a level set from its JSON form (a bare array of levels).
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelDef> =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(levels)
    }

    /// The shipped two-level campaign.
    pub fn standard() -> Self {
        let levels = vec![
            LevelDef {
                id: 1,
                name: "Chemistry Hall".to_string(),
                background: "bg/chemistry-hall".to_string(),
                contact_damage: to_fixed(0.5),
                attack_reach: from_int(50),
                attack_damage: from_int(20),
                attack_energy_cost: from_int(5),
                spawns: vec![
                    SpawnDef {
                        kind: EnemyKind::Zombie,
                        x: from_int(700),
                        width: from_int(70),
                        height: from_int(70),
                        speed: to_fixed(1.0),
                        health: from_int(60),
                    },
                    SpawnDef {
                        kind: EnemyKind::Zombie,
                        x: from_int(500),
                        width: from_int(70),
                        height: from_int(70),
                        speed: to_fixed(1.2),
                        health: from_int(70),
                    },
                ],
                npc: None,
            },
            LevelDef {
                id: 2,
                name: "Admin Building".to_string(),
                background: "bg/admin-building".to_string(),
                contact_damage: to_fixed(1.0),
                attack_reach: from_int(70),
                attack_damage: from_int(15),
                attack_energy_cost: from_int(10),
                spawns: vec![SpawnDef {
                    kind: EnemyKind::Boss,
                    x: from_int(700),
                    width: from_int(100),
                    height: from_int(100),
                    speed: to_fixed(0.5),
                    health: from_int(200),
                }],
                npc: Some(NpcDef {
                    x: from_int(780),
                    width: from_int(50),
                    height: from_int(50),
                }),
            },
        ];

        // Literal data above satisfies the invariants new() checks
        Self { levels }
    }

    /// Look up a level by id.
    pub fn get(&self, id: u32) -> Option<&LevelDef> {
        if id == 0 {
            return None;
        }
        self.levels.get(id as usize - 1)
    }

    /// The level a fresh run starts on.
    pub fn first(&self) -> &LevelDef {
        &self.levels[0]
    }

    /// Highest level id in the set.
    pub fn last_id(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a validated set; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// All levels, in id order.
    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// TESTS
// =============================================================================
