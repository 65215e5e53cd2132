//! Game Events
//!
//! Notifications emitted by the simulation for the phase and UI sinks.
//! Within a tick, events appear in the order the update steps produced
//! them, which is already deterministic.

use serde::{Deserialize, Serialize};

use crate::game::state::{EnemyKind, WinReason};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A run left the start screen
    RunStarted {
        /// Level the run begins on
        level: u32,
    },

    /// The player crossed into the next level
    LevelAdvanced {
        /// Level left behind
        from: u32,
        /// Level entered
        to: u32,
    },

    /// A hostile's health reached zero
    EnemyDefeated {
        /// Level it happened on
        level: u32,
        /// Spawn slot of the hostile within the level
        slot: usize,
        /// Archetype of the hostile
        kind: EnemyKind,
    },

    /// The captive was saved
    NpcRescued {
        /// Level it happened on
        level: u32,
    },

    /// Terminal: the run was won
    RunWon {
        /// How the win happened
        reason: WinReason,
    },

    /// Terminal: the player died
    RunLost,
}

/// A simulation event with the tick it occurred on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create run started event.
    pub fn run_started(tick: u32, level: u32) -> Self {
        Self::new(tick, GameEventData::RunStarted { level })
    }

    /// Create level advanced event.
    pub fn level_advanced(tick: u32, from: u32, to: u32) -> Self {
        Self::new(tick, GameEventData::LevelAdvanced { from, to })
    }

    /// Create enemy defeated event.
    pub fn enemy_defeated(tick: u32, level: u32, slot: usize, kind: EnemyKind) -> Self {
        Self::new(tick, GameEventData::EnemyDefeated { level, slot, kind })
    }

    /// Create captive rescued event.
    pub fn npc_rescued(tick: u32, level: u32) -> Self {
        Self::new(tick, GameEventData::NpcRescued { level })
    }

    /// Create run won event.
    pub fn run_won(tick: u32, reason: WinReason) -> Self {
        Self::new(tick, GameEventData::RunWon { reason })
    }

    /// Create run lost event.
    pub fn run_lost(tick: u32) -> Self {
        Self::new(tick, GameEventData::RunLost)
    }
}
