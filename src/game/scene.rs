//! Render Snapshot
//!
//! The one-way boundary between the simulation and whatever draws it.
//! Each frame the embedding asks for a [`Frame`]: backdrop id, sprite
//! placements in float view coordinates, and HUD values. The simulation
//! itself never draws and never blocks on assets.

use serde::{Deserialize, Serialize};

use crate::game::level::LevelSet;
use crate::game::state::{Body, EnemyKind, GameState, PlayerState};

// =============================================================================
// FRAME TYPES
// =============================================================================

/// Sprite identifiers the renderer maps to its own assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpriteKey {
    /// Player, standing pose
    HeroStill = 0,
    /// Player, swing pose (held while the attack key is down)
    HeroAttack = 1,
    /// Player, airborne pose
    HeroJump = 2,
    /// Standard chaser
    Zombie = 3,
    /// Gate hostile
    Boss = 4,
    /// The rescuable captive
    Captive = 5,
}

/// One sprite placement, in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// Which sprite to draw
    pub sprite: SpriteKey,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl DrawCommand {
    fn place(sprite: SpriteKey, body: &Body) -> Self {
        let (x, y, width, height) = body.to_floats();
        Self {
            sprite,
            x,
            y,
            width,
            height,
        }
    }
}

/// HUD values for the overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    /// Health as 0-100
    pub health_pct: f32,
    /// Energy as 0-100
    pub energy_pct: f32,
    /// Level caption
    pub level_label: String,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Backdrop asset id, if the current level is known
    pub backdrop: Option<String>,
    /// Sprite placements, back to front
    pub draws: Vec<DrawCommand>,
    /// HUD values
    pub hud: HudState,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Sprite for the player's current pose. Attacking wins over airborne.
#[inline]
pub fn hero_sprite(player: &PlayerState) -> SpriteKey {
    if player.is_attacking {
        SpriteKey::HeroAttack
    } else if !player.on_ground {
        SpriteKey::HeroJump
    } else {
        SpriteKey::HeroStill
    }
}

/// Sprite for a hostile archetype.
#[inline]
pub fn enemy_sprite(kind: EnemyKind) -> SpriteKey {
    match kind {
        EnemyKind::Zombie => SpriteKey::Zombie,
        EnemyKind::Boss => SpriteKey::Boss,
    }
}

/// Build the frame snapshot for the current state.
///
/// Draw order is player, then live hostiles in spawn order, then the
/// captive until saved. An unknown level id degrades to a bare frame
/// (no backdrop, numeric caption) instead of failing: missing art is
/// the renderer's problem, not the simulation's.
pub fn render(state: &GameState, levels: &LevelSet) -> Frame {
    let (backdrop, level_label) = match levels.get(state.level) {
        Some(def) => (
            Some(def.background.clone()),
            format!("{} - {}", def.id, def.name),
        ),
        None => (None, state.level.to_string()),
    };

    let mut draws = Vec::with_capacity(2 + state.roster.enemies.len());
    draws.push(DrawCommand::place(
        hero_sprite(&state.player),
        &state.player.body,
    ));

    for enemy in &state.roster.enemies {
        if enemy.vitals.alive {
            draws.push(DrawCommand::place(enemy_sprite(enemy.kind), &enemy.body));
        }
    }

    if let Some(npc) = &state.roster.npc {
        if !npc.saved {
            draws.push(DrawCommand::place(SpriteKey::Captive, &npc.body));
        }
    }

    Frame {
        backdrop,
        draws,
        hud: HudState {
            health_pct: state.player.health_pct(),
            energy_pct: state.player.energy_pct(),
            level_label,
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
