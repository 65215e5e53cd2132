//! Deterministic Simulation Tick
//!
//! The fixed-order update that advances one frame of game time. The
//! order is load-bearing: every step reads the results of the steps
//! before it, and replays only reproduce a run because the order never
//! changes. State mutation happens here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{
    ATTACK_COOLDOWN_TICKS, GRAVITY, GROUND_Y, JUMP_ENERGY_COST, JUMP_IMPULSE, PLAYER_MOVE_SPEED,
    RESCUE_REACH, VIEW_WIDTH,
};
use crate::game::collision::{in_reach, touching};
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::level::{LevelDef, LevelSet};
use crate::game::state::{Damageable, EnemyKind, GamePhase, GameState, Roster, WinReason};

/// Result of a tick.
#[derive(Debug)]
#[derive(Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the run is in a terminal phase
    pub run_over: bool,
    /// Terminal outcome, set on the tick the run ends
    pub outcome: Option<Outcome>,
}

/// Terminal outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The player won
    Won(WinReason),
    /// The player died
    Lost,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `state` - The run state (will be mutated)
/// * `input` - Held-key snapshot for this tick
/// * `levels` - The level set this run plays over
///
/// # Determinism
///
/// This function is 100% deterministic:
/// - Fixed-point math only
/// - Entity iteration in spawn order
/// - No system calls, no floating point, no randomness
pub fn tick(state: &mut GameState, input: InputFrame, levels: &LevelSet) -> TickResult {
    let mut result = TickResult::default();

    // Only a playing run advances. NotStarted and terminal phases are
    // no-ops, so the embedding can keep calling while the phase sink
    // decides what to show.
    if state.phase != GamePhase::Playing {
        result.run_over = state.phase.is_terminal();
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;

    // Steps 1-6 run against the level the tick started on. The session
    // keeps state.level inside the set; a miss here is a wiring bug.
    let Some(level) = levels.get(state.level) else {
        debug_assert!(false, "level {} missing from set", state.level);
        return result;
    };

    // 1-2. Horizontal input and the jump attempt
    apply_movement(state, input);

    // 3-4. Gravity integration and the ground clamp
    integrate_physics(state);

    // 5-6. Attack cooldown decay and the melee sweep
    resolve_attack(state, input, level);

    // 7. Boundary crossing: next level, or the final-level win
    check_level_advance(state, levels, &mut result);

    // Steps 8-10 run against the (possibly just entered) current level
    let Some(level) = levels.get(state.level) else {
        debug_assert!(false, "level {} missing from set", state.level);
        return result;
    };

    // 8. Contact damage from overlapping hostiles
    apply_contact_damage(state, level);

    // 9. Health exhausted ends the run
    check_player_death(state, &mut result);

    // 10. Rescue once the bosses are down
    check_rescue(state, &mut result);

    // 11. Passive energy regen
    state.player.regen_energy();

    // Hostiles chase after the player's full update
    update_enemies(state);

    // Collect events
    result.events = state.take_events();

    result
}

/// Steps 1-2: horizontal input, then the jump attempt.
///
/// Opposite directions cancel to a net zero move. The jump gate checks
/// ground contact and the energy floor; a refused jump changes nothing.
fn apply_movement(state: &mut GameState, input: InputFrame) {
    let player = &mut state.player;

    if input.left() {
        player.body.x = player.body.x.wrapping_sub(PLAYER_MOVE_SPEED);
    }
    if input.right() {
        player.body.x = player.body.x.wrapping_add(PLAYER_MOVE_SPEED);
    }

    if input.jump() && player.can_jump() {
        player.velocity_y = JUMP_IMPULSE;
        player.on_ground = false;
        player.spend_energy(JUMP_ENERGY_COST);
    }
}

/// Steps 3-4: semi-implicit Euler on the y axis, then the ground clamp.
fn integrate_physics(state: &mut GameState) {
    let player = &mut state.player;

    player.velocity_y = player.velocity_y.wrapping_add(GRAVITY);
    player.body.y = player.body.y.wrapping_add(player.velocity_y);

    // Inclusive: resting exactly on the line counts as grounded
    if player.body.bottom() >= GROUND_Y {
        player.body.snap_to_ground();
        player.velocity_y = 0;
        player.on_ground = true;
    }
}

/// Steps 5-6: attack cooldown decay, then the melee sweep.
///
/// The cooldown decays before the activation check, so a cooldown that
/// reaches zero this tick allows an attack this tick. Activation also
/// requires the attack key to have been released since the last swing.
/// Every live hostile inside the level's reach buffer is hit, and energy
/// is deducted once per hostile hit.
fn resolve_attack(state: &mut GameState, input: InputFrame, level: &LevelDef) {
    if state.player.attack_cooldown > 0 {
        state.player.attack_cooldown -= 1;
    }

    if !input.attack() {
        // The attack pose ends when the key does
        state.player.is_attacking = false;
        return;
    }

    if state.player.is_attacking || state.player.attack_cooldown > 0 {
        return;
    }

    state.player.is_attacking = true;
    state.player.attack_cooldown = ATTACK_COOLDOWN_TICKS;

    // Collect defeats first, then emit events (split borrows)
    let mut defeated: Vec<(usize, EnemyKind)> = Vec::new();
    let player = &mut state.player;
    for (slot, enemy) in state.roster.enemies.iter_mut().enumerate() {
        if !enemy.vitals.alive || !in_reach(player, enemy, level.attack_reach) {
            continue;
        }
        enemy.take_damage(level.attack_damage);
        player.spend_energy(level.attack_energy_cost);
        if !enemy.vitals.alive {
            defeated.push((slot, enemy.kind));
        }
    }

    for (slot, kind) in defeated {
        let event = GameEvent::enemy_defeated(state.tick, state.level, slot, kind);
        state.push_event(event);
    }
}

/// Step 7: boundary crossing.
///
/// Crossing the right edge of a non-final level moves the player to the
/// left edge, ground-anchored, and swaps in the next level's roster.
/// Vertical velocity carries across. Crossing the final level's edge
/// wins the run.
fn check_level_advance(state: &mut GameState, levels: &LevelSet, result: &mut TickResult) {
    if state.player.body.right() <= VIEW_WIDTH {
        return;
    }

    let from = state.level;
    if from < levels.last_id() {
        let Some(next) = levels.get(from + 1) else {
            return;
        };
        state.level = next.id;
        state.player.body.x = 0;
        state.player.body.snap_to_ground();
        state.roster = Roster::from_level(next);
        state.push_event(GameEvent::level_advanced(state.tick, from, next.id));
    } else if state.try_finish(GamePhase::Won) {
        state.push_event(GameEvent::run_won(state.tick, WinReason::ClearedLastLevel));
        result.run_over = true;
        result.outcome = Some(Outcome::Won(WinReason::ClearedLastLevel));
    }
}

/// Step 8: contact damage from every live, overlapping hostile.
///
/// Each overlapping hostile contributes the level's full per-tick rate.
fn apply_contact_damage(state: &mut GameState, level: &LevelDef) {
    let player = &mut state.player;
    for enemy in &state.roster.enemies {
        if enemy.vitals.alive && touching(player, enemy) {
            player.take_damage(level.contact_damage);
        }
    }
}

/// Step 9: health exhausted ends the run.
fn check_player_death(state: &mut GameState, result: &mut TickResult) {
    if state.player.vitals.alive {
        return;
    }
    if state.try_finish(GamePhase::Lost) {
        state.push_event(GameEvent::run_lost(state.tick));
        result.run_over = true;
        result.outcome = Some(Outcome::Lost);
    }
}

/// Step 10: the rescue, gated on every boss being down.
///
/// The melee sweep runs before this check, so the killing blow and the
/// rescue can land on the same tick.
fn check_rescue(state: &mut GameState, result: &mut TickResult) {
    if !state.roster.bosses_down() {
        return;
    }

    let reached = match &state.roster.npc {
        Some(npc) if !npc.saved => in_reach(&state.player, npc, RESCUE_REACH),
        _ => false,
    };
    if !reached {
        return;
    }

    if !state.try_finish(GamePhase::Won) {
        return;
    }
    if let Some(npc) = state.roster.npc.as_mut() {
        npc.saved = true;
    }
    state.push_event(GameEvent::npc_rescued(state.tick, state.level));
    state.push_event(GameEvent::run_won(state.tick, WinReason::CaptiveRescued));
    result.run_over = true;
    result.outcome = Some(Outcome::Won(WinReason::CaptiveRescued));
}

/// Hostiles chase after the player's full update, in spawn order.
fn update_enemies(state: &mut GameState) {
    let player_x = state.player.body.x;
    for enemy in state.roster.enemies.iter_mut() {
        enemy.chase(player_x);
    }
}

/// Re-run a recorded input stream against a fresh state.
///
/// Walks the recording's replay iterator for at most `max_ticks` ticks,
/// stopping early when the recording ends or the run reaches a terminal
/// phase. Returns the final state and every event the run produced. A
/// replay of the same recording over the same level set reproduces the
/// live run's state hash exactly.
pub fn replay(
    levels: &LevelSet,
    recording: &InputRecording,
    max_ticks: u32,
) -> (GameState, Vec<GameEvent>) {
    let mut state = GameState::new(levels);
    state.phase = GamePhase::Playing;

    let mut all_events = Vec::new();

    for (t, input) in recording.replay_iter().take(max_ticks as usize) {
        // Recording indexes and the tick counter advance in lockstep
        debug_assert_eq!(t, state.tick);
        let result = tick(&mut state, input, levels);
        all_events.extend(result.events);

        if result.run_over {
            break;
        }
    }

    (state, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
