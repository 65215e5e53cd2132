//! Campus Rescue
//!
//! Headless driver for the Campus Rescue simulation core.
//! Runs a scripted pilot through the campaign, logs the event feed,
//! and verifies the finished run replays to the same state hash.

use std::env;
use std::fs;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campus_rescue::core::fixed::{from_int, Fixed};
use campus_rescue::game::collision::in_reach;
use campus_rescue::game::state::EnemyKind;
use campus_rescue::{
    GameEvent, GameEventData, GameSession, GameState, InputFrame, LevelSet, TICK_RATE, VERSION,
};

/// Demo cap: ten minutes of simulated time.
const MAX_DEMO_TICKS: u32 = 36_000;

/// Health floor below which the pilot stops dueling and sprints.
const SPRINT_HEALTH_FLOOR: Fixed = from_int(40);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Campus Rescue Core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    // An argument names a level file; otherwise play the standard campaign.
    // A level file that does not parse or validate is a startup failure,
    // never something to limp past.
    let levels = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading level file {path}"))?;
            let levels = LevelSet::from_json_str(&text)
                .with_context(|| format!("parsing level file {path}"))?;
            info!("Loaded {} levels from {}", levels.len(), path);
            levels
        }
        None => LevelSet::standard(),
    };

    demo_run(levels)
}

/// Run the scripted demo to completion (or the tick cap).
fn demo_run(levels: LevelSet) -> anyhow::Result<()> {
    info!("=== Starting Demo Run ===");

    let mut session = GameSession::new(levels);
    session.notify_assets_ready();

    let started = session.start()?;
    log_event(&started);

    loop {
        let input = pilot_input(session.state(), session.levels());
        let result = session.advance(input);

        for event in &result.events {
            log_event(event);
        }

        // Report every 10 seconds
        let tick = session.state().tick;
        if tick % 600 == 0 {
            let player = &session.state().player;
            info!(
                "Tick {}: level {}, health {:.0}%, energy {:.0}%, {} hostiles alive",
                tick,
                session.state().level,
                player.health_pct(),
                player.energy_pct(),
                session.state().roster.alive_count(),
            );
        }

        if result.run_over {
            break;
        }
        if tick >= MAX_DEMO_TICKS {
            warn!("Demo cap reached at tick {} without a terminal phase", tick);
            break;
        }
    }

    // Print final results
    info!("=== Run Finished ===");
    info!("Phase: {:?}", session.phase());
    info!("Ticks: {}", session.state().tick);
    info!("Final State Hash: {}", hex::encode(session.state_hash()));
    info!(
        "Recording: {} input deltas, ~{} bytes",
        session.recording().delta_count(),
        session.recording().estimated_size(),
    );

    // Verify determinism by replaying
    if session.phase().is_terminal() {
        info!("=== Verifying Determinism ===");
        if session.verify_replay()? {
            info!("DETERMINISM VERIFIED: replay hash matches");
        } else {
            warn!("DETERMINISM FAILURE: replay hash differs");
        }
    }

    Ok(())
}

/// Scripted pilot for the demo run.
///
/// Duels standard chasers while healthy, takes any strike that can
/// land, and sprints for the boundary otherwise. Not optimal play,
/// just enough to exercise the whole simulation.
fn pilot_input(state: &GameState, levels: &LevelSet) -> InputFrame {
    let player = &state.player;

    // Nearest live hostile
    let target = state
        .roster
        .enemies
        .iter()
        .filter(|e| e.vitals.alive)
        .min_by_key(|e| (e.body.x - player.body.x).abs());

    let Some(enemy) = target else {
        // Cleared out: sprint for the right boundary
        return InputFrame::holding(false, true, false, false);
    };

    let reach = levels
        .get(state.level)
        .map(|def| def.attack_reach)
        .unwrap_or(0);
    let ready = player.attack_cooldown == 0 && !player.is_attacking;

    // Take any strike that can land. Hopping as it lands sheds contact
    // frames, and standing still keeps the target inside reach.
    if ready && in_reach(player, enemy, reach) {
        return InputFrame::holding(false, false, true, true);
    }

    let healthy = player.vitals.health >= SPRINT_HEALTH_FLOOR;
    let duel = healthy && enemy.kind == EnemyKind::Zombie;
    let enemy_is_right = enemy.body.x >= player.body.x;

    if duel {
        if player.attack_cooldown > 0 {
            // Recover out of contact
            InputFrame::holding(enemy_is_right, !enemy_is_right, false, false)
        } else {
            // Close back in
            InputFrame::holding(!enemy_is_right, enemy_is_right, false, false)
        }
    } else {
        // Gate hostiles and low health both mean the same thing: stop
        // trading hits and make for the boundary
        InputFrame::holding(false, true, false, false)
    }
}

/// Log one game event at info level.
fn log_event(event: &GameEvent) {
    match &event.data {
        GameEventData::RunStarted { level } => {
            info!("Run started on level {}", level);
        }
        GameEventData::LevelAdvanced { from, to } => {
            info!("Tick {}: advanced from level {} to {}", event.tick, from, to);
        }
        GameEventData::EnemyDefeated { level, slot, kind } => {
            info!(
                "Tick {}: defeated {:?} (level {}, slot {})",
                event.tick, kind, level, slot
            );
        }
        GameEventData::NpcRescued { level } => {
            info!("Tick {}: captive rescued on level {}", event.tick, level);
        }
        GameEventData::RunWon { reason } => {
            info!("Tick {}: run won ({:?})", event.tick, reason);
        }
        GameEventData::RunLost => {
            info!("Tick {}: run lost", event.tick);
        }
    }
}
