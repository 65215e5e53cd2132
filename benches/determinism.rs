//! Simulation throughput benchmarks.
//!
//! Measures the per-tick cost of the deterministic core, a full scripted
//! run, state hashing, and replay verification over a recorded run.
//!
//! ```bash
//! cargo bench --bench determinism
//! ```

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use campus_rescue::game::input::InputRecording;
use campus_rescue::game::state::{GamePhase, GameState};
use campus_rescue::game::tick::{replay, tick};
use campus_rescue::{InputFrame, LevelSet};

/// Deterministic input script shared by every benchmark.
fn scripted(t: u32) -> InputFrame {
    InputFrame::holding(t % 97 < 10, t % 11 != 0, t % 53 == 0, t % 13 < 4)
}

/// A playing state advanced into mid-campaign combat.
fn mid_combat_state(levels: &LevelSet) -> GameState {
    let mut state = GameState::new(levels);
    state.phase = GamePhase::Playing;
    for t in 0..240 {
        tick(&mut state, scripted(t), levels);
    }
    state
}

fn bench_single_tick(c: &mut Criterion) {
    let levels = LevelSet::standard();
    let state = mid_combat_state(&levels);
    let input = scripted(240);

    c.bench_function("tick/mid_combat", |b| {
        b.iter_batched(
            || state.clone(),
            |mut s| {
                let result = tick(&mut s, black_box(input), &levels);
                black_box(result)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_full_run(c: &mut Criterion) {
    let levels = LevelSet::standard();

    c.bench_function("run/scripted_600_ticks", |b| {
        b.iter(|| {
            let mut state = GameState::new(&levels);
            state.phase = GamePhase::Playing;
            for t in 0..600 {
                let result = tick(&mut state, scripted(t), &levels);
                if result.run_over {
                    break;
                }
            }
            black_box(state.compute_hash())
        });
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let levels = LevelSet::standard();
    let state = mid_combat_state(&levels);

    c.bench_function("hash/game_state", |b| {
        b.iter(|| black_box(state.compute_hash()));
    });
}

fn bench_replay_verification(c: &mut Criterion) {
    let levels = LevelSet::standard();

    // Record one live run up front
    let mut state = GameState::new(&levels);
    state.phase = GamePhase::Playing;
    let mut recording = InputRecording::new();
    for t in 0..600 {
        let input = scripted(t);
        recording.record(state.tick, input);
        let result = tick(&mut state, input, &levels);
        if result.run_over {
            break;
        }
    }
    recording.finalize(state.tick);
    let end_tick = state.tick;
    let live_hash = state.compute_hash();

    c.bench_function("replay/full_run", |b| {
        b.iter(|| {
            let (replayed, _events) = replay(&levels, &recording, end_tick);
            assert_eq!(replayed.compute_hash(), live_hash);
            black_box(replayed)
        });
    });
}

criterion_group!(
    benches,
    bench_single_tick,
    bench_full_run,
    bench_state_hash,
    bench_replay_verification
);
criterion_main!(benches);
