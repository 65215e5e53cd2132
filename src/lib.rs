//! # Campus Rescue Core
//!
//! Deterministic simulation core for Campus Rescue, a 2D side-scrolling
//! rescue brawler. Rendering, audio, and asset loading live in the
//! embedding; this crate owns everything that must replay bit-for-bit.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CAMPUS RESCUE CORE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic + tuning    │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── input.rs    - Held-key snapshots and recordings         │
//! │  ├── level.rs    - Level definitions and the campaign        │
//! │  ├── state.rs    - Run, player, hostile, captive state       │
//! │  ├── tick.rs     - Authoritative simulation loop             │
//! │  ├── collision.rs- Buffered box overlap tests                │
//! │  ├── scene.rs    - Draw/HUD snapshot (render boundary)       │
//! │  ├── session.rs  - Run lifecycle management                  │
//! │  └── events.rs   - Game events for replay/verification       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic (floats appear only
//!   at the render boundary in `scene`)
//! - Entities iterate in spawn order
//! - No system time dependencies
//!
//! Given an identical level set and input stream, a run produces
//! **identical state hashes** on any platform (x86, ARM, WASM).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::fixed::{Fixed, FIXED_HALF, FIXED_ONE, FIXED_SCALE};
pub use crate::core::hash::StateHash;
pub use game::events::{GameEvent, GameEventData};
pub use game::input::{InputFrame, InputRecording};
pub use game::level::{LevelDef, LevelError, LevelSet};
pub use game::scene::{render, DrawCommand, Frame, HudState, SpriteKey};
pub use game::session::{GameSession, SessionError};
pub use game::state::{GamePhase, GameState, PlayerState, WinReason};
pub use game::tick::{replay, tick, Outcome, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
