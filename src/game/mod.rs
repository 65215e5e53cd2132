//! Game Logic Module
//!
//! All game simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Held-key snapshots and delta-compressed recordings
//! - `level`: Level definitions, validation, the standard campaign
//! - `state`: Run state, player, hostiles, the captive
//! - `tick`: Authoritative simulation loop
//! - `collision`: Buffered box overlap tests
//! - `scene`: Draw-command and HUD snapshot for the renderer
//! - `session`: Run lifecycle from asset load to completion
//! - `events`: Game events for replay/verification

pub mod collision;
pub mod events;
pub mod input;
pub mod level;
pub mod scene;
pub mod session;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::GameEvent;
pub use input::{InputDelta, InputFrame, InputRecording};
pub use level::{LevelDef, LevelSet};
pub use session::GameSession;
pub use state::{GamePhase, GameState, PlayerState};
pub use tick::TickResult;
