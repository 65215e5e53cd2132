//! Run Session Management
//!
//! Manages the lifecycle of a run from asset load to completion.
//! Coordinates between the embedding (renderer, input source) and the
//! deterministic game simulation: the session owns the level set, the
//! run state, and the input recording that makes the run replayable.

use crate::core::hash::StateHash;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::level::LevelSet;
use crate::game::scene::{render, Frame};
use crate::game::state::{GamePhase, GameState};
use crate::game::tick::{replay, tick, TickResult};

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The embedding has not reported its assets loaded yet.
    #[error("assets not ready")]
    AssetsNotReady,

    /// The run has already started.
    #[error("run already started")]
    AlreadyStarted,

    /// The run has not reached a terminal phase.
    #[error("run still in progress")]
    NotFinished,
}

/// A single-player run session.
///
/// The embedding drives it: report assets ready, start, then call
/// [`GameSession::advance`] once per frame with the held-key snapshot.
/// Every advanced tick is recorded, so a finished run can always be
/// replayed and verified against its final state hash.
pub struct GameSession {
    /// Level set this session plays over.
    levels: LevelSet,
    /// The run state.
    state: GameState,
    /// True once the embedding has loaded what it needs to draw.
    assets_ready: bool,
    /// Inputs recorded since the run started.
    recording: InputRecording,
}

impl GameSession {
    /// Create a session over a level set. The run starts in
    /// [`GamePhase::NotStarted`] and stays there until assets are
    /// reported ready and [`GameSession::start`] is called.
    pub fn new(levels: LevelSet) -> Self {
        let state = GameState::new(&levels);
        Self {
            levels,
            state,
            assets_ready: false,
            recording: InputRecording::new(),
        }
    }

    /// Report that the embedding finished loading its assets.
    ///
    /// The simulation never touches assets itself; this is purely the
    /// gate that lets a run start.
    pub fn notify_assets_ready(&mut self) {
        self.assets_ready = true;
    }

    /// Whether assets have been reported ready.
    #[inline]
    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    /// Start the run.
    ///
    /// Requires assets ready and a run that has not started. Returns
    /// the run-started event for the embedding's event feed.
    pub fn start(&mut self) -> Result<GameEvent, SessionError> {
        if !self.assets_ready {
            return Err(SessionError::AssetsNotReady);
        }
        if self.state.phase != GamePhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }

        self.state.phase = GamePhase::Playing;
        self.recording = InputRecording::new();

        Ok(GameEvent::run_started(self.state.tick, self.state.level))
    }

    /// Reset after a finished run.
    ///
    /// Only a terminal run can restart. State goes back to the first
    /// level with full pools and the phase returns to
    /// [`GamePhase::NotStarted`], awaiting the next
    /// [`GameSession::start`]. Assets stay ready.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !self.state.phase.is_terminal() {
            return Err(SessionError::NotFinished);
        }

        self.state.reset(&self.levels);
        self.recording = InputRecording::new();
        Ok(())
    }

    /// Advance one tick with the current held-key snapshot.
    ///
    /// Inputs are recorded against the tick they will execute as, so
    /// the recording indexes line up with replay. Outside of
    /// [`GamePhase::Playing`] this is a no-op that keeps reporting
    /// whether the run is over.
    pub fn advance(&mut self, input: InputFrame) -> TickResult {
        if self.state.phase == GamePhase::Playing {
            self.recording.record(self.state.tick, input);
        }

        let result = tick(&mut self.state, input, &self.levels);

        // Seal the recording on the tick the run ends
        if result.outcome.is_some() {
            self.recording.finalize(self.state.tick);
        }

        result
    }

    /// Build the frame snapshot for the renderer.
    pub fn frame(&self) -> Frame {
        render(&self.state, &self.levels)
    }

    /// Hash of the current state, for verification and desync checks.
    pub fn state_hash(&self) -> StateHash {
        self.state.compute_hash()
    }

    /// Re-run the recording and check it reproduces the live state.
    ///
    /// Only meaningful once the run is over.
    pub fn verify_replay(&self) -> Result<bool, SessionError> {
        if !self.state.phase.is_terminal() {
            return Err(SessionError::NotFinished);
        }

        let (replayed, _events) = replay(&self.levels, &self.recording, self.state.tick);
        Ok(replayed.compute_hash() == self.state.compute_hash())
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// The run state.
    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The level set this session plays over.
    #[inline]
    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    /// The input recording so far.
    #[inline]
    pub fn recording(&self) -> &InputRecording {
        &self.recording
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(LevelSet::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;
    use crate::game::state::WinReason;
    use crate::game::tick::Outcome;

    /// Standard campaign with every hostile and captive removed.
    fn clear_run_session() -> GameSession {
        let mut levels = LevelSet::standard().levels().to_vec();
        for level in &mut levels {
            level.spawns.clear();
            level.npc = None;
        }
        GameSession::new(LevelSet::new(levels).unwrap())
    }

    fn hold_right() -> InputFrame {
        InputFrame::holding(false, true, false, false)
    }

    #[test]
    fn test_start_requires_assets() {
        let mut session = GameSession::default();
        assert!(!session.assets_ready());

        assert_eq!(session.start(), Err(SessionError::AssetsNotReady));
        assert_eq!(session.phase(), GamePhase::NotStarted);

        session.notify_assets_ready();
        assert!(session.assets_ready());
        let event = session.start().unwrap();
        assert_eq!(event.data, GameEventData::RunStarted { level: 1 });
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut session = GameSession::default();
        session.notify_assets_ready();
        session.start().unwrap();

        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn test_advance_before_start_is_noop() {
        let mut session = GameSession::default();

        let result = session.advance(hold_right());
        assert!(!result.run_over);
        assert_eq!(session.state().tick, 0);
        assert_eq!(session.recording().delta_count(), 0);
    }

    #[test]
    fn test_restart_only_after_terminal() {
        let mut session = GameSession::default();
        session.notify_assets_ready();
        session.start().unwrap();

        assert_eq!(session.restart(), Err(SessionError::NotFinished));

        session.state.phase = GamePhase::Lost;
        session.restart().unwrap();
        assert_eq!(session.phase(), GamePhase::NotStarted);
        assert_eq!(session.state().tick, 0);
        assert_eq!(session.state().level, 1);
        assert_eq!(session.recording().delta_count(), 0);

        // Assets stay loaded, so the next start goes straight through
        assert!(session.assets_ready());
        let event = session.start().unwrap();
        assert_eq!(event.data, GameEventData::RunStarted { level: 1 });
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_full_run_records_and_verifies() {
        let mut session = clear_run_session();
        session.notify_assets_ready();
        session.start().unwrap();

        assert_eq!(
            session.verify_replay(),
            Err(SessionError::NotFinished)
        );

        let mut last = None;
        for _ in 0..400 {
            let result = session.advance(hold_right());
            if result.run_over {
                last = result.outcome;
                break;
            }
        }

        assert_eq!(last, Some(Outcome::Won(WinReason::ClearedLastLevel)));
        assert_eq!(session.phase(), GamePhase::Won);
        assert!(session.recording().delta_count() > 0);
        assert_eq!(session.verify_replay(), Ok(true));
    }

    #[test]
    fn test_frame_available_in_any_phase() {
        let session = GameSession::default();
        let frame = session.frame();

        assert_eq!(frame.hud.level_label, "1 - Chemistry Hall");
        assert!(!frame.draws.is_empty());
    }
}
