//! Input Snapshots and Recording
//!
//! The simulation reads held-key state once per tick as an immutable
//! [`InputFrame`]. The embedding translates physical keys to logical
//! actions; key codes never reach the tick. Frames are recorded with
//! delta compression for replay and determinism verification.

use serde::{Deserialize, Serialize};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Held-action state for a single tick.
///
/// This is the minimal input that affects game state.
/// NO tick field - tick is stored separately for compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: move left held
    /// - Bit 1: move right held
    /// - Bit 2: jump held
    /// - Bit 3: attack held
    /// - Bits 4-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Size in bytes
    pub const SIZE: usize = 1;

    /// Move-left flag bit
    pub const FLAG_LEFT: u8 = 0x01;

    /// Move-right flag bit
    pub const FLAG_RIGHT: u8 = 0x02;

    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;

    /// Attack flag bit
    pub const FLAG_ATTACK: u8 = 0x08;

    /// Create a new idle input frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame with the given actions held.
    pub const fn holding(left: bool, right: bool, jump: bool, attack: bool) -> Self {
        let mut flags = 0;
        if left {
            flags |= Self::FLAG_LEFT;
        }
        if right {
            flags |= Self::FLAG_RIGHT;
        }
        if jump {
            flags |= Self::FLAG_JUMP;
        }
        if attack {
            flags |= Self::FLAG_ATTACK;
        }
        Self { flags }
    }

    /// Check if move-left is held.
    #[inline]
    pub fn left(&self) -> bool {
        self.flags & Self::FLAG_LEFT != 0
    }

    /// Check if move-right is held.
    #[inline]
    pub fn right(&self) -> bool {
        self.flags & Self::FLAG_RIGHT != 0
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if attack is held.
    #[inline]
    pub fn attack(&self) -> bool {
        self.flags & Self::FLAG_ATTACK != 0
    }

    /// Check if this is an idle frame (nothing held).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Set the move-left flag.
    #[inline]
    pub fn set_left(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_LEFT;
        } else {
            self.flags &= !Self::FLAG_LEFT;
        }
    }

    /// Set the move-right flag.
    #[inline]
    pub fn set_right(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_RIGHT;
        } else {
            self.flags &= !Self::FLAG_RIGHT;
        }
    }

    /// Set the jump flag.
    #[inline]
    pub fn set_jump(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_JUMP;
        } else {
            self.flags &= !Self::FLAG_JUMP;
        }
    }

    /// Set the attack flag.
    #[inline]
    pub fn set_attack(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_ATTACK;
        } else {
            self.flags &= !Self::FLAG_ATTACK;
        }
    }
}

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
/// This keeps full-run recordings tiny.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Size in bytes (approximate)
    pub const SIZE: usize = 8;

    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Complete input recording for one run.
///
/// Used for:
/// - Replay playback
/// - Determinism verification (replay must reproduce the state hash)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Starting tick (usually 0)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Delta-compressed input data.
    /// Only stores ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create a new empty recording.
    pub fn new() -> Self {
        Self {
            start_tick: 0,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from the previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Get input at a specific tick.
    ///
    /// Uses binary search for efficiency.
    pub fn input_at(&self, tick: u32) -> InputFrame {
        if self.deltas.is_empty() {
            return InputFrame::new();
        }

        // Binary search for the last delta at or before this tick
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            // Before first delta - idle
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Estimated size in bytes.
    pub fn estimated_size(&self) -> usize {
        16 + (self.deltas.len() * InputDelta::SIZE)
    }

    /// Finalize the recording (call at run end).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Create iterator over all inputs for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: self.start_tick,
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
///
/// Yields `(tick, frame)` for every tick the recording covers; each
/// frame is exactly what [`InputRecording::input_at`] returns for that
/// tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.recording.end_tick {
            return None;
        }

        let result = (self.current_tick, self.recording.input_at(self.current_tick));
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(frame.is_idle());
        assert!(!frame.jump());
        assert!(!frame.attack());

        frame.set_right(true);
        assert!(frame.right());
        assert!(!frame.left());

        frame.set_jump(true);
        assert!(frame.jump());
        assert!(frame.right());

        frame.set_right(false);
        assert!(!frame.right());
        assert!(frame.jump());
    }

    #[test]
    fn test_input_frame_holding() {
        let frame = InputFrame::holding(true, false, false, true);
        assert!(frame.left());
        assert!(!frame.right());
        assert!(!frame.jump());
        assert!(frame.attack());

        assert_eq!(InputFrame::holding(false, false, false, false), InputFrame::new());
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut recording = InputRecording::new();

        // Record same input multiple times
        let frame = InputFrame::holding(false, true, false, false);
        recording.record(0, frame);
        recording.record(1, frame);
        recording.record(2, frame);
        recording.record(3, frame);

        // Should only have 1 delta (input didn't change)
        assert_eq!(recording.delta_count(), 1);

        // Change input
        let frame2 = InputFrame::holding(true, false, false, false);
        recording.record(4, frame2);

        // Now should have 2 deltas
        assert_eq!(recording.delta_count(), 2);
    }

    #[test]
    fn test_recording_input_at() {
        let mut recording = InputRecording::new();

        let frame1 = InputFrame::holding(false, true, false, false);
        let frame2 = InputFrame::holding(true, false, false, false);
        let frame3 = InputFrame::holding(false, false, true, false);

        recording.record(10, frame1);
        recording.record(20, frame2);
        recording.record(30, frame3);

        // Before first delta
        assert!(recording.input_at(5).is_idle());

        // At first delta
        assert_eq!(recording.input_at(10), frame1);

        // Between deltas
        assert_eq!(recording.input_at(15), frame1);
        assert_eq!(recording.input_at(25), frame2);

        // At and after last delta
        assert_eq!(recording.input_at(30), frame3);
        assert_eq!(recording.input_at(100), frame3);
    }

    #[test]
    fn test_replay_iterator() {
        let mut recording = InputRecording::new();

        recording.record(0, InputFrame::holding(false, true, false, false));
        recording.record(3, InputFrame::holding(false, true, true, false));
        recording.finalize(5);

        let frames: Vec<_> = recording.replay_iter().collect();

        assert_eq!(frames.len(), 6); // Ticks 0-5
        assert!(frames[0].1.right() && !frames[0].1.jump());
        assert!(frames[2].1.right() && !frames[2].1.jump());
        assert!(frames[3].1.right() && frames[3].1.jump());
        assert!(frames[5].1.jump());

        // The iterator and the random-access lookup agree tick for tick
        for (tick, frame) in frames {
            assert_eq!(frame, recording.input_at(tick));
        }
    }

    #[test]
    fn test_recording_size_estimate() {
        let mut recording = InputRecording::new();

        // A busy two-minute run: a few hundred held-set changes
        for i in 0..400u32 {
            let frame = InputFrame::holding(i % 3 == 0, i % 3 == 1, false, i % 7 == 0);
            recording.record(i * 18, frame);
        }

        // Should be well under 5KB
        assert!(recording.estimated_size() < 5000);
    }
}
