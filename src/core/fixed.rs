//! Q16.16 Fixed-Point Arithmetic
//!
//! This module provides deterministic fixed-point math for the simulation.
//! All gameplay values are integers - no floats in tick logic.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 units                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Q16.16?
//!
//! - Bit-identical results on every platform (no IEEE rounding modes)
//! - 32k unit range dwarfs the 800-unit viewport
//! - Sub-pixel precision for the fractional damage/regen rates
//! - Motion in this game is pure add/compare, so plain integer ops suffice;
//!   conversion happens only at the render boundary

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

// =============================================================================
// GAME CONSTANTS (Q16.16, evaluated at compile time)
// =============================================================================

/// Viewport width in world units. Crossing the right edge advances the level.
pub const VIEW_WIDTH: Fixed = to_fixed(800.0);

/// Viewport height in world units.
pub const VIEW_HEIGHT: Fixed = to_fixed(400.0);

/// Height of the ground band at the bottom of the viewport.
pub const GROUND_MARGIN: Fixed = to_fixed(40.0);

/// Y coordinate of the ground line. Feet rest here; y grows downward.
pub const GROUND_Y: Fixed = VIEW_HEIGHT - GROUND_MARGIN;

/// Player spawn x for a fresh run.
pub const PLAYER_SPAWN_X: Fixed = to_fixed(100.0);

/// Player hitbox width.
pub const PLAYER_WIDTH: Fixed = to_fixed(60.0);

/// Player hitbox height.
pub const PLAYER_HEIGHT: Fixed = to_fixed(60.0);

/// Horizontal speed while a direction key is held: 5.0 units/tick.
pub const PLAYER_MOVE_SPEED: Fixed = to_fixed(5.0);

/// Downward acceleration per tick: 0.6 (truncates to 39321/65536).
pub const GRAVITY: Fixed = to_fixed(0.6);

/// Vertical velocity applied on jump. Negative is up.
pub const JUMP_IMPULSE: Fixed = to_fixed(-12.0);

/// Player health cap.
pub const PLAYER_MAX_HEALTH: Fixed = to_fixed(100.0);

/// Energy cap.
pub const ENERGY_MAX: Fixed = to_fixed(100.0);

/// Energy deducted by a jump. Jumping is refused below this.
pub const JUMP_ENERGY_COST: Fixed = to_fixed(10.0);

/// Passive energy regen per tick: 0.1 (truncates to 6553/65536).
pub const ENERGY_REGEN: Fixed = to_fixed(0.1);

/// Ticks between attack activations.
pub const ATTACK_COOLDOWN_TICKS: u32 = 30;

/// Collision buffer for the captive rescue check.
pub const RESCUE_REACH: Fixed = to_fixed(20.0);

// =============================================================================
// CONVERSIONS
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use campus_rescue::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert an integer count of world units to fixed-point.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(FIXED_SCALE, 16);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.0), FIXED_ONE);
        assert_eq!(to_fixed(0.5), FIXED_HALF);
        assert_eq!(to_fixed(2.0), FIXED_ONE * 2);
        assert_eq!(to_fixed(-1.0), -FIXED_ONE);
        assert_eq!(to_fixed(-12.0), -12 * FIXED_ONE);
    }

    #[test]
    fn test_to_fixed_truncates_toward_zero() {
        // 0.6 * 65536 = 39321.6
        assert_eq!(to_fixed(0.6), 39321);
        // 0.1 * 65536 = 6553.6
        assert_eq!(to_fixed(0.1), 6553);
        // 1.2 * 65536 = 78643.2
        assert_eq!(to_fixed(1.2), 78643);
    }

    #[test]
    fn test_from_int() {
        assert_eq!(from_int(0), 0);
        assert_eq!(from_int(1), FIXED_ONE);
        assert_eq!(from_int(800), VIEW_WIDTH);
        assert_eq!(from_int(-3), to_fixed(-3.0));
    }

    #[test]
    fn test_to_float_round_trip() {
        assert_eq!(to_float(FIXED_ONE), 1.0);
        assert_eq!(to_float(FIXED_HALF), 0.5);
        assert_eq!(to_float(from_int(360)), 360.0);
        assert_eq!(to_float(to_fixed(-12.0)), -12.0);
    }

    #[test]
    fn test_game_constants() {
        // Ground line sits one margin above the bottom edge
        assert_eq!(GROUND_Y, to_fixed(360.0));
        // A grounded player's top edge: 360 - 60 = 300
        assert_eq!(GROUND_Y - PLAYER_HEIGHT, to_fixed(300.0));
        // Contact damage rates divide evenly into health
        assert_eq!(PLAYER_MAX_HEALTH % FIXED_HALF, 0);
        // A full energy bar funds exactly ten jumps
        assert_eq!(ENERGY_MAX / JUMP_ENERGY_COST, 10);
    }
}
