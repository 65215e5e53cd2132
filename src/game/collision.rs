//! Collision Detection
//!
//! Buffered axis-aligned box overlap - the single collision primitive the
//! whole game is built on. Contact damage, melee reach, and the rescue
//! check are all this test at different buffer values.

use crate::core::fixed::Fixed;
use crate::game::state::{Body, Hitbox};

/// Check whether box `a` overlaps box `b` after insetting `b` by `buffer`
/// on all four edges.
///
/// A positive buffer shrinks the region that counts as overlap on both
/// axes, so a larger buffer is a stricter test. Buffer 0 is the plain
/// overlap test. Inequalities are strict: boxes that merely touch edges
/// do not overlap. A buffer past half of `b`'s extent crosses the
/// midline; `a` must then straddle the crossing band, which is how the
/// melee reach values behave against the narrower hostiles.
#[inline]
pub fn boxes_overlap(a: &Body, b: &Body, buffer: Fixed) -> bool {
    a.x < b.x + b.width - buffer
        && a.x + a.width > b.x + buffer
        && a.y < b.y + b.height - buffer
        && a.y + a.height > b.y + buffer
}

/// Plain overlap test between two entities.
#[inline]
pub fn touching<A: Hitbox, B: Hitbox>(a: &A, b: &B) -> bool {
    boxes_overlap(a.body(), b.body(), 0)
}

/// Buffered overlap test between two entities.
///
/// Used for melee reach (level's `attack_reach`) and the rescue check
/// (`RESCUE_REACH`), where plain touching is too generous.
#[inline]
pub fn in_reach<A: Hitbox, B: Hitbox>(a: &A, b: &B, buffer: Fixed) -> bool {
    boxes_overlap(a.body(), b.body(), buffer)
}
