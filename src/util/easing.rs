//! Easing for the crossfade curve.
//!
//! The visual mix between slots follows [`smoothstep`] so the switch has no
//! visible snap at either end, while camera geometry tracks the raw linear
//! fraction.

/// Clamp to the unit interval. NaN maps to 0.
#[inline]
#[must_use]
pub fn clamp01(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// Hermite smoothstep `t²(3 - 2t)` of the clamped fraction: zero slope at
/// both ends.
#[inline]
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}
