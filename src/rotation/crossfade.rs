//! Crossfade state machine.
//!
//! `Idle → Armed` once the cycle passes back below the arm threshold, so a
//! blend can never re-trigger in the cycle it just finished in.
//! `Armed → Blending` near the end of the cycle once the next scene is
//! preloaded. `Blending → Idle` after the wall-clock blend duration, which
//! is independent of the cycle length.

use serde::{Deserialize, Serialize};

use super::buffer::Slot;
use crate::util::easing::{clamp01, smoothstep};

/// Where the crossfade is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CrossfadePhase {
    /// Waiting for the cycle to pass the arm threshold.
    #[default]
    Idle,
    /// Ready to start once the cycle reaches the blend start.
    Armed,
    /// Blending since `start` (seconds of tick time).
    Blending {
        /// Tick time at which the blend began.
        start: f64,
    },
}

/// Result of advancing the crossfade by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendStep {
    /// No blend in progress.
    Steady,
    /// Mid-blend.
    InProgress {
        /// Raw elapsed fraction in `[0, 1]`; drives camera geometry.
        fraction: f32,
        /// Smoothstepped fraction; drives the visual mix.
        eased: f32,
    },
    /// The blend finished this tick; the slots must swap.
    Complete,
}

/// Crossfade controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Crossfade {
    phase: CrossfadePhase,
}

impl Crossfade {
    /// Idle crossfade.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CrossfadePhase {
        self.phase
    }

    /// Whether a blend is running.
    #[must_use]
    pub fn is_blending(&self) -> bool {
        matches!(self.phase, CrossfadePhase::Blending { .. })
    }

    /// Arm once the cycle is below `arm_threshold`.
    pub fn observe_cycle(&mut self, cycle_position: f32, arm_threshold: f32) {
        if self.phase == CrossfadePhase::Idle && cycle_position < arm_threshold
        {
            self.phase = CrossfadePhase::Armed;
        }
    }

    /// Start blending if armed, past `blend_start`, and the next scene is
    /// preloaded. Returns whether the blend started.
    pub fn try_start(
        &mut self,
        cycle_position: f32,
        preloaded: bool,
        now: f64,
        blend_start: f32,
    ) -> bool {
        if self.phase == CrossfadePhase::Armed
            && preloaded
            && cycle_position >= blend_start
        {
            self.phase = CrossfadePhase::Blending { start: now };
            true
        } else {
            false
        }
    }

    /// Advance the blend to `now`. Completion returns the controller to
    /// `Idle`; it re-arms on a later tick.
    pub fn step(&mut self, now: f64, duration: f32) -> BlendStep {
        let CrossfadePhase::Blending { start } = self.phase else {
            return BlendStep::Steady;
        };
        let elapsed = now - start;
        if elapsed >= f64::from(duration) {
            self.phase = CrossfadePhase::Idle;
            return BlendStep::Complete;
        }
        let fraction = clamp01((elapsed / f64::from(duration)) as f32);
        BlendStep::InProgress {
            fraction,
            eased: smoothstep(fraction),
        }
    }

    /// Drop an in-flight blend back to `Armed` (used on resume, where the
    /// previous session's clock no longer applies).
    pub fn interrupt(&mut self) {
        if self.is_blending() {
            self.phase = CrossfadePhase::Armed;
        }
    }
}

/// Blend control value: the active slot id, moved towards the inactive one
/// by `progress`.
#[must_use]
pub fn blend_control(active: Slot, progress: f32) -> f32 {
    let from = active.as_f32();
    let to = active.other().as_f32();
    from + (to - from) * progress
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arms_only_below_threshold() {
        let mut fade = Crossfade::new();
        fade.observe_cycle(0.7, 0.5);
        assert_eq!(fade.phase(), CrossfadePhase::Idle);
        fade.observe_cycle(0.3, 0.5);
        assert_eq!(fade.phase(), CrossfadePhase::Armed);
    }

    #[test]
    fn starts_only_when_armed_late_and_preloaded() {
        let mut fade = Crossfade::new();
        assert!(!fade.try_start(0.95, true, 1.0, 0.9));

        fade.observe_cycle(0.1, 0.5);
        assert!(!fade.try_start(0.85, true, 1.0, 0.9));
        assert!(!fade.try_start(0.95, false, 1.0, 0.9));
        assert!(fade.try_start(0.9, true, 2.0, 0.9));
        assert_eq!(fade.phase(), CrossfadePhase::Blending { start: 2.0 });
        // Already blending
        assert!(!fade.try_start(0.95, true, 3.0, 0.9));
    }

    #[test]
    fn step_progress_and_completion() {
        let mut fade = Crossfade::new();
        fade.observe_cycle(0.0, 0.5);
        assert!(fade.try_start(0.95, true, 10.0, 0.9));

        assert!(matches!(
            fade.step(12.5, 5.0),
            BlendStep::InProgress { fraction, eased }
                if (fraction - 0.5).abs() < 1e-6 && (eased - 0.5).abs() < 1e-6
        ));
        // smoothstep(0.2) = 0.04 * 2.6
        assert!(matches!(
            fade.step(11.0, 5.0),
            BlendStep::InProgress { fraction, eased }
                if (fraction - 0.2).abs() < 1e-6 && (eased - 0.104).abs() < 1e-6
        ));

        assert_eq!(fade.step(15.0, 5.0), BlendStep::Complete);
        assert_eq!(fade.phase(), CrossfadePhase::Idle);
        assert_eq!(fade.step(16.0, 5.0), BlendStep::Steady);
    }

    #[test]
    fn clock_behind_start_holds_at_zero() {
        let mut fade = Crossfade::new();
        fade.observe_cycle(0.0, 0.5);
        assert!(fade.try_start(0.95, true, 10.0, 0.9));
        assert_eq!(
            fade.step(9.0, 5.0),
            BlendStep::InProgress {
                fraction: 0.0,
                eased: 0.0
            }
        );
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut fade = Crossfade::new();
        fade.observe_cycle(0.0, 0.5);
        assert!(fade.try_start(0.95, true, 4.0, 0.9));
        assert_eq!(fade.step(4.0, 0.0), BlendStep::Complete);
    }

    #[test]
    fn interrupt_rearms() {
        let mut fade = Crossfade::new();
        fade.observe_cycle(0.0, 0.5);
        assert!(fade.try_start(0.95, true, 4.0, 0.9));
        fade.interrupt();
        assert_eq!(fade.phase(), CrossfadePhase::Armed);
    }

    #[test]
    fn blend_control_between_slots() {
        assert_eq!(blend_control(Slot::A, 0.0), 0.0);
        assert_eq!(blend_control(Slot::A, 1.0), 1.0);
        assert_eq!(blend_control(Slot::B, 0.0), 1.0);
        assert_eq!(blend_control(Slot::B, 1.0), 0.0);
        assert!((blend_control(Slot::B, 0.25) - 0.75).abs() < 1e-6);
    }
}
