//! Change-detection gate for work that reads lazily recomputed data.
//!
//! After a swap the renderer's downstream point data still holds the old
//! scene until the host recomputes it. Regenerating rest positions before
//! that would capture the wrong scene, so the gate remembers a fingerprint
//! of the pre-swap data and only lets the regeneration through once the
//! live fingerprint differs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::host::Host;

/// Highest index sampled near the end of the point data.
pub const FINGERPRINT_TAIL_INDEX: usize = 1000;

/// Quantized sample of downstream point positions, for equality only.
///
/// Samples the first, middle, and `min(n - 1, 1000)`-th point, each
/// coordinate truncated to integer millimetres so float noise does not
/// register as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([[i32; 3]; 3]);

impl Fingerprint {
    /// Indices sampled from `count` points.
    #[must_use]
    pub fn sample_indices(count: usize) -> [usize; 3] {
        let last = count.saturating_sub(1);
        [0, count / 2, last.min(FINGERPRINT_TAIL_INDEX)]
    }

    /// Fingerprint over `count` points read through `point`. `None` when
    /// there are no points or a sampled point is unavailable.
    pub fn from_points(
        count: usize,
        point: impl Fn(usize) -> Option<Vec3>,
    ) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let mut samples = [[0; 3]; 3];
        for (sample, index) in
            samples.iter_mut().zip(Self::sample_indices(count))
        {
            *sample = quantize(point(index)?);
        }
        Some(Self(samples))
    }

    /// Fingerprint of a point slice.
    #[must_use]
    pub fn from_slice(points: &[Vec3]) -> Option<Self> {
        Self::from_points(points.len(), |i| points.get(i).copied())
    }

    /// Fingerprint of the host's live downstream data.
    pub fn capture<H: Host + ?Sized>(host: &H) -> Option<Self> {
        Self::from_points(host.point_count(), |i| host.point(i))
    }

    /// Quantized samples.
    #[must_use]
    pub fn samples(&self) -> [[i32; 3]; 3] {
        self.0
    }
}

/// Millimetre quantization; `as` truncates toward zero and saturates.
fn quantize(p: Vec3) -> [i32; 3] {
    [
        (p.x * 1000.0) as i32,
        (p.y * 1000.0) as i32,
        (p.z * 1000.0) as i32,
    ]
}

/// Gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConsistencyGate {
    /// Nothing pending.
    #[default]
    Clear,
    /// Waiting for the live fingerprint to move away from `expected`.
    AwaitingChange {
        /// Fingerprint captured just before the swap.
        expected: Option<Fingerprint>,
    },
}

impl ConsistencyGate {
    /// Start waiting for the data to move away from `before`.
    pub fn arm(&mut self, before: Option<Fingerprint>) {
        *self = Self::AwaitingChange { expected: before };
    }

    /// Whether a change is still pending.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::AwaitingChange { .. })
    }

    /// Compare the live fingerprint against the expected one. Returns true
    /// (and clears) exactly once, on the first poll that sees a change.
    /// There is no timeout: unchanged data keeps the gate waiting.
    pub fn poll(&mut self, current: Option<Fingerprint>) -> bool {
        match *self {
            Self::AwaitingChange { expected } if current != expected => {
                *self = Self::Clear;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize, offset: f32) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let i = i as f32;
                Vec3::new(i + 0.25 + offset, -i - 0.5, 2.5)
            })
            .collect()
    }

    #[test]
    fn sample_indices_cap_near_thousand() {
        assert_eq!(Fingerprint::sample_indices(1), [0, 0, 0]);
        assert_eq!(Fingerprint::sample_indices(10), [0, 5, 9]);
        assert_eq!(Fingerprint::sample_indices(50_000), [0, 25_000, 1000]);
    }

    #[test]
    fn quantizes_to_truncated_millimetres() {
        let fp = Fingerprint::from_slice(&[Vec3::new(1.2345, -0.0019, 3.0)])
            .unwrap();
        assert_eq!(fp.samples()[0], [1234, -1, 3000]);
    }

    #[test]
    fn sub_millimetre_noise_is_ignored() {
        let a = Fingerprint::from_slice(&points(2000, 0.0));
        let b = Fingerprint::from_slice(&points(2000, 0.000_01));
        assert_eq!(a, b);
        let c = Fingerprint::from_slice(&points(2000, 0.5));
        assert_ne!(a, c);
    }

    #[test]
    fn empty_data_has_no_fingerprint() {
        assert_eq!(Fingerprint::from_slice(&[]), None);
        assert_eq!(Fingerprint::from_points(5, |_| None), None);
    }

    #[test]
    fn gate_fires_once_on_change() {
        let before = Fingerprint::from_slice(&points(100, 0.0));
        let after = Fingerprint::from_slice(&points(100, 1.0));

        let mut gate = ConsistencyGate::default();
        assert!(!gate.poll(after));

        gate.arm(before);
        assert!(gate.is_waiting());
        assert!(!gate.poll(before));
        assert!(!gate.poll(before));
        assert!(gate.poll(after));
        assert!(!gate.is_waiting());
        assert!(!gate.poll(after));
    }

    #[test]
    fn gate_treats_appearing_data_as_change() {
        let mut gate = ConsistencyGate::default();
        gate.arm(None);
        assert!(!gate.poll(None));
        assert!(gate.poll(Fingerprint::from_slice(&points(3, 0.0))));
    }
}
