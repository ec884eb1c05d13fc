use std::collections::BTreeMap;

use super::interpolator::BlendshapeInterpolator;
use crate::config::LipSyncConfig;
use crate::core::viseme::{NEUTRAL_VISEME, VISEME_BLENDSHAPES, VISEME_COUNT, VisemeSnapshot};

/// Blendshape weights keyed by renderer target name.
pub type BlendshapeWeights = BTreeMap<&'static str, f32>;

/// Drives one interpolated channel per viseme id.
///
/// Exactly one channel targets the active intensity; every other channel
/// decays toward zero.
#[derive(Debug, Clone)]
pub struct MouthAnimator {
    interpolator: BlendshapeInterpolator,
    weights: [f32; VISEME_COUNT],
    targets: [f32; VISEME_COUNT],
}

impl Default for MouthAnimator {
    fn default() -> Self {
        Self::new(BlendshapeInterpolator::default())
    }
}

impl MouthAnimator {
    /// Starts with the mouth fully at rest.
    pub fn new(interpolator: BlendshapeInterpolator) -> Self {
        let mut weights = [0.0; VISEME_COUNT];
        weights[NEUTRAL_VISEME as usize] = 1.0;
        Self {
            interpolator,
            weights,
            targets: weights,
        }
    }

    pub fn from_config(config: &LipSyncConfig) -> Self {
        Self::new(BlendshapeInterpolator::new(config.interpolation_rate))
    }

    /// Make `viseme_id` the active channel with the given intensity.
    /// Unknown ids fall back to the neutral channel.
    pub fn set_target(&mut self, viseme_id: u8, intensity: f32) {
        let index = if (viseme_id as usize) < VISEME_COUNT {
            viseme_id as usize
        } else {
            NEUTRAL_VISEME as usize
        };
        self.targets = [0.0; VISEME_COUNT];
        self.targets[index] = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
    }

    pub fn rest(&mut self) {
        self.set_target(NEUTRAL_VISEME, 1.0);
    }

    /// Advance every channel by `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f32) {
        for (weight, target) in self.weights.iter_mut().zip(self.targets.iter()) {
            *weight = self.interpolator.update(*weight, *target, delta_seconds);
        }
    }

    /// Frame helper: target the snapshot's viseme at full intensity and step.
    pub fn apply(&mut self, snapshot: &VisemeSnapshot, delta_seconds: f32) -> BlendshapeWeights {
        self.set_target(snapshot.viseme_id, 1.0);
        self.step(delta_seconds);
        self.weights()
    }

    /// Current weight of one viseme channel.
    pub fn weight(&self, viseme_id: u8) -> f32 {
        self.weights.get(viseme_id as usize).copied().unwrap_or(0.0)
    }

    /// Weights per blendshape name; ids sharing a name combine by maximum.
    pub fn weights(&self) -> BlendshapeWeights {
        let mut out = BlendshapeWeights::new();
        for (name, weight) in VISEME_BLENDSHAPES.iter().zip(self.weights.iter()) {
            let entry = out.entry(*name).or_insert(0.0);
            *entry = entry.max(*weight);
        }
        out
    }

    /// The channel with the highest weight.
    pub fn dominant(&self) -> u8 {
        let mut best = NEUTRAL_VISEME as usize;
        for (index, weight) in self.weights.iter().enumerate() {
            if *weight > self.weights[best] {
                best = index;
            }
        }
        best as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_rest() {
        let animator = MouthAnimator::default();
        assert_eq!(animator.weight(0), 1.0);
        assert_eq!(animator.dominant(), 0);
        let weights = animator.weights();
        assert_eq!(weights["viseme_sil"], 1.0);
        assert_eq!(weights["viseme_aa"], 0.0);
    }

    #[test]
    fn test_weights_cover_every_blendshape_name() {
        let weights = MouthAnimator::default().weights();
        // 22 ids share 15 distinct names.
        assert_eq!(weights.len(), 15);
    }

    #[test]
    fn test_apply_moves_toward_active_viseme() {
        let mut animator = MouthAnimator::default();
        let snapshot = VisemeSnapshot {
            viseme_id: 10,
            timestamp_ms: 0.0,
            duration_ms: 120.0,
        };

        let first = animator.apply(&snapshot, 1.0 / 60.0);
        assert!(first["viseme_aa"] > 0.0 && first["viseme_aa"] < 1.0);
        assert!(first["viseme_sil"] < 1.0);

        for _ in 0..59 {
            animator.apply(&snapshot, 1.0 / 60.0);
        }
        assert!(animator.weight(10) > 0.99);
        assert!(animator.weight(0) < 0.01);
        assert_eq!(animator.dominant(), 10);
    }

    #[test]
    fn test_shared_names_combine_by_max() {
        let mut animator = MouthAnimator::default();
        animator.set_target(15, 0.6);
        animator.step(1.0);
        assert_eq!(animator.weight(15), 0.6);
        assert_eq!(animator.weight(10), 0.0);
        assert_eq!(animator.weights()["viseme_aa"], 0.6);
    }

    #[test]
    fn test_unknown_id_targets_rest() {
        let mut animator = MouthAnimator::default();
        animator.set_target(4, 1.0);
        animator.step(1.0);
        animator.set_target(99, 1.0);
        animator.step(1.0);
        assert_eq!(animator.weight(0), 1.0);
        assert_eq!(animator.weight(4), 0.0);
    }
}
