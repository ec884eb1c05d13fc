/// Default approach rate: the fraction of the remaining distance covered per second.
pub const DEFAULT_INTERPOLATION_RATE: f32 = 10.0;

#[inline]
fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Move `current` toward `target` by `min(delta_seconds * rate, 1)` of the gap.
///
/// Both weights are clamped to [0, 1] first. The result never passes the
/// target, and a saturated step lands exactly on it, so a long frame stall
/// cannot overshoot. Negative or non-finite deltas leave the weight in place.
pub fn interpolate_weight(current: f32, target: f32, delta_seconds: f32, rate: f32) -> f32 {
    let current = unit(current);
    let target = unit(target);

    let delta_seconds = if delta_seconds.is_finite() {
        delta_seconds.max(0.0)
    } else {
        0.0
    };
    let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };

    let factor = (delta_seconds * rate).min(1.0);
    if factor >= 1.0 {
        return target;
    }

    let next = current + (target - current) * factor;
    if current <= target {
        next.clamp(current, target)
    } else {
        next.clamp(target, current)
    }
}

/// Frame-to-frame smoother for one blendshape channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendshapeInterpolator {
    rate: f32,
}

impl Default for BlendshapeInterpolator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPOLATION_RATE)
    }
}

impl BlendshapeInterpolator {
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[inline]
    pub fn update(&self, current: f32, target: f32, delta_seconds: f32) -> f32 {
        interpolate_weight(current, target, delta_seconds, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_within_one_second_at_60fps() {
        let interpolator = BlendshapeInterpolator::default();
        let mut weight = 0.0;
        for _ in 0..60 {
            weight = interpolator.update(weight, 1.0, 1.0 / 60.0);
        }
        assert!((1.0 - weight).abs() < 0.01, "weight was {weight}");
    }

    #[test]
    fn test_large_delta_lands_on_target() {
        for delta in [0.1, 0.25, 1.0, 5.0] {
            assert_eq!(interpolate_weight(0.0, 1.0, delta, 10.0), 1.0);
            assert_eq!(interpolate_weight(0.9, 0.3, delta, 10.0), 0.3);
            assert_eq!(interpolate_weight(0.1, 0.7, delta, 10.0), 0.7);
        }
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let deltas = [0.001, 0.016, 0.033, 0.005, 0.02, 0.05, 0.016, 0.09];
        for (start, target) in [(0.0, 1.0), (1.0, 0.0), (0.2, 0.8), (0.75, 0.25), (0.5, 0.5)] {
            let mut weight: f32 = start;
            for delta in deltas {
                let next = interpolate_weight(weight, target, delta, 10.0);
                assert!((0.0..=1.0).contains(&next));
                if start <= target {
                    assert!(next >= weight && next <= target);
                } else {
                    assert!(next <= weight && next >= target);
                }
                weight = next;
            }
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(interpolate_weight(-3.0, 5.0, 1.0, 10.0), 1.0);
        assert_eq!(interpolate_weight(2.0, -1.0, 1.0, 10.0), 0.0);
        let halfway = interpolate_weight(2.0, 0.0, 0.05, 10.0);
        assert!((halfway - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_deltas_hold_position() {
        assert_eq!(interpolate_weight(0.4, 1.0, 0.0, 10.0), 0.4);
        assert_eq!(interpolate_weight(0.4, 1.0, -0.5, 10.0), 0.4);
        assert_eq!(interpolate_weight(0.4, 1.0, f32::NAN, 10.0), 0.4);
        assert_eq!(interpolate_weight(f32::NAN, 1.0, 0.0, 10.0), 0.0);
    }
}
