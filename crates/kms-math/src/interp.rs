//! Interpolation over sampled ramps.

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
///
/// ```rust
/// use kms_math::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// ```
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Samples a uniformly spaced ramp at `x` in [0, 1].
///
/// The ramp covers [0, 1] with `ramp.len()` evenly distributed points.
/// Inputs outside the domain are clamped to the end points. An empty ramp
/// acts as identity.
///
/// ```rust
/// use kms_math::sample_ramp;
///
/// let ramp = [0.0, 0.5, 1.0];
/// assert_eq!(sample_ramp(&ramp, 0.25), 0.25);
/// ```
pub fn sample_ramp(ramp: &[f32], x: f32) -> f32 {
    match ramp.len() {
        0 => x,
        1 => ramp[0],
        len => {
            let pos = x.clamp(0.0, 1.0) * (len - 1) as f32;
            let i0 = (pos.floor() as usize).min(len - 2);
            lerp(ramp[i0], ramp[i0 + 1], pos - i0 as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_sample_ramp() {
        let ramp = [0.0, 0.25, 1.0];
        assert_relative_eq!(sample_ramp(&ramp, 0.0), 0.0);
        assert_relative_eq!(sample_ramp(&ramp, 0.5), 0.25);
        assert_relative_eq!(sample_ramp(&ramp, 0.75), 0.625);
        assert_relative_eq!(sample_ramp(&ramp, 1.0), 1.0);
        // Clamped outside the domain
        assert_relative_eq!(sample_ramp(&ramp, 2.0), 1.0);
        assert_relative_eq!(sample_ramp(&ramp, -1.0), 0.0);
    }

    #[test]
    fn test_degenerate_ramps() {
        assert_eq!(sample_ramp(&[], 0.3), 0.3);
        assert_eq!(sample_ramp(&[0.7], 0.3), 0.7);
    }
}
