//! sRGB transfer function.
//!
//! Piecewise curve: a linear toe near black and a 2.4 power segment.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// sRGB EOTF: decodes encoded [0, 1] to linear [0, 1].
///
/// ```rust
/// use kms_transfer::srgb::eotf;
///
/// assert!((eotf(0.5) - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB inverse EOTF: encodes linear [0, 1].
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            assert!((oetf(eotf(v)) - v).abs() < 1e-5, "v={}", v);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(eotf(0.0), 0.0);
        assert!((eotf(1.0) - 1.0).abs() < 1e-6);
        assert!((oetf(1.0) - 1.0).abs() < 1e-6);
    }
}
