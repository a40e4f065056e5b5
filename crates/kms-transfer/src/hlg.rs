//! Hybrid Log-Gamma.
//!
//! # Reference
//!
//! ITU-R BT.2100-2

const A: f32 = 0.17883277;
const B: f32 = 0.28466892; // 1 - 4*A
const C: f32 = 0.55991073; // 0.5 - A*ln(4*A)

/// HLG OETF: encodes scene linear [0, 1].
#[inline]
pub fn oetf(e: f32) -> f32 {
    if e <= 0.0 {
        0.0
    } else if e <= 1.0 / 12.0 {
        (3.0 * e).sqrt()
    } else {
        A * (12.0 * e - B).ln() + C
    }
}

/// HLG inverse OETF: decodes to scene linear [0, 1].
#[inline]
pub fn eotf(ep: f32) -> f32 {
    if ep <= 0.0 {
        0.0
    } else if ep <= 0.5 {
        ep * ep / 3.0
    } else {
        (((ep - C) / A).exp() + B) / 12.0
    }
}
