//! BT.709 transfer function.
//!
//! Also used as the implicit base curve for 4:2:0 YCbCr video surfaces,
//! since the hardware has no dedicated BT.601 curve.
//!
//! # Reference
//!
//! ITU-R BT.709-6

/// BT.709 inverse OETF: decodes encoded [0, 1] to linear [0, 1].
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v < 0.081 {
        v / 4.5
    } else {
        ((v + 0.099) / 1.099).powf(1.0 / 0.45)
    }
}

/// BT.709 OETF: encodes linear [0, 1].
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l < 0.018 {
        4.5 * l
    } else {
        1.099 * l.powf(0.45) - 0.099
    }
}
