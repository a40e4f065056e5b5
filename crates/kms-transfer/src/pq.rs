//! SMPTE ST 2084 Perceptual Quantizer.
//!
//! Linear values here are normalized so that 1.0 is 10000 cd/m2.

const M1: f32 = 2610.0 / 16384.0;
const M2: f32 = 2523.0 / 4096.0 * 128.0;
const C1: f32 = 3424.0 / 4096.0;
const C2: f32 = 2413.0 / 4096.0 * 32.0;
const C3: f32 = 2392.0 / 4096.0 * 32.0;

/// PQ EOTF: decodes a PQ signal to normalized linear [0, 1].
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.0 {
        return 0.0;
    }
    let vp = v.powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    let den = C2 - C3 * vp;
    (num / den).powf(1.0 / M1)
}

/// PQ inverse EOTF: encodes normalized linear [0, 1].
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0 {
        return 0.0;
    }
    let yp = l.min(1.0).powf(M1);
    ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2)
}
