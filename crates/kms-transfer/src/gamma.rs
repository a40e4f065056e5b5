//! Pure power-law curves (2.2, 2.4, 2.6).

/// Decodes with `v^gamma`.
#[inline]
pub fn eotf(v: f32, gamma: f32) -> f32 {
    if v <= 0.0 { 0.0 } else { v.powf(gamma) }
}

/// Encodes with `l^(1/gamma)`.
#[inline]
pub fn oetf(l: f32, gamma: f32) -> f32 {
    if l <= 0.0 { 0.0 } else { l.powf(1.0 / gamma) }
}
