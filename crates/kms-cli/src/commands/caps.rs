//! Device capability report.

use anyhow::Result;
use kms_color::DeviceCaps;
use kms_lut::{MAX_COLOR_3DLUT_ENTRIES, MAX_COLOR_LUT_ENTRIES};

/// Prints the effective capabilities and the LUT sizes they accept.
pub fn run(caps: DeviceCaps) -> Result<()> {
    println!("Device caps");
    println!("  3D LUTs:     {}", caps.num_3dluts);
    println!("  ROM curves:  {}", if caps.has_rom { "yes" } else { "no" });
    println!("  Shaper size: {}", caps.lut3d_size(MAX_COLOR_LUT_ENTRIES));
    println!("  3D LUT size: {}", caps.lut3d_size(MAX_COLOR_3DLUT_ENTRIES));
    Ok(())
}
