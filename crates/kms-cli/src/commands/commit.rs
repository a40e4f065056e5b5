//! Commit command: runs a commit description through the pipeline.

use std::fmt::Write;

use anyhow::{Context, Result};
use kms_color::{
    ColorManager, DeviceCaps, OutputMode, PlaneColorProps, PlaneColorState, StreamColorState,
    TfType, TransferFunc,
};
use tracing::info;

use crate::model::Commit;
use crate::CommitArgs;

/// Runs the commit command.
pub fn run(args: CommitArgs, caps: DeviceCaps, verbose: bool) -> Result<()> {
    let commit = Commit::from_file(&args.input)?;
    let crtc = commit.crtc_props()?;
    let mut planes: Vec<(PlaneColorProps, PlaneColorState)> = commit
        .plane_props()?
        .into_iter()
        .map(|p| (p, PlaneColorState::default()))
        .collect();

    let manager = ColorManager::new(caps);
    let mut stream = StreamColorState::default();
    for pass in 1..=args.repeat.max(1) {
        manager
            .configure_commit(&crtc, &mut stream, &mut planes)
            .with_context(|| format!("Commit rejected (pass {})", pass))?;
    }
    info!(input = %args.input.display(), planes = planes.len(), "commit applied");

    print!("{}", render(&manager, &stream, &planes, verbose));
    Ok(())
}

fn mode_name(mode: OutputMode) -> &'static str {
    match mode {
        OutputMode::Legacy => "legacy gamma",
        OutputMode::AtomicNoSpecialBlocks => "atomic",
        OutputMode::AtomicWithShaperAndLut3d => "atomic + shaper/3D LUT",
    }
}

fn describe(func: &TransferFunc) -> String {
    let mut s = match func.tf_type {
        TfType::Bypass => return "bypass".to_string(),
        TfType::Predefined => format!("predefined {}", func.tf),
        TfType::DistributedPoints => format!("distributed points, {}", func.tf),
    };
    if let Some(points) = &func.points {
        let _ = write!(s, ", {} points", points.len());
    }
    if let Some(white) = func.sdr_ref_white_level {
        let _ = write!(s, ", white {} nits", white);
    }
    s
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

/// Formats the programmed pipeline.
pub fn render(
    manager: &ColorManager,
    stream: &StreamColorState,
    planes: &[(PlaneColorProps, PlaneColorState)],
    verbose: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Output");
    let _ = writeln!(out, "  Mode:         {}", mode_name(stream.mode()));
    let _ = writeln!(out, "  Regamma:      {}", describe(&stream.out_transfer_func));
    let _ = writeln!(out, "  CRTC degamma: {}", yes_no(stream.cm_has_degamma()));
    let _ = writeln!(out, "  Legacy sRGB:  {}", yes_no(stream.cm_is_degamma_srgb()));

    let remap = &stream.gamut_remap_matrix;
    let _ = writeln!(
        out,
        "  Gamut remap:  {}",
        if remap.enable_remap { "enabled" } else { "bypass" }
    );
    if verbose && remap.enable_remap {
        for row in 0..3 {
            let _ = writeln!(
                out,
                "    [{} {} {} {}]",
                remap.get(row, 0),
                remap.get(row, 1),
                remap.get(row, 2),
                remap.get(row, 3)
            );
        }
    }

    match &stream.shaper_lut3d {
        Some(pair) => {
            let _ = writeln!(out, "  Shaper:       {}", describe(&pair.shaper));
            let _ = writeln!(
                out,
                "  3D LUT:       {}x{}x{}x{} entries, {}",
                pair.lut3d.lut0.len(),
                pair.lut3d.lut1.len(),
                pair.lut3d.lut2.len(),
                pair.lut3d.lut3.len(),
                if pair.lut3d.use_12bits { "12-bit" } else { "10-bit" }
            );
        }
        None => {
            let _ = writeln!(out, "  Shaper/3D:    none");
        }
    }
    let pool = manager.pool();
    let _ = writeln!(out, "  3D LUT pool:  {}/{} free", pool.free(), pool.capacity());

    for (i, (props, state)) in planes.iter().enumerate() {
        let _ = writeln!(out, "Plane {}", i);
        if verbose {
            let _ = writeln!(out, "  Format:       {:?}", props.format);
        }
        let _ = writeln!(out, "  Source:       {:?}", state.source);
        let _ = writeln!(out, "  Input curve:  {}", describe(&state.in_transfer_func));
        let _ = writeln!(out, "  HDR mult:     {}", state.hdr_mult);
    }
    out
}
