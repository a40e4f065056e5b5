//! End-to-end commit scenarios against recording and failing fitters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use kms_color::{
    ColorError, ColorManager, CrtcColorProps, DeviceCaps, ErrorClass, InputCurveSource,
    OutputMode, PlaneColorProps, PlaneColorState, StreamColorState, SurfacePixelFormat, TfType,
    SDR_REF_WHITE_LEVEL,
};
use kms_lut::{
    gamma_ramp, identity_ramp, DrmColorCtm, DrmColorLut, GammaKind, MAX_COLOR_3DLUT_ENTRIES,
    MAX_COLOR_LEGACY_LUT_ENTRIES, MAX_COLOR_LUT_ENTRIES,
};
use kms_transfer::{
    CurveFitter, DrmTransferFunction, FitError, FitRequest, FitResult, FitScratch, PredefinedTf,
    ReferenceFitter, SampledCurve,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Regamma,
    Degamma,
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    direction: Direction,
    tf: PredefinedTf,
    map_user_ramp: bool,
    can_rom: bool,
    ramp_kind: Option<GammaKind>,
    fresh_scratch: bool,
}

/// Records every fit, and fails all of them while `fail` is set.
#[derive(Default)]
struct RecordingFitter {
    inner: ReferenceFitter,
    calls: Mutex<Vec<Call>>,
    fail: AtomicBool,
}

impl RecordingFitter {
    fn record(
        &self,
        direction: Direction,
        request: &FitRequest<'_>,
        fresh_scratch: bool,
    ) -> FitResult<()> {
        self.calls.lock().unwrap().push(Call {
            direction,
            tf: request.tf,
            map_user_ramp: request.map_user_ramp,
            can_rom: request.can_rom,
            ramp_kind: request.ramp.map(|r| r.kind),
            fresh_scratch,
        });
        if self.fail.load(Ordering::SeqCst) {
            Err(FitError::Allocation { points: 1 })
        } else {
            Ok(())
        }
    }

    fn calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

impl CurveFitter for RecordingFitter {
    fn fit_regamma(
        &self,
        request: &FitRequest<'_>,
        scratch: &mut FitScratch,
    ) -> FitResult<SampledCurve> {
        self.record(Direction::Regamma, request, scratch.is_unused())?;
        self.inner.fit_regamma(request, scratch)
    }

    fn fit_degamma(&self, request: &FitRequest<'_>) -> FitResult<SampledCurve> {
        self.record(Direction::Degamma, request, true)?;
        self.inner.fit_degamma(request)
    }
}

fn setup(caps: DeviceCaps) -> (ColorManager, Arc<RecordingFitter>) {
    let fitter = Arc::new(RecordingFitter::default());
    (ColorManager::with_fitter(caps, fitter.clone()), fitter)
}

fn cube() -> Vec<DrmColorLut> {
    (0..MAX_COLOR_3DLUT_ENTRIES)
        .map(|i| DrmColorLut::gray((i * 13) as u16))
        .collect()
}

#[test]
fn legacy_identity_gamma_selects_legacy_mode() {
    let (manager, fitter) = setup(DeviceCaps { num_3dluts: 0, has_rom: true });
    let mut stream = StreamColorState::default();
    let props = CrtcColorProps {
        gamma_lut: Some(identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES)),
        ..Default::default()
    };

    let mode = manager.configure_output(&props, &mut stream).unwrap();
    assert_eq!(mode, OutputMode::Legacy);
    assert!(stream.cm_is_degamma_srgb());
    assert!(!stream.cm_has_degamma());
    assert_eq!(stream.out_transfer_func.tf_type, TfType::DistributedPoints);
    assert_eq!(stream.out_transfer_func.tf, PredefinedTf::Srgb);

    assert_eq!(
        fitter.calls(),
        vec![Call {
            direction: Direction::Regamma,
            tf: PredefinedTf::Srgb,
            map_user_ramp: true,
            can_rom: true,
            ramp_kind: Some(GammaKind::Rgb256),
            fresh_scratch: true,
        }]
    );
}

#[test]
fn linear_regamma_tf_fits_lut_as_degamma() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let mut stream = StreamColorState::default();
    let props = CrtcColorProps {
        gamma_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 0.5)),
        regamma_tf: DrmTransferFunction::Default,
        ..Default::default()
    };
    manager.configure_output(&props, &mut stream).unwrap();

    let calls = fitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].direction, Direction::Degamma);
    assert_eq!(calls[0].tf, PredefinedTf::Linear);
    assert_eq!(calls[0].ramp_kind, Some(GammaKind::Custom));
    assert!(calls[0].map_user_ramp);
    assert_eq!(stream.out_transfer_func.sdr_ref_white_level, Some(SDR_REF_WHITE_LEVEL));
}

#[test]
fn nonlinear_regamma_tf_fits_regamma() {
    let (manager, fitter) = setup(DeviceCaps { num_3dluts: 0, has_rom: true });
    let mut stream = StreamColorState::default();
    let mut props = CrtcColorProps {
        gamma_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 0.8)),
        regamma_tf: DrmTransferFunction::Pq,
        ..Default::default()
    };
    manager.configure_output(&props, &mut stream).unwrap();

    let calls = fitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].direction, Direction::Regamma);
    assert_eq!(calls[0].tf, PredefinedTf::Pq);
    assert_eq!(calls[0].ramp_kind, Some(GammaKind::CsTfm1d));
    assert!(calls[0].can_rom);
    assert!(calls[0].fresh_scratch);
    assert_eq!(stream.out_transfer_func.tf, PredefinedTf::Pq);

    // An identity LUT is dropped, the curve alone remains
    props.gamma_lut = Some(identity_ramp(MAX_COLOR_LUT_ENTRIES));
    manager.configure_output(&props, &mut stream).unwrap();
    let calls = fitter.calls();
    assert!(!calls[0].map_user_ramp);
    assert_eq!(calls[0].ramp_kind, None);
}

#[test]
fn crtc_degamma_reaches_plane_as_distributed_points() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let mut stream = StreamColorState::default();
    let mut planes = vec![(PlaneColorProps::default(), PlaneColorState::default())];
    let crtc = CrtcColorProps {
        degamma_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.4)),
        ..Default::default()
    };

    manager.configure_commit(&crtc, &mut stream, &mut planes).unwrap();
    assert!(stream.cm_has_degamma());
    assert!(stream.out_transfer_func.is_bypass());

    let state = &planes[0].1;
    assert_eq!(state.source, InputCurveSource::CrtcDegamma);
    assert_eq!(state.in_transfer_func.tf_type, TfType::DistributedPoints);
    assert_eq!(state.in_transfer_func.tf, PredefinedTf::Linear);

    let calls = fitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].direction, Direction::Degamma);
    assert!(calls[0].map_user_ramp);
}

#[test]
fn lut3d_without_shaper_gets_bypass_shaper() {
    let (manager, fitter) = setup(DeviceCaps::new(1));
    let mut stream = StreamColorState::default();
    let props = CrtcColorProps {
        lut3d: Some(cube()),
        ..Default::default()
    };

    let mode = manager.configure_output(&props, &mut stream).unwrap();
    assert_eq!(mode, OutputMode::AtomicWithShaperAndLut3d);
    let pair = stream.shaper_lut3d.as_ref().unwrap();
    assert!(pair.shaper.is_bypass());
    assert!(pair.lut3d.initialized);
    assert_eq!(manager.pool().free(), 0);
    assert!(fitter.calls().is_empty());

    // Same request again keeps the same pair
    manager.configure_output(&props, &mut stream).unwrap();
    assert_eq!(manager.pool().free(), 0);
}

#[test]
fn legacy_update_leaves_pair_alone() {
    let (manager, _) = setup(DeviceCaps::new(1));
    let mut stream = StreamColorState::default();
    let mut props = CrtcColorProps {
        lut3d: Some(cube()),
        ..Default::default()
    };
    manager.configure_output(&props, &mut stream).unwrap();

    props.gamma_lut = Some(gamma_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES, 1.8));
    assert_eq!(manager.configure_output(&props, &mut stream).unwrap(), OutputMode::Legacy);
    assert!(stream.shaper_lut3d.is_some());
    assert_eq!(manager.pool().free(), 0);
}

#[test]
fn exhausted_pool_rejects_second_output() {
    let (manager, _) = setup(DeviceCaps::new(1));
    let props = CrtcColorProps {
        lut3d: Some(cube()),
        ctm: Some(DrmColorCtm::IDENTITY),
        ..Default::default()
    };

    let mut first = StreamColorState::default();
    manager.configure_output(&props, &mut first).unwrap();

    let mut second = StreamColorState::default();
    let err = manager.configure_output(&props, &mut second).unwrap_err();
    assert!(matches!(err, ColorError::ResourceExhausted { capacity: 1 }));
    assert_eq!(err.class(), ErrorClass::UnexpectedState);
    assert!(second.shaper_lut3d.is_none());
    assert!(!second.gamut_remap_matrix.enable_remap);

    // Freeing the first output's pair lets the second one in
    manager
        .configure_output(&CrtcColorProps::default(), &mut first)
        .unwrap();
    manager.configure_output(&props, &mut second).unwrap();
    assert!(second.shaper_lut3d.is_some());
}

#[test]
fn fit_failure_keeps_previous_state() {
    let (manager, fitter) = setup(DeviceCaps::new(1));
    let mut stream = StreamColorState::default();
    let good = CrtcColorProps {
        shaper_lut: Some(identity_ramp(MAX_COLOR_LUT_ENTRIES)),
        lut3d: Some(cube()),
        regamma_tf: DrmTransferFunction::Srgb,
        ..Default::default()
    };
    manager.configure_output(&good, &mut stream).unwrap();
    let before = stream.out_transfer_func.clone();

    fitter.fail.store(true, Ordering::SeqCst);
    let next = CrtcColorProps {
        ctm: Some(DrmColorCtm::IDENTITY),
        regamma_tf: DrmTransferFunction::Pq,
        ..Default::default()
    };
    let err = manager.configure_output(&next, &mut stream).unwrap_err();
    assert!(matches!(err, ColorError::ComputeFailure { .. }));
    assert_eq!(err.class(), ErrorClass::OutOfMemory);

    assert_eq!(stream.out_transfer_func, before);
    assert!(!stream.gamut_remap_matrix.enable_remap);
    assert!(stream.shaper_lut3d.is_some());
    assert_eq!(manager.pool().free(), 0);
}

#[test]
fn shaper_fit_failure_takes_no_pool_slot() {
    let (manager, fitter) = setup(DeviceCaps::new(1));
    fitter.fail.store(true, Ordering::SeqCst);

    let mut stream = StreamColorState::default();
    let props = CrtcColorProps {
        shaper_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.0)),
        lut3d: Some(cube()),
        ..Default::default()
    };
    assert!(manager.configure_output(&props, &mut stream).is_err());
    assert!(stream.shaper_lut3d.is_none());
    assert_eq!(manager.pool().free(), 1);
}

#[test]
fn plane_fit_failure_keeps_previous_plane_state() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let stream = StreamColorState::default();
    let props = PlaneColorProps {
        degamma_tf: DrmTransferFunction::Srgb,
        hdr_mult: 1 << 33,
        ..Default::default()
    };
    let mut state = PlaneColorState::default();

    fitter.fail.store(true, Ordering::SeqCst);
    let err = manager.configure_plane(&stream, &props, &mut state).unwrap_err();
    assert_eq!(err.class(), ErrorClass::OutOfMemory);
    assert_eq!(state, PlaneColorState::default());

    fitter.fail.store(false, Ordering::SeqCst);
    manager.configure_plane(&stream, &props, &mut state).unwrap();
    assert_eq!(state.source, InputCurveSource::PlaneTf);
    assert_eq!(state.hdr_mult.to_f64(), 2.0);
}

#[test]
fn plane_degamma_lut_uses_degamma_fit() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let stream = StreamColorState::default();
    let props = PlaneColorProps {
        degamma_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.2)),
        degamma_tf: DrmTransferFunction::Default,
        ..Default::default()
    };
    let mut state = PlaneColorState::default();

    let source = manager.configure_plane(&stream, &props, &mut state).unwrap();
    assert_eq!(source, InputCurveSource::PlaneLut);
    assert_eq!(state.in_transfer_func.tf_type, TfType::DistributedPoints);
    assert_eq!(state.in_transfer_func.tf, PredefinedTf::Linear);

    assert_eq!(
        fitter.calls(),
        vec![Call {
            direction: Direction::Degamma,
            tf: PredefinedTf::Linear,
            map_user_ramp: true,
            can_rom: false,
            ramp_kind: Some(GammaKind::Custom),
            fresh_scratch: true,
        }]
    );
}

#[test]
fn plane_lut_fit_failure_keeps_previous_plane_state() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let stream = StreamColorState::default();
    let mut state = PlaneColorState::default();
    let tf_only = PlaneColorProps {
        degamma_tf: DrmTransferFunction::Pq,
        ..Default::default()
    };
    manager.configure_plane(&stream, &tf_only, &mut state).unwrap();
    let before = state.clone();
    fitter.calls();

    fitter.fail.store(true, Ordering::SeqCst);
    let with_lut = PlaneColorProps {
        degamma_lut: Some(gamma_ramp(MAX_COLOR_LUT_ENTRIES, 2.2)),
        hdr_mult: 1 << 33,
        ..Default::default()
    };
    let err = manager.configure_plane(&stream, &with_lut, &mut state).unwrap_err();
    assert!(matches!(err, ColorError::ComputeFailure { .. }));
    assert_eq!(err.class(), ErrorClass::OutOfMemory);
    assert_eq!(state, before);

    // The LUT was the rule in play, not the earlier transfer function
    let calls = fitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].ramp_kind, Some(GammaKind::Custom));
}

#[test]
fn legacy_video_plane_fit_failure_keeps_previous_state() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let mut stream = StreamColorState::default();
    let crtc = CrtcColorProps {
        gamma_lut: Some(identity_ramp(MAX_COLOR_LEGACY_LUT_ENTRIES)),
        ..Default::default()
    };
    manager.configure_output(&crtc, &mut stream).unwrap();
    assert!(stream.cm_is_degamma_srgb());
    fitter.calls();

    let props = PlaneColorProps {
        format: SurfacePixelFormat::Video420YCbCr,
        ..Default::default()
    };
    let mut state = PlaneColorState::default();

    fitter.fail.store(true, Ordering::SeqCst);
    let err = manager.configure_plane(&stream, &props, &mut state).unwrap_err();
    assert_eq!(err.class(), ErrorClass::OutOfMemory);
    assert_eq!(state, PlaneColorState::default());

    fitter.fail.store(false, Ordering::SeqCst);
    let calls = fitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].direction, Direction::Degamma);
    assert_eq!(calls[0].tf, PredefinedTf::Bt709);

    let source = manager.configure_plane(&stream, &props, &mut state).unwrap();
    assert_eq!(source, InputCurveSource::LegacySrgb);
    assert_eq!(state.in_transfer_func.tf_type, TfType::Predefined);
    assert_eq!(state.in_transfer_func.tf, PredefinedTf::Bt709);
    assert!(state.in_transfer_func.points.is_some());
}

#[test]
fn size_errors_leave_state_untouched() {
    let (manager, fitter) = setup(DeviceCaps::default());
    let mut stream = StreamColorState::default();
    let props = CrtcColorProps {
        lut3d: Some(cube()),
        ctm: Some(DrmColorCtm::IDENTITY),
        ..Default::default()
    };

    let err = manager.configure_output(&props, &mut stream).unwrap_err();
    assert!(matches!(err, ColorError::InvalidSize { got: MAX_COLOR_3DLUT_ENTRIES, .. }));
    assert_eq!(err.class(), ErrorClass::InvalidArgument);
    assert!(!stream.gamut_remap_matrix.enable_remap);
    assert!(fitter.calls().is_empty());
}
