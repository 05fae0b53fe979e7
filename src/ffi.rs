// This is free and unencumbered software released into the public domain.

// C ABI for the frame adapter.
// Exposed for hosts that link the library directly (NDK C/C++, Swift).
// The JNI entry points in `android` marshal into the same code path.

use crate::shared::{
    FrameError, FrameProcessor, FrameStats, PlaneView, ProcessingMode, ProcessorConfig, Thresholds,
    YuvFrame, chroma_dimensions, positive,
};
use core::ffi::{c_char, c_double};
use core::slice;

/// Status codes returned by the FFI API.
///
/// These map directly from [`FrameError`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EdgeViewerStatus {
    /// No error.
    Ok = 0,
    /// Null plane, non-positive dimension or stride, undersized buffer, or
    /// malformed options. Nothing was written.
    InvalidArgument = 1,
}

/// Map internal `FrameError` to FFI status codes.
impl From<FrameError> for EdgeViewerStatus {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::InvalidArgument(_) => EdgeViewerStatus::InvalidArgument,
        }
    }
}

pub const EDGE_VIEWER_MODE_EDGES: u32 = 0;
pub const EDGE_VIEWER_MODE_PREVIEW: u32 = 1;
pub const EDGE_VIEWER_MODE_OVERLAY: u32 = 2;

/// Processing options as seen from C.
///
/// Obtain defaults with [`edge_viewer_default_options`] and adjust fields;
/// passing NULL instead of a pointer to this struct means the defaults.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeViewerOptions {
    pub low_threshold: c_double,
    pub high_threshold: c_double,
    pub l2_gradient: bool,
    /// One of the `EDGE_VIEWER_MODE_*` constants.
    pub mode: u32,
    /// Overwrite the luminance plane with the edge map. Only then is the
    /// `y` pointer of [`edge_viewer_process_frame`] written through.
    pub write_back_luma: bool,
    /// Byte distance between neighbouring U (and V) samples: 1 for planar
    /// I420, 2 for the interleaved layouts Android commonly hands out.
    pub chroma_pixel_stride: u32,
}

impl From<&ProcessorConfig> for EdgeViewerOptions {
    fn from(config: &ProcessorConfig) -> Self {
        Self {
            low_threshold: config.thresholds.low(),
            high_threshold: config.thresholds.high(),
            l2_gradient: config.l2_gradient,
            mode: match config.mode {
                ProcessingMode::Edges => EDGE_VIEWER_MODE_EDGES,
                ProcessingMode::Preview => EDGE_VIEWER_MODE_PREVIEW,
                ProcessingMode::Overlay => EDGE_VIEWER_MODE_OVERLAY,
            },
            write_back_luma: config.write_back_luma,
            chroma_pixel_stride: config.chroma_pixel_stride as u32,
        }
    }
}

impl TryFrom<&EdgeViewerOptions> for ProcessorConfig {
    type Error = FrameError;

    fn try_from(options: &EdgeViewerOptions) -> Result<Self, Self::Error> {
        let mode = match options.mode {
            EDGE_VIEWER_MODE_EDGES => ProcessingMode::Edges,
            EDGE_VIEWER_MODE_PREVIEW => ProcessingMode::Preview,
            EDGE_VIEWER_MODE_OVERLAY => ProcessingMode::Overlay,
            other => return Err(FrameError::invalid_argument(format!("unknown mode {other}"))),
        };
        let thresholds = Thresholds::checked(options.low_threshold, options.high_threshold)?;
        if options.chroma_pixel_stride == 0 {
            return Err(FrameError::invalid_argument("chroma pixel stride must be positive"));
        }
        Ok(ProcessorConfig {
            thresholds,
            ..ProcessorConfig::default()
        }
        .with_l2_gradient(options.l2_gradient)
        .with_mode(mode)
        .with_write_back_luma(options.write_back_luma)
        .with_chroma_pixel_stride(options.chroma_pixel_stride as usize))
    }
}

/// A caller-owned plane as it arrives over a foreign boundary.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawPlane {
    pub ptr: *mut u8,
    pub len: usize,
    pub stride: i32,
}

/// Validate and process one frame given as raw pointers.
///
/// All checks run before the first write.
///
/// # Safety
///
/// Every non-null pointer must be valid for reads of its `len` bytes for the
/// duration of the call; `output` must also be valid for writes, and so must
/// `y` when `config.write_back_luma` is set. The writable regions must not
/// overlap any other plane. Chroma planes may overlap each other.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn process_frame_raw(
    y: RawPlane,
    u: RawPlane,
    v: RawPlane,
    width: i32,
    height: i32,
    output: *mut u8,
    output_len: usize,
    config: &ProcessorConfig,
) -> Result<FrameStats, FrameError> {
    for (name, plane) in [("y", &y), ("u", &u), ("v", &v)] {
        if plane.ptr.is_null() {
            return Err(FrameError::null_plane(name));
        }
    }
    if output.is_null() {
        return Err(FrameError::null_plane("output"));
    }

    let width = positive("width", width)?;
    let height = positive("height", height)?;
    let y_stride = positive("y stride", y.stride)?;
    let u_stride = positive("u stride", u.stride)?;
    let v_stride = positive("v stride", v.stride)?;
    let (cw, ch) = chroma_dimensions(width, height);
    let cps = config.chroma_pixel_stride;

    let (u_data, v_data, output) = unsafe {
        (
            slice::from_raw_parts(u.ptr as *const u8, u.len),
            slice::from_raw_parts(v.ptr as *const u8, v.len),
            slice::from_raw_parts_mut(output, output_len),
        )
    };
    let u_plane = PlaneView::named("u", u_data, cw, ch, u_stride, cps)?;
    let v_plane = PlaneView::named("v", v_data, cw, ch, v_stride, cps)?;

    let mut processor = FrameProcessor::new(config.clone());
    if config.write_back_luma {
        let y_data = unsafe { slice::from_raw_parts_mut(y.ptr, y.len) };
        processor.process_frame_in_place(y_data, y_stride, u_plane, v_plane, width, height, output)
    } else {
        let y_data = unsafe { slice::from_raw_parts(y.ptr as *const u8, y.len) };
        let frame = YuvFrame::new(PlaneView::named("y", y_data, width, height, y_stride, 1)?, u_plane, v_plane)?;
        processor.process_frame(&frame, output)
    }
}

pub(crate) fn report(result: Result<FrameStats, FrameError>) -> EdgeViewerStatus {
    match result {
        Ok(_) => EdgeViewerStatus::Ok,
        Err(err) => {
            #[cfg(feature = "tracing")]
            asimov_module::tracing::debug!(target: "edge_viewer", %err, "rejected frame");
            err.into()
        },
    }
}

/// Default processing options: Canny with thresholds 50/150, L1 norm,
/// edges-only output, luminance left untouched, planar chroma.
#[unsafe(no_mangle)]
pub extern "C" fn edge_viewer_default_options() -> EdgeViewerOptions {
    EdgeViewerOptions::from(&ProcessorConfig::default())
}

/// Process one planar YUV 4:2:0 frame into a tightly packed RGBA buffer.
///
/// Parameters:
/// - `y`, `u`, `v`: plane base pointers with their byte lengths and row
///   strides. Strides may exceed the visible width. `y` is only read unless
///   `options.write_back_luma` is set, in which case it must be writable.
///   `u` and `v` are never written.
/// - `width`, `height`: luminance dimensions; chroma is half of each,
///   rounded up.
/// - `output`: at least `width * height * 4` bytes; rows are written
///   `width * 4` bytes apart.
/// - `options`: NULL for [`edge_viewer_default_options`].
///
/// Ownership / lifetime:
/// - All buffers stay owned by the caller. Nothing is retained after the
///   call returns.
///
/// Threading:
/// - May be called from any thread. Concurrent calls must not share output
///   buffers (or the Y buffer when `write_back_luma` is set).
///
/// Returns:
/// - `Ok` on success. `InvalidArgument` if any check fails, in which case
///   no buffer was written.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn edge_viewer_process_frame(
    y: *mut u8,
    y_len: usize,
    y_stride: i32,
    u: *const u8,
    u_len: usize,
    u_stride: i32,
    v: *const u8,
    v_len: usize,
    v_stride: i32,
    width: i32,
    height: i32,
    output: *mut u8,
    output_len: usize,
    options: *const EdgeViewerOptions,
) -> EdgeViewerStatus {
    let config = if options.is_null() {
        ProcessorConfig::default()
    } else {
        match ProcessorConfig::try_from(unsafe { &*options }) {
            Ok(config) => config,
            Err(e) => return report(Err(e)),
        }
    };

    let plane = |ptr: *const u8, len, stride| RawPlane {
        ptr: ptr.cast_mut(),
        len,
        stride,
    };
    report(unsafe {
        process_frame_raw(
            RawPlane {
                ptr: y,
                len: y_len,
                stride: y_stride,
            },
            plane(u, u_len, u_stride),
            plane(v, v_len, v_stride),
            width,
            height,
            output,
            output_len,
            &config,
        )
    })
}

const VERSION_C: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"), "\0");

/// NUL-terminated library name and version. The string is static; do not
/// free it.
#[unsafe(no_mangle)]
pub extern "C" fn edge_viewer_version() -> *const c_char {
    VERSION_C.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;
    use std::ffi::CStr;

    #[test]
    fn version_matches_crate() {
        let v = unsafe { CStr::from_ptr(edge_viewer_version()) };
        assert_eq!(v.to_str().unwrap(), crate::version());
    }

    #[test]
    fn options_round_trip_defaults() {
        let options = edge_viewer_default_options();
        assert_eq!(options.low_threshold, 50.0);
        assert_eq!(options.high_threshold, 150.0);
        assert_eq!(ProcessorConfig::try_from(&options), Ok(ProcessorConfig::default()));
    }

    #[test]
    fn malformed_options_are_invalid() {
        let mut options = edge_viewer_default_options();
        options.mode = 9;
        assert!(ProcessorConfig::try_from(&options).is_err());

        let mut options = edge_viewer_default_options();
        options.high_threshold = f64::NAN;
        assert!(ProcessorConfig::try_from(&options).is_err());
    }

    #[test]
    fn null_pointers_are_rejected() {
        for missing in ["y", "u", "v", "output"] {
            let mut y = [0u8; 16];
            let uv = [128u8; 4];
            let mut out = [7u8; 64];
            let pick = |name: &str, p: *const u8| if name == missing { ptr::null() } else { p };

            let status = edge_viewer_process_frame(
                if missing == "y" { ptr::null_mut() } else { y.as_mut_ptr() },
                y.len(),
                4,
                pick("u", uv.as_ptr()),
                uv.len(),
                2,
                pick("v", uv.as_ptr()),
                uv.len(),
                2,
                4,
                4,
                if missing == "output" { ptr::null_mut() } else { out.as_mut_ptr() },
                out.len(),
                ptr::null(),
            );

            assert_eq!(status, EdgeViewerStatus::InvalidArgument, "null {missing} accepted");
            assert!(out.iter().all(|&b| b == 7), "output written with null {missing}");
            assert!(y.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn bad_options_fail_before_writing() {
        let mut y = [0u8; 16];
        let uv = [128u8; 4];
        let mut out = [7u8; 64];
        let mut options = edge_viewer_default_options();
        options.chroma_pixel_stride = 0;
        let status = edge_viewer_process_frame(
            y.as_mut_ptr(),
            y.len(),
            4,
            uv.as_ptr(),
            uv.len(),
            2,
            uv.as_ptr(),
            uv.len(),
            2,
            4,
            4,
            out.as_mut_ptr(),
            out.len(),
            &options,
        );
        assert_eq!(status, EdgeViewerStatus::InvalidArgument);
        assert!(out.iter().all(|&b| b == 7));
    }
}
