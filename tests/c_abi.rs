// This is free and unencumbered software released into the public domain.

mod common;

use common::{SyntheticFrame, is_binary_gray};
use core::ptr;
use edge_viewer::ffi::{
    EDGE_VIEWER_MODE_PREVIEW, EdgeViewerOptions, EdgeViewerStatus, edge_viewer_default_options,
    edge_viewer_process_frame,
};

fn call(
    frame: &mut SyntheticFrame,
    width: i32,
    height: i32,
    output: &mut [u8],
    options: Option<&EdgeViewerOptions>,
) -> EdgeViewerStatus {
    edge_viewer_process_frame(
        frame.y.as_mut_ptr(),
        frame.y.len(),
        frame.y_stride as i32,
        frame.u.as_ptr(),
        frame.u.len(),
        frame.c_stride as i32,
        frame.v.as_ptr(),
        frame.v.len(),
        frame.c_stride as i32,
        width,
        height,
        output.as_mut_ptr(),
        output.len(),
        options.map_or(ptr::null(), |o| o as *const _),
    )
}

fn call_full(frame: &mut SyntheticFrame, output: &mut [u8]) -> EdgeViewerStatus {
    let (width, height) = (frame.width as i32, frame.height as i32);
    call(frame, width, height, output, None)
}

#[test]
fn flat_frame_has_no_edges() {
    let mut frame = SyntheticFrame::new(4, 4, 0, 0, |_, _| 128);
    let mut out = vec![7u8; 64];
    assert_eq!(call_full(&mut frame, &mut out), EdgeViewerStatus::Ok);
    assert!(out.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn single_step_marks_one_column() {
    let mut frame = SyntheticFrame::new(8, 1, 0, 0, |x, _| if x < 4 { 0 } else { 255 });
    let mut out = vec![0u8; 32];
    assert_eq!(call_full(&mut frame, &mut out), EdgeViewerStatus::Ok);

    let values: Vec<u8> = out.chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(values, [0, 0, 0, 255, 0, 0, 0, 0]);
    assert!(is_binary_gray(&out));
}

#[test]
fn one_by_one_frame() {
    let mut frame = SyntheticFrame::new(1, 1, 0, 0, |_, _| 200);
    let mut out = [1u8; 4];
    assert_eq!(call_full(&mut frame, &mut out), EdgeViewerStatus::Ok);
    assert_eq!(out, [0, 0, 0, 255]);
}

#[test]
fn bad_dimensions_write_nothing() {
    let mut frame = SyntheticFrame::new(4, 4, 0, 0, |x, _| (x * 60) as u8);
    for (w, h) in [(0, 4), (4, 0), (-1, 4), (4, -8)] {
        let mut out = vec![7u8; 64];
        assert_eq!(call(&mut frame, w, h, &mut out, None), EdgeViewerStatus::InvalidArgument);
        assert!(out.iter().all(|&b| b == 7), "output written for {w}x{h}");
    }
}

#[test]
fn bad_buffers_write_nothing() {
    let mut frame = SyntheticFrame::new(4, 4, 0, 0, |x, _| (x * 60) as u8);

    let mut short = vec![7u8; 63];
    assert_eq!(call_full(&mut frame, &mut short), EdgeViewerStatus::InvalidArgument);
    assert!(short.iter().all(|&b| b == 7));

    let mut out = vec![7u8; 64];
    // Rows of 5 luma samples cannot fit in a 4-byte stride.
    assert_eq!(call(&mut frame, 5, 4, &mut out, None), EdgeViewerStatus::InvalidArgument);
    // Eight rows do not fit in a 16-byte plane.
    assert_eq!(call(&mut frame, 4, 8, &mut out, None), EdgeViewerStatus::InvalidArgument);
    assert!(out.iter().all(|&b| b == 7));

    let status = edge_viewer_process_frame(
        frame.y.as_mut_ptr(),
        frame.y.len(),
        -4,
        frame.u.as_ptr(),
        frame.u.len(),
        2,
        frame.v.as_ptr(),
        frame.v.len(),
        2,
        4,
        4,
        out.as_mut_ptr(),
        out.len(),
        ptr::null(),
    );
    assert_eq!(status, EdgeViewerStatus::InvalidArgument);
    assert!(out.iter().all(|&b| b == 7));
}

#[test]
fn luma_is_left_alone_by_default() {
    let mut frame = SyntheticFrame::new(8, 2, 2, 42, |x, _| if x < 4 { 0 } else { 255 });
    let before = frame.y.clone();
    let mut out = vec![0u8; frame.rgba_len()];
    assert_eq!(call_full(&mut frame, &mut out), EdgeViewerStatus::Ok);
    assert_eq!(frame.y, before);
}

#[test]
fn write_back_replaces_visible_luma() {
    let mut frame = SyntheticFrame::new(8, 1, 2, 42, |x, _| if x < 4 { 0 } else { 255 });
    let mut options = edge_viewer_default_options();
    options.write_back_luma = true;
    let mut out = vec![0u8; frame.rgba_len()];

    let status = edge_viewer_process_frame(
        frame.y.as_mut_ptr(),
        frame.y.len(),
        frame.y_stride as i32,
        frame.u.as_ptr(),
        frame.u.len(),
        frame.c_stride as i32,
        frame.v.as_ptr(),
        frame.v.len(),
        frame.c_stride as i32,
        8,
        1,
        out.as_mut_ptr(),
        out.len(),
        &options,
    );

    assert_eq!(status, EdgeViewerStatus::Ok);
    assert_eq!(frame.y, [0, 0, 0, 255, 0, 0, 0, 0, 42, 42]);
}

#[test]
fn preview_mode_through_options() {
    let mut frame = SyntheticFrame::new(2, 2, 0, 0, |_, _| 235);
    let mut options = edge_viewer_default_options();
    options.mode = EDGE_VIEWER_MODE_PREVIEW;
    let mut out = vec![0u8; frame.rgba_len()];

    assert_eq!(call(&mut frame, 2, 2, &mut out, Some(&options)), EdgeViewerStatus::Ok);
    assert!(out.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}
