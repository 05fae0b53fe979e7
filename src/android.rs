// This is free and unencumbered software released into the public domain.

//! JNI entry points for the Android app (`com.gauransh.edge_viewer`).
//!
//! `CVProcessor.processFrame` hands over the three `ImageReader` planes as
//! direct `ByteBuffer`s. Their addresses and capacities are resolved here
//! and the frame goes through the same path as the C ABI, with default
//! options: thresholds 50/150, edges only, luminance left untouched.
//!
//! A rejected frame raises `java.lang.IllegalArgumentException` in the
//! calling thread; the output buffer is not written in that case.

use crate::{
    ffi::{RawPlane, process_frame_raw},
    shared::{FrameError, ProcessorConfig},
};
use core::ptr;
use jni::{
    JNIEnv,
    objects::{JByteBuffer, JObject},
    sys::{jint, jstring},
};

const ILLEGAL_ARGUMENT: &str = "java/lang/IllegalArgumentException";

cfg_if::cfg_if! {
    if #[cfg(feature = "tracing")] {
        fn log_rejection(err: &FrameError) {
            asimov_module::tracing::warn!(target: "edge_viewer", %err, "processFrame rejected frame");
        }
    } else {
        #[inline]
        fn log_rejection(_err: &FrameError) {}
    }
}

/// Resolve a direct `ByteBuffer`. Heap buffers and `null` come back as a
/// null pointer, which validation then rejects.
fn direct_plane(env: &JNIEnv<'_>, buffer: &JByteBuffer<'_>, stride: jint) -> RawPlane {
    let ptr = env.get_direct_buffer_address(buffer).unwrap_or(ptr::null_mut());
    let len = if ptr.is_null() {
        0
    } else {
        env.get_direct_buffer_capacity(buffer).unwrap_or(0)
    };
    RawPlane { ptr, len, stride }
}

/// `external fun processFrame(yBuffer, uBuffer, vBuffer, yStride, uStride,
/// vStride, width, height, outputBuffer)`
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_com_gauransh_edge_1viewer_CVProcessor_processFrame<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    y_buffer: JByteBuffer<'local>,
    u_buffer: JByteBuffer<'local>,
    v_buffer: JByteBuffer<'local>,
    y_stride: jint,
    u_stride: jint,
    v_stride: jint,
    width: jint,
    height: jint,
    output_buffer: JByteBuffer<'local>,
) {
    let y = direct_plane(&env, &y_buffer, y_stride);
    let u = direct_plane(&env, &u_buffer, u_stride);
    let v = direct_plane(&env, &v_buffer, v_stride);
    let out = direct_plane(&env, &output_buffer, 0);

    // SAFETY: direct buffer addresses stay valid while the Java objects are
    // reachable, which the local references guarantee for this call. The
    // default options never write through the Y plane.
    let result = unsafe {
        process_frame_raw(
            y,
            u,
            v,
            width,
            height,
            out.ptr,
            out.len,
            &ProcessorConfig::default(),
        )
    };

    if let Err(err) = result {
        log_rejection(&err);
        // If throwing fails a Java exception is already pending.
        let _ = env.throw_new(ILLEGAL_ARGUMENT, err.to_string());
    }
}

/// `external fun stringFromJNI(): String`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_gauransh_edge_1viewer_MainActivity_stringFromJNI<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    env.new_string(crate::version())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}
