// This is free and unencumbered software released into the public domain.

#![doc = include_str!("../README.md")]

pub mod cli;
pub mod ffi;
pub mod shared;

#[cfg(feature = "jni")]
pub mod android;

/// Crate name and version, as reported to hosts.
pub fn version() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
