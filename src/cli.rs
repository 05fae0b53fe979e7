// This is free and unencumbered software released into the public domain.

//! Error reporting and user messages for `edge-viewer-process`.
//!
//! Everything here is behind the `cli` feature; the module itself stays in
//! the tree so library builds without it still compile.

#[cfg(feature = "cli")]
use crate::shared::FrameError;

#[cfg(feature = "cli")]
use asimov_module::SysexitsError::{self, *};

#[cfg(feature = "cli")]
use clientele::StandardOptions;

/// Everything the command-line tools can fail with.
#[cfg(feature = "cli")]
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("failed to read image {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(feature = "cli")]
pub fn handle_error(err: &CliError, flags: &StandardOptions) -> SysexitsError {
    let verbose = flags.debug || flags.verbose >= 2;

    #[cfg(feature = "tracing")]
    {
        use asimov_module::tracing::{debug, error};

        error!(target: "edge_viewer", %err, "frame processing failed");
        if verbose {
            debug!(target: "edge_viewer", ?err, "detailed error");
        }
    }

    eprintln!("{PREFIX}: error: {}", error_chain(err, verbose));
    map_error_to_sysexit(err)
}

/// Progress note, shown with `-v`.
#[cfg(feature = "cli")]
pub fn info_user(flags: &StandardOptions, msg: &str) {
    if flags.debug || flags.verbose >= 1 {
        eprintln!("{PREFIX}: {msg}");
    }

    #[cfg(feature = "tracing")]
    asimov_module::tracing::info!(target: "edge_viewer", "{msg}");
}

/// Something the user asked for was adjusted. Always shown, since the
/// output differs from what the flags say.
#[cfg(feature = "cli")]
pub fn warn_user(_flags: &StandardOptions, msg: &str) {
    eprintln!("{PREFIX}: warning: {msg}");

    #[cfg(feature = "tracing")]
    asimov_module::tracing::warn!(target: "edge_viewer", "{msg}");
}

#[cfg(feature = "cli")]
const PREFIX: &str = "edge-viewer";

/// One line for the error, with its causes appended when `verbose`. A
/// cause whose text the line already ends with is skipped, since image
/// errors repeat their I/O source.
#[cfg(feature = "cli")]
fn error_chain(err: &CliError, verbose: bool) -> String {
    use std::error::Error as _;

    let mut line = err.to_string();
    if verbose {
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !line.ends_with(&text) {
                line.push_str(": ");
                line.push_str(&text);
            }
            source = cause.source();
        }
    }
    line
}

#[cfg(feature = "cli")]
fn map_error_to_sysexit(err: &CliError) -> SysexitsError {
    use image::ImageError;

    match err {
        CliError::Frame(FrameError::InvalidArgument(_)) => EX_USAGE,
        CliError::Decode {
            source: ImageError::IoError(_),
            ..
        } => EX_NOINPUT,
        CliError::Decode { .. } => EX_DATAERR,
        CliError::Encode { .. } => EX_CANTCREAT,
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let err = CliError::from(FrameError::invalid_argument("width must be positive"));
        assert!(matches!(map_error_to_sysexit(&err), EX_USAGE));

        let err = CliError::Decode {
            path: "missing.png".into(),
            source: image::ImageError::IoError(std::io::ErrorKind::NotFound.into()),
        };
        assert!(matches!(map_error_to_sysexit(&err), EX_NOINPUT));
        assert_eq!(err.to_string(), "failed to read image missing.png");
    }

    #[test]
    fn causes_are_appended_when_verbose() {
        let err = CliError::Decode {
            path: "missing.png".into(),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        };
        assert_eq!(error_chain(&err, false), "failed to read image missing.png");
        assert_eq!(error_chain(&err, true), "failed to read image missing.png: no such file");

        let err = CliError::from(FrameError::invalid_argument("width must be positive"));
        assert_eq!(error_chain(&err, true), "invalid argument: width must be positive");
    }
}
