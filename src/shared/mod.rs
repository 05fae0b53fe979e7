// This is free and unencumbered software released into the public domain.

mod config;
pub use config::*;

pub mod convert;

mod detector;
pub use detector::*;

pub mod detectors {
    pub mod canny;
}
pub use detectors::canny::CannyDetector;

mod error;
pub use error::*;

mod frame;
pub use frame::*;

mod plane;
pub use plane::*;

mod processor;
pub use processor::*;
