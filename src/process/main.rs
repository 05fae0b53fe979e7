// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("edge-viewer-process requires the 'std' feature");

use asimov_module::SysexitsError::{self, *};
use clap::Parser;
use clientele::StandardOptions;
use edge_viewer::{
    cli::{self, CliError},
    shared::{
        FrameError, FrameProcessor, ProcessingMode, ProcessorConfig, Thresholds, YuvFrame,
        chroma_dimensions, rgba_len,
    },
};
use image::{RgbImage, RgbaImage};
use serde_json::json;
use std::{error::Error as StdError, path::PathBuf};

/// Run the camera frame adapter over an image file.
#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// Image to process (any format the `image` crate decodes).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the RGBA result; the format follows the extension.
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    #[arg(long, default_value_t = Thresholds::DEFAULT_LOW)]
    low: f64,

    #[arg(long, default_value_t = Thresholds::DEFAULT_HIGH)]
    high: f64,

    /// Use the L2 gradient norm instead of L1.
    #[arg(long)]
    l2: bool,

    #[arg(short, long, value_enum, default_value = "edges")]
    mode: Mode,

    /// Pad every synthesised plane row by this many bytes, as camera HALs do.
    #[arg(long, default_value_t = 0)]
    row_padding: usize,

    /// Print a JSON summary line to stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Mode {
    Edges,
    Preview,
    Overlay,
}

impl From<Mode> for ProcessingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Edges => ProcessingMode::Edges,
            Mode::Preview => ProcessingMode::Preview,
            Mode::Overlay => ProcessingMode::Overlay,
        }
    }
}

pub fn main() -> Result<SysexitsError, Box<dyn StdError>> {
    asimov_module::dotenv().ok();
    let args = asimov_module::args_os()?;
    let options = Options::parse_from(args);

    if options.flags.version {
        println!("{}", edge_viewer::version());
        return Ok(EX_OK);
    }

    if options.flags.license {
        print!("{}", include_str!("../../UNLICENSE"));
        return Ok(EX_OK);
    }

    #[cfg(feature = "tracing")]
    asimov_module::init_tracing_subscriber(&options.flags).expect("failed to initialize logging");

    let exit_code = match run_process(&options) {
        Ok(()) => EX_OK,
        Err(err) => cli::handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

fn run_process(opts: &Options) -> Result<(), CliError> {
    let input = opts.input.display().to_string();
    cli::info_user(&opts.flags, &format!("reading {input}"));

    let rgb = image::open(&opts.input)
        .map_err(|source| CliError::Decode {
            path: input.clone(),
            source,
        })?
        .to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let planes = I420Planes::from_rgb(&rgb, opts.row_padding);
    let frame = YuvFrame::from_planes(
        &planes.y,
        planes.y_stride,
        &planes.u,
        planes.c_stride,
        &planes.v,
        planes.c_stride,
        width,
        height,
        1,
    )?;

    let mut processor = FrameProcessor::new(processor_config(opts)?);
    let mut rgba = vec![0u8; rgba_len(width, height)?];
    let stats = processor.process_frame(&frame, &mut rgba)?;

    let output = opts.output.display().to_string();
    rgba_image(rgb.width(), rgb.height(), rgba)?
        .save(&opts.output)
        .map_err(|source| CliError::Encode {
            path: output.clone(),
            source,
        })?;
    cli::info_user(&opts.flags, &format!("wrote {output}"));

    if opts.json {
        println!(
            "{}",
            json!({
                "input": input,
                "output": output,
                "width": stats.width,
                "height": stats.height,
                "mode": stats.mode.to_string(),
                "detector": processor.detector_name(),
                "thresholds": processor.config().thresholds.to_string(),
                "edge_pixels": stats.edge_pixels,
            })
        );
    }

    Ok(())
}

fn rgba_image(width: u32, height: u32, rgba: Vec<u8>) -> Result<RgbaImage, CliError> {
    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        FrameError::invalid_argument(format!("RGBA buffer is too short for {width}x{height}")).into()
    })
}

fn processor_config(opts: &Options) -> Result<ProcessorConfig, CliError> {
    let thresholds = Thresholds::checked(opts.low, opts.high)?;
    if opts.low > opts.high {
        cli::warn_user(&opts.flags, &format!("swapping thresholds to {thresholds}"));
    }
    Ok(ProcessorConfig {
        thresholds,
        ..ProcessorConfig::default()
    }
    .with_l2_gradient(opts.l2)
    .with_mode(opts.mode.into()))
}

/// An I420 frame synthesised from RGB with BT.601 limited-range weights,
/// laid out the way a camera would hand it over.
struct I420Planes {
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
    y_stride: usize,
    c_stride: usize,
}

impl I420Planes {
    fn from_rgb(rgb: &RgbImage, row_padding: usize) -> Self {
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        let (cw, ch) = chroma_dimensions(w, h);
        let (y_stride, c_stride) = (w + row_padding, cw + row_padding);

        let mut y = vec![0u8; y_stride * h];
        for (x, yy, px) in rgb.enumerate_pixels() {
            let [r, g, b] = px.0.map(i32::from);
            y[yy as usize * y_stride + x as usize] = (((66 * r + 129 * g + 25 * b + 128) >> 8) + 16) as u8;
        }

        let mut u = vec![0u8; c_stride * ch];
        let mut v = vec![0u8; c_stride * ch];
        for cy in 0..ch {
            for cx in 0..cw {
                // Average the (up to) 2x2 block this chroma sample covers.
                let (mut r, mut g, mut b, mut n) = (0i32, 0i32, 0i32, 0i32);
                for py in (cy * 2)..(cy * 2 + 2).min(h) {
                    for px in (cx * 2)..(cx * 2 + 2).min(w) {
                        let p = rgb.get_pixel(px as u32, py as u32).0;
                        r += i32::from(p[0]);
                        g += i32::from(p[1]);
                        b += i32::from(p[2]);
                        n += 1;
                    }
                }
                let (r, g, b) = (r / n, g / n, b / n);
                u[cy * c_stride + cx] = (((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128) as u8;
                v[cy * c_stride + cx] = (((112 * r - 94 * g - 18 * b + 128) >> 8) + 128) as u8;
            }
        }

        Self {
            y,
            u,
            v,
            y_stride,
            c_stride,
        }
    }
}
