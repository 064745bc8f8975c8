// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — unwarps the quadrilateral bounded by four
// ordered corners into an axis-aligned, upright image.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use papercrop_core::error::{Result, ScanError};
use papercrop_core::Corners;
use tracing::{debug, info, instrument};

/// How far outside the source a corner may sit, as a fraction of the
/// source extent along that axis. Covers dragging a handle slightly past
/// the frame edge.
const CORNER_MARGIN_RATIO: f64 = 0.25;

/// Upper bound on output pixels. Larger results are refused before any
/// buffer is allocated.
const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Size of the rectified output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputDimensions {
    /// Longer of the top and bottom edge lengths.
    pub exact_width: f64,
    /// Longer of the left and right edge lengths.
    pub exact_height: f64,
    /// `exact_width` truncated toward zero.
    pub width: u32,
    /// `exact_height` truncated toward zero.
    pub height: u32,
}

/// Measure the output size for `corners`.
///
/// Each dimension takes the longer of its two opposing edges so a skewed
/// capture is never shrunk, then truncates (does not round) to whole pixels.
pub fn output_dimensions(corners: &Corners) -> OutputDimensions {
    let Corners {
        top_left: tl,
        top_right: tr,
        bottom_right: br,
        bottom_left: bl,
        ..
    } = *corners;

    let exact_width = br.distance(&bl).max(tr.distance(&tl));
    let exact_height = tr.distance(&br).max(tl.distance(&bl));

    OutputDimensions {
        exact_width,
        exact_height,
        // `as` saturates and truncates toward zero.
        width: exact_width as u32,
        height: exact_height as u32,
    }
}

/// Projective transform taking the corners onto
/// `(0,0) (W,0) (W,H) (0,H)`, with `W`/`H` the untruncated extents.
pub fn perspective_transform(corners: &Corners, dims: &OutputDimensions) -> Result<Projection> {
    let w = dims.exact_width as f32;
    let h = dims.exact_height as f32;
    let src = corners.as_array().map(|p| (p.x as f32, p.y as f32));
    let dest = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    Projection::from_control_points(src, dest).ok_or(ScanError::DegenerateGeometry {
        width: dims.exact_width,
        height: dims.exact_height,
    })
}

/// Crop and unwarp the document bounded by `corners` out of `image`.
///
/// The result is a newly allocated image of exactly
/// [`output_dimensions`]`(corners)` pixels, resampled bilinearly; samples that
/// fall outside the source are black. Grayscale and RGB inputs keep their
/// layout, everything else comes back as RGBA.
///
/// Corners are used as given: if they were detected on a different
/// rendition of this frame, rescale them with [`Corners::scaled_to`] first.
///
/// # Errors
///
/// - [`ScanError::InvalidInput`] for an empty image, corners tagged with an
///   empty size, corners that are non-finite or lie well outside the image,
///   or an output too large to allocate.
/// - [`ScanError::DegenerateGeometry`] when the output would have zero width
///   or height, or the corners admit no projective transform.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn rectify(image: &DynamicImage, corners: &Corners) -> Result<DynamicImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ScanError::InvalidInput(format!(
            "cannot rectify an empty {}x{} image",
            image.width(),
            image.height()
        )));
    }
    check_corners(corners, image.width(), image.height())?;

    for point in corners.as_array() {
        debug!(%point, "Rectification corner");
    }

    let dims = output_dimensions(corners);
    if dims.width == 0 || dims.height == 0 {
        return Err(ScanError::DegenerateGeometry {
            width: dims.exact_width,
            height: dims.exact_height,
        });
    }
    check_output_size(&dims)?;
    let projection = perspective_transform(corners, &dims)?;
    debug!(
        exact_width = dims.exact_width,
        exact_height = dims.exact_height,
        "Projective transform computed"
    );

    let (out_w, out_h) = (dims.width, dims.height);
    let output = match image {
        DynamicImage::ImageLuma8(src) => {
            let mut out = GrayImage::new(out_w, out_h);
            warp_into(src, &projection, Interpolation::Bilinear, Luma([0u8]), &mut out);
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageRgb8(src) => {
            let mut out = RgbImage::new(out_w, out_h);
            warp_into(src, &projection, Interpolation::Bilinear, Rgb([0u8, 0, 0]), &mut out);
            DynamicImage::ImageRgb8(out)
        }
        other => {
            let src = other.to_rgba8();
            let mut out = RgbaImage::new(out_w, out_h);
            warp_into(
                &src,
                &projection,
                Interpolation::Bilinear,
                Rgba([0u8, 0, 0, 255]),
                &mut out,
            );
            DynamicImage::ImageRgba8(out)
        }
    };

    info!(out_w, out_h, "Crop finished");
    Ok(output)
}

/// Reject corners that cannot describe a region of a `width` x `height`
/// source.
fn check_corners(corners: &Corners, width: u32, height: u32) -> Result<()> {
    if corners.size.is_empty() {
        return Err(ScanError::InvalidInput(format!(
            "corners are tagged with an empty {} frame size",
            corners.size
        )));
    }
    if !corners.is_finite() {
        return Err(ScanError::InvalidInput(
            "corner coordinates must be finite".into(),
        ));
    }

    let (w, h) = (f64::from(width), f64::from(height));
    let (margin_x, margin_y) = (w * CORNER_MARGIN_RATIO, h * CORNER_MARGIN_RATIO);
    let x_range = -margin_x..=w + margin_x;
    let y_range = -margin_y..=h + margin_y;
    match corners
        .as_array()
        .into_iter()
        .find(|p| !x_range.contains(&p.x) || !y_range.contains(&p.y))
    {
        Some(point) => Err(ScanError::InvalidInput(format!(
            "corner {point} lies outside the {width}x{height} image"
        ))),
        None => Ok(()),
    }
}

fn check_output_size(dims: &OutputDimensions) -> Result<()> {
    let pixels = u64::from(dims.width) * u64::from(dims.height);
    if pixels > MAX_OUTPUT_PIXELS {
        return Err(ScanError::InvalidInput(format!(
            "rectified output of {}x{} exceeds {MAX_OUTPUT_PIXELS} pixels",
            dims.width, dims.height
        )));
    }
    Ok(())
}
