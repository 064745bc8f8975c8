// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement — grayscale conversion and adaptive mean binarization,
// giving a rectified photo the black-on-white look of a flatbed scan.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, sum_image_pixels};
use papercrop_core::{ImageSize, OutputFormat, ScanConfig};
use tracing::{debug, info, instrument, warn};

/// Produce the "scanned document" rendition of `image`.
///
/// 1. Convert to grayscale
/// 2. Adaptive mean thresholding: a pixel turns white when it is brighter
///    than the mean of its `adaptive_block_size` square neighbourhood minus
///    `adaptive_offset`, black otherwise
/// 3. Convert to `output_format`
///
/// The input is only borrowed. Every output pixel is either black or white.
///
/// An image without usable dimensions yields a blank white canvas of
/// `default_canvas` size instead of failing; callers that hand over a
/// dimensionless buffer still get something displayable.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn enhance(image: &DynamicImage, config: &ScanConfig) -> DynamicImage {
    let source = ImageSize::new(image.width(), image.height());

    let binary = if source.is_empty() {
        let canvas = config.default_canvas;
        warn!(%source, %canvas, "Source has no usable dimensions; using default canvas");
        GrayImage::from_pixel(canvas.width, canvas.height, Luma([255u8]))
    } else {
        info!(
            block_size = config.adaptive_block_size,
            offset = config.adaptive_offset,
            "Applying adaptive binarization"
        );
        adaptive_mean_threshold(
            &image.to_luma8(),
            config.adaptive_block_size / 2,
            config.adaptive_offset,
        )
    };

    let output = convert_format(binary, config.output_format);
    debug!(format = ?config.output_format, "Enhancement complete");
    output
}

/// Binarize against the local mean of a `(2 * block_radius + 1)` square
/// window, clipped at the image border.
pub(crate) fn adaptive_mean_threshold(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let sums: Image<Luma<u64>> = integral_image(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let local_mean =
            window_mean(&sums, gray.width(), gray.height(), x, y, block_radius).round() as i32;
        let value = i32::from(gray.get_pixel(x, y).0[0]);
        if value - local_mean > -offset { Luma([255u8]) } else { Luma([0u8]) }
    })
}

/// Mean intensity of the window of `radius` around `(x, y)`, restricted to
/// the in-bounds part of a `width` x `height` image.
fn window_mean(
    sums: &Image<Luma<u64>>,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    radius: u32,
) -> f64 {
    let left = x.saturating_sub(radius);
    let top = y.saturating_sub(radius);
    let right = x.saturating_add(radius).min(width - 1);
    let bottom = y.saturating_add(radius).min(height - 1);

    let [total] = sum_image_pixels(sums, left, top, right, bottom);
    let count = u64::from(right - left + 1) * u64::from(bottom - top + 1);
    total as f64 / count as f64
}

fn convert_format(binary: GrayImage, format: OutputFormat) -> DynamicImage {
    let gray = DynamicImage::ImageLuma8(binary);
    match format {
        OutputFormat::Luma8 => gray,
        OutputFormat::Rgb8 => DynamicImage::ImageRgb8(gray.to_rgb8()),
        OutputFormat::Rgba8 => DynamicImage::ImageRgba8(gray.to_rgba8()),
    }
}
