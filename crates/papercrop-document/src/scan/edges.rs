// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge extraction — turns a captured frame into a binary edge map whose
// document border is a single closed band, ready for contour tracing.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::dilate;
use papercrop_core::ScanConfig;
use tracing::{debug, instrument};

/// Build the binary edge map for `image` (255 = edge, 0 = background).
///
/// ## Pipeline
///
/// 1. Convert to grayscale
/// 2. Gaussian smoothing with a `blur_kernel_size` square kernel, sigma
///    derived from the kernel size
/// 3. Global binarization at the triangle-histogram level, never below
///    `threshold_floor`
/// 4. Canny edge detection with `canny_low` / `canny_high` hysteresis
/// 5. Dilation with a `dilate_kernel_size` square element, closing small
///    gaps so the document border traces as one contour
///
/// Never fails: a featureless frame simply produces an all-zero map.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn extract_edges(image: &DynamicImage, config: &ScanConfig) -> GrayImage {
    let gray = image.to_luma8();

    let kernel = gaussian_kernel(config.blur_kernel_size, config.blur_sigma());
    let blurred = separable_filter_equal(&gray, &kernel);
    debug!(
        kernel_size = config.blur_kernel_size,
        sigma = config.blur_sigma(),
        "Applied Gaussian blur"
    );

    let level = triangle_threshold(&blurred).max(config.threshold_floor);
    let binary = binarize(&blurred, level);
    debug!(level, floor = config.threshold_floor, "Binarized at triangle level");

    let edges = canny(&binary, config.canny_low, config.canny_high);

    let radius = u8::try_from(config.dilate_kernel_size / 2).unwrap_or(u8::MAX);
    let dilated = dilate(&edges, Norm::LInf, radius);
    debug!(
        edge_pixels = dilated.pixels().filter(|p| p.0[0] > 0).count(),
        radius,
        "Edge map ready"
    );

    dilated
}

/// Normalised 1-D Gaussian kernel of `size` taps.
pub(crate) fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as i32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Compute the triangle threshold level of a grayscale image.
///
/// A line is drawn from the histogram peak to the far end of the occupied
/// range; the level is the bin lying farthest below that line. Suited to
/// histograms with one dominant mode (the background) and a long tail.
pub(crate) fn triangle_threshold(gray: &GrayImage) -> u8 {
    const BINS: usize = 256;

    let mut histogram = [0u64; BINS];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    if gray.width() == 0 || gray.height() == 0 {
        return 0;
    }

    let mut left_bound = histogram.iter().position(|&c| c > 0).unwrap_or(0);
    if left_bound > 0 {
        left_bound -= 1;
    }
    let mut right_bound = (1..BINS).rev().find(|&i| histogram[i] > 0).unwrap_or(0);
    if right_bound < BINS - 1 {
        right_bound += 1;
    }

    // First bin holding the highest count.
    let mut max_ind = 0;
    let mut max = 0u64;
    for (i, &count) in histogram.iter().enumerate() {
        if count > max {
            max = count;
            max_ind = i;
        }
    }

    // Work on whichever side of the peak has the longer tail.
    let flipped = max_ind - left_bound < right_bound - max_ind;
    if flipped {
        histogram.reverse();
        left_bound = BINS - 1 - right_bound;
        max_ind = BINS - 1 - max_ind;
    }

    let a = max as f64;
    let b = left_bound as f64 - max_ind as f64;
    let mut level = left_bound;
    let mut dist = 0.0f64;
    for (i, &count) in histogram
        .iter()
        .enumerate()
        .take(max_ind + 1)
        .skip(left_bound + 1)
    {
        let candidate = a * i as f64 + b * count as f64;
        if candidate > dist {
            dist = candidate;
            level = i;
        }
    }
    level = level.saturating_sub(1);

    if flipped {
        level = BINS - 1 - level;
    }
    level as u8
}

/// Pixels strictly above `level` become 255, the rest 0.
fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
