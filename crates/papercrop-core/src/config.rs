// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::types::{ImageSize, OutputFormat};

/// Tunable parameters of the detection and enhancement pipeline.
///
/// The defaults reproduce the reference detector. Changing any of them
/// changes which documents are found, so they are kept together here rather
/// than scattered through the stages as literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Side of the square Gaussian kernel used before thresholding (odd).
    pub blur_kernel_size: u32,
    /// Lower bound for the triangle-histogram threshold level.
    pub threshold_floor: u8,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Side of the square dilation element closing gaps in edges (odd).
    pub dilate_kernel_size: u32,
    /// How many of the largest contours are examined before giving up.
    pub max_candidates: usize,
    /// Douglas–Peucker tolerance as a fraction of the contour perimeter.
    pub epsilon_ratio: f64,
    /// Neighbourhood side for adaptive mean thresholding (odd).
    pub adaptive_block_size: u32,
    /// Constant subtracted from the neighbourhood mean.
    pub adaptive_offset: i32,
    /// Canvas used by the enhancer when the source has no usable dimensions.
    pub default_canvas: ImageSize,
    /// Pixel layout of the enhancer's output.
    pub output_format: OutputFormat,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            threshold_floor: 20,
            canny_low: 75.0,
            canny_high: 200.0,
            dilate_kernel_size: 9,
            max_candidates: 5,
            epsilon_ratio: 0.03,
            adaptive_block_size: 15,
            adaptive_offset: 15,
            default_canvas: ImageSize::new(1080, 1920),
            output_format: OutputFormat::Rgb8,
        }
    }
}

/// Largest dilation element whose radius still fits the `u8` the morphology
/// routines take.
pub const MAX_DILATE_KERNEL_SIZE: u32 = 2 * u8::MAX as u32 + 1;

impl ScanConfig {
    /// Gaussian sigma derived from the kernel size, the way a zero sigma is
    /// resolved by most vision libraries: `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
    pub fn blur_sigma(&self) -> f32 {
        0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ScanError::Config(format!(
                "blur_kernel_size must be odd and positive, got {}",
                self.blur_kernel_size
            )));
        }
        if self.dilate_kernel_size == 0
            || self.dilate_kernel_size % 2 == 0
            || self.dilate_kernel_size > MAX_DILATE_KERNEL_SIZE
        {
            return Err(ScanError::Config(format!(
                "dilate_kernel_size must be odd and in 1..={MAX_DILATE_KERNEL_SIZE}, got {}",
                self.dilate_kernel_size
            )));
        }
        if self.adaptive_block_size < 3 || self.adaptive_block_size % 2 == 0 {
            return Err(ScanError::Config(format!(
                "adaptive_block_size must be odd and at least 3, got {}",
                self.adaptive_block_size
            )));
        }
        if !(self.canny_low.is_finite() && self.canny_high.is_finite())
            || self.canny_low < 0.0
            || self.canny_low > self.canny_high
        {
            return Err(ScanError::Config(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {}/{}",
                self.canny_low, self.canny_high
            )));
        }
        if self.max_candidates == 0 {
            return Err(ScanError::Config("max_candidates must be at least 1".into()));
        }
        if !self.epsilon_ratio.is_finite() || self.epsilon_ratio <= 0.0 {
            return Err(ScanError::Config(format!(
                "epsilon_ratio must be positive, got {}",
                self.epsilon_ratio
            )));
        }
        if self.default_canvas.is_empty() {
            return Err(ScanError::Config(format!(
                "default_canvas must be non-empty, got {}",
                self.default_canvas
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
