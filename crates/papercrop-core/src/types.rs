// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Papercrop document scanner.

use serde::{Deserialize, Serialize};

/// A position in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The four corners of a detected document, in canonical order.
///
/// Coordinates only make sense relative to `size`, the dimensions of the
/// frame they were detected in. Use [`Corners::scaled_to`] before applying
/// them to a different rendition of the same frame (e.g. preview frame to
/// full-resolution capture).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
    /// Dimensions of the source image at detection time.
    pub size: ImageSize,
}

impl Corners {
    /// Build from points already in `[top_left, top_right, bottom_right,
    /// bottom_left]` order. No reordering is performed.
    pub fn new(points: [Point; 4], size: ImageSize) -> Self {
        let [top_left, top_right, bottom_right, bottom_left] = points;
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            size,
        }
    }

    /// Points in canonical order.
    pub fn as_array(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Rescale proportionally to another resolution of the same frame.
    ///
    /// Returns `self` unchanged when the recorded size is empty, since there
    /// is no ratio to apply.
    pub fn scaled_to(&self, target: ImageSize) -> Self {
        if self.size.is_empty() {
            return *self;
        }
        let sx = f64::from(target.width) / f64::from(self.size.width);
        let sy = f64::from(target.height) / f64::from(self.size.height);
        let scale = |p: Point| Point::new(p.x * sx, p.y * sy);
        Self {
            top_left: scale(self.top_left),
            top_right: scale(self.top_right),
            bottom_right: scale(self.bottom_right),
            bottom_left: scale(self.bottom_left),
            size: target,
        }
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(Point::is_finite)
    }
}

/// Pixel layout of the enhancer's output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Single-channel 8-bit.
    Luma8,
    /// 8-bit RGB, the layout most display surfaces accept directly.
    #[default]
    Rgb8,
    /// 8-bit RGBA, fully opaque.
    Rgba8,
}
