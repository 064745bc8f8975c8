// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — the two entry points a capture screen calls: `detect`
// once per preview frame, `rectify_and_enhance` once the user confirms the
// corners.

use image::{DynamicImage, GrayImage};
use papercrop_core::error::{Result, ScanError};
use papercrop_core::{Corners, ImageSize, ScanConfig};
use tracing::{debug, info, instrument};

use crate::scan::contours::{self, Contour};
use crate::scan::{edges, quad, rectify};

/// Detects and rectifies a single document in captured frames.
///
/// Holds nothing but its configuration, so one scanner can serve any number
/// of threads: every call works on its own buffers.
///
/// ```ignore
/// let scanner = DocumentScanner::default();
/// if let Some(corners) = scanner.detect(&preview)? {
///     let full = corners.scaled_to(ImageSize::new(photo.width(), photo.height()));
///     let page = scanner.rectify_and_enhance(&photo, &full, true)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    config: ScanConfig,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner, rejecting an out-of-range configuration.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    // -- Detection ------------------------------------------------------------

    /// Locate the document in `frame`.
    ///
    /// `Ok(None)` means no convex four-sided outline was found among the
    /// largest contours; the caller keeps showing the live preview.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidInput`] when `frame` has no pixels.
    #[instrument(skip_all, fields(width = frame.width(), height = frame.height()))]
    pub fn detect(&self, frame: &DynamicImage) -> Result<Option<Corners>> {
        let size = validate_frame(frame)?;
        let contours = contours::find_contours(&edges::extract_edges(frame, &self.config));
        let corners = quad::select_quadrilateral(&contours, size, &self.config);

        match &corners {
            Some(found) => info!(
                top_left = %found.top_left,
                top_right = %found.top_right,
                bottom_right = %found.bottom_right,
                bottom_left = %found.bottom_left,
                "Document found"
            ),
            None => debug!("No document candidate in frame"),
        }
        Ok(corners)
    }

    /// The binary edge map `detect` traces contours in.
    pub fn edge_map(&self, frame: &DynamicImage) -> Result<GrayImage> {
        validate_frame(frame)?;
        Ok(edges::extract_edges(frame, &self.config))
    }

    /// Every contour of the edge map, largest first.
    pub fn find_contours(&self, frame: &DynamicImage) -> Result<Vec<Contour>> {
        Ok(contours::find_contours(&self.edge_map(frame)?))
    }

    // -- Rectification --------------------------------------------------------

    /// Crop and unwarp the confirmed document out of `full_image`, then
    /// optionally apply scan enhancement.
    ///
    /// `corners` must already be expressed in `full_image` coordinates.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidInput`] for an empty image or unusable corners,
    /// [`ScanError::DegenerateGeometry`] when the corners enclose no area.
    #[instrument(skip(self, full_image, corners), fields(width = full_image.width(), height = full_image.height()))]
    pub fn rectify_and_enhance(
        &self,
        full_image: &DynamicImage,
        corners: &Corners,
        enhance: bool,
    ) -> Result<DynamicImage> {
        let cropped = rectify::rectify(full_image, corners)?;
        if !enhance {
            return Ok(cropped);
        }
        Ok(crate::scan::enhance::enhance(&cropped, &self.config))
    }
}

/// Detect with the default configuration.
pub fn detect(frame: &DynamicImage) -> Result<Option<Corners>> {
    DocumentScanner::default().detect(frame)
}

/// Rectify (and optionally enhance) with the default configuration.
pub fn rectify_and_enhance(
    full_image: &DynamicImage,
    corners: &Corners,
    enhance: bool,
) -> Result<DynamicImage> {
    DocumentScanner::default().rectify_and_enhance(full_image, corners, enhance)
}

fn validate_frame(frame: &DynamicImage) -> Result<ImageSize> {
    let size = ImageSize::new(frame.width(), frame.height());
    if size.is_empty() {
        return Err(ScanError::InvalidInput(format!(
            "cannot detect in an empty {size} frame"
        )));
    }
    Ok(size)
}
