// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// papercrop-document — Document detection and rectification for captured photos.
//
// Provides the detection pipeline (edge extraction, contour ranking,
// quadrilateral selection, corner ordering), perspective rectification of the
// confirmed quadrilateral, and scan enhancement (adaptive binarization).

pub mod geometry;
pub mod scan;
pub mod scanner;

// Re-export the primary entry points so callers can use `papercrop_document::DocumentScanner` etc.
pub use scanner::{DocumentScanner, detect, rectify_and_enhance};
