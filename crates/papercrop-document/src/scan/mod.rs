// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge extraction, contour ranking, quadrilateral
// selection, corner ordering, perspective rectification and enhancement.

pub mod contours;
pub mod corners;
pub mod edges;
pub mod enhance;
pub mod quad;
pub mod rectify;

pub use contours::{BorderKind, Contour, find_contours};
pub use corners::{order_corners, order_points};
pub use edges::extract_edges;
pub use enhance::enhance;
pub use quad::select_quadrilateral;
pub use rectify::{OutputDimensions, output_dimensions, rectify};
