// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection — picks the document outline among the largest
// traced contours.

use papercrop_core::{Corners, ImageSize, Point, ScanConfig};
use tracing::{debug, instrument};

use crate::geometry::{approximate_polygon, arc_length, is_convex};
use crate::scan::contours::Contour;
use crate::scan::corners::order_corners;

/// Number of contours that will be examined: the `max_candidates` largest,
/// or all of them when there are fewer.
pub fn candidate_pool(contour_count: usize, max_candidates: usize) -> usize {
    contour_count.min(max_candidates)
}

/// Find the document outline among `contours` (sorted largest first).
///
/// Each of the first [`candidate_pool`] contours is simplified with
/// Douglas–Peucker at `epsilon_ratio` of its own perimeter; the first one
/// that reduces to a convex quadrilateral is ordered and returned. Smaller
/// contours are never looked at, even when the pool yields nothing, and no
/// second pass with another tolerance is made.
#[instrument(skip(contours, config), fields(contour_count = contours.len()))]
pub fn select_quadrilateral(
    contours: &[Contour],
    size: ImageSize,
    config: &ScanConfig,
) -> Option<Corners> {
    let pool = candidate_pool(contours.len(), config.max_candidates);
    if pool == 0 {
        debug!("No contours to examine");
        return None;
    }

    for (index, contour) in contours.iter().take(pool).enumerate() {
        let perimeter = arc_length(&contour.points, true);
        let polygon = approximate_polygon(&contour.points, config.epsilon_ratio * perimeter);
        let convex = polygon.len() == 4 && is_convex(&polygon);
        debug!(
            index,
            area = contour.area,
            perimeter,
            vertices = polygon.len(),
            convex,
            "Examined candidate"
        );

        if convex {
            let quad: [Point; 4] = [polygon[0], polygon[1], polygon[2], polygon[3]];
            return Some(order_corners(quad, size));
        }
    }

    debug!(pool, "Candidate pool exhausted");
    None
}
