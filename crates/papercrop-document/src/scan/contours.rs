// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour finding — traces every border in a binary edge map (outer borders
// and hole borders alike), drops collinear run points and ranks the result
// by enclosed area.

use image::GrayImage;
use imageproc::contours::{self, BorderType};
use papercrop_core::Point;
use tracing::{debug, instrument};

use crate::geometry::polygon_area;

/// Whether a traced border surrounds a region or a hole inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A closed border traced in an edge map.
#[derive(Debug, Clone)]
pub struct Contour {
    /// Border vertices with collinear run points removed.
    pub points: Vec<Point>,
    /// Area enclosed by `points`.
    pub area: f64,
    pub kind: BorderKind,
    /// Position of this border in trace (discovery) order.
    pub trace_index: usize,
    /// Trace index of the enclosing border, if any.
    pub parent: Option<usize>,
}

/// Trace all borders of `edges` and return them sorted by enclosed area,
/// largest first. Borders of equal area keep their discovery order.
///
/// An edge map without foreground pixels yields an empty vector.
#[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    let traced = contours::find_contours::<i32>(edges);

    let mut found: Vec<Contour> = traced
        .into_iter()
        .enumerate()
        .map(|(trace_index, contour)| {
            let raw: Vec<Point> = contour
                .points
                .iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect();
            let points = compress_runs(&raw);
            let area = polygon_area(&points);
            Contour {
                points,
                area,
                kind: match contour.border_type {
                    BorderType::Outer => BorderKind::Outer,
                    BorderType::Hole => BorderKind::Hole,
                },
                trace_index,
                parent: contour.parent,
            }
        })
        .collect();

    // `sort_by` is stable, so ties stay in trace order.
    found.sort_by(|a, b| b.area.total_cmp(&a.area));

    debug!(
        contour_count = found.len(),
        largest_area = found.first().map(|c| c.area),
        "Contours traced and ranked"
    );
    found
}

/// Keep only the points where the border changes direction.
///
/// Consecutive border points are 8-neighbours, so a point whose incoming and
/// outgoing steps are identical lies in the middle of a straight run and can
/// be reconstructed from its neighbours.
fn compress_runs(ring: &[Point]) -> Vec<Point> {
    let n = ring.len();
    if n < 3 {
        return ring.to_vec();
    }

    let step = |from: &Point, to: &Point| (to.x - from.x, to.y - from.y);
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = &ring[(i + n - 1) % n];
            let next = &ring[(i + 1) % n];
            step(prev, &ring[i]) != step(&ring[i], next)
        })
        .map(|i| ring[i])
        .collect();

    // A ring with no turns at all (cannot happen for a traced border, but
    // keep the input rather than returning nothing).
    if kept.is_empty() { ring.to_vec() } else { kept }
}
