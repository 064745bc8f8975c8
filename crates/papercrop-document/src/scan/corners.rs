// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering — assigns top-left / top-right / bottom-right / bottom-left
// roles to four unordered points.

use papercrop_core::{Corners, ImageSize, Point};

/// Order four points as `[top_left, top_right, bottom_right, bottom_left]`.
///
/// Closed form over coordinate sums and differences:
///
/// - top-left minimises `x + y`
/// - top-right minimises `y - x`
/// - bottom-right maximises `x + y`
/// - bottom-left maximises `y - x`
///
/// On ties the earliest point wins. This is correct for convex quadrilaterals
/// in ordinary photo orientations. A quadrilateral rotated by about 45
/// degrees, or a self-intersecting one, can hand the same point two roles;
/// no attempt is made to detect that.
pub fn order_points(points: [Point; 4]) -> [Point; 4] {
    let sum = |p: &Point| p.x + p.y;
    let diff = |p: &Point| p.y - p.x;

    let top_left = first_min_by_key(&points, sum);
    let top_right = first_min_by_key(&points, diff);
    let bottom_right = first_min_by_key(&points, |p| -sum(p));
    let bottom_left = first_min_by_key(&points, |p| -diff(p));

    [top_left, top_right, bottom_right, bottom_left]
}

/// Order four points and tag them with the size of the image they came from.
pub fn order_corners(points: [Point; 4], size: ImageSize) -> Corners {
    Corners::new(order_points(points), size)
}

/// Point with the smallest key; the earliest one among equal keys.
fn first_min_by_key(points: &[Point; 4], key: impl Fn(&Point) -> f64) -> Point {
    let mut best = points[0];
    let mut best_key = key(&best);
    for p in &points[1..] {
        let k = key(p);
        if k < best_key {
            best = *p;
            best_key = k;
        }
    }
    best
}
