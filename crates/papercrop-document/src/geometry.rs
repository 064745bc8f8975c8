// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon helpers — perimeter, enclosed area, Douglas–Peucker simplification
// and convexity testing over closed point sequences.

use papercrop_core::Point;

/// Length of a polyline. When `closed`, the segment from the last point back
/// to the first is included.
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance(&w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 1 => open + last.distance(first),
        _ => open,
    }
}

/// Unsigned area enclosed by a closed polygon (shoelace formula).
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area.abs() / 2.0
}

/// Simplify a closed curve with the Douglas–Peucker algorithm.
///
/// The curve is split at the first point and the point farthest from it; each
/// half is simplified independently, then a clean-up pass drops any kept
/// vertex that lies within `epsilon` of the line through its neighbours
/// (this removes a start point that happened to fall mid-edge).
pub fn approximate_polygon(curve: &[Point], epsilon: f64) -> Vec<Point> {
    let n = curve.len();
    if n <= 3 {
        return curve.to_vec();
    }

    let origin = curve[0];
    let mut split = 1;
    let mut split_dist = f64::MIN;
    for (i, p) in curve.iter().enumerate().skip(1) {
        let d = origin.distance(p);
        if d > split_dist {
            split_dist = d;
            split = i;
        }
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[split] = true;

    let first_half: Vec<usize> = (0..=split).collect();
    let second_half: Vec<usize> = (split..n).chain(std::iter::once(0)).collect();
    mark_chain(curve, &first_half, epsilon, &mut keep);
    mark_chain(curve, &second_half, epsilon, &mut keep);

    let mut polygon: Vec<Point> = curve
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect();

    // Clean-up: a kept vertex can still sit on the line through its
    // neighbours once the whole ring is considered.
    let mut i = 0;
    while polygon.len() > 3 && i < polygon.len() {
        let len = polygon.len();
        let prev = polygon[(i + len - 1) % len];
        let next = polygon[(i + 1) % len];
        if perpendicular_distance(&polygon[i], &prev, &next) <= epsilon {
            polygon.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }

    polygon
}

/// Iterative Douglas–Peucker over one open chain of curve indices. Both chain
/// endpoints are assumed already kept.
fn mark_chain(curve: &[Point], chain: &[usize], epsilon: f64, keep: &mut [bool]) {
    if chain.len() < 3 {
        return;
    }
    let mut stack = vec![(0usize, chain.len() - 1)];

    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }

        let a = curve[chain[start]];
        let b = curve[chain[end]];
        let mut max_dist = 0.0;
        let mut max_index = start;
        for k in (start + 1)..end {
            let dist = perpendicular_distance(&curve[chain[k]], &a, &b);
            if dist > max_dist {
                max_dist = dist;
                max_index = k;
            }
        }

        if max_dist > epsilon {
            keep[chain[max_index]] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }
}

/// Distance from `point` to the infinite line through `a` and `b`, or to `a`
/// when the two coincide.
fn perpendicular_distance(point: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return point.distance(a);
    }
    ((point.x - a.x) * dy - (point.y - a.y) * dx).abs() / len
}

/// True when every turn of the closed polygon bends the same way.
///
/// Collinear triples are ignored; a polygon whose vertices are all
/// collinear, or with fewer than three vertices, is not convex.
pub fn is_convex(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut orientation = 0.0f64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross == 0.0 {
            continue;
        }
        if orientation == 0.0 {
            orientation = cross.signum();
        } else if cross.signum() != orientation {
            return false;
        }
    }

    orientation != 0.0
}
