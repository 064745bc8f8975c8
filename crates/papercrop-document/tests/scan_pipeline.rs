// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the document scanner on synthetic captures: detection,
// the candidate-pool cutoff, rectification sizing and enhancement.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point as DrawPoint;
use imageproc::rect::Rect;

use papercrop_core::{Corners, ImageSize, Point, ScanConfig, ScanError};
use papercrop_document::scan::output_dimensions;
use papercrop_document::DocumentScanner;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Distance a detected corner may sit from the drawn one. The edge band is
/// dilated outward by a few pixels, so the traced outline is slightly larger
/// than the shape itself.
const CORNER_TOLERANCE: f64 = 12.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn black_frame() -> RgbImage {
    RgbImage::new(800, 600)
}

/// 800x600 black frame holding one white axis-aligned sheet.
fn sheet_frame() -> DynamicImage {
    let mut img = black_frame();
    draw_filled_rect_mut(&mut img, Rect::at(100, 100).of_size(600, 400), WHITE);
    DynamicImage::ImageRgb8(img)
}

fn assert_near(actual: Point, expected: (f64, f64)) {
    assert_within(actual, expected, CORNER_TOLERANCE);
}

fn assert_within(actual: Point, expected: (f64, f64), tolerance: f64) {
    let expected = Point::from(expected);
    assert!(
        actual.distance(&expected) <= tolerance,
        "corner {actual} too far from {expected}"
    );
}

#[test]
fn blank_frame_yields_no_document() {
    init_tracing();
    let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 600, Rgb([128, 128, 128])));
    assert!(DocumentScanner::default().detect(&frame).unwrap().is_none());
}

#[test]
fn black_frame_yields_no_document() {
    let frame = DynamicImage::ImageRgb8(black_frame());
    assert!(papercrop_document::detect(&frame).unwrap().is_none());
}

#[test]
fn axis_aligned_sheet_is_detected_in_canonical_order() {
    init_tracing();
    let frame = sheet_frame();
    let corners = DocumentScanner::default()
        .detect(&frame)
        .unwrap()
        .expect("sheet should be detected");

    assert_near(corners.top_left, (100.0, 100.0));
    assert_near(corners.top_right, (700.0, 100.0));
    assert_near(corners.bottom_right, (700.0, 500.0));
    assert_near(corners.bottom_left, (100.0, 500.0));
    assert_eq!(corners.size, ImageSize::new(800, 600));
}

#[test]
fn axis_aligned_sheet_rectifies_to_600_by_400() {
    let frame = sheet_frame();
    let corners = Corners::new(
        [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)].map(Point::from),
        ImageSize::new(800, 600),
    );
    let page = DocumentScanner::default()
        .rectify_and_enhance(&frame, &corners, false)
        .unwrap();
    assert_eq!((page.width(), page.height()), (600, 400));
}

#[test]
fn detected_sheet_rectifies_to_measured_size() {
    let frame = sheet_frame();
    let scanner = DocumentScanner::default();
    let corners = scanner.detect(&frame).unwrap().unwrap();

    let page = scanner.rectify_and_enhance(&frame, &corners, false).unwrap();
    let dims = output_dimensions(&corners);
    assert_eq!((page.width(), page.height()), (dims.width, dims.height));
    assert!(page.width().abs_diff(600) <= 2 * CORNER_TOLERANCE as u32);
    assert!(page.height().abs_diff(400) <= 2 * CORNER_TOLERANCE as u32);
}

#[test]
fn skewed_sheet_is_detected_and_unwarped() {
    let tl = (200, 100);
    let tr = (600, 150);
    let br = (560, 470);
    let bl = (160, 420);
    let mut img = black_frame();
    draw_polygon_mut(
        &mut img,
        &[tl, tr, br, bl].map(|(x, y)| DrawPoint::new(x, y)),
        WHITE,
    );
    let frame = DynamicImage::ImageRgb8(img);

    let scanner = DocumentScanner::default();
    let corners = scanner.detect(&frame).unwrap().expect("skewed sheet should be detected");
    let as_f64 = |(x, y): (i32, i32)| (f64::from(x), f64::from(y));
    assert_near(corners.top_left, as_f64(tl));
    assert_near(corners.top_right, as_f64(tr));
    assert_near(corners.bottom_right, as_f64(br));
    assert_near(corners.bottom_left, as_f64(bl));

    // Top and bottom edges are both ~403.1 px, the sides ~322.5 px.
    let page = scanner.rectify_and_enhance(&frame, &corners, false).unwrap();
    let dims = output_dimensions(&corners);
    assert_eq!((page.width(), page.height()), (dims.width, dims.height));
    assert!(page.width().abs_diff(403) <= 2 * CORNER_TOLERANCE as u32);
    assert!(page.height().abs_diff(322) <= 2 * CORNER_TOLERANCE as u32);

    // The centre of the unwarped page is paper, not background.
    let centre = page.to_rgb8().get_pixel(page.width() / 2, page.height() / 2).0;
    assert!(centre.iter().all(|&c| c > 200), "centre = {centre:?}");
}

/// Five large disks and one small square: the square's outline ranks
/// below all five disks (each disk also contributes its inner hole border),
/// so it lies outside the default candidate pool.
fn disks_and_small_square() -> DynamicImage {
    let mut img = black_frame();
    for center in [(100, 110), (300, 110), (500, 110), (700, 110), (100, 400)] {
        draw_filled_circle_mut(&mut img, center, 70, WHITE);
    }
    draw_filled_rect_mut(&mut img, Rect::at(420, 380).of_size(60, 60), WHITE);
    DynamicImage::ImageRgb8(img)
}

#[test]
fn quadrilateral_outside_candidate_pool_is_not_found() {
    init_tracing();
    let frame = disks_and_small_square();
    let scanner = DocumentScanner::default();

    let contours = scanner.find_contours(&frame).unwrap();
    assert!(contours.len() > 5, "expected many contours, got {}", contours.len());
    assert!(scanner.detect(&frame).unwrap().is_none());
}

#[test]
fn widening_candidate_pool_finds_the_square() {
    let frame = disks_and_small_square();
    let scanner = DocumentScanner::new(ScanConfig {
        max_candidates: 20,
        ..ScanConfig::default()
    })
    .unwrap();

    let corners = scanner.detect(&frame).unwrap().expect("square within widened pool");
    assert_near(corners.top_left, (420.0, 380.0));
    assert_near(corners.bottom_right, (480.0, 440.0));
}

#[test]
fn preview_corners_scale_to_full_resolution() {
    let full = sheet_frame();
    let preview = full.resize_exact(400, 300, image::imageops::FilterType::Triangle);

    let scanner = DocumentScanner::default();
    let preview_corners = scanner.detect(&preview).unwrap().expect("sheet in preview");
    assert_eq!(preview_corners.size, ImageSize::new(400, 300));

    // Scaling doubles the preview's outward offset as well.
    let tolerance = 2.5 * CORNER_TOLERANCE;
    let corners = preview_corners.scaled_to(ImageSize::new(full.width(), full.height()));
    assert_within(corners.top_left, (100.0, 100.0), tolerance);
    assert_within(corners.bottom_right, (700.0, 500.0), tolerance);

    let page = scanner.rectify_and_enhance(&full, &corners, true).unwrap();
    assert!(page.width().abs_diff(600) <= 2 * tolerance as u32);
    assert!(page.height().abs_diff(400) <= 2 * tolerance as u32);
}

#[test]
fn enhanced_page_is_strictly_binary() {
    let mut img = RgbImage::from_fn(800, 600, |x, y| {
        let shade = 170 + ((x + y) % 40) as u8;
        Rgb([shade, shade, shade])
    });
    for row in 0..10 {
        draw_filled_rect_mut(&mut img, Rect::at(150, 130 + row * 35).of_size(420, 4), Rgb([30, 30, 30]));
    }
    let frame = DynamicImage::ImageRgb8(img);
    let corners = Corners::new(
        [(100.0, 100.0), (700.0, 100.0), (700.0, 500.0), (100.0, 500.0)].map(Point::from),
        ImageSize::new(800, 600),
    );

    let page = DocumentScanner::default()
        .rectify_and_enhance(&frame, &corners, true)
        .unwrap();
    let gray = page.to_luma8();
    assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert!(gray.pixels().any(|p| p.0[0] == 0));
    assert!(gray.pixels().any(|p| p.0[0] == 255));
}

#[test]
fn degenerate_confirmation_is_reported() {
    let frame = sheet_frame();
    let corners = Corners::new(
        [(300.0, 300.0), (300.0, 300.0), (300.0, 300.0), (300.0, 300.0)].map(Point::from),
        ImageSize::new(800, 600),
    );
    let err = DocumentScanner::default()
        .rectify_and_enhance(&frame, &corners, true)
        .unwrap_err();
    assert!(matches!(err, ScanError::DegenerateGeometry { .. }));
}

#[test]
fn concurrent_detection_is_independent() {
    let scanner = DocumentScanner::default();
    let sheet = sheet_frame();
    let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 600, Rgb([90, 90, 90])));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let scanner = &scanner;
                let frame = if i % 2 == 0 { &sheet } else { &blank };
                s.spawn(move || scanner.detect(frame).unwrap().is_some())
            })
            .collect();
        let found: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(found, vec![true, false, true, false]);
    });
}

#[test]
fn far_off_frame_corners_are_refused_without_panicking() {
    let frame = DynamicImage::ImageRgb8(RgbImage::new(200, 200));
    let corners = Corners::new(
        [(0.0, 0.0), (5e9, 0.0), (5e9, 5e9), (0.0, 5e9)].map(Point::from),
        ImageSize::new(200, 200),
    );
    let err = DocumentScanner::default()
        .rectify_and_enhance(&frame, &corners, false)
        .unwrap_err();
    assert!(matches!(err, ScanError::InvalidInput(_)), "got {err:?}");
}
