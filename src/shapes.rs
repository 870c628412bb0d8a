//! Polygon builders centred on the origin.
//!
//! Vertices come out counterclockwise; position the resulting body with
//! [`Body::set_centroid`](crate::body::Body::set_centroid).

use crate::library::Vector;
use std::f64::consts::TAU;

/// Axis-aligned rectangle: top-left, bottom-left, bottom-right, top-right.
pub fn rect(width: f64, height: f64) -> Vec<Vector> {
    let half_width = Vector::new(width / 2.0, 0.0);
    let half_height = Vector::new(0.0, height / 2.0);
    vec![
        half_height - half_width,
        -half_width - half_height,
        half_width - half_height,
        half_width + half_height,
    ]
}

/// Regular polygon with `points` vertices on a circle of `radius`, the
/// first vertex at `(radius, 0)`.
pub fn regular_polygon(radius: f64, points: usize) -> Vec<Vector> {
    assert!(points >= 3, "a polygon needs at least three vertices, got {points}");
    let arc_angle = TAU / points as f64;
    let mut point = Vector::new(radius, 0.0);
    let mut polygon = Vec::with_capacity(points);
    for _ in 0..points {
        polygon.push(point);
        point = point.rotate(arc_angle);
    }
    polygon
}

/// Circle approximated by a regular polygon.
pub fn circle(radius: f64, points: usize) -> Vec<Vector> {
    regular_polygon(radius, points)
}
