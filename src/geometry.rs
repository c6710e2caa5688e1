// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Closed-form geometry helpers shared by the edit actions.
//!
//! Everything here works on `kurbo` points and vectors and is total:
//! degenerate input (parallel lines, singular matrices, zero-length
//! edges) is reported through `Option`/`bool` rather than producing NaN.

use crate::settings;
use kurbo::{Affine, Point, Vec2};
use std::f64::consts::{PI, TAU};

/// Intersect the infinite line through `p1`-`p2` with the one through
/// `p3`-`p4`.
///
/// Returns `None` when the lines are parallel or either one is
/// degenerate.
pub fn intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.cross(d2);
    if denom.abs() < settings::geometry::LINE_INTERSECTION_EPSILON {
        return None;
    }
    let t = (p3 - p1).cross(d2) / denom;
    Some(p1 + d1 * t)
}

/// Rotate a vector a quarter turn clockwise (y-up coordinates)
pub fn rotate_90_cw(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Round a coordinate the way outline data is stored.
///
/// Half-way cases round away from zero.
pub fn round_coordinate(value: f64) -> f64 {
    value.round()
}

/// Round both coordinates of a point
pub fn round_point(point: Point) -> Point {
    Point::new(round_coordinate(point.x), round_coordinate(point.y))
}

/// Invert an affine transform, refusing (near-)singular matrices
pub fn checked_inverse(affine: Affine) -> Option<Affine> {
    if affine.determinant().abs() < settings::geometry::AFFINE_MIN_DETERMINANT {
        return None;
    }
    Some(affine.inverse())
}

/// Check whether a closed polygon is strictly convex.
///
/// Walks the edges accumulating turning angles: every turn must go the
/// same way and the total must be exactly one revolution. Collinear
/// edges, repeated points and self-intersecting outlines are rejected.
pub fn polygon_is_convex(points: &[Point]) -> bool {
    let len = points.len();
    if len < 3 {
        return false;
    }

    let mut old_point;
    let mut new_point = points[len - 1];
    let mut new_direction = direction(points[len - 2], new_point);
    let mut orientation = 0.0;
    let mut angle_sum = 0.0;

    for (i, &point) in points.iter().enumerate() {
        old_point = new_point;
        let old_direction = new_direction;
        new_point = point;
        if old_point == new_point {
            return false;
        }
        new_direction = direction(old_point, new_point);

        let mut angle = new_direction - old_direction;
        if angle <= -PI {
            angle += TAU;
        } else if angle > PI {
            angle -= TAU;
        }

        if i == 0 {
            if angle == 0.0 {
                return false;
            }
            orientation = if angle > 0.0 { 1.0 } else { -1.0 };
        } else if orientation * angle <= 0.0 {
            return false;
        }
        angle_sum += angle;
    }

    (angle_sum / TAU).round().abs() == 1.0
}

fn direction(from: Point, to: Point) -> f64 {
    (to - from).atan2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_crossing_lines() {
        let hit = intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((hit.x - 5.0).abs() < 1e-9);
        assert!((hit.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn intersect_extends_beyond_segments() {
        let hit = intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(50.0, 20.0),
            Point::new(50.0, 10.0),
        )
        .unwrap();
        assert_eq!(hit, Point::new(50.0, 0.0));
    }

    #[test]
    fn intersect_parallel_is_none() {
        assert!(
            intersect(
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 5.0),
                Point::new(10.0, 5.0),
            )
            .is_none()
        );
    }

    #[test]
    fn intersect_degenerate_line_is_none() {
        let p = Point::new(3.0, 3.0);
        assert!(intersect(p, p, Point::new(0.0, 0.0), Point::new(1.0, 5.0)).is_none());
    }

    #[test]
    fn rotate_quarter_turn() {
        assert_eq!(rotate_90_cw(Vec2::new(1.0, 0.0)), Vec2::new(0.0, -1.0));
        assert_eq!(rotate_90_cw(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_coordinate(2.5), 3.0);
        assert_eq!(round_coordinate(-2.5), -3.0);
        assert_eq!(round_coordinate(-2.4), -2.0);
        assert_eq!(round_point(Point::new(0.5, -0.5)), Point::new(1.0, -1.0));
    }

    #[test]
    fn singular_affine_has_no_inverse() {
        assert!(checked_inverse(Affine::scale_non_uniform(1.0, 0.0)).is_none());
        let inv = checked_inverse(Affine::translate((3.0, 4.0))).unwrap();
        assert_eq!(inv * Point::new(3.0, 4.0), Point::ORIGIN);
    }

    #[test]
    fn square_is_convex_in_both_orientations() {
        let mut square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(polygon_is_convex(&square));
        square.reverse();
        assert!(polygon_is_convex(&square));
    }

    #[test]
    fn concave_and_twisted_quads_are_rejected() {
        let dart = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 5.0),
        ];
        assert!(!polygon_is_convex(&dart));

        let bowtie = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!polygon_is_convex(&bowtie));
    }

    #[test]
    fn collinear_and_repeated_points_are_rejected() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        assert!(!polygon_is_convex(&line));

        let repeated = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!polygon_is_convex(&repeated));
    }
}
