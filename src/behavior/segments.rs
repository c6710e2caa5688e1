// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Segment-level edits.
//!
//! After the per-point rules, each segment (the run of points from one
//! on-curve point to the next) gets a second look. When only its end
//! points are selected, the off-curve points in between are carried along
//! as a group: either translated rigidly (floating mode) or mapped through
//! the affine transform that takes the segment's original tangent frame to
//! its edited one (scaling mode).

use super::actions::EditTransform;
use crate::geometry::{checked_inverse, intersect, polygon_is_convex};
use crate::model::ContourPoint;
use kurbo::{Affine, Point};

/// Segments of a scaling edit need at least the two tangent handles
const SCALING_MIN_LEN: usize = 4;

/// Floating edits need an off-curve point not adjacent to either end
const FLOATING_MIN_LEN: usize = 5;

/// Point indices of every segment in a contour, in contour order.
///
/// A segment starts and ends at an on-curve point. On closed contours the
/// last segment wraps around to the first on-curve point; a closed contour
/// with a single on-curve point has one segment that starts and ends on
/// it. On open contours, off-curve points after the last on-curve point
/// form a trailing segment, and off-curve points before the first one
/// belong to no segment.
pub fn segment_point_indices(points: &[ContourPoint], closed: bool) -> Vec<Vec<usize>> {
    let num_points = points.len();
    let on_curve: Vec<usize> = (0..num_points)
        .filter(|&i| points[i].is_on_curve())
        .collect();
    let Some(&last_on_curve) = on_curve.last() else {
        return Vec::new();
    };

    let mut segments: Vec<Vec<usize>> = on_curve
        .windows(2)
        .map(|pair| (pair[0]..=pair[1]).collect())
        .collect();

    if closed {
        let first_on_curve = on_curve[0];
        let wrapped = (last_on_curve..num_points)
            .chain(0..=first_on_curve)
            .collect();
        segments.push(wrapped);
    } else if last_on_curve + 1 < num_points {
        segments.push((last_on_curve..num_points).collect());
    }
    segments
}

/// A group edit of the interior points of one segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEdit {
    /// Translate the inner off-curve points with the drag
    Floating { indices: Vec<usize> },
    /// Map the interior through the change of the segment's tangent frame
    Scaling {
        /// First point, first handle, last handle, last point
        anchors: [usize; 4],
        interior: Vec<usize>,
        /// Inverse of the original frame
        inverse_frame: Affine,
    },
}

impl SegmentEdit {
    /// Build the edits for every qualifying segment of a contour
    pub fn build_all(
        points: &[ContourPoint],
        selected: &[bool],
        closed: bool,
        scaling: bool,
    ) -> Vec<SegmentEdit> {
        let positions: Vec<Point> = points.iter().map(ContourPoint::position).collect();
        segment_point_indices(points, closed)
            .into_iter()
            .filter_map(|segment| {
                if scaling {
                    Self::scaling(&segment, &positions, selected)
                } else {
                    Self::floating(&segment, selected)
                }
            })
            .collect()
    }

    fn floating(segment: &[usize], selected: &[bool]) -> Option<SegmentEdit> {
        let len = segment.len();
        let qualifies = len >= FLOATING_MIN_LEN
            && selected[segment[0]]
            && selected[segment[len - 1]]
            && interior_unselected(segment, selected);
        qualifies.then(|| SegmentEdit::Floating {
            indices: segment[2..len - 2].to_vec(),
        })
    }

    fn scaling(segment: &[usize], positions: &[Point], selected: &[bool]) -> Option<SegmentEdit> {
        let len = segment.len();
        let qualifies = len >= SCALING_MIN_LEN
            && (selected[segment[0]] || selected[segment[len - 1]])
            && interior_unselected(segment, selected);
        if !qualifies {
            return None;
        }

        let anchors = [segment[0], segment[1], segment[len - 2], segment[len - 1]];
        let frame = segment_frame(positions, anchors, false)?;
        let inverse_frame = checked_inverse(frame)?;
        Some(SegmentEdit::Scaling {
            anchors,
            interior: segment[1..len - 1].to_vec(),
            inverse_frame,
        })
    }

    /// Contour-local indices this edit writes
    pub fn indices(&self) -> &[usize] {
        match self {
            SegmentEdit::Floating { indices } => indices,
            SegmentEdit::Scaling { interior, .. } => interior,
        }
    }

    /// Compute new positions for one drag step.
    ///
    /// `live` holds the contour after the per-point passes of the same
    /// step. Results are pushed as `(contour-local index, position)`.
    pub fn apply(
        &self,
        transform: &EditTransform,
        original: &[Point],
        live: &[Point],
        out: &mut Vec<(usize, Point)>,
    ) {
        match self {
            SegmentEdit::Floating { indices } => {
                out.extend(
                    indices
                        .iter()
                        .map(|&i| (i, transform.constrained(original[i]))),
                );
            }
            SegmentEdit::Scaling {
                anchors,
                interior,
                inverse_frame,
            } => {
                // Concave is fine here: the edit itself may bend the frame
                let mapping = segment_frame(live, *anchors, true).map(|edited| edited * *inverse_frame);
                out.extend(interior.iter().map(|&i| {
                    let point = match mapping {
                        Some(mapping) => mapping * original[i],
                        None => live[i],
                    };
                    (i, point)
                }));
            }
        }
    }
}

fn interior_unselected(segment: &[usize], selected: &[bool]) -> bool {
    segment[1..segment.len() - 1].iter().all(|&i| !selected[i])
}

/// Affine frame spanned by a segment's tangent lines.
///
/// The frame maps the unit square's x axis onto the first tangent (from
/// the start point to where the tangents meet) and its y axis onto the
/// second one (from there to the end point).
fn segment_frame(points: &[Point], anchors: [usize; 4], allow_concave: bool) -> Option<Affine> {
    let [pt0, pt1, pt2, pt3] = anchors.map(|i| points[i]);
    if !allow_concave && !polygon_is_convex(&[pt0, pt1, pt2, pt3]) {
        return None;
    }
    let corner = intersect(pt0, pt1, pt2, pt3)?;
    let v1 = corner - pt0;
    let v2 = pt3 - corner;
    Some(Affine::new([v1.x, v1.y, v2.x, v2.y, pt0.x, pt0.y]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::actions::unconstrained;
    use kurbo::Vec2;

    fn on(x: f64, y: f64) -> ContourPoint {
        ContourPoint::on_curve(x, y)
    }

    fn off(x: f64, y: f64) -> ContourPoint {
        ContourPoint::off_curve(x, y)
    }

    /// One cubic from (0,0) to (100,100), closed with a line
    fn cubic_contour() -> Vec<ContourPoint> {
        vec![
            on(0.0, 0.0),
            off(0.0, 55.0),
            off(45.0, 100.0),
            on(100.0, 100.0),
        ]
    }

    fn with_translation(delta: Vec2, check: impl FnOnce(&EditTransform)) {
        let moved = move |p: Point| p + delta;
        check(&EditTransform::new(&moved, &moved, unconstrained));
    }

    #[test]
    fn closed_segments_wrap() {
        let segments = segment_point_indices(&cubic_contour(), true);
        assert_eq!(segments, vec![vec![0, 1, 2, 3], vec![3, 0]]);
    }

    #[test]
    fn open_segments_keep_trailing_off_curves() {
        let points = vec![
            off(0.0, 0.0),
            on(10.0, 0.0),
            off(20.0, 0.0),
            on(30.0, 0.0),
            off(40.0, 0.0),
        ];
        let segments = segment_point_indices(&points, false);
        assert_eq!(segments, vec![vec![1, 2, 3], vec![3, 4]]);
    }

    #[test]
    fn single_on_curve_closed_contour() {
        let points = vec![off(0.0, 0.0), on(10.0, 0.0), off(20.0, 0.0)];
        assert_eq!(
            segment_point_indices(&points, true),
            vec![vec![1, 2, 0, 1]]
        );
    }

    #[test]
    fn no_on_curve_no_segments() {
        let points = vec![off(0.0, 0.0), off(10.0, 0.0)];
        assert!(segment_point_indices(&points, true).is_empty());
    }

    #[test]
    fn floating_needs_both_ends_selected() {
        let points = vec![
            on(0.0, 0.0),
            off(10.0, 0.0),
            off(20.0, 0.0),
            off(30.0, 0.0),
            on(40.0, 0.0),
        ];
        let both = [true, false, false, false, true];
        let edits = SegmentEdit::build_all(&points, &both, false, false);
        assert_eq!(edits, vec![SegmentEdit::Floating { indices: vec![2] }]);

        let one = [true, false, false, false, false];
        assert!(SegmentEdit::build_all(&points, &one, false, false).is_empty());

        let interior = [true, false, true, false, true];
        assert!(SegmentEdit::build_all(&points, &interior, false, false).is_empty());
    }

    #[test]
    fn floating_translates_original_points() {
        let edit = SegmentEdit::Floating { indices: vec![2] };
        let original = [Point::new(20.0, 0.0); 5];
        let mut out = Vec::new();
        with_translation(Vec2::new(5.0, 5.0), |t| {
            edit.apply(t, &original, &original, &mut out);
        });
        assert_eq!(out, vec![(2, Point::new(25.0, 5.0))]);
    }

    #[test]
    fn scaling_follows_moved_end_point() {
        let points = cubic_contour();
        let selected = [false, false, false, true];
        let edits = SegmentEdit::build_all(&points, &selected, false, true);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].indices(), &[1, 2]);

        // End point dragged to (200, 100)
        let original: Vec<Point> = points.iter().map(ContourPoint::position).collect();
        let mut live = original.clone();
        live[3] = Point::new(200.0, 100.0);
        let mut out = Vec::new();
        with_translation(Vec2::new(100.0, 0.0), |t| {
            edits[0].apply(t, &original, &live, &mut out);
        });

        // The frame stretches horizontally: x scales by two
        assert_eq!(out.len(), 2);
        let (i, p) = out[0];
        assert_eq!(i, 1);
        assert!((p - Point::new(0.0, 55.0)).hypot() < 1e-9, "{p:?}");
        let (i, p) = out[1];
        assert_eq!(i, 2);
        assert!((p - Point::new(90.0, 100.0)).hypot() < 1e-9, "{p:?}");
    }

    #[test]
    fn scaling_skips_non_convex_frame() {
        // Handles cross over: the anchor quad is self-intersecting
        let points = vec![
            on(0.0, 0.0),
            off(100.0, 60.0),
            off(0.0, 60.0),
            on(100.0, 0.0),
        ];
        let selected = [true, false, false, false];
        assert!(SegmentEdit::build_all(&points, &selected, false, true).is_empty());
    }

    #[test]
    fn scaling_skips_parallel_tangents() {
        let points = vec![
            on(0.0, 0.0),
            off(0.0, 50.0),
            off(100.0, 50.0),
            on(100.0, 0.0),
        ];
        let selected = [true, false, false, false];
        assert!(SegmentEdit::build_all(&points, &selected, false, true).is_empty());
    }

    #[test]
    fn scaling_falls_back_to_live_points_when_frame_collapses() {
        let points = cubic_contour();
        let selected = [false, false, false, true];
        let edits = SegmentEdit::build_all(&points, &selected, false, true);
        let original: Vec<Point> = points.iter().map(ContourPoint::position).collect();
        // End point dragged onto the first tangent line: tangents parallel
        let mut live = original.clone();
        live[2] = Point::new(0.0, 100.0);
        live[3] = Point::new(0.0, 200.0);
        let mut out = Vec::new();
        with_translation(Vec2::ZERO, |t| {
            edits[0].apply(t, &original, &live, &mut out);
        });
        assert_eq!(out, vec![(1, live[1]), (2, live[2])]);
    }
}
