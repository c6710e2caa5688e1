// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph instance snapshot consumed by the edit behaviors.
//!
//! A `GlyphInstance` is the geometry of one glyph source at drag start: a
//! packed outline (one flat point array, partitioned into contours by
//! `ContourInfo::end_point`) plus the component list. Point indices in
//! change records address the flat array, so they stay contiguous across
//! contours in source order.

use super::component::Component;
use kurbo::Point;
use serde::{Deserialize, Serialize};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Whether a point lies on the curve or is a control handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointKind {
    OnCurve,
    OffCurve,
}

/// A point in a packed outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
    /// Only meaningful for on-curve points
    #[serde(default)]
    pub smooth: bool,
}

impl ContourPoint {
    /// A sharp on-curve point
    pub fn on_curve(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: PointKind::OnCurve,
            smooth: false,
        }
    }

    /// A smooth on-curve point
    pub fn smooth(x: f64, y: f64) -> Self {
        Self {
            smooth: true,
            ..Self::on_curve(x, y)
        }
    }

    /// An off-curve control point
    pub fn off_curve(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: PointKind::OffCurve,
            smooth: false,
        }
    }

    pub fn is_on_curve(&self) -> bool {
        self.kind == PointKind::OnCurve
    }

    pub fn is_off_curve(&self) -> bool {
        self.kind == PointKind::OffCurve
    }

    /// Position as a kurbo point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Per-contour metadata of a packed outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourInfo {
    /// Flat index of the last point of this contour
    pub end_point: usize,
    pub is_closed: bool,
}

/// All contours of a glyph, stored as one flat point array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedPath {
    pub points: Vec<ContourPoint>,
    pub contour_info: Vec<ContourInfo>,
}

/// The geometry of one glyph source, as seen by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphInstance {
    pub path: PackedPath,
    #[serde(default)]
    pub components: Vec<Component>,
}

// ============================================================================
// PACKED PATH
// ============================================================================

impl PackedPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contour
    pub fn push_contour(&mut self, points: impl IntoIterator<Item = ContourPoint>, closed: bool) {
        self.points.extend(points);
        // An empty contour still occupies a slot so contour indices line up
        let end_point = self.points.len().wrapping_sub(1);
        self.contour_info.push(ContourInfo {
            end_point,
            is_closed: closed,
        });
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_contours(&self) -> usize {
        self.contour_info.len()
    }

    /// Flat index of the first point of a contour
    pub fn contour_start(&self, contour_index: usize) -> usize {
        if contour_index == 0 {
            0
        } else {
            self.contour_info
                .get(contour_index - 1)
                .map_or(self.points.len(), |info| info.end_point.wrapping_add(1))
        }
    }

    /// Flat index range covered by a contour
    ///
    /// Clamped to the point array, so inconsistent `end_point` values give
    /// a short (possibly empty) range rather than an out-of-bounds one.
    pub fn contour_range(&self, contour_index: usize) -> std::ops::Range<usize> {
        let len = self.points.len();
        let start = self.contour_start(contour_index).min(len);
        let end = self
            .contour_info
            .get(contour_index)
            .map_or(start, |info| info.end_point.wrapping_add(1))
            .min(len);
        start..end.max(start)
    }

    /// Find the contour a flat point index belongs to
    pub fn contour_index_for_point(&self, point_index: usize) -> Option<usize> {
        if point_index >= self.points.len() {
            return None;
        }
        let idx = self
            .contour_info
            .partition_point(|info| info.end_point.wrapping_add(1) <= point_index);
        (idx < self.contour_info.len()).then_some(idx)
    }

    pub fn point(&self, point_index: usize) -> Option<&ContourPoint> {
        self.points.get(point_index)
    }

    /// Move a point; returns false if the index is out of range
    pub fn set_point_position(&mut self, point_index: usize, x: f64, y: f64) -> bool {
        match self.points.get_mut(point_index) {
            Some(point) => {
                point.x = x;
                point.y = y;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// NORAD IMPORT
// ============================================================================

impl GlyphInstance {
    pub fn new(path: PackedPath, components: Vec<Component>) -> Self {
        Self { path, components }
    }

    /// Build an instance from a UFO glyph
    pub fn from_norad(norad_glyph: &norad::Glyph) -> Self {
        let mut path = PackedPath::new();
        for contour in &norad_glyph.contours {
            let (points, closed) = Self::convert_contour(contour);
            path.push_contour(points, closed);
        }

        let components = norad_glyph
            .components
            .iter()
            .map(Component::from_norad)
            .collect();

        Self { path, components }
    }

    /// Convert a norad contour; a leading `move` point marks an open contour
    fn convert_contour(norad_contour: &norad::Contour) -> (Vec<ContourPoint>, bool) {
        let closed = !matches!(
            norad_contour.points.first().map(|pt| &pt.typ),
            Some(norad::PointType::Move)
        );
        let points = norad_contour
            .points
            .iter()
            .map(Self::convert_point)
            .collect();
        (points, closed)
    }

    fn convert_point(pt: &norad::ContourPoint) -> ContourPoint {
        let kind = match pt.typ {
            norad::PointType::OffCurve => PointKind::OffCurve,
            norad::PointType::Move
            | norad::PointType::Line
            | norad::PointType::Curve
            | norad::PointType::QCurve => PointKind::OnCurve,
        };
        ContourPoint {
            x: pt.x,
            y: pt.y,
            kind,
            smooth: kind == PointKind::OnCurve && pt.smooth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_contours() -> PackedPath {
        let mut path = PackedPath::new();
        path.push_contour(
            [
                ContourPoint::on_curve(0.0, 0.0),
                ContourPoint::on_curve(100.0, 0.0),
                ContourPoint::on_curve(100.0, 100.0),
            ],
            true,
        );
        path.push_contour(
            [
                ContourPoint::on_curve(200.0, 0.0),
                ContourPoint::off_curve(250.0, 50.0),
                ContourPoint::off_curve(300.0, 50.0),
                ContourPoint::smooth(350.0, 0.0),
            ],
            false,
        );
        path
    }

    #[test]
    fn contour_ranges_are_contiguous() {
        let path = two_contours();
        assert_eq!(path.num_points(), 7);
        assert_eq!(path.num_contours(), 2);
        assert_eq!(path.contour_range(0), 0..3);
        assert_eq!(path.contour_range(1), 3..7);
        assert_eq!(path.contour_start(1), 3);
    }

    #[test]
    fn point_to_contour_lookup() {
        let path = two_contours();
        assert_eq!(path.contour_index_for_point(0), Some(0));
        assert_eq!(path.contour_index_for_point(2), Some(0));
        assert_eq!(path.contour_index_for_point(3), Some(1));
        assert_eq!(path.contour_index_for_point(6), Some(1));
        assert_eq!(path.contour_index_for_point(7), None);
    }

    #[test]
    fn contour_range_clamps_to_points() {
        let mut path = two_contours();
        path.contour_info[1].end_point = 42;
        assert_eq!(path.contour_range(1), 3..7);
        // Nothing left for a contour that starts past the end
        path.contour_info.push(ContourInfo {
            end_point: 50,
            is_closed: true,
        });
        assert_eq!(path.contour_range(2), 7..7);
        assert_eq!(path.contour_range(9), 7..7);
    }

    #[test]
    fn set_point_position_checks_bounds() {
        let mut path = two_contours();
        assert!(path.set_point_position(4, 1.0, 2.0));
        assert_eq!(path.point(4).unwrap().position(), Point::new(1.0, 2.0));
        assert!(!path.set_point_position(99, 1.0, 2.0));
    }

    #[test]
    fn import_from_norad() {
        use norad::{ContourPoint as NoradPoint, PointType};

        let mut glyph = norad::Glyph::new("a");
        let open = norad::Contour::new(
            vec![
                NoradPoint::new(0.0, 0.0, PointType::Move, false, None, None, None),
                NoradPoint::new(10.0, 20.0, PointType::OffCurve, false, None, None, None),
                NoradPoint::new(30.0, 20.0, PointType::OffCurve, false, None, None, None),
                NoradPoint::new(40.0, 0.0, PointType::Curve, true, None, None, None),
            ],
            None,
            None,
        );
        let closed = norad::Contour::new(
            vec![
                NoradPoint::new(0.0, 0.0, PointType::Line, false, None, None, None),
                NoradPoint::new(10.0, 0.0, PointType::Line, false, None, None, None),
                NoradPoint::new(10.0, 10.0, PointType::Line, false, None, None, None),
            ],
            None,
            None,
        );
        glyph.contours.push(open);
        glyph.contours.push(closed);

        let instance = GlyphInstance::from_norad(&glyph);
        assert_eq!(instance.path.num_points(), 7);
        assert!(!instance.path.contour_info[0].is_closed);
        assert!(instance.path.contour_info[1].is_closed);
        assert!(instance.path.points[1].is_off_curve());
        assert!(instance.path.points[3].smooth);
        assert!(instance.components.is_empty());
    }
}
