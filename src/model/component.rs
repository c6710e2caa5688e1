// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Component references and their decomposed transformation.
//!
//! Components are stored with a decomposed transformation (translate,
//! rotation, scale, skew and a transformation center) rather than a raw
//! matrix, so that dragging the rotation pivot can be expressed as an edit
//! of a few named fields. `to_affine` and `from_affine` convert between the
//! two forms.

use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A component reference to another glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Name of the referenced (base) glyph
    pub name: String,
    /// Placement of the base glyph in this glyph
    pub transformation: Transformation,
    /// Designspace location of the base glyph, axis name -> value
    #[serde(default)]
    pub location: BTreeMap<String, f64>,
}

impl Component {
    /// Create a component with an identity transformation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transformation: Transformation::default(),
            location: BTreeMap::new(),
        }
    }

    /// Builder-style setter for the transformation
    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = transformation;
        self
    }

    /// Create a component from norad's Component type
    pub fn from_norad(norad_comp: &norad::Component) -> Self {
        let t = &norad_comp.transform;
        let affine = Affine::new([
            t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset,
        ]);
        Self {
            name: norad_comp.base.to_string(),
            transformation: Transformation::from_affine(affine),
            location: BTreeMap::new(),
        }
    }
}

/// Decomposed affine transformation of a component.
///
/// Angles are in degrees. The transformation center (`t_center_*`) is the
/// pivot for rotation, scale and skew, expressed in the component's own
/// coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transformation {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub t_center_x: f64,
    pub t_center_y: f64,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            t_center_x: 0.0,
            t_center_y: 0.0,
        }
    }
}

impl Transformation {
    /// Compose the full affine matrix.
    ///
    /// `translate(t + c) · rotate · scale · skew(-skewX, skewY) · translate(-c)`
    ///
    /// A positive `skew_x` leans the top of the component to the left.
    pub fn to_affine(&self) -> Affine {
        let center = Vec2::new(self.t_center_x, self.t_center_y);
        let skew = Affine::new([
            1.0,
            self.skew_y.to_radians().tan(),
            (-self.skew_x).to_radians().tan(),
            1.0,
            0.0,
            0.0,
        ]);
        Affine::translate(Vec2::new(self.translate_x, self.translate_y) + center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * skew
            * Affine::translate(-center)
    }

    /// Decompose an affine matrix (QR-like), with the center at the origin
    pub fn from_affine(affine: Affine) -> Self {
        let [mut a, mut b, c, d, x, y] = affine.as_coeffs();
        let sign_x = if a < 0.0 { -1.0 } else { 1.0 };
        a *= sign_x;
        b *= sign_x;
        let delta = a * d - b * c;

        let mut rotation = 0.0;
        let mut scale_x = 0.0;
        let mut scale_y = 0.0;
        let mut skew_x = 0.0;
        let mut skew_y = 0.0;

        if a != 0.0 || b != 0.0 {
            let r = a.hypot(b);
            rotation = if b >= 0.0 {
                (a / r).acos()
            } else {
                -(a / r).acos()
            };
            scale_x = r;
            scale_y = delta / r;
            skew_x = ((a * c + b * d) / (r * r)).atan();
        } else if c != 0.0 || d != 0.0 {
            let s = c.hypot(d);
            rotation = std::f64::consts::FRAC_PI_2
                - if d >= 0.0 {
                    (-c / s).acos()
                } else {
                    -(c / s).acos()
                };
            scale_x = delta / s;
            scale_y = s;
            skew_y = ((a * c + b * d) / (s * s)).atan();
        }

        Self {
            translate_x: x,
            translate_y: y,
            rotation: rotation.to_degrees(),
            scale_x: scale_x * sign_x,
            scale_y,
            skew_x: -skew_x.to_degrees() * sign_x,
            skew_y: skew_y.to_degrees(),
            t_center_x: 0.0,
            t_center_y: 0.0,
        }
    }

    /// Look up a field by its serialized name
    pub fn field(&self, name: &str) -> Option<f64> {
        Some(match name {
            "translateX" => self.translate_x,
            "translateY" => self.translate_y,
            "rotation" => self.rotation,
            "scaleX" => self.scale_x,
            "scaleY" => self.scale_y,
            "skewX" => self.skew_x,
            "skewY" => self.skew_y,
            "tCenterX" => self.t_center_x,
            "tCenterY" => self.t_center_y,
            _ => return None,
        })
    }

    /// Set a field by its serialized name; returns false for unknown names
    pub fn set_field(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "translateX" => &mut self.translate_x,
            "translateY" => &mut self.translate_y,
            "rotation" => &mut self.rotation,
            "scaleX" => &mut self.scale_x,
            "scaleY" => &mut self.scale_y,
            "skewX" => &mut self.skew_x,
            "skewY" => &mut self.skew_y,
            "tCenterX" => &mut self.t_center_x,
            "tCenterY" => &mut self.t_center_y,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn assert_affine_eq(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn default_is_identity() {
        assert_affine_eq(Transformation::default().to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn rotation_pivots_around_t_center() {
        let t = Transformation {
            rotation: 90.0,
            t_center_x: 10.0,
            t_center_y: 0.0,
            ..Default::default()
        };
        let affine = t.to_affine();
        // The center itself stays put
        let center = affine * Point::new(10.0, 0.0);
        assert!((center.x - 10.0).abs() < 1e-9 && center.y.abs() < 1e-9);
        // The origin swings around it
        let origin = affine * Point::ORIGIN;
        assert!((origin.x - 10.0).abs() < 1e-9 && (origin.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn decompose_rotation_and_scale() {
        let affine = Affine::translate((40.0, -20.0))
            * Affine::rotate(30f64.to_radians())
            * Affine::scale_non_uniform(2.0, 3.0);
        let t = Transformation::from_affine(affine);
        assert!((t.rotation - 30.0).abs() < 1e-9);
        assert!((t.scale_x - 2.0).abs() < 1e-9);
        assert!((t.scale_y - 3.0).abs() < 1e-9);
        assert!(t.skew_x.abs() < 1e-9);
        assert_eq!((t.translate_x, t.translate_y), (40.0, -20.0));
        assert_affine_eq(t.to_affine(), affine);
    }

    #[test]
    fn skew_x_leans_against_positive_x() {
        let t = Transformation {
            skew_x: 20.0,
            skew_y: 10.0,
            ..Default::default()
        };
        let tan20 = 20f64.to_radians().tan();
        let tan10 = 10f64.to_radians().tan();
        assert_affine_eq(t.to_affine(), Affine::new([1.0, tan10, -tan20, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn skew_pivots_around_t_center() {
        let t = Transformation {
            translate_x: 100.0,
            skew_x: 20.0,
            t_center_y: 50.0,
            ..Default::default()
        };
        let tan20 = 20f64.to_radians().tan();
        assert_affine_eq(
            t.to_affine(),
            Affine::new([1.0, 0.0, -tan20, 1.0, 100.0 + 50.0 * tan20, 0.0]),
        );
        // Points on the pivot line only pick up the translation
        let on_pivot = t.to_affine() * Point::new(30.0, 50.0);
        assert!((on_pivot.x - 130.0).abs() < 1e-9 && (on_pivot.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn decompose_skew_keeps_sign() {
        let tan20 = 20f64.to_radians().tan();
        let affine = Affine::new([1.0, 0.0, -tan20, 1.0, 0.0, 0.0]);
        let t = Transformation::from_affine(affine);
        assert!((t.skew_x - 20.0).abs() < 1e-9, "{t:?}");
        assert!(t.skew_y.abs() < 1e-9);
        assert_affine_eq(t.to_affine(), affine);
    }

    #[test]
    fn decompose_mirrored_round_trips() {
        let affine = Affine::new([-1.0, 0.0, 0.0, 1.0, 500.0, 0.0]);
        let t = Transformation::from_affine(affine);
        assert_affine_eq(t.to_affine(), affine);
    }

    #[test]
    fn field_access_by_name() {
        let mut t = Transformation::default();
        assert!(t.set_field("tCenterX", 12.0));
        assert!(!t.set_field("bogus", 1.0));
        assert_eq!(t.field("tCenterX"), Some(12.0));
        assert_eq!(t.field("scaleY"), Some(1.0));
        assert_eq!(t.field("bogus"), None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(Transformation::default()).unwrap();
        assert_eq!(json["translateX"], 0.0);
        assert_eq!(json["tCenterY"], 0.0);
        assert_eq!(json["scaleX"], 1.0);
    }
}
