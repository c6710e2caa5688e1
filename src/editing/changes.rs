// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Path-addressed change records.
//!
//! A `ChangeRecord` is the unit exchanged with the host: a tree of field
//! assignments addressed by relative paths. On the wire a node is
//! `{"p": [...], "f": "<op>", "a": [...], "c": [...]}` with every key
//! optional: leaves carry `f`/`a`, branches carry `p`/`c`.
//!
//! Supported operations:
//! - `=xy` on `path`: `[pointIndex, x, y]` moves one point
//! - `=` on objects: `[fieldName, value]` assigns a field

use crate::error::ChangeError;
use crate::model::{Component, GlyphInstance, PackedPath, Transformation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of a change path: an object key or a list index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    Index(usize),
    Key(String),
}

impl From<usize> for PathElement {
    fn from(index: usize) -> Self {
        PathElement::Index(index)
    }
}

impl From<&str> for PathElement {
    fn from(key: &str) -> Self {
        PathElement::Key(key.to_string())
    }
}

impl std::fmt::Display for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathElement::Index(index) => write!(f, "{index}"),
            PathElement::Key(key) => write!(f, "{key:?}"),
        }
    }
}

/// A node in a change tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "p", default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathElement>,
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    #[serde(rename = "a", default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChangeRecord>,
}

impl ChangeRecord {
    /// A leaf operation
    pub fn op(op: &str, args: Vec<Value>) -> Self {
        Self {
            op: Some(op.to_string()),
            args,
            ..Default::default()
        }
    }

    /// A branch grouping children under a path
    pub fn branch(path: Vec<PathElement>, children: Vec<ChangeRecord>) -> Self {
        Self {
            path,
            children,
            ..Default::default()
        }
    }

    /// True if applying this change does nothing
    pub fn is_empty(&self) -> bool {
        self.op.is_none() && self.children.iter().all(ChangeRecord::is_empty)
    }
}

// ============================================================================
// CHANGE CONSTRUCTORS
// ============================================================================

/// Encode a coordinate, keeping integral values integral on the wire
pub fn number(value: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// `{f: "=xy", a: [index, x, y]}`
pub fn point_change(point_index: usize, x: f64, y: f64) -> ChangeRecord {
    ChangeRecord::op("=xy", vec![Value::from(point_index), number(x), number(y)])
}

fn field_change(field: &str, value: f64) -> ChangeRecord {
    ChangeRecord::op("=", vec![Value::from(field), number(value)])
}

/// Assign a component's translation
pub fn component_origin_change(component_index: usize, x: f64, y: f64) -> ChangeRecord {
    ChangeRecord::branch(
        vec![component_index.into(), "transformation".into()],
        vec![field_change("translateX", x), field_change("translateY", y)],
    )
}

/// Assign a component's translation and transformation center together
pub fn component_t_center_change(
    component_index: usize,
    x: f64,
    y: f64,
    center_x: f64,
    center_y: f64,
) -> ChangeRecord {
    ChangeRecord::branch(
        vec![component_index.into(), "transformation".into()],
        vec![
            field_change("translateX", x),
            field_change("translateY", y),
            field_change("tCenterX", center_x),
            field_change("tCenterY", center_y),
        ],
    )
}

// ============================================================================
// CONSOLIDATION
// ============================================================================

/// Merge changes into one record, hoisting their common path prefix and
/// prepending `prefix`.
///
/// A single change is returned as-is (re-rooted under `prefix`); several
/// become the children of a new branch.
pub fn consolidate_changes(changes: Vec<ChangeRecord>, prefix: &[PathElement]) -> ChangeRecord {
    let (mut change, path) = match <[ChangeRecord; 1]>::try_from(changes) {
        Ok([mut change]) => {
            let path = std::mem::take(&mut change.path);
            (change, path)
        }
        Err(changes) => {
            let common = common_prefix(&changes);
            let children = changes
                .into_iter()
                .map(|mut child| {
                    child.path.drain(..common.len());
                    child
                })
                .collect();
            (ChangeRecord::branch(Vec::new(), children), common)
        }
    };

    let mut full_path = prefix.to_vec();
    full_path.extend(path);
    change.path = full_path;
    change
}

fn common_prefix(changes: &[ChangeRecord]) -> Vec<PathElement> {
    let Some((first, rest)) = changes.split_first() else {
        return Vec::new();
    };
    let mut prefix = Vec::new();
    for (position, element) in first.path.iter().enumerate() {
        if rest
            .iter()
            .any(|change| change.path.get(position) != Some(element))
        {
            break;
        }
        prefix.push(element.clone());
    }
    prefix
}

// ============================================================================
// APPLYING CHANGES
// ============================================================================

/// Apply a change record to a glyph instance.
///
/// The node's own operation runs before its children. On error the
/// instance may be partially modified.
pub fn apply_change(instance: &mut GlyphInstance, change: &ChangeRecord) -> Result<(), ChangeError> {
    apply_to(Target::Glyph(instance), change).inspect_err(|err| {
        tracing::warn!("Failed to apply change: {}", err);
    })
}

fn apply_to(mut target: Target<'_>, change: &ChangeRecord) -> Result<(), ChangeError> {
    for element in &change.path {
        target = target.descend(element)?;
    }
    if let Some(op) = &change.op {
        target.apply_op(op, &change.args)?;
    }
    for child in &change.children {
        apply_to(target.reborrow(), child)?;
    }
    Ok(())
}

/// The object a change path currently points at
enum Target<'a> {
    Glyph(&'a mut GlyphInstance),
    Path(&'a mut PackedPath),
    Components(&'a mut Vec<Component>),
    Component(&'a mut Component),
    Transformation(&'a mut Transformation),
}

impl<'a> Target<'a> {
    fn name(&self) -> &'static str {
        match self {
            Target::Glyph(_) => "glyph",
            Target::Path(_) => "path",
            Target::Components(_) => "components",
            Target::Component(_) => "component",
            Target::Transformation(_) => "transformation",
        }
    }

    fn reborrow(&mut self) -> Target<'_> {
        match self {
            Target::Glyph(glyph) => Target::Glyph(glyph),
            Target::Path(path) => Target::Path(path),
            Target::Components(components) => Target::Components(components),
            Target::Component(component) => Target::Component(component),
            Target::Transformation(transformation) => Target::Transformation(transformation),
        }
    }

    fn descend(self, element: &PathElement) -> Result<Target<'a>, ChangeError> {
        let target = self.name();
        let invalid = || ChangeError::InvalidPath {
            target,
            element: element.to_string(),
        };
        match (self, element) {
            (Target::Glyph(glyph), PathElement::Key(key)) => match key.as_str() {
                "path" => Ok(Target::Path(&mut glyph.path)),
                "components" => Ok(Target::Components(&mut glyph.components)),
                _ => Err(invalid()),
            },
            (Target::Components(components), PathElement::Index(index)) => {
                let len = components.len();
                components
                    .get_mut(*index)
                    .map(Target::Component)
                    .ok_or(ChangeError::IndexOutOfRange {
                        target,
                        index: *index,
                        len,
                    })
            }
            (Target::Component(component), PathElement::Key(key)) if key == "transformation" => {
                Ok(Target::Transformation(&mut component.transformation))
            }
            _ => Err(invalid()),
        }
    }

    fn apply_op(&mut self, op: &str, args: &[Value]) -> Result<(), ChangeError> {
        let target = self.name();
        match (self, op) {
            (Target::Path(path), "=xy") => {
                let [index, x, y] = args else {
                    return Err(bad_args(op, "expected [pointIndex, x, y]"));
                };
                let index = as_index(op, index)?;
                let (x, y) = (as_number(op, x)?, as_number(op, y)?);
                let len = path.num_points();
                if !path.set_point_position(index, x, y) {
                    return Err(ChangeError::IndexOutOfRange { target, index, len });
                }
                Ok(())
            }
            (Target::Transformation(transformation), "=") => {
                let [field, value] = args else {
                    return Err(bad_args(op, "expected [fieldName, value]"));
                };
                let field = as_key(op, field)?;
                let value = as_number(op, value)?;
                if transformation.set_field(field, value) {
                    Ok(())
                } else {
                    Err(ChangeError::UnknownField(field.to_string()))
                }
            }
            (Target::Component(component), "=") => {
                let [field, value] = args else {
                    return Err(bad_args(op, "expected [fieldName, value]"));
                };
                match as_key(op, field)? {
                    "name" => {
                        component.name = value
                            .as_str()
                            .ok_or_else(|| bad_args(op, "name must be a string"))?
                            .to_string();
                        Ok(())
                    }
                    other => Err(ChangeError::UnknownField(other.to_string())),
                }
            }
            _ => Err(ChangeError::UnsupportedOperation {
                target,
                op: op.to_string(),
            }),
        }
    }
}

fn bad_args(op: &str, reason: &str) -> ChangeError {
    ChangeError::BadArguments {
        op: op.to_string(),
        reason: reason.to_string(),
    }
}

fn as_index(op: &str, value: &Value) -> Result<usize, ChangeError> {
    value
        .as_u64()
        .and_then(|index| usize::try_from(index).ok())
        .ok_or_else(|| bad_args(op, "index must be a non-negative integer"))
}

fn as_number(op: &str, value: &Value) -> Result<f64, ChangeError> {
    value
        .as_f64()
        .ok_or_else(|| bad_args(op, "value must be a number"))
}

fn as_key<'v>(op: &str, value: &'v Value) -> Result<&'v str, ChangeError> {
    value
        .as_str()
        .ok_or_else(|| bad_args(op, "field name must be a string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContourPoint;
    use serde_json::json;

    fn instance() -> GlyphInstance {
        let mut path = PackedPath::new();
        path.push_contour(
            [
                ContourPoint::on_curve(0.0, 0.0),
                ContourPoint::on_curve(100.0, 0.0),
                ContourPoint::on_curve(100.0, 100.0),
            ],
            true,
        );
        GlyphInstance::new(path, vec![Component::new("acute"), Component::new("dot")])
    }

    #[test]
    fn integral_numbers_serialize_as_integers() {
        assert_eq!(number(5.0), json!(5));
        assert_eq!(number(-2.0), json!(-2));
        assert_eq!(number(2.5), json!(2.5));
    }

    #[test]
    fn single_change_is_rerooted() {
        let change = consolidate_changes(vec![point_change(3, 5.0, -2.0)], &["path".into()]);
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"p": ["path"], "f": "=xy", "a": [3, 5, -2]})
        );
    }

    #[test]
    fn several_changes_become_children() {
        let change = consolidate_changes(
            vec![point_change(0, 1.0, 2.0), point_change(1, 3.0, 4.0)],
            &["path".into()],
        );
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({
                "p": ["path"],
                "c": [
                    {"f": "=xy", "a": [0, 1, 2]},
                    {"f": "=xy", "a": [1, 3, 4]},
                ]
            })
        );
    }

    #[test]
    fn common_prefix_is_hoisted() {
        let change = consolidate_changes(
            vec![
                component_origin_change(1, 10.0, 20.0),
                component_t_center_change(1, 10.0, 20.0, 5.0, 5.0),
            ],
            &["components".into()],
        );
        assert_eq!(
            change.path,
            vec![
                PathElement::from("components"),
                PathElement::Index(1),
                PathElement::from("transformation")
            ]
        );
        assert_eq!(change.children.len(), 2);
        assert!(change.children.iter().all(|c| c.path.is_empty()));
    }

    #[test]
    fn disjoint_paths_keep_their_prefixes() {
        let change = consolidate_changes(
            vec![
                consolidate_changes(vec![point_change(0, 1.0, 1.0)], &["path".into()]),
                consolidate_changes(
                    vec![component_origin_change(0, 1.0, 1.0)],
                    &["components".into()],
                ),
            ],
            &[],
        );
        assert!(change.path.is_empty());
        assert_eq!(change.children[0].path, vec![PathElement::from("path")]);
        assert_eq!(change.children[1].path[0], PathElement::from("components"));
    }

    #[test]
    fn empty_consolidation_is_a_no_op() {
        let change = consolidate_changes(Vec::new(), &[]);
        assert!(change.is_empty());
        let mut glyph = instance();
        apply_change(&mut glyph, &change).unwrap();
        assert_eq!(glyph, instance());
    }

    #[test]
    fn apply_point_and_component_changes() {
        let mut glyph = instance();
        let change = consolidate_changes(
            vec![
                consolidate_changes(
                    vec![point_change(0, 7.0, 8.0), point_change(2, 1.0, 1.0)],
                    &["path".into()],
                ),
                consolidate_changes(
                    vec![component_t_center_change(1, 3.0, 4.0, 5.0, 6.0)],
                    &["components".into()],
                ),
            ],
            &[],
        );
        apply_change(&mut glyph, &change).unwrap();

        assert_eq!(glyph.path.points[0].position(), kurbo::Point::new(7.0, 8.0));
        assert_eq!(glyph.path.points[2].position(), kurbo::Point::new(1.0, 1.0));
        let t = glyph.components[1].transformation;
        assert_eq!((t.translate_x, t.translate_y), (3.0, 4.0));
        assert_eq!((t.t_center_x, t.t_center_y), (5.0, 6.0));
        assert_eq!(glyph.components[0], Component::new("acute"));
    }

    #[test]
    fn apply_rejects_bad_targets() {
        let mut glyph = instance();
        let bad_index = consolidate_changes(vec![point_change(9, 0.0, 0.0)], &["path".into()]);
        assert!(matches!(
            apply_change(&mut glyph, &bad_index),
            Err(ChangeError::IndexOutOfRange { index: 9, .. })
        ));

        let bad_component = consolidate_changes(
            vec![component_origin_change(5, 0.0, 0.0)],
            &["components".into()],
        );
        assert!(apply_change(&mut glyph, &bad_component).is_err());

        let bad_op = ChangeRecord {
            path: vec!["path".into()],
            ..ChangeRecord::op("insertPoint", vec![])
        };
        assert!(matches!(
            apply_change(&mut glyph, &bad_op),
            Err(ChangeError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn deserializes_wire_format() {
        let change: ChangeRecord = serde_json::from_value(json!({
            "p": ["components", 0, "transformation"],
            "c": [{"f": "=", "a": ["rotation", 45]}]
        }))
        .unwrap();
        let mut glyph = instance();
        apply_change(&mut glyph, &change).unwrap();
        assert_eq!(glyph.components[0].transformation.rotation, 45.0);
    }
}
