// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Component edits: dragging an origin or a transformation center.

use super::actions::EditTransform;
use crate::editing::changes::{ChangeRecord, component_origin_change, component_t_center_change};
use crate::geometry::{checked_inverse, round_point};
use crate::model::{Component, Transformation};
use kurbo::{Affine, Point};

/// The edit of one selected component
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEdit {
    /// Move the component's translation with the drag
    Origin { index: usize, origin: Point },
    /// Move the pivot while keeping the component visually in place
    TCenter {
        index: usize,
        transformation: Transformation,
        affine: Affine,
        inverse: Affine,
        /// The pivot in glyph coordinates
        center: Point,
    },
}

impl ComponentEdit {
    pub fn origin(index: usize, component: &Component) -> Self {
        let t = &component.transformation;
        ComponentEdit::Origin {
            index,
            origin: Point::new(t.translate_x, t.translate_y),
        }
    }

    /// Returns `None` when the transformation cannot be inverted
    pub fn t_center(index: usize, component: &Component) -> Option<Self> {
        let transformation = component.transformation;
        let affine = transformation.to_affine();
        let inverse = checked_inverse(affine)?;
        let center = affine * Point::new(transformation.t_center_x, transformation.t_center_y);
        Some(ComponentEdit::TCenter {
            index,
            transformation,
            affine,
            inverse,
            center,
        })
    }

    pub fn index(&self) -> usize {
        match self {
            ComponentEdit::Origin { index, .. } | ComponentEdit::TCenter { index, .. } => *index,
        }
    }

    /// Change record for one drag step
    pub fn edit(&self, transform: &EditTransform) -> ChangeRecord {
        match self {
            ComponentEdit::Origin { index, origin } => {
                let moved = round_point(transform.constrained(*origin));
                component_origin_change(*index, moved.x, moved.y)
            }
            ComponentEdit::TCenter {
                index,
                transformation,
                affine,
                inverse,
                center,
            } => {
                let new_center = round_point(*inverse * transform.constrained(*center));
                let edited = Transformation {
                    t_center_x: new_center.x,
                    t_center_y: new_center.y,
                    ..*transformation
                };
                // Compensate so the component does not move on screen
                let shift = affine.translation() - edited.to_affine().translation();
                component_t_center_change(
                    *index,
                    transformation.translate_x + shift.x,
                    transformation.translate_y + shift.y,
                    new_center.x,
                    new_center.y,
                )
            }
        }
    }

    /// Change record restoring the original fields
    pub fn rollback(&self) -> ChangeRecord {
        match self {
            ComponentEdit::Origin { index, origin } => {
                component_origin_change(*index, origin.x, origin.y)
            }
            ComponentEdit::TCenter {
                index,
                transformation: t,
                ..
            } => component_t_center_change(
                *index,
                t.translate_x,
                t.translate_y,
                t.t_center_x,
                t.t_center_y,
            ),
        }
    }
}
