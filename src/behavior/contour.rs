// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-contour edit synthesis.
//!
//! At drag start every contour holding a selected point is unpacked and
//! each of its points is matched against the behavior's rule tree. The
//! result is a `ContourEdits`: a list of prepared actions split into the
//! transform pass and the constrain pass, the segment edits, and the set
//! of points the drag may touch.
//!
//! One drag step runs three passes in a fixed order:
//!
//! 1. transform-pass actions read the original points and write both
//!    working arrays,
//! 2. constrain-pass actions read the first working array (original points
//!    plus transform-pass results) and write the second,
//! 3. segment edits read the second working array.

use super::actions::{Action, ActionKind, EditTransform, Neighbors};
use super::flags::PointFlags;
use super::match_tree::{MatchTree, WINDOW, find_point_match};
use super::rules::Rule;
use super::segments::SegmentEdit;
use crate::model::{ContourPoint, PackedPath};
use kurbo::Point;
use std::collections::BTreeSet;

/// A contour that holds at least one selected point
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackedContour {
    /// Flat index of the contour's first point
    pub start_index: usize,
    pub points: Vec<ContourPoint>,
    pub selected: Vec<bool>,
    pub is_closed: bool,
}

/// Unpack the contours touched by a point selection.
///
/// Indices past the end of the path are skipped.
pub fn unpack_contours(path: &PackedPath, selected: &BTreeSet<usize>) -> Vec<UnpackedContour> {
    let mut contours: Vec<UnpackedContour> = Vec::new();
    for &point_index in selected {
        let Some(contour_index) = path.contour_index_for_point(point_index) else {
            tracing::debug!("Ignoring selected point {} outside the path", point_index);
            continue;
        };
        let start_index = path.contour_start(contour_index);
        let is_current = contours
            .last()
            .is_some_and(|contour| contour.start_index == start_index);
        if !is_current {
            let points = path.points[path.contour_range(contour_index)].to_vec();
            contours.push(UnpackedContour {
                start_index,
                selected: vec![false; points.len()],
                points,
                is_closed: path.contour_info[contour_index].is_closed,
            });
        }
        if let Some(flag) = contours
            .last_mut()
            .and_then(|contour| contour.selected.get_mut(point_index.wrapping_sub(start_index)))
        {
            *flag = true;
        }
    }
    contours
}

#[derive(Debug, Clone, PartialEq)]
struct PointEdit {
    index: usize,
    window: [Option<usize>; WINDOW],
    action: Action,
}

impl PointEdit {
    fn apply(&self, transform: &EditTransform, live: &[Point]) -> Option<Point> {
        let neighbors = Neighbors::gather(live, &self.window)?;
        Some(self.action.apply(transform, &neighbors))
    }
}

/// The prepared edits of one contour
#[derive(Debug, Clone, PartialEq)]
pub struct ContourEdits {
    start_index: usize,
    original: Vec<Point>,
    transform_pass: Vec<PointEdit>,
    constrain_pass: Vec<PointEdit>,
    segment_edits: Vec<SegmentEdit>,
    participating: Vec<usize>,
}

impl ContourEdits {
    /// Match every point of a contour and prepare its actions
    pub fn build(
        contour: &UnpackedContour,
        rules: &[Rule],
        tree: &MatchTree,
        scaling_edit: bool,
    ) -> Self {
        let original: Vec<Point> = contour.points.iter().map(ContourPoint::position).collect();
        let classes: Vec<PointFlags> = contour
            .points
            .iter()
            .zip(&contour.selected)
            .map(|(point, &selected)| {
                PointFlags::classify(point.is_on_curve(), point.smooth, selected)
            })
            .collect();

        let mut transform_pass = Vec::new();
        let mut constrain_pass = Vec::new();
        let mut participating = BTreeSet::new();

        for index in 0..original.len() {
            let Some((found, window)) = find_point_match(tree, index, &classes, contour.is_closed)
            else {
                continue;
            };
            let rule = &rules[found.rule_index];
            tracing::trace!(
                "Point {} matched rule {} ({}, {:?})",
                contour.start_index + index,
                found.rule_index,
                rule.action,
                found.direction
            );

            let kind = match rule.action.parse::<ActionKind>() {
                Ok(kind) => kind,
                Err(err) => {
                    tracing::warn!("Skipping point {}: {}", contour.start_index + index, err);
                    continue;
                }
            };
            let Some(action) = Neighbors::gather(&original, &window)
                .and_then(|neighbors| Action::prepare(kind, &neighbors))
            else {
                tracing::warn!(
                    "Skipping point {}: {:?} is missing a neighbor",
                    contour.start_index + index,
                    kind
                );
                continue;
            };

            participating.insert(index);
            let edit = PointEdit {
                index,
                window,
                action,
            };
            if rule.constrain {
                constrain_pass.push(edit);
            } else {
                transform_pass.push(edit);
            }
        }

        let segment_edits = SegmentEdit::build_all(
            &contour.points,
            &contour.selected,
            contour.is_closed,
            scaling_edit,
        );
        for edit in &segment_edits {
            participating.extend(edit.indices().iter().copied());
        }

        Self {
            start_index: contour.start_index,
            original,
            transform_pass,
            constrain_pass,
            segment_edits,
            participating: participating.into_iter().collect(),
        }
    }

    /// Flat indices of every point a drag step may write, ascending
    pub fn participating_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.participating.iter().map(|&i| i + self.start_index)
    }

    /// Original position of a point by flat index
    pub fn original_point(&self, flat_index: usize) -> Option<Point> {
        flat_index
            .checked_sub(self.start_index)
            .and_then(|i| self.original.get(i).copied())
    }

    /// Number of prepared edits, segment edits counted per point
    pub fn edit_count(&self) -> usize {
        self.transform_pass.len()
            + self.constrain_pass.len()
            + self
                .segment_edits
                .iter()
                .map(|edit| edit.indices().len())
                .sum::<usize>()
    }

    /// Run the three passes for one drag step.
    ///
    /// Returns `(flat index, new position)` in emission order, unrounded.
    pub fn edit(&self, transform: &EditTransform) -> Vec<(usize, Point)> {
        let mut edit_points = self.original.clone();
        let mut additional_points = self.original.clone();
        let mut out = Vec::with_capacity(self.edit_count());

        for edit in &self.transform_pass {
            if let Some(point) = edit.apply(transform, &self.original) {
                edit_points[edit.index] = point;
                additional_points[edit.index] = point;
                out.push((edit.index, point));
            }
        }

        for edit in &self.constrain_pass {
            if let Some(point) = edit.apply(transform, &edit_points) {
                additional_points[edit.index] = point;
                out.push((edit.index, point));
            }
        }

        for edit in &self.segment_edits {
            edit.apply(transform, &self.original, &additional_points, &mut out);
        }

        for (index, _) in &mut out {
            *index += self.start_index;
        }
        out
    }
}
