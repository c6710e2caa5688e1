// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit sessions: from a glyph and a selection to change records.
//!
//! `EditBehaviorFactory` captures the glyph and selection once when a drag
//! starts. Each behavior variant asked for during the drag (plain, with
//! shift, with alt, ...) is prepared on first use and then reused, so the
//! modifier keys can change mid-drag without re-matching the contours.

use super::actions::{DeltaConstraint, EditTransform};
use super::components::ComponentEdit;
use super::contour::{ContourEdits, UnpackedContour, unpack_contours};
use super::registry::{BehaviorRegistry, BehaviorType};
use crate::editing::changes::{ChangeRecord, PathElement, consolidate_changes, point_change};
use crate::editing::selection::EditSelection;
use crate::geometry::round_point;
use crate::model::{Component, GlyphInstance};
use kurbo::{Point, Vec2};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Prepares and caches the edit behaviors of one drag
#[derive(Debug)]
pub struct EditBehaviorFactory<'r> {
    registry: &'r BehaviorRegistry,
    contours: Vec<UnpackedContour>,
    components: BTreeMap<usize, Component>,
    component_origin_indices: BTreeSet<usize>,
    component_t_center_indices: BTreeSet<usize>,
    enable_scaling_edit: bool,
    behaviors: HashMap<String, EditBehavior>,
}

impl<'r> EditBehaviorFactory<'r> {
    /// Capture the selected contours and components of `instance`.
    ///
    /// Scaling edits follow the registry's setting unless overridden with
    /// [`with_scaling_edit`](Self::with_scaling_edit).
    pub fn new(registry: &'r BehaviorRegistry, instance: &GlyphInstance, selection: &EditSelection) -> Self {
        let contours = unpack_contours(&instance.path, selection.points());

        let mut components = BTreeMap::new();
        let mut keep_valid = |indices: BTreeSet<usize>| -> BTreeSet<usize> {
            indices
                .into_iter()
                .filter(|&index| match instance.components.get(index) {
                    Some(component) => {
                        components.insert(index, component.clone());
                        true
                    }
                    None => {
                        tracing::debug!("Ignoring selected component {} (out of range)", index);
                        false
                    }
                })
                .collect()
        };
        let component_origin_indices = keep_valid(selection.component_origin_indices());
        let component_t_center_indices = keep_valid(selection.component_t_center_indices());

        Self {
            registry,
            contours,
            components,
            component_origin_indices,
            component_t_center_indices,
            enable_scaling_edit: registry.enable_scaling_edit(),
            behaviors: HashMap::new(),
        }
    }

    /// Override the registry's scaling-edit setting for this drag
    pub fn with_scaling_edit(mut self, enable: bool) -> Self {
        if enable != self.enable_scaling_edit {
            self.behaviors.clear();
        }
        self.enable_scaling_edit = enable;
        self
    }

    /// The behavior for a variant name, prepared on first request.
    ///
    /// Unknown names fall back to the default behavior.
    pub fn get_behavior(&mut self, name: &str) -> &EditBehavior {
        match self.behaviors.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let behavior_type = self.registry.resolve(name);
                let scaling = self.enable_scaling_edit && behavior_type.can_do_scaling_edit;
                entry.insert(EditBehavior::new(
                    behavior_type,
                    &self.contours,
                    &self.components,
                    &self.component_origin_indices,
                    &self.component_t_center_indices,
                    scaling,
                ))
            }
        }
    }
}

/// A prepared edit: matched contours, component edits and the rollback
#[derive(Debug, Clone)]
pub struct EditBehavior {
    name: String,
    constrain_delta: DeltaConstraint,
    contour_edits: Vec<ContourEdits>,
    component_edits: Vec<ComponentEdit>,
    rollback: ChangeRecord,
}

impl EditBehavior {
    fn new(
        behavior_type: &BehaviorType,
        contours: &[UnpackedContour],
        components: &BTreeMap<usize, Component>,
        origin_indices: &BTreeSet<usize>,
        t_center_indices: &BTreeSet<usize>,
        scaling_edit: bool,
    ) -> Self {
        let contour_edits: Vec<ContourEdits> = contours
            .iter()
            .map(|contour| {
                ContourEdits::build(
                    contour,
                    &behavior_type.rules,
                    &behavior_type.match_tree,
                    scaling_edit,
                )
            })
            .collect();

        let mut component_edits = Vec::new();
        for index in origin_indices {
            if let Some(component) = components.get(index) {
                component_edits.push(ComponentEdit::origin(*index, component));
            }
        }
        for index in t_center_indices {
            let Some(component) = components.get(index) else {
                continue;
            };
            match ComponentEdit::t_center(*index, component) {
                Some(edit) => component_edits.push(edit),
                None => tracing::warn!(
                    "Component {} has a singular transformation, not moving its center",
                    index
                ),
            }
        }

        let rollback = Self::build_rollback(&contour_edits, &component_edits);

        tracing::debug!(
            "Prepared '{}' edit: {} contours, {} point edits, {} participating points, {} component edits, scaling {}",
            behavior_type.name,
            contour_edits.len(),
            contour_edits.iter().map(ContourEdits::edit_count).sum::<usize>(),
            contour_edits
                .iter()
                .map(|contour| contour.participating_indices().count())
                .sum::<usize>(),
            component_edits.len(),
            scaling_edit
        );

        Self {
            name: behavior_type.name.clone(),
            constrain_delta: behavior_type.delta_constraint(),
            contour_edits,
            component_edits,
            rollback,
        }
    }

    fn build_rollback(contour_edits: &[ContourEdits], component_edits: &[ComponentEdit]) -> ChangeRecord {
        let path_changes = contour_edits
            .iter()
            .flat_map(|contour| {
                contour.participating_indices().filter_map(move |index| {
                    let point = contour.original_point(index)?;
                    Some(point_change(index, point.x, point.y))
                })
            })
            .collect();
        let component_changes = component_edits.iter().map(ComponentEdit::rollback).collect();
        assemble(path_changes, component_changes)
    }

    /// Name of the behavior variant this edit was prepared with
    pub fn behavior_name(&self) -> &str {
        &self.name
    }

    /// Flat indices of every point the edit may move, ascending per contour
    pub fn participating_point_indices(&self) -> Vec<usize> {
        self.contour_edits
            .iter()
            .flat_map(ContourEdits::participating_indices)
            .collect()
    }

    /// Change for a drag by `delta` from the drag origin
    pub fn make_change_for_delta(&self, delta: Vec2) -> ChangeRecord {
        let constrained_delta = (self.constrain_delta)(delta);
        let constrained = move |point: Point| point + constrained_delta;
        let free = move |point: Point| point + delta;
        self.make_change_for_transform_func(&constrained, Some(&free as &dyn Fn(Point) -> Point))
    }

    /// Change for an arbitrary point transform.
    ///
    /// `free` is used by actions that follow the pointer without the delta
    /// constraint; it defaults to `constrained`. Coordinates are rounded.
    /// A point written more than once keeps its last value.
    pub fn make_change_for_transform_func(
        &self,
        constrained: &dyn Fn(Point) -> Point,
        free: Option<&dyn Fn(Point) -> Point>,
    ) -> ChangeRecord {
        let transform =
            EditTransform::new(constrained, free.unwrap_or(constrained), self.constrain_delta);

        let mut slots: HashMap<usize, usize> = HashMap::new();
        let mut positions: Vec<(usize, Point)> = Vec::new();
        for (index, point) in self
            .contour_edits
            .iter()
            .flat_map(|contour| contour.edit(&transform))
        {
            match slots.entry(index) {
                Entry::Occupied(slot) => positions[*slot.get()].1 = point,
                Entry::Vacant(slot) => {
                    slot.insert(positions.len());
                    positions.push((index, point));
                }
            }
        }

        let path_changes = positions
            .into_iter()
            .map(|(index, point)| {
                let point = round_point(point);
                point_change(index, point.x, point.y)
            })
            .collect();
        let component_changes = self
            .component_edits
            .iter()
            .map(|edit| edit.edit(&transform))
            .collect();
        assemble(path_changes, component_changes)
    }

    /// Change restoring every participating point and component
    pub fn rollback_change(&self) -> &ChangeRecord {
        &self.rollback
    }
}

fn assemble(path_changes: Vec<ChangeRecord>, component_changes: Vec<ChangeRecord>) -> ChangeRecord {
    let mut changes = Vec::new();
    if !path_changes.is_empty() {
        changes.push(consolidate_changes(path_changes, &[PathElement::from("path")]));
    }
    if !component_changes.is_empty() {
        changes.push(consolidate_changes(
            component_changes,
            &[PathElement::from("components")],
        ));
    }
    consolidate_changes(changes, &[])
}
