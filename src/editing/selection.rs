// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Role-partitioned selection descriptor.
//!
//! The host describes a selection as a list of `role/index` tokens such as
//! `point/3`, `component/1` or `componentOrigin/1`. `EditSelection` parses
//! these into one `BTreeSet` per role. The sets give deterministic,
//! ascending iteration order, which keeps change records stable.

use std::collections::BTreeSet;
use std::fmt;

/// What part of the glyph a selection token refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionRole {
    /// A point, by flat index into the packed path
    Point,
    /// A whole component (moves its origin)
    Component,
    /// A component's origin handle
    ComponentOrigin,
    /// A component's transformation center handle
    ComponentTCenter,
}

impl SelectionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionRole::Point => "point",
            SelectionRole::Component => "component",
            SelectionRole::ComponentOrigin => "componentOrigin",
            SelectionRole::ComponentTCenter => "componentTCenter",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "point" => Some(SelectionRole::Point),
            "component" => Some(SelectionRole::Component),
            "componentOrigin" => Some(SelectionRole::ComponentOrigin),
            "componentTCenter" => Some(SelectionRole::ComponentTCenter),
            _ => None,
        }
    }
}

/// Selected indices, partitioned by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSelection {
    points: BTreeSet<usize>,
    components: BTreeSet<usize>,
    component_origins: BTreeSet<usize>,
    component_t_centers: BTreeSet<usize>,
}

impl EditSelection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `role/index` tokens.
    ///
    /// Malformed tokens and unknown roles are skipped.
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for token in tokens {
            let token = token.as_ref();
            let parsed = token.split_once('/').and_then(|(role, index)| {
                Some((SelectionRole::from_name(role)?, index.parse().ok()?))
            });
            match parsed {
                Some((role, index)) => selection.insert(role, index),
                None => tracing::debug!("Skipping malformed selection token '{}'", token),
            }
        }
        selection
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.components.is_empty()
            && self.component_origins.is_empty()
            && self.component_t_centers.is_empty()
    }

    /// Add an index under a role
    pub fn insert(&mut self, role: SelectionRole, index: usize) {
        self.set_mut(role).insert(index);
    }

    /// Check if an index is selected under a role
    pub fn contains(&self, role: SelectionRole, index: usize) -> bool {
        self.set(role).contains(&index)
    }

    /// Selected indices for one role, ascending
    pub fn indices(&self, role: SelectionRole) -> impl Iterator<Item = usize> + '_ {
        self.set(role).iter().copied()
    }

    /// Selected point indices, ascending
    pub fn points(&self) -> &BTreeSet<usize> {
        &self.points
    }

    /// Components whose origin follows the drag: whole-component
    /// selections plus explicit origin selections
    pub fn component_origin_indices(&self) -> BTreeSet<usize> {
        self.components
            .union(&self.component_origins)
            .copied()
            .collect()
    }

    /// Components whose transformation center follows the drag
    pub fn component_t_center_indices(&self) -> BTreeSet<usize> {
        self.component_t_centers.clone()
    }

    fn set(&self, role: SelectionRole) -> &BTreeSet<usize> {
        match role {
            SelectionRole::Point => &self.points,
            SelectionRole::Component => &self.components,
            SelectionRole::ComponentOrigin => &self.component_origins,
            SelectionRole::ComponentTCenter => &self.component_t_centers,
        }
    }

    fn set_mut(&mut self, role: SelectionRole) -> &mut BTreeSet<usize> {
        match role {
            SelectionRole::Point => &mut self.points,
            SelectionRole::Component => &mut self.components,
            SelectionRole::ComponentOrigin => &mut self.component_origins,
            SelectionRole::ComponentTCenter => &mut self.component_t_centers,
        }
    }
}

impl fmt::Display for EditSelection {
    /// Formats back into space-separated `role/index` tokens
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles = [
            SelectionRole::Point,
            SelectionRole::Component,
            SelectionRole::ComponentOrigin,
            SelectionRole::ComponentTCenter,
        ];
        let mut first = true;
        for role in roles {
            for index in self.indices(role) {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}/{}", role.as_str(), index)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_selection_is_empty() {
        let sel = EditSelection::new();
        assert!(sel.is_empty());
        assert_eq!(sel.to_string(), "");
    }

    #[test]
    fn parse_partitions_by_role() {
        let sel = EditSelection::parse([
            "point/3",
            "point/1",
            "component/1",
            "componentOrigin/2",
            "componentTCenter/1",
        ]);
        assert_eq!(sel.points().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert!(sel.contains(SelectionRole::Component, 1));
        assert!(sel.contains(SelectionRole::ComponentTCenter, 1));
        assert!(!sel.contains(SelectionRole::Point, 2));
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let sel = EditSelection::parse(["point/x", "bogus/1", "point", "point/-1", "point/4"]);
        assert_eq!(sel.points().len(), 1);
        assert!(sel.contains(SelectionRole::Point, 4));
    }

    #[test]
    fn origin_indices_union_components_and_origins() {
        let sel = EditSelection::parse(["component/2", "componentOrigin/0", "componentOrigin/2"]);
        let origins: Vec<_> = sel.component_origin_indices().into_iter().collect();
        assert_eq!(origins, vec![0, 2]);
        assert!(sel.component_t_center_indices().is_empty());
    }

    #[test]
    fn component_may_have_origin_and_t_center() {
        let sel = EditSelection::parse(["componentOrigin/1", "componentTCenter/1"]);
        assert!(sel.component_origin_indices().contains(&1));
        assert!(sel.component_t_center_indices().contains(&1));
    }

    #[test]
    fn display_round_trips() {
        let sel = EditSelection::parse(["componentTCenter/0", "point/5", "point/2"]);
        let text = sel.to_string();
        assert_eq!(text, "point/2 point/5 componentTCenter/0");
        assert_eq!(EditSelection::parse(text.split(' ')), sel);
    }
}
