// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Runebender Edit: constraint-aware point dragging for glyph outlines.
//!
//! A drag session starts with an [`EditBehaviorFactory`] built from a
//! glyph snapshot and a selection. For every pointer move the host asks
//! the factory for the behavior matching the held modifiers and turns the
//! drag delta into a [`ChangeRecord`]. When the drag is cancelled, the
//! behavior's rollback change restores the snapshot.
//!
//! ```
//! use kurbo::Vec2;
//! use runebender_edit::{
//!     BehaviorRegistry, ContourPoint, EditBehaviorFactory, EditSelection, GlyphInstance,
//!     PackedPath, apply_change,
//! };
//!
//! let mut path = PackedPath::new();
//! path.push_contour(
//!     [
//!         ContourPoint::on_curve(0.0, 0.0),
//!         ContourPoint::on_curve(100.0, 0.0),
//!         ContourPoint::on_curve(100.0, 100.0),
//!     ],
//!     true,
//! );
//! let mut glyph = GlyphInstance::new(path, Vec::new());
//!
//! let registry = BehaviorRegistry::builtin();
//! let selection = EditSelection::parse(["point/2"]);
//! let mut factory = EditBehaviorFactory::new(&registry, &glyph, &selection);
//! let change = factory
//!     .get_behavior("default")
//!     .make_change_for_delta(Vec2::new(10.0, 0.0));
//! apply_change(&mut glyph, &change).unwrap();
//! assert_eq!(glyph.path.points[2].x, 110.0);
//! ```

pub mod behavior;
pub mod config;
pub mod editing;
pub mod error;
pub mod geometry;
pub mod model;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use behavior::{BehaviorRegistry, EditBehavior, EditBehaviorFactory};
pub use config::EditConfig;
pub use editing::{ChangeRecord, EditSelection, apply_change};
pub use error::{ChangeError, ConfigError};
pub use model::{Component, ContourPoint, GlyphInstance, PackedPath, Transformation};
