// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Rule-driven edit behavior.
//!
//! Points are classified by their neighborhood, matched against an ordered
//! rule table, and given an action that computes their edited position.
//! Segment and component edits are layered on top, and everything a drag
//! step writes is returned as one change record.

pub mod actions;
pub mod components;
pub mod contour;
pub mod factory;
pub mod flags;
pub mod match_tree;
pub mod registry;
pub mod rules;
pub mod segments;

pub use actions::{ActionKind, DeltaConstraint, EditTransform, constrain_hor_ver_diag};
pub use factory::{EditBehavior, EditBehaviorFactory};
pub use flags::PointFlags;
pub use match_tree::{MatchTree, RuleMatch};
pub use registry::{BehaviorRegistry, BehaviorType, DEFAULT_BEHAVIOR};
pub use rules::Rule;
