// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selections and the change records an edit produces

pub mod changes;
pub mod selection;

pub use changes::{ChangeRecord, PathElement, apply_change, consolidate_changes};
pub use selection::{EditSelection, SelectionRole};
