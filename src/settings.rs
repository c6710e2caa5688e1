// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Numeric tunables for the edit behavior engine.
//!
//! These constants stay fixed for the lifetime of the process. Anything a
//! host may want to switch at runtime (scaling edit, custom behaviors)
//! lives in `config.rs` instead.

// ============================================================================
// AXIS LOCK SETTINGS
// ============================================================================
/// tan(22.5°): below this slope a delta snaps to the nearest axis
const AXIS_LOCK_DIAGONAL_MIN_TAN: f64 = 0.414;

/// tan(67.5°): above this slope a delta snaps to the vertical axis
const AXIS_LOCK_DIAGONAL_MAX_TAN: f64 = 2.414;

/// Horizontal magnitude under which a delta counts as vertical
const AXIS_LOCK_MIN_X: f64 = 0.001;

// ============================================================================
// GEOMETRY SETTINGS
// ============================================================================
/// Cross products smaller than this mean two lines are parallel
const LINE_INTERSECTION_EPSILON: f64 = 0.000_000_01;

/// Anchor distances under this yield an interpolation ratio of zero
const INTERPOLATE_MIN_DISTANCE: f64 = 0.0001;

/// Affine determinants under this are treated as singular
const AFFINE_MIN_DETERMINANT: f64 = 1e-12;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Shift-constrain settings (0°/45°/90° snapping of deltas and handles)
pub mod axis_lock {
    /// Lower slope bound of the diagonal band
    pub const DIAGONAL_MIN_TAN: f64 = super::AXIS_LOCK_DIAGONAL_MIN_TAN;

    /// Upper slope bound of the diagonal band
    pub const DIAGONAL_MAX_TAN: f64 = super::AXIS_LOCK_DIAGONAL_MAX_TAN;

    /// Horizontal magnitude treated as zero
    pub const MIN_X: f64 = super::AXIS_LOCK_MIN_X;
}

/// Tolerances used by the closed-form geometry helpers
pub mod geometry {
    pub const LINE_INTERSECTION_EPSILON: f64 = super::LINE_INTERSECTION_EPSILON;
    pub const INTERPOLATE_MIN_DISTANCE: f64 = super::INTERPOLATE_MIN_DISTANCE;
    pub const AFFINE_MIN_DETERMINANT: f64 = super::AFFINE_MIN_DETERMINANT;
}
