// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Point actions.
//!
//! An action is built in two stages. `Action::prepare` looks at the point
//! and its neighbors as they were when the drag started and captures
//! whatever must stay fixed for the whole drag (a handle length, a tangent
//! direction, an interpolation ratio). `Action::apply` then runs once per
//! drag step with the current transform and the current neighbor
//! positions.

use crate::error::UnknownAction;
use crate::geometry::{intersect, rotate_90_cw};
use crate::settings;
use kurbo::{Point, Vec2};
use std::str::FromStr;

/// A delta constraint, such as axis locking
pub type DeltaConstraint = fn(Vec2) -> Vec2;

/// Delta constraint that leaves the delta alone
pub fn unconstrained(delta: Vec2) -> Vec2 {
    delta
}

/// Snap a vector to the nearest horizontal, vertical or diagonal
/// direction.
///
/// Vectors in the 22.5°..67.5° band become exact diagonals that keep the
/// mean of both magnitudes; everything else loses its smaller component.
pub fn constrain_hor_ver_diag(v: Vec2) -> Vec2 {
    use settings::axis_lock::{DIAGONAL_MAX_TAN, DIAGONAL_MIN_TAN, MIN_X};

    let ax = v.x.abs();
    let ay = v.y.abs();
    let tan = if ax < MIN_X { 0.0 } else { ay / ax };
    if DIAGONAL_MIN_TAN < tan && tan < DIAGONAL_MAX_TAN {
        let d = 0.5 * (ax + ay);
        Vec2::new(d * v.x.signum(), d * v.y.signum())
    } else if ax > ay {
        Vec2::new(v.x, 0.0)
    } else {
        Vec2::new(0.0, v.y)
    }
}

// ============================================================================
// TRANSFORM
// ============================================================================

/// The coordinate mapping of one drag step
pub struct EditTransform<'a> {
    constrained: &'a dyn Fn(Point) -> Point,
    free: &'a dyn Fn(Point) -> Point,
    constrain_delta: DeltaConstraint,
}

impl<'a> EditTransform<'a> {
    pub fn new(
        constrained: &'a dyn Fn(Point) -> Point,
        free: &'a dyn Fn(Point) -> Point,
        constrain_delta: DeltaConstraint,
    ) -> Self {
        Self {
            constrained,
            free,
            constrain_delta,
        }
    }

    /// Map a point with the variant's constraint applied
    pub fn constrained(&self, point: Point) -> Point {
        (self.constrained)(point)
    }

    /// Map a point with the raw, unconstrained transform
    pub fn free(&self, point: Point) -> Point {
        (self.free)(point)
    }

    /// Apply the variant's delta constraint to a vector
    pub fn constrain_delta(&self, v: Vec2) -> Vec2 {
        (self.constrain_delta)(v)
    }
}

// ============================================================================
// NEIGHBORS
// ============================================================================

/// A point and its neighbors, in rule order.
///
/// Neighbors are `None` past the ends of an open contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbors {
    pub prev3: Option<Point>,
    pub prev2: Option<Point>,
    pub prev: Option<Point>,
    pub point: Point,
    pub next: Option<Point>,
    pub next2: Option<Point>,
}

impl Neighbors {
    /// Collect neighbors from a window of contour indices
    pub fn gather(points: &[Point], window: &[Option<usize>; 7]) -> Option<Self> {
        let at = |slot: usize| window[slot].and_then(|i| points.get(i).copied());
        Some(Self {
            prev3: at(0),
            prev2: at(1),
            prev: at(2),
            point: at(3)?,
            next: at(4),
            next2: at(5),
        })
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Action names usable in rule tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DontMove,
    Move,
    RotateNext,
    ConstrainPrevAngle,
    ConstrainMiddle,
    ConstrainMiddleTwo,
    TangentIntersect,
    TangentIntersectLive,
    HandleIntersect,
    ConstrainHandle,
    ConstrainHandleIntersect,
    ConstrainHandleIntersectPrev,
    Interpolate,
    InterpolatePrevPrevNext,
    ConstrainAroundPrevPrev,
    ConstrainAroundPrevPrevPrev,
}

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DontMove" => ActionKind::DontMove,
            "Move" => ActionKind::Move,
            "RotateNext" => ActionKind::RotateNext,
            "ConstrainPrevAngle" => ActionKind::ConstrainPrevAngle,
            "ConstrainMiddle" => ActionKind::ConstrainMiddle,
            "ConstrainMiddleTwo" => ActionKind::ConstrainMiddleTwo,
            "TangentIntersect" => ActionKind::TangentIntersect,
            "TangentIntersectLive" => ActionKind::TangentIntersectLive,
            "HandleIntersect" => ActionKind::HandleIntersect,
            "ConstrainHandle" => ActionKind::ConstrainHandle,
            "ConstrainHandleIntersect" => ActionKind::ConstrainHandleIntersect,
            "ConstrainHandleIntersectPrev" => ActionKind::ConstrainHandleIntersectPrev,
            "Interpolate" => ActionKind::Interpolate,
            "InterpolatePrevPrevNext" => ActionKind::InterpolatePrevPrevNext,
            "ConstrainAroundPrevPrev" => ActionKind::ConstrainAroundPrevPrev,
            "ConstrainAroundPrevPrevPrev" => ActionKind::ConstrainAroundPrevPrevPrev,
            other => return Err(UnknownAction(other.to_string())),
        })
    }
}

/// A prepared action with its drag-start invariants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    DontMove,
    Move,
    /// Keep the handle length, follow the direction of the tangent
    RotateNext { handle_length: f64 },
    /// Project onto the frozen line `pt1`-`pt2`
    ProjectOnLine {
        pt1: Point,
        pt2: Point,
        perpendicular: Vec2,
    },
    TangentIntersect { next_handle: Vec2 },
    TangentIntersectLive,
    HandleIntersect { handle_prev: Vec2, handle_next: Vec2 },
    ConstrainHandle,
    ConstrainHandleIntersect,
    ConstrainHandleIntersectPrev { tangent_prev: Vec2 },
    /// Stay at ratio `t` along `prev`-`next`
    Interpolate { t: f64 },
    /// Stay at ratio `t` along `prev2`-`next`
    InterpolatePrevPrevNext { t: f64 },
    ConstrainAroundPrevPrev,
    ConstrainAroundPrevPrevPrev,
}

impl Action {
    /// Capture the invariants of an action from the original geometry.
    ///
    /// Returns `None` if a neighbor the action depends on does not exist.
    pub fn prepare(kind: ActionKind, original: &Neighbors) -> Option<Self> {
        let point = original.point;
        let action = match kind {
            ActionKind::DontMove => Action::DontMove,
            ActionKind::Move => Action::Move,
            ActionKind::RotateNext => Action::RotateNext {
                handle_length: (point - original.prev?).hypot(),
            },
            ActionKind::ConstrainPrevAngle => Self::project_on_line(original.prev2?, original.prev?),
            ActionKind::ConstrainMiddle => Self::project_on_line(original.prev?, original.next?),
            ActionKind::ConstrainMiddleTwo => Self::project_on_line(original.prev2?, original.next?),
            ActionKind::TangentIntersect => Action::TangentIntersect {
                next_handle: point - original.next?,
            },
            ActionKind::TangentIntersectLive => Action::TangentIntersectLive,
            ActionKind::HandleIntersect => Action::HandleIntersect {
                handle_prev: point - original.prev?,
                handle_next: point - original.next?,
            },
            ActionKind::ConstrainHandle => Action::ConstrainHandle,
            ActionKind::ConstrainHandleIntersect => Action::ConstrainHandleIntersect,
            ActionKind::ConstrainHandleIntersectPrev => Action::ConstrainHandleIntersectPrev {
                tangent_prev: original.prev? - original.prev2?,
            },
            ActionKind::Interpolate => Action::Interpolate {
                t: interpolation_ratio(original.prev?, point, original.next?),
            },
            ActionKind::InterpolatePrevPrevNext => Action::InterpolatePrevPrevNext {
                t: interpolation_ratio(original.prev2?, point, original.next?),
            },
            ActionKind::ConstrainAroundPrevPrev => Action::ConstrainAroundPrevPrev,
            ActionKind::ConstrainAroundPrevPrevPrev => Action::ConstrainAroundPrevPrevPrev,
        };
        Some(action)
    }

    fn project_on_line(pt1: Point, pt2: Point) -> Self {
        Action::ProjectOnLine {
            pt1,
            pt2,
            perpendicular: rotate_90_cw(pt2 - pt1),
        }
    }

    /// Compute the new position of the point for one drag step.
    ///
    /// `live` holds the neighbors as the pass sees them: the original
    /// points for transform-pass rules, the already-edited points for
    /// constrain-pass rules. Degenerate geometry never fails; each action
    /// falls back to either the live point or the freely moved point.
    pub fn apply(&self, transform: &EditTransform, live: &Neighbors) -> Point {
        self.try_apply(transform, live).unwrap_or(live.point)
    }

    fn try_apply(&self, transform: &EditTransform, live: &Neighbors) -> Option<Point> {
        let point = live.point;
        let moved = match *self {
            Action::DontMove => point,
            Action::Move => transform.constrained(point),
            Action::RotateNext { handle_length } => {
                let prev = live.prev?;
                let direction = prev - live.prev2?;
                if direction.x == 0.0 && direction.y == 0.0 {
                    // No tangent to follow
                    return Some(point);
                }
                let angle = direction.atan2();
                prev + Vec2::from_angle(angle) * handle_length
            }
            Action::ProjectOnLine {
                pt1,
                pt2,
                perpendicular,
            } => {
                let free = transform.free(point);
                intersect(pt1, pt2, free, free + perpendicular).unwrap_or(free)
            }
            Action::TangentIntersect { next_handle } => {
                let next = live.next?;
                intersect(live.prev2?, live.prev?, next, next + next_handle)
                    .unwrap_or_else(|| transform.free(point))
            }
            Action::TangentIntersectLive => {
                intersect(live.prev2?, live.prev?, live.next?, live.next2?).unwrap_or(point)
            }
            Action::HandleIntersect {
                handle_prev,
                handle_next,
            } => {
                let prev = live.prev?;
                let next = live.next?;
                intersect(prev, prev + handle_prev, next, next + handle_next).unwrap_or(point)
            }
            Action::ConstrainHandle => constrain_around(transform, point, live.prev?),
            Action::ConstrainHandleIntersect => {
                let prev = live.prev?;
                let next = live.next?;
                let free = transform.free(point);
                let handle_prev = transform.constrain_delta(free - prev);
                let handle_next = transform.constrain_delta(free - next);
                intersect(prev, prev + handle_prev, next, next + handle_next).unwrap_or(free)
            }
            Action::ConstrainHandleIntersectPrev { tangent_prev } => {
                let prev = live.prev?;
                let next = live.next?;
                let free = transform.free(point);
                let handle_next = transform.constrain_delta(free - next);
                intersect(prev, prev + tangent_prev, next, next + handle_next).unwrap_or(free)
            }
            Action::Interpolate { t } => live.prev?.lerp(live.next?, t),
            Action::InterpolatePrevPrevNext { t } => live.prev2?.lerp(live.next?, t),
            Action::ConstrainAroundPrevPrev => constrain_around(transform, point, live.prev2?),
            Action::ConstrainAroundPrevPrevPrev => {
                constrain_around(transform, point, live.prev3?)
            }
        };
        Some(moved)
    }
}

/// Move freely, then lock the vector from `anchor` to the moved point
fn constrain_around(transform: &EditTransform, point: Point, anchor: Point) -> Point {
    let free = transform.free(point);
    anchor + transform.constrain_delta(free - anchor)
}

/// Relative position of `point` along `start`-`end`, by distance
fn interpolation_ratio(start: Point, point: Point, end: Point) -> f64 {
    let full = start.distance(end);
    if full > settings::geometry::INTERPOLATE_MIN_DISTANCE {
        start.distance(point) / full
    } else {
        0.0
    }
}
