// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit rules and the built-in rule tables.
//!
//! A rule says: when a point and its neighbors look like these six
//! patterns, move the point with this action. Tables are ordered and the
//! first rule that matches a point wins.

use super::flags::PointFlags;
use crate::error::RuleParseError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

const NIL: PointFlags = PointFlags::NIL;
const SEL: PointFlags = PointFlags::SEL;
const UNS: PointFlags = PointFlags::UNS;
const SHA: PointFlags = PointFlags::SHA;
const SMO: PointFlags = PointFlags::SMO;
const OFF: PointFlags = PointFlags::OFF;
const ANY: PointFlags = PointFlags::ANY;

/// One row of a rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Patterns for prev³, prev², prev, the point, next and next²
    pub patterns: [PointFlags; 6],
    /// Run in the constrain pass, reading already-edited neighbors
    pub constrain: bool,
    /// Name of the action that computes the new position
    pub action: Cow<'static, str>,
}

impl Rule {
    pub fn new(patterns: [PointFlags; 6], constrain: bool, action: &'static str) -> Self {
        Self {
            patterns,
            constrain,
            action: Cow::Borrowed(action),
        }
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    /// Parse `prev3 prev2 prev point next next2 constrain action`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(RuleParseError::FieldCount(fields.len()));
        }

        let mut patterns = [PointFlags::empty(); 6];
        for (pattern, field) in patterns.iter_mut().zip(&fields[..6]) {
            *pattern = field.parse()?;
        }
        let constrain = match fields[6] {
            "true" => true,
            "false" => false,
            other => return Err(RuleParseError::InvalidConstrain(other.to_string())),
        };

        Ok(Self {
            patterns,
            constrain,
            action: Cow::Owned(fields[7].to_string()),
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pattern in &self.patterns {
            write_pattern(f, *pattern)?;
            f.write_str(" ")?;
        }
        write!(f, "{} {}", self.constrain, self.action)
    }
}

fn write_pattern(f: &mut fmt::Formatter<'_>, pattern: PointFlags) -> fmt::Result {
    let mut names = Vec::new();
    if pattern.contains(ANY) {
        names.push("ANY");
    } else {
        for (flag, name) in [(SHA, "SHA"), (SMO, "SMO"), (OFF, "OFF")] {
            if pattern.contains(flag) {
                names.push(name);
            }
        }
    }
    for (flag, name) in [(SEL, "SEL"), (UNS, "UNS"), (NIL, "NIL")] {
        if pattern.contains(flag) {
            names.push(name);
        }
    }
    f.write_str(&names.join("|"))
}

#[allow(clippy::too_many_arguments)]
fn rule(
    prev3: PointFlags,
    prev2: PointFlags,
    prev: PointFlags,
    point: PointFlags,
    next: PointFlags,
    next2: PointFlags,
    constrain: bool,
    action: &'static str,
) -> Rule {
    Rule::new([prev3, prev2, prev, point, next, next2], constrain, action)
}

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

/// Rules of the `default` behavior
#[rustfmt::skip]
pub fn default_rules() -> Vec<Rule> {
    vec![
        //   prev3      prevPrev      prev          the point  next          nextNext     constrain  action

        // Default rule: if no other rules apply, just move the selected point
        rule(ANY | NIL, ANY | NIL,    ANY | NIL,    ANY | SEL, ANY | NIL,    ANY | NIL,    false, "Move"),

        // Unselected off-curve point next to a smooth point next to a selected point
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    OFF | UNS, OFF|SHA|NIL,  ANY | NIL,    true,  "RotateNext"),

        // Selected tangent point: its neighboring off-curve point should move
        rule(ANY | NIL, SHA|SMO|UNS,  SMO | SEL,    OFF | UNS, OFF|SHA|NIL,  ANY | NIL,    true,  "RotateNext"),

        // Selected tangent point, selected handle: constrain both on original angle
        rule(ANY | NIL, SHA|SMO|UNS,  SMO | SEL,    OFF | SEL, OFF|SHA|NIL,  ANY | NIL,    true,  "ConstrainPrevAngle"),
        rule(ANY | NIL, ANY,          SHA|SMO|UNS,  SMO | SEL, OFF | SEL,    OFF|SHA|NIL,  true,  "ConstrainMiddle"),

        // Unselected free off-curve point, move with on-curve neighbor
        rule(ANY | NIL, ANY | NIL,    SHA|SMO|SEL,  OFF | UNS, OFF|SHA|NIL,  ANY | NIL,    false, "Move"),
        rule(ANY | NIL, OFF,          SMO | SEL,    OFF | UNS, OFF|SHA|NIL,  ANY | NIL,    false, "Move"),

        // An unselected off-curve between two on-curve points
        rule(ANY | NIL, ANY,          SMO|SHA|SEL,  OFF | UNS, SMO | SHA,    ANY | NIL,    true,  "HandleIntersect"),
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    OFF | UNS, SMO,          ANY | NIL,    true,  "TangentIntersectLive"),
        rule(ANY | NIL, SMO | SHA,    SMO | SEL,    OFF | UNS, SMO | SHA,    ANY | NIL,    true,  "TangentIntersect"),
        rule(ANY | NIL, SMO | SHA,    SMO | UNS,    OFF | SEL, SMO | SEL,    ANY | NIL,    true,  "HandleIntersect"),
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    OFF | UNS, SHA | SEL,    ANY | NIL,    true,  "TangentIntersect"),

        // Tangent bcp constraint
        rule(ANY | NIL, SMO | SHA,    SMO | UNS,    OFF | SEL, ANY|UNS|NIL,  ANY | NIL,    false, "ConstrainPrevAngle"),
        rule(ANY | NIL, SMO | SHA,    SMO | UNS,    OFF | SEL, SHA | OFF,    ANY | NIL,    false, "ConstrainPrevAngle"),

        // Two selected points with an unselected smooth point between them
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    ANY | SEL, ANY | NIL,    ANY | NIL,    false, "ConstrainPrevAngle"),
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    ANY | SEL, SMO | UNS,    ANY | SEL,    false, "DontMove"),
        rule(ANY | NIL, ANY | SEL,    SMO | UNS,    ANY | SEL, SMO | UNS,    SMO | UNS,    false, "DontMove"),

        // Selected tangent with selected handle: constrain at original tangent line
        rule(ANY | NIL, SMO|SHA|UNS,  SMO | SEL,    OFF | SEL, ANY | NIL,    ANY | NIL,    false, "ConstrainPrevAngle"),
        rule(ANY | NIL, ANY,          SHA|SMO|UNS,  SMO | SEL, OFF | SEL,    ANY | NIL,    true,  "ConstrainMiddle"),

        // Selected tangent, selected off-curve, selected smooth
        rule(ANY | NIL, SMO|SHA|UNS,  SMO | SEL,    OFF | SEL, SMO | SEL,    ANY | NIL,    true,  "HandleIntersect"),

        // Selected single off-curve, locked between two unselected smooth points
        rule(ANY | NIL, SHA|SMO|UNS,  SMO | UNS,    OFF | SEL, SMO | UNS,    OFF | SEL,    false, "DontMove"),
    ]
}

/// Rules of the `constrain` behavior: the default table plus handle locks
#[rustfmt::skip]
pub fn constrain_rules() -> Vec<Rule> {
    let mut rules = default_rules();
    rules.extend([
        // Selected free off curve: constrain to 0, 45 or 90 degrees
        rule(ANY | NIL, OFF | UNS,    SMO | UNS,    OFF | SEL, OFF | NIL,    ANY | NIL,    false, "ConstrainHandle"),
        rule(ANY | NIL, ANY | NIL,    SHA | UNS,    OFF | SEL, OFF | NIL,    ANY | NIL,    false, "ConstrainHandle"),
        rule(ANY | NIL, OFF | UNS,    SMO | UNS,    OFF | SEL, SMO | UNS,    OFF | UNS,    false, "ConstrainHandleIntersect"),
        rule(ANY | NIL, ANY | NIL,    SHA | UNS,    OFF | SEL, SHA | UNS,    ANY | NIL,    false, "ConstrainHandleIntersect"),
        rule(ANY | NIL, OFF | UNS,    SMO | UNS,    OFF | SEL, SHA | UNS,    ANY | NIL,    false, "ConstrainHandleIntersect"),
        rule(ANY | NIL, SHA|SMO|UNS,  SMO | UNS,    OFF | SEL, SMO | UNS,    OFF | UNS,    false, "ConstrainHandleIntersectPrev"),

        // Selected smooth between unselected on-curve and off-curve
        rule(ANY | NIL, ANY | UNS,    SMO|SHA|UNS,  SMO | SEL, OFF | UNS,    ANY | NIL,    false, "ConstrainHandle"),
    ]);
    rules
}

/// Rules of the `alternate` behavior
#[rustfmt::skip]
pub fn alternate_rules() -> Vec<Rule> {
    vec![
        //   prev3      prevPrev      prev          the point    next        nextNext     constrain  action

        // Default rule: if no other rules apply, just move the selected point
        rule(ANY | NIL, ANY | NIL,    ANY | NIL,    ANY | SEL,   ANY | NIL,  ANY | NIL,    false, "Move"),

        // Selected smooth before unselected off-curve
        rule(ANY | NIL, ANY | NIL,    ANY | UNS,    SMO | SEL,   OFF,        ANY | NIL,    false, "ConstrainMiddle"),
        rule(ANY | NIL, OFF,          SMO | SEL,    SMO | SEL,   OFF | UNS,  ANY | NIL,    false, "ConstrainMiddleTwo"),
        rule(ANY | NIL, OFF | UNS,    SMO | SEL,    SMO | SEL,   OFF | SEL,  ANY | NIL,    false, "ConstrainMiddleTwo"),
        rule(ANY | NIL, SMO | SEL,    SMO | SEL,    OFF | SEL,   ANY | NIL,  ANY | NIL,    true,  "RotateNext"),
        rule(ANY | NIL, SMO | SEL,    SMO | UNS,    OFF | SEL,   ANY | NIL,  ANY | NIL,    true,  "ConstrainPrevAngle"),
        rule(ANY | NIL, SMO | UNS,    SMO | SEL,    OFF | SEL,   ANY | NIL,  ANY | NIL,    true,  "ConstrainPrevAngle"),

        // Smooth with two selected neighbors
        rule(ANY | NIL, ANY | NIL,    ANY | SEL,    SMO | SEL,   OFF | SEL,  ANY | NIL,    false, "ConstrainMiddle"),

        // Unselected smooth between sharp and off-curve, one of them selected
        rule(ANY | NIL, ANY | NIL,    SHA|OFF|UNS,  SMO | UNS,   OFF | SEL,  ANY | NIL,    true,  "Interpolate"),
        rule(ANY | NIL, ANY | NIL,    SHA|OFF|SEL,  SMO | UNS,   OFF | UNS,  ANY | NIL,    true,  "Interpolate"),

        // Two unselected smooth points between two off-curves, one of them selected
        rule(ANY | NIL, OFF | UNS,    SMO | UNS,    SMO | UNS,   OFF | SEL,  ANY | NIL,    true,  "InterpolatePrevPrevNext"),
        rule(ANY | NIL, OFF | SEL,    SMO | UNS,    SMO | UNS,   OFF | UNS,  ANY | NIL,    true,  "InterpolatePrevPrevNext"),

        // An unselected smooth point between two selected off-curves
        rule(ANY | NIL, ANY | NIL,    OFF | SEL,    SMO | UNS,   OFF | SEL,  ANY | NIL,    true,  "Move"),

        // Two unselected smooth points between two selected off-curves
        rule(ANY | NIL, OFF | SEL,    SMO | UNS,    SMO | UNS,   OFF | SEL,  ANY | NIL,    true,  "Move"),

        // Two selected points locked by angle
        rule(ANY | NIL, ANY,          SHA | SEL,    SMO | SEL,   OFF | UNS,  OFF|SHA|NIL,  false, "ConstrainMiddle"),
        rule(ANY | NIL, ANY,          SMO | SEL,    SHA | SEL,   ANY | NIL,  ANY | NIL,    false, "ConstrainPrevAngle"),
        rule(ANY | NIL, ANY,          SMO | SEL,    OFF | SEL,   ANY | NIL,  ANY | NIL,    false, "ConstrainPrevAngle"),

        // Selected off-curve locked between two selected smooth points
        rule(ANY | NIL, ANY | NIL,    SMO | SEL,    OFF | SEL,   SMO | SEL,  ANY | NIL,    false, "DontMove"),
    ]
}

/// Rules of the `alternate-constrain` behavior
#[rustfmt::skip]
pub fn alternate_constrain_rules() -> Vec<Rule> {
    let mut rules = alternate_rules();
    rules.extend([
        rule(ANY | NIL, SHA|OFF|UNS,  SMO | UNS,    SHA|OFF|SEL, ANY | NIL,  ANY | NIL,    false, "ConstrainAroundPrevPrev"),

        // Two unselected smooth points between two off-curves, one of them selected
        rule(ANY | UNS, SMO | UNS,    SMO | UNS,    OFF | SEL,   ANY | NIL,  ANY | NIL,    false, "ConstrainAroundPrevPrevPrev"),
    ]);
    rules
}
