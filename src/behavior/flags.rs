// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Point classification flags.
//!
//! Every point in a contour falls in exactly one of seven classes: a
//! missing neighbor (`NIL`), or one of three point types (`SHA`rp
//! on-curve, `SMO`oth on-curve, `OFF`-curve) combined with `SEL`ected or
//! `UNS`elected. Rule patterns are unions of these flags: `SMO|SHA|SEL`
//! means "any selected on-curve point", `ANY|NIL` means "anything,
//! including no point at all". A pattern that names neither `SEL` nor
//! `UNS` accepts both.

use crate::error::RuleParseError;
use bitflags::bitflags;
use std::str::FromStr;

bitflags! {
    /// Type/role bits used both for classified points and rule patterns
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointFlags: u8 {
        /// No point (past the end of an open contour)
        const NIL = 1 << 0;
        const SEL = 1 << 1;
        const UNS = 1 << 2;
        /// Sharp on-curve
        const SHA = 1 << 3;
        /// Smooth on-curve
        const SMO = 1 << 4;
        const OFF = 1 << 5;
        /// Any existing point type
        const ANY = Self::SHA.bits() | Self::SMO.bits() | Self::OFF.bits();
    }
}

/// Number of distinct point classes
pub const NUM_CLASSES: usize = 7;

/// The seven point classes, in match-tree branch order
pub const POINT_CLASSES: [PointFlags; NUM_CLASSES] = [
    PointFlags::NIL,
    PointFlags::SHA.union(PointFlags::SEL),
    PointFlags::SHA.union(PointFlags::UNS),
    PointFlags::SMO.union(PointFlags::SEL),
    PointFlags::SMO.union(PointFlags::UNS),
    PointFlags::OFF.union(PointFlags::SEL),
    PointFlags::OFF.union(PointFlags::UNS),
];

/// A pattern that accepts every class, including `NIL`
pub const MATCH_ALL: PointFlags = PointFlags::all();

impl PointFlags {
    /// Classify an existing point
    pub fn classify(on_curve: bool, smooth: bool, selected: bool) -> Self {
        let kind = match (on_curve, smooth) {
            (false, _) => PointFlags::OFF,
            (true, true) => PointFlags::SMO,
            (true, false) => PointFlags::SHA,
        };
        let role = if selected {
            PointFlags::SEL
        } else {
            PointFlags::UNS
        };
        kind | role
    }

    /// Expand an unconstrained selection state to "either"
    pub fn normalized_pattern(self) -> Self {
        if self.intersects(PointFlags::SEL | PointFlags::UNS) {
            self
        } else {
            self | PointFlags::SEL | PointFlags::UNS
        }
    }

    /// Superset match of a pattern against a classified point
    pub fn pattern_matches(self, class: PointFlags) -> bool {
        self.normalized_pattern().contains(class)
    }

    /// Branch index of a classified point in `POINT_CLASSES`
    pub fn class_index(self) -> usize {
        POINT_CLASSES
            .iter()
            .position(|&class| class == self)
            .unwrap_or(0)
    }
}

impl FromStr for PointFlags {
    type Err = RuleParseError;

    /// Parse a `|`-joined list of flag names, e.g. `SMO|SHA|SEL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|').try_fold(PointFlags::empty(), |acc, name| {
            let flag = match name.trim() {
                "NIL" => PointFlags::NIL,
                "SEL" => PointFlags::SEL,
                "UNS" => PointFlags::UNS,
                "SHA" => PointFlags::SHA,
                "SMO" => PointFlags::SMO,
                "OFF" => PointFlags::OFF,
                "ANY" => PointFlags::ANY,
                other => return Err(RuleParseError::UnknownFlag(other.to_string())),
            };
            Ok(acc | flag)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_points() {
        assert_eq!(
            PointFlags::classify(true, false, true),
            PointFlags::SHA | PointFlags::SEL
        );
        assert_eq!(
            PointFlags::classify(true, true, false),
            PointFlags::SMO | PointFlags::UNS
        );
        // Smoothness is meaningless off-curve
        assert_eq!(
            PointFlags::classify(false, true, false),
            PointFlags::OFF | PointFlags::UNS
        );
    }

    #[test]
    fn any_without_role_accepts_both_states_but_not_nil() {
        let any = PointFlags::ANY;
        assert!(any.pattern_matches(PointFlags::OFF | PointFlags::SEL));
        assert!(any.pattern_matches(PointFlags::SHA | PointFlags::UNS));
        assert!(!any.pattern_matches(PointFlags::NIL));
        assert!((any | PointFlags::NIL).pattern_matches(PointFlags::NIL));
    }

    #[test]
    fn role_restricts_selection_state() {
        let pattern = PointFlags::SMO | PointFlags::SHA | PointFlags::SEL;
        assert!(pattern.pattern_matches(PointFlags::SMO | PointFlags::SEL));
        assert!(!pattern.pattern_matches(PointFlags::SMO | PointFlags::UNS));
        assert!(!pattern.pattern_matches(PointFlags::OFF | PointFlags::SEL));
        assert!(!pattern.pattern_matches(PointFlags::NIL));
    }

    #[test]
    fn nil_only_pattern_matches_only_nil() {
        for class in POINT_CLASSES {
            assert_eq!(
                PointFlags::NIL.pattern_matches(class),
                class == PointFlags::NIL
            );
        }
    }

    #[test]
    fn class_indices_are_unique() {
        for (i, class) in POINT_CLASSES.iter().enumerate() {
            assert_eq!(class.class_index(), i);
        }
    }

    #[test]
    fn match_all_accepts_every_class() {
        assert!(POINT_CLASSES.iter().all(|&c| MATCH_ALL.pattern_matches(c)));
    }

    #[test]
    fn parse_flag_lists() {
        assert_eq!(
            "SMO|SHA|SEL".parse::<PointFlags>().unwrap(),
            PointFlags::SMO | PointFlags::SHA | PointFlags::SEL
        );
        assert_eq!(
            "ANY|NIL".parse::<PointFlags>().unwrap(),
            PointFlags::ANY | PointFlags::NIL
        );
        assert_eq!(
            "OFF|BOGUS".parse::<PointFlags>(),
            Err(RuleParseError::UnknownFlag("BOGUS".to_string()))
        );
    }
}
