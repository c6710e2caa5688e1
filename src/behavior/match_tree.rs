// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Decision tree over rule patterns.
//!
//! A point is matched on a seven-wide window of classified neighbors,
//! `prev³ prev² prev POINT next next² next³`. Each rule contributes two
//! candidates: its six patterns laid over `prev³..next²` (forward), and
//! the same patterns mirrored over `next³..prev²` (reversed). The first
//! candidate in rule order that accepts the window wins; forward is tried
//! before reversed for the same rule.
//!
//! The tree branches on the class of one window slot per level. Subtrees
//! are keyed by `(depth, surviving candidates)` and shared, so the tree
//! stays small even though `ANY|NIL` patterns accept every class.

use super::flags::{MATCH_ALL, NUM_CLASSES, POINT_CLASSES, PointFlags};
use super::rules::Rule;
use std::collections::HashMap;

/// Width of the neighbor window
pub const WINDOW: usize = 7;

/// Window slot of the point being matched
pub const CENTER: usize = 3;

/// Which way a rule's patterns were laid over the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reversed,
}

/// The rule that governs a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// Index into the behavior's rule list
    pub rule_index: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
enum Node {
    Branch([usize; NUM_CLASSES]),
    Leaf(Option<RuleMatch>),
}

/// Precomputed first-match structure for one rule list
#[derive(Debug, Clone)]
pub struct MatchTree {
    nodes: Vec<Node>,
    root: usize,
}

struct Candidate {
    rule_match: RuleMatch,
    window: [PointFlags; WINDOW],
}

impl Candidate {
    fn new(rule_index: usize, rule: &Rule, direction: Direction) -> Self {
        let mut window = [MATCH_ALL; WINDOW];
        for (i, pattern) in rule.patterns.iter().enumerate() {
            let slot = match direction {
                Direction::Forward => i,
                Direction::Reversed => WINDOW - 1 - i,
            };
            window[slot] = pattern.normalized_pattern();
        }
        Self {
            rule_match: RuleMatch {
                rule_index,
                direction,
            },
            window,
        }
    }
}

struct TreeBuilder {
    candidates: Vec<Candidate>,
    nodes: Vec<Node>,
    memo: HashMap<(usize, Vec<usize>), usize>,
}

impl TreeBuilder {
    fn build_node(&mut self, depth: usize, alive: Vec<usize>) -> usize {
        if let Some(&id) = self.memo.get(&(depth, alive.clone())) {
            return id;
        }

        let node = match alive.first() {
            None => Node::Leaf(None),
            Some(&first) if self.accepts_everything_from(first, depth) => {
                Node::Leaf(Some(self.candidates[first].rule_match))
            }
            Some(_) => {
                let mut children = [0; NUM_CLASSES];
                for (class_index, &class) in POINT_CLASSES.iter().enumerate() {
                    let survivors = alive
                        .iter()
                        .copied()
                        .filter(|&c| self.candidates[c].window[depth].contains(class))
                        .collect();
                    children[class_index] = self.build_node(depth + 1, survivors);
                }
                Node::Branch(children)
            }
        };

        let id = self.nodes.len();
        self.nodes.push(node);
        self.memo.insert((depth, alive), id);
        id
    }

    fn accepts_everything_from(&self, candidate: usize, depth: usize) -> bool {
        self.candidates[candidate].window[depth..]
            .iter()
            .all(|&pattern| pattern == MATCH_ALL)
    }
}

impl MatchTree {
    /// Build the tree for an ordered rule list
    pub fn build(rules: &[Rule]) -> Self {
        let candidates: Vec<Candidate> = rules
            .iter()
            .enumerate()
            .flat_map(|(i, rule)| {
                [
                    Candidate::new(i, rule, Direction::Forward),
                    Candidate::new(i, rule, Direction::Reversed),
                ]
            })
            .collect();
        let alive = (0..candidates.len()).collect();
        let mut builder = TreeBuilder {
            candidates,
            nodes: Vec::new(),
            memo: HashMap::new(),
        };
        let root = builder.build_node(0, alive);
        Self {
            nodes: builder.nodes,
            root,
        }
    }

    /// Find the first rule accepting a window of classified points
    pub fn find(&self, window: &[PointFlags; WINDOW]) -> Option<RuleMatch> {
        let mut id = self.root;
        for class in window {
            match &self.nodes[id] {
                Node::Leaf(found) => return *found,
                Node::Branch(children) => id = children[class.class_index()],
            }
        }
        match &self.nodes[id] {
            Node::Leaf(found) => *found,
            Node::Branch(_) => None,
        }
    }

    /// Number of distinct nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Contour indices of the window around `index`.
///
/// Closed contours wrap around; open ones yield `None` past either end.
pub fn neighbor_window(index: usize, len: usize, closed: bool) -> [Option<usize>; WINDOW] {
    std::array::from_fn(|slot| {
        let offset = slot as isize - CENTER as isize;
        let target = index as isize + offset;
        if closed {
            Some(target.rem_euclid(len as isize) as usize)
        } else if (0..len as isize).contains(&target) {
            Some(target as usize)
        } else {
            None
        }
    })
}

/// Match one point of a contour.
///
/// `classes` holds the classification of every contour point. Returns the
/// match and the neighbor indices, already reversed for reversed matches
/// so that slot `CENTER - 1` is always the rule's `prev`.
pub fn find_point_match(
    tree: &MatchTree,
    index: usize,
    classes: &[PointFlags],
    closed: bool,
) -> Option<(RuleMatch, [Option<usize>; WINDOW])> {
    let mut neighbors = neighbor_window(index, classes.len(), closed);
    let window = neighbors.map(|slot| slot.map_or(PointFlags::NIL, |i| classes[i]));
    let found = tree.find(&window)?;
    if found.direction == Direction::Reversed {
        neighbors.reverse();
    }
    Some((found, neighbors))
}
