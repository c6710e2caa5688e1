// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Named behavior variants.
//!
//! A behavior type bundles an ordered rule table, its match tree, an
//! optional delta constraint and whether it supports scaling edits. The
//! registry is built once (built-in variants plus any configured ones)
//! and shared by reference with every edit session.

use super::actions::{DeltaConstraint, constrain_hor_ver_diag, unconstrained};
use super::match_tree::MatchTree;
use super::rules::{self, Rule};
use crate::config::EditConfig;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the fallback behavior
pub const DEFAULT_BEHAVIOR: &str = "default";

/// Look up a delta constraint by its configuration name
pub fn delta_constraint_by_name(name: &str) -> Option<DeltaConstraint> {
    match name {
        "hor-ver-diag" => Some(constrain_hor_ver_diag),
        _ => None,
    }
}

/// One behavior variant, ready for matching
#[derive(Debug)]
pub struct BehaviorType {
    pub name: String,
    pub rules: Vec<Rule>,
    pub match_tree: MatchTree,
    pub constrain_delta: Option<DeltaConstraint>,
    pub can_do_scaling_edit: bool,
}

impl BehaviorType {
    pub fn new(
        name: impl Into<String>,
        rules: Vec<Rule>,
        constrain_delta: Option<DeltaConstraint>,
        can_do_scaling_edit: bool,
    ) -> Self {
        let name = name.into();
        let match_tree = MatchTree::build(&rules);
        tracing::debug!(
            "Built match tree for '{}': {} rules, {} nodes",
            name,
            rules.len(),
            match_tree.node_count()
        );
        Self {
            name,
            rules,
            match_tree,
            constrain_delta,
            can_do_scaling_edit,
        }
    }

    /// The delta constraint, or the identity
    pub fn delta_constraint(&self) -> DeltaConstraint {
        self.constrain_delta.unwrap_or(unconstrained)
    }
}

/// All behavior variants known to the editor
#[derive(Debug, Clone)]
pub struct BehaviorRegistry {
    types: HashMap<String, Arc<BehaviorType>>,
    fallback: Arc<BehaviorType>,
    enable_scaling_edit: bool,
}

impl BehaviorRegistry {
    /// The four built-in variants
    pub fn builtin() -> Self {
        let fallback = Arc::new(BehaviorType::new(
            DEFAULT_BEHAVIOR,
            rules::default_rules(),
            None,
            true,
        ));
        let mut registry = Self {
            types: HashMap::from([(DEFAULT_BEHAVIOR.to_string(), fallback.clone())]),
            fallback,
            enable_scaling_edit: false,
        };
        registry.register(BehaviorType::new(
            "constrain",
            rules::constrain_rules(),
            Some(constrain_hor_ver_diag),
            true,
        ));
        registry.register(BehaviorType::new(
            "alternate",
            rules::alternate_rules(),
            None,
            false,
        ));
        registry.register(BehaviorType::new(
            "alternate-constrain",
            rules::alternate_constrain_rules(),
            Some(constrain_hor_ver_diag),
            false,
        ));
        registry
    }

    /// The built-in variants plus the behaviors of a configuration
    pub fn with_config(config: &EditConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        registry.enable_scaling_edit = config.enable_scaling_edit;

        for behavior in &config.behaviors {
            let base = match &behavior.base {
                Some(base_name) => Some(registry.get(base_name).cloned().ok_or_else(|| {
                    ConfigError::UnknownBase {
                        behavior: behavior.name.clone(),
                        base: base_name.clone(),
                    }
                })?),
                None => None,
            };

            let constrain_delta = match &behavior.constrain_delta {
                Some(name) => Some(delta_constraint_by_name(name).ok_or_else(|| {
                    ConfigError::UnknownDeltaConstraint {
                        behavior: behavior.name.clone(),
                        name: name.clone(),
                    }
                })?),
                None => base.as_ref().and_then(|base| base.constrain_delta),
            };

            let mut rules = base.map(|base| base.rules.clone()).unwrap_or_default();
            for (index, line) in behavior.rules.iter().enumerate() {
                let rule = line.parse().map_err(|source| ConfigError::Rule {
                    behavior: behavior.name.clone(),
                    index,
                    source,
                })?;
                rules.push(rule);
            }

            registry.register(BehaviorType::new(
                behavior.name.clone(),
                rules,
                constrain_delta,
                behavior.scaling_edit,
            ));
        }
        Ok(registry)
    }

    /// Add or replace a behavior variant
    pub fn register(&mut self, behavior: BehaviorType) {
        if self.types.contains_key(&behavior.name) {
            tracing::debug!("Replacing behavior '{}'", behavior.name);
        }
        let behavior = Arc::new(behavior);
        if behavior.name == DEFAULT_BEHAVIOR {
            self.fallback = behavior.clone();
        }
        self.types.insert(behavior.name.clone(), behavior);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<BehaviorType>> {
        self.types.get(name)
    }

    /// Look up a behavior, falling back to `default` for unknown names
    pub fn resolve(&self, name: &str) -> &Arc<BehaviorType> {
        self.get(name).unwrap_or_else(|| {
            tracing::warn!("Invalid behavior name '{}', using '{}'", name, DEFAULT_BEHAVIOR);
            &self.fallback
        })
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The configured scaling-edit default for new edit sessions
    pub fn enable_scaling_edit(&self) -> bool {
        self.enable_scaling_edit
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
