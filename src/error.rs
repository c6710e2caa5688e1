// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for rule parsing, configuration and change application

use thiserror::Error;

/// A textual rule line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    #[error("expected 8 fields (6 patterns, constrain, action), found {0}")]
    FieldCount(usize),
    #[error("unknown point flag '{0}'")]
    UnknownFlag(String),
    #[error("constrain field must be 'true' or 'false', found '{0}'")]
    InvalidConstrain(String),
}

/// A change record does not fit the glyph it is applied to
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChangeError {
    #[error("invalid path element {element} at {target}")]
    InvalidPath { target: &'static str, element: String },
    #[error("index {index} out of range for {target} (len {len})")]
    IndexOutOfRange {
        target: &'static str,
        index: usize,
        len: usize,
    },
    #[error("operation '{op}' is not supported on {target}")]
    UnsupportedOperation { target: &'static str, op: String },
    #[error("bad arguments for '{op}': {reason}")]
    BadArguments { op: String, reason: String },
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// The edit configuration is invalid
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse edit config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("behavior '{behavior}' extends unknown behavior '{base}'")]
    UnknownBase { behavior: String, base: String },
    #[error("behavior '{behavior}' uses unknown delta constraint '{name}'")]
    UnknownDeltaConstraint { behavior: String, name: String },
    #[error("behavior '{behavior}', rule {index}: {source}")]
    Rule {
        behavior: String,
        index: usize,
        #[source]
        source: RuleParseError,
    },
}

/// An action name has no implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);
