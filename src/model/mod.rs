// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyph geometry as seen by the edit engine

pub mod component;
pub mod glyph;

pub use component::{Component, Transformation};
pub use glyph::{ContourInfo, ContourPoint, GlyphInstance, PackedPath, PointKind};
