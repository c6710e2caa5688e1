// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests

use crate::model::{ContourPoint, PackedPath};

/// Route tracing output to the test harness; `RUST_LOG` picks the level
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Closed rectangle with four sharp corners, counter-clockwise from (x, y)
pub fn rectangle_path(x: f64, y: f64, width: f64, height: f64) -> PackedPath {
    let mut path = PackedPath::new();
    path.push_contour(
        [
            ContourPoint::on_curve(x, y),
            ContourPoint::on_curve(x + width, y),
            ContourPoint::on_curve(x + width, y + height),
            ContourPoint::on_curve(x, y + height),
        ],
        true,
    );
    path
}

/// Open arch made of two cubics meeting at a smooth point (100, 100)
pub fn smooth_curve_path() -> PackedPath {
    let mut path = PackedPath::new();
    path.push_contour(
        [
            ContourPoint::on_curve(0.0, 0.0),
            ContourPoint::off_curve(0.0, 50.0),
            ContourPoint::off_curve(60.0, 100.0),
            ContourPoint::smooth(100.0, 100.0),
            ContourPoint::off_curve(140.0, 100.0),
            ContourPoint::off_curve(200.0, 50.0),
            ContourPoint::on_curve(200.0, 0.0),
        ],
        false,
    );
    path
}
