//! Shared helpers for the integration tests.
#![allow(dead_code)]

use ndarray::{Array1, Array2};

/// Two deterministic clusters per class along every feature: class 0 near
/// the origin, class 1 offset by 10.
pub fn blob_classification(n_per_class: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let n = 2 * n_per_class;
    let features = Array2::from_shape_fn((n, n_features), |(i, j)| {
        let offset = if i < n_per_class { 0.0 } else { 10.0 };
        offset + ((i * 7 + j * 3) % 5) as f64 * 0.1
    });
    let labels = Array1::from_shape_fn(n, |i| if i < n_per_class { 0.0 } else { 1.0 });
    (features, labels)
}

/// Piecewise-constant regression target over one informative feature plus
/// uninformative companions.
pub fn step_regression(n: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let features = Array2::from_shape_fn((n, n_features), |(i, j)| {
        if j == 0 {
            i as f64
        } else {
            ((i * 13 + j * 5) % 7) as f64
        }
    });
    let labels = Array1::from_shape_fn(n, |i| {
        if i < n / 3 {
            -1.0
        } else if i < 2 * n / 3 {
            0.5
        } else {
            4.0
        }
    });
    (features, labels)
}

/// The ten-row scenario: the single feature equals the row index and the
/// label flips at index 5.
pub fn ten_row_scenario() -> (Array2<f64>, Array1<f64>) {
    let features = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
    let labels = Array1::from_shape_fn(10, |i| if i < 5 { 0.0 } else { 1.0 });
    (features, labels)
}
