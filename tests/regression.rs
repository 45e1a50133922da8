//! Regression integration tests.

use cart_rust::{ConfigBuilder, CriterionKind, DecisionTreeRegressor, SplitterKind};

use approx::assert_relative_eq;
use ndarray::{Array1, Array2};

mod common;
use common::*;

#[test]
fn test_step_function_recovered_exactly() -> anyhow::Result<()> {
    let (x, y) = step_regression(30, 3);

    let mut model = DecisionTreeRegressor::default();
    model.fit(&x, &y, None)?;

    let predictions = model.predict(&x)?;
    for i in 0..30 {
        assert_relative_eq!(predictions[i], y[i], epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_max_depth_limits_resolution() -> anyhow::Result<()> {
    let (x, y) = step_regression(30, 1);

    let config = ConfigBuilder::regression().max_depth(1).build()?;
    let mut model = DecisionTreeRegressor::new(config)?;
    model.fit(&x, &y, None)?;

    let tree = model.tree().unwrap();
    assert!(tree.max_depth() <= 1);
    assert!(tree.n_leaves() <= 2);
    Ok(())
}

#[test]
fn test_friedman_mse_recovers_step_function() -> anyhow::Result<()> {
    let (x, y) = step_regression(24, 2);

    let config = ConfigBuilder::regression()
        .criterion(CriterionKind::FriedmanMse)
        .random_state(2)
        .build()?;
    let mut model = DecisionTreeRegressor::new(config)?;
    model.fit(&x, &y, None)?;

    let predictions = model.predict(&x)?;
    for i in 0..24 {
        assert_relative_eq!(predictions[i], y[i], epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_single_leaf_predicts_weighted_mean() -> anyhow::Result<()> {
    // A constant feature cannot split; the lone leaf predicts the weighted
    // mean of the targets.
    let x = Array2::from_elem((4, 1), 2.0);
    let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 6.0]);
    let w = Array1::from_vec(vec![1.0, 1.0, 1.0, 3.0]);

    let mut model = DecisionTreeRegressor::default();
    model.fit(&x, &y, Some(&w))?;

    let tree = model.tree().unwrap();
    assert_eq!(tree.node_count(), 1);

    // (1 + 2 + 3 + 18) / 6 = 4
    let predictions = model.predict(&x)?;
    assert_relative_eq!(predictions[0], 4.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_unseen_rows_fall_into_nearest_leaf() -> anyhow::Result<()> {
    let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
    let y = Array1::from_shape_fn(10, |i| if i < 5 { -2.0 } else { 7.0 });

    let mut model = DecisionTreeRegressor::default();
    model.fit(&x, &y, None)?;

    let unseen = Array2::from_shape_vec((2, 1), vec![-100.0, 100.0])?;
    let predictions = model.predict(&unseen)?;
    assert_relative_eq!(predictions[0], -2.0, epsilon = 1e-12);
    assert_relative_eq!(predictions[1], 7.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_all_splitters_agree_on_separable_data() -> anyhow::Result<()> {
    let x = Array2::from_shape_fn((20, 2), |(i, j)| if j == 0 { i as f64 } else { 1.0 });
    let y = Array1::from_shape_fn(20, |i| if i < 10 { 0.0 } else { 10.0 });

    for splitter in [SplitterKind::Best, SplitterKind::Random, SplitterKind::Presort] {
        let config = ConfigBuilder::regression()
            .splitter(splitter)
            .random_state(19)
            .build()?;
        let mut model = DecisionTreeRegressor::new(config)?;
        model.fit(&x, &y, None)?;

        let predictions = model.predict(&x)?;
        for i in 0..20 {
            assert_relative_eq!(predictions[i], y[i], epsilon = 1e-12);
        }
    }
    Ok(())
}

#[test]
fn test_importances_ignore_uninformative_features() -> anyhow::Result<()> {
    let (x, y) = step_regression(30, 3);

    let mut model = DecisionTreeRegressor::default();
    model.fit(&x, &y, None)?;

    let importances = model.feature_importances()?;
    assert_relative_eq!(importances.sum(), 1.0, epsilon = 1e-9);
    // Feature 0 carries the step; it must dominate.
    assert!(importances[0] > 0.9);
    Ok(())
}

#[test]
fn test_model_persistence_round_trip() -> anyhow::Result<()> {
    let (x, y) = step_regression(18, 2);

    let mut model = DecisionTreeRegressor::default();
    model.fit(&x, &y, None)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("regressor.bin");
    model.save_model(&path)?;

    let restored = DecisionTreeRegressor::load_model(&path)?;
    assert_eq!(restored.predict(&x)?, model.predict(&x)?);
    Ok(())
}
