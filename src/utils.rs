//! Small shared utilities.

use crate::core::types::SampleIndex;

/// Computes the permutation that sorts `values` ascending.
///
/// NaN values order last; the sort is stable so equal values keep their
/// relative order.
pub fn sort_permutation(values: &[f64]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..values.len()).collect();
    perm.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    perm
}

/// Applies `perm` to `values` and `samples` in lock-step.
///
/// Both slices must have the same length as `perm`.
pub fn apply_permutation(values: &mut [f64], samples: &mut [SampleIndex], perm: &[usize]) {
    debug_assert_eq!(values.len(), perm.len());
    debug_assert_eq!(samples.len(), perm.len());

    let sorted_values: Vec<f64> = perm.iter().map(|&i| values[i]).collect();
    let sorted_samples: Vec<SampleIndex> = perm.iter().map(|&i| samples[i]).collect();
    values.copy_from_slice(&sorted_values);
    samples.copy_from_slice(&sorted_samples);
}

/// Sorts `values` ascending, reordering `samples` identically.
pub fn sort_by_values(values: &mut [f64], samples: &mut [SampleIndex]) {
    let perm = sort_permutation(values);
    apply_permutation(values, samples, &perm);
}
