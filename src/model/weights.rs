//! Class-weight expansion for unbalanced datasets.

use crate::core::error::{CartError, Result};
use ndarray::Array1;

/// Expands per-class weights into per-sample weights.
///
/// `class_indices[i]` is the class index of sample `i`; the returned vector
/// holds `class_weight[class_indices[i]]` for every sample.
pub fn compute_sample_weight(
    class_weight: &[f64],
    class_indices: &[usize],
) -> Result<Array1<f64>> {
    let mut weights = Array1::zeros(class_indices.len());

    for (i, &class) in class_indices.iter().enumerate() {
        if class >= class_weight.len() {
            return Err(CartError::invalid_parameter(
                "class_weight",
                format!("{} entries", class_weight.len()),
                format!("sample {} belongs to class {}", i, class),
            ));
        }
        weights[i] = class_weight[class];
    }

    Ok(weights)
}
