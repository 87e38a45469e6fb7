use crate::error::ModelError;
use crate::neural_network::Tensor;
use ndarray::{ArrayView1, ArrayView2, Axis, Ix2};
use rayon::prelude::*;

/// Rows above this count are compared in parallel
const METRIC_PARALLEL_THRESHOLD: usize = 1024;

/// Index of the largest entry of a row, ties resolved to the lowest index
fn arg_max(row: ArrayView1<f32>) -> usize {
    let mut best_index = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (j, &value) in row.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best_index = j;
        }
    }
    best_index
}

/// Counts the samples whose predicted class (arg-max of `y_pred`) equals the
/// true class (arg-max of the one-hot `y_true`).
///
/// # Parameters
///
/// - `y_true` - One-hot targets of shape `(n_samples, n_classes)`
/// - `y_pred` - Class scores or probabilities of the same shape
///
/// # Returns
///
/// - `Ok(usize)` - Number of correctly classified samples
/// - `Err(ModelError::InputValidationError)` - If the tensors are not 2D or their shapes differ
pub fn correct_predictions(y_true: &Tensor, y_pred: &Tensor) -> Result<usize, ModelError> {
    if y_true.shape() != y_pred.shape() {
        return Err(ModelError::InputValidationError(format!(
            "y_true shape {:?} doesn't match y_pred shape {:?}",
            y_true.shape(),
            y_pred.shape()
        )));
    }

    fn to_2d(t: &Tensor) -> Result<ArrayView2<'_, f32>, ModelError> {
        t.view().into_dimensionality::<Ix2>().map_err(|_| {
            ModelError::InputValidationError(format!(
                "Expected a (n_samples, n_classes) tensor, got shape {:?}",
                t.shape()
            ))
        })
    }

    let y_true_2d = to_2d(y_true)?;
    let y_pred_2d = to_2d(y_pred)?;

    let is_correct = |(t, p): (ArrayView1<f32>, ArrayView1<f32>)| arg_max(t) == arg_max(p);

    let correct = if y_true_2d.nrows() >= METRIC_PARALLEL_THRESHOLD {
        y_true_2d
            .axis_iter(Axis(0))
            .into_par_iter()
            .zip(y_pred_2d.axis_iter(Axis(0)).into_par_iter())
            .filter(|&pair| is_correct(pair))
            .count()
    } else {
        y_true_2d
            .axis_iter(Axis(0))
            .zip(y_pred_2d.axis_iter(Axis(0)))
            .filter(|&pair| is_correct(pair))
            .count()
    };

    Ok(correct)
}

/// Calculates categorical accuracy: the fraction of samples whose arg-max prediction
/// matches the arg-max of the one-hot target.
///
/// # Parameters
///
/// - `y_true` - One-hot targets of shape `(n_samples, n_classes)`
/// - `y_pred` - Class scores or probabilities of the same shape
///
/// # Returns
///
/// - `Ok(f32)` - Accuracy in the range \[0.0, 1.0\] (0.0 for an empty batch)
/// - `Err(ModelError::InputValidationError)` - If the tensors are not 2D or their shapes differ
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use cifar_dnn::metric::categorical_accuracy;
///
/// let y_true = array![[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]].into_dyn();
/// let y_pred = array![[0.7f32, 0.2, 0.1], [0.6, 0.3, 0.1]].into_dyn();
///
/// let accuracy = categorical_accuracy(&y_true, &y_pred).unwrap();
/// assert_eq!(accuracy, 0.5);
/// ```
pub fn categorical_accuracy(y_true: &Tensor, y_pred: &Tensor) -> Result<f32, ModelError> {
    let correct = correct_predictions(y_true, y_pred)?;
    let n_samples = y_true.shape().first().copied().unwrap_or(0);
    if n_samples == 0 {
        return Ok(0.0);
    }
    Ok(correct as f32 / n_samples as f32)
}
