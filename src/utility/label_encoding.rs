use crate::error::ModelError;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

/// Converts sparse categorical labels to categorical (one-hot encoded) format
///
/// This function takes a 1D array of integer labels and converts them to a 2D
/// one-hot encoded matrix where each row represents a sample and each column
/// represents a class. The value is 1.0 for the corresponding class and 0.0
/// for all other classes.
///
/// # Parameters
///
/// - `labels` - A 1D array of integer labels (e.g., \[0, 1, 2, 1, 0\])
/// - `num_classes` - Optional number of classes. If None, it will be inferred
///   from the maximum label value + 1
///
/// # Returns
///
/// - `Ok(Array2<f32>)` - A 2D one-hot encoded matrix of shape (n_samples, n_classes)
/// - `Err(ModelError::InputValidationError)` - If a label does not fit in `num_classes`
///
/// # Examples
///
/// ```rust
/// use ndarray::array;
/// use cifar_dnn::utility::label_encoding::to_categorical;
///
/// let labels = array![0usize, 1, 2, 1, 0];
/// let categorical = to_categorical(&labels, None).unwrap();
/// // Result: [[1.0, 0.0, 0.0],
/// //          [0.0, 1.0, 0.0],
/// //          [0.0, 0.0, 1.0],
/// //          [0.0, 1.0, 0.0],
/// //          [1.0, 0.0, 0.0]]
/// assert_eq!(categorical.shape(), &[5, 3]);
/// ```
pub fn to_categorical(
    labels: &Array1<usize>,
    num_classes: Option<usize>,
) -> Result<Array2<f32>, ModelError> {
    let n_samples = labels.len();

    // Determine number of classes
    let max_label = labels.iter().copied().max();
    let n_classes = match (num_classes, max_label) {
        (Some(n), Some(max)) if n <= max => {
            return Err(ModelError::InputValidationError(format!(
                "num_classes ({}) must be greater than the maximum label ({})",
                n, max
            )));
        }
        (Some(n), _) => n,
        (None, Some(max)) => max + 1,
        (None, None) => 0,
    };

    let mut categorical = Array2::<f32>::zeros((n_samples, n_classes));
    for (i, &label) in labels.iter().enumerate() {
        categorical[[i, label]] = 1.0;
    }

    Ok(categorical)
}

/// Converts categorical (one-hot encoded) format to sparse categorical labels
///
/// This function performs the inverse operation of `to_categorical`, converting
/// a one-hot encoded matrix back to integer labels. Each row is mapped to the
/// index of its maximum value, so it also turns predicted class probabilities
/// into predicted labels. Ties resolve to the lowest index.
///
/// # Parameters
///
/// * `categorical` - A 2D matrix where each row represents a sample
///
/// # Returns
///
/// * `Array1<usize>` - A 1D array of integer labels
pub fn to_sparse_categorical<S>(categorical: &ArrayBase<S, Ix2>) -> Array1<usize>
where
    S: Data<Elem = f32>,
{
    categorical
        .rows()
        .into_iter()
        .map(|row| {
            let mut max_index = 0;
            let mut max_value = f32::NEG_INFINITY;
            for (j, &value) in row.iter().enumerate() {
                if value > max_value {
                    max_value = value;
                    max_index = j;
                }
            }
            max_index
        })
        .collect()
}
