use super::*;

/// Epsilon value for floating point precision handling
const EPSILON: f32 = 1e-8;

/// Gradient clipping value to prevent exploding gradients
const GRAD_CLIP_VALUE: f32 = 1e6;

/// Threshold for determining whether to use parallel or sequential processing (number of rows)
const SOFTMAX_PARALLEL_THRESHOLD: usize = 8;

/// Softmax activation layer.
///
/// This layer applies the Softmax activation function to each row of a
/// `(batch_size, num_classes)` tensor, converting raw scores (logits) into a
/// probability distribution:
///
/// softmax(x_i) = exp(x_i - max(x)) / sum_j(exp(x_j - max(x)))
///
/// where max(x) is subtracted for numerical stability to prevent overflow.
/// It is the output activation of every classification network in this crate.
///
/// # Fields
///
/// - `output_cache` - Cached output tensor from the forward pass, used during backpropagation
///
/// # Example
///
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array2;
///
/// let x = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
///     .unwrap()
///     .into_dyn();
///
/// let mut softmax = Softmax::new();
/// let output = softmax.forward(&x).unwrap();
///
/// // Every row sums to 1.0
/// for row in output.rows() {
///     assert!((row.sum() - 1.0).abs() < 1e-6);
/// }
/// ```
pub struct Softmax {
    output_cache: Option<Tensor>,
}

impl Softmax {
    /// Creates a new Softmax activation layer.
    ///
    /// # Returns
    ///
    /// * `Softmax` - A new `Softmax` layer instance
    pub fn new() -> Self {
        Softmax { output_cache: None }
    }
}

impl Default for Softmax {
    fn default() -> Self {
        Self::new()
    }
}

/// Views a `(batch, ..., features)` tensor as `(rows, features)`
fn rows_of(tensor: &Tensor) -> Result<Array2<f32>, ModelError> {
    let shape = tensor.shape();
    let num_features = shape[shape.len() - 1];
    let rows = tensor.len() / num_features.max(1);
    tensor
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((rows, num_features))
        .map_err(|e| ModelError::ProcessingError(format!("Failed to reshape for softmax: {}", e)))
}

impl Layer for Softmax {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_activation_input(input)?;

        if input.ndim() < 2 {
            return Err(ModelError::InputValidationError(format!(
                "Softmax requires input with at least 2 dimensions, got shape: {:?}",
                input.shape()
            )));
        }

        let mut output_2d = rows_of(input)?;

        let apply_softmax = |mut row: ArrayViewMut1<f32>| {
            let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            row.mapv_inplace(|x| (x - max_val).exp());
            let sum = row.sum().max(EPSILON);
            row.mapv_inplace(|x| x / sum);
        };

        if output_2d.nrows() > SOFTMAX_PARALLEL_THRESHOLD {
            output_2d
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .for_each(apply_softmax);
        } else {
            output_2d.axis_iter_mut(Axis(0)).for_each(apply_softmax);
        }

        let output = output_2d
            .into_shape_with_order(IxDyn(input.shape()))
            .map_err(|e| {
                ModelError::ProcessingError(format!(
                    "Failed to reshape back after softmax computation: {}",
                    e
                ))
            })?;

        self.output_cache = Some(output.clone());

        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let output = self.output_cache.as_ref().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run yet".to_string())
        })?;

        validate_activation_grad(grad_output, output)?;

        let output_2d = rows_of(output)?;
        let grad_output_2d = rows_of(grad_output)?;
        let mut grad_input_2d = Array2::<f32>::zeros(output_2d.raw_dim());

        // grad_input[i] = output[i] * (grad_output[i] - sum_j(output[j] * grad_output[j]))
        let compute_gradient = |mut grad_row: ArrayViewMut1<f32>,
                                out_row: ArrayView1<f32>,
                                grad_out_row: ArrayView1<f32>| {
            let dot = out_row.dot(&grad_out_row);
            Zip::from(&mut grad_row)
                .and(&out_row)
                .and(&grad_out_row)
                .for_each(|g, &o, &go| {
                    let v = o * (go - dot);
                    *g = if v.is_finite() {
                        v.clamp(-GRAD_CLIP_VALUE, GRAD_CLIP_VALUE)
                    } else {
                        0.0
                    };
                });
        };

        if output_2d.nrows() > SOFTMAX_PARALLEL_THRESHOLD {
            Zip::from(grad_input_2d.axis_iter_mut(Axis(0)))
                .and(output_2d.axis_iter(Axis(0)))
                .and(grad_output_2d.axis_iter(Axis(0)))
                .par_for_each(compute_gradient);
        } else {
            Zip::from(grad_input_2d.axis_iter_mut(Axis(0)))
                .and(output_2d.axis_iter(Axis(0)))
                .and(grad_output_2d.axis_iter(Axis(0)))
                .for_each(compute_gradient);
        }

        grad_input_2d
            .into_shape_with_order(IxDyn(output.shape()))
            .map_err(|e| {
                ModelError::ProcessingError(format!("Failed to reshape grad_input back: {}", e))
            })
    }

    fn layer_type(&self) -> &str {
        "Softmax"
    }

    fn output_shape(&self) -> String {
        format_output_shape(&self.output_cache)
    }

    no_trainable_parameters_layer_functions!();
}

impl ActivationLayer for Softmax {}
