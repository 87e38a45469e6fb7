use super::*;

/// Layer that flattens every sample of a batch into a feature vector.
///
/// It is the first layer of every CIFAR-10 network: image batches of shape
/// `(batch_size, 32, 32, 3)` become `(batch_size, 3072)` matrices that dense
/// layers can process. The batch size is free, so the same layer serves
/// mini-batches and full evaluation splits.
///
/// # Input Shape
///
/// `(batch_size, d1, d2, ...)` where `(d1, d2, ...)` equals the configured sample shape
///
/// # Output Shape
///
/// `(batch_size, d1 * d2 * ...)`
///
/// # Fields
///
/// - `sample_shape` - Shape of one input sample
/// - `input_shape_cache` - Full input shape of the last forward pass, used to reshape gradients
///
/// # Example
///
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array4;
///
/// let x = Array4::<f32>::ones((2, 32, 32, 3)).into_dyn();
///
/// let mut flatten = Flatten::new(vec![32, 32, 3]).unwrap();
/// let flattened = flatten.forward(&x).unwrap();
/// assert_eq!(flattened.shape(), &[2, 3072]);
/// ```
pub struct Flatten {
    sample_shape: Vec<usize>,
    input_shape_cache: Option<Vec<usize>>,
}

impl Flatten {
    /// Creates a new Flatten layer.
    ///
    /// # Parameters
    ///
    /// * `sample_shape` - Shape of one sample, without the batch axis
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new `Flatten` layer instance
    /// - `Err(ModelError::InputValidationError)` - If the shape is empty or has a zero dimension
    pub fn new(sample_shape: Vec<usize>) -> Result<Self, ModelError> {
        if sample_shape.is_empty() || sample_shape.contains(&0) {
            return Err(ModelError::InputValidationError(format!(
                "Flatten needs a non-empty sample shape without zero dimensions, got {:?}",
                sample_shape
            )));
        }

        Ok(Flatten {
            sample_shape,
            input_shape_cache: None,
        })
    }

    /// Number of features produced per sample
    pub fn output_dim(&self) -> usize {
        self.sample_shape.iter().product()
    }
}

impl Layer for Flatten {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        if input.ndim() < 1 || input.shape()[1..] != self.sample_shape[..] {
            return Err(ModelError::InputValidationError(format!(
                "Flatten expects input of shape (batch_size, {}), got {:?}",
                self.sample_shape
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                input.shape()
            )));
        }

        let batch_size = input.shape()[0];
        self.input_shape_cache = Some(input.shape().to_vec());

        input
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order(IxDyn(&[batch_size, self.output_dim()]))
            .map_err(|e| ModelError::ProcessingError(e.to_string()))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let input_shape = self.input_shape_cache.as_ref().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run yet".to_string())
        })?;

        grad_output
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order(IxDyn(input_shape))
            .map_err(|e| ModelError::ProcessingError(e.to_string()))
    }

    fn layer_type(&self) -> &str {
        "Flatten"
    }

    fn output_shape(&self) -> String {
        format_batch_shape(&[self.output_dim()])
    }

    no_trainable_parameters_layer_functions!();
}
