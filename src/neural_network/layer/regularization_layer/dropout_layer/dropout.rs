use super::*;

/// Dropout layer for neural networks, which randomly sets a fraction of input units to 0
/// at each update during training time, which helps prevent overfitting.
///
/// Kept units are scaled by `1 / (1 - rate)` ("inverted dropout"), so the layer is
/// the identity at inference time.
///
/// # Fields
///
/// - `rate` - Dropout rate: fraction of the input units to drop, in [0, 1)
/// - `feature_shape` - Shape of one input sample
/// - `mask` - Binary mask used during training to determine which neurons to drop
/// - `training` - Whether the layer is in training mode or inference mode
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array2;
///
/// let mut dropout = Dropout::new(0.5, vec![128]).unwrap();
/// let input = Array2::ones((32, 128)).into_dyn();
///
/// // During training, approximately 50% of values will be set to 0
/// let output = dropout.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 128]);
/// ```
pub struct Dropout {
    rate: f32,
    feature_shape: Vec<usize>,
    mask: Option<Tensor>,
    training: bool,
}

impl Dropout {
    /// Creates a new Dropout layer.
    ///
    /// # Parameters
    ///
    /// - `rate` - Dropout rate: fraction of the input units to drop, in [0, 1)
    /// - `feature_shape` - Shape of one input sample, without the batch axis
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Dropout layer in training mode
    /// - `Err(ModelError::InputValidationError)` - If the rate or the shape is invalid
    pub fn new(rate: f32, feature_shape: Vec<usize>) -> Result<Self, ModelError> {
        validate_rate_exclusive(rate, "Dropout rate")?;
        validate_feature_shape_not_empty(&feature_shape)?;

        Ok(Dropout {
            rate,
            feature_shape,
            mask: None,
            training: true,
        })
    }

    /// The dropout rate
    pub fn rate(&self) -> f32 {
        self.rate
    }

    mode_dependent_layer_set_training!();
}

impl Layer for Dropout {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_feature_shape(input.shape(), &self.feature_shape, "Dropout")?;

        if !self.training || self.rate == 0.0 {
            self.mask = None;
            return Ok(input.clone());
        }

        let mask = keep_mask(input.raw_dim(), self.rate);
        let scale = 1.0 / (1.0 - self.rate);
        let output = input * &mask * scale;

        self.mask = Some(mask);

        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        dropout_backward(
            grad_output,
            &self.mask,
            self.training,
            1.0 / (1.0 - self.rate),
        )
    }

    fn layer_type(&self) -> &str {
        "Dropout"
    }

    fn output_shape(&self) -> String {
        format_batch_shape(&self.feature_shape)
    }

    no_trainable_parameters_layer_functions!();

    mode_dependent_layer_trait!();
}
