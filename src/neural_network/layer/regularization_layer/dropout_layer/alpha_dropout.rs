use super::*;

/// Value SELU saturates to for large negative inputs: `-SELU_SCALE * SELU_ALPHA`
const ALPHA_PRIME: f32 = -SELU_SCALE * SELU_ALPHA;

/// Alpha dropout layer for self-normalizing (SELU) networks.
///
/// Standard dropout zeroes units and rescales the rest, which shifts the mean and
/// variance that SELU networks rely on. Alpha dropout instead sets dropped units to
/// SELU's negative saturation value `alpha' = -scale * alpha`, then applies an affine
/// correction `a * x + b` with
///
/// - `a = ((1 - rate) * (1 + rate * alpha'^2))^(-1/2)`
/// - `b = -a * alpha' * rate`
///
/// so that zero-mean, unit-variance inputs keep zero mean and unit variance.
/// The layer is the identity at inference time.
///
/// # Fields
///
/// - `rate` - Fraction of units to drop, in [0, 1)
/// - `feature_shape` - Shape of one input sample
/// - `mask` - Keep mask drawn in the last training forward pass
/// - `training` - Whether the layer is in training mode or inference mode
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array2;
///
/// let mut dropout = AlphaDropout::new(0.1, vec![100]).unwrap();
/// dropout.set_training(false);
///
/// let input = Array2::ones((4, 100)).into_dyn();
/// assert_eq!(dropout.forward(&input).unwrap(), input);
/// ```
pub struct AlphaDropout {
    rate: f32,
    feature_shape: Vec<usize>,
    mask: Option<Tensor>,
    training: bool,
}

impl AlphaDropout {
    /// Creates a new AlphaDropout layer.
    ///
    /// # Parameters
    ///
    /// - `rate` - Fraction of units to drop, in [0, 1)
    /// - `feature_shape` - Shape of one input sample, without the batch axis
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new AlphaDropout layer in training mode
    /// - `Err(ModelError::InputValidationError)` - If the rate or the shape is invalid
    pub fn new(rate: f32, feature_shape: Vec<usize>) -> Result<Self, ModelError> {
        validate_rate_exclusive(rate, "AlphaDropout rate")?;
        validate_feature_shape_not_empty(&feature_shape)?;

        Ok(AlphaDropout {
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

    /// Affine correction `(a, b)` applied after dropping units
    pub fn affine_correction(&self) -> (f32, f32) {
        let rate = self.rate;
        let a = ((1.0 - rate) * (1.0 + rate * ALPHA_PRIME * ALPHA_PRIME)).powf(-0.5);
        let b = -a * ALPHA_PRIME * rate;
        (a, b)
    }

    mode_dependent_layer_set_training!();
}

impl Layer for AlphaDropout {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_feature_shape(input.shape(), &self.feature_shape, "AlphaDropout")?;

        if !self.training || self.rate == 0.0 {
            self.mask = None;
            return Ok(input.clone());
        }

        let mask = keep_mask(input.raw_dim(), self.rate);
        let (a, b) = self.affine_correction();

        let mut output = input.clone();
        let apply = |out: &mut f32, &keep: &f32| {
            let x = if keep > 0.0 { *out } else { ALPHA_PRIME };
            *out = a * x + b;
        };
        if input.len() >= DROPOUT_PARALLEL_THRESHOLD {
            Zip::from(&mut output).and(&mask).par_for_each(apply);
        } else {
            Zip::from(&mut output).and(&mask).for_each(apply);
        }

        self.mask = Some(mask);

        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        // Dropped units are constants, kept units are scaled by `a`
        let (a, _) = self.affine_correction();
        let scale = if self.rate == 0.0 { 1.0 } else { a };
        dropout_backward(grad_output, &self.mask, self.training, scale)
    }

    fn layer_type(&self) -> &str {
        "AlphaDropout"
    }

    fn output_shape(&self) -> String {
        format_batch_shape(&self.feature_shape)
    }

    no_trainable_parameters_layer_functions!();

    mode_dependent_layer_trait!();
}
