use super::*;

/// Alpha constant of SELU, fixed so that activations converge to zero mean and unit variance
pub const SELU_ALPHA: f32 = 1.673_263_2;

/// Scale constant of SELU
pub const SELU_SCALE: f32 = 1.050_701;

/// SELU (Scaled Exponential Linear Unit) activation layer.
///
/// Applies element-wise:
///
/// - `f(x) = scale * x` for `x > 0`
/// - `f(x) = scale * alpha * (exp(x) - 1)` for `x <= 0`
///
/// with the fixed constants `SELU_ALPHA` and `SELU_SCALE`. A stack of dense SELU
/// layers initialized with LeCun normal weights self-normalizes: each layer's outputs
/// stay close to zero mean and unit variance, provided the inputs are standardized.
/// Regular dropout breaks this property; use `AlphaDropout` instead.
///
/// # Fields
///
/// - `input_cache` - Cached input tensor from the forward pass, used during backpropagation
pub struct SELU {
    input_cache: Option<Tensor>,
}

impl SELU {
    /// Creates a new SELU activation layer.
    ///
    /// # Returns
    ///
    /// - `Self` - A new `SELU` layer instance
    pub fn new() -> Self {
        SELU { input_cache: None }
    }
}

impl Default for SELU {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for SELU {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_activation_input(input)?;

        self.input_cache = Some(input.clone());

        Ok(map_elementwise(input, |x| {
            if x > 0.0 {
                SELU_SCALE * x
            } else {
                SELU_SCALE * SELU_ALPHA * x.exp_m1()
            }
        }))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        if let Some(input) = &self.input_cache {
            validate_activation_grad(grad_output, input)?;

            Ok(chain_elementwise(grad_output, input, |x| {
                if x > 0.0 {
                    SELU_SCALE
                } else {
                    SELU_SCALE * SELU_ALPHA * x.exp()
                }
            }))
        } else {
            Err(ModelError::ProcessingError(
                "Forward pass has not been run yet".to_string(),
            ))
        }
    }

    fn layer_type(&self) -> &str {
        "SELU"
    }

    fn output_shape(&self) -> String {
        format_output_shape(&self.input_cache)
    }

    no_trainable_parameters_layer_functions!();
}

impl ActivationLayer for SELU {}
