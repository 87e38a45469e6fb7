use super::*;

/// ELU (Exponential Linear Unit) activation layer.
///
/// Applies element-wise:
///
/// - `f(x) = x` for `x > 0`
/// - `f(x) = alpha * (exp(x) - 1)` for `x <= 0`
///
/// Its derivative is `1` for positive inputs and `f(x) + alpha` otherwise, so negative
/// inputs keep a non-zero gradient. Paired with He initialization it is the activation
/// of the plain and batch-normalized deep networks.
///
/// # Fields
///
/// - `alpha` - Saturation value for large negative inputs
/// - `input_cache` - Cached input tensor from the forward pass, used during backpropagation
///
/// # Examples
///
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::array;
///
/// let x = array![[0.0f32, 2.0, -100.0]].into_dyn();
/// let mut elu = ELU::new(1.0);
/// let output = elu.forward(&x).unwrap();
/// assert_eq!(output[[0, 0]], 0.0);
/// assert_eq!(output[[0, 1]], 2.0);
/// assert!((output[[0, 2]] + 1.0).abs() < 1e-6);
/// ```
pub struct ELU {
    alpha: f32,
    input_cache: Option<Tensor>,
}

impl ELU {
    /// Creates a new ELU activation layer.
    ///
    /// # Parameters
    ///
    /// - `alpha` - Saturation value for negative inputs, usually 1.0
    ///
    /// # Returns
    ///
    /// - `Self` - A new `ELU` layer instance
    pub fn new(alpha: f32) -> Self {
        ELU {
            alpha,
            input_cache: None,
        }
    }

    /// The saturation value
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for ELU {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Layer for ELU {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_activation_input(input)?;

        self.input_cache = Some(input.clone());

        let alpha = self.alpha;
        Ok(map_elementwise(input, move |x| {
            if x > 0.0 { x } else { alpha * x.exp_m1() }
        }))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        if let Some(input) = &self.input_cache {
            validate_activation_grad(grad_output, input)?;

            let alpha = self.alpha;
            Ok(chain_elementwise(grad_output, input, move |x| {
                if x > 0.0 { 1.0 } else { alpha * x.exp() }
            }))
        } else {
            Err(ModelError::ProcessingError(
                "Forward pass has not been run yet".to_string(),
            ))
        }
    }

    fn layer_type(&self) -> &str {
        "ELU"
    }

    fn output_shape(&self) -> String {
        format_output_shape(&self.input_cache)
    }

    no_trainable_parameters_layer_functions!();
}

impl ActivationLayer for ELU {}
