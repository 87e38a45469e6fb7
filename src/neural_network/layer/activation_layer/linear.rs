use super::*;

/// Identity activation, `f(x) = x`.
///
/// Lets a `Dense` layer emit its raw affine output, which the layer stack builder
/// uses when the dense layer's output goes straight into a normalization layer.
/// Only the input shape is remembered, since the gradient passes through unchanged.
///
/// # Examples
///
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::array;
///
/// let x = array![[-1.0f32, 2.0, -3.0], [4.0, -5.0, 6.0]].into_dyn();
/// let mut linear = Linear::new();
/// assert_eq!(linear.forward(&x).unwrap(), x);
/// ```
#[derive(Default)]
pub struct Linear {
    input_shape: Option<Vec<usize>>,
}

impl Linear {
    /// Creates a new identity activation layer
    pub fn new() -> Self {
        Linear { input_shape: None }
    }
}

impl Layer for Linear {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_activation_input(input)?;
        self.input_shape = Some(input.shape().to_vec());
        Ok(input.clone())
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let shape = self.input_shape.as_deref().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run yet".to_string())
        })?;
        if grad_output.shape() != shape {
            return Err(ModelError::ProcessingError(format!(
                "Gradient output shape {:?} doesn't match input shape {:?}",
                grad_output.shape(),
                shape
            )));
        }
        Ok(grad_output.clone())
    }

    fn layer_type(&self) -> &str {
        "Linear"
    }

    fn output_shape(&self) -> String {
        match &self.input_shape {
            Some(shape) => format_batch_shape(&shape[1..]),
            None => "Unknown".to_string(),
        }
    }

    no_trainable_parameters_layer_functions!();
}

impl ActivationLayer for Linear {}
