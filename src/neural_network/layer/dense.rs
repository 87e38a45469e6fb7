use super::*;

/// Dense (Fully Connected) layer implementation for neural networks.
///
/// This layer performs a linear transformation of the input data using a weight matrix and bias vector,
/// followed by an activation layer. The transformation is defined as: output = activation(input * weights + bias).
///
/// The kernel is drawn with the given `KernelInitializer`; bias values are initialized to zeros.
/// The activation is any `ActivationLayer`, so the output of the affine map is passed through the
/// activation's own forward and backward passes.
///
/// # Dimensions
///
/// - Input shape: (batch_size, input_dim)
/// - Output shape: (batch_size, output_dim)
///
/// # Fields
/// ## Core fields
/// - `input_dim` - Input dimension size
/// - `output_dim` - Output dimension size
/// - `weights` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias vector with shape (1, output_dim)
/// - `activation` - Activation layer applied after the affine map
/// - `initializer` - Scheme the kernel was drawn with
///
/// ## Cache
/// - `input_cache` - Cache of the input from forward pass for use in backward pass
/// - `grad_weights` - Stored weight gradients
/// - `grad_bias` - Stored bias gradients
/// - `adam_weights` / `adam_bias` - Moment estimates for Adam and Nadam
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array;
///
/// let x = Array::ones((2, 4)).into_dyn();
///
/// let mut dense = Dense::new(4, 3, SELU::new(), KernelInitializer::LecunNormal).unwrap();
/// let output = dense.forward(&x).unwrap();
/// assert_eq!(output.shape(), &[2, 3]);
/// ```
pub struct Dense<T: ActivationLayer> {
    input_dim: usize,
    output_dim: usize,
    weights: Array2<f32>,
    bias: Array2<f32>,
    activation: T,
    initializer: KernelInitializer,
    input_cache: Option<Array2<f32>>,
    grad_weights: Option<Array2<f32>>,
    grad_bias: Option<Array2<f32>>,
    adam_weights: Option<AdamStates<Ix2>>,
    adam_bias: Option<AdamStates<Ix2>>,
}

impl<T: ActivationLayer> Dense<T> {
    /// Creates a new dense layer.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of input features
    /// - `output_dim` - Number of units
    /// - `activation` - Activation layer applied to the affine output
    /// - `initializer` - Scheme used to draw the kernel
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Dense layer instance with specified dimensions
    /// - `Err(ModelError::InputValidationError)` - If either dimension is zero
    pub fn new(
        input_dim: usize,
        output_dim: usize,
        activation: T,
        initializer: KernelInitializer,
    ) -> Result<Self, ModelError> {
        let weights = initializer.initialize(input_dim, output_dim)?;
        let bias = Array2::zeros((1, output_dim));

        Ok(Self {
            input_dim,
            output_dim,
            weights,
            bias,
            activation,
            initializer,
            input_cache: None,
            grad_weights: None,
            grad_bias: None,
            adam_weights: None,
            adam_bias: None,
        })
    }

    /// Replaces the kernel and bias, e.g. when restoring saved weights.
    ///
    /// Optimizer moment estimates are kept, so training can resume after a restore.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Weights were replaced
    /// - `Err(ModelError::InputValidationError)` - If a shape does not match the layer
    pub fn set_weights(&mut self, weights: Array2<f32>, bias: Array2<f32>) -> Result<(), ModelError> {
        if weights.dim() != (self.input_dim, self.output_dim) || bias.dim() != (1, self.output_dim)
        {
            return Err(ModelError::InputValidationError(format!(
                "Dense layer expects weights {:?} and bias {:?}, got {:?} and {:?}",
                (self.input_dim, self.output_dim),
                (1, self.output_dim),
                weights.dim(),
                bias.dim()
            )));
        }
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    /// Number of input features
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of units
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Kernel with shape (input_dim, output_dim)
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Bias with shape (1, output_dim)
    pub fn bias(&self) -> &Array2<f32> {
        &self.bias
    }

    /// The activation layer applied after the affine map
    pub fn activation(&self) -> &T {
        &self.activation
    }

    /// The scheme the kernel was drawn with
    pub fn initializer(&self) -> KernelInitializer {
        self.initializer
    }
}

impl<T: ActivationLayer> Layer for Dense<T> {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        if input.ndim() != 2 || input.shape()[1] != self.input_dim {
            return Err(ModelError::InputValidationError(format!(
                "Dense layer expects input of shape (batch_size, {}), got {:?}",
                self.input_dim,
                input.shape()
            )));
        }

        let input_2d = input
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|e| ModelError::ProcessingError(e.to_string()))?
            .to_owned();

        // ndarray dispatches large products to its parallel matrix multiplication
        let z = input_2d.dot(&self.weights) + &self.bias;
        self.input_cache = Some(input_2d);

        self.activation.forward(&z.into_dyn())
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let input = self.input_cache.take().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run".to_string())
        })?;

        // Gradient with respect to the pre-activation output, shape (batch_size, output_dim)
        let grad_z = self
            .activation
            .backward(grad_output)?
            .into_dimensionality::<Ix2>()
            .map_err(|e| ModelError::ProcessingError(e.to_string()))?;

        let (grad_w, (grad_b, grad_input)) = rayon::join(
            || input.t().dot(&grad_z),
            || {
                (
                    grad_z.sum_axis(Axis(0)).insert_axis(Axis(0)),
                    grad_z.dot(&self.weights.t()),
                )
            },
        );

        self.grad_weights = Some(grad_w);
        self.grad_bias = Some(grad_b);

        Ok(grad_input.into_dyn())
    }

    fn layer_type(&self) -> &str {
        "Dense"
    }

    fn output_shape(&self) -> String {
        format_batch_shape(&[self.output_dim])
    }

    fn param_count(&self) -> TrainingParameters {
        // Parameter count = number of weight parameters + number of bias parameters
        TrainingParameters::Trainable(self.input_dim * self.output_dim + self.output_dim)
    }

    fn update_parameters_sgd(&mut self, lr: f32) {
        if let (Some(grad_w), Some(grad_b)) = (&self.grad_weights, &self.grad_bias) {
            rayon::join(
                || self.weights.scaled_add(-lr, grad_w),
                || self.bias.scaled_add(-lr, grad_b),
            );
        }
    }

    fn update_parameters_adam(&mut self, lr: f32, beta1: f32, beta2: f32, epsilon: f32, t: u64) {
        if let (Some(grad_w), Some(grad_b)) = (&self.grad_weights, &self.grad_bias) {
            let states_w = self
                .adam_weights
                .get_or_insert_with(|| AdamStates::new(self.weights.raw_dim()));
            let states_b = self
                .adam_bias
                .get_or_insert_with(|| AdamStates::new(self.bias.raw_dim()));

            let (w_update, b_update) = rayon::join(
                || states_w.update_parameter(grad_w, beta1, beta2, epsilon, t, lr),
                || states_b.update_parameter(grad_b, beta1, beta2, epsilon, t, lr),
            );

            self.weights -= &w_update;
            self.bias -= &b_update;
        }
    }

    fn update_parameters_nadam(&mut self, lr: f32, beta1: f32, beta2: f32, epsilon: f32, t: u64) {
        if let (Some(grad_w), Some(grad_b)) = (&self.grad_weights, &self.grad_bias) {
            let states_w = self
                .adam_weights
                .get_or_insert_with(|| AdamStates::new(self.weights.raw_dim()));
            let states_b = self
                .adam_bias
                .get_or_insert_with(|| AdamStates::new(self.bias.raw_dim()));

            let (w_update, b_update) = rayon::join(
                || states_w.update_parameter_nadam(grad_w, beta1, beta2, epsilon, t, lr),
                || states_b.update_parameter_nadam(grad_b, beta1, beta2, epsilon, t, lr),
            );

            self.weights -= &w_update;
            self.bias -= &b_update;
        }
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::Dense(DenseLayerWeight {
            weight: &self.weights,
            bias: &self.bias,
        })
    }
}
