use super::*;

/// Threshold for switching between sequential and parallel batch normalization computation.
/// Based on batch_size * feature_size (total elements in batch).
const BATCH_NORM_PARALLEL_THRESHOLD: usize = 1024;

/// Default momentum of the running statistics
pub const DEFAULT_BATCH_NORM_MOMENTUM: f32 = 0.99;

/// Default epsilon added to the variance
pub const DEFAULT_BATCH_NORM_EPSILON: f32 = 1e-3;

/// Multiplies every sample of `x` by `factor` (which has the per-sample shape),
/// in parallel over samples for large batches
fn scale_samples(x: &mut Tensor, factor: &Tensor) {
    if x.len() >= BATCH_NORM_PARALLEL_THRESHOLD {
        x.axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut sample| sample *= factor);
    } else {
        *x *= factor;
    }
}

/// Batch Normalization layer for neural networks, which normalizes the inputs
/// of each mini-batch to improve training stability and speed.
///
/// During training every feature is normalized with the mean and variance of the
/// current mini-batch, then scaled by `gamma` and shifted by `beta`. The batch statistics
/// are folded into running averages,
/// `running = momentum * running + (1 - momentum) * batch`, which replace the batch
/// statistics at inference time.
///
/// # Fields
///
/// - `epsilon` - Small constant for numerical stability in normalization
/// - `momentum` - Momentum for the moving average of mean and variance
/// - `feature_shape` - Shape of one input sample
/// - `gamma` - Scale parameter (trainable)
/// - `beta` - Shift parameter (trainable)
/// - `running_mean` - Running mean for inference (non-trainable)
/// - `running_var` - Running variance for inference (non-trainable)
/// - `training` - Whether the layer is in training mode or inference mode
/// - `x_normalized` - Normalized input (used in backward pass)
/// - `inv_std` - Inverse standard deviation of the batch (used in backward pass)
/// - `grad_gamma` - Gradient for gamma parameter
/// - `grad_beta` - Gradient for beta parameter
/// - `adam_gamma` / `adam_beta` - Moment estimates for Adam and Nadam
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array2;
///
/// let mut bn = BatchNormalization::new(vec![128], 0.99, 1e-3).unwrap();
/// let input = Array2::ones((32, 128)).into_dyn();
///
/// let output = bn.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 128]);
/// ```
pub struct BatchNormalization {
    epsilon: f32,
    momentum: f32,
    feature_shape: Vec<usize>,
    gamma: Tensor,
    beta: Tensor,
    running_mean: Tensor,
    running_var: Tensor,
    training: bool,
    // Cache for backward pass
    x_normalized: Option<Tensor>,
    inv_std: Option<Tensor>,
    // Gradients
    grad_gamma: Option<Tensor>,
    grad_beta: Option<Tensor>,
    // Optimizer cache
    adam_gamma: Option<AdamStates<IxDyn>>,
    adam_beta: Option<AdamStates<IxDyn>>,
}

impl BatchNormalization {
    /// Creates a new BatchNormalization layer.
    ///
    /// # Parameters
    ///
    /// - `feature_shape` - Shape of one input sample, without the batch axis
    /// - `momentum` - Momentum for the moving average of mean and variance (typically 0.99)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-3)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new BatchNormalization layer in training mode
    /// - `Err(ModelError::InputValidationError)` - If a parameter is out of range
    pub fn new(feature_shape: Vec<usize>, momentum: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_feature_shape_not_empty(&feature_shape)?;
        validate_momentum(momentum)?;
        validate_epsilon(epsilon)?;

        let param_shape = IxDyn(&feature_shape);

        Ok(BatchNormalization {
            epsilon,
            momentum,
            gamma: Tensor::ones(param_shape.clone()),
            beta: Tensor::zeros(param_shape.clone()),
            running_mean: Tensor::zeros(param_shape.clone()),
            running_var: Tensor::ones(param_shape),
            feature_shape,
            training: true,
            x_normalized: None,
            inv_std: None,
            grad_gamma: None,
            grad_beta: None,
            adam_gamma: None,
            adam_beta: None,
        })
    }

    /// Creates a BatchNormalization layer with the default momentum and epsilon.
    pub fn with_defaults(feature_shape: Vec<usize>) -> Result<Self, ModelError> {
        Self::new(
            feature_shape,
            DEFAULT_BATCH_NORM_MOMENTUM,
            DEFAULT_BATCH_NORM_EPSILON,
        )
    }

    mode_dependent_layer_set_training!();

    /// Sets the weights for the BatchNormalization layer.
    ///
    /// # Parameters
    ///
    /// - `gamma` - Scale parameter (trainable)
    /// - `beta` - Shift parameter (trainable)
    /// - `running_mean` - Running mean for inference
    /// - `running_var` - Running variance for inference
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Weights were replaced
    /// - `Err(ModelError::InputValidationError)` - If a shape differs from the feature shape
    pub fn set_weights(
        &mut self,
        gamma: Tensor,
        beta: Tensor,
        running_mean: Tensor,
        running_var: Tensor,
    ) -> Result<(), ModelError> {
        for (name, tensor) in [
            ("gamma", &gamma),
            ("beta", &beta),
            ("running_mean", &running_mean),
            ("running_var", &running_var),
        ] {
            if tensor.shape() != self.feature_shape.as_slice() {
                return Err(ModelError::InputValidationError(format!(
                    "BatchNormalization {} must have shape {:?}, got {:?}",
                    name,
                    self.feature_shape,
                    tensor.shape()
                )));
            }
        }

        self.gamma = gamma;
        self.beta = beta;
        self.running_mean = running_mean;
        self.running_var = running_var;
        Ok(())
    }

    /// Running mean used at inference time
    pub fn running_mean(&self) -> &Tensor {
        &self.running_mean
    }

    /// Running variance used at inference time
    pub fn running_var(&self) -> &Tensor {
        &self.running_var
    }
}

impl Layer for BatchNormalization {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        validate_feature_shape(input.shape(), &self.feature_shape, "BatchNormalization")?;

        if input.shape()[0] == 0 {
            return Err(ModelError::InputValidationError(
                "BatchNormalization received an empty batch".to_string(),
            ));
        }

        if !self.training {
            // Inference mode: use running statistics
            let inv_std = self.running_var.mapv(|v| 1.0 / (v + self.epsilon).sqrt());
            let mut output = input - &self.running_mean;
            scale_samples(&mut output, &(&inv_std * &self.gamma));
            output += &self.beta;
            return Ok(output);
        }

        let batch_mean = input
            .mean_axis(Axis(0))
            .ok_or_else(|| ModelError::ProcessingError("Empty batch".to_string()))?;
        let mut x_normalized = input - &batch_mean;
        let batch_var = x_normalized
            .mapv(|x| x * x)
            .mean_axis(Axis(0))
            .ok_or_else(|| ModelError::ProcessingError("Empty batch".to_string()))?;

        let inv_std = batch_var.mapv(|v| 1.0 / (v + self.epsilon).sqrt());
        scale_samples(&mut x_normalized, &inv_std);

        // Scale and shift
        let mut output = x_normalized.clone();
        scale_samples(&mut output, &self.gamma);
        output += &self.beta;

        // Update running statistics
        let momentum = self.momentum;
        Zip::from(&mut self.running_mean)
            .and(&batch_mean)
            .for_each(|r, &b| *r = momentum * *r + (1.0 - momentum) * b);
        Zip::from(&mut self.running_var)
            .and(&batch_var)
            .for_each(|r, &b| *r = momentum * *r + (1.0 - momentum) * b);

        self.x_normalized = Some(x_normalized);
        self.inv_std = Some(inv_std);

        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        if !self.training {
            // Inference mode is an affine map with fixed statistics
            let scale = self
                .running_var
                .mapv(|v| 1.0 / (v + self.epsilon).sqrt())
                * &self.gamma;
            let mut grad_input = grad_output.clone();
            scale_samples(&mut grad_input, &scale);
            return Ok(grad_input);
        }

        let x_normalized = self.x_normalized.as_ref().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run".to_string())
        })?;
        let inv_std = self.inv_std.as_ref().ok_or_else(|| {
            ModelError::ProcessingError("Forward pass has not been run".to_string())
        })?;

        if grad_output.shape() != x_normalized.shape() {
            return Err(ModelError::ProcessingError(format!(
                "Gradient shape {:?} doesn't match forward input shape {:?}",
                grad_output.shape(),
                x_normalized.shape()
            )));
        }

        let batch_size = grad_output.shape()[0] as f32;

        // Compute gradients for gamma and beta
        let grad_gamma = (grad_output * x_normalized).sum_axis(Axis(0));
        let grad_beta = grad_output.sum_axis(Axis(0));

        // dx = inv_std / N * (N * dx_hat - sum(dx_hat) - x_hat * sum(dx_hat * x_hat))
        let mut grad_x_normalized = grad_output.clone();
        scale_samples(&mut grad_x_normalized, &self.gamma);
        let sum_grad = grad_x_normalized.sum_axis(Axis(0));
        let sum_grad_x = (&grad_x_normalized * x_normalized).sum_axis(Axis(0));

        let mut grad_input = grad_x_normalized * batch_size - &sum_grad;
        let mut correction = x_normalized.clone();
        scale_samples(&mut correction, &sum_grad_x);
        grad_input -= &correction;
        scale_samples(&mut grad_input, &(inv_std / batch_size));

        self.grad_gamma = Some(grad_gamma);
        self.grad_beta = Some(grad_beta);

        Ok(grad_input)
    }

    fn layer_type(&self) -> &str {
        "BatchNormalization"
    }

    fn output_shape(&self) -> String {
        format_batch_shape(&self.feature_shape)
    }

    fn param_count(&self) -> TrainingParameters {
        TrainingParameters::Mixed {
            trainable: self.gamma.len() + self.beta.len(),
            non_trainable: self.running_mean.len() + self.running_var.len(),
        }
    }

    fn update_parameters_sgd(&mut self, lr: f32) {
        normalization_layer_update_parameters_sgd!(self, lr)
    }

    fn update_parameters_adam(&mut self, lr: f32, beta1: f32, beta2: f32, epsilon: f32, t: u64) {
        normalization_layer_update_parameters_adaptive!(
            self,
            update_parameter,
            lr,
            beta1,
            beta2,
            epsilon,
            t
        )
    }

    fn update_parameters_nadam(&mut self, lr: f32, beta1: f32, beta2: f32, epsilon: f32, t: u64) {
        normalization_layer_update_parameters_adaptive!(
            self,
            update_parameter_nadam,
            lr,
            beta1,
            beta2,
            epsilon,
            t
        )
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::BatchNormalization(BatchNormalizationLayerWeight {
            gamma: &self.gamma,
            beta: &self.beta,
            running_mean: &self.running_mean,
            running_var: &self.running_var,
        })
    }

    mode_dependent_layer_trait!();
}
