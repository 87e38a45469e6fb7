use crate::error::{IoError, ModelError};
use crate::neural_network::Tensor;
use crate::neural_network::layer::TrainingParameters;
use crate::neural_network::layer::layer_weight::LayerWeight;

/// A layer of a `Sequential` model.
///
/// `forward` caches whatever `backward` needs, so every `backward` call must follow
/// a `forward` call on the same batch. Gradients computed by `backward` are kept in
/// the layer until one of the `update_parameters_*` methods consumes them.
pub trait Layer: std::any::Any + Send + Sync {
    /// Maps a batch `(batch, features...)` to the layer output.
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// Takes the gradient of the loss with respect to the layer output and returns
    /// the gradient with respect to the layer input.
    ///
    /// # Errors
    ///
    /// - `ModelError::ProcessingError` - If no forward pass was cached or the shapes disagree
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError>;

    /// Type name shown in the model summary, e.g. "Dense"
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Output shape with a `None` batch axis, e.g. "(None, 100)"
    fn output_shape(&self) -> String {
        "Unknown".to_string()
    }

    /// Number of trainable and non-trainable scalars held by the layer
    fn param_count(&self) -> TrainingParameters;

    /// Plain gradient step `p -= lr * g`
    fn update_parameters_sgd(&mut self, _lr: f32);

    /// Adam step; `_t` is the 1-based step count used for bias correction
    fn update_parameters_adam(
        &mut self,
        _lr: f32,
        _beta1: f32,
        _beta2: f32,
        _epsilon: f32,
        _t: u64,
    );

    /// Nadam step; the first moment gets a Nesterov look-ahead before bias correction
    fn update_parameters_nadam(
        &mut self,
        _lr: f32,
        _beta1: f32,
        _beta2: f32,
        _epsilon: f32,
        _t: u64,
    );

    /// Borrows the layer parameters, `LayerWeight::Empty` for parameter-free layers
    fn get_weights(&self) -> LayerWeight<'_>;

    /// Switches dropout and batch normalization between training and inference behavior.
    /// Other layers ignore it.
    fn set_training_if_mode_dependent(&mut self, _is_training: bool) {}
}

/// Training objective of a compiled model
pub trait LossFunction {
    /// Loss of a batch, averaged over its samples
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> f32;

    /// Gradient of `compute_loss` with respect to `y_pred`, same shape as `y_pred`
    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Tensor;

    /// Name shown in summaries and logs
    fn name(&self) -> &str {
        "loss"
    }
}

/// Parameter update rule applied to every layer after each mini-batch
pub trait Optimizer {
    /// Applies one update to `layer` using the gradients its last `backward` stored
    fn update(&mut self, layer: &mut dyn Layer);

    /// Advances the step counter once per mini-batch, before any layer is updated.
    ///
    /// Adaptive optimizers use the counter for bias correction, so every layer of
    /// one batch must see the same step.
    fn step(&mut self) {}

    /// Name shown in summaries and logs
    fn name(&self) -> &str {
        "optimizer"
    }
}

/// Writes a serialized weight snapshot back into a layer of type `L`.
///
/// Shared by `Sequential::load_from_path` and the best-weights restore of early stopping.
pub trait ApplyWeights<L> {
    /// # Errors
    ///
    /// - `IoError::StdIoError` - If a stored array does not match the layer's shapes
    fn apply_to_layer(&self, layer: &mut L) -> Result<(), IoError>;
}

/// A marker trait for activation layers in neural networks.
///
/// Activation layers apply element-wise non-linear transformations, have no trainable
/// parameters and preserve the shape of their input. Any activation layer can be plugged
/// into a `Dense` layer as its activation.
pub trait ActivationLayer: Layer {}
