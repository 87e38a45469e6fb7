pub use crate::error::{IoError, ModelError};
pub use crate::neural_network::Tensor;
pub use crate::neural_network::neural_network_trait::{ActivationLayer, ApplyWeights, Layer};
use crate::neural_network::optimizer::AdamStates;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Ix2, IxDyn, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rayon::prelude::*;

/// Parameter count reported by a layer, split by whether the optimizer touches it.
///
/// # Variants
///
/// - `Trainable` - Parameters updated by the optimizer (weights, biases, gamma, beta)
/// - `NonTrainable` - Parameters stored in the layer but never updated by the optimizer
/// - `Mixed` - Both kinds, as in batch normalization (gamma/beta and running statistics)
/// - `NoTrainable` - The layer stores no parameters at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingParameters {
    Trainable(usize),
    NonTrainable(usize),
    Mixed { trainable: usize, non_trainable: usize },
    NoTrainable,
}

impl TrainingParameters {
    /// Number of trainable parameters
    pub fn trainable(&self) -> usize {
        match self {
            TrainingParameters::Trainable(n) => *n,
            TrainingParameters::Mixed { trainable, .. } => *trainable,
            _ => 0,
        }
    }

    /// Number of non-trainable parameters
    pub fn non_trainable(&self) -> usize {
        match self {
            TrainingParameters::NonTrainable(n) => *n,
            TrainingParameters::Mixed { non_trainable, .. } => *non_trainable,
            _ => 0,
        }
    }

    /// Total number of stored parameters
    pub fn total(&self) -> usize {
        self.trainable() + self.non_trainable()
    }
}

/// Implements the parameter related `Layer` methods for layers without parameters.
macro_rules! no_trainable_parameters_layer_functions {
    () => {
        fn param_count(&self) -> TrainingParameters {
            TrainingParameters::NoTrainable
        }

        fn update_parameters_sgd(&mut self, _lr: f32) {}

        fn update_parameters_adam(
            &mut self,
            _lr: f32,
            _beta1: f32,
            _beta2: f32,
            _epsilon: f32,
            _t: u64,
        ) {
        }

        fn update_parameters_nadam(
            &mut self,
            _lr: f32,
            _beta1: f32,
            _beta2: f32,
            _epsilon: f32,
            _t: u64,
        ) {
        }

        fn get_weights(&self) -> LayerWeight<'_> {
            LayerWeight::Empty
        }
    };
}

/// Formats a shape as `(None, d1, d2, ...)`, leaving the batch axis open
fn format_batch_shape(feature_shape: &[usize]) -> String {
    let dims = std::iter::once("None".to_string())
        .chain(feature_shape.iter().map(|d| d.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", dims)
}

/// Activation layers (ELU, SELU, Softmax, Linear)
pub mod activation_layer;
/// Fully connected layer
pub mod dense;
/// Flatten layer for turning image batches into feature matrices
pub mod flatten;
/// Weight initialization schemes for dense kernels
pub mod kernel_initializer;
/// Borrowed views of layer weights
pub mod layer_weight;
/// Regularization layers (dropout, alpha dropout, batch normalization)
pub mod regularization_layer;
/// Owned, serde-serializable layer weights
pub mod serialize_weight;

pub use activation_layer::*;
pub use dense::*;
pub use flatten::*;
pub use kernel_initializer::*;
pub use layer_weight::*;
pub use regularization_layer::*;
pub use serialize_weight::*;
