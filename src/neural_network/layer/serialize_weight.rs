use super::*;
use crate::{Deserialize, Serialize};

/// Serializable weight container for all supported layer types.
///
/// Used for saving models to JSON and for in-memory weight snapshots taken by
/// early stopping.
///
/// # Variants
///
/// - `Dense` - Weights for a Dense layer
/// - `BatchNormalization` - Weights and running statistics for a BatchNormalization layer
/// - `Empty` - No weights for layers without parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SerializableLayerWeight {
    Dense(SerializableDenseWeight),
    BatchNormalization(SerializableBatchNormalizationWeight),
    Empty,
}

impl SerializableLayerWeight {
    /// Converts a `LayerWeight` reference into an owned serializable weight.
    ///
    /// # Parameters
    ///
    /// - `weight` - Layer weights to convert into a serializable form
    ///
    /// # Returns
    ///
    /// - `SerializableLayerWeight` - Serializable representation of the provided weights
    pub fn from_layer_weight(weight: &LayerWeight) -> Self {
        match weight {
            LayerWeight::Empty => SerializableLayerWeight::Empty,

            LayerWeight::Dense(w) => SerializableLayerWeight::Dense(SerializableDenseWeight {
                weight: w.weight.outer_iter().map(|row| row.to_vec()).collect(),
                bias: w.bias.outer_iter().map(|row| row.to_vec()).collect(),
            }),
            LayerWeight::BatchNormalization(w) => {
                SerializableLayerWeight::BatchNormalization(SerializableBatchNormalizationWeight {
                    gamma: w.gamma.iter().cloned().collect(),
                    beta: w.beta.iter().cloned().collect(),
                    running_mean: w.running_mean.iter().cloned().collect(),
                    running_var: w.running_var.iter().cloned().collect(),
                    shape: w.gamma.shape().to_vec(),
                })
            }
        }
    }

    /// Name of the layer type these weights belong to
    pub fn kind(&self) -> &'static str {
        match self {
            SerializableLayerWeight::Dense(_) => "Dense",
            SerializableLayerWeight::BatchNormalization(_) => "BatchNormalization",
            SerializableLayerWeight::Empty => "Empty",
        }
    }
}

/// Type and output shape of a saved layer, checked against the target model on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerInfo {
    pub layer_type: String,
    pub output_shape: String,
}

/// One entry of a saved model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableLayer {
    pub info: LayerInfo,
    pub weights: SerializableLayerWeight,
}

/// On-disk form of a `Sequential` model: its layers in stack order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableSequential {
    pub layers: Vec<SerializableLayer>,
}

/// Downcasts `$layer_any` to `$layer_type<A>` for every activation `A` a dense layer
/// can carry, applying `$weight` on the first match. Evaluates to whether one matched.
macro_rules! try_apply_with_activations {
    ($layer_any:expr, $weight:expr, $layer_type:ident) => {{
        if let Some(layer) = $layer_any.downcast_mut::<$layer_type<ELU>>() {
            $weight.apply_to_layer(layer)?;
            true
        } else if let Some(layer) = $layer_any.downcast_mut::<$layer_type<SELU>>() {
            $weight.apply_to_layer(layer)?;
            true
        } else if let Some(layer) = $layer_any.downcast_mut::<$layer_type<Softmax>>() {
            $weight.apply_to_layer(layer)?;
            true
        } else if let Some(layer) = $layer_any.downcast_mut::<$layer_type<Linear>>() {
            $weight.apply_to_layer(layer)?;
            true
        } else {
            false
        }
    }};
}

/// Restores `weights` into `layer`, whatever concrete layer type sits behind the trait object.
///
/// `layer_type` only feeds the error message.
///
/// # Errors
///
/// - `IoError::StdIoError` - If the weights belong to another layer type or their shapes differ
pub fn apply_weights_to_layer(
    layer: &mut dyn Layer,
    weights: &SerializableLayerWeight,
    layer_type: &str,
) -> Result<(), IoError> {
    use std::any::Any;
    let layer_any: &mut dyn Any = layer;

    let applied = match weights {
        SerializableLayerWeight::Empty => true,

        SerializableLayerWeight::Dense(w) => try_apply_with_activations!(layer_any, w, Dense),
        SerializableLayerWeight::BatchNormalization(w) => {
            if let Some(layer) = layer_any.downcast_mut::<BatchNormalization>() {
                w.apply_to_layer(layer)?;
                true
            } else {
                false
            }
        }
    };

    if !applied {
        return Err(IoError::invalid_data(format!(
            "Expected {} layer but got {}",
            weights.kind(),
            layer_type
        )));
    }

    Ok(())
}

mod helper_function;
/// Serializable representation of a BatchNormalization layer's weights
pub mod serializable_batch_normalization_weight;
/// Serializable representation of a Dense layer's weights
pub mod serializable_dense_weight;

use helper_function::*;
pub use serializable_batch_normalization_weight::*;
pub use serializable_dense_weight::*;
