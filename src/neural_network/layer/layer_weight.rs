use super::*;

/// Container for the weights of the layer types in this crate
///
/// Each variant borrows the parameters of one layer type. Layers without
/// parameters (activations, flatten, dropout) return `Empty`.
///
/// # Variants
///
/// - `Dense` - Contains weights for dense (fully connected) layers
/// - `BatchNormalization` - Contains scale, shift and running statistics of batch normalization layers
/// - `Empty` - Represents a layer with no parameters
pub enum LayerWeight<'a> {
    Dense(DenseLayerWeight<'a>),
    BatchNormalization(BatchNormalizationLayerWeight<'a>),
    Empty,
}

/// Weights for a dense (fully connected) neural network layer
///
/// # Fields
///
/// - `weight` - Weight matrix with shape (input_features, output_features)
/// - `bias` - Bias vector with shape (1, output_features)
pub struct DenseLayerWeight<'a> {
    pub weight: &'a Array2<f32>,
    pub bias: &'a Array2<f32>,
}

/// Weights for a batch normalization layer
///
/// # Fields
///
/// - `gamma` - Scale parameter, one entry per feature
/// - `beta` - Shift parameter, one entry per feature
/// - `running_mean` - Moving average of the batch means, used at inference
/// - `running_var` - Moving average of the batch variances, used at inference
pub struct BatchNormalizationLayerWeight<'a> {
    pub gamma: &'a Tensor,
    pub beta: &'a Tensor,
    pub running_mean: &'a Tensor,
    pub running_var: &'a Tensor,
}
