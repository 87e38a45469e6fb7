use super::*;

/// Kernel `(input_dim, output_dim)` and bias `(1, output_dim)` of a dense layer, row by row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableDenseWeight {
    pub weight: Vec<Vec<f32>>,
    pub bias: Vec<Vec<f32>>,
}

impl<T: ActivationLayer> ApplyWeights<Dense<T>> for SerializableDenseWeight {
    fn apply_to_layer(&self, layer: &mut Dense<T>) -> Result<(), IoError> {
        layer
            .set_weights(vec2_to_array2(&self.weight)?, vec2_to_array2(&self.bias)?)
            .map_err(|e| IoError::invalid_data(e.to_string()))
    }
}
