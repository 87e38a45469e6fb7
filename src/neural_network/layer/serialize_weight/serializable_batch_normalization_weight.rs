use super::*;

/// Serializable representation of BatchNormalization layer weights.
///
/// # Fields
///
/// - `gamma` - Scale parameter values flattened into a vector
/// - `beta` - Shift parameter values flattened into a vector
/// - `running_mean` - Running mean values flattened into a vector
/// - `running_var` - Running variance values flattened into a vector
/// - `shape` - Original parameter shape used to rebuild arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableBatchNormalizationWeight {
    pub gamma: Vec<f32>,
    pub beta: Vec<f32>,
    pub running_mean: Vec<f32>,
    pub running_var: Vec<f32>,
    pub shape: Vec<usize>,
}

impl ApplyWeights<BatchNormalization> for SerializableBatchNormalizationWeight {
    fn apply_to_layer(&self, layer: &mut BatchNormalization) -> Result<(), IoError> {
        let gamma = vec_to_tensor(&self.shape, &self.gamma)?;
        let beta = vec_to_tensor(&self.shape, &self.beta)?;
        let running_mean = vec_to_tensor(&self.shape, &self.running_mean)?;
        let running_var = vec_to_tensor(&self.shape, &self.running_var)?;
        layer
            .set_weights(gamma, beta, running_mean, running_var)
            .map_err(|e| IoError::invalid_data(e.to_string()))
    }
}
