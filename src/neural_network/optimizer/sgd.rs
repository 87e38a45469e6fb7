use super::*;

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// A simple optimization algorithm that updates parameters in the direction
/// of the negative gradient, scaled by the learning rate.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new SGD optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If the learning rate is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_positive(learning_rate, "learning_rate")?;
        Ok(Self { learning_rate })
    }

    /// The learning rate
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Optimizer for SGD {
    fn update(&mut self, layer: &mut dyn Layer) {
        // Directly call the layer's parameter update method
        layer.update_parameters_sgd(self.learning_rate);
    }

    fn name(&self) -> &str {
        "SGD"
    }
}
