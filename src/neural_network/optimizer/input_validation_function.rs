use crate::error::ModelError;

/// Checks a hyperparameter that must be a finite number above zero
/// (learning rate, epsilon).
pub(super) fn validate_positive(value: f32, param_name: &str) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ModelError::InputValidationError(format!(
        "{} must be positive and finite, got {}",
        param_name, value
    )))
}

/// Checks an exponential decay rate of the moment estimates, which must lie in `[0, 1)`.
pub(super) fn validate_decay_rate(value: f32, param_name: &str) -> Result<(), ModelError> {
    if (0.0..1.0).contains(&value) {
        return Ok(());
    }
    Err(ModelError::InputValidationError(format!(
        "{} must be in range [0, 1), got {}",
        param_name, value
    )))
}

/// Validates the hyperparameter set shared by the adaptive moment optimizers.
pub(super) fn validate_moment_hyperparameters(
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
) -> Result<(), ModelError> {
    validate_positive(learning_rate, "learning_rate")?;
    validate_decay_rate(beta1, "beta1")?;
    validate_decay_rate(beta2, "beta2")?;
    validate_positive(epsilon, "epsilon")
}
