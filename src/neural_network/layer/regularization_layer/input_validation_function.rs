use crate::error::ModelError;

/// Validates that a rate parameter is in the range [0, 1)
pub(super) fn validate_rate_exclusive(rate: f32, param_name: &str) -> Result<(), ModelError> {
    if !(0.0..1.0).contains(&rate) {
        return Err(ModelError::InputValidationError(format!(
            "{} must be in range [0, 1), got {}",
            param_name, rate
        )));
    }
    Ok(())
}

/// Validates that the feature dimensions of an input match the expected ones.
///
/// The batch axis (axis 0) is free, so training batches, the last partial batch
/// and whole evaluation splits all pass through the same layer.
pub(super) fn validate_feature_shape(
    input_shape: &[usize],
    expected_features: &[usize],
    layer_name: &str,
) -> Result<(), ModelError> {
    if input_shape.is_empty() || input_shape[1..] != *expected_features {
        return Err(ModelError::InputValidationError(format!(
            "{} expects input of shape (batch_size, {:?}), got {:?}",
            layer_name, expected_features, input_shape
        )));
    }
    Ok(())
}

/// Validates that epsilon is positive and finite
pub(super) fn validate_epsilon(epsilon: f32) -> Result<(), ModelError> {
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "Epsilon must be positive and finite, got {}",
            epsilon
        )));
    }
    Ok(())
}

/// Validates that momentum is between 0.0 and 1.0 (inclusive)
pub(super) fn validate_momentum(momentum: f32) -> Result<(), ModelError> {
    if !(0.0..=1.0).contains(&momentum) {
        return Err(ModelError::InputValidationError(format!(
            "Momentum must be between 0.0 and 1.0, got {}",
            momentum
        )));
    }
    Ok(())
}

/// Validates that the per-sample feature shape is non-empty and has no zero dimension
pub(super) fn validate_feature_shape_not_empty(feature_shape: &[usize]) -> Result<(), ModelError> {
    if feature_shape.is_empty() || feature_shape.contains(&0) {
        return Err(ModelError::InputValidationError(format!(
            "Feature shape must be non-empty without zero dimensions, got {:?}",
            feature_shape
        )));
    }
    Ok(())
}
