use super::*;

/// Threshold for parallel computation (in number of elements)
/// For tensors with fewer elements, sequential computation is faster due to overhead
const ACTIVATION_PARALLEL_THRESHOLD: usize = 10_000;

/// Helper function to format the output shape for activation layers.
///
/// Returns a formatted string representing the shape of the cached tensor,
/// or "Unknown" if no tensor has been cached yet.
fn format_output_shape(cached_tensor: &Option<Tensor>) -> String {
    if let Some(tensor) = cached_tensor {
        format_batch_shape(&tensor.shape()[1..])
    } else {
        "Unknown".to_string()
    }
}

/// Rejects empty inputs and inputs containing NaN or infinite values
fn validate_activation_input(input: &Tensor) -> Result<(), ModelError> {
    if input.is_empty() {
        return Err(ModelError::InputValidationError(
            "Input tensor is empty".to_string(),
        ));
    }

    if input.iter().any(|&x| !x.is_finite()) {
        return Err(ModelError::InputValidationError(
            "Input tensor contains NaN or infinite values".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the upstream gradient matches the cached input and is finite
fn validate_activation_grad(grad_output: &Tensor, input: &Tensor) -> Result<(), ModelError> {
    if grad_output.shape() != input.shape() {
        return Err(ModelError::ProcessingError(format!(
            "Gradient output shape {:?} doesn't match input shape {:?}",
            grad_output.shape(),
            input.shape()
        )));
    }

    if grad_output.iter().any(|&x| !x.is_finite()) {
        return Err(ModelError::InputValidationError(
            "Gradient output contains NaN or infinite values".to_string(),
        ));
    }

    Ok(())
}

/// Applies `f` element-wise, in parallel for large tensors
fn map_elementwise(input: &Tensor, f: impl Fn(f32) -> f32 + Sync + Send) -> Tensor {
    let mut output = input.clone();
    if input.len() >= ACTIVATION_PARALLEL_THRESHOLD {
        output.par_mapv_inplace(f);
    } else {
        output.mapv_inplace(f);
    }
    output
}

/// Computes `grad_output * f'(input)` element-wise, in parallel for large tensors
fn chain_elementwise(
    grad_output: &Tensor,
    input: &Tensor,
    derivative: impl Fn(f32) -> f32 + Sync + Send,
) -> Tensor {
    let mut grad_input = grad_output.clone();
    if input.len() >= ACTIVATION_PARALLEL_THRESHOLD {
        Zip::from(&mut grad_input)
            .and(input)
            .par_for_each(|grad, &x| *grad *= derivative(x));
    } else {
        Zip::from(&mut grad_input)
            .and(input)
            .for_each(|grad, &x| *grad *= derivative(x));
    }
    grad_input
}

/// ELU (Exponential Linear Unit) activation layer
pub mod elu;
/// Linear (Identity) activation layer.
pub mod linear;
/// SELU (Scaled Exponential Linear Unit) activation layer
pub mod selu;
/// Softmax activation layer
pub mod softmax;

pub use elu::*;
pub use linear::*;
pub use selu::*;
pub use softmax::*;
