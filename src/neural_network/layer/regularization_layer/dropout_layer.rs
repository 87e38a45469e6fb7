use super::*;

/// Threshold for using parallel computation in dropout layers.
/// When the total number of elements >= this threshold, parallel computation is used.
const DROPOUT_PARALLEL_THRESHOLD: usize = 10_000;

/// Draws a binary keep mask: 1.0 with probability `1 - rate`, 0.0 with probability `rate`
fn keep_mask(shape: IxDyn, rate: f32) -> Tensor {
    let mut mask = Tensor::random(shape, Uniform::new(0.0, 1.0));

    if mask.len() >= DROPOUT_PARALLEL_THRESHOLD {
        mask.par_mapv_inplace(|x| if x >= rate { 1.0 } else { 0.0 });
    } else {
        mask.mapv_inplace(|x| if x >= rate { 1.0 } else { 0.0 });
    }

    mask
}

/// Common backward pass for dropout layers: `grad_output * mask * scale`.
///
/// # Parameters
///
/// - `grad_output` - Gradient from the next layer
/// - `mask` - The keep mask applied during forward pass
/// - `training` - Whether the layer is in training mode
/// - `scale` - Factor the kept units were multiplied by in the forward pass
///
/// # Returns
///
/// * `Result<Tensor, ModelError>` - Gradient to pass to previous layer
fn dropout_backward(
    grad_output: &Tensor,
    mask: &Option<Tensor>,
    training: bool,
    scale: f32,
) -> Result<Tensor, ModelError> {
    if !training {
        // During inference the layer is the identity
        return Ok(grad_output.clone());
    }

    match mask {
        Some(mask) if mask.shape() == grad_output.shape() => Ok(grad_output * mask * scale),
        Some(mask) => Err(ModelError::ProcessingError(format!(
            "Gradient shape {:?} doesn't match dropout mask shape {:?}",
            grad_output.shape(),
            mask.shape()
        ))),
        // A zero rate never draws a mask
        None => Ok(grad_output * scale),
    }
}

/// Alpha dropout layer for self-normalizing networks
pub mod alpha_dropout;
/// Dropout layer for neural networks
pub mod dropout;

pub use alpha_dropout::*;
pub use dropout::*;
