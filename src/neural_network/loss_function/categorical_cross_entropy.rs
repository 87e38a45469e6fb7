use crate::neural_network::{LossFunction, Tensor};

/// Predictions are clipped to `[CLIP_EPSILON, 1 - CLIP_EPSILON]` before taking logarithms
const CLIP_EPSILON: f32 = 1e-7;

/// Categorical Cross Entropy loss function for multi-class classification
///
/// Expects one-hot targets and class probabilities (softmax outputs) of shape
/// `(batch_size, num_classes)`. The loss is the mean over samples of
/// `-sum_k y_true[k] * ln(y_pred[k])`.
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::array;
///
/// let y_true = array![[0.0f32, 1.0], [1.0, 0.0]].into_dyn();
/// let y_pred = array![[0.5f32, 0.5], [0.5, 0.5]].into_dyn();
///
/// let loss = CategoricalCrossEntropy::new().compute_loss(&y_true, &y_pred);
/// assert!((loss - std::f32::consts::LN_2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    /// Creates a new instance of CategoricalCrossEntropy
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for CategoricalCrossEntropy {
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> f32 {
        // Ensure predictions are in a numerically stable range to avoid log(0) issues
        let y_pred_clipped = y_pred.mapv(|x| x.clamp(CLIP_EPSILON, 1.0 - CLIP_EPSILON));

        // -Σ[y_true * log(y_pred)], y_true one-hot encoded
        let losses = y_true * &y_pred_clipped.mapv(f32::ln);

        let n = y_true.shape()[0].max(1) as f32;
        -losses.sum() / n
    }

    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Tensor {
        let y_pred_clipped = y_pred.mapv(|x| x.clamp(CLIP_EPSILON, 1.0 - CLIP_EPSILON));

        // Multi-class cross entropy gradient is -y_true / y_pred, averaged over samples
        let grad = -y_true / &y_pred_clipped;

        let n = y_true.shape()[0].max(1) as f32;
        grad / n
    }

    fn name(&self) -> &str {
        "categorical_crossentropy"
    }
}
