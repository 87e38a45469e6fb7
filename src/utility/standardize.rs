use crate::error::ModelError;
use crate::neural_network::Tensor;
use ndarray::{Array1, Axis, IxDyn};
use rayon::prelude::*;

/// Standard deviations below this value are treated as 1.0
const MIN_STD: f32 = 1e-7;

/// Standardizes features to zero mean and unit variance.
///
/// The statistics are computed once on the training split with `fit` and then
/// applied unchanged to every split with `transform`, so validation data is scaled
/// with the training distribution. Every axis after the first (sample) axis is a
/// feature: an image tensor `(n, 32, 32, 3)` has 3072 features.
///
/// # Fields
///
/// - `mean` - Per-feature mean of the fitted data
/// - `std` - Per-feature standard deviation of the fitted data (zero replaced by 1.0)
/// - `sample_shape` - Shape of one sample the scaler was fitted on
///
/// # Example
/// ```rust
/// use cifar_dnn::utility::standardize::Standardizer;
/// use ndarray::array;
///
/// let x = array![[1.0f32, 10.0], [3.0, 10.0]].into_dyn();
/// let scaler = Standardizer::fit(&x).unwrap();
/// let scaled = scaler.transform(&x).unwrap();
/// assert_eq!(scaled[[0, 0]], -1.0);
/// assert_eq!(scaled[[0, 1]], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Standardizer {
    mean: Array1<f32>,
    std: Array1<f32>,
    sample_shape: Vec<usize>,
}

impl Standardizer {
    /// Computes per-feature mean and standard deviation.
    ///
    /// # Parameters
    ///
    /// * `x` - Tensor whose first axis indexes samples
    ///
    /// # Returns
    ///
    /// - `Ok(Standardizer)` - The fitted scaler
    /// - `Err(ModelError::InputValidationError)` - If `x` has no samples or no feature axis
    pub fn fit(x: &Tensor) -> Result<Self, ModelError> {
        if x.ndim() < 2 || x.shape()[0] == 0 {
            return Err(ModelError::InputValidationError(format!(
                "Standardizer needs at least one sample and one feature axis, got shape {:?}",
                x.shape()
            )));
        }

        let sample_shape = x.shape()[1..].to_vec();
        let x_2d = flatten_samples(x)?;

        let stats: Vec<(f32, f32)> = x_2d
            .axis_iter(Axis(1))
            .into_par_iter()
            .map(|col| {
                let mean = col.mean().unwrap_or(0.0);
                let var = col.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>()
                    / col.len() as f32;
                let std = var.sqrt();
                (mean, if std < MIN_STD { 1.0 } else { std })
            })
            .collect();

        Ok(Self {
            mean: stats.iter().map(|&(m, _)| m).collect(),
            std: stats.iter().map(|&(_, s)| s).collect(),
            sample_shape,
        })
    }

    /// Applies the fitted scaling, returning a tensor of the same shape as `x`.
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Standardized data
    /// - `Err(ModelError::InputValidationError)` - If the sample shape differs from the fitted one
    pub fn transform(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        if x.ndim() < 2 || x.shape()[1..] != self.sample_shape[..] {
            return Err(ModelError::InputValidationError(format!(
                "Standardizer was fitted on samples of shape {:?}, got tensor of shape {:?}",
                self.sample_shape,
                x.shape()
            )));
        }

        let mut x_2d = flatten_samples(x)?;
        x_2d.axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut row| {
                row.iter_mut()
                    .zip(self.mean.iter().zip(self.std.iter()))
                    .for_each(|(v, (&m, &s))| *v = (*v - m) / s);
            });

        x_2d.into_shape_with_order(IxDyn(x.shape()))
            .map_err(|e| ModelError::ProcessingError(e.to_string()))
    }

    /// Per-feature means
    pub fn mean(&self) -> &Array1<f32> {
        &self.mean
    }

    /// Per-feature standard deviations
    pub fn std(&self) -> &Array1<f32> {
        &self.std
    }
}

/// Reshapes `(n, d1, d2, ...)` into an owned standard-layout `(n, d1 * d2 * ...)` matrix
fn flatten_samples(x: &Tensor) -> Result<ndarray::Array2<f32>, ModelError> {
    let n_samples = x.shape()[0];
    let n_features: usize = x.shape()[1..].iter().product();
    x.as_standard_layout()
        .into_owned()
        .into_shape_with_order((n_samples, n_features))
        .map_err(|e| ModelError::ProcessingError(e.to_string()))
}
