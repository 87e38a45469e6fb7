use super::*;
use crate::{Deserialize, Serialize};
use rand_distr::{Distribution, Normal};

/// Standard deviation of a unit normal truncated at two standard deviations,
/// used to rescale truncated-normal initializers back to the target variance
const TRUNCATED_NORMAL_STDDEV: f32 = 0.879_625_66;

/// Scheme used to draw the initial kernel of a `Dense` layer.
///
/// Biases always start at zero. `fan_in` is the number of input units and `fan_out`
/// the number of output units of the layer.
///
/// # Variants
///
/// - `HeUniform` - Uniform in `[-limit, limit]` with `limit = sqrt(6 / fan_in)`, suited to ReLU/ELU
/// - `HeNormal` - Truncated normal with standard deviation `sqrt(2 / fan_in)`
/// - `LecunNormal` - Truncated normal with standard deviation `sqrt(1 / fan_in)`, required for self-normalizing SELU networks
/// - `GlorotUniform` - Uniform in `[-limit, limit]` with `limit = sqrt(6 / (fan_in + fan_out))`, suited to softmax/linear outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KernelInitializer {
    HeUniform,
    HeNormal,
    LecunNormal,
    #[default]
    GlorotUniform,
}

impl KernelInitializer {
    /// Draws a kernel of shape `(fan_in, fan_out)`.
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f32>)` - The initialized kernel
    /// - `Err(ModelError::InputValidationError)` - If either dimension is zero
    pub fn initialize(&self, fan_in: usize, fan_out: usize) -> Result<Array2<f32>, ModelError> {
        if fan_in == 0 || fan_out == 0 {
            return Err(ModelError::InputValidationError(format!(
                "Kernel dimensions must be positive, got ({}, {})",
                fan_in, fan_out
            )));
        }

        let fan_in_f = fan_in as f32;
        let fan_out_f = fan_out as f32;

        match self {
            KernelInitializer::HeUniform => {
                let limit = (6.0 / fan_in_f).sqrt();
                Ok(Array2::random(
                    (fan_in, fan_out),
                    Uniform::new(-limit, limit),
                ))
            }
            KernelInitializer::GlorotUniform => {
                let limit = (6.0 / (fan_in_f + fan_out_f)).sqrt();
                Ok(Array2::random(
                    (fan_in, fan_out),
                    Uniform::new(-limit, limit),
                ))
            }
            KernelInitializer::HeNormal => {
                truncated_normal((fan_in, fan_out), (2.0 / fan_in_f).sqrt())
            }
            KernelInitializer::LecunNormal => {
                truncated_normal((fan_in, fan_out), (1.0 / fan_in_f).sqrt())
            }
        }
    }

    /// Name used in summaries and logs
    pub fn name(&self) -> &'static str {
        match self {
            KernelInitializer::HeUniform => "he_uniform",
            KernelInitializer::HeNormal => "he_normal",
            KernelInitializer::LecunNormal => "lecun_normal",
            KernelInitializer::GlorotUniform => "glorot_uniform",
        }
    }
}

/// Samples a normal distribution truncated at two standard deviations.
///
/// Out-of-range draws are resampled. The sampling standard deviation is divided by
/// `TRUNCATED_NORMAL_STDDEV` so the truncated samples keep a standard deviation of `stddev`.
fn truncated_normal(shape: (usize, usize), stddev: f32) -> Result<Array2<f32>, ModelError> {
    let sample_std = stddev / TRUNCATED_NORMAL_STDDEV;
    let normal = Normal::new(0.0f32, sample_std)
        .map_err(|e| ModelError::ProcessingError(format!("Invalid normal distribution: {}", e)))?;
    let bound = 2.0 * sample_std;
    let mut rng = rand::rng();

    Ok(Array2::from_shape_simple_fn(shape, || {
        loop {
            let v = normal.sample(&mut rng);
            if v.abs() <= bound {
                break v;
            }
        }
    }))
}
