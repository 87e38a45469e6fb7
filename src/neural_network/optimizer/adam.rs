use super::*;
use ndarray::{Array, Dimension, Zip};

/// Default first moment decay rate
pub const DEFAULT_BETA1: f32 = 0.9;
/// Default second moment decay rate
pub const DEFAULT_BETA2: f32 = 0.999;
/// Default numerical stability constant
pub const DEFAULT_EPSILON: f32 = 1e-7;
/// Default learning rate for the adaptive optimizers
pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;

/// Adam optimizer implementation.
///
/// An optimization algorithm that computes individual adaptive learning
/// rates for different parameters from estimates of first and second moments
/// of the gradients.
///
/// # Fields
///
/// - `learning_rate` - Learning rate controlling the size of parameter updates
/// - `beta1` - Exponential decay rate for the first moment estimates
/// - `beta2` - Exponential decay rate for the second moment estimates
/// - `epsilon` - Small constant added for numerical stability
/// - `t` - Current timestep, incremented once per mini-batch
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
}

impl Adam {
    /// Creates a new Adam optimizer with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Decay rate for the first moment estimates (typically 0.9)
    /// - `beta2` - Decay rate for the second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-7)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Adam optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If any parameter is out of range
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_moment_hyperparameters(learning_rate, beta1, beta2, epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            t: 0,
        })
    }

    /// Number of mini-batch steps taken so far
    pub fn iterations(&self) -> u64 {
        self.t
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn update(&mut self, layer: &mut dyn Layer) {
        layer.update_parameters_adam(
            self.learning_rate,
            self.beta1,
            self.beta2,
            self.epsilon,
            self.t,
        );
    }

    fn step(&mut self) {
        self.t += 1;
    }

    fn name(&self) -> &str {
        "Adam"
    }
}

/// Stores and manages the moment estimates of one parameter array for Adam and Nadam.
///
/// # Fields
///
/// - `m` - First moment (moving average of gradients)
/// - `v` - Second moment (moving average of squared gradients)
#[derive(Debug, Clone)]
pub struct AdamStates<D: Dimension> {
    pub m: Array<f32, D>,
    pub v: Array<f32, D>,
}

impl<D: Dimension> AdamStates<D> {
    /// Creates zero-initialized moment estimates of the given shape
    pub fn new(dim: D) -> Self {
        Self {
            m: Array::zeros(dim.clone()),
            v: Array::zeros(dim),
        }
    }

    /// Helper function: Update Adam state variables
    ///
    /// - Updates `m` in-place: m = beta1*m + (1-beta1)*g
    /// - Updates `v` in-place: v = beta2*v + (1-beta2)*g^2
    fn update_moments(&mut self, grad: &Array<f32, D>, beta1: f32, beta2: f32) {
        let (m, v) = (&mut self.m, &mut self.v);
        rayon::join(
            || {
                Zip::from(m)
                    .and(grad)
                    .for_each(|m, &g| *m = beta1 * *m + (1.0 - beta1) * g)
            },
            || {
                Zip::from(v)
                    .and(grad)
                    .for_each(|v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g)
            },
        );
    }

    /// Updates the moments and returns the Adam step to subtract from the parameter.
    ///
    /// # Parameters
    ///
    /// - `grad` - Gradient of the parameter
    /// - `beta1` - Exponential decay rate for first moment estimates
    /// - `beta2` - Exponential decay rate for second moment estimates
    /// - `epsilon` - Small constant added for numerical stability
    /// - `t` - Current timestep, starting at 1
    /// - `lr` - Learning rate
    ///
    /// # Returns
    ///
    /// * `Array<f32, D>` - `lr * m_hat / (sqrt(v_hat) + epsilon)`
    pub fn update_parameter(
        &mut self,
        grad: &Array<f32, D>,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        t: u64,
        lr: f32,
    ) -> Array<f32, D> {
        self.update_moments(grad, beta1, beta2);

        let t = t.max(1) as i32;
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction2 = 1.0 - beta2.powi(t);

        let mut update = Array::zeros(self.m.raw_dim());
        Zip::from(&mut update)
            .and(&self.m)
            .and(&self.v)
            .par_for_each(|u, &m, &v| {
                let m_hat = m / bias_correction1;
                let v_hat = v / bias_correction2;
                *u = lr * m_hat / (v_hat.sqrt() + epsilon);
            });
        update
    }

    /// Updates the moments and returns the Nadam step to subtract from the parameter.
    ///
    /// The first moment is corrected with Nesterov look-ahead:
    /// `m_hat = beta1 * m / (1 - beta1^(t+1)) + (1 - beta1) * g / (1 - beta1^t)`.
    ///
    /// # Returns
    ///
    /// * `Array<f32, D>` - `lr * m_hat / (sqrt(v_hat) + epsilon)`
    pub fn update_parameter_nadam(
        &mut self,
        grad: &Array<f32, D>,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        t: u64,
        lr: f32,
    ) -> Array<f32, D> {
        self.update_moments(grad, beta1, beta2);

        let t = t.max(1) as i32;
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction1_next = 1.0 - beta1.powi(t + 1);
        let bias_correction2 = 1.0 - beta2.powi(t);

        let mut update = Array::zeros(self.m.raw_dim());
        Zip::from(&mut update)
            .and(&self.m)
            .and(&self.v)
            .and(grad)
            .par_for_each(|u, &m, &v, &g| {
                let m_hat =
                    beta1 * m / bias_correction1_next + (1.0 - beta1) * g / bias_correction1;
                let v_hat = v / bias_correction2;
                *u = lr * m_hat / (v_hat.sqrt() + epsilon);
            });
        update
    }
}
