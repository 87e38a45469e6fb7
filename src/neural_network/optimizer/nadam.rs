use super::*;

/// Nadam optimizer: Adam with Nesterov momentum.
///
/// Uses the same moment estimates as Adam but applies the first-moment correction
/// one step ahead, which typically converges faster on deep networks. It is the
/// optimizer every CIFAR-10 variant is trained with.
///
/// # Fields
///
/// - `learning_rate` - Learning rate controlling the size of parameter updates
/// - `beta1` - Exponential decay rate for the first moment estimates
/// - `beta2` - Exponential decay rate for the second moment estimates
/// - `epsilon` - Small constant added for numerical stability
/// - `t` - Current timestep, incremented once per mini-batch
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
///
/// let nadam = Nadam::with_learning_rate(5e-5).unwrap();
/// assert_eq!(nadam.learning_rate(), 5e-5);
/// assert!(Nadam::with_learning_rate(-1.0).is_err());
/// ```
pub struct Nadam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
}

impl Nadam {
    /// Creates a new Nadam optimizer with the specified parameters.
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
    /// - `Ok(Self)` - A new Nadam optimizer instance
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

    /// Creates a Nadam optimizer with default decay rates and epsilon.
    pub fn with_learning_rate(learning_rate: f32) -> Result<Self, ModelError> {
        Self::new(learning_rate, DEFAULT_BETA1, DEFAULT_BETA2, DEFAULT_EPSILON)
    }

    /// The learning rate
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Number of mini-batch steps taken so far
    pub fn iterations(&self) -> u64 {
        self.t
    }
}

impl Default for Nadam {
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

impl Optimizer for Nadam {
    fn update(&mut self, layer: &mut dyn Layer) {
        layer.update_parameters_nadam(
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
        "Nadam"
    }
}
