use crate::error::ModelError;
use crate::neural_network::neural_network_trait::{Layer, Optimizer};
use input_validation_function::*;

/// Adam optimizer and the moment estimates shared with Nadam
pub mod adam;
/// Input validation functions for optimizers
mod input_validation_function;
/// Nadam (Nesterov-accelerated Adam) optimizer
pub mod nadam;
/// Stochastic Gradient Descent optimizer
pub mod sgd;

pub use adam::*;
pub use nadam::*;
pub use sgd::*;
