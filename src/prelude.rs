/// Prelude module for the dataset loaders.
#[cfg(feature = "dataset")]
pub mod dataset_prelude;
/// Prelude module for classification metrics.
#[cfg(feature = "neural_network")]
pub mod metric_prelude;
/// Prelude module for neural network layers, losses, optimizers and training.
#[cfg(feature = "neural_network")]
pub mod neural_network_prelude;
/// Prelude module for utility functions.
#[cfg(feature = "utility")]
pub mod utility_prelude;

#[cfg(feature = "dataset")]
pub use dataset_prelude::*;
#[cfg(feature = "neural_network")]
pub use metric_prelude::*;
#[cfg(feature = "neural_network")]
pub use neural_network_prelude::*;
#[cfg(feature = "utility")]
pub use utility_prelude::*;

pub use crate::error::{IoError, ModelError};
