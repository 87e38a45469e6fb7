pub use crate::model_builder::{ActivationKind, LayerSpec, ModelConfig, ModelVariant};
pub use crate::neural_network::Tensor;
pub use crate::neural_network::callback::*;
pub use crate::neural_network::history::*;
pub use crate::neural_network::layer::activation_layer::*;
pub use crate::neural_network::layer::regularization_layer::*;
pub use crate::neural_network::layer::{Dense, Flatten, KernelInitializer};
pub use crate::neural_network::loss_function::*;
pub use crate::neural_network::neural_network_trait::{Layer, LossFunction, Optimizer};
pub use crate::neural_network::optimizer::*;
pub use crate::neural_network::sequential::*;
