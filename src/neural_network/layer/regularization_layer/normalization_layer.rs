use super::*;

/// Common implementation for `update_parameters_sgd` method in normalization layers
macro_rules! normalization_layer_update_parameters_sgd {
    ($self:expr, $lr:expr) => {{
        if let Some(grad_gamma) = &$self.grad_gamma {
            $self.gamma.scaled_add(-$lr, grad_gamma);
        }
        if let Some(grad_beta) = &$self.grad_beta {
            $self.beta.scaled_add(-$lr, grad_beta);
        }
    }};
}

/// Common implementation for the adaptive moment updates (Adam and Nadam) in normalization layers.
///
/// `$update` names the `AdamStates` method computing the step, so both optimizers share
/// the moment buffers of the layer.
macro_rules! normalization_layer_update_parameters_adaptive {
    ($self:expr, $update:ident, $lr:expr, $beta1:expr, $beta2:expr, $epsilon:expr, $t:expr) => {{
        if let Some(grad_gamma) = &$self.grad_gamma {
            let states = $self
                .adam_gamma
                .get_or_insert_with(|| AdamStates::new($self.gamma.raw_dim()));
            let update = states.$update(grad_gamma, $beta1, $beta2, $epsilon, $t, $lr);
            $self.gamma -= &update;
        }

        if let Some(grad_beta) = &$self.grad_beta {
            let states = $self
                .adam_beta
                .get_or_insert_with(|| AdamStates::new($self.beta.raw_dim()));
            let update = states.$update(grad_beta, $beta1, $beta2, $epsilon, $t, $lr);
            $self.beta -= &update;
        }
    }};
}

/// Batch Normalization layer for neural networks
pub mod batch_normalization;

pub use batch_normalization::*;
