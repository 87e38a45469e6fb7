use crate::error::ModelError;
use crate::neural_network::*;
use crate::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Rate of the alpha dropout layer placed before the head of the dropout variant
pub const ALPHA_DROPOUT_RATE: f32 = 0.1;

/// Number of batch normalization layers the partial variant interleaves with its last dense layers
const PARTIAL_BATCH_NORM_LAYERS: usize = 3;

/// Activation applied by a dense layer.
///
/// # Variants
///
/// - `Elu` - Exponential linear unit with alpha 1.0
/// - `Selu` - Scaled exponential linear unit, for self-normalizing networks
/// - `Softmax` - Row-wise softmax, for the classification head
/// - `Linear` - Identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Elu,
    Selu,
    Softmax,
    Linear,
}

/// Declarative description of one layer.
///
/// Shapes are not stored: `ModelConfig` threads the running feature width from one
/// layer to the next when it validates or builds.
///
/// # Variants
///
/// - `Flatten` - Flattens each sample into a vector
/// - `Dense` - Fully connected layer with `units` outputs, an activation and a kernel initializer
/// - `BatchNormalization` - Batch normalization with default momentum and epsilon
/// - `AlphaDropout` - Alpha dropout with the given rate
/// - `Dropout` - Inverted dropout with the given rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    Flatten,
    Dense {
        units: usize,
        activation: ActivationKind,
        initializer: KernelInitializer,
    },
    BatchNormalization,
    AlphaDropout {
        rate: f32,
    },
    Dropout {
        rate: f32,
    },
}

impl LayerSpec {
    /// Type name of the layer this spec builds, as reported by `Layer::layer_type`
    pub fn layer_type(&self) -> &'static str {
        match self {
            LayerSpec::Flatten => "Flatten",
            LayerSpec::Dense { .. } => "Dense",
            LayerSpec::BatchNormalization => "BatchNormalization",
            LayerSpec::AlphaDropout { .. } => "AlphaDropout",
            LayerSpec::Dropout { .. } => "Dropout",
        }
    }

    fn hidden_dense(units: usize, activation: ActivationKind, initializer: KernelInitializer) -> Self {
        LayerSpec::Dense {
            units,
            activation,
            initializer,
        }
    }

    fn softmax_head(num_classes: usize) -> Self {
        LayerSpec::Dense {
            units: num_classes,
            activation: ActivationKind::Softmax,
            initializer: KernelInitializer::GlorotUniform,
        }
    }
}

/// The four network variants trained on CIFAR-10.
///
/// # Variants
///
/// - `PlainDeep` - Deep ELU network with He uniform initialization
/// - `PartialBatchNorm` - Same network with batch normalization around its last three dense layers
/// - `SelfNormalizing` - SELU network with LeCun normal initialization behind an input batch normalization
/// - `SelfNormalizingDropout` - SELU network regularized with alpha dropout before the head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    PlainDeep,
    PartialBatchNorm,
    SelfNormalizing,
    SelfNormalizingDropout,
}

impl ModelVariant {
    /// Every variant, in the order they are run
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::PlainDeep,
        ModelVariant::PartialBatchNorm,
        ModelVariant::SelfNormalizing,
        ModelVariant::SelfNormalizingDropout,
    ];

    /// Name used on the command line, in config files and in report file names
    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::PlainDeep => "plain_deep",
            ModelVariant::PartialBatchNorm => "partial_batch_norm",
            ModelVariant::SelfNormalizing => "self_normalizing",
            ModelVariant::SelfNormalizingDropout => "self_normalizing_dropout",
        }
    }

    /// Number of layers besides the hidden dense layers (flatten, head, normalization, dropout)
    pub fn extra_layers(&self) -> usize {
        match self {
            ModelVariant::PlainDeep => 2,
            ModelVariant::PartialBatchNorm => 2 + PARTIAL_BATCH_NORM_LAYERS,
            ModelVariant::SelfNormalizing => 3,
            ModelVariant::SelfNormalizingDropout => 3,
        }
    }

    /// Smallest hidden layer count the variant can be built with
    pub fn min_hidden_layers(&self) -> usize {
        match self {
            ModelVariant::PartialBatchNorm => PARTIAL_BATCH_NORM_LAYERS - 1,
            _ => 1,
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelVariant {
    type Err = ModelError;

    /// Parses a variant name; `-` and `_` are interchangeable and case is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ModelVariant::ALL
            .into_iter()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| {
                ModelError::InputValidationError(format!(
                    "Unknown model variant '{}', expected one of: {}",
                    s,
                    ModelVariant::ALL
                        .iter()
                        .map(|v| v.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Ordered, declarative description of a network.
///
/// # Fields
///
/// - `input_shape` - Shape of one input sample, e.g. `[32, 32, 3]`
/// - `num_classes` - Width the last layer must have
/// - `layers` - Layer descriptions from input to output
///
/// # Example
/// ```rust
/// use cifar_dnn::model_builder::{ModelConfig, ModelVariant};
///
/// let config = ModelConfig::for_variant(ModelVariant::PlainDeep, 20, 100, vec![32, 32, 3], 10).unwrap();
/// assert_eq!(config.layer_count(), 22);
/// assert_eq!(config.input_width(), 3072);
/// assert_eq!(config.output_width().unwrap(), 10);
///
/// let model = config.build().unwrap();
/// assert_eq!(model.layer_count(), 22);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub input_shape: Vec<usize>,
    pub num_classes: usize,
    pub layers: Vec<LayerSpec>,
}

impl ModelConfig {
    /// Describes one of the four CIFAR-10 networks.
    ///
    /// # Parameters
    ///
    /// - `variant` - Which network to describe
    /// - `hidden_layers` - Number of hidden dense layers
    /// - `units` - Width of every hidden dense layer
    /// - `input_shape` - Shape of one input sample
    /// - `num_classes` - Width of the softmax head
    ///
    /// # Returns
    ///
    /// - `Ok(ModelConfig)` - The layer stack of the variant
    /// - `Err(ModelError::InputValidationError)` - If a count is zero or `PartialBatchNorm` gets fewer than 2 hidden layers
    pub fn for_variant(
        variant: ModelVariant,
        hidden_layers: usize,
        units: usize,
        input_shape: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self, ModelError> {
        if units == 0 || num_classes == 0 {
            return Err(ModelError::InputValidationError(format!(
                "units ({}) and num_classes ({}) must be greater than 0",
                units, num_classes
            )));
        }
        if hidden_layers < variant.min_hidden_layers() {
            return Err(ModelError::InputValidationError(format!(
                "{} needs at least {} hidden layers, got {}",
                variant,
                variant.min_hidden_layers(),
                hidden_layers
            )));
        }

        let elu = || LayerSpec::hidden_dense(units, ActivationKind::Elu, KernelInitializer::HeUniform);
        let selu =
            || LayerSpec::hidden_dense(units, ActivationKind::Selu, KernelInitializer::LecunNormal);

        let mut layers = Vec::with_capacity(hidden_layers + variant.extra_layers());
        layers.push(LayerSpec::Flatten);

        match variant {
            ModelVariant::PlainDeep => {
                layers.extend((0..hidden_layers).map(|_| elu()));
            }
            ModelVariant::PartialBatchNorm => {
                layers.extend((0..hidden_layers - 2).map(|_| elu()));
                layers.push(LayerSpec::BatchNormalization);
                layers.push(elu());
                layers.push(LayerSpec::BatchNormalization);
                layers.push(elu());
                layers.push(LayerSpec::BatchNormalization);
            }
            ModelVariant::SelfNormalizing => {
                layers.push(LayerSpec::BatchNormalization);
                layers.extend((0..hidden_layers).map(|_| selu()));
            }
            ModelVariant::SelfNormalizingDropout => {
                layers.extend((0..hidden_layers).map(|_| selu()));
                layers.push(LayerSpec::AlphaDropout {
                    rate: ALPHA_DROPOUT_RATE,
                });
            }
        }

        layers.push(LayerSpec::softmax_head(num_classes));

        Ok(ModelConfig {
            input_shape,
            num_classes,
            layers,
        })
    }

    /// Number of layers the built model will have
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Flattened size of one input sample, the input width of the first dense layer
    pub fn input_width(&self) -> usize {
        self.input_shape.iter().product()
    }

    /// Output shape of every layer, without the batch axis
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Vec<usize>>)` - One shape per layer
    /// - `Err(ModelError::InputValidationError)` - If a layer can't take the shape produced before it
    pub fn feature_shapes(&self) -> Result<Vec<Vec<usize>>, ModelError> {
        if self.input_shape.is_empty() || self.input_shape.contains(&0) {
            return Err(ModelError::InputValidationError(format!(
                "Input shape must be non-empty without zero dimensions, got {:?}",
                self.input_shape
            )));
        }

        let mut shape = self.input_shape.clone();
        let mut shapes = Vec::with_capacity(self.layers.len());

        for (i, spec) in self.layers.iter().enumerate() {
            shape = match spec {
                LayerSpec::Flatten => vec![shape.iter().product()],
                LayerSpec::Dense { units, .. } => {
                    if shape.len() != 1 {
                        return Err(ModelError::InputValidationError(format!(
                            "Layer {} (Dense) needs flat input but receives shape {:?}; add a Flatten layer first",
                            i, shape
                        )));
                    }
                    if *units == 0 {
                        return Err(ModelError::InputValidationError(format!(
                            "Layer {} (Dense) must have at least one unit",
                            i
                        )));
                    }
                    vec![*units]
                }
                LayerSpec::AlphaDropout { rate } | LayerSpec::Dropout { rate } => {
                    if !(*rate > 0.0 && *rate < 1.0) {
                        return Err(ModelError::InputValidationError(format!(
                            "Layer {} ({}) rate must be in (0, 1), got {}",
                            i,
                            spec.layer_type(),
                            rate
                        )));
                    }
                    shape
                }
                LayerSpec::BatchNormalization => shape,
            };
            shapes.push(shape.clone());
        }

        Ok(shapes)
    }

    /// Width of the last layer's output
    pub fn output_width(&self) -> Result<usize, ModelError> {
        let shapes = self.feature_shapes()?;
        shapes
            .last()
            .map(|s| s.iter().product())
            .ok_or_else(|| ModelError::InputValidationError("Model has no layers".to_string()))
    }

    /// Checks that the stack can be built and ends in a layer as wide as the class count.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The configuration is consistent
    /// - `Err(ModelError::InputValidationError)` - Describing the first violation found
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Model has no layers".to_string(),
            ));
        }

        let width = self.output_width()?;
        let last_shape_is_flat = self
            .feature_shapes()?
            .last()
            .is_some_and(|s| s.len() == 1);
        if !last_shape_is_flat || width != self.num_classes {
            return Err(ModelError::InputValidationError(format!(
                "Final layer width must equal the number of classes ({}), got {}",
                self.num_classes, width
            )));
        }

        Ok(())
    }

    /// Validates the configuration and instantiates its layers.
    ///
    /// The returned model is not compiled.
    ///
    /// # Returns
    ///
    /// - `Ok(Sequential)` - A model with one layer per spec, in order
    /// - `Err(ModelError)` - If validation or a layer constructor fails
    pub fn build(&self) -> Result<Sequential, ModelError> {
        self.validate()?;

        let mut model = Sequential::new();
        let mut shape = self.input_shape.clone();

        for spec in &self.layers {
            let layer: Box<dyn Layer> = match spec {
                LayerSpec::Flatten => Box::new(Flatten::new(shape.clone())?),
                LayerSpec::Dense {
                    units,
                    activation,
                    initializer,
                } => {
                    let input_dim = shape.iter().product();
                    match activation {
                        ActivationKind::Elu => {
                            Box::new(Dense::new(input_dim, *units, ELU::default(), *initializer)?)
                        }
                        ActivationKind::Selu => {
                            Box::new(Dense::new(input_dim, *units, SELU::new(), *initializer)?)
                        }
                        ActivationKind::Softmax => {
                            Box::new(Dense::new(input_dim, *units, Softmax::new(), *initializer)?)
                        }
                        ActivationKind::Linear => {
                            Box::new(Dense::new(input_dim, *units, Linear::new(), *initializer)?)
                        }
                    }
                }
                LayerSpec::BatchNormalization => {
                    Box::new(BatchNormalization::with_defaults(shape.clone())?)
                }
                LayerSpec::AlphaDropout { rate } => Box::new(AlphaDropout::new(*rate, shape.clone())?),
                LayerSpec::Dropout { rate } => Box::new(Dropout::new(*rate, shape.clone())?),
            };

            shape = match spec {
                LayerSpec::Flatten => vec![shape.iter().product()],
                LayerSpec::Dense { units, .. } => vec![*units],
                _ => shape,
            };

            model.add_boxed(layer);
        }

        debug!(layers = model.layer_count(), "model built");
        Ok(model)
    }
}
