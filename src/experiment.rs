use crate::dataset::cifar10::Cifar10;
use crate::error::{IoError, ModelError};
use crate::model_builder::{ModelConfig, ModelVariant};
use crate::neural_network::*;
use crate::utility::label_encoding::to_categorical;
use crate::utility::standardize::Standardizer;
use crate::{Deserialize, Serialize};
use serde_json::from_reader;
use std::path::Path;
use tracing::info;

/// Rows of the text chart printed by `report`
pub const CHART_HEIGHT: usize = 16;

/// Columns of the text chart printed by `report`
pub const CHART_WIDTH: usize = 60;

/// Optimizer and early-stopping settings of one variant.
///
/// # Fields
///
/// - `learning_rate` - Nadam learning rate
/// - `patience` - Early stopping patience in epochs
/// - `min_delta` - Minimum validation loss decrease that counts as an improvement
/// - `restore_best_weights` - Whether early stopping restores the best epoch's weights
/// - `standardize_inputs` - Whether pixels are standardized with training-split statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f32,
    pub patience: usize,
    pub min_delta: f32,
    pub restore_best_weights: bool,
    pub standardize_inputs: bool,
}

impl TrainingConfig {
    /// Defaults of a variant: Nadam at 1e-3 with patience 5, except the alpha dropout
    /// network which trains at 5e-5 with patience 7. Both SELU networks get standardized inputs.
    pub fn for_variant(variant: ModelVariant) -> Self {
        match variant {
            ModelVariant::PlainDeep | ModelVariant::PartialBatchNorm => TrainingConfig::default(),
            ModelVariant::SelfNormalizing => TrainingConfig {
                standardize_inputs: true,
                ..TrainingConfig::default()
            },
            ModelVariant::SelfNormalizingDropout => TrainingConfig {
                learning_rate: 5e-5,
                patience: 7,
                standardize_inputs: true,
                ..TrainingConfig::default()
            },
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            learning_rate: 1e-3,
            patience: 5,
            min_delta: 0.0,
            restore_best_weights: true,
            standardize_inputs: false,
        }
    }
}

/// Settings of a full experiment, readable from JSON. Every field has a default,
/// so `{}` is a valid configuration.
///
/// # Fields
///
/// - `hidden_layers` - Hidden dense layers per network
/// - `units` - Width of every hidden dense layer
/// - `num_classes` - Width of the one-hot targets and of the softmax head
/// - `batch_size` - Mini-batch size for training and evaluation
/// - `epochs` - Epoch budget of every run
/// - `variants` - Variants to run, in order
/// - `plain_deep`, `partial_batch_norm`, `self_normalizing`, `self_normalizing_dropout` - Per-variant training settings.
///   A partial section in JSON only overrides the fields it names; the rest keep that variant's defaults.
///
/// # Example
/// ```rust
/// use cifar_dnn::experiment::ExperimentConfig;
/// use cifar_dnn::model_builder::ModelVariant;
///
/// let config: ExperimentConfig = serde_json::from_str(r#"{ "epochs": 3, "variants": ["plain_deep"] }"#).unwrap();
/// assert_eq!(config.epochs, 3);
/// assert_eq!(config.hidden_layers, 20);
/// assert_eq!(config.variants, vec![ModelVariant::PlainDeep]);
/// assert_eq!(config.training(ModelVariant::SelfNormalizingDropout).patience, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExperimentConfigFile")]
pub struct ExperimentConfig {
    pub hidden_layers: usize,
    pub units: usize,
    pub num_classes: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub variants: Vec<ModelVariant>,
    pub plain_deep: TrainingConfig,
    pub partial_batch_norm: TrainingConfig,
    pub self_normalizing: TrainingConfig,
    pub self_normalizing_dropout: TrainingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            hidden_layers: 20,
            units: 100,
            num_classes: 10,
            batch_size: 32,
            epochs: 20,
            variants: ModelVariant::ALL.to_vec(),
            plain_deep: TrainingConfig::for_variant(ModelVariant::PlainDeep),
            partial_batch_norm: TrainingConfig::for_variant(ModelVariant::PartialBatchNorm),
            self_normalizing: TrainingConfig::for_variant(ModelVariant::SelfNormalizing),
            self_normalizing_dropout: TrainingConfig::for_variant(
                ModelVariant::SelfNormalizingDropout,
            ),
        }
    }
}

/// Per-variant section of a configuration file. Absent fields fall back to the
/// defaults of the variant the section belongs to.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TrainingOverrides {
    learning_rate: Option<f32>,
    patience: Option<usize>,
    min_delta: Option<f32>,
    restore_best_weights: Option<bool>,
    standardize_inputs: Option<bool>,
}

impl TrainingOverrides {
    fn apply(self, variant: ModelVariant) -> TrainingConfig {
        let base = TrainingConfig::for_variant(variant);
        TrainingConfig {
            learning_rate: self.learning_rate.unwrap_or(base.learning_rate),
            patience: self.patience.unwrap_or(base.patience),
            min_delta: self.min_delta.unwrap_or(base.min_delta),
            restore_best_weights: self.restore_best_weights.unwrap_or(base.restore_best_weights),
            standardize_inputs: self.standardize_inputs.unwrap_or(base.standardize_inputs),
        }
    }
}

/// On-disk form of `ExperimentConfig`
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ExperimentConfigFile {
    hidden_layers: usize,
    units: usize,
    num_classes: usize,
    batch_size: usize,
    epochs: usize,
    variants: Vec<ModelVariant>,
    plain_deep: TrainingOverrides,
    partial_batch_norm: TrainingOverrides,
    self_normalizing: TrainingOverrides,
    self_normalizing_dropout: TrainingOverrides,
}

impl Default for ExperimentConfigFile {
    fn default() -> Self {
        let defaults = ExperimentConfig::default();
        ExperimentConfigFile {
            hidden_layers: defaults.hidden_layers,
            units: defaults.units,
            num_classes: defaults.num_classes,
            batch_size: defaults.batch_size,
            epochs: defaults.epochs,
            variants: defaults.variants,
            plain_deep: TrainingOverrides::default(),
            partial_batch_norm: TrainingOverrides::default(),
            self_normalizing: TrainingOverrides::default(),
            self_normalizing_dropout: TrainingOverrides::default(),
        }
    }
}

impl From<ExperimentConfigFile> for ExperimentConfig {
    fn from(file: ExperimentConfigFile) -> Self {
        ExperimentConfig {
            hidden_layers: file.hidden_layers,
            units: file.units,
            num_classes: file.num_classes,
            batch_size: file.batch_size,
            epochs: file.epochs,
            variants: file.variants,
            plain_deep: file.plain_deep.apply(ModelVariant::PlainDeep),
            partial_batch_norm: file.partial_batch_norm.apply(ModelVariant::PartialBatchNorm),
            self_normalizing: file.self_normalizing.apply(ModelVariant::SelfNormalizing),
            self_normalizing_dropout: file
                .self_normalizing_dropout
                .apply(ModelVariant::SelfNormalizingDropout),
        }
    }
}

impl ExperimentConfig {
    /// Reads a JSON configuration file; missing fields keep their defaults.
    ///
    /// # Returns
    ///
    /// - `Ok(ExperimentConfig)` - The parsed configuration
    /// - `Err(IoError::StdIoError)` - The file can't be opened
    /// - `Err(IoError::JsonError)` - The file is not a valid configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        from_reader(reader).map_err(IoError::JsonError)
    }

    /// Training settings of a variant
    pub fn training(&self, variant: ModelVariant) -> &TrainingConfig {
        match variant {
            ModelVariant::PlainDeep => &self.plain_deep,
            ModelVariant::PartialBatchNorm => &self.partial_batch_norm,
            ModelVariant::SelfNormalizing => &self.self_normalizing,
            ModelVariant::SelfNormalizingDropout => &self.self_normalizing_dropout,
        }
    }

    /// Checks that every count is positive and at least one variant is selected
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("hidden_layers", self.hidden_layers),
            ("units", self.units),
            ("num_classes", self.num_classes),
            ("batch_size", self.batch_size),
            ("epochs", self.epochs),
        ] {
            if value == 0 {
                return Err(ModelError::InputValidationError(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        if self.variants.is_empty() {
            return Err(ModelError::InputValidationError(
                "At least one variant must be selected".to_string(),
            ));
        }

        Ok(())
    }
}

/// Outcome of training one variant.
///
/// # Fields
///
/// - `variant` - The variant that was trained
/// - `model` - The trained model, holding the best epoch's weights when early stopping restored them
/// - `history` - Per-epoch metrics of the run
/// - `test_loss` - Loss of the final model on the test split
/// - `test_accuracy` - Accuracy of the final model on the test split
pub struct VariantRun {
    pub variant: ModelVariant,
    pub model: Sequential,
    pub history: History,
    pub test_loss: f32,
    pub test_accuracy: f32,
}

impl VariantRun {
    /// Writes the history to `<dir>/<variant>_history.json`
    pub fn save_history(&self, dir: impl AsRef<Path>) -> Result<(), IoError> {
        let path = dir
            .as_ref()
            .join(format!("{}_history.json", self.variant.name()));
        self.history.save_to_path(&path.to_string_lossy())
    }

    /// Writes the trained weights to `<dir>/<variant>_model.json`, loadable with
    /// `Sequential::load_from_path` into a model built from the same configuration
    pub fn save_model(&self, dir: impl AsRef<Path>) -> Result<(), IoError> {
        let path = dir
            .as_ref()
            .join(format!("{}_model.json", self.variant.name()));
        self.model.save_to_path(&path.to_string_lossy())
    }
}

/// Encodes the dataset, builds, trains and evaluates one variant, then prints its report.
///
/// The test split is also the validation data watched by early stopping.
///
/// # Parameters
///
/// - `dataset` - The loaded dataset, only read
/// - `config` - Experiment settings
/// - `variant` - Which network to train
///
/// # Returns
///
/// - `Ok(VariantRun)` - The trained model and its metrics
/// - `Err(ModelError)` - If the configuration is invalid or the data doesn't fit the model
pub fn run_variant(
    dataset: &Cifar10,
    config: &ExperimentConfig,
    variant: ModelVariant,
) -> Result<VariantRun, ModelError> {
    config.validate()?;
    let training = config.training(variant);

    info!(%variant, ?training, "starting run");

    // Encoder
    let mut x_train = dataset.train.to_tensor();
    let mut x_test = dataset.test.to_tensor();
    if training.standardize_inputs {
        let scaler = Standardizer::fit(&x_train)?;
        x_train = scaler.transform(&x_train)?;
        x_test = scaler.transform(&x_test)?;
    }
    let y_train = to_categorical(&dataset.train.labels_usize(), Some(config.num_classes))?.into_dyn();
    let y_test = to_categorical(&dataset.test.labels_usize(), Some(config.num_classes))?.into_dyn();
    info!(
        y_train = ?y_train.shape(),
        y_test = ?y_test.shape(),
        "labels one-hot encoded"
    );

    // Builder
    let model_config = ModelConfig::for_variant(
        variant,
        config.hidden_layers,
        config.units,
        dataset.train.sample_shape(),
        config.num_classes,
    )?;
    let mut model = model_config.build()?;
    model.compile(
        Nadam::with_learning_rate(training.learning_rate)?,
        CategoricalCrossEntropy::new(),
    );
    model.summary();

    // Trainer
    let early_stopping = EarlyStopping::new(
        training.patience,
        training.min_delta,
        training.restore_best_weights,
    );
    let history = model.fit_with_validation(
        &x_train,
        &y_train,
        Some((&x_test, &y_test)),
        config.epochs,
        config.batch_size,
        Some(early_stopping),
    )?;

    let (test_loss, test_accuracy) = model.evaluate(&x_test, &y_test, config.batch_size)?;
    info!(%variant, test_loss, test_accuracy, epochs_run = history.len(), "run finished");

    // Reporter
    report(&model, &history);

    Ok(VariantRun {
        variant,
        model,
        history,
        test_loss,
        test_accuracy,
    })
}

/// Runs every configured variant in order on the same dataset.
pub fn run_all(dataset: &Cifar10, config: &ExperimentConfig) -> Result<Vec<VariantRun>, ModelError> {
    config.validate()?;
    config
        .variants
        .iter()
        .map(|&variant| run_variant(dataset, config, variant))
        .collect()
}

/// Builds the report text: model summary, per-epoch metrics table and metric chart.
pub fn report_string(model: &Sequential, history: &History) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        model.summary_string(),
        history.metrics_table(),
        history.render_chart(CHART_HEIGHT, CHART_WIDTH)
    )
}

/// Prints the report of a finished run.
pub fn report(model: &Sequential, history: &History) {
    println!("{}", report_string(model, history));
}

