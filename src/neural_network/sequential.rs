use super::*;
use crate::error::IoError;
use crate::metric::correct_predictions;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Axis;
use rand::seq::SliceRandom;
use serde_json::{from_reader, to_writer_pretty};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info, warn};

/// A Sequential neural network model for building and training feedforward networks.
///
/// The Sequential model stacks layers in a linear fashion: each layer feeds its output
/// to the next. An optimizer and a loss function are attached with `compile`, after
/// which the model can be trained with mini-batches, evaluated and used for prediction.
///
/// # Fields
///
/// - `layers` - A vector containing all the layers in the model. Each layer implements
///   the `Layer` trait and is stored as a boxed dynamic trait object.
///
/// - `optimizer` - An optional optimizer used for updating model parameters during training.
///
/// - `loss` - An optional loss function used to compute the training loss.
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::{Array, Array2};
///
/// // 32 samples of 3 x 4 "images", 10 classes
/// let x = Array::ones((32, 3, 4)).into_dyn();
/// let mut y = Array2::<f32>::zeros((32, 10));
/// for (i, mut row) in y.rows_mut().into_iter().enumerate() {
///     row[i % 10] = 1.0;
/// }
/// let y = y.into_dyn();
///
/// // Build a neural network
/// let mut model = Sequential::new();
/// model
///     .add(Flatten::new(vec![3, 4]).unwrap())
///     .add(Dense::new(12, 16, ELU::new(1.0), KernelInitializer::HeUniform).unwrap())
///     .add(Dense::new(16, 10, Softmax::new(), KernelInitializer::GlorotUniform).unwrap())
///     .compile(Nadam::default(), CategoricalCrossEntropy::new());
///
/// // Display model structure
/// model.summary();
///
/// // Train the model
/// let history = model.fit(&x, &y, 2, 8).unwrap();
/// assert_eq!(history.len(), 2);
///
/// // Evaluate and predict
/// let (loss, accuracy) = model.evaluate(&x, &y, 8).unwrap();
/// assert!(loss.is_finite() && (0.0..=1.0).contains(&accuracy));
/// let predictions = model.predict(&x).unwrap();
/// assert_eq!(predictions.shape(), &[32, 10]);
/// ```
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
    optimizer: Option<Box<dyn Optimizer>>,
    loss: Option<Box<dyn LossFunction>>,
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequential {
    /// Creates a new empty Sequential model
    ///
    /// # Returns
    ///
    /// * `Sequential` - an empty Sequential model
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            optimizer: None,
            loss: None,
        }
    }

    /// Adds a layer to the model
    ///
    /// Supports method chaining pattern
    ///
    /// # Parameters
    ///
    /// * `layer` - The layer to add to the model
    ///
    /// # Returns
    ///
    /// * `&mut Sequential` - Mutable reference to self for method chaining
    pub fn add<L: 'static + Layer>(&mut self, layer: L) -> &mut Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Adds an already boxed layer to the model
    pub fn add_boxed(&mut self, layer: Box<dyn Layer>) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Configures the optimizer and loss function for the model
    ///
    /// # Parameters
    ///
    /// - `optimizer` - The optimizer to use for training
    /// - `loss` - The loss function to use for training
    ///
    /// # Returns
    ///
    /// * `&mut Sequential` - Mutable reference to self for method chaining
    pub fn compile<O, LFunc>(&mut self, optimizer: O, loss: LFunc) -> &mut Self
    where
        O: 'static + Optimizer,
        LFunc: 'static + LossFunction,
    {
        self.optimizer = Some(Box::new(optimizer));
        self.loss = Some(Box::new(loss));
        self
    }

    /// Whether `compile` has been called
    pub fn is_compiled(&self) -> bool {
        self.optimizer.is_some() && self.loss.is_some()
    }

    /// Number of layers in the model
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Type name of every layer, in order
    pub fn layer_types(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.layer_type()).collect()
    }

    /// Parameter count summed over all layers
    pub fn param_count(&self) -> TrainingParameters {
        let (trainable, non_trainable) = self.layers.iter().fold((0, 0), |(t, n), layer| {
            let count = layer.param_count();
            (t + count.trainable(), n + count.non_trainable())
        });
        TrainingParameters::Mixed {
            trainable,
            non_trainable,
        }
    }

    /// Switches every mode-dependent layer (dropout, batch normalization) to training or inference mode
    pub fn set_training(&mut self, is_training: bool) {
        for layer in &mut self.layers {
            layer.set_training_if_mode_dependent(is_training);
        }
    }

    /// Validates the model state and input data
    ///
    /// # Parameters
    ///
    /// - `x` - Input tensor containing training data
    /// - `y` - Target tensor containing expected outputs
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If validation passes
    /// - `Err(ModelError)` - If validation fails
    fn validate_training_inputs(&self, x: &Tensor, y: &Tensor) -> Result<(), ModelError> {
        if !self.is_compiled() {
            return Err(ModelError::NotFitted);
        }

        self.validate_data(x, y)
    }

    fn validate_data(&self, x: &Tensor, y: &Tensor) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        }

        // Input shape validation
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::InputValidationError(
                "Input tensors cannot be empty".to_string(),
            ));
        }

        // Verify batch size match
        if x.shape()[0] != y.shape()[0] {
            return Err(ModelError::InputValidationError(format!(
                "Batch size mismatch: input has {} samples, target has {} samples",
                x.shape()[0],
                y.shape()[0]
            )));
        }

        Ok(())
    }

    /// Runs the input through every layer
    fn forward_pass(&mut self, x: &Tensor) -> Result<Tensor, ModelError> {
        let mut output = x.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Copies the samples at `indices` out of `x` and `y`
    fn gather_batch(x: &Tensor, y: &Tensor, indices: &[usize]) -> (Tensor, Tensor) {
        (x.select(Axis(0), indices), y.select(Axis(0), indices))
    }

    /// Performs training on a single batch of data
    ///
    /// Advances the optimizer by one step, then runs the forward pass, the loss, and
    /// the backward pass with parameter updates from the last layer to the first.
    ///
    /// # Parameters
    ///
    /// - `x` - Input tensor for the batch
    /// - `y` - Target tensor for the batch
    ///
    /// # Returns
    ///
    /// - `Ok((f32, usize))` - The loss value for this batch and the number of correct predictions
    /// - `Err(ModelError)` - If training fails
    fn train_batch(&mut self, x: &Tensor, y: &Tensor) -> Result<(f32, usize), ModelError> {
        // Forward pass
        let output = self.forward_pass(x)?;

        let loss_fn = self.loss.as_ref().ok_or(ModelError::NotFitted)?;
        let optimizer = self.optimizer.as_mut().ok_or(ModelError::NotFitted)?;

        if output.shape() != y.shape() {
            return Err(ModelError::InputValidationError(format!(
                "Model output shape {:?} doesn't match target shape {:?}",
                output.shape(),
                y.shape()
            )));
        }

        // Calculate loss
        let loss_value = loss_fn.compute_loss(y, &output);
        let correct = correct_predictions(y, &output)?;

        // Calculate gradient of loss with respect to output
        let mut grad = loss_fn.compute_grad(y, &output);

        optimizer.step();

        // Backward pass and parameter updates (iterate through layers in reverse)
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
            optimizer.update(&mut **layer);
        }

        Ok((loss_value, correct))
    }

    /// Trains the model without validation data or early stopping
    ///
    /// # Parameters
    ///
    /// - `x` - Input training data tensor
    /// - `y` - One-hot target tensor
    /// - `epochs` - Number of training epochs
    /// - `batch_size` - Size of each training batch
    ///
    /// # Returns
    ///
    /// - `Ok(History)` - Per-epoch training metrics
    /// - `Err(ModelError)` - If the model is not compiled or the data doesn't fit it
    pub fn fit(
        &mut self,
        x: &Tensor,
        y: &Tensor,
        epochs: usize,
        batch_size: usize,
    ) -> Result<History, ModelError> {
        self.fit_with_validation(x, y, None, epochs, batch_size, None)
    }

    /// Trains the model with mini-batches, optional validation data and optional early stopping
    ///
    /// Training samples are shuffled at the start of every epoch and split into batches of
    /// `batch_size`; the last batch may be smaller. Epoch loss and accuracy are averaged over
    /// samples. After every epoch the validation data, if any, is evaluated in inference mode.
    /// Early stopping watches the validation loss (training loss without validation data) and,
    /// when it runs out of patience with `restore_best_weights` set, the weights of the best
    /// epoch are put back into the model.
    ///
    /// # Parameters
    ///
    /// - `x` - Input training data tensor
    /// - `y` - One-hot target tensor
    /// - `validation` - Optional `(x_val, y_val)` pair
    /// - `epochs` - Maximum number of training epochs
    /// - `batch_size` - Size of each training batch
    /// - `early_stopping` - Optional early stopping callback
    ///
    /// # Returns
    ///
    /// - `Ok(History)` - Per-epoch metrics, the stop reason and the best epoch
    /// - `Err(ModelError::NotFitted)` - If `compile` was not called
    /// - `Err(ModelError::InputValidationError)` - If the data doesn't fit the model
    pub fn fit_with_validation(
        &mut self,
        x: &Tensor,
        y: &Tensor,
        validation: Option<(&Tensor, &Tensor)>,
        epochs: usize,
        batch_size: usize,
        early_stopping: Option<EarlyStopping>,
    ) -> Result<History, ModelError> {
        // Validate inputs
        self.validate_training_inputs(x, y)?;
        if let Some((x_val, y_val)) = validation {
            self.validate_data(x_val, y_val)?;
        }

        // Validate batch size
        if batch_size == 0 {
            return Err(ModelError::InputValidationError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        let n_samples = x.shape()[0];
        let mut early_stopping = early_stopping;
        if let Some(es) = early_stopping.as_mut() {
            es.reset();
        }

        // Create sample indices for shuffling
        let mut indices: Vec<usize> = (0..n_samples).collect();

        let total_batches = n_samples.div_ceil(batch_size);
        let total_iterations = epochs as u64 * total_batches as u64;

        // Create progress bar for batch training
        let progress_bar = ProgressBar::new(total_iterations);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Epoch {msg}")
                .map_err(|e| {
                    ModelError::ProcessingError(format!("Invalid progress bar template: {}", e))
                })?
                .progress_chars("█▓░"),
        );

        let mut history = History::new();

        // Training loop
        for epoch in 0..epochs {
            if let Some(es) = early_stopping.as_mut() {
                es.begin_epoch();
            }
            self.set_training(true);

            // Shuffle data at the beginning of each epoch
            indices.shuffle(&mut rand::rng());

            let mut loss_sum = 0.0;
            let mut correct = 0;
            let mut seen = 0;

            // Process data in batches
            for batch_indices in indices.chunks(batch_size) {
                let (batch_x, batch_y) = Self::gather_batch(x, y, batch_indices);

                let (batch_loss, batch_correct) = self.train_batch(&batch_x, &batch_y)?;
                loss_sum += batch_loss * batch_indices.len() as f32;
                correct += batch_correct;
                seen += batch_indices.len();

                // Update progress bar
                progress_bar.set_message(format!(
                    "{}/{} | Avg Loss: {:.6}",
                    epoch + 1,
                    epochs,
                    loss_sum / seen as f32
                ));
                progress_bar.inc(1);
            }

            let loss = loss_sum / n_samples as f32;
            let accuracy = correct as f32 / n_samples as f32;

            let (val_loss, val_accuracy) = match validation {
                Some((x_val, y_val)) => {
                    let (l, a) = self.evaluate(x_val, y_val, batch_size)?;
                    (Some(l), Some(a))
                }
                None => (None, None),
            };

            let metrics = EpochMetrics {
                epoch,
                loss,
                accuracy,
                val_loss,
                val_accuracy,
            };

            info!(
                epoch = epoch + 1,
                epochs,
                loss,
                accuracy,
                val_loss = val_loss.unwrap_or(f32::NAN),
                val_accuracy = val_accuracy.unwrap_or(f32::NAN),
                "epoch finished"
            );
            if !loss.is_finite() {
                warn!(epoch = epoch + 1, "training loss is not finite");
            }

            let monitored = metrics.monitored_loss();
            history.push(metrics);

            if let Some(es) = early_stopping.as_mut() {
                let state = es.on_epoch_end(epoch, monitored, || self.snapshot_weights());
                if state == TrainingState::StoppedByPatience {
                    history.stop_reason = StopReason::Patience;
                    break;
                }
            }
        }

        // Finish progress bar
        progress_bar.finish_with_message("Training completed");

        match early_stopping.as_mut() {
            Some(es) => {
                es.finish_by_budget();
                history.best_epoch = es.best_epoch();

                if es.state() == TrainingState::StoppedByPatience && es.restore_best_weights() {
                    if let Some(best_weights) = es.take_best_weights() {
                        self.restore_weights(&best_weights)?;
                        info!(
                            best_epoch = es.best_epoch().map_or(0, |e| e + 1),
                            best_value = es.best_value(),
                            "restored weights of the best epoch"
                        );
                    }
                }
            }
            None => {
                history.best_epoch = history.lowest_monitored_epoch();
            }
        }

        // Leave the model ready for inference
        self.set_training(false);

        info!(
            samples = n_samples,
            batch_size,
            epochs_run = history.len(),
            stop_reason = %history.stop_reason,
            "training completed"
        );

        Ok(history)
    }

    /// Computes loss and accuracy on a dataset in inference mode
    ///
    /// # Parameters
    ///
    /// - `x` - Input tensor
    /// - `y` - One-hot target tensor
    /// - `batch_size` - Number of samples pushed through the model at once
    ///
    /// # Returns
    ///
    /// - `Ok((f32, f32))` - Mean loss and accuracy over all samples
    /// - `Err(ModelError::NotFitted)` - If no loss function has been set with `compile`
    /// - `Err(ModelError::InputValidationError)` - If the data doesn't fit the model
    pub fn evaluate(
        &mut self,
        x: &Tensor,
        y: &Tensor,
        batch_size: usize,
    ) -> Result<(f32, f32), ModelError> {
        if self.loss.is_none() {
            return Err(ModelError::NotFitted);
        }
        self.validate_data(x, y)?;
        if batch_size == 0 {
            return Err(ModelError::InputValidationError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        self.set_training(false);

        let n_samples = x.shape()[0];
        let mut loss_sum = 0.0;
        let mut correct = 0;

        let mut start = 0;
        while start < n_samples {
            let end = (start + batch_size).min(n_samples);
            let indices: Vec<usize> = (start..end).collect();
            let (batch_x, batch_y) = Self::gather_batch(x, y, &indices);

            let output = self.forward_pass(&batch_x)?;
            if output.shape() != batch_y.shape() {
                return Err(ModelError::InputValidationError(format!(
                    "Model output shape {:?} doesn't match target shape {:?}",
                    output.shape(),
                    batch_y.shape()
                )));
            }

            let loss_fn = self.loss.as_ref().ok_or(ModelError::NotFitted)?;
            loss_sum += loss_fn.compute_loss(&batch_y, &output) * (end - start) as f32;
            correct += correct_predictions(&batch_y, &output)?;
            start = end;
        }

        let loss = loss_sum / n_samples as f32;
        let accuracy = correct as f32 / n_samples as f32;
        debug!(samples = n_samples, loss, accuracy, "evaluation finished");

        Ok((loss, accuracy))
    }

    /// Generates predictions for the input data
    ///
    /// Runs a forward pass in inference mode; dropout is disabled and batch
    /// normalization uses its running statistics.
    ///
    /// # Parameters
    ///
    /// * `x` - Input tensor containing data to predict on
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Tensor containing the model's predictions
    /// - `Err(ModelError)` - If the input is empty or doesn't fit the model
    pub fn predict(&mut self, x: &Tensor) -> Result<Tensor, ModelError> {
        // Input validation
        if x.is_empty() {
            return Err(ModelError::InputValidationError(
                "Input tensor cannot be empty".to_string(),
            ));
        }
        if self.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        }

        self.set_training(false);
        self.forward_pass(x)
    }

    /// Prints a summary of the model's structure
    ///
    /// Displays each layer's information and parameter statistics in a tabular format
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }

    /// Builds the text printed by `summary`
    pub fn summary_string(&self) -> String {
        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;

        let mut out = String::new();
        let _ = writeln!(out, "Model: \"sequential\"");
        let _ = writeln!(
            out,
            "┏{}┳{}┳{}┓",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );
        let _ = writeln!(
            out,
            "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
            "Layer (type)", "Output Shape", "Param #"
        );
        let _ = writeln!(
            out,
            "┡{}╇{}╇{}┩",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );

        let mut trainable_param_count: usize = 0;
        let mut non_trainable_param_count: usize = 0;

        for (i, layer) in self.layers.iter().enumerate() {
            // First layer is named after its type, later ones get a "_<index>" suffix
            let base = layer.layer_type().to_lowercase();
            let layer_name = if i == 0 {
                base
            } else {
                format!("{}_{}", base, i)
            };
            let param_count = layer.param_count();
            trainable_param_count += param_count.trainable();
            non_trainable_param_count += param_count.non_trainable();

            let _ = writeln!(
                out,
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!("{} ({})", layer_name, layer.layer_type()),
                layer.output_shape(),
                param_count.total()
            );
        }

        let total_params = trainable_param_count + non_trainable_param_count;
        let _ = writeln!(
            out,
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        );
        // f32 parameters take 4 bytes each
        let _ = writeln!(out, " Total params: {} ({} B)", total_params, total_params * 4);
        let _ = writeln!(
            out,
            " Trainable params: {} ({} B)",
            trainable_param_count,
            trainable_param_count * 4
        );
        let _ = write!(
            out,
            " Non-trainable params: {} ({} B)",
            non_trainable_param_count,
            non_trainable_param_count * 4
        );
        out
    }

    /// Returns all the weights from each layer in the model.
    ///
    /// # Returns
    ///
    /// * `Vec<LayerWeight>` - A vector containing weight references for each layer in the model.
    ///   The type of each `LayerWeight` depends on the layer type:
    ///   - `LayerWeight::Dense` for Dense layers with weight and bias
    ///   - `LayerWeight::BatchNormalization` for gamma, beta and the running statistics
    ///   - `LayerWeight::Empty` for layers without parameters
    pub fn get_weights(&self) -> Vec<LayerWeight<'_>> {
        let mut weights = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            weights.push(layer.get_weights());
        }
        weights
    }

    /// Copies the weights of every layer into owned, serializable form
    pub fn snapshot_weights(&self) -> Vec<SerializableLayerWeight> {
        self.layers
            .iter()
            .map(|layer| SerializableLayerWeight::from_layer_weight(&layer.get_weights()))
            .collect()
    }

    /// Puts weights produced by `snapshot_weights` back into the layers
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Every layer received its weights
    /// - `Err(IoError)` - The layer count, a layer kind or a weight shape doesn't match
    pub fn restore_weights(&mut self, weights: &[SerializableLayerWeight]) -> Result<(), IoError> {
        if weights.len() != self.layers.len() {
            return Err(IoError::invalid_data(format!(
                "Layer count mismatch: model has {} layers, snapshot has {} layers",
                self.layers.len(),
                weights.len()
            )));
        }

        for (layer, layer_weights) in self.layers.iter_mut().zip(weights) {
            let layer_type = layer.layer_type().to_string();
            apply_weights_to_layer(&mut **layer, layer_weights, &layer_type)?;
        }

        Ok(())
    }

    /// Saves the model architecture and weights to a JSON file at the specified path.
    ///
    /// This method serializes the model structure including layer types and all
    /// parameters (weights, biases and batch normalization statistics) to JSON format.
    /// The optimizer and loss function are not saved and must be reconfigured after loading.
    ///
    /// # Parameters
    ///
    /// * `path` - File path where the model will be saved (e.g., "stored_model.json")
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Model successfully saved to file
    /// - `Err(IoError::StdIoError)` - File creation or write operation failed
    /// - `Err(IoError::JsonError)` - Serialization to JSON failed
    pub fn save_to_path(&self, path: &str) -> Result<(), IoError> {
        // Convert layers to serializable format
        let serializable_layers = self
            .layers
            .iter()
            .map(|layer| SerializableLayer {
                info: LayerInfo {
                    layer_type: layer.layer_type().to_string(),
                    output_shape: layer.output_shape(),
                },
                weights: SerializableLayerWeight::from_layer_weight(&layer.get_weights()),
            })
            .collect();

        let serializable_model = SerializableSequential {
            layers: serializable_layers,
        };

        // Create or overwrite the file
        let file = File::create(path).map_err(IoError::StdIoError)?;
        let mut writer = BufWriter::new(file);

        // Serialize the model to JSON and write to file
        to_writer_pretty(&mut writer, &serializable_model).map_err(IoError::JsonError)?;

        // Ensure all data is written to disk
        writer.flush().map_err(IoError::StdIoError)?;

        Ok(())
    }

    /// Loads model weights from a JSON file and applies them to the current model.
    ///
    /// The current model must have the same architecture (same number and types of layers)
    /// as the saved model. Build the model structure first, then call this method; call
    /// `compile()` afterwards to train further.
    ///
    /// # Parameters
    ///
    /// * `path` - File path from which to load the weights (e.g., "stored_model.json")
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Successfully loaded weights into the model
    /// - `Err(IoError::StdIoError)` - File not found, read failure, or a structure mismatch
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    pub fn load_from_path(&mut self, path: &str) -> Result<(), IoError> {
        // Open and buffer the file for reading
        let reader = IoError::load_in_buf_reader(path)?;

        // Deserialize the model from JSON
        let serializable_model: SerializableSequential =
            from_reader(reader).map_err(IoError::JsonError)?;

        // Verify layer count matches
        if serializable_model.layers.len() != self.layers.len() {
            return Err(IoError::invalid_data(format!(
                "Layer count mismatch: model has {} layers, file has {} layers",
                self.layers.len(),
                serializable_model.layers.len()
            )));
        }

        // Apply weights to each layer
        for (layer, serializable_layer) in self.layers.iter_mut().zip(&serializable_model.layers) {
            if layer.layer_type() != serializable_layer.info.layer_type {
                return Err(IoError::invalid_data(format!(
                    "Layer type mismatch: model has {}, file has {}",
                    layer.layer_type(),
                    serializable_layer.info.layer_type
                )));
            }
            apply_weights_to_layer(
                &mut **layer,
                &serializable_layer.weights,
                &serializable_layer.info.layer_type,
            )?;
        }

        Ok(())
    }
}
