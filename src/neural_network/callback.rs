use super::*;

/// Phase of a training run as seen by early stopping.
///
/// # Variants
///
/// - `EpochInProgress` - Mini-batches of the current epoch are being processed
/// - `Evaluating` - The epoch is complete and the monitored loss is being compared
/// - `StoppedByPatience` - The monitored loss did not improve for `patience` epochs (terminal)
/// - `StoppedByBudget` - The epoch budget ran out (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    EpochInProgress,
    Evaluating,
    StoppedByPatience,
    StoppedByBudget,
}

impl TrainingState {
    /// Whether no further epoch will run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrainingState::StoppedByPatience | TrainingState::StoppedByBudget
        )
    }
}

/// Stops training when the monitored loss stops improving.
///
/// The monitored value is the validation loss, or the training loss when no
/// validation data is given. A value counts as an improvement when it is lower
/// than `best - min_delta`. If the last improvement happened at epoch `E`
/// (0-based), the run stops after epoch `E + patience`. With
/// `restore_best_weights` set, a snapshot of every layer's weights (batch
/// normalization running statistics included) is kept for the best epoch and
/// put back into the model when patience runs out.
///
/// # Fields
///
/// - `patience` - Number of epochs without improvement tolerated before stopping
/// - `min_delta` - Minimum decrease of the monitored value that counts as an improvement
/// - `restore_best_weights` - Whether to restore the best epoch's weights on stop
/// - `best_value` - Lowest monitored value seen so far
/// - `best_epoch` - Epoch at which `best_value` was seen
/// - `wait` - Epochs since the last improvement
/// - `best_weights` - Snapshot taken at `best_epoch`
/// - `state` - Current phase of the run
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
///
/// let mut early_stopping = EarlyStopping::new(2, 0.0, false);
/// let losses = [1.0, 0.8, 0.9, 0.85, 0.7];
///
/// let mut stopped_at = None;
/// for (epoch, &loss) in losses.iter().enumerate() {
///     early_stopping.begin_epoch();
///     if early_stopping.on_epoch_end(epoch, loss, Vec::new) == TrainingState::StoppedByPatience {
///         stopped_at = Some(epoch);
///         break;
///     }
/// }
///
/// // Best at epoch 1, stop after epoch 1 + 2
/// assert_eq!(stopped_at, Some(3));
/// assert_eq!(early_stopping.best_epoch(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    restore_best_weights: bool,
    best_value: f32,
    best_epoch: Option<usize>,
    wait: usize,
    best_weights: Option<Vec<SerializableLayerWeight>>,
    state: TrainingState,
}

impl EarlyStopping {
    /// Creates a new early stopping callback.
    ///
    /// # Parameters
    ///
    /// - `patience` - Number of epochs without improvement tolerated before stopping
    /// - `min_delta` - Minimum decrease that counts as an improvement; negative values are treated as their magnitude
    /// - `restore_best_weights` - Whether to restore the best epoch's weights when stopping
    pub fn new(patience: usize, min_delta: f32, restore_best_weights: bool) -> Self {
        EarlyStopping {
            patience,
            min_delta: min_delta.abs(),
            restore_best_weights,
            best_value: f32::INFINITY,
            best_epoch: None,
            wait: 0,
            best_weights: None,
            state: TrainingState::EpochInProgress,
        }
    }

    pub fn patience(&self) -> usize {
        self.patience
    }

    pub fn min_delta(&self) -> f32 {
        self.min_delta
    }

    pub fn restore_best_weights(&self) -> bool {
        self.restore_best_weights
    }

    /// Lowest monitored value seen so far (`f32::INFINITY` before the first epoch)
    pub fn best_value(&self) -> f32 {
        self.best_value
    }

    /// Epoch of the lowest monitored value, if any epoch produced a finite value
    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    /// Epochs since the last improvement
    pub fn wait(&self) -> usize {
        self.wait
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// Snapshot of the best epoch's weights, if one was taken
    pub fn best_weights(&self) -> Option<&[SerializableLayerWeight]> {
        self.best_weights.as_deref()
    }

    /// Takes ownership of the best epoch's weights, leaving `None` behind
    pub fn take_best_weights(&mut self) -> Option<Vec<SerializableLayerWeight>> {
        self.best_weights.take()
    }

    /// Clears all progress so the callback can monitor a new run
    pub fn reset(&mut self) {
        self.best_value = f32::INFINITY;
        self.best_epoch = None;
        self.wait = 0;
        self.best_weights = None;
        self.state = TrainingState::EpochInProgress;
    }

    /// Marks the start of an epoch. Has no effect once the run has stopped.
    pub fn begin_epoch(&mut self) {
        if !self.state.is_terminal() {
            self.state = TrainingState::EpochInProgress;
        }
    }

    /// Records the monitored value of a finished epoch and decides whether to go on.
    ///
    /// `snapshot` is only called when the epoch improves on the best value and
    /// `restore_best_weights` is set.
    ///
    /// # Parameters
    ///
    /// - `epoch` - 0-based index of the finished epoch
    /// - `monitored` - Validation loss of the epoch (training loss without validation data)
    /// - `snapshot` - Produces the current weights of every layer
    ///
    /// # Returns
    ///
    /// - `TrainingState::Evaluating` - Training goes on with the next epoch
    /// - `TrainingState::StoppedByPatience` - Training must stop now
    pub fn on_epoch_end<F>(&mut self, epoch: usize, monitored: f32, snapshot: F) -> TrainingState
    where
        F: FnOnce() -> Vec<SerializableLayerWeight>,
    {
        if self.state.is_terminal() {
            return self.state;
        }
        self.state = TrainingState::Evaluating;

        // NaN never compares lower, so it counts as no improvement
        if monitored < self.best_value - self.min_delta {
            self.best_value = monitored;
            self.best_epoch = Some(epoch);
            self.wait = 0;
            if self.restore_best_weights {
                self.best_weights = Some(snapshot());
            }
        } else {
            self.wait += 1;
            if self.wait >= self.patience {
                self.state = TrainingState::StoppedByPatience;
            }
        }

        self.state
    }

    /// Marks the run as finished because the epoch budget ran out.
    pub fn finish_by_budget(&mut self) {
        if !self.state.is_terminal() {
            self.state = TrainingState::StoppedByBudget;
        }
    }
}

impl Default for EarlyStopping {
    /// Patience 5, no minimum delta, best weights restored
    fn default() -> Self {
        Self::new(5, 0.0, true)
    }
}
