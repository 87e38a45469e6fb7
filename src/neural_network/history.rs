use super::*;
use crate::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Metrics recorded at the end of one epoch.
///
/// # Fields
///
/// - `epoch` - 0-based epoch index
/// - `loss` - Mean training loss over the epoch's mini-batches, weighted by batch size
/// - `accuracy` - Training accuracy over the epoch
/// - `val_loss` - Validation loss, when validation data was given
/// - `val_accuracy` - Validation accuracy, when validation data was given
///
/// Non-finite values (a diverged run) are stored in JSON as the strings `"NaN"`,
/// `"inf"` and `"-inf"`, so a saved history always loads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    #[serde(with = "metric_value")]
    pub loss: f32,
    #[serde(with = "metric_value")]
    pub accuracy: f32,
    #[serde(default, with = "optional_metric_value")]
    pub val_loss: Option<f32>,
    #[serde(default, with = "optional_metric_value")]
    pub val_accuracy: Option<f32>,
}

/// JSON form of one metric value: a number, or a label for NaN and the infinities
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredMetric {
    Number(f32),
    Label(String),
}

impl StoredMetric {
    fn from_value(value: f32) -> Self {
        if value.is_nan() {
            StoredMetric::Label("NaN".to_string())
        } else if value.is_infinite() {
            let label = if value > 0.0 { "inf" } else { "-inf" };
            StoredMetric::Label(label.to_string())
        } else {
            StoredMetric::Number(value)
        }
    }

    fn into_value<E: serde::de::Error>(self) -> Result<f32, E> {
        match self {
            StoredMetric::Number(value) => Ok(value),
            StoredMetric::Label(label) => match label.as_str() {
                "NaN" => Ok(f32::NAN),
                "inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(E::custom(format!("invalid metric value \"{}\"", other))),
            },
        }
    }
}

mod metric_value {
    use super::StoredMetric;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        StoredMetric::from_value(*value).serialize(serializer)
    }

    /// `null` is what non-finite values used to be written as; it reads back as NaN
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        match Option::<StoredMetric>::deserialize(deserializer)? {
            Some(stored) => stored.into_value(),
            None => Ok(f32::NAN),
        }
    }
}

mod optional_metric_value {
    use super::StoredMetric;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(StoredMetric::from_value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
        Option::<StoredMetric>::deserialize(deserializer)?
            .map(StoredMetric::into_value)
            .transpose()
    }
}

impl EpochMetrics {
    /// Value watched by early stopping: validation loss, or training loss without validation data
    pub fn monitored_loss(&self) -> f32 {
        self.val_loss.unwrap_or(self.loss)
    }
}

/// Why a training run ended.
///
/// # Variants
///
/// - `Patience` - Early stopping ran out of patience
/// - `Budget` - Every requested epoch was run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Patience,
    Budget,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Patience => write!(f, "early stopping"),
            StopReason::Budget => write!(f, "epoch budget exhausted"),
        }
    }
}

/// One plotted metric: label, glyph and per-epoch values
struct ChartSeries {
    label: &'static str,
    glyph: char,
    values: Vec<Option<f32>>,
}

/// Per-epoch record of a training run, produced by `Sequential::fit_with_validation`.
///
/// # Fields
///
/// - `epochs` - Metrics of every epoch that ran, in order
/// - `stop_reason` - Whether the run was cut short by early stopping
/// - `best_epoch` - Epoch with the lowest monitored loss
///
/// # Example
/// ```rust
/// use cifar_dnn::neural_network::*;
///
/// let mut history = History::new();
/// history.push(EpochMetrics { epoch: 0, loss: 1.9, accuracy: 0.31, val_loss: Some(1.8), val_accuracy: Some(0.35) });
/// history.push(EpochMetrics { epoch: 1, loss: 1.7, accuracy: 0.39, val_loss: Some(1.7), val_accuracy: Some(0.40) });
///
/// assert_eq!(history.len(), 2);
/// println!("{}", history.metrics_table());
/// println!("{}", history.render_chart(10, 40));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub epochs: Vec<EpochMetrics>,
    pub stop_reason: StopReason,
    pub best_epoch: Option<usize>,
}

impl History {
    /// Creates an empty history whose stop reason defaults to `StopReason::Budget`
    pub fn new() -> Self {
        History {
            epochs: Vec::new(),
            stop_reason: StopReason::Budget,
            best_epoch: None,
        }
    }

    /// Appends the metrics of a finished epoch
    pub fn push(&mut self, metrics: EpochMetrics) {
        self.epochs.push(metrics);
    }

    /// Number of epochs that ran
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Metrics of the last epoch that ran
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn losses(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.loss).collect()
    }

    pub fn accuracies(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.accuracy).collect()
    }

    pub fn val_losses(&self) -> Vec<Option<f32>> {
        self.epochs.iter().map(|m| m.val_loss).collect()
    }

    pub fn val_accuracies(&self) -> Vec<Option<f32>> {
        self.epochs.iter().map(|m| m.val_accuracy).collect()
    }

    /// Epoch with the lowest monitored loss, ignoring non-finite values
    pub fn lowest_monitored_epoch(&self) -> Option<usize> {
        self.epochs
            .iter()
            .filter(|m| m.monitored_loss().is_finite())
            .min_by(|a, b| a.monitored_loss().total_cmp(&b.monitored_loss()))
            .map(|m| m.epoch)
    }

    /// Formats the history as a fixed-width table, one row per epoch.
    ///
    /// Missing validation values are shown as `-`.
    pub fn metrics_table(&self) -> String {
        let fmt_opt = |v: Option<f32>| v.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v));

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>6} {:>10} {:>10} {:>10} {:>12}",
            "epoch", "loss", "accuracy", "val_loss", "val_accuracy"
        );
        for m in &self.epochs {
            let marker = if self.best_epoch == Some(m.epoch) { " *" } else { "" };
            let _ = writeln!(
                out,
                "{:>6} {:>10.4} {:>10.4} {:>10} {:>12}{}",
                m.epoch + 1,
                m.loss,
                m.accuracy,
                fmt_opt(m.val_loss),
                fmt_opt(m.val_accuracy),
                marker
            );
        }
        let _ = write!(out, "stopped: {}", self.stop_reason);
        if let Some(best) = self.best_epoch {
            let _ = write!(out, ", best epoch: {}", best + 1);
        }
        out
    }

    /// Renders the four metric series as a text chart.
    ///
    /// The vertical range is fixed to `[0, 1]`; values outside are drawn on the border.
    /// Each series has its own glyph and a legend line follows the epoch axis. Where
    /// two series fall on the same cell, the one listed later in the legend wins.
    ///
    /// # Parameters
    ///
    /// - `height` - Number of plot rows (at least 2)
    /// - `width` - Number of plot columns (at least 2)
    ///
    /// # Returns
    ///
    /// - `String` - The chart, one line per row
    pub fn render_chart(&self, height: usize, width: usize) -> String {
        if self.epochs.is_empty() {
            return "(no epochs recorded)".to_string();
        }

        let height = height.max(2);
        let width = width.max(2);

        let series = [
            ChartSeries {
                label: "loss",
                glyph: '●',
                values: self.losses().into_iter().map(Some).collect(),
            },
            ChartSeries {
                label: "accuracy",
                glyph: '■',
                values: self.accuracies().into_iter().map(Some).collect(),
            },
            ChartSeries {
                label: "val_loss",
                glyph: '○',
                values: self.val_losses(),
            },
            ChartSeries {
                label: "val_accuracy",
                glyph: '□',
                values: self.val_accuracies(),
            },
        ];

        let n = self.epochs.len();
        let column_of = |i: usize| {
            if n == 1 {
                0
            } else {
                (i as f32 * (width - 1) as f32 / (n - 1) as f32).round() as usize
            }
        };
        let row_of = |v: f32| {
            let clamped = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
            ((1.0 - clamped) * (height - 1) as f32).round() as usize
        };

        let mut grid = vec![vec![' '; width]; height];
        for s in &series {
            for (i, value) in s.values.iter().enumerate() {
                if let Some(v) = value {
                    grid[row_of(*v)][column_of(i)] = s.glyph;
                }
            }
        }

        let mut out = String::new();
        for (r, row) in grid.iter().enumerate() {
            let label = if r == 0 {
                "1.0".to_string()
            } else if r == height - 1 {
                "0.0".to_string()
            } else if r == (height - 1) / 2 && (height - 1) % 2 == 0 {
                "0.5".to_string()
            } else {
                String::new()
            };
            let _ = writeln!(out, "{:>4} ┤{}", label, row.iter().collect::<String>());
        }
        let _ = writeln!(out, "{:>4} └{}", "", "─".repeat(width));

        let first = "1".to_string();
        let last = n.to_string();
        let gap = width.saturating_sub(first.len() + last.len());
        if n > 1 {
            let _ = writeln!(out, "{:>4}  {}{}{}  (epoch)", "", first, " ".repeat(gap), last);
        } else {
            let _ = writeln!(out, "{:>4}  {}  (epoch)", "", first);
        }

        let legend = series
            .iter()
            .filter(|s| s.values.iter().any(Option::is_some))
            .map(|s| format!("{} {}", s.glyph, s.label))
            .collect::<Vec<_>>()
            .join("   ");
        let _ = write!(out, "{:>4}  {}", "", legend);

        out
    }

    /// Saves the history as pretty-printed JSON.
    ///
    /// # Parameters
    ///
    /// - `path` - Destination file, created or overwritten
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The history was written
    /// - `Err(IoError::StdIoError)` - File creation or write failed
    /// - `Err(IoError::JsonError)` - Serialization failed
    pub fn save_to_path(&self, path: &str) -> Result<(), IoError> {
        let file = File::create(path).map_err(IoError::StdIoError)?;
        let mut writer = BufWriter::new(file);

        to_writer_pretty(&mut writer, self).map_err(IoError::JsonError)?;
        writer.flush().map_err(IoError::StdIoError)?;

        Ok(())
    }

    /// Loads a history previously written by `save_to_path`.
    pub fn load_from_path(path: &str) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        from_reader(reader).map_err(IoError::JsonError)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
