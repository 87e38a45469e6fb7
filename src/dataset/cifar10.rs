use crate::error::IoError;
use ndarray::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Image height in pixels
pub const CIFAR10_HEIGHT: usize = 32;
/// Image width in pixels
pub const CIFAR10_WIDTH: usize = 32;
/// Number of color channels (RGB)
pub const CIFAR10_CHANNELS: usize = 3;
/// Number of classes
pub const CIFAR10_NUM_CLASSES: usize = 10;

/// Bytes per record: one label byte followed by 32 * 32 * 3 pixel bytes
const RECORD_BYTES: usize = 1 + CIFAR10_HEIGHT * CIFAR10_WIDTH * CIFAR10_CHANNELS;

/// Pixels per channel plane
const PLANE_SIZE: usize = CIFAR10_HEIGHT * CIFAR10_WIDTH;

/// Files holding the training split, in load order
const TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];

/// File holding the test split
const TEST_FILE: &str = "test_batch.bin";

/// Human readable names of the ten CIFAR-10 classes, indexed by label
pub const CIFAR10_CLASS_NAMES: [&str; CIFAR10_NUM_CLASSES] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

/// One partition of the dataset.
///
/// # Fields
///
/// - `images` - Pixel intensities with shape `(n_samples, 32, 32, 3)` (height × width × channel)
/// - `labels` - Integer class ids in `0..10`, one per image
#[derive(Debug, Clone)]
pub struct Split {
    pub images: Array4<u8>,
    pub labels: Array1<u8>,
}

impl Split {
    /// Number of samples in the split
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when the split holds no samples
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Shape of a single sample, `[32, 32, 3]`
    pub fn sample_shape(&self) -> Vec<usize> {
        self.images.shape()[1..].to_vec()
    }

    /// Converts the images into a float tensor with intensities scaled to `[0, 1]`.
    ///
    /// # Returns
    ///
    /// * `ArrayD<f32>` - Tensor with shape `(n_samples, 32, 32, 3)`
    pub fn to_tensor(&self) -> ArrayD<f32> {
        self.images.mapv(|p| p as f32 / 255.0).into_dyn()
    }

    /// Returns the labels widened to `usize`, ready for one-hot encoding
    pub fn labels_usize(&self) -> Array1<usize> {
        self.labels.mapv(|l| l as usize)
    }
}

/// The CIFAR-10 dataset: 50,000 training and 10,000 test images of 32×32 RGB pixels in 10 classes.
#[derive(Debug, Clone)]
pub struct Cifar10 {
    pub train: Split,
    pub test: Split,
}

/// Decodes raw CIFAR-10 binary records.
///
/// Each record is 3073 bytes: the label followed by the red, green and blue planes,
/// each a row-major 32×32 block. Pixels are transposed to height × width × channel.
///
/// # Parameters
///
/// * `bytes` - Concatenated records, as stored in one `*.bin` batch file
///
/// # Returns
///
/// - `Ok(Split)` - Decoded images and labels
/// - `Err(IoError::DatasetFormatError)` - If the length is not a multiple of the record size or a label is out of range
pub fn parse_cifar10_records(bytes: &[u8]) -> Result<Split, IoError> {
    if bytes.len() % RECORD_BYTES != 0 {
        return Err(IoError::DatasetFormatError(format!(
            "Buffer length {} is not a multiple of the record size {}",
            bytes.len(),
            RECORD_BYTES
        )));
    }

    let n_samples = bytes.len() / RECORD_BYTES;
    let mut images = Array4::<u8>::zeros((
        n_samples,
        CIFAR10_HEIGHT,
        CIFAR10_WIDTH,
        CIFAR10_CHANNELS,
    ));
    let mut labels = Array1::<u8>::zeros(n_samples);

    for (i, record) in bytes.chunks_exact(RECORD_BYTES).enumerate() {
        let label = record[0];
        if label as usize >= CIFAR10_NUM_CLASSES {
            return Err(IoError::DatasetFormatError(format!(
                "Record {} has label {}, expected a value below {}",
                i, label, CIFAR10_NUM_CLASSES
            )));
        }
        labels[i] = label;

        let pixels = &record[1..];
        let mut image = images.index_axis_mut(Axis(0), i);
        for c in 0..CIFAR10_CHANNELS {
            let plane = &pixels[c * PLANE_SIZE..(c + 1) * PLANE_SIZE];
            for (p, &value) in plane.iter().enumerate() {
                image[[p / CIFAR10_WIDTH, p % CIFAR10_WIDTH, c]] = value;
            }
        }
    }

    Ok(Split { images, labels })
}

/// Reads and decodes one batch file
fn load_batch_file(path: &Path) -> Result<Split, IoError> {
    let bytes = fs::read(path).map_err(IoError::StdIoError)?;
    let split = parse_cifar10_records(&bytes)?;
    debug!(file = %path.display(), samples = split.len(), "loaded CIFAR-10 batch");
    Ok(split)
}

/// Concatenates several splits along the sample axis
fn concatenate_splits(splits: &[Split]) -> Result<Split, IoError> {
    let image_views: Vec<_> = splits.iter().map(|s| s.images.view()).collect();
    let label_views: Vec<_> = splits.iter().map(|s| s.labels.view()).collect();

    let images = ndarray::concatenate(Axis(0), &image_views)
        .map_err(|e| IoError::DatasetFormatError(e.to_string()))?;
    let labels = ndarray::concatenate(Axis(0), &label_views)
        .map_err(|e| IoError::DatasetFormatError(e.to_string()))?;

    Ok(Split { images, labels })
}

/// Loads the CIFAR-10 dataset from a directory holding the binary distribution
/// (`cifar-10-batches-bin`).
///
/// # Parameters
///
/// * `dir` - Directory containing `data_batch_1.bin` ... `data_batch_5.bin` and `test_batch.bin`
///
/// # Returns
///
/// - `Ok(Cifar10)` - The fixed train/test split
/// - `Err(IoError::StdIoError)` - If a batch file is missing or unreadable
/// - `Err(IoError::DatasetFormatError)` - If a batch file is malformed
pub fn load_cifar10(dir: impl AsRef<Path>) -> Result<Cifar10, IoError> {
    let dir = dir.as_ref();

    let train_batches = TRAIN_FILES
        .iter()
        .map(|name| load_batch_file(&dir.join(name)))
        .collect::<Result<Vec<_>, _>>()?;
    let train = concatenate_splits(&train_batches)?;
    let test = load_batch_file(&dir.join(TEST_FILE))?;

    info!(
        train_shape = ?train.images.shape(),
        test_shape = ?test.images.shape(),
        "loaded CIFAR-10"
    );

    Ok(Cifar10 { train, test })
}
