/// Module `error` contains the error types shared by every other module.
///
/// - `ModelError` - failures while building, training or evaluating a model
/// - `IoError` - failures while reading datasets or reading/writing JSON files
pub mod error;

pub use error::{IoError, ModelError};
pub use serde::{Deserialize, Serialize};

/// Module `dataset` provides access to the CIFAR-10 image classification dataset.
///
/// The dataset is read from the standard binary distribution
/// (`data_batch_1.bin` ... `data_batch_5.bin`, `test_batch.bin`) and returned as
/// `u8` image arrays of shape `(n, 32, 32, 3)` with one integer label per image.
///
/// # Example
/// ```rust,no_run
/// use cifar_dnn::dataset::cifar10::load_cifar10;
///
/// let cifar = load_cifar10("data/cifar-10-batches-bin").unwrap();
/// assert_eq!(cifar.train.images.shape(), &[50000, 32, 32, 3]);
/// assert_eq!(cifar.test.labels.len(), 10000);
/// ```
#[cfg(feature = "dataset")]
pub mod dataset;

/// Module `utility` contains data preprocessing helpers.
///
/// # Main Components
///
/// - `to_categorical` / `to_sparse_categorical` - one-hot encoding of integer class labels and its arg-max inverse
/// - `Standardizer` - per-feature z-score scaling fitted on the training split and reused on any other split
///
/// # Example
/// ```rust
/// use cifar_dnn::utility::label_encoding::{to_categorical, to_sparse_categorical};
/// use ndarray::array;
///
/// let labels = array![3usize, 0, 9];
/// let one_hot = to_categorical(&labels, Some(10)).unwrap();
/// assert_eq!(one_hot.shape(), &[3, 10]);
/// assert_eq!(to_sparse_categorical(&one_hot), labels);
/// ```
#[cfg(feature = "utility")]
pub mod utility;

/// Module `neural_network` is a small Keras-like library for feed-forward networks.
///
/// # Core Components
///
/// ## Layers
/// - **Dense**: Fully connected layer with a pluggable activation and kernel initializer
/// - **Flatten**: Reshapes `(batch, h, w, c)` images into `(batch, h * w * c)` vectors
/// - **BatchNormalization**: Normalizes features over the mini-batch
/// - **Dropout** / **AlphaDropout**: Regularization layers active only during training
/// - **ELU**, **SELU**, **Softmax**, **Linear**: Activation layers
///
/// ## Optimization Algorithms
/// - **SGD**: Stochastic Gradient Descent
/// - **Adam**: Adaptive moment estimation optimizer
/// - **Nadam**: Adam with Nesterov momentum
///
/// ## Training
/// - **Sequential**: Linear stack of layers with `compile`, `fit_with_validation`, `evaluate`, `predict` and `summary`
/// - **EarlyStopping**: Stops training when the validation loss stagnates and restores the best weights
/// - **History**: Per-epoch loss and accuracy, renderable as a text chart
///
/// # Examples
/// ```rust
/// use cifar_dnn::neural_network::*;
/// use ndarray::Array;
///
/// let x = Array::ones((8, 4)).into_dyn();
/// let mut y = Array::zeros((8, 2));
/// y.column_mut(0).fill(1.0);
/// let y = y.into_dyn();
///
/// let mut model = Sequential::new();
/// model
///     .add(Dense::new(4, 8, ELU::new(1.0), KernelInitializer::HeUniform).unwrap())
///     .add(Dense::new(8, 2, Softmax::new(), KernelInitializer::GlorotUniform).unwrap())
///     .compile(Nadam::default(), CategoricalCrossEntropy::new());
///
/// model.summary();
/// let history = model
///     .fit_with_validation(&x, &y, None, 3, 4, Some(EarlyStopping::new(2, 0.0, true)))
///     .unwrap();
/// assert!(history.len() <= 3);
/// ```
#[cfg(feature = "neural_network")]
pub mod neural_network;

/// Module `metric` contains classification metrics computed on one-hot tensors.
#[cfg(feature = "neural_network")]
pub mod metric;

/// Module `model_builder` turns a declarative list of layer specifications into a `Sequential` model.
///
/// The four network variants explored on CIFAR-10 (plain deep ELU network, partial batch
/// normalization, self-normalizing SELU network, and SELU network with alpha dropout) are all
/// produced by `ModelConfig::for_variant` and built through the same `ModelConfig::build` path.
#[cfg(feature = "neural_network")]
pub mod model_builder;

/// Module `experiment` runs the dataset → encoder → builder → trainer → reporter pipeline for each variant.
#[cfg(all(feature = "neural_network", feature = "utility", feature = "dataset"))]
pub mod experiment;

/// Convenient re-exports of the most used types
pub mod prelude;
